//! End-to-end scoring runs against temporary ledgers and models

use serde_json::json;
use std::collections::HashSet;
use std::path::Path;
use tempfile::TempDir;
use wallet_score::model::{
    Estimator, ForestRegressor, LinearRegressor, ModelArtifact, RegressionTree, TreeNode,
};
use wallet_score::{run, Error, PipelineConfig};

/// Rewards deposits and the deposit/borrow ratio, penalises borrowing
fn monotonic_model() -> ModelArtifact {
    ModelArtifact::new(Estimator::Linear(LinearRegressor::new(
        vec![1.0, -1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        0.5,
    )))
}

fn setup(ledger: serde_json::Value, model: Option<&ModelArtifact>, model_name: &str) -> (TempDir, PipelineConfig) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("ledger.json"), serde_json::to_vec(&ledger).unwrap()).unwrap();
    if let Some(model) = model {
        model.save(root.join(model_name)).unwrap();
    }
    let config = PipelineConfig {
        input: root.join("ledger.json"),
        output: root.join("out").join("scores.csv"),
        model: root.join(model_name),
        chart: root.join("out").join("score_distribution.png"),
        report: root.join("out").join("analysis.md"),
    };
    (dir, config)
}

fn deposit_and_borrow_ledger() -> serde_json::Value {
    json!([
        {
            "userWallet": "0xA",
            "action": "deposit",
            "actionData": { "amount": "1000000", "assetPriceUSD": "2000" },
            "timestamp": 1629178166
        },
        {
            "userWallet": "0xB",
            "action": "borrow",
            "actionData": { "amount": "1000000", "assetPriceUSD": "2000" },
            "timestamp": 1629178166
        }
    ])
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn depositor_outscores_borrower() {
    let model = monotonic_model();
    let (_dir, config) = setup(deposit_and_borrow_ledger(), Some(&model), "model.bin");

    let summary = run(&config).unwrap();
    assert_eq!(summary.transactions, 2);
    let a = summary.scores.iter().find(|s| s.wallet == "0xA").unwrap();
    let b = summary.scores.iter().find(|s| s.wallet == "0xB").unwrap();
    assert!(a.score > b.score);
    assert_eq!(a.score, 1000);

    let table = read(&config.output);
    assert!(table.starts_with("userWallet,credit_score\n"));
    assert!(table.contains("0xA,1000"));
    assert!(config.chart.exists());
    let analysis = read(&config.report);
    assert!(analysis.contains("![Score Distribution](score_distribution.png)"));
    assert!(analysis.contains("| 900-999 | 1 |"));
}

#[test]
fn output_wallets_match_input_wallets() {
    let mut records = Vec::new();
    for i in 0..25 {
        let wallet = format!("0x{:02}", i % 7);
        let action = if i % 3 == 0 { "borrow" } else { "deposit" };
        records.push(json!({
            "userWallet": wallet,
            "action": action,
            "actionData": { "amount": format!("{}", (i + 1) * 250_000), "assetPriceUSD": "1.01" },
            "timestamp": 1_600_000_000 + i * 40_000
        }));
    }
    records.push(json!({ "action": "deposit", "actionData": { "amount": "5", "assetPriceUSD": "1" } }));
    records.push(json!({ "userWallet": "0xbad", "action": "deposit", "actionData": { "amount": "n/a" } }));

    let model = monotonic_model();
    let (_dir, config) = setup(json!(records), Some(&model), "model.bin");
    let summary = run(&config).unwrap();

    assert_eq!(summary.aggregation.skipped, 1);
    assert_eq!(summary.aggregation.unparseable, 1);

    let table = read(&config.output);
    let wallets: Vec<&str> = table.lines().skip(1).map(|l| l.split(',').next().unwrap()).collect();
    let unique: HashSet<&str> = wallets.iter().copied().collect();
    assert_eq!(wallets.len(), unique.len());
    let mut expected: HashSet<String> = (0..7).map(|i| format!("0x{:02}", i)).collect();
    expected.insert("0xbad".to_string());
    let expected: HashSet<&str> = expected.iter().map(String::as_str).collect();
    assert_eq!(unique, expected);

    for s in &summary.scores {
        assert!(s.score <= 1000);
    }
    assert_eq!(summary.scores.iter().map(|s| s.score).max(), Some(1000));
}

#[test]
fn identical_inputs_give_identical_tables() {
    let model = monotonic_model();
    let (_dir, config) = setup(deposit_and_borrow_ledger(), Some(&model), "model.bin");

    run(&config).unwrap();
    let first = std::fs::read(&config.output).unwrap();
    run(&config).unwrap();
    let second = std::fs::read(&config.output).unwrap();
    assert_eq!(first, second);
}

#[test]
fn forest_model_from_json_artifact() {
    // Split on normalized deposit total
    let tree = RegressionTree::new(vec![
        TreeNode::Split { feature: 0, threshold: 0.5, left: 1, right: 2 },
        TreeNode::Leaf { value: 0.25 },
        TreeNode::Leaf { value: 1.0 },
    ]);
    let model = ModelArtifact::new(Estimator::Forest(ForestRegressor::new(vec![tree])));
    let (_dir, config) = setup(deposit_and_borrow_ledger(), Some(&model), "model.json");

    let summary = run(&config).unwrap();
    let a = summary.scores.iter().find(|s| s.wallet == "0xA").unwrap();
    let b = summary.scores.iter().find(|s| s.wallet == "0xB").unwrap();
    assert_eq!(a.score, 1000);
    assert_eq!(b.score, 250);
}

#[test]
fn empty_ledger_is_a_valid_run() {
    let model = monotonic_model();
    let (_dir, config) = setup(json!([]), Some(&model), "model.bin");

    let summary = run(&config).unwrap();
    assert!(summary.scores.is_empty());
    assert_eq!(read(&config.output), "userWallet,credit_score\n");
    assert!(config.chart.exists());
    assert_eq!(summary.report.low.count, 0);
    assert!(read(&config.report).contains("NaN"));
}

#[test]
fn missing_model_aborts_without_output() {
    let (_dir, config) = setup(deposit_and_borrow_ledger(), None, "model.bin");

    let err = run(&config).unwrap_err();
    assert!(matches!(err, Error::ModelError(_)));
    assert!(!config.output.exists());
    assert!(!config.chart.exists());
    assert!(!config.report.exists());
}

#[test]
fn incompatible_model_aborts() {
    let mut model = monotonic_model();
    model.features.reverse();
    let (_dir, config) = setup(deposit_and_borrow_ledger(), Some(&model), "model.bin");

    assert!(matches!(run(&config), Err(Error::ModelError(_))));
    assert!(!config.output.exists());
}

#[test]
fn non_array_ledger_is_rejected() {
    let model = monotonic_model();
    let (_dir, config) = setup(json!({ "userWallet": "0xA" }), Some(&model), "model.bin");
    assert!(matches!(run(&config), Err(Error::DataError(_))));
}
