//! Per-wallet behavioral features aggregated from the ledger.

use crate::ledger::{ActionKind, Transaction};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Added to the borrow total so the ratio stays finite for non-borrowers
pub const RATIO_EPSILON: f64 = 1e-6;

/// Feature names in matrix column order
pub const FEATURE_COLUMNS: [&str; 8] = [
    "total_deposit_usd",
    "total_borrow_usd",
    "deposit_to_borrow_ratio",
    "transaction_count",
    "active_days",
    "avg_txn_value",
    "max_single_txn_usd",
    "min_single_txn_usd",
];

/// Number of model input features
pub const FEATURE_COUNT: usize = FEATURE_COLUMNS.len();

/// Aggregated behavior of a single wallet
#[derive(Debug, Clone, PartialEq)]
pub struct WalletFeatureVector {
    pub wallet: String,
    pub total_deposit_usd: f64,
    pub total_borrow_usd: f64,
    pub deposit_to_borrow_ratio: f64,
    pub transaction_count: u64,
    pub active_days: u64,
    pub avg_txn_value: f64,
    pub max_single_txn_usd: f64,
    pub min_single_txn_usd: f64,
}

impl WalletFeatureVector {
    /// Feature values in [`FEATURE_COLUMNS`] order
    pub fn as_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.total_deposit_usd,
            self.total_borrow_usd,
            self.deposit_to_borrow_ratio,
            self.transaction_count as f64,
            self.active_days as f64,
            self.avg_txn_value,
            self.max_single_txn_usd,
            self.min_single_txn_usd,
        ]
    }
}

/// Counters describing what the aggregator did with the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Transactions folded into some wallet
    pub used: usize,
    /// Transactions without a wallet identifier
    pub skipped: usize,
    /// Transactions whose USD value could not be computed
    pub unparseable: usize,
}

#[derive(Default)]
struct WalletAccumulator {
    deposit_usd: f64,
    borrow_usd: f64,
    dates: HashSet<NaiveDate>,
    values: Vec<f64>,
}

impl WalletAccumulator {
    fn push(&mut self, tx: &Transaction, usd: f64) {
        match tx.action_kind() {
            | ActionKind::Deposit => self.deposit_usd += usd,
            | ActionKind::Borrow => self.borrow_usd += usd,
            | ActionKind::Other => {}
        }
        if let Some(date) = tx.active_date() {
            self.dates.insert(date);
        }
        self.values.push(usd);
    }

    fn finish(self, wallet: String) -> WalletFeatureVector {
        let count = self.values.len();
        let (avg, max, min) = if count == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let sum: f64 = self.values.iter().sum();
            let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
            (sum / count as f64, max, min)
        };
        WalletFeatureVector {
            wallet,
            total_deposit_usd: self.deposit_usd,
            total_borrow_usd: self.borrow_usd,
            deposit_to_borrow_ratio: self.deposit_usd / (self.borrow_usd + RATIO_EPSILON),
            transaction_count: count as u64,
            active_days: self.dates.len() as u64,
            avg_txn_value: avg,
            max_single_txn_usd: max,
            min_single_txn_usd: min,
        }
    }
}

/// Group transactions by wallet and compute one feature vector per wallet.
///
/// Wallets come out in the order they are first seen in the ledger.
pub fn aggregate(transactions: &[Transaction]) -> (Vec<WalletFeatureVector>, AggregationStats) {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, WalletAccumulator)> = Vec::new();
    let mut stats = AggregationStats::default();

    for tx in transactions {
        let Some(wallet) = tx.wallet() else {
            stats.skipped += 1;
            continue;
        };
        let value = tx.usd_value();
        if value.is_unparseable() {
            log::debug!("wallet {}: unparseable amount/price, counted as $0", wallet);
            stats.unparseable += 1;
        }
        let slot = *index.entry(wallet).or_insert_with(|| {
            groups.push((wallet, WalletAccumulator::default()));
            groups.len() - 1
        });
        groups[slot].1.push(tx, value.or_zero());
        stats.used += 1;
    }

    let features = groups.into_iter().map(|(wallet, acc)| acc.finish(wallet.to_string())).collect();
    (features, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tx(wallet: &str, action: &str, amount: &str, price: &str, ts: i64) -> Transaction {
        serde_json::from_value(json!({
            "userWallet": wallet,
            "action": action,
            "actionData": { "amount": amount, "assetPriceUSD": price },
            "timestamp": ts,
        }))
        .unwrap()
    }

    #[test]
    fn test_deposit_and_borrow_wallets() {
        let txs = vec![
            tx("A", "deposit", "1000000", "2000", 1_629_178_166),
            tx("B", "borrow", "1000000", "2000", 1_629_178_166),
        ];
        let (features, stats) = aggregate(&txs);
        assert_eq!(features.len(), 2);
        assert_eq!(stats, AggregationStats { used: 2, skipped: 0, unparseable: 0 });

        let a = &features[0];
        assert_eq!(a.wallet, "A");
        assert_eq!(a.total_deposit_usd, 2000.0);
        assert_eq!(a.total_borrow_usd, 0.0);
        assert!((a.deposit_to_borrow_ratio - 2000.0 / 1e-6).abs() < 1.0);
        assert!(a.deposit_to_borrow_ratio.is_finite());

        let b = &features[1];
        assert_eq!(b.total_deposit_usd, 0.0);
        assert_eq!(b.total_borrow_usd, 2000.0);
        assert_eq!(b.deposit_to_borrow_ratio, 0.0);
    }

    #[test]
    fn test_counts_days_and_extremes() {
        let day = 86_400;
        let base = 1_600_000_000;
        let txs = vec![
            tx("w", "Deposit", "1000000", "10", base),
            tx("w", "DEPOSIT", "3000000", "10", base + 60),
            tx("w", "repay", "2000000", "10", base + day),
            tx("w", "borrow", "bad", "10", base + 3 * day),
        ];
        let (features, stats) = aggregate(&txs);
        assert_eq!(stats.unparseable, 1);
        let f = &features[0];
        assert_eq!(f.transaction_count, 4);
        assert_eq!(f.active_days, 3);
        assert_eq!(f.total_deposit_usd, 40.0);
        assert_eq!(f.total_borrow_usd, 0.0);
        assert_eq!(f.max_single_txn_usd, 30.0);
        assert_eq!(f.min_single_txn_usd, 0.0);
        assert!((f.avg_txn_value - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_wallet_is_skipped() {
        let mut anonymous = tx("x", "deposit", "1000000", "1", 1);
        anonymous.user_wallet = None;
        let txs = vec![anonymous, tx("y", "deposit", "1000000", "1", 1)];
        let (features, stats) = aggregate(&txs);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].wallet, "y");
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_one_vector_per_distinct_wallet_in_first_seen_order() {
        let txs = vec![
            tx("b", "deposit", "1", "1", 1),
            tx("a", "deposit", "1", "1", 1),
            tx("b", "borrow", "1", "1", 1),
            tx("c", "deposit", "1", "1", 1),
        ];
        let (features, _) = aggregate(&txs);
        let wallets: Vec<&str> = features.iter().map(|f| f.wallet.as_str()).collect();
        assert_eq!(wallets, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_ledger() {
        let (features, stats) = aggregate(&[]);
        assert!(features.is_empty());
        assert_eq!(stats, AggregationStats::default());
    }

    #[test]
    fn test_row_order_matches_columns() {
        let (features, _) = aggregate(&[tx("A", "deposit", "1000000", "2000", 1_629_178_166)]);
        let row = features[0].as_row();
        assert_eq!(row[0], 2000.0);
        assert_eq!(row[3], 1.0);
        assert_eq!(row[4], 1.0);
        assert_eq!(row[7], 2000.0);
    }
}
