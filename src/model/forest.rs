use super::RegressionModel;
use crate::analysis::FEATURE_COUNT;
use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One node of a flattened regression tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, otherwise to `right`
    Split { feature: usize, threshold: f64, left: usize, right: usize },
    Leaf { value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    // Children must point forward; this rules out cycles so traversal ends.
    fn validate(&self, tree_idx: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::ModelError(format!("tree {tree_idx} has no nodes")));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                | TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(Error::ModelError(format!(
                            "tree {tree_idx} node {idx} splits on feature {feature}, only {FEATURE_COUNT} exist"
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(Error::ModelError(format!("tree {tree_idx} node {idx} has NaN threshold")));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(Error::ModelError(format!(
                                "tree {tree_idx} node {idx} has invalid child {child}"
                            )));
                        }
                    }
                }
                | TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(Error::ModelError(format!("tree {tree_idx} leaf {idx} is not finite")));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                | TreeNode::Leaf { value } => return *value,
                | TreeNode::Split { feature, threshold, left, right } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Bagged tree ensemble; the prediction is the mean over trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestRegressor {
    pub trees: Vec<RegressionTree>,
}

impl ForestRegressor {
    pub fn new(trees: Vec<RegressionTree>) -> Self {
        Self { trees }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(Error::ModelError("forest has no trees".into()));
        }
        self.trees.iter().enumerate().try_for_each(|(i, tree)| tree.validate(i))
    }
}

impl RegressionModel for ForestRegressor {
    fn name(&self) -> &str {
        "forest"
    }

    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        total / self.trees.len() as f64
    }
}
