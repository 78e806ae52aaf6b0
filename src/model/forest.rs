use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::model::Regressor;
use crate::model::features::{FEATURE_NAMES, Features};

/// A node of a regression tree as stored in the model artifact.
///
/// Splits send a sample to `left` when its feature value is `<= threshold`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Deserialize)]
struct ForestArtifact {
    feature_names: Vec<String>,
    trees: Vec<Tree>,
}

/// Random forest regressor: the prediction is the mean of every tree's leaf.
///
/// Artifact layout (JSON):
/// ```json
/// {
///   "feature_names": ["ws", "temp", "bcaod550"],
///   "trees": [
///     { "nodes": [
///         { "feature": 0, "threshold": 1.5, "left": 1, "right": 2 },
///         { "value": 42.0 },
///         { "value": 18.0 }
///     ] }
///   ]
/// }
/// ```
/// `feature` indexes into `feature_names`, which must be names from
/// [`FEATURE_NAMES`].
#[derive(Debug, Clone)]
pub struct ForestModel {
    /// Maps the artifact's feature positions onto [`Features::values`].
    columns: Vec<usize>,
    trees: Vec<Tree>,
}

impl ForestModel {
    /// Loads and validates a forest from a JSON file.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact '{}'", path.display()))?;
        let model = Self::from_json(&content)
            .with_context(|| format!("Invalid model artifact '{}'", path.display()))?;
        info!(trees = model.trees.len(), features = model.columns.len(), "Model loaded");
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ForestArtifact = serde_json::from_str(json)?;
        Self::new(&artifact.feature_names, artifact.trees)
    }

    /// Builds a forest, checking that every tree terminates and only refers to
    /// known features.
    pub fn new(feature_names: &[String], trees: Vec<Tree>) -> Result<Self> {
        if trees.is_empty() {
            bail!("forest has no trees");
        }

        let columns = feature_names
            .iter()
            .map(|name| {
                Features::index_of(name).with_context(|| {
                    format!("unknown feature '{name}', expected one of {FEATURE_NAMES:?}")
                })
            })
            .collect::<Result<Vec<_>>>()?;

        for (t, tree) in trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                bail!("tree {t} has no nodes");
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                if let Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } = *node
                {
                    if feature >= columns.len() {
                        bail!("tree {t} node {i}: feature index {feature} out of range");
                    }
                    // Children always come after their parent, so walks terminate.
                    for child in [left, right] {
                        if child <= i || child >= tree.nodes.len() {
                            bail!("tree {t} node {i}: invalid child index {child}");
                        }
                    }
                }
            }
        }

        debug!(trees = trees.len(), "Forest validated");
        Ok(Self { columns, trees })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn predict_tree(&self, tree: &Tree, values: &[f64; 19]) -> f64 {
        let mut idx = 0;
        loop {
            match tree.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if values[self.columns[feature]] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

impl Regressor for ForestModel {
    fn predict(&self, features: &Features) -> Result<f64> {
        let values = features.values();
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            bail!("feature '{}' is not a finite number", FEATURE_NAMES[pos]);
        }

        let total: f64 = self
            .trees
            .iter()
            .map(|tree| self.predict_tree(tree, &values))
            .sum();
        Ok(total / self.trees.len() as f64)
    }
}
