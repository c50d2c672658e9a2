//! Extractor
//!
//! Turns every leaf of a fitted tree into a decision table rule. For each leaf
//! the first training row routed there is used as a representative, its
//! decision path is walked and every split on the way is folded into a running
//! interval of the split feature.
use crate::constants::DEFAULT_PRECISION;
use crate::data::Matrix;
use crate::errors::RuleError;
use crate::interval::Bounds;
use crate::node::Node;
use crate::rule::{FeatureConstraint, Rule, RuleSet};
use crate::table::DecisionTable;
use crate::tree::Tree;
use crate::utils::{items_to_strings, validate_precision};
use hashbrown::HashMap;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do with a leaf that no training row reaches.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum UnreachableLeafPolicy {
    /// Abort the extraction with `RuleError::UnreachableLeaf`.
    Fail,
    /// Leave the leaf out of the rules and report it in `RuleSet::unreachable_leaves`.
    Skip,
}

impl FromStr for UnreachableLeafPolicy {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fail" => Ok(UnreachableLeafPolicy::Fail),
            "Skip" => Ok(UnreachableLeafPolicy::Skip),
            _ => Err(RuleError::ParseString(
                s.to_string(),
                "UnreachableLeafPolicy".to_string(),
                items_to_strings(vec!["Fail", "Skip"]),
            )),
        }
    }
}

fn default_parallel() -> bool {
    false
}
fn default_unreachable_leaf() -> UnreachableLeafPolicy {
    UnreachableLeafPolicy::Fail
}
fn default_precision() -> usize {
    DEFAULT_PRECISION
}

/// Settings of a `PathRuleExtractor`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExtractorConfig {
    /// Route rows and build rules on the rayon thread pool.
    /// Rules are returned in ascending leaf order either way.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default = "default_unreachable_leaf")]
    pub unreachable_leaf: UnreachableLeafPolicy,
    /// Decimals used when rendering thresholds into table cells.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            parallel: default_parallel(),
            unreachable_leaf: default_unreachable_leaf(),
            precision: default_precision(),
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<(), RuleError> {
        validate_precision(self.precision, "precision")
    }

    /// Load a configuration from a json string, missing fields take their defaults.
    pub fn from_json(json_str: &str) -> Result<Self, RuleError> {
        let config = match serde_json::from_str::<ExtractorConfig>(json_str) {
            Ok(c) => Ok(c),
            Err(e) => Err(RuleError::UnableToRead(e.to_string())),
        }?;
        config.validate()?;
        Ok(config)
    }
}

/// Derives one rule per leaf of a fitted classification tree.
pub struct PathRuleExtractor {
    /// Names of the features, in the column order of the data.
    pub feature_names: Vec<String>,
    /// Name of the target column.
    pub output_name: String,
    pub config: ExtractorConfig,
}

impl PathRuleExtractor {
    pub fn new(feature_names: Vec<String>, output_name: &str) -> Self {
        PathRuleExtractor {
            feature_names,
            output_name: output_name.to_string(),
            config: ExtractorConfig::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: ExtractorConfig) -> Result<Self, RuleError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    // Set methods for parameters

    /// Set whether rows are routed and rules built in parallel.
    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Set the treatment of leaves that no training row reaches.
    pub fn set_unreachable_leaf_policy(mut self, unreachable_leaf: UnreachableLeafPolicy) -> Self {
        self.config.unreachable_leaf = unreachable_leaf;
        self
    }

    /// Set the number of decimals used in table cells.
    pub fn set_precision(mut self, precision: usize) -> Result<Self, RuleError> {
        validate_precision(precision, "precision")?;
        self.config.precision = precision;
        Ok(self)
    }

    fn check_shapes(&self, tree: &Tree, data: &Matrix<f64>) -> Result<(), RuleError> {
        let n_features = self.feature_names.len();
        if data.cols != n_features {
            return Err(RuleError::MismatchedShape(
                "data columns".to_string(),
                n_features,
                data.cols,
            ));
        }
        data.validate_len()?;
        if let Some(k) = data.data.iter().position(|v| v.is_nan()) {
            return Err(RuleError::NaNValueFound(k % data.rows, k / data.rows));
        }
        for (i, node) in tree.nodes.iter().enumerate() {
            if let Node::Internal { feature, .. } = node {
                if *feature >= n_features {
                    return Err(RuleError::MalformedTree(
                        i,
                        format!("split feature {} is outside the {} named features", feature, n_features),
                    ));
                }
            }
        }
        Ok(())
    }

    /// First row, in row order, routed to every reached leaf.
    pub fn representative_rows(&self, tree: &Tree, data: &Matrix<f64>) -> Result<HashMap<usize, usize>, RuleError> {
        let leaves = tree.apply(data, self.config.parallel)?;
        let mut representatives = HashMap::new();
        for (row, leaf) in data.index.iter().zip(leaves) {
            representatives.entry(leaf).or_insert(*row);
        }
        Ok(representatives)
    }

    /// Build the rule described by a decision path.
    ///
    /// Every split on the path bounds its feature from above when the path
    /// continues to the left child, and from below when it continues to the
    /// right child. Repeated bounds keep the tightest value.
    ///
    /// * `tree` - The tree the path was taken from.
    /// * `path` - Node indices, root first and leaf last.
    pub fn rule_from_path(&self, tree: &Tree, path: &[usize]) -> Result<Rule, RuleError> {
        let leaf = *path
            .last()
            .ok_or_else(|| RuleError::MalformedTree(0, "empty decision path".to_string()))?;

        let mut bounds = vec![Bounds::default(); self.feature_names.len()];
        for step in path.windows(2) {
            let (n, next) = (step[0], step[1]);
            match tree.nodes.get(n) {
                Some(Node::Internal {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let b = bounds.get_mut(*feature).ok_or_else(|| {
                        RuleError::MalformedTree(
                            n,
                            format!(
                                "split feature {} is outside the {} named features",
                                feature,
                                self.feature_names.len()
                            ),
                        )
                    })?;
                    if next == *left {
                        b.tighten_upper(*threshold);
                    } else if next == *right {
                        b.tighten_lower(*threshold);
                    } else {
                        return Err(RuleError::MalformedTree(
                            n,
                            format!("node {} follows on the path but is not a child", next),
                        ));
                    }
                }
                Some(Node::Leaf { .. }) => {
                    return Err(RuleError::MalformedTree(
                        n,
                        "leaf in the middle of a decision path".to_string(),
                    ))
                }
                None => return Err(RuleError::MalformedTree(n, "node does not exist".to_string())),
            }
        }

        let class_index = match tree.nodes.get(leaf) {
            Some(node @ Node::Leaf { .. }) => node
                .majority_class()
                .ok_or_else(|| RuleError::MalformedTree(leaf, "class distribution has no counts".to_string()))?,
            _ => {
                return Err(RuleError::MalformedTree(
                    leaf,
                    "decision path does not end in a leaf".to_string(),
                ))
            }
        };
        let class_label = tree
            .class_label(class_index)
            .ok_or_else(|| RuleError::MismatchedShape("class labels".to_string(), class_index + 1, tree.classes.len()))?
            .to_string();

        let constraints = self
            .feature_names
            .iter()
            .zip(&bounds)
            .map(|(feature, b)| FeatureConstraint {
                feature: feature.clone(),
                interval: b.finish(),
            })
            .collect();

        let rule = Rule {
            leaf,
            class_index,
            class_label,
            constraints,
        };
        debug!("Leaf {}: {}", leaf, rule);
        Ok(rule)
    }

    /// Extract the rules of every leaf, along with the leaves left out.
    ///
    /// * `tree` - The fitted tree.
    /// * `data` - The training rows, one column per feature name.
    pub fn extract(&self, tree: &Tree, data: &Matrix<f64>) -> Result<RuleSet, RuleError> {
        self.check_shapes(tree, data)?;
        let representatives = self.representative_rows(tree, data)?;

        let mut reached = Vec::new();
        let mut unreachable_leaves = Vec::new();
        for leaf in tree.leaf_indices() {
            match representatives.get(&leaf) {
                Some(row) => reached.push((leaf, *row)),
                None => match self.config.unreachable_leaf {
                    UnreachableLeafPolicy::Fail => return Err(RuleError::UnreachableLeaf(leaf)),
                    UnreachableLeafPolicy::Skip => {
                        warn!("Leaf {} is not reached by any training row, no rule is generated for it.", leaf);
                        unreachable_leaves.push(leaf);
                    }
                },
            }
        }

        let leaf_rule = |&(leaf, row): &(usize, usize)| -> Result<Rule, RuleError> {
            let path = tree.decision_path(&data.get_row(row))?;
            if path.last() != Some(&leaf) {
                return Err(RuleError::MalformedTree(
                    leaf,
                    format!("representative row {} is routed elsewhere", row),
                ));
            }
            self.rule_from_path(tree, &path)
        };
        let rules = if self.config.parallel {
            reached.par_iter().map(leaf_rule).collect::<Result<Vec<Rule>, RuleError>>()?
        } else {
            reached.iter().map(leaf_rule).collect::<Result<Vec<Rule>, RuleError>>()?
        };

        info!(
            "Extracted {} rules from a tree with {} leaves, {} leaves unreachable.",
            rules.len(),
            tree.n_leaves(),
            unreachable_leaves.len()
        );

        Ok(RuleSet {
            feature_names: self.feature_names.clone(),
            output_name: self.output_name.clone(),
            rules,
            unreachable_leaves,
        })
    }

    /// Extract one rule per leaf, in ascending leaf order.
    pub fn extract_rules(&self, tree: &Tree, data: &Matrix<f64>) -> Result<Vec<Rule>, RuleError> {
        self.extract(tree, data).map(|rule_set| rule_set.rules)
    }

    /// Lay a rule set out as a decision table, rendering cells with the configured precision.
    pub fn decision_table(&self, rule_set: &RuleSet) -> DecisionTable {
        DecisionTable::from_rule_set(rule_set, self.config.precision)
    }
}
