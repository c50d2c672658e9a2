use crate::errors::RuleError;
use crate::interval::Interval;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Constraint of a rule on one feature of the schema.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FeatureConstraint {
    pub feature: String,
    pub interval: Interval,
}

/// One row of a decision table, derived from a single leaf.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Rule {
    /// Index of the leaf this rule describes.
    pub leaf: usize,
    pub class_index: usize,
    pub class_label: String,
    /// One constraint per schema feature, in schema order.
    pub constraints: Vec<FeatureConstraint>,
}

impl Rule {
    /// Interval recorded for a feature, by name.
    pub fn constraint(&self, feature: &str) -> Option<&Interval> {
        self.constraints
            .iter()
            .find(|c| c.feature == feature)
            .map(|c| &c.interval)
    }

    /// Check if every feature value of a row lies within its interval.
    ///
    /// A NaN value lies in no bounded interval, so a row holding NaN in a
    /// constrained feature never satisfies the rule, even though the tree
    /// routes it to a right branch. Extraction refuses such rows.
    ///
    /// * `row` - Feature values, in schema order.
    pub fn is_satisfied_by(&self, row: &[f64]) -> bool {
        row.len() == self.constraints.len()
            && self
                .constraints
                .iter()
                .zip(row)
                .all(|(c, v)| c.interval.contains(*v))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cells: Vec<String> = self
            .constraints
            .iter()
            .filter(|c| !c.interval.is_unconstrained())
            .map(|c| format!("{}: \"{}\"", c.feature, c.interval))
            .collect();
        write!(f, "{{{}}} -> \"{}\"", cells.join(", "), self.class_label)
    }
}

/// Rules of a whole tree, ordered by ascending leaf index.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RuleSet {
    pub feature_names: Vec<String>,
    /// Name of the target column the rules predict.
    pub output_name: String,
    pub rules: Vec<Rule>,
    /// Leaves no training row reaches, left out of `rules`.
    pub unreachable_leaves: Vec<usize>,
}

impl RuleSet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_for_leaf(&self, leaf: usize) -> Option<&Rule> {
        self.rules
            .binary_search_by_key(&leaf, |r| r.leaf)
            .ok()
            .map(|i| &self.rules[i])
    }

    /// Dump a rule set as a json object
    pub fn json_dump(&self) -> Result<String, RuleError> {
        match serde_json::to_string(self) {
            Ok(s) => Ok(s),
            Err(e) => Err(RuleError::UnableToWrite(e.to_string())),
        }
    }
}
