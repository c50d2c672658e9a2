use crate::utils::{argmax, fmt_vec_output};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of a fitted binary classification tree.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub enum Node {
    /// A split, rows with `row[feature] <= threshold` travel to `left`,
    /// all others to `right`.
    Internal {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// A terminal node, holding the (possibly weighted) number of
    /// training rows of every class that ended up here.
    Leaf { class_distribution: Vec<f64> },
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Get the path that should be traveled down, given a value.
    /// Returns `None` for a leaf.
    pub fn get_child_idx(&self, v: f64) -> Option<usize> {
        match self {
            Node::Internal {
                threshold, left, right, ..
            } => {
                if v <= *threshold {
                    Some(*left)
                } else {
                    Some(*right)
                }
            }
            Node::Leaf { .. } => None,
        }
    }

    /// Children of an internal node, left first.
    pub fn children(&self) -> Option<(usize, usize)> {
        match self {
            Node::Internal { left, right, .. } => Some((*left, *right)),
            Node::Leaf { .. } => None,
        }
    }

    /// Index of the majority class of a leaf, the lowest
    /// class index wins a tie.
    pub fn majority_class(&self) -> Option<usize> {
        match self {
            Node::Leaf { class_distribution } => argmax(class_distribution),
            Node::Internal { .. } => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Internal {
                feature,
                threshold,
                left,
                right,
            } => write!(f, "[{} <= {}] yes={},no={}", feature, threshold, left, right),
            Node::Leaf { class_distribution } => write!(f, "leaf=[{}]", fmt_vec_output(class_distribution)),
        }
    }
}
