use crate::data::Matrix;
use crate::errors::RuleError;
use crate::node::Node;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::fs;

/// Flat array layout of a fitted classification tree, as exposed by
/// CART style learners. Node `i` is described by the `i`th entry of
/// every array, an absent child is encoded as a negative index.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct TreeArrays {
    /// Index of the split feature, ignored for leaves.
    pub feature: Vec<i64>,
    /// Split threshold, ignored for leaves.
    pub threshold: Vec<f64>,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    /// Per node class counts, one entry per class label.
    pub value: Vec<Vec<f64>>,
    /// Class labels, in the order used by `value`.
    pub classes: Vec<String>,
}

impl TreeArrays {
    /// Load tree arrays from a json string.
    pub fn from_json(json_str: &str) -> Result<Self, RuleError> {
        serde_json::from_str::<TreeArrays>(json_str).map_err(|e| RuleError::UnableToRead(e.to_string()))
    }

    /// Load tree arrays from a path to a json file.
    ///
    /// * `path` - Path to load the arrays from.
    pub fn load(path: &str) -> Result<Self, RuleError> {
        let json_str = match fs::read_to_string(path) {
            Ok(s) => Ok(s),
            Err(e) => Err(RuleError::UnableToRead(e.to_string())),
        }?;
        Self::from_json(&json_str)
    }
}

/// A fitted binary classification tree, root at index 0.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub classes: Vec<String>,
}

impl Tree {
    /// Create a tree from its nodes, validating the structure.
    pub fn new(nodes: Vec<Node>, classes: Vec<String>) -> Result<Self, RuleError> {
        let tree = Tree { nodes, classes };
        tree.validate()?;
        Ok(tree)
    }

    /// Convert the flat array layout into a tree.
    ///
    /// A node with both children absent becomes a leaf, a node with
    /// exactly one absent child is rejected.
    pub fn from_arrays(arrays: &TreeArrays) -> Result<Self, RuleError> {
        let n = arrays.feature.len();
        let lengths = [
            ("threshold", arrays.threshold.len()),
            ("children_left", arrays.children_left.len()),
            ("children_right", arrays.children_right.len()),
            ("value", arrays.value.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(RuleError::MismatchedShape(format!("{} array", name), n, len));
            }
        }

        let nodes = (0..n)
            .map(|i| -> Result<Node, RuleError> {
                match (arrays.children_left[i], arrays.children_right[i]) {
                    (l, r) if l < 0 && r < 0 => Ok(Node::Leaf {
                        class_distribution: arrays.value[i].clone(),
                    }),
                    (l, r) if l < 0 || r < 0 => Err(RuleError::MalformedTree(
                        i,
                        format!("exactly one child is present (left={}, right={})", l, r),
                    )),
                    (l, r) => {
                        let feature = usize::try_from(arrays.feature[i]).map_err(|_| {
                            RuleError::MalformedTree(i, format!("split on negative feature index {}", arrays.feature[i]))
                        })?;
                        Ok(Node::Internal {
                            feature,
                            threshold: arrays.threshold[i],
                            left: l as usize,
                            right: r as usize,
                        })
                    }
                }
            })
            .collect::<Result<Vec<Node>, RuleError>>()?;

        Tree::new(nodes, arrays.classes.clone())
    }

    /// Check the structure: every internal node has two distinct, existing
    /// children, no node has more than one parent and the root has none.
    pub fn validate(&self) -> Result<(), RuleError> {
        let n = self.nodes.len();
        if n == 0 {
            return Err(RuleError::MalformedTree(0, "the tree has no nodes".to_string()));
        }
        if self.classes.is_empty() {
            return Err(RuleError::InvalidParameter(
                "classes".to_string(),
                "at least one class label".to_string(),
                "none".to_string(),
            ));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Internal {
                    threshold, left, right, ..
                } => {
                    if threshold.is_nan() {
                        return Err(RuleError::MalformedTree(i, "split threshold is NaN".to_string()));
                    }
                    if left == right {
                        return Err(RuleError::MalformedTree(
                            i,
                            format!("both branches point to node {}", left),
                        ));
                    }
                    for child in [*left, *right] {
                        if child >= n {
                            return Err(RuleError::MalformedTree(
                                i,
                                format!("child {} is out of range for {} nodes", child, n),
                            ));
                        }
                        if child == i {
                            return Err(RuleError::MalformedTree(i, "node is its own child".to_string()));
                        }
                    }
                }
                Node::Leaf { class_distribution } => {
                    if class_distribution.len() != self.classes.len() {
                        return Err(RuleError::MismatchedShape(
                            format!("class distribution of leaf {}", i),
                            self.classes.len(),
                            class_distribution.len(),
                        ));
                    }
                }
            }
        }

        let mut parents = vec![0_usize; n];
        for (left, right) in self.nodes.iter().filter_map(|node| node.children()) {
            parents[left] += 1;
            parents[right] += 1;
        }
        if parents[0] > 0 {
            return Err(RuleError::MalformedTree(0, "the root is the child of another node".to_string()));
        }
        if let Some((i, count)) = parents.iter().enumerate().find(|(_, c)| **c > 1) {
            return Err(RuleError::MalformedTree(i, format!("node has {} parents", count)));
        }
        Ok(())
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Indices of all leaves, ascending.
    pub fn leaf_indices(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Length of the longest root to leaf path, in edges.
    pub fn depth(&self) -> usize {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![(0, 0)];
        let mut depth = 0;
        while let Some((idx, d)) = stack.pop() {
            if idx >= self.nodes.len() || visited[idx] {
                continue;
            }
            visited[idx] = true;
            depth = depth.max(d);
            if let Some((left, right)) = self.nodes[idx].children() {
                stack.push((left, d + 1));
                stack.push((right, d + 1));
            }
        }
        depth
    }

    pub fn class_label(&self, class_index: usize) -> Option<&str> {
        self.classes.get(class_index).map(|s| s.as_str())
    }

    /// Nodes visited by a row, root first and leaf last.
    ///
    /// * `row` - Feature values of a single row, in schema order.
    pub fn decision_path(&self, row: &[f64]) -> Result<Vec<usize>, RuleError> {
        let mut path = Vec::new();
        let mut node_idx = 0;
        loop {
            let node = self.nodes.get(node_idx).ok_or_else(|| {
                let parent = path.last().copied().unwrap_or(0);
                RuleError::MalformedTree(parent, format!("child {} does not exist", node_idx))
            })?;
            if path.contains(&node_idx) {
                return Err(RuleError::MalformedTree(
                    node_idx,
                    "node revisited while walking a decision path".to_string(),
                ));
            }
            path.push(node_idx);
            match node {
                Node::Leaf { .. } => return Ok(path),
                Node::Internal { feature, .. } => {
                    let v = row
                        .get(*feature)
                        .ok_or_else(|| RuleError::MismatchedShape("row length".to_string(), feature + 1, row.len()))?;
                    // Internal nodes always have a child.
                    node_idx = node.get_child_idx(*v).unwrap_or(node_idx);
                }
            }
        }
    }

    /// Leaf a row ends up in.
    pub fn leaf_index(&self, row: &[f64]) -> Result<usize, RuleError> {
        let path = self.decision_path(row)?;
        path.last()
            .copied()
            .ok_or_else(|| RuleError::MalformedTree(0, "empty decision path".to_string()))
    }

    /// Leaf reached by a row of the data. A walk longer than the
    /// number of nodes has revisited a node.
    fn apply_row(&self, data: &Matrix<f64>, row: usize) -> Result<usize, RuleError> {
        let mut node_idx = 0;
        for _ in 0..self.nodes.len() {
            let node = self
                .nodes
                .get(node_idx)
                .ok_or_else(|| RuleError::MalformedTree(node_idx, "node does not exist".to_string()))?;
            match node {
                Node::Leaf { .. } => return Ok(node_idx),
                Node::Internal { feature, .. } => {
                    if *feature >= data.cols {
                        return Err(RuleError::MismatchedShape(
                            "data columns".to_string(),
                            feature + 1,
                            data.cols,
                        ));
                    }
                    node_idx = node.get_child_idx(*data.get(row, *feature)).unwrap_or(node_idx);
                }
            }
        }
        Err(RuleError::MalformedTree(
            node_idx,
            "node revisited while routing a row".to_string(),
        ))
    }

    fn apply_single_threaded(&self, data: &Matrix<f64>) -> Result<Vec<usize>, RuleError> {
        data.index.iter().map(|i| self.apply_row(data, *i)).collect()
    }

    fn apply_parallel(&self, data: &Matrix<f64>) -> Result<Vec<usize>, RuleError> {
        data.index.par_iter().map(|i| self.apply_row(data, *i)).collect()
    }

    /// Leaf index of every row of the data, in row order.
    pub fn apply(&self, data: &Matrix<f64>, parallel: bool) -> Result<Vec<usize>, RuleError> {
        data.validate_len()?;
        if parallel {
            self.apply_parallel(data)
        } else {
            self.apply_single_threaded(data)
        }
    }

    /// Save a tree as a json object to a file.
    ///
    /// * `path` - Path to save the tree.
    pub fn save(&self, path: &str) -> Result<(), RuleError> {
        let model = self.json_dump()?;
        match fs::write(path, model) {
            Err(e) => Err(RuleError::UnableToWrite(e.to_string())),
            Ok(_) => Ok(()),
        }
    }

    /// Dump a tree as a json object
    pub fn json_dump(&self) -> Result<String, RuleError> {
        match serde_json::to_string(self) {
            Ok(s) => Ok(s),
            Err(e) => Err(RuleError::UnableToWrite(e.to_string())),
        }
    }

    /// Load a tree from Json string, the structure is validated.
    ///
    /// * `json_str` - String object, which can be serialized to json.
    pub fn from_json(json_str: &str) -> Result<Self, RuleError> {
        let tree = match serde_json::from_str::<Tree>(json_str) {
            Ok(t) => Ok(t),
            Err(e) => Err(RuleError::UnableToRead(e.to_string())),
        }?;
        tree.validate()?;
        Ok(tree)
    }

    /// Load a tree from a path to a json tree object.
    ///
    /// * `path` - Path to load the tree from.
    pub fn load(path: &str) -> Result<Self, RuleError> {
        let json_str = match fs::read_to_string(path) {
            Ok(s) => Ok(s),
            Err(e) => Err(RuleError::UnableToRead(e.to_string())),
        }?;
        Self::from_json(&json_str)
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut visited = vec![false; self.nodes.len()];
        let mut print_buffer: Vec<(usize, usize)> = vec![(0, 0)];
        let mut r = String::new();
        while let Some((idx, depth)) = print_buffer.pop() {
            if idx >= self.nodes.len() || visited[idx] {
                continue;
            }
            visited[idx] = true;
            let node = &self.nodes[idx];
            r += format!("{}{}:{}\n", "      ".repeat(depth).as_str(), idx, node).as_str();
            if let Some((left, right)) = node.children() {
                print_buffer.push((right, depth + 1));
                print_buffer.push((left, depth + 1));
            }
        }
        write!(f, "{}", r)
    }
}
