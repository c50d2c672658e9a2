//! Table
//!
//! A file format agnostic decision table: one input column per feature, one
//! output column named after the target, and one row of rendered cells per
//! rule. Writers for concrete rule documents walk this structure.
use crate::constants::{
    INPUT_ENTRY_ID_PREFIX, INPUT_EXPRESSION_ID_PREFIX, INPUT_ID_PREFIX, INPUT_TYPE_REF, OUTPUT_ENTRY_ID_PREFIX,
    OUTPUT_ID_PREFIX, OUTPUT_TYPE_REF, RULE_ID_PREFIX,
};
use crate::errors::RuleError;
use crate::rule::RuleSet;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fs;

/// Deterministic element identifiers, `prefix` followed by a per prefix counter.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counters: HashMap<String, usize>,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator::default()
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{}{}", prefix, counter)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct InputColumn {
    pub id: String,
    pub expression_id: String,
    /// The feature name.
    pub label: String,
    pub type_ref: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputColumn {
    pub id: String,
    pub name: String,
    pub type_ref: String,
}

/// A single rendered cell.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Entry {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    /// Leaf the row was derived from.
    pub leaf: usize,
    /// One cell per input column, empty text for an unconstrained feature.
    pub input_entries: Vec<Entry>,
    pub output_entry: Entry,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DecisionTable {
    pub inputs: Vec<InputColumn>,
    pub output: OutputColumn,
    pub rows: Vec<TableRow>,
}

impl DecisionTable {
    /// Lay out a rule set as a table.
    ///
    /// * `rule_set` - The extracted rules.
    /// * `precision` - Decimals used for thresholds in the input cells.
    pub fn from_rule_set(rule_set: &RuleSet, precision: usize) -> Self {
        let mut ids = IdGenerator::new();

        let inputs = rule_set
            .feature_names
            .iter()
            .map(|name| InputColumn {
                id: ids.next_id(INPUT_ID_PREFIX),
                expression_id: ids.next_id(INPUT_EXPRESSION_ID_PREFIX),
                label: name.clone(),
                type_ref: INPUT_TYPE_REF.to_string(),
            })
            .collect();
        let output = OutputColumn {
            id: ids.next_id(OUTPUT_ID_PREFIX),
            name: rule_set.output_name.clone(),
            type_ref: OUTPUT_TYPE_REF.to_string(),
        };

        let mut rows = Vec::with_capacity(rule_set.rules.len());
        for rule in &rule_set.rules {
            let id = ids.next_id(RULE_ID_PREFIX);
            let input_entries = rule
                .constraints
                .iter()
                .map(|c| Entry {
                    id: ids.next_id(INPUT_ENTRY_ID_PREFIX),
                    text: c.interval.to_cell(precision),
                })
                .collect();
            let output_entry = Entry {
                id: ids.next_id(OUTPUT_ENTRY_ID_PREFIX),
                text: rule.class_label.clone(),
            };
            rows.push(TableRow {
                id,
                leaf: rule.leaf,
                input_entries,
                output_entry,
            });
        }

        DecisionTable { inputs, output, rows }
    }

    /// Dump a table as a json object
    pub fn json_dump(&self) -> Result<String, RuleError> {
        match serde_json::to_string(self) {
            Ok(s) => Ok(s),
            Err(e) => Err(RuleError::UnableToWrite(e.to_string())),
        }
    }

    /// Save a table as a json object to a file.
    ///
    /// * `path` - Path to save the table.
    pub fn save(&self, path: &str) -> Result<(), RuleError> {
        let table = self.json_dump()?;
        match fs::write(path, table) {
            Err(e) => Err(RuleError::UnableToWrite(e.to_string())),
            Ok(_) => Ok(()),
        }
    }

    /// Load a table from a json string.
    pub fn from_json(json_str: &str) -> Result<Self, RuleError> {
        serde_json::from_str::<DecisionTable>(json_str).map_err(|e| RuleError::UnableToRead(e.to_string()))
    }

    /// Load a table from a path to a json table object.
    ///
    /// * `path` - Path to load the table from.
    pub fn load(path: &str) -> Result<Self, RuleError> {
        let json_str = match fs::read_to_string(path) {
            Ok(s) => Ok(s),
            Err(e) => Err(RuleError::UnableToRead(e.to_string())),
        }?;
        Self::from_json(&json_str)
    }
}
