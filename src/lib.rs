mod node;

// Modules
pub mod constants;
pub mod data;
pub mod errors;
pub mod extractor;
pub mod interval;
pub mod rule;
pub mod table;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use data::Matrix;
pub use errors::RuleError;
pub use extractor::{ExtractorConfig, PathRuleExtractor, UnreachableLeafPolicy};
pub use interval::Interval;
pub use node::Node;
pub use rule::{FeatureConstraint, Rule, RuleSet};
pub use table::DecisionTable;
pub use tree::{Tree, TreeArrays};
