/// Number of decimals used when rendering thresholds into rule cells.
pub const DEFAULT_PRECISION: usize = 4;
/// Highest precision accepted by the extractor configuration.
pub const MAX_PRECISION: usize = 15;
pub const INPUT_TYPE_REF: &str = "double";
pub const OUTPUT_TYPE_REF: &str = "string";
pub const INPUT_ID_PREFIX: &str = "input_";
pub const INPUT_EXPRESSION_ID_PREFIX: &str = "inputExpression_";
pub const OUTPUT_ID_PREFIX: &str = "output_";
pub const RULE_ID_PREFIX: &str = "DecisionRule_";
pub const INPUT_ENTRY_ID_PREFIX: &str = "UnaryTests_";
pub const OUTPUT_ENTRY_ID_PREFIX: &str = "LiteralExpression_";
