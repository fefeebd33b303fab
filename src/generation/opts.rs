use garde::Validate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields, default)]
pub struct Opts {
    /// The harness enforces deterministic results on its own, so statements
    /// do not need to tolerate engines rejecting non-deterministic functions.
    #[garde(skip)]
    pub must_know_result: bool,
    #[garde(dive)]
    pub expression: ExpressionOpts,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            must_know_result: false,
            expression: ExpressionOpts::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields, default)]
pub struct ExpressionOpts {
    /// Maximum nesting depth of generated expressions
    #[garde(range(min = 1, max = 8))]
    pub max_depth: usize,
}

impl Default for ExpressionOpts {
    fn default() -> Self {
        Self { max_depth: 3 }
    }
}
