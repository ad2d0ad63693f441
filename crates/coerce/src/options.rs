//! Conversion options.

use serde::{Deserialize, Serialize};

/// How the boolean heuristic matches its true-tokens (`t`, `true`, `y`,
/// `yes`, `on`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolMatch {
    /// The text only has to start with a token, so `"yup"` and `"onward"`
    /// are true. Compatible with existing consumers.
    #[default]
    Prefix,
    /// The text must equal a token.
    Exact,
}

/// Knobs for a conversion run. The default reproduces the permissive
/// behavior exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub bool_match: BoolMatch,
}
