//! Operation parameters and their declared defaults.

use serde::{Deserialize, Serialize};

/// Operation-specific inputs. Every field is optional; generators fall back
/// to the defaults below and to the built-in demo collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Position for array insert/update/delete, or the start vertex for graphs.
    pub index: Option<usize>,
    /// Value to insert, push, enqueue or write.
    pub value: Option<i64>,
    /// Value a search looks for.
    pub target: Option<i64>,
    /// Replaces the demo collection for linear, sorting and searching topics.
    pub input: Option<Vec<i64>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_target(mut self, target: i64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_input(mut self, input: Vec<i64>) -> Self {
        self.input = Some(input);
        self
    }

    pub(crate) fn index_or(&self, default: usize) -> usize {
        self.index.unwrap_or(default)
    }

    pub(crate) fn value_or(&self, default: i64) -> i64 {
        self.value.unwrap_or(default)
    }

    pub(crate) fn target_or(&self, default: i64) -> i64 {
        self.target.unwrap_or(default)
    }

    pub(crate) fn input_or(&self, demo: &[i64]) -> Vec<i64> {
        self.input.clone().unwrap_or_else(|| demo.to_vec())
    }
}

/// Parse a comma-separated list of integers, e.g. `"5, 2,8"`.
pub fn parse_list(text: &str) -> Result<Vec<i64>, String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| format!("Invalid number '{s}' in list"))
        })
        .collect()
}
