use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Presentation settings: style classes and line numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Classes not listed in `classes` are `<prefix><name>`.
    pub class_prefix: String,
    pub line_numbers: bool,
    /// Number shown for the first line.
    pub first_line_number: usize,
    /// Class per decoration name or token scope, overriding the prefix rule.
    pub classes: BTreeMap<String, String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            class_prefix: "fm-".to_string(),
            line_numbers: false,
            first_line_number: 1,
            classes: BTreeMap::new(),
        }
    }
}

impl RenderConfig {
    pub fn class_for(&self, name: &str) -> String {
        match self.classes.get(name) {
            Some(class) => class.clone(),
            None => format!("{}{name}", self.class_prefix),
        }
    }
}
