use serde::{Deserialize, Serialize};

use crate::annotations::{Annotation, Unresolved};
use crate::parsing::fence::FenceStyle;
use crate::parsing::info::FenceInfo;

/// The structured, editor-facing form of one code block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlockDocument {
    /// Info string of the fence; language and meta are read from it.
    pub info: FenceInfo,
    pub fence: FenceStyle,
    /// Normalized code: `\n` line endings, annotation comments removed.
    pub code: String,
    pub annotations: Vec<Annotation>,
    /// Annotation comments that did not resolve, kept for saving.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<Unresolved>,
}

impl CodeBlockDocument {
    pub fn new(lang: Option<&str>, meta: &str, code: impl Into<String>) -> Self {
        Self {
            info: FenceInfo::from_parts(lang, meta),
            fence: FenceStyle::default(),
            code: code.into(),
            annotations: vec![],
            unresolved: vec![],
        }
    }

    pub fn lang(&self) -> Option<&str> {
        self.info.lang()
    }

    pub fn meta(&self) -> &str {
        self.info.meta()
    }

    pub fn title(&self) -> Option<String> {
        self.info.title()
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}
