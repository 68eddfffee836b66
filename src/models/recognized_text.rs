use serde::{Deserialize, Serialize};

/// One line or segment found by the text recognizer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextBlock {
    pub text: String,
}

/// Recognizer output for a single image
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecognizedText {
    /// Full text in original casing
    pub text: String,
    /// Blocks in layout order (top to bottom, best effort)
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

impl RecognizedText {
    pub fn block_texts(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.text.as_str()).collect()
    }
}
