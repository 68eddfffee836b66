use crate::error::AppError;
use crate::models::RecognizedText;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Plate grammars in precedence order. The current two-letter/three-digit/two-letter
/// format is tried first because the legacy three-letter/three-digit shape also
/// shows up inside noise.
static PLATE_FORMATS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        (
            "current",
            Regex::new(r"[A-Z]{2}\s*[0-9]{3}\s*[A-Z]{2}").expect("current plate pattern"),
        ),
        (
            "legacy",
            Regex::new(r"[A-Z]{3}\s*[0-9]{3}").expect("legacy plate pattern"),
        ),
    ]
});

/// Extracts a plate identifier from recognized text.
///
/// The raw text is upper-cased and scanned for each plate format in order; the
/// first leftmost match of the first format that matches anything wins, with
/// whitespace removed. Without a match the first block is returned reduced to
/// `A-Z0-9` (possibly empty). Without blocks there is no result.
pub fn extract_plate<S: AsRef<str>>(raw_text: &str, blocks: &[S]) -> Option<String> {
    let text = raw_text.to_uppercase();

    for (name, pattern) in PLATE_FORMATS.iter() {
        if let Some(m) = pattern.find(&text) {
            let plate: String = m.as_str().chars().filter(|c| !c.is_whitespace()).collect();
            log::debug!("Matched {} plate format: {}", name, plate);
            return Some(plate);
        }
    }

    blocks.first().map(|block| {
        block
            .as_ref()
            .chars()
            .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            .collect()
    })
}

/// Text recognition engine, treated as a black box
pub trait TextRecognizer {
    fn recognize(&self, image: &Path) -> Result<RecognizedText, AppError>;
}

/// Reads recognizer output stored next to the image as `<image>.ocr.json`
#[derive(Debug, Default, Clone)]
pub struct SidecarRecognizer;

impl SidecarRecognizer {
    pub fn sidecar_path(image: &Path) -> PathBuf {
        let mut name = image.as_os_str().to_os_string();
        name.push(".ocr.json");
        PathBuf::from(name)
    }
}

impl TextRecognizer for SidecarRecognizer {
    fn recognize(&self, image: &Path) -> Result<RecognizedText, AppError> {
        let sidecar = Self::sidecar_path(image);
        let content = std::fs::read_to_string(&sidecar).map_err(|e| {
            AppError::Recognition(format!("Cannot read {}: {}", sidecar.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            AppError::Recognition(format!("Invalid recognizer output {}: {}", sidecar.display(), e))
        })
    }
}

/// Runs recognition and plate extraction for one image.
///
/// Recognition failures are logged and reported as "no plate".
pub fn recognize_plate(recognizer: &dyn TextRecognizer, image: &Path) -> Option<String> {
    match recognizer.recognize(image) {
        Ok(result) => {
            log::debug!("Raw text found in {:?}: {:?}", image, result.text);
            let blocks = result.block_texts();
            extract_plate(&result.text, blocks.as_slice())
        }
        Err(e) => {
            log::warn!("Text recognition failed for {:?}: {}", image, e);
            None
        }
    }
}
