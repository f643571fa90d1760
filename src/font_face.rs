//! Print-time rewriting of `@font-face` rules.
//!
//! Font-face rules do not nest, so a block ends at the first `}` after the
//! marker. This is deliberately not the balanced scan used for method bodies.

use serde::{Deserialize, Serialize};

use crate::error::SfcResult;

pub const FONT_FACE_MARKER: &str = "@font-face";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontClass {
    Italic,
    Bold,
    Classic,
}

impl FontClass {
    /// Case-insensitive keyword check: "italic" wins over "bold".
    pub fn classify(block: &str) -> Self {
        let lower = block.to_lowercase();
        if lower.contains("italic") {
            FontClass::Italic
        } else if lower.contains("bold") {
            FontClass::Bold
        } else {
            FontClass::Classic
        }
    }
}

/// One `@font-face ... }` rule as it appears in the style text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontFaceBlock {
    pub raw_text: String,
    pub classification: FontClass,
}

/// Replacement text per classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontFaceReplacements {
    pub italic: String,
    pub bold: String,
    pub classic: String,
}

impl FontFaceReplacements {
    pub fn from_yaml_str(yaml: &str) -> SfcResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn for_class(&self, class: FontClass) -> &str {
        match class {
            FontClass::Italic => &self.italic,
            FontClass::Bold => &self.bold,
            FontClass::Classic => &self.classic,
        }
    }
}

/// Every `@font-face` rule in `style`, left to right.
///
/// A trailing marker with no `}` after it is not a block.
pub fn scan_font_faces(style: &str) -> Vec<FontFaceBlock> {
    let mut blocks = Vec::new();
    let mut from = 0;

    while let Some(pos) = style[from..].find(FONT_FACE_MARKER) {
        let start = from + pos;
        let body_start = start + FONT_FACE_MARKER.len();
        let Some(close) = style[body_start..].find('}') else {
            log::warn!("unterminated @font-face at byte {}, left as is", start);
            break;
        };
        let end = body_start + close + 1;
        let raw_text = &style[start..end];
        let classification = FontClass::classify(raw_text);
        log::trace!("@font-face at byte {} classified {:?}", start, classification);

        blocks.push(FontFaceBlock {
            raw_text: raw_text.to_string(),
            classification,
        });
        from = end;
    }

    blocks
}

/// Replace each `@font-face` rule with the replacement for its class.
///
/// Substitution is textual: for every block, in discovery order, the first
/// remaining occurrence of its exact text is replaced.
pub fn rewrite_font_faces(style: &str, replacements: &FontFaceReplacements) -> String {
    let blocks = scan_font_faces(style);
    log::debug!("rewriting {} @font-face rule(s)", blocks.len());

    blocks.iter().fold(style.to_string(), |text, block| {
        text.replacen(
            &block.raw_text,
            replacements.for_class(block.classification),
            1,
        )
    })
}
