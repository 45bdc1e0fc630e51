//! Appeal letter post-processing: splitting the generated blob into its
//! English and Amharic sections, and stripping markdown for plain-text export.

pub mod sanitize;

use std::sync::LazyLock;

use regex::Regex;

/// Matches the section markers the backend asks the model to emit.
/// Case-insensitive, colon optional; the model does not always comply on
/// either count.
static VERSION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(english|amharic)\s+version:?").unwrap());

/// A generated appeal letter separated into its two language sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLetter {
    pub english: String,
    pub amharic: String,
}

impl ParsedLetter {
    /// True when the blob carried both section markers and was actually split.
    pub fn is_bilingual(&self) -> bool {
        !self.amharic.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    English,
    Amharic,
}

/// Split a generated letter into English and Amharic sections.
///
/// Each section is the text strictly between its marker and the next marker
/// of either kind (or end of input), trimmed. Marker order in the blob does
/// not matter, and the first occurrence of each marker wins. If the blob does
/// not carry both markers, the whole trimmed blob is returned as the English
/// section and the Amharic section is empty; degraded model output is
/// expected, never an error.
pub fn split_versions(blob: &str) -> ParsedLetter {
    let markers: Vec<(Section, usize, usize)> = VERSION_MARKER
        .find_iter(blob)
        .map(|m| {
            let section = if m.as_str().to_ascii_lowercase().starts_with("english") {
                Section::English
            } else {
                Section::Amharic
            };
            (section, m.start(), m.end())
        })
        .collect();

    let english_idx = markers.iter().position(|(s, _, _)| *s == Section::English);
    let amharic_idx = markers.iter().position(|(s, _, _)| *s == Section::Amharic);

    let (Some(english_idx), Some(amharic_idx)) = (english_idx, amharic_idx) else {
        return ParsedLetter {
            english: blob.trim().to_string(),
            amharic: String::new(),
        };
    };

    let section_text = |idx: usize| -> String {
        let start = markers[idx].2;
        let end = markers
            .get(idx + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(blob.len());
        blob[start..end].trim().to_string()
    };

    ParsedLetter {
        english: section_text(english_idx),
        amharic: section_text(amharic_idx),
    }
}
