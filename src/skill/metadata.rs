//! Skill Metadata Extractor
//!
//! Pulls `name` and `description` out of a skill document's frontmatter.
//! Total: documents without a usable frontmatter block yield defaults
//! rather than an error.

use std::sync::LazyLock;

use regex::Regex;

/// Same tolerant frontmatter pattern the validator uses.
static FRONTMATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^---[ \t]*\n(.*?)\n---[ \t]*(\n|$)").unwrap());

static NAME_FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"name:\s*(.+)").unwrap());

/// Description value with optional surrounding double quotes.
static DESCRIPTION_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"description:\s*"?([^"\n]+)"?"#).unwrap());

/// Extracted identifying fields from a skill document header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedMetadata {
    pub name: String,
    pub description: String,
}

/// Extract `name` and `description` from skill markdown frontmatter.
///
/// Each field falls back independently: `name` to `"untitled-skill"`,
/// `description` to the empty string.
pub fn extract_metadata(content: &str) -> ExtractedMetadata {
    let frontmatter = match FRONTMATTER.captures(content) {
        Some(caps) => caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
        None => {
            return ExtractedMetadata {
                name: "untitled-skill".to_string(),
                description: String::new(),
            }
        }
    };

    let name = NAME_FIELD
        .captures(&frontmatter)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "untitled-skill".to_string());

    let description = DESCRIPTION_FIELD
        .captures(&frontmatter)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    ExtractedMetadata { name, description }
}
