//! Skill Document Validator
//!
//! Structural validation of canonical skill markdown. Findings are data,
//! not errors: the caller displays them and decides what to gate. All
//! rules run on every call (no short-circuit past the empty check) and
//! the output preserves rule order.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{ValidationMessage, ValidationResult};

/// Maximum accepted document size.
const MAX_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Sections that must be present for a skill to be installable.
const REQUIRED_SECTIONS: [&str; 2] = ["Triggers", "Usage"];

/// Sections a good skill should have, reported as warnings when absent.
const RECOMMENDED_SECTIONS: [&str; 3] = ["Examples", "Boundaries", "Behavioral Flow"];

/// Frontmatter block: opening `---`, body, closing `---`. Tolerant of
/// trailing spaces on the delimiter lines and of a closing delimiter at
/// end of input.
static FRONTMATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^---[ \t]*\n(.*?)\n---[ \t]*(\n|$)").unwrap());

/// First-level heading anywhere in the document (`# Title`, not `##`).
static H1_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+[^#]").unwrap());

/// Validate skill markdown against the structural schema.
///
/// Pure and total. `valid` is exactly `errors.is_empty()`; warnings
/// never affect it.
pub fn validate(content: &str) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if content.trim().is_empty() {
        errors.push(ValidationMessage::error("Skill content is empty"));
        return ValidationResult::from_messages(errors, warnings);
    }

    let size_bytes = content.len();
    if size_bytes > MAX_SIZE_BYTES {
        errors.push(ValidationMessage::error(format!(
            "Content exceeds 5MB limit ({:.1}MB)",
            size_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    match FRONTMATTER.captures(content) {
        None => {
            errors.push(
                ValidationMessage::error("Missing YAML frontmatter (---\\n...\\n---)").at_line(1),
            );
        }
        Some(caps) => {
            let frontmatter = &caps[1];
            if !frontmatter.contains("name:") {
                errors.push(
                    ValidationMessage::error("Frontmatter missing required \"name\" field")
                        .at_line(2),
                );
            }
            if !frontmatter.contains("description:") {
                warnings.push(
                    ValidationMessage::warning(
                        "Frontmatter missing recommended \"description\" field",
                    )
                    .at_line(2),
                );
            }
        }
    }

    for section in REQUIRED_SECTIONS {
        if !has_section(content, section) {
            errors.push(ValidationMessage::error(format!(
                "Missing required section: ## {}",
                section
            )));
        }
    }

    if !H1_HEADING.is_match(content) {
        warnings.push(ValidationMessage::warning(
            "Missing top-level heading (# Title)",
        ));
    }

    for section in RECOMMENDED_SECTIONS {
        if !has_section(content, section) {
            warnings.push(ValidationMessage::warning(format!(
                "Missing recommended section: ## {}",
                section
            )));
        }
    }

    ValidationResult::from_messages(errors, warnings)
}

/// True when the document contains a second-level heading whose text
/// starts with `name` at the beginning of a line.
fn has_section(content: &str, name: &str) -> bool {
    let pattern = format!(r"(?m)^##\s+{}", regex::escape(name));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(content),
        Err(_) => false,
    }
}
