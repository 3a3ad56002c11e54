//! Skill Content Normalizer
//!
//! Repairs raw generator output into canonical skill markdown. Models
//! are unreliable about exact formatting, so every step here is
//! forgiving: this stage never rejects input. Strictness lives in the
//! validator, which runs afterwards.
//!
//! Quirks handled:
//!  - code fence wrappers (```markdown ... ```)
//!  - \r\n / bare \r line endings
//!  - leading blank lines before the opening `---`
//!  - trailing whitespace
//!  - missing frontmatter delimiters around a `key: value` run

use std::sync::LazyLock;

use regex::Regex;

/// Frontmatter keys recognized by the delimiter-synthesis fallback.
static FRONTMATTER_KEY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(name|description|version|author|tags):\s").unwrap()
});

/// Normalize raw generator output into canonical skill markdown.
///
/// Pure and total: always returns a best-effort canonical string, and is
/// idempotent on input that is already canonical. Step order matters;
/// each step is a no-op on already-clean text.
pub fn normalize(raw: &str) -> String {
    let mut content = raw.replace("\r\n", "\n").replace('\r', "\n");

    content = strip_fence_wrapper(&content);
    content = strip_leading_blanks_before_frontmatter(&content);
    content = content.trim_end().to_string();

    if !content.starts_with("---") {
        content = synthesize_frontmatter(&content);
    }

    content
}

/// Remove an enclosing code fence if the whole document is wrapped in
/// one annotated as markdown (``` / ```markdown / ```md). Both fence
/// lines must be present: a document that merely ends in a code fence
/// is left alone, keeping normalization idempotent.
fn strip_fence_wrapper(content: &str) -> String {
    static OPEN_FENCE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^```(?:markdown|md)?\s*\n").unwrap());
    static CLOSE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n```\s*$").unwrap());

    if !OPEN_FENCE.is_match(content) || !CLOSE_FENCE.is_match(content) {
        return content.to_string();
    }

    let without_open = OPEN_FENCE.replace(content, "");
    CLOSE_FENCE.replace(&without_open, "").into_owned()
}

/// Drop whitespace and blank lines that precede the opening `---` so the
/// delimiter is the first significant token.
fn strip_leading_blanks_before_frontmatter(content: &str) -> String {
    static LEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\n*---").unwrap());

    if LEADING.is_match(content) {
        let idx = content.find("---").unwrap_or(0);
        content[idx..].to_string()
    } else {
        content.to_string()
    }
}

/// Fallback repair: when the document still does not open with `---` but
/// starts with a contiguous run of known `key: value` lines, wrap that
/// run in frontmatter delimiters and reattach the rest below.
fn synthesize_frontmatter(content: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();

    let mut yaml_end = 0;
    for line in &lines {
        if FRONTMATTER_KEY_LINE.is_match(line) {
            yaml_end += 1;
        } else {
            break;
        }
    }

    if yaml_end == 0 {
        return content.to_string();
    }

    let yaml_lines = lines[..yaml_end].join("\n");
    let rest = lines[yaml_end..].join("\n");
    format!("---\n{}\n---\n{}", yaml_lines, rest)
}
