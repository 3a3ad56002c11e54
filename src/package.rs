//! Skill Package Assembler
//!
//! Composes the downloadable zip: `SKILL.md`, a merged `metadata.json`,
//! and a generated `README.md`. Pure given its inputs; it does not
//! re-validate the document, that is the caller's concern.

use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::json;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::skill::metadata::extract_metadata;
use crate::types::{Metadata, SkillPackageData};

/// Metadata as written into the package, with user-edited fields taking
/// precedence over what the frontmatter says and empty fields falling
/// back to extraction.
fn merged_metadata(data: &SkillPackageData) -> Metadata {
    let extracted = extract_metadata(&data.skill_content);

    Metadata {
        name: if data.metadata.name.is_empty() {
            extracted.name
        } else {
            data.metadata.name.clone()
        },
        description: if data.metadata.description.is_empty() {
            extracted.description
        } else {
            data.metadata.description.clone()
        },
        version: if data.metadata.version.is_empty() {
            "1.0.0".to_string()
        } else {
            data.metadata.version.clone()
        },
    }
}

/// Build the zip bundle for a stored skill.
pub fn create_skill_zip(data: &SkillPackageData) -> Result<Vec<u8>> {
    let metadata = merged_metadata(data);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    zip.start_file("SKILL.md", options)
        .context("Failed to start SKILL.md entry")?;
    zip.write_all(data.skill_content.as_bytes())
        .context("Failed to write SKILL.md")?;

    let full_metadata = json!({
        "name": metadata.name,
        "description": metadata.description,
        "version": metadata.version,
        "createdAt": Utc::now().to_rfc3339(),
        "format": "claude-code-skill",
        "compatibility": "claude-code@1.0+",
    });
    zip.start_file("metadata.json", options)
        .context("Failed to start metadata.json entry")?;
    zip.write_all(serde_json::to_string_pretty(&full_metadata)?.as_bytes())
        .context("Failed to write metadata.json")?;

    zip.start_file("README.md", options)
        .context("Failed to start README.md entry")?;
    zip.write_all(create_readme(&metadata).as_bytes())
        .context("Failed to write README.md")?;

    let cursor = zip.finish().context("Failed to finalize zip")?;
    Ok(cursor.into_inner())
}

/// Suggested download filename for a stored skill.
pub fn suggested_filename(data: &SkillPackageData) -> String {
    let name = if data.metadata.name.is_empty() {
        "skill"
    } else {
        &data.metadata.name
    };
    format!("{}.zip", name)
}

fn create_readme(metadata: &Metadata) -> String {
    format!(
        r#"# {name}

{description}

## Installation

Copy `SKILL.md` to your Claude Code commands directory:

```bash
mkdir -p ~/.claude/commands
cp SKILL.md ~/.claude/commands/{name}.md
```

## Usage

Once installed, invoke the skill in Claude Code:

```
/{name}
```

## Version

{version}

---

Created by Stackable
"#,
        name = metadata.name,
        description = metadata.description,
        version = metadata.version,
    )
}
