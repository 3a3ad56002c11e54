//! Starter Template Catalog
//!
//! Built-in skill templates a user can start from instead of a blank
//! prompt. Template content is prefixed to the generation instruction
//! when selected.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// A starter skill template.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub content: String,
}

impl SkillTemplate {
    fn new(id: &str, name: &str, description: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            content: content.to_string(),
        }
    }
}

/// All built-in templates, in display order.
pub static SKILL_TEMPLATES: LazyLock<Vec<SkillTemplate>> = LazyLock::new(|| {
    vec![
        SkillTemplate::new(
            "blank",
            "Blank Skill",
            "Start from scratch with a minimal skill structure",
            BLANK,
        ),
        SkillTemplate::new(
            "document-processor",
            "Document Processor",
            "A skill that analyzes and transforms documents",
            DOCUMENT_PROCESSOR,
        ),
        SkillTemplate::new(
            "api-integration",
            "API Integration",
            "A skill for interacting with external APIs",
            API_INTEGRATION,
        ),
        SkillTemplate::new(
            "data-analyzer",
            "Data Analyzer",
            "A skill for analyzing data patterns and generating insights",
            DATA_ANALYZER,
        ),
    ]
});

/// Look up a template by its id.
pub fn get_template_by_id(id: &str) -> Option<&'static SkillTemplate> {
    SKILL_TEMPLATES.iter().find(|t| t.id == id)
}

const BLANK: &str = r#"---
name: my-skill
description: "A custom Claude Code skill"
---
# /my-skill - My Custom Skill

## Triggers
- Describe when this skill should be activated

## Usage
```
/my-skill [arguments]
```

## Behavioral Flow
1. Step one of the skill execution
2. Step two of the skill execution
3. Step three of the skill execution

## Examples
```
/my-skill example-usage
```

## Boundaries
- What this skill should NOT do
"#;

const DOCUMENT_PROCESSOR: &str = r#"---
name: doc-processor
description: "Analyze and transform documents with structured output"
---
# /doc-processor - Document Processor

## Triggers
- Document analysis requests
- File transformation needs
- Content extraction tasks

## Usage
```
/doc-processor @file.md --format summary
/doc-processor @file.pdf --extract key-points
```

## Behavioral Flow
1. Read and parse the input document
2. Identify document structure (headings, sections, lists)
3. Apply the requested transformation
4. Output structured result with clear formatting
5. Provide metadata (word count, sections found, key entities)

## Examples
```
/doc-processor @report.md --format executive-summary
# Output: Concise summary with key findings and recommendations

/doc-processor @spec.pdf --extract requirements
# Output: Numbered list of extracted requirements
```

## Boundaries
- Do not modify the original document
- Do not hallucinate content not present in the source
- Preserve attribution and citations
"#;

const API_INTEGRATION: &str = r#"---
name: api-helper
description: "Generate and test API integration code"
---
# /api-helper - API Integration Helper

## Triggers
- API integration requests
- REST/GraphQL endpoint creation
- API client code generation

## Usage
```
/api-helper generate --api stripe --action create-payment
/api-helper test --endpoint /api/users --method POST
```

## Behavioral Flow
1. Identify the target API and desired operation
2. Check for existing API client patterns in the codebase
3. Generate type-safe integration code following project conventions
4. Include error handling and retry logic
5. Add request/response type definitions
6. Generate corresponding tests

## Examples
```
/api-helper generate --api github --action list-repos
# Output: Type-safe GitHub API client with authentication
```

## Boundaries
- Never hardcode API keys or secrets
- Always use environment variables for configuration
- Follow existing project HTTP client patterns
"#;

const DATA_ANALYZER: &str = r#"---
name: data-analyze
description: "Analyze data structures and generate insights"
---
# /data-analyze - Data Analyzer

## Triggers
- Data analysis requests
- Pattern recognition needs
- Database query optimization

## Usage
```
/data-analyze @data.json --find patterns
/data-analyze @schema.sql --optimize queries
```

## Behavioral Flow
1. Ingest the data source (JSON, CSV, SQL schema)
2. Profile the data structure and identify types
3. Detect patterns, anomalies, and relationships
4. Generate statistical summary or optimization suggestions
5. Present findings in structured markdown with visualizable metrics

## Examples
```
/data-analyze @users.json --find patterns
# Output: User behavior patterns, common attributes, outliers
```

## Boundaries
- Do not execute destructive database operations
- Report confidence levels for pattern detection
- Flag potential data quality issues
"#;
