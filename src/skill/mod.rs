//! Skill Document Pipeline
//!
//! Pure text-in/text-out stages for skill markdown: repair of raw
//! generator output, structural validation, and frontmatter metadata
//! extraction. The stages never operate on a parsed object model so the
//! tolerance rules can evolve independently of any schema.

pub mod metadata;
pub mod normalize;
pub mod templates;
pub mod validate;
