//! sample-forge: deterministic sample corpus generator for grammar testing.
//!
//! This library expands hand-authored template expressions, written in a
//! compact instruction mini-language, into large reproducible corpora of
//! concrete sample strings. Each generated sample carries structured metadata
//! describing the lexical constructs it is expected to contain, so a
//! downstream validator can compare an independent parse of the sample
//! against the generator's own bookkeeping - including deliberately
//! malformed variants for negative testing.
//!
//! # Example
//!
//! ```ignore
//! use sample_forge::plan::generate_samples;
//! use sample_forge::sample::{SampleExpression, SampleExpressionGroup};
//!
//! let template = SampleExpression::new("simple-eq", "a = b", "${ARG_NAME}~=~${ARG_VALUE}")?;
//! let group = SampleExpressionGroup::new("basic", vec![template])?;
//! let results = generate_samples(&[group])?;
//! ```

// Core modules
pub mod error;
pub mod export;
pub mod instruction;
pub mod plan;
pub mod sample;
pub mod seeding;

// Re-export commonly used error types
pub use error::{ExportError, PlanError, SampleError, TemplateError};
pub use plan::generate_samples;
