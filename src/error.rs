//! Error types for sample-forge operations.
//!
//! Defines error types for all major subsystems:
//! - Sample and group construction
//! - Template mini-language parsing
//! - Plan assembly and consistency checking
//! - JSON persistence of sample groups and catalogs
//!
//! Reuse instructions that find no matching candidate are deliberately *not*
//! represented here: they degrade to a flagged invalid sample instead of an
//! error, so a single bad template cannot abort a whole generation run.

use thiserror::Error;

/// Errors that can occur while constructing sample entities.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Sample id and label must not be empty or whitespace-only, given: id='{id}', label='{label}'")]
    InvalidSample { id: String, label: String },

    #[error("Group identifier must not be empty or whitespace-only, given: group='{0}'")]
    InvalidGroup(String),

    #[error("A sample group must contain at least one element, given: group='{0}'")]
    EmptyGroup(String),
}

/// Errors that can occur while parsing a template expression into instructions.
///
/// Each variant carries the offending template text so the author can locate
/// the broken template without line numbers.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Instruction not closed ${{... in '{template}'")]
    UnterminatedInstruction { template: String },

    #[error("Unsupported instruction ${{{name}}} in '{template}'")]
    UnknownInstruction { name: String, template: String },

    #[error("Unsupported text constant instruction in ${{{name}:{argument}}} in '{template}'")]
    UnexpectedArgument {
        name: String,
        argument: String,
        template: String,
    },

    #[error("Instruction ${{{name}}} requires an id-or-group filter argument in '{template}'")]
    MissingArgument { name: String, template: String },

    #[error("Invalid constant '{argument}' for instruction ${{{name}}} in '{template}'")]
    InvalidArgument {
        name: String,
        argument: String,
        template: String,
    },
}

/// Errors that can occur while assembling an instruction plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Found duplicate group name in instruction plan: {0}")]
    DuplicateGroup(String),

    #[error("Found duplicate template id in template group '{group}': {id}")]
    DuplicateTemplateId { group: String, id: String },

    #[error("Template parse error: {0}")]
    Template(#[from] TemplateError),

    #[error("Sample construction error: {0}")]
    Sample(#[from] SampleError),
}

/// Errors that can occur while reading or writing persisted sample files.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
