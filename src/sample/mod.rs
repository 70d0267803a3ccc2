//! Sample entities: expressions, metadata, groups and the corpus catalog.

pub mod catalog;
pub mod expression;
pub mod gen_info;
pub mod group;

pub use catalog::{SampleGroupCatalog, SampleGroupCatalogEntry};
pub use expression::SampleExpression;
pub use gen_info::{GenerationInfo, Operator};
pub use group::SampleExpressionGroup;
