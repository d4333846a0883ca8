pub mod header;
pub mod plan;
pub mod tag;
pub mod types;

pub use header::HeaderIndex;
pub use plan::{FieldPlan, PlanEntry};
pub use tag::Annotation;
pub use types::{CsvRecord, FieldDescriptor, SemanticType};
