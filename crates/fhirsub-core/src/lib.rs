pub mod correlate;
pub mod error;
pub mod model;
pub mod reference;
pub mod report;

pub use correlate::correlation_key;
pub use error::{CoreError, Result};
pub use model::{FIELD_SEPARATOR, Identifier, Observation, Specimen, Subject};
pub use reference::{RefTable, Reference, URN_PREFIX};
pub use report::{ReportOutcome, ReportStatus};
