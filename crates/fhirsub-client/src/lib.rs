pub mod bundle;
pub mod error;
pub mod graph;
pub mod submit;
pub mod transport;

pub use bundle::{BundleOptions, assemble, assemble_all};
pub use error::{ClientError, Result};
pub use graph::ResultGraph;
pub use submit::{DEFAULT_CONCURRENCY, Submitter};
pub use transport::{Endpoint, HttpTransport, SendResponse, Transport};
