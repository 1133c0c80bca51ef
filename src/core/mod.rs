pub mod export;

pub use crate::domain::ports::RecordStorage;
pub use crate::domain::record::ExportRecord;
pub use crate::utils::error::Result;
pub use export::{BackendOutcome, ExportEngine, ExportReport};
