pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CsvStorage, JsonStorage, OutputFormat, XmlStorage};
pub use config::{toml_config::StudentFile, OutputSettings};
pub use core::export::{ExportEngine, ExportReport};
pub use domain::{
    DesiredPerformance, ExportRecord, ExportValue, LetterGrade, RealPerformance, RecordStorage,
    Student, StudentData,
};
pub use utils::error::{RecordError, Result};
