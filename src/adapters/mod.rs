// Adapters layer: concrete serialization backends behind `RecordStorage`.

pub mod csv_storage;
pub mod json_storage;
pub mod xml_storage;

pub use csv_storage::CsvStorage;
pub use json_storage::JsonStorage;
pub use xml_storage::XmlStorage;

use crate::domain::ports::RecordStorage;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Xml,
    Csv,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Json, OutputFormat::Xml, OutputFormat::Csv];
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// 依格式建立對應的儲存後端
pub fn storage_for(format: OutputFormat, csv_bom: bool) -> Box<dyn RecordStorage> {
    match format {
        OutputFormat::Json => Box::new(JsonStorage),
        OutputFormat::Xml => Box::new(XmlStorage),
        OutputFormat::Csv => Box::new(CsvStorage::new(csv_bom)),
    }
}

/// Replaces every non-alphanumeric character with `_`.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
