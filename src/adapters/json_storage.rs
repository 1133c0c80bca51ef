use crate::domain::ports::RecordStorage;
use crate::domain::record::ExportRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Nested JSON document, 4-space indent, non-ASCII written literally.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStorage;

impl RecordStorage for JsonStorage {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, record: &ExportRecord) -> std::io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        record.serialize(&mut serializer)?;
        Ok(buffer)
    }
}
