use crate::adapters::sanitize_key;
use crate::domain::ports::RecordStorage;
use crate::domain::record::{ExportMap, ExportRecord, ExportValue};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const LIST_SEPARATOR: &str = "; ";

/// One header row of dotted keys and one data row.
#[derive(Debug, Clone, Copy)]
pub struct CsvStorage {
    with_bom: bool,
}

impl CsvStorage {
    pub fn new(with_bom: bool) -> Self {
        Self { with_bom }
    }
}

impl Default for CsvStorage {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RecordStorage for CsvStorage {
    fn format_name(&self) -> &'static str {
        "CSV"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, record: &ExportRecord) -> std::io::Result<Vec<u8>> {
        let columns = flatten_record(record)?;

        let mut buffer = Vec::new();
        if self.with_bom {
            buffer.extend_from_slice(UTF8_BOM);
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(buffer);
        writer.write_record(columns.iter().map(|(key, _)| key.as_str()))?;
        writer.write_record(columns.iter().map(|(_, value)| value.as_str()))?;
        writer.into_inner().map_err(|e| e.into_error())
    }
}

/// 將巢狀紀錄攤平成 `parent.child` 欄位
pub fn flatten_record(record: &ExportRecord) -> std::io::Result<Vec<(String, String)>> {
    let mut columns = Vec::new();
    flatten_into(record, None, &mut columns)?;
    Ok(columns)
}

fn flatten_into(
    map: &ExportMap,
    parent: Option<&str>,
    columns: &mut Vec<(String, String)>,
) -> std::io::Result<()> {
    for (key, value) in map.iter() {
        let key = sanitize_key(key);
        let path = match parent {
            Some(parent) => format!("{}.{}", parent, key),
            None => key,
        };

        match value {
            ExportValue::Mapping(inner) if !inner.is_empty() => {
                flatten_into(inner, Some(&path), columns)?
            }
            ExportValue::Mapping(_) => push_column(columns, path, String::new()),
            ExportValue::Sequence(items) => {
                let joined = join_items(items)?;
                push_column(columns, path, joined);
            }
            scalar => push_column(columns, path, scalar.scalar_text().unwrap_or_default()),
        }
    }
    Ok(())
}

fn push_column(columns: &mut Vec<(String, String)>, path: String, value: String) {
    match columns.iter_mut().find(|(existing, _)| *existing == path) {
        Some(column) => {
            tracing::warn!(
                "CSV column '{}' is produced by more than one key, keeping the last value",
                path
            );
            column.1 = value;
        }
        None => columns.push((path, value)),
    }
}

fn join_items(items: &[ExportValue]) -> std::io::Result<String> {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        match item.scalar_text() {
            Some(text) => parts.push(text),
            None => parts.push(serde_json::to_string(item)?),
        }
    }
    Ok(parts.join(LIST_SEPARATOR))
}
