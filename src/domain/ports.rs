use crate::domain::record::ExportRecord;
use crate::utils::error::{RecordError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 一種輸出格式的序列化後端
pub trait RecordStorage {
    /// Human-readable format name, e.g. `JSON`.
    fn format_name(&self) -> &'static str;

    fn extension(&self) -> &'static str;

    /// Encodes the record into the bytes of one output file.
    fn render(&self, record: &ExportRecord) -> std::io::Result<Vec<u8>>;

    /// Writes `<filename_stem>.<extension>` and returns its path.
    fn save(&self, record: &ExportRecord, filename_stem: &str) -> Result<PathBuf> {
        if record.is_empty() {
            return Err(RecordError::validation("record", "Export record is empty"));
        }
        if filename_stem.trim().is_empty() {
            return Err(RecordError::validation(
                "filename_stem",
                "File name cannot be empty",
            ));
        }

        let path = PathBuf::from(format!("{}.{}", filename_stem, self.extension()));
        let storage_error = |e: std::io::Error| RecordError::StorageError {
            format: self.format_name().to_string(),
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let data = self.render(record).map_err(storage_error)?;
        tracing::debug!(
            "Writing {} output ({} bytes) to {}",
            self.format_name(),
            data.len(),
            path.display()
        );
        write_file(&path, &data).map_err(storage_error)?;

        Ok(path)
    }
}

fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(data)?;
    writer.flush()
}
