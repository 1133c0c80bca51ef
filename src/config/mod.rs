pub mod toml_config;

use crate::adapters::OutputFormat;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_unique, Validate};
use std::path::PathBuf;
use toml_config::OutputSection;

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_PREFIX: &str = "student_data";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "student-records")]
#[command(about = "Collect a student's grades and export them as JSON, XML and CSV")]
pub struct CliConfig {
    /// TOML file with the student data; prompts interactively when omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory the output files are written to
    #[arg(long)]
    pub output_dir: Option<String>,

    /// File name stem shared by all output files
    #[arg(long)]
    pub prefix: Option<String>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub formats: Vec<OutputFormat>,

    #[arg(long, help = "Write CSV without a UTF-8 byte-order mark")]
    pub no_bom: bool,

    #[arg(long, help = "Skip the summary printout")]
    pub no_display: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

/// 最終生效的輸出設定
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub directory: String,
    pub prefix: String,
    pub formats: Vec<OutputFormat>,
    pub csv_bom: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            formats: OutputFormat::ALL.to_vec(),
            csv_bom: true,
        }
    }
}

impl OutputSettings {
    /// Applies the file's `[output]` section over the defaults.
    pub fn from_section(section: Option<&OutputSection>) -> Self {
        let mut settings = Self::default();
        if let Some(section) = section {
            if let Some(prefix) = &section.prefix {
                settings.prefix = prefix.trim().to_string();
            }
            if let Some(directory) = &section.directory {
                settings.directory = directory.clone();
            }
            if let Some(formats) = &section.formats {
                settings.formats = formats.clone();
            }
            if let Some(csv_bom) = section.csv_bom {
                settings.csv_bom = csv_bom;
            }
        }
        settings
    }

    /// Command-line flags take precedence over the file.
    #[cfg(feature = "cli")]
    pub fn apply_cli(mut self, cli: &CliConfig) -> Self {
        if let Some(prefix) = &cli.prefix {
            self.prefix = prefix.trim().to_string();
        }
        if let Some(directory) = &cli.output_dir {
            self.directory = directory.clone();
        }
        if !cli.formats.is_empty() {
            self.formats = cli.formats.clone();
        }
        if cli.no_bom {
            self.csv_bom = false;
        }
        self
    }

    /// `<directory>/<prefix>`, without extension.
    pub fn filename_stem(&self) -> PathBuf {
        PathBuf::from(&self.directory).join(&self.prefix)
    }
}

impl Validate for OutputSettings {
    fn validate(&self) -> Result<()> {
        validate_path("output directory", &self.directory)?;
        validate_path("prefix", &self.prefix)?;
        validate_unique("formats", &self.formats)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = OutputSettings::from_section(None);
        assert_eq!(settings.prefix, DEFAULT_PREFIX);
        assert_eq!(settings.formats, OutputFormat::ALL.to_vec());
        assert!(settings.csv_bom);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.filename_stem(), PathBuf::from("./student_data"));
    }

    #[test]
    fn test_section_overrides() {
        let section = OutputSection {
            prefix: Some(" taras ".to_string()),
            directory: Some("out".to_string()),
            formats: Some(vec![OutputFormat::Xml]),
            csv_bom: Some(false),
        };
        let settings = OutputSettings::from_section(Some(&section));
        assert_eq!(settings.prefix, "taras");
        assert_eq!(settings.formats, vec![OutputFormat::Xml]);
        assert!(!settings.csv_bom);
        assert_eq!(settings.filename_stem(), PathBuf::from("out").join("taras"));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_flags_win() {
        let cli = CliConfig::parse_from([
            "student-records",
            "--prefix",
            "cli_prefix",
            "--formats",
            "csv,json",
            "--no-bom",
        ]);
        let section = OutputSection {
            prefix: Some("file_prefix".to_string()),
            ..OutputSection::default()
        };
        let settings = OutputSettings::from_section(Some(&section)).apply_cli(&cli);
        assert_eq!(settings.prefix, "cli_prefix");
        assert_eq!(settings.formats, vec![OutputFormat::Csv, OutputFormat::Json]);
        assert!(!settings.csv_bom);
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let settings = OutputSettings {
            prefix: "  ".to_string(),
            ..OutputSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
