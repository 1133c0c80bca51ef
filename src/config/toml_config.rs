use crate::adapters::OutputFormat;
use crate::domain::{parse_birth_date, DesiredPerformance, RealPerformance, Student, StudentData};
use crate::utils::error::{RecordError, Result};
use crate::utils::validation::{validate_path, validate_unique, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 以 TOML 描述的一位學生資料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentFile {
    pub student: StudentSection,
    pub real_performance: PerformanceSection,
    pub desired_performance: PerformanceSection,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSection {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub group_number: String,
    pub birth_date: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSection {
    pub subjects: Vec<String>,
    pub grades: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub prefix: Option<String>,
    pub directory: Option<String>,
    pub formats: Option<Vec<OutputFormat>>,
    pub csv_bom: Option<bool>,
}

impl StudentFile {
    /// 從 TOML 檔案載入
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| RecordError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${HOME})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| RecordError::config(format!("invalid substitution pattern: {}", e)))?;

        let mut missing = Vec::new();
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.push(var_name.to_string());
                String::new()
            })
        });

        if !missing.is_empty() {
            return Err(RecordError::config(format!(
                "environment variable(s) not set: {}",
                missing.join(", ")
            )));
        }
        Ok(result.into_owned())
    }

    /// Validates every section and builds the aggregate.
    pub fn to_student_data(&self) -> Result<StudentData> {
        let section = &self.student;
        let student = Student::new(
            &section.last_name,
            &section.first_name,
            &section.middle_name,
            &section.group_number,
            parse_birth_date(&section.birth_date)?,
            section.address.as_deref(),
        )?;
        let real = RealPerformance::new(
            &self.real_performance.subjects,
            &self.real_performance.grades,
        )?;
        let desired = DesiredPerformance::new(
            &self.desired_performance.subjects,
            &self.desired_performance.grades,
        )?;

        StudentData::new(student, real, desired)
    }
}

impl Validate for OutputSection {
    fn validate(&self) -> Result<()> {
        if let Some(prefix) = &self.prefix {
            validate_path("output.prefix", prefix)?;
        }
        if let Some(directory) = &self.directory {
            validate_path("output.directory", directory)?;
        }
        if let Some(formats) = &self.formats {
            validate_unique("output.formats", formats)?;
        }
        Ok(())
    }
}

impl Validate for StudentFile {
    fn validate(&self) -> Result<()> {
        match &self.output {
            Some(output) => output.validate(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[student]
last_name = "Shevchenko"
first_name = "Taras"
middle_name = "Hryhorovych"
group_number = "KN-21"
birth_date = "2003-05-14"

[real_performance]
subjects = ["Math", "Physics", "Programming"]
grades = [85, 90, 88]

[desired_performance]
subjects = ["Math", "Physics", "Programming"]
grades = [90, 95, 95]

[output]
prefix = "taras"
formats = ["json", "csv"]
csv_bom = false
"#;

    #[test]
    fn test_parse_student_file() {
        let file = StudentFile::from_toml_str(SAMPLE).unwrap();
        assert_eq!(file.student.last_name, "Shevchenko");
        assert!(file.student.address.is_none());

        let output = file.output.as_ref().unwrap();
        assert_eq!(
            output.formats.as_deref(),
            Some(&[OutputFormat::Json, OutputFormat::Csv][..])
        );
        assert_eq!(output.csv_bom, Some(false));
        assert!(file.validate().is_ok());

        let data = file.to_student_data().unwrap();
        assert_eq!(data.real_performance().average_grade(), 87.67);
        assert_eq!(data.student().address(), "");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STUDENT_RECORDS_TEST_GROUP", "KN-99");
        let content = SAMPLE.replace("KN-21", "${STUDENT_RECORDS_TEST_GROUP}");
        let file = StudentFile::from_toml_str(&content).unwrap();
        assert_eq!(file.student.group_number, "KN-99");

        let missing = SAMPLE.replace("KN-21", "${STUDENT_RECORDS_TEST_UNSET_VAR}");
        let err = StudentFile::from_toml_str(&missing).unwrap_err();
        assert!(matches!(err, RecordError::ConfigError { .. }));
    }

    #[test]
    fn test_invalid_values_surface_as_validation_errors() {
        let bad_date = SAMPLE.replace("2003-05-14", "2003-02-30");
        let file = StudentFile::from_toml_str(&bad_date).unwrap();
        assert!(file.to_student_data().unwrap_err().is_validation());

        let bad_grade = SAMPLE.replace("[85, 90, 88]", "[85, 190, 88]");
        let file = StudentFile::from_toml_str(&bad_grade).unwrap();
        assert!(file.to_student_data().unwrap_err().is_validation());
    }

    #[test]
    fn test_duplicate_formats_rejected() {
        let content = SAMPLE.replace(r#"["json", "csv"]"#, r#"["json", "json"]"#);
        let file = StudentFile::from_toml_str(&content).unwrap();
        assert!(file.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(SAMPLE.as_bytes()).unwrap();

        let file = StudentFile::from_file(temp_file.path()).unwrap();
        assert_eq!(file.desired_performance.grades, vec![90, 95, 95]);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = StudentFile::from_toml_str("[student\nlast_name = ").unwrap_err();
        assert!(matches!(err, RecordError::ConfigError { .. }));
    }
}
