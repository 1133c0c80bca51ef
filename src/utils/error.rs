use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Validation error in '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Failed to write {format} output '{path}': {message}")]
    StorageError {
        format: String,
        path: String,
        message: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Storage,
    Configuration,
    Io,
}

impl RecordError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RecordError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        RecordError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            RecordError::ValidationError { .. } => ErrorCategory::Validation,
            RecordError::StorageError { .. } => ErrorCategory::Storage,
            RecordError::ConfigError { .. } => ErrorCategory::Configuration,
            RecordError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            RecordError::ValidationError { field, message } => {
                format!("Invalid value for {}: {}", field, message)
            }
            RecordError::StorageError { format, path, .. } => {
                format!("Could not save {} file '{}'", format, path)
            }
            RecordError::ConfigError { message } => format!("Bad configuration: {}", message),
            RecordError::IoError(e) => format!("Input/output failure: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Check the entered data and try again",
            ErrorCategory::Storage => "Check that the output directory exists and is writable",
            ErrorCategory::Configuration => "Check the input file and command-line flags",
            ErrorCategory::Io => "Check the console or input file and retry",
        }
    }

    /// 依錯誤類別決定程序結束碼
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Validation => 1,
            ErrorCategory::Storage => 2,
            ErrorCategory::Configuration => 3,
            ErrorCategory::Io => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = RecordError::validation("last_name", "Value cannot be empty or whitespace-only");
        assert!(err.is_validation());
        assert!(err.to_string().contains("last_name"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_storage_error_category() {
        let err = RecordError::StorageError {
            format: "XML".to_string(),
            path: "out.xml".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert!(err.to_string().contains("permission denied"));
        assert!(!err.is_validation());
    }
}
