use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudError {
    #[error("File '{path}' not found")]
    InputNotFound { path: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },

    #[error("Row {row}: value '{value}' in column '{column}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Nothing to draw: {message}")]
    EmptyFrequencies { message: String },

    #[error("No usable font: {message}")]
    FontUnavailable { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    Rendering,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CloudError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InputNotFound { .. } => ErrorCategory::Input,
            Self::CsvError(_) | Self::MissingColumn { .. } | Self::InvalidNumber { .. } => {
                ErrorCategory::Data
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::EmptyFrequencies { .. }
            | Self::FontUnavailable { .. }
            | Self::RenderError { .. }
            | Self::ImageError(_) => ErrorCategory::Rendering,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Rendering => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息，與原始腳本的輸出格式一致
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InputNotFound { path } => {
                format!("File '{}' not found. Please check the path.", path)
            }
            other => format!("Error: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InputNotFound { .. } => "Pass the library export with --input <path>",
            Self::CsvError(_) => "Make sure the input is a well-formed delimited text file",
            Self::MissingColumn { .. } => {
                "Use --title-column / --pages-column to match the export's headers"
            }
            Self::InvalidNumber { .. } => "Clean up the page-count column so it only holds numbers",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the command-line flags and config file",
            Self::EmptyFrequencies { .. } => "Check that the export has rows with a page count",
            Self::FontUnavailable { .. } => "Install a TrueType font or pass one with --font",
            Self::RenderError { .. } | Self::ImageError(_) => {
                "Try a smaller canvas or a different font"
            }
            Self::IoError(_) => "Check that the output directory is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_path() {
        let err = CloudError::InputNotFound {
            path: "missing/library.csv".to_string(),
        };
        assert_eq!(
            err.user_friendly_message(),
            "File 'missing/library.csv' not found. Please check the path."
        );
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_generic_message_is_prefixed() {
        let err = CloudError::MissingColumn {
            column: "Title".to_string(),
            available: "Book Id, Author".to_string(),
        };
        assert!(err.user_friendly_message().starts_with("Error: Column 'Title'"));
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_render_errors_are_medium_severity() {
        assert_eq!(CloudError::render("boom").severity(), ErrorSeverity::Medium);
        let io = CloudError::from(std::io::Error::other("disk"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
    }
}
