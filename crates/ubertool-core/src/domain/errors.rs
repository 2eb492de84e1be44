use serde::Serialize;

pub type ModelResult<T> = Result<T, ModelError>;

/// What stopped a request. Each category owns one process exit code; exit code 1
/// is left to runs that finished with row errors or a failed comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelErrorCategory {
    /// The request itself is unusable: bad table JSON, schema mismatch, bad policy.
    InputValidationError,
    /// A file could not be read or written.
    IoSystemError,
    /// The model's static descriptors disagree with each other.
    InternalError,
}

impl ModelErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::InternalError => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InputValidationError => "input",
            Self::IoSystemError => "io",
            Self::InternalError => "internal",
        }
    }
}

/// Request-level failure. Anything that stops a whole evaluation ends up here;
/// per-row problems are reported as [`RowError`] instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} error [{}] {}", .category.label(), .placeholder, .message)]
pub struct ModelError {
    category: ModelErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl ModelError {
    fn new(category: ModelErrorCategory, placeholder: &'static str, message: String) -> Self {
        Self {
            category,
            placeholder,
            message,
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            ModelErrorCategory::InputValidationError,
            placeholder,
            message.into(),
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ModelErrorCategory::IoSystemError, placeholder, message.into())
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ModelErrorCategory::InternalError, placeholder, message.into())
    }

    pub const fn category(&self) -> ModelErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    /// `ERROR: [PLACEHOLDER] message`, the first stderr line of a failed command.
    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowErrorKind {
    #[error("division by zero")]
    DivisionByZero,
    /// A finite input produced an infinite or NaN result.
    #[error("result is not a finite number")]
    NonFiniteResult,
    #[error("value '{value}' is not a finite number")]
    InvalidValue { value: String },
    #[error("{value} is a non-physical negative value")]
    NegativeValue { value: f64 },
}

/// A failure confined to one scenario row. The rest of the batch is still evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[error("row {row} (index '{index_label}'), field '{field}': {kind}")]
pub struct RowError {
    pub row: usize,
    pub index_label: String,
    pub field: &'static str,
    #[serde(flatten)]
    pub kind: RowErrorKind,
}

impl RowError {
    pub fn new(
        row: usize,
        index_label: impl Into<String>,
        field: &'static str,
        kind: RowErrorKind,
    ) -> Self {
        Self {
            row,
            index_label: index_label.into(),
            field,
            kind,
        }
    }
}
