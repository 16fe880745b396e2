use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A journal value outside the known vocabulary.
    #[error("Unknown {field}: '{value}'")]
    UnknownValue { field: &'static str, value: String },
}
