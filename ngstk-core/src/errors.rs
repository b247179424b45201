use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SelectorError {
    #[error("Selector must have the form operation:subject:pattern, got: {0}")]
    MalformedSelector(String),

    #[error("Unknown selector operation `{0}`, expected `keep` or `delete`")]
    UnknownOperation(String),

    #[error("Selector subject `{0}` is not supported here")]
    UnsupportedSubject(String),

    #[error("Invalid selector pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
