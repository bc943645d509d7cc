use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloneError {
    #[error("cannot clone value of type {type_tag}")]
    Unsupported { type_tag: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegExpError {
    #[error("invalid regular expression flag `{0}`")]
    UnknownFlag(char),
    #[error("duplicate regular expression flag `{0}`")]
    DuplicateFlag(char),
    #[error("invalid regular expression /{pattern}/: {message}")]
    Pattern { pattern: String, message: String },
}
