pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid index line {line}: {msg}")]
    Format { line: usize, msg: String },

    #[error("sequence not found in index: {0}")]
    NotFound(String),

    #[error("invalid range: start ({start}) must be less than end ({end})")]
    InvalidRange { start: u64, end: u64 },

    #[error("end is past end of sequence {name}: {end} > {length}")]
    OutOfBounds { name: String, end: u64, length: u64 },

    #[error(
        "unexpected end of file at offset {offset}: wanted {wanted} bytes, got {got} \
         (bad index? file doesn't end in newline?)"
    )]
    UnexpectedEof { offset: u64, wanted: usize, got: usize },

    #[error("no sequence data source attached")]
    NoSource,

    #[error("invalid sequence data: {0}")]
    InvalidData(String),

    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn format(line: usize, msg: impl Into<String>) -> Self {
        Error::Format {
            line,
            msg: msg.into(),
        }
    }

    /// True for errors caused by the caller's request rather than the data.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::InvalidRange { .. }
                | Error::OutOfBounds { .. }
                | Error::InvalidRegion(_)
        )
    }
}
