use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhonebookError {
    #[error("could not read from {path}")]
    ReadInput { path: String },

    #[error("no data available from {path}")]
    EmptyInput { path: String },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("{context}: {message}")]
    Source { context: String, message: String },

    #[error("unparsable phone number {number:?}: {reason}")]
    PhoneParse { number: String, reason: String },

    #[error("invalid vCard: {message}")]
    VcardParse { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PhonebookError {
    pub fn source_error(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn vcard(message: impl Into<String>) -> Self {
        Self::VcardParse {
            message: message.into(),
        }
    }

    /// Process exit code for errors that abort a run.
    ///
    /// Malformed vCard structure exits 2, everything else (input, transport,
    /// CSV, configuration) exits 1. Per-record phone parse failures are
    /// handled as warnings by the command runners and never reach this.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::VcardParse { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, PhonebookError>;
