use std::borrow::Cow;

/// All possible error kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A request could not reach the controller or its response could not
    /// be read.
    Transport,
    /// The controller answered with a non-successful HTTP status.
    Status,
    /// The response body is not valid JSON.
    JsonResponse,
    /// A request payload could not be encoded.
    Serialization,
    /// The definition types published by the controller could not be
    /// retrieved.
    Discovery,
    /// A response lacks a field required by an operation.
    MalformedResponse,
    /// A request URL could not be built from the controller address.
    InvalidInput,
}

impl ErrorKind {
    pub(crate) const fn description(self) -> &'static str {
        match self {
            Self::Transport => "Transport",
            Self::Status => "HTTP Status",
            Self::JsonResponse => "Json Response",
            Self::Serialization => "Serialization",
            Self::Discovery => "Discovery",
            Self::MalformedResponse => "Malformed Response",
            Self::InvalidInput => "Invalid Input",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.description().fmt(f)
    }
}

/// A library error.
#[derive(PartialEq)]
pub struct Error {
    kind: ErrorKind,
    info: Cow<'static, str>,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error().fmt(f)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error().fmt(f)
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Creates an [`Error`] from an [`ErrorKind`] and a description.
    #[must_use]
    pub fn new(kind: ErrorKind, info: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            info: info.into(),
        }
    }

    /// Returns the [`ErrorKind`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error description.
    #[must_use]
    pub fn info(&self) -> &str {
        &self.info
    }

    fn error(&self) -> String {
        format!("{}: {}", self.kind, self.info)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            Self::new(ErrorKind::Status, format!("{status}: {e}"))
        } else {
            Self::new(ErrorKind::Transport, e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::new(ErrorKind::Serialization, e.to_string())
    }
}

/// A specialized [`Result`] type for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
