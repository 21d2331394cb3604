use std::fmt;

/// The category of a packing, unpacking or accessor failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The format string contains an unknown directive or a malformed repeat count.
    InvalidFormat,
    /// An argument could not be coerced to the type its directive asked for.
    TypeConversion,
    /// A primitive accessor was given a buffer too short for the requested index.
    OutOfRange,
    /// A decoded value sequence ended before every field of a record was filled.
    Missing,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::InvalidFormat => "invalid format",
            Self::TypeConversion => "type conversion",
            Self::OutOfRange => "out of range",
            Self::Missing => "missing value",
        };
        f.write_str(name)
    }
}

/// Packing and unpacking errors.
pub struct Error {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new `Error` of the given kind with the given message.
    pub fn new<S>(kind: ErrorKind, message: S) -> Self
    where
        S: ToString,
    {
        Self {
            kind,
            message: message.to_string(),
            source: None,
        }
    }

    /// Creates a new `Error` with the given error value as the source.
    pub fn wrap<E>(kind: ErrorKind, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind,
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Creates a new `Error` with a custom message, keeping the kind of the source error.
    pub fn with_context<S>(message: S, error: Error) -> Self
    where
        S: ToString,
    {
        Self {
            kind: error.kind,
            message: message.to_string(),
            source: Some(Box::new(error)),
        }
    }

    pub(crate) fn invalid_format(ch: char, position: usize) -> Self {
        Self::new(
            ErrorKind::InvalidFormat,
            format!("invalid format specified `{}' at position {}", ch, position),
        )
    }

    pub(crate) fn out_of_range(index: usize, width: usize, len: usize) -> Self {
        Self::new(
            ErrorKind::OutOfRange,
            format!(
                "cannot access {} bytes at index {} of a {}-byte buffer",
                width, index, len
            ),
        )
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // defer to Display
        write!(f, "{}", self)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn std::error::Error + 'static))
    }
}

macro_rules! convert_error {
    ($($t:ty,)*) => {$(
        impl From<$t> for Error {
            fn from(error: $t) -> Self {
                Self::wrap(ErrorKind::TypeConversion, error)
            }
        }
    )*}
}

convert_error! {
    std::num::ParseIntError,
    std::num::ParseFloatError,
    std::num::TryFromIntError,
}
