/// Main error type for the library.
#[derive(Debug)]
pub enum Error {
    /// Used when the user pass a logical invalid parameter to a function.
    InvalidParameter(String),
    /// The point set can't support the requested interpolation.
    InsufficientPoints(String),
    Io(std::io::Error),
    Parser(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Parser(err) => write!(f, "Parser error: {}", err),
            Error::InvalidParameter(err) => write!(f, "Parameter error: {}", err),
            Error::InsufficientPoints(err) => write!(f, "Insufficient points: {}", err),
        }
    }
}

impl Error {
    /// Create a error with the kind `InvalidParameter`.
    /// # Arguments
    /// * `msg` - The error message.
    pub fn invalid_parameter<T: ToString>(msg: T) -> Self {
        Error::InvalidParameter(msg.to_string())
    }

    /// Create a error with the kind `InsufficientPoints`.
    pub fn insufficient_points<T: ToString>(msg: T) -> Self {
        Error::InsufficientPoints(msg.to_string())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Parser(_) => None,
            Error::InvalidParameter(_) => None,
            Error::InsufficientPoints(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parser(err.to_string())
    }
}
