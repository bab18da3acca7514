use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use devmind_model::{ErrorKind, ModelProviderError};

/// Errors surfaced by a chat session.
///
/// Both variants keep the provider's error untouched as their source.
#[derive(Debug)]
pub enum Error {
    /// No credential is configured for the model service. This is only
    /// detected when a request is attempted.
    ConfigurationMissing(Box<dyn ModelProviderError>),
    /// The model service could not be reached, rejected the request or
    /// failed while responding.
    InvocationFailure(Box<dyn ModelProviderError>),
}

impl Error {
    /// Returns the provider error this error wraps.
    #[inline]
    pub fn provider_error(&self) -> &dyn ModelProviderError {
        match self {
            Error::ConfigurationMissing(err) | Error::InvocationFailure(err) => {
                err.as_ref()
            }
        }
    }

    /// Returns the kind reported by the provider.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.provider_error().kind()
    }
}

impl From<Box<dyn ModelProviderError>> for Error {
    fn from(err: Box<dyn ModelProviderError>) -> Self {
        match err.kind() {
            ErrorKind::MissingCredential => Error::ConfigurationMissing(err),
            _ => Error::InvocationFailure(err),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigurationMissing(err) => {
                write!(f, "model credential is not configured: {err}")
            }
            Error::InvocationFailure(err) => {
                write!(f, "model invocation failed: {err}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.provider_error())
    }
}
