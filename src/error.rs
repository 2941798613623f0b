//! Error taxonomy for the question-generation pipeline.

use snafu::Snafu;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Unknown provider name, missing API key, or invalid request
    /// parameters. Detected before any network traffic; the user must
    /// fix their configuration.
    #[snafu(display("invalid configuration: {message}"))]
    Configuration { message: String },

    /// The backend call failed: transport trouble, a non-success
    /// status, or an error object reported by the vendor itself.
    /// Retrying the whole operation is up to the caller.
    #[snafu(display("{provider} request failed: {message}"))]
    Generation { provider: String, message: String },

    /// The backend answered, but its output could not be turned into
    /// questions. Terminal for the attempt; no re-prompting.
    #[snafu(display("malformed model response: {message}"))]
    MalformedResponse { message: String },

    /// The source document could not be read or decoded.
    #[snafu(display("could not read source document: {message}"))]
    SourceDocument { message: String },
}

impl Error {
    pub(crate) fn generation(provider: &str, message: impl std::fmt::Display) -> Self {
        Error::Generation {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn source_document(message: impl std::fmt::Display) -> Self {
        Error::SourceDocument {
            message: message.to_string(),
        }
    }
}

/// Bail out of the enclosing function with [`Error::Configuration`].
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::Configuration {
            message: format!($($arg)*),
        })
    };
}

/// Bail out with [`Error::Generation`] for the named provider.
#[macro_export]
macro_rules! generation_error {
    ($provider:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::Generation {
            provider: $provider.to_string(),
            message: format!($($arg)*),
        })
    };
}

/// Bail out with [`Error::MalformedResponse`]. The two-argument form
/// appends the underlying cause to the message.
#[macro_export]
macro_rules! malformed_response {
    ($source:expr, $message:literal) => {
        return Err($crate::error::Error::MalformedResponse {
            message: format!("{}: {}", $message, $source),
        })
    };
    ($($arg:tt)*) => {
        return Err($crate::error::Error::MalformedResponse {
            message: format!($($arg)*),
        })
    };
}
