use reqwest::StatusCode;
use thiserror::Error;

/// Ways a chat exchange can fail.
///
/// None of these reach the end user; the controller logs them and shows a
/// fixed fallback message instead.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The HTTP exchange did not complete (connection refused, reset, DNS...).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint answered outside the 2xx range.
    #[error("HTTP error! status: {0}")]
    Status(StatusCode),

    /// A 2xx answer whose body is not `{"response": "..."}`.
    #[error("could not decode chat response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("invalid endpoint URL {url:?}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, ChatError>;
