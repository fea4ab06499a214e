use thiserror::Error;

/// Errors that can occur while issuing a GDS query or reshaping its response.
#[derive(Debug, Error)]
pub enum CiqError {
    /// A service-wide failure reported by the API itself, such as
    /// `Daily Request Limit of 10000 Exceeded`. The call aborts before any
    /// partial result is built.
    #[error("Cap IQ service error: {0}")]
    Service(String),

    /// The caller violated the request contract (mismatched list lengths,
    /// missing date arguments for a date-ranged kind). Raised before any
    /// network traffic.
    #[error("caller contract violation: {0}")]
    ContractViolation(String),

    /// A response record could not be matched to any return-key candidate.
    /// Raised instead of silently dropping or misassigning the record.
    #[error("no return key matches the returned properties for mnemonic '{mnemonic}'")]
    UnresolvedMnemonic {
        /// The mnemonic whose candidates all failed the property match.
        mnemonic: String,
    },

    /// The configured endpoint is not a valid absolute URL.
    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    /// Transport-level failure inside the retry middleware stack.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// Failure raised by reqwest itself (client build, body read).
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("HTTP request failed with status {status}: {body}")]
    HttpStatus {
        /// The numeric HTTP status code.
        status: u16,
        /// The raw error body returned by the server.
        body: String,
    },

    /// The response body was not valid JSON for the expected envelope.
    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response parsed as JSON but breaks the envelope's shape, e.g. a
    /// data record without an identifier, or fewer rows than headers.
    #[error("malformed service response: {0}")]
    MalformedResponse(String),

    /// The daily request counter could not be read or persisted.
    #[error("request counter I/O error: {0}")]
    Counter(#[from] std::io::Error),
}
