use thiserror::Error;

/// Closed set of failure classes for a single fetch attempt.
///
/// Every kind is terminal: the core never retries, a user-initiated new
/// search is the only recovery path. The distinction that matters most to
/// callers is `Transport` (the request never received a response) versus
/// `Upstream` (the provider answered and said no).
#[derive(Debug, Error)]
pub enum WeatherError {
    /// No usable credential; the request is never sent.
    #[error("no API key configured: {0}")]
    Configuration(String),

    /// Connection, DNS or timeout failure at the HTTP layer.
    #[error("could not reach the weather service: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("weather service rejected the request (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    /// A successful response whose body is not the shape we expect.
    #[error("unexpected response from the weather service: {0}")]
    MalformedResponse(String),

    /// The caller supplied an unusable location query.
    #[error("invalid location: {0}")]
    Input(String),
}
