//! Error types for the search client boundary.

use thiserror::Error;

/// Failures surfaced while talking to the search service. The Display
/// text is shown to the user verbatim in an error toast, so every variant
/// reads as a sentence fragment.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Raised locally before any request is sent. Matches the guard the
    /// search form applies, so it only fires if a caller bypasses the form.
    #[error("At least one of search term, start time, or end time is required")]
    EmptyQuery,

    /// Connection, timeout, or protocol failure from the HTTP layer.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status. The message comes
    /// from the `error` field of the response body when present.
    #[error("Search rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The service answered 200 but the body did not match the expected
    /// shape.
    #[error("Malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
}
