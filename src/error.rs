use std::path::PathBuf;
use thiserror::Error;

/// Failures of the session loader. A session that produced one of these
/// stays unauthenticated.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("cookie file not found: {}", .0.display())]
    CookieFileMissing(PathBuf),

    #[error("failed to read cookie file {}: {source}", path.display())]
    CookieFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no valid cookies for the target domain in {} ({malformed_rows} malformed rows)", path.display())]
    NoValidCookies { path: PathBuf, malformed_rows: usize },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("not authenticated: load cookies before fetching")]
    NotAuthenticated,

    #[error("request rejected (HTTP 400): cookies are probably invalid or expired")]
    AuthExpired,

    #[error("access denied (HTTP 403): check that the cookies are correct")]
    AccessDenied,

    #[error("not found (HTTP 404): portfolio does not exist or is not accessible")]
    NotFound,

    #[error("unexpected HTTP status {0}")]
    Http(u16),

    #[error("malformed response: missing `{0}` field")]
    MalformedResponse(&'static str),

    #[error("response body is not valid JSON: {0}")]
    JsonDecode(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cookie values cannot be encoded as an HTTP header")]
    InvalidCookieHeader,

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    /// Maps a non-success status of a primary data endpoint. Returns `None`
    /// for 2xx statuses.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            400 => Some(FetchError::AuthExpired),
            403 => Some(FetchError::AccessDenied),
            404 => Some(FetchError::NotFound),
            other => Some(FetchError::Http(other)),
        }
    }
}
