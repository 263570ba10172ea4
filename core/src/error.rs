//! Error types for the Patreon API client.
//!
//! # Design
//! Every failure aborts the whole call: a caller gets either a fully
//! assembled entity or exactly one `Error`. `Api` carries the decoded
//! JSON:API error objects; `Decode` names the offending resource when a
//! single resource's attributes do not fit its schema.

use serde::Deserialize;

use crate::http::TransportError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transport could not complete the round-trip.
    #[error("transport failure: {0}")]
    Transport(#[source] TransportError),

    /// The server answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The response does not match the expected schema.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The configured base URL cannot be combined with an endpoint path.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A resource id that would not address exactly one path segment.
    #[error("invalid resource id: {0:?}")]
    InvalidId(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed response body: {0}")]
    Body(#[source] serde_json::Error),

    #[error("malformed attributes on {resource_type} {id}: {source}")]
    Resource {
        resource_type: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected primary data of type {expected}, found {found} {id}")]
    UnexpectedType {
        expected: &'static str,
        found: String,
        id: String,
    },
}

/// A non-success response, with every error object the server sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("api request failed with status {status}: {}", summary(.errors))]
pub struct ApiError {
    pub status: u16,
    pub errors: Vec<ErrorObject>,
}

/// One entry of a JSON:API `errors` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErrorObject {
    pub code: Option<i64>,
    pub code_name: Option<String>,
    pub detail: Option<String>,
    pub id: Option<String>,
    pub status: Option<String>,
    pub title: Option<String>,
}

/// Wire shape of an error response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

fn summary(errors: &[ErrorObject]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(|e| {
            let title = e.title.as_deref().or(e.code_name.as_deref()).unwrap_or("unknown");
            match &e.detail {
                Some(detail) => format!("{title} ({detail})"),
                None => title.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
