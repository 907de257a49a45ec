//! Error types for the API client

use std::fmt;

use compact_str::CompactString;
use reqwest::{Method, StatusCode};
use thiserror::Error;

use super::page::Page;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors produced by [`ApiClient`](super::ApiClient) operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// A cursor page was requested but the last list call did not provide one
    #[error("No {page} page available for {item}")]
    NoSuchPage { item: CompactString, page: Page },

    #[error("Invalid page selector: {0}")]
    InvalidPage(CompactString),

    /// Update and patch need the payload to carry an `id`
    #[error("Payload for {item} has no identifier")]
    MissingIdentifier { item: CompactString },

    /// The server answered with an unexpected status code
    #[error("{0}")]
    Api(Box<ApiFailure>),

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("JSON parse error from {endpoint}: {message}")]
    JsonParse {
        endpoint: CompactString,
        message: CompactString,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration for {field}: {message}")]
    ConfigValidation { field: CompactString, message: CompactString },
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(e)
        }
    }
}

impl ClientError {
    pub fn json_parse(
        endpoint: impl Into<CompactString>,
        message: impl Into<CompactString>,
        source: serde_json::Error,
    ) -> Self {
        Self::JsonParse {
            endpoint: endpoint.into(),
            message: message.into(),
            source,
        }
    }

    pub fn config_validation(
        field: impl Into<CompactString>,
        message: impl Into<CompactString>,
    ) -> Self {
        Self::ConfigValidation { field: field.into(), message: message.into() }
    }

    /// True when the operation was rejected before any request was sent
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NoSuchPage { .. } | Self::InvalidPage(_) | Self::MissingIdentifier { .. }
        )
    }

    /// HTTP status of an API failure, if this is one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api(failure) => Some(failure.status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Details of a request the server did not accept
#[derive(Debug, Clone)]
pub struct ApiFailure {
    pub item: CompactString,
    pub method: Method,
    pub status: StatusCode,
    pub url: String,
    pub body: String,
    /// Render the request URL and response body as well
    pub verbose: bool,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error ({})", self.item)?;
        if self.verbose {
            write!(
                f,
                "\nErr {} {}\n{}\n##########\n{}\n##########",
                self.method,
                self.status.as_u16(),
                self.url,
                self.body
            )
        } else {
            write!(f, " - Err {} {}", self.method, self.status.as_u16())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(verbose: bool) -> ApiFailure {
        ApiFailure {
            item: "widgets".into(),
            method: Method::GET,
            status: StatusCode::NOT_FOUND,
            url: "https://api.example.com/widgets/5/?token=T&format=json".into(),
            body: r#"{"detail":"Not found."}"#.into(),
            verbose,
        }
    }

    #[test]
    fn condensed_message() {
        assert_eq!(failure(false).to_string(), "API error (widgets) - Err GET 404");
    }

    #[test]
    fn verbose_message_carries_url_and_body() {
        assert_eq!(
            failure(true).to_string(),
            "API error (widgets)\nErr GET 404\n\
             https://api.example.com/widgets/5/?token=T&format=json\n\
             ##########\n{\"detail\":\"Not found.\"}\n##########"
        );
    }

    #[test]
    fn api_failures_expose_status() {
        let err = ClientError::Api(Box::new(failure(false)));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!err.is_precondition());
    }

    #[test]
    fn precondition_errors() {
        let err = ClientError::MissingIdentifier { item: "widgets".into() };
        assert!(err.is_precondition());
        assert_eq!(err.to_string(), "Payload for widgets has no identifier");

        let err = ClientError::NoSuchPage { item: "widgets".into(), page: Page::Next };
        assert!(err.is_precondition());
        assert_eq!(err.to_string(), "No next page available for widgets");
    }
}
