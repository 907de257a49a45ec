//! Core HTTP client for list/detail REST APIs

use std::{collections::HashMap, fmt};

use chrono::Local;
use compact_str::CompactString;
use itertools::Itertools;
use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    header::{CONTENT_TYPE, USER_AGENT},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use super::{
    config::ClientConfig,
    error::{ApiFailure, ClientError, Result},
    page::{Page, PageCursor, Paginated},
};
use crate::id::ResourceId;

pub const CLIENT_USER_AGENT: &str = "Vb API";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf8";

/// HTTP client for a paginated list/detail REST API
///
/// Operations take `&mut self`: a client has at most one request in flight
/// and owns its pagination cursors exclusively. Share it across tasks only
/// behind the caller's own synchronisation.
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    cursors: HashMap<CompactString, PageCursor>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = build_http_client(&config)?;

        Ok(Self {
            client,
            config,
            cursors: HashMap::new(),
        })
    }

    /// Replace the configuration
    ///
    /// Values are stored as given. Every pagination cursor is dropped since
    /// they point at the previous backend.
    pub fn configure(&mut self, config: ClientConfig) -> Result<()> {
        self.client = build_http_client(&config)?;
        self.config = config;
        self.cursors.clear();
        Ok(())
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Cursor state left by the last list call for `item`
    pub fn cursor(&self, item: &str) -> PageCursor {
        self.cursors.get(item).cloned().unwrap_or_default()
    }

    /// List a collection, or follow a cursor of the previous list call
    pub async fn list(
        &mut self,
        item: &str,
        options: &[&str],
        page: Option<Page>,
    ) -> Result<Vec<Value>> {
        self.list_as(item, options, page).await
    }

    /// Same as [`list`](Self::list), decoding each result into `T`
    #[instrument(skip(self))]
    pub async fn list_as<T>(
        &mut self,
        item: &str,
        options: &[&str],
        page: Option<Page>,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = match page {
            Some(page) => self
                .cursors
                .get(item)
                .and_then(|cursor| cursor.get(page))
                .map(str::to_owned)
                .ok_or_else(|| ClientError::NoSuchPage { item: item.into(), page })?,
            None => {
                self.cursors.remove(item);
                self.build_url(item, None, options)
            },
        };

        let response = self.request(Method::GET, &url).send().await?;
        let envelope: Paginated<T> = self
            .handle_response(item, Method::GET, StatusCode::OK, response)
            .await?;

        let cursor = envelope.cursor();
        debug!(
            result_count = envelope.results.len(),
            has_next = cursor.next.is_some(),
            has_previous = cursor.previous.is_some(),
            "Successfully fetched list"
        );
        self.cursors.insert(item.into(), cursor);

        Ok(envelope.results)
    }

    /// Fetch a single resource
    #[instrument(skip(self, id), fields(id = tracing::field::Empty))]
    pub async fn get(
        &mut self,
        item: &str,
        id: impl Into<ResourceId>,
        options: &[&str],
    ) -> Result<Value> {
        let id = id.into();
        tracing::Span::current().record("id", tracing::field::display(&id));

        let url = self.build_url(item, Some(&id), options);
        let response = self.request(Method::GET, &url).send().await?;
        self.handle_response(item, Method::GET, StatusCode::OK, response)
            .await
    }

    /// Create a resource; the server must answer `201 Created`
    #[instrument(skip(self, payload))]
    pub async fn create(&mut self, item: &str, payload: &Value, options: &[&str]) -> Result<Value> {
        let url = self.build_url(item, None, options);
        let response = self
            .request(Method::POST, &url)
            .json(payload)
            .send()
            .await?;
        self.handle_response(item, Method::POST, StatusCode::CREATED, response)
            .await
    }

    /// Replace a resource identified by the payload's `id`
    #[instrument(skip(self, payload))]
    pub async fn update(&mut self, item: &str, payload: &Value, options: &[&str]) -> Result<Value> {
        self.send_identified(Method::PUT, item, payload, options)
            .await
    }

    /// Partially update a resource identified by the payload's `id`
    #[instrument(skip(self, payload))]
    pub async fn patch(&mut self, item: &str, payload: &Value, options: &[&str]) -> Result<Value> {
        self.send_identified(Method::PATCH, item, payload, options)
            .await
    }

    /// Delete the resource identified by the payload's `id`
    ///
    /// Returns `Ok(true)` on `204 No Content` and `Ok(false)` on any other
    /// status; the failure is logged. `Err` is reserved for transport errors.
    /// The identifier is used as-is; only a missing or `null` one targets
    /// the collection URL.
    #[instrument(skip(self, payload))]
    pub async fn delete(&mut self, item: &str, payload: &Value, options: &[&str]) -> Result<bool> {
        let id = ResourceId::from_payload_verbatim(payload);
        let url = self.build_url(item, id.as_ref(), options);
        let response = self
            .request(Method::DELETE, &url)
            .json(payload)
            .send()
            .await?;

        match self
            .check_response(item, Method::DELETE, StatusCode::NO_CONTENT, response)
            .await
        {
            Ok(_) => Ok(true),
            Err(ClientError::Api(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Build a request URL
    ///
    /// `{scheme}{base_url}/{item}/{id}?token={token}&format={output}` followed
    /// by every option. Options are raw query fragments and are appended
    /// unescaped.
    pub fn build_url(&self, item: &str, id: Option<&ResourceId>, options: &[&str]) -> String {
        let config = &self.config;
        let mut url = format!(
            "{}{}/{}/{}?token={}&format={}",
            config.scheme(),
            config.base_url,
            item,
            id.map(ResourceId::as_str).unwrap_or_default(),
            config.token,
            config.output,
        );

        if !options.is_empty() {
            url.push('&');
            url.push_str(&options.iter().join("&"));
        }

        url
    }

    /// Shared path of update and patch
    async fn send_identified(
        &mut self,
        method: Method,
        item: &str,
        payload: &Value,
        options: &[&str],
    ) -> Result<Value> {
        let id = ResourceId::from_payload(payload)
            .ok_or_else(|| ClientError::MissingIdentifier { item: item.into() })?;

        let url = self.build_url(item, Some(&id), options);
        let response = self
            .request(method.clone(), &url)
            .json(payload)
            .send()
            .await?;
        self.handle_response(item, method, StatusCode::OK, response)
            .await
    }

    /// Create a request builder carrying the fixed headers
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
    }

    /// Check the status and deserialize the JSON body
    async fn handle_response<T>(
        &self,
        item: &str,
        method: Method,
        expected: StatusCode,
        response: Response,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url_path = response.url().path().to_string();
        let body = self
            .check_response(item, method, expected, response)
            .await?;

        serde_json::from_str(&body).map_err(|e| {
            warn!(endpoint = %url_path, error = %e, "Failed to parse response body");
            ClientError::json_parse(url_path, "Failed to parse response", e)
        })
    }

    /// Read the body, turning an unexpected status into [`ClientError::Api`]
    async fn check_response(
        &self,
        item: &str,
        method: Method,
        expected: StatusCode,
        response: Response,
    ) -> Result<String> {
        let url = response.url().to_string();
        let status = response.status();
        let body = response.text().await?;

        if self.config.debug.log_responses {
            self.log_response_to_file(&url, &body);
        }

        if status == expected {
            return Ok(body);
        }

        Err(self.report_error(item, method, status, url, body))
    }

    /// Log an API failure and wrap it into an error value
    fn report_error(
        &self,
        item: &str,
        method: Method,
        status: StatusCode,
        url: String,
        body: String,
    ) -> ClientError {
        let failure = ApiFailure {
            item: item.into(),
            method,
            status,
            url,
            body,
            verbose: self.config.verbose,
        };

        if failure.verbose {
            error!(
                item = %failure.item,
                method = %failure.method,
                status = failure.status.as_u16(),
                url = %failure.url,
                body = %failure.body,
                "API request failed"
            );
        } else {
            error!(
                item = %failure.item,
                method = %failure.method,
                status = failure.status.as_u16(),
                "API request failed"
            );
        }

        ClientError::Api(Box::new(failure))
    }

    /// Log HTTP response to file for debugging
    fn log_response_to_file(&self, url: &str, body: &str) {
        let Some(log_dir) = &self.config.debug.log_directory else {
            return;
        };

        if !log_dir.exists()
            && let Err(e) = std::fs::create_dir_all(log_dir)
        {
            warn!("Failed to create log directory: {}", e);
            return;
        }

        let path = url::Url::parse(url)
            .map(|u| u.path().to_string())
            .unwrap_or_default();
        let filename = format!(
            "{}_{}.json",
            Local::now().format("%Y-%m-%d_%H-%M-%S%.3f"),
            path.replace('/', "_")
        );

        let log_path = log_dir.join(filename);

        if let Err(e) = std::fs::write(&log_path, body) {
            warn!("Failed to write response log to {:?}: {}", log_path, e);
        } else {
            debug!("Response logged to {:?}", log_path);
        }
    }
}

impl fmt::Display for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.config.scheme(), self.config.base_url)
    }
}

fn build_http_client(config: &ClientConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.request.timeout)
        .build()
        .map_err(ClientError::Http)
}
