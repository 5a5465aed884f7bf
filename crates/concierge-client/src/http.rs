//! reqwest implementation of the admin API

use crate::error::{ClientError, ClientResult, messages_from_body};
use crate::service::{AdminApi, NewCategory, NotifyRequest, PlacePayload, paths};
use async_trait::async_trait;
use concierge_core::config::ApiConfig;
use concierge_core::types::{Booking, BookingDetail, Category, Match, Place, RecordId};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Successful read responses wrap their payload in `data`
#[derive(Debug, serde::Deserialize)]
struct Envelope {
    #[serde(default)]
    data: serde_json::Value,
}

/// Admin API client over HTTP
#[derive(Clone)]
pub struct HttpAdminApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for HttpAdminApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAdminApi")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl HttpAdminApi {
    /// Create a client from configuration
    ///
    /// No timeout is set; a hung request stays pending until the server
    /// answers or the connection drops.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the base URL is empty or the
    /// underlying client cannot be built.
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration {
                message: "base URL must not be empty".to_string(),
            });
        }

        let client = Client::builder()
            .user_agent(concat!("concierge-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Configuration {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone().filter(|token| !token.is_empty()),
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a request path to the base URL
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and turn non-2xx answers into [`ClientError::Api`]
    async fn send(&self, path: &str, request: RequestBuilder) -> ClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::transport(path, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let messages = serde_json::from_str::<serde_json::Value>(&body)
            .map(|value| messages_from_body(&value))
            .unwrap_or_default();

        warn!(path, status = status.as_u16(), ?messages, "admin API rejected request");
        Err(ClientError::Api {
            status: status.as_u16(),
            messages,
        })
    }

    async fn read_data(path: &str, response: Response) -> ClientResult<serde_json::Value> {
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::transport(path, e.to_string()))?;

        let envelope: Envelope =
            serde_json::from_str(&body).map_err(|e| ClientError::decode(path, e.to_string()))?;
        Ok(envelope.data)
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Vec<T>> {
        let response = self.send(path, self.request(Method::GET, path)).await?;
        let data = Self::read_data(path, response).await?;

        if !data.is_array() {
            warn!(path, "expected a list in the response data");
            return Err(ClientError::UnexpectedShape {
                path: path.to_string(),
            });
        }

        let records: Vec<T> =
            serde_json::from_value(data).map_err(|e| ClientError::decode(path, e.to_string()))?;
        debug!(path, count = records.len(), "fetched list");
        Ok(records)
    }

    async fn fetch_one<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.send(path, self.request(Method::GET, path)).await?;
        let data = Self::read_data(path, response).await?;
        serde_json::from_value(data).map_err(|e| ClientError::decode(path, e.to_string()))
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<()> {
        self.send(path, self.request(Method::POST, path).json(body))
            .await
            .map(drop)
    }

    async fn post_multipart(&self, path: &str, payload: &PlacePayload) -> ClientResult<()> {
        let form = build_form(payload)?;
        debug!(path, parts = payload.keys().len(), "sending multipart form");
        self.send(path, self.request(Method::POST, path).multipart(form))
            .await
            .map(drop)
    }
}

/// Build the multipart form, text parts first, then files
fn build_form(payload: &PlacePayload) -> ClientResult<Form> {
    let mut form = Form::new();

    for (key, value) in payload.fields() {
        form = form.text(key.clone(), value.clone());
    }

    for (key, attachment) in payload.files() {
        let part = Part::bytes(attachment.bytes.clone())
            .file_name(attachment.file_name.clone())
            .mime_str(&attachment.content_type)
            .map_err(|e| ClientError::Configuration {
                message: format!(
                    "invalid content type {} for {key}: {e}",
                    attachment.content_type
                ),
            })?;
        form = form.part(key.clone(), part);
    }

    Ok(form)
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    #[tracing::instrument(skip(self))]
    async fn list_bonded_matches(&self) -> ClientResult<Vec<Match>> {
        self.fetch_list(paths::BONDED).await
    }

    #[tracing::instrument(
        skip(self, request),
        fields(user_one = %request.user_one_id, user_two = %request.user_two_id)
    )]
    async fn notify_match(&self, request: &NotifyRequest) -> ClientResult<()> {
        self.post_json(paths::NOTIFY, request).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_pending_bookings(&self) -> ClientResult<Vec<Booking>> {
        self.fetch_list(paths::PENDING).await
    }

    #[tracing::instrument(skip(self, id), fields(id = %id))]
    async fn get_booking(&self, id: &RecordId) -> ClientResult<BookingDetail> {
        self.fetch_one(&paths::booking(id)).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_places(&self) -> ClientResult<Vec<Place>> {
        self.fetch_list(paths::PLACES).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.fetch_list(paths::CATEGORIES).await
    }

    #[tracing::instrument(skip(self, payload))]
    async fn create_place(&self, payload: &PlacePayload) -> ClientResult<()> {
        self.post_multipart(paths::NEW_PLACE, payload).await
    }

    #[tracing::instrument(skip(self, payload), fields(id = payload.field("id")))]
    async fn edit_place(&self, payload: &PlacePayload) -> ClientResult<()> {
        self.post_multipart(paths::EDIT_PLACE, payload).await
    }

    #[tracing::instrument(skip(self, category), fields(name = %category.name))]
    async fn create_category(&self, category: &NewCategory) -> ClientResult<()> {
        self.post_json(paths::NEW_CATEGORY, category).await
    }

    #[tracing::instrument(skip(self, id), fields(id = %id))]
    async fn delete_place(&self, id: &RecordId) -> ClientResult<()> {
        let path = paths::delete_place(id);
        self.send(&path, self.request(Method::DELETE, &path))
            .await
            .map(drop)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn api(base_url: &str) -> HttpAdminApi {
        HttpAdminApi::new(&ApiConfig {
            base_url: base_url.to_string(),
            token: None,
        })
        .unwrap()
    }

    #[test]
    fn test_url_join_tolerates_slashes() {
        assert_eq!(
            api("http://localhost:3000/").url("/admin/place/all"),
            "http://localhost:3000/admin/place/all"
        );
        assert_eq!(
            api("http://localhost:3000").url("admin/date/7"),
            "http://localhost:3000/admin/date/7"
        );
        assert_eq!(
            api("https://api.example.com/v1/").url("admin/date/bonded"),
            "https://api.example.com/v1/admin/date/bonded"
        );
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let result = HttpAdminApi::new(&ApiConfig {
            base_url: "  ".to_string(),
            token: None,
        });

        assert!(matches!(result, Err(ClientError::Configuration { .. })));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = HttpAdminApi::new(&ApiConfig {
            base_url: "http://localhost:3000".to_string(),
            token: Some("super-secret".to_string()),
        })
        .unwrap();

        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_build_form_rejects_bad_content_type() {
        let mut payload = PlacePayload::new();
        payload.push_file(
            "banner1",
            concierge_core::types::Attachment {
                file_name: "a.png".to_string(),
                content_type: "not a mime type".to_string(),
                bytes: vec![0],
            },
        );

        assert!(build_form(&payload).is_err());
    }
}
