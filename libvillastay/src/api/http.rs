//! Reqwest-backed booking API client
//!
//! Owns transport details only: URL building, bearer auth, HTTP status
//! mapping, JSON decoding and response validation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use super::{BookingApi, PageRequest};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::schema::{
    check_all, Booking, CreateGuestReviewInput, GuestReview, MessageEntry, Schema,
    SendMessageInput, ThreadEntry, ThreadStatus, User,
};

const USER_AGENT: &str = concat!("villastay/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the booking backend
#[derive(Clone)]
pub struct HttpBookingApi {
    client: Client,
    base_url: Url,
    token: Option<Arc<SecretString>>,
}

impl HttpBookingApi {
    /// Build a client with an explicit request timeout
    pub fn new(base_url: Url, timeout: Duration, token: Option<SecretString>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Network(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url,
            token: token.map(Arc::new),
        })
    }

    /// Build a client from `[api]` configuration
    pub fn from_config(config: &Config, token: Option<SecretString>) -> Result<Self> {
        Self::new(config.base_url()?, config.timeout(), token)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        Ok(endpoint_url(&self.base_url, segments)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .token
            .as_ref()
            .map(|token| token.expose_secret().to_string())
            .unwrap_or_default();
        request.bearer_auth(token)
    }

    async fn fetch(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = self
            .authorize(request)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status, body.as_ref());
            tracing::warn!(status = status.as_u16(), error = %error, "Backend request failed");
            return Err(error.into());
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn list_threads(&self, host_user_id: &str, statuses: &[ThreadStatus]) -> Result<Vec<ThreadEntry>> {
        let url = self.endpoint(&["bookings"])?;
        let query = thread_query(host_user_id, statuses);
        tracing::debug!(host_user_id = %host_user_id, ?statuses, "Listing inbox threads");

        let body = self.fetch(self.client.get(url).query(&query)).await?;
        Ok(decode_list(&body)?)
    }

    async fn list_messages(&self, booking_id: &str, page: PageRequest) -> Result<Vec<MessageEntry>> {
        let url = self.endpoint(&["bookings", booking_id, "messages"])?;
        tracing::debug!(booking_id = %booking_id, offset = page.offset, limit = page.limit, "Fetching message page");

        let request = self
            .client
            .get(url)
            .query(&[("limit", page.limit), ("offset", page.offset)]);
        let body = self.fetch(request).await?;
        Ok(decode_list(&body)?)
    }

    async fn send_message(&self, input: &SendMessageInput) -> Result<MessageEntry> {
        input.check()?;
        let url = self.endpoint(&["messages"])?;
        tracing::debug!(booking_id = %input.booking_id, "Sending message");

        let body = self.fetch(self.client.post(url).json(input)).await?;
        Ok(decode_one(&body)?)
    }

    async fn get_booking(&self, booking_id: &str) -> Result<Booking> {
        let url = self.endpoint(&["bookings", booking_id])?;
        let body = self.fetch(self.client.get(url)).await?;
        Ok(decode_one(&body)?)
    }

    async fn create_review(&self, input: &CreateGuestReviewInput) -> Result<GuestReview> {
        input.check()?;
        let url = self.endpoint(&["reviews"])?;
        tracing::debug!(booking_id = %input.booking_id, rating = input.rating, "Creating review");

        let body = self.fetch(self.client.post(url).json(input)).await?;
        Ok(decode_one(&body)?)
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        let url = self.endpoint(&["users", user_id])?;
        let body = self.fetch(self.client.get(url)).await?;
        Ok(decode_one(&body)?)
    }
}

/// Append path segments to the base URL, percent-encoding each one
fn endpoint_url(base: &Url, segments: &[&str]) -> std::result::Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::Validation(format!("base URL '{}' cannot carry a path", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Query pairs for the thread listing; no statuses means no `status` key
fn thread_query(host_user_id: &str, statuses: &[ThreadStatus]) -> Vec<(&'static str, String)> {
    let mut query = vec![("host_user_id", host_user_id.to_string())];
    if !statuses.is_empty() {
        let joined = statuses
            .iter()
            .map(ThreadStatus::as_str)
            .collect::<Vec<_>>()
            .join(",");
        query.push(("status", joined));
    }
    query
}

fn decode_one<T>(body: &[u8]) -> std::result::Result<T, ApiError>
where
    T: DeserializeOwned + Schema,
{
    let value: T = serde_json::from_slice(body)
        .map_err(|e| ApiError::Schema(format!("invalid {} payload: {}", T::ENTITY, e)))?;
    value.check().map_err(|e| ApiError::Schema(e.to_string()))?;
    Ok(value)
}

fn decode_list<T>(body: &[u8]) -> std::result::Result<Vec<T>, ApiError>
where
    T: DeserializeOwned + Schema,
{
    let values: Vec<T> = serde_json::from_slice(body)
        .map_err(|e| ApiError::Schema(format!("invalid {} list payload: {}", T::ENTITY, e)))?;
    check_all(&values).map_err(|e| ApiError::Schema(e.to_string()))?;
    Ok(values)
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Network(format!("request timed out: {}", error))
    } else {
        ApiError::Network(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Authentication(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimit(message),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiError::Validation(message)
        }
        _ if status.is_server_error() => ApiError::Server(message),
        _ => ApiError::Validation(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{}...", preview)
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = Url::parse("https://api.villastay.test/v1/").unwrap();
        let url = endpoint_url(&base, &["bookings", "b1", "messages"]).unwrap();
        assert_eq!(url.as_str(), "https://api.villastay.test/v1/bookings/b1/messages");

        let base = Url::parse("http://localhost:3000").unwrap();
        let url = endpoint_url(&base, &["reviews"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/reviews");
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let base = Url::parse("http://localhost:3000").unwrap();
        let url = endpoint_url(&base, &["bookings", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/bookings/a%2Fb%20c");
    }

    #[test]
    fn test_thread_query_joins_statuses() {
        let query = thread_query("host-1", &[ThreadStatus::Cancelled, ThreadStatus::Completed]);
        assert_eq!(
            query,
            vec![
                ("host_user_id", "host-1".to_string()),
                ("status", "cancelled,completed".to_string()),
            ]
        );
    }

    #[test]
    fn test_thread_query_omits_empty_status() {
        let query = thread_query("host-1", &[]);
        assert_eq!(query, vec![("host_user_id", "host-1".to_string())]);
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(map_status_error(StatusCode::UNAUTHORIZED, b""), ApiError::Authentication(_)));
        assert!(matches!(map_status_error(StatusCode::FORBIDDEN, b""), ApiError::Authentication(_)));
        assert!(matches!(map_status_error(StatusCode::NOT_FOUND, b""), ApiError::NotFound(_)));
        assert!(matches!(map_status_error(StatusCode::UNPROCESSABLE_ENTITY, b""), ApiError::Validation(_)));
        assert!(matches!(map_status_error(StatusCode::TOO_MANY_REQUESTS, b""), ApiError::RateLimit(_)));
        assert!(matches!(map_status_error(StatusCode::BAD_GATEWAY, b""), ApiError::Server(_)));
    }

    #[test]
    fn test_status_message_includes_body_preview() {
        let error = map_status_error(StatusCode::BAD_REQUEST, b"{\"error\":\n  \"body required\"}");
        assert_eq!(
            error,
            ApiError::Validation("status 400: {\"error\": \"body required\"}".to_string())
        );
    }

    #[test]
    fn test_body_preview_truncates() {
        let long = "x".repeat(400);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[test]
    fn test_decode_list_rejects_bad_record() {
        let body = br#"[
            {"id":"m1","body":"Hi","sentAt":"2024-05-01T09:30:00Z"},
            {"id":"","body":"Hi again","sentAt":"2024-05-01T09:31:00Z"}
        ]"#;
        let error = decode_list::<MessageEntry>(body).unwrap_err();
        match error {
            ApiError::Schema(details) => assert!(details.contains("MessageEntry[1]")),
            other => panic!("Expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_one_rejects_wrong_shape() {
        let error = decode_one::<Booking>(br#"{"id": 42}"#).unwrap_err();
        assert!(matches!(error, ApiError::Schema(_)));
    }

    #[test]
    fn test_decode_booking() {
        let body = br#"{"id":"b1","villa_id":"v1","guest_user_id":"u1","check_in":"2024-06-01",
            "check_out":"2024-06-05","guests":2,"amount_usd":1200.0,"status":"confirmed",
            "created_at":"2024-05-01T00:00:00Z","updated_at":"2024-05-01T00:00:00Z"}"#;
        let booking = decode_one::<Booking>(body).unwrap();
        assert_eq!(booking.nights(), 4);
    }
}
