/// Client for the `/api/v1` JSON API
use async_trait::async_trait;
use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::form_urlencoded;
use web_sys::FormData;

use crate::error::{ApiError, DEFAULT_ERROR_CODE, DEFAULT_ERROR_MESSAGE};
use crate::models::{Envelope, Health, KindFilter, LibraryListing, StoryDetail};

pub const DEFAULT_API_BASE: &str = "/api/v1";
pub const INVALID_RESPONSE_CODE: &str = "invalid_response";
pub const INVALID_RESPONSE_MESSAGE: &str = "Respuesta no valida del servidor.";
pub const NETWORK_ERROR_CODE: &str = "network_error";

/// Characters `encodeURIComponent` leaves alone, everything else is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, URI_COMPONENT).to_string()
}

/// Encodes a slash-delimited path one segment at a time, dropping empty
/// segments, so no segment can introduce extra URL structure.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum ApiBody {
    #[default]
    Empty,
    Json(Value),
    /// Multipart payload, sent untouched so the browser sets the boundary.
    Form(FormData),
}

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: ApiBody,
}

impl RequestOptions {
    pub fn json(method: Method, body: Value) -> Self {
        RequestOptions {
            method,
            body: ApiBody::Json(body),
            ..RequestOptions::default()
        }
    }

    pub fn form(method: Method, form: FormData) -> Self {
        RequestOptions {
            method,
            body: ApiBody::Form(form),
            ..RequestOptions::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub enum HttpBody {
    #[default]
    Empty,
    Text(String),
    Form(FormData),
}

/// A request ready for the wire.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: HttpBody,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Performs one HTTP exchange.
#[async_trait(?Send)]
pub trait Transport {
    /// Fails only when no response was received at all.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// JSON bodies get `Content-Type: application/json` unless the caller
/// already set that header.
pub fn build_request(url: &str, options: RequestOptions) -> HttpRequest {
    let RequestOptions {
        method,
        mut headers,
        body,
    } = options;

    let body = match body {
        ApiBody::Empty => HttpBody::Empty,
        ApiBody::Form(form) => HttpBody::Form(form),
        ApiBody::Json(value) => {
            if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("content-type")) {
                headers.insert(0, ("Content-Type".to_string(), "application/json".to_string()));
            }
            HttpBody::Text(value.to_string())
        }
    };

    HttpRequest {
        method,
        url: url.to_string(),
        headers,
        body,
    }
}

/// Validates a response and returns its `data`.
pub fn unwrap_envelope(status: u16, body: &str) -> Result<Value, ApiError> {
    let payload: Value = serde_json::from_str(body).map_err(|_| {
        ApiError::new(INVALID_RESPONSE_MESSAGE)
            .with_code(INVALID_RESPONSE_CODE)
            .with_status(status)
    })?;
    let envelope: Envelope = serde_json::from_value(payload.clone()).unwrap_or_default();

    if !(200..300).contains(&status) || !envelope.ok {
        let error = envelope.error.unwrap_or_default();
        let message = error
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
        let code = error
            .code
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_CODE.to_string());
        return Err(ApiError::new(message)
            .with_code(code)
            .with_status(status)
            .with_payload(payload));
    }

    Ok(envelope.data)
}

pub async fn request_api<T>(transport: &T, url: &str, options: RequestOptions) -> Result<Value, ApiError>
where
    T: Transport + ?Sized,
{
    let request = build_request(url, options);
    debug!("{} {}", request.method.as_str(), request.url);
    let response = transport.send(request).await?;
    unwrap_envelope(response.status, &response.body)
}

/// Filters of a library listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryQuery {
    pub path: String,
    pub q: String,
    pub kind: KindFilter,
    pub status: String,
}

impl Default for LibraryQuery {
    fn default() -> Self {
        LibraryQuery {
            path: String::new(),
            q: String::new(),
            kind: KindFilter::All,
            status: "all".to_string(),
        }
    }
}

impl LibraryQuery {
    pub fn at(path: impl Into<String>) -> Self {
        LibraryQuery {
            path: path.into(),
            ..LibraryQuery::default()
        }
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("path", &self.path)
            .append_pair("q", &self.q)
            .append_pair("kind", self.kind.as_str())
            .append_pair("status", &self.status)
            .finish()
    }
}

pub struct ApiClient<T> {
    transport: T,
    base: String,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        ApiClient { transport, base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Sends `options` to `<base><path>` and returns the envelope data.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base, path);
        request_api(&self.transport, &url, options).await
    }

    async fn request_as<D: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<D, ApiError> {
        let data = self.request(path, options).await?;
        serde_json::from_value(data).map_err(|e| {
            debug!("Unexpected payload for {}: {}", path, e);
            ApiError::new(INVALID_RESPONSE_MESSAGE).with_code(INVALID_RESPONSE_CODE)
        })
    }

    pub async fn get_library_node(&self, query: &LibraryQuery) -> Result<LibraryListing, ApiError> {
        let path = format!("/library/node?{}", query.to_query_string());
        self.request_as(&path, RequestOptions::default()).await
    }

    pub async fn get_story(&self, story_path: &str, page: Option<u32>) -> Result<StoryDetail, ApiError> {
        let mut path = format!("/stories/{}", encode_path(story_path));
        if let Some(page) = page.filter(|p| *p > 0) {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("p", &page.to_string())
                .finish();
            path.push('?');
            path.push_str(&query);
        }
        self.request_as(&path, RequestOptions::default()).await
    }

    pub async fn patch_story_page(
        &self,
        story_path: &str,
        page_number: u32,
        body: Value,
    ) -> Result<StoryDetail, ApiError> {
        let path = page_path(story_path, page_number);
        self.request_as(&path, RequestOptions::json(Method::Patch, body)).await
    }

    pub async fn upload_alternative(
        &self,
        story_path: &str,
        page_number: u32,
        slot_name: &str,
        form: FormData,
    ) -> Result<StoryDetail, ApiError> {
        let path = format!("{}/alternatives", slot_path(story_path, page_number, slot_name));
        self.request_as(&path, RequestOptions::form(Method::Post, form)).await
    }

    pub async fn set_slot_active(
        &self,
        story_path: &str,
        page_number: u32,
        slot_name: &str,
        alternative_id: &str,
    ) -> Result<StoryDetail, ApiError> {
        let path = format!("{}/active", slot_path(story_path, page_number, slot_name));
        let body = json!({ "alternative_id": alternative_id });
        self.request_as(&path, RequestOptions::json(Method::Put, body)).await
    }

    pub async fn get_health(&self) -> Result<Health, ApiError> {
        self.request_as("/health", RequestOptions::default()).await
    }
}

fn page_path(story_path: &str, page_number: u32) -> String {
    format!("/stories/{}/pages/{}", encode_path(story_path), page_number)
}

fn slot_path(story_path: &str, page_number: u32, slot_name: &str) -> String {
    format!(
        "{}/slots/{}",
        page_path(story_path, page_number),
        encode_segment(slot_name)
    )
}
