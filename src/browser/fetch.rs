use async_trait::async_trait;
use gloo::utils::window;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, RequestCredentials, RequestInit, Response};

use super::describe_js_error;
use crate::api::{HttpBody, HttpRequest, HttpResponse, Transport, NETWORK_ERROR_CODE};
use crate::error::ApiError;

fn network_error(error: JsValue) -> ApiError {
    ApiError::new(describe_js_error(&error)).with_code(NETWORK_ERROR_CODE)
}

/// `window.fetch`, same-origin credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let headers = Headers::new().map_err(network_error)?;
        for (name, value) in &request.headers {
            headers.set(name, value).map_err(network_error)?;
        }

        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        init.set_headers(&headers);
        init.set_credentials(RequestCredentials::SameOrigin);
        match &request.body {
            HttpBody::Empty => {}
            HttpBody::Text(text) => init.set_body(&JsValue::from_str(text)),
            HttpBody::Form(form) => init.set_body(form),
        }

        let response = JsFuture::from(window().fetch_with_str_and_init(&request.url, &init))
            .await
            .map_err(network_error)?
            .dyn_into::<Response>()
            .map_err(network_error)?;

        let status = response.status();
        // An unreadable body is left empty; the envelope check reports it.
        let body = match response.text() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .ok()
                .and_then(|text| text.as_string())
                .unwrap_or_default(),
            Err(_) => String::new(),
        };

        Ok(HttpResponse { status, body })
    }
}
