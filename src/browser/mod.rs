/// web-sys implementations of the browser-facing traits
mod clipboard;
mod dom;
mod fetch;

pub use clipboard::{WebClipboard, WebClipboardEntry};
pub use dom::{multipart_form_data, WebForms, WebPage};
pub use fetch::FetchTransport;

use wasm_bindgen::JsValue;

use crate::clipboard::ClipboardService;

/// Clipboard helpers wired to the live document.
pub fn clipboard_service() -> ClipboardService<WebClipboard, WebPage> {
    ClipboardService::new(WebClipboard, WebPage)
}

/// Renders a thrown JS value for logs and error messages.
pub(crate) fn describe_js_error(error: &JsValue) -> String {
    error
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(error, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", error))
}

pub(crate) fn has_function(target: &JsValue, name: &str) -> bool {
    js_sys::Reflect::get(target, &JsValue::from_str(name))
        .map(|value| value.is_function())
        .unwrap_or(false)
}
