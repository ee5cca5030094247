use async_trait::async_trait;
use gloo::utils::{body, document, window};
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, HtmlDocument, HtmlTextAreaElement, RequestCache, RequestInit, Response};

use super::{describe_js_error, has_function};
use crate::clipboard::{ClipboardEntry, ClipboardPlatform, ImageBlob};
use crate::error::ClipboardError;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["navigator", "clipboard"], js_name = writeText, catch)]
    async fn clipboard_write_text(text: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["navigator", "clipboard"], js_name = write, catch)]
    async fn clipboard_write(items: &Array) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["navigator", "clipboard"], js_name = read, catch)]
    async fn clipboard_read() -> Result<JsValue, JsValue>;

    #[derive(Debug, Clone)]
    type ClipboardItem;

    #[wasm_bindgen(constructor, catch)]
    fn new(items: &Object) -> Result<ClipboardItem, JsValue>;

    #[wasm_bindgen(method, getter)]
    fn types(this: &ClipboardItem) -> Array;

    #[wasm_bindgen(method, js_name = getType, catch)]
    async fn get_type(this: &ClipboardItem, mime_type: &str) -> Result<JsValue, JsValue>;
}

fn failed(error: impl Into<JsValue>) -> ClipboardError {
    ClipboardError::Failed(describe_js_error(&error.into()))
}

fn navigator_clipboard() -> Option<JsValue> {
    Reflect::get(&window().navigator(), &JsValue::from_str("clipboard"))
        .ok()
        .filter(|c| !c.is_undefined() && !c.is_null())
}

impl ImageBlob for Blob {
    fn mime_type(&self) -> String {
        self.type_()
    }

    fn size(&self) -> f64 {
        Blob::size(self)
    }
}

pub struct WebClipboardEntry(ClipboardItem);

#[async_trait(?Send)]
impl ClipboardEntry for WebClipboardEntry {
    type Blob = Blob;

    fn types(&self) -> Vec<String> {
        self.0.types().iter().filter_map(|t| t.as_string()).collect()
    }

    async fn blob(&self, mime_type: &str) -> Result<Blob, ClipboardError> {
        let value = self.0.get_type(mime_type).await.map_err(failed)?;
        value.dyn_into::<Blob>().map_err(failed)
    }
}

/// `navigator.clipboard` of the current window.
pub struct WebClipboard;

#[async_trait(?Send)]
impl ClipboardPlatform for WebClipboard {
    type Blob = Blob;
    type Entry = WebClipboardEntry;

    fn can_write_text(&self) -> bool {
        navigator_clipboard().is_some() && window().is_secure_context()
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        clipboard_write_text(text).await.map(|_| ()).map_err(failed)
    }

    fn copy_text_fallback(&self, text: &str) -> Result<(), ClipboardError> {
        let document = document();
        let textarea = document
            .create_element("textarea")
            .map_err(failed)?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(failed)?;
        textarea.set_value(text);
        body().append_child(&textarea).map_err(failed)?;
        textarea.select();

        let copied = document
            .dyn_into::<HtmlDocument>()
            .map_err(failed)
            .and_then(|doc| doc.exec_command("copy").map_err(failed));
        textarea.remove();

        match copied? {
            true => Ok(()),
            false => Err(ClipboardError::Failed("copy command rejected".to_string())),
        }
    }

    async fn fetch_blob(&self, url: &str) -> Result<Blob, ClipboardError> {
        let init = RequestInit::new();
        init.set_cache(RequestCache::NoStore);
        let response = JsFuture::from(window().fetch_with_str_and_init(url, &init))
            .await
            .map_err(failed)?
            .dyn_into::<Response>()
            .map_err(failed)?;
        if !response.ok() {
            return Err(ClipboardError::Failed(format!("HTTP {}", response.status())));
        }
        JsFuture::from(response.blob().map_err(failed)?)
            .await
            .map_err(failed)?
            .dyn_into::<Blob>()
            .map_err(failed)
    }

    fn can_write_image(&self) -> bool {
        navigator_clipboard().is_some_and(|c| has_function(&c, "write"))
            && Reflect::has(&window(), &JsValue::from_str("ClipboardItem")).unwrap_or(false)
    }

    async fn write_image(&self, blob: &Blob) -> Result<(), ClipboardError> {
        let record = Object::new();
        Reflect::set(&record, &JsValue::from_str(&blob.type_()), blob).map_err(failed)?;
        let item = ClipboardItem::new(&record).map_err(failed)?;
        clipboard_write(&Array::of1(&item)).await.map(|_| ()).map_err(failed)
    }

    fn can_read(&self) -> bool {
        navigator_clipboard().is_some_and(|c| has_function(&c, "read"))
    }

    async fn read_entries(&self) -> Result<Vec<WebClipboardEntry>, ClipboardError> {
        let items = clipboard_read().await.map_err(failed)?;
        Ok(Array::from(&items)
            .iter()
            .map(|item| WebClipboardEntry(item.unchecked_into::<ClipboardItem>()))
            .collect())
    }

    async fn to_data_url(&self, blob: &Blob) -> Result<String, ClipboardError> {
        let blob = gloo::file::Blob::from(blob.clone());
        gloo::file::futures::read_as_data_url(&blob)
            .await
            .map_err(|_| ClipboardError::ReadError)
    }
}
