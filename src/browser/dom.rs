use async_trait::async_trait;
use gloo::timers::callback::Timeout;
use gloo::utils::{document, window};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, Element, FormData, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement,
    RequestCredentials, RequestInit, Response,
};

use super::{describe_js_error, has_function};
use crate::feedback::{FeedbackMessage, Page};
use crate::upload::{FormHost, FormTarget, MultipartUpload, SubmitResponse};

/// Bumped on every write so a stale auto-clear leaves newer text alone.
const FEEDBACK_SEQ_ATTR: &str = "data-feedback-seq";

fn element(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

fn form_value(element: &Element) -> Option<String> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    element
        .dyn_ref::<HtmlTextAreaElement>()
        .map(HtmlTextAreaElement::value)
}

/// The live document.
pub struct WebPage;

impl Page for WebPage {
    fn element_text(&self, id: &str) -> Option<String> {
        let element = element(id)?;
        let text = element
            .dyn_ref::<HtmlElement>()
            .map(HtmlElement::inner_text)
            .unwrap_or_default();
        if !text.is_empty() {
            return Some(text);
        }
        Some(form_value(&element).unwrap_or_default())
    }

    fn has_element(&self, id: &str) -> bool {
        element(id).is_some()
    }

    fn set_input_value(&self, id: &str, value: &str) -> bool {
        let Some(element) = element(id) else {
            return false;
        };
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
            true
        } else if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
            textarea.set_value(value);
            true
        } else {
            false
        }
    }

    fn show_feedback(&self, id: &str, message: &FeedbackMessage) {
        let Some(element) = element(id) else {
            return;
        };

        let seq = element
            .get_attribute(FEEDBACK_SEQ_ATTR)
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        let seq = seq.to_string();
        if let Err(e) = element.set_attribute(FEEDBACK_SEQ_ATTR, &seq) {
            log::warn!("Tagging feedback #{} failed: {}", id, describe_js_error(&e));
        }
        element.set_text_content(Some(message.text.as_ref()));

        if message.duration_ms == 0 {
            return;
        }
        Timeout::new(message.duration_ms, move || {
            if element.get_attribute(FEEDBACK_SEQ_ATTR).as_deref() == Some(seq.as_str()) {
                element.set_text_content(Some(""));
            }
        })
        .forget();
    }
}

fn form(id: &str) -> Option<HtmlFormElement> {
    element(id).and_then(|e| e.dyn_into::<HtmlFormElement>().ok())
}

/// Snapshot of the form `form_id` with the upload applied: `drop_fields`
/// removed and the blob attached under `file_field`.
pub fn multipart_form_data(form_id: &str, upload: &MultipartUpload<Blob>) -> Result<FormData, JsValue> {
    let form = form(form_id).ok_or_else(|| JsValue::from_str("form disappeared"))?;
    let data = FormData::new_with_form(&form)?;
    for field in upload.drop_fields {
        data.delete(field);
    }
    data.append_with_blob_and_filename(upload.file_field, &upload.blob, &upload.filename)?;
    Ok(data)
}

/// Forms of the live document.
pub struct WebForms;

#[async_trait(?Send)]
impl FormHost for WebForms {
    type Blob = Blob;

    fn find_form(&self, form_id: &str) -> Option<FormTarget> {
        let form = form(form_id)?;
        Some(FormTarget::resolve(
            form.get_attribute("action").as_deref(),
            form.get_attribute("method").as_deref(),
            &self.current_url(),
        ))
    }

    fn supports_multipart(&self) -> bool {
        let window = window();
        js_sys::Reflect::has(&window, &JsValue::from_str("FormData")).unwrap_or(false)
            && has_function(&window, "fetch")
    }

    async fn submit_multipart(
        &self,
        form_id: &str,
        target: &FormTarget,
        upload: MultipartUpload<Blob>,
    ) -> Result<SubmitResponse, String> {
        let data = multipart_form_data(form_id, &upload).map_err(|e| describe_js_error(&e))?;

        let init = RequestInit::new();
        init.set_method(&target.method);
        init.set_body(&data);
        init.set_credentials(RequestCredentials::SameOrigin);

        let response = JsFuture::from(window().fetch_with_str_and_init(&target.action, &init))
            .await
            .map_err(|e| describe_js_error(&e))?
            .dyn_into::<Response>()
            .map_err(|e| describe_js_error(&e))?;

        Ok(SubmitResponse {
            status: response.status(),
            url: Some(response.url()),
        })
    }

    fn submit_legacy(&self, form_id: &str) {
        let Some(form) = form(form_id) else {
            return;
        };
        let result = if has_function(&form, "requestSubmit") {
            form.request_submit()
        } else {
            form.submit()
        };
        if let Err(e) = result {
            log::warn!("Submitting #{} failed: {}", form_id, describe_js_error(&e));
        }
    }

    fn current_url(&self) -> String {
        window().location().href().unwrap_or_default()
    }

    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn navigate(&self, url: &str) {
        if let Err(e) = window().location().set_href(url) {
            log::warn!("Navigation to {} failed: {}", url, describe_js_error(&e));
        }
    }
}
