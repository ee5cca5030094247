/// Paste-and-save: send the clipboard image through its owning form
use async_trait::async_trait;
use log::{debug, info, warn};

use crate::clipboard::{
    paste_failure_message, ClipboardPlatform, ClipboardService, ImageBlob, PasteOptions,
};
use crate::feedback::{self, Page};

/// Legacy hidden field carrying a data URL; stale once a file is attached.
pub const PASTED_DATA_FIELD: &str = "pasted_image_data";
pub const IMAGE_FILE_FIELD: &str = "image_file";

const PAYLOAD_TOO_LARGE: u16 = 413;

/// File extension for an image MIME type, `png` when unknown.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

pub fn upload_filename(epoch_millis: u64, mime_type: &str) -> String {
    format!("pasted-{}.{}", epoch_millis, extension_for_mime(mime_type))
}

/// Where and how a form submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormTarget {
    pub action: String,
    pub method: String,
}

impl FormTarget {
    /// Missing or blank attributes fall back to the current page and POST.
    pub fn resolve(action: Option<&str>, method: Option<&str>, current_url: &str) -> FormTarget {
        let action = action
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(current_url);
        let method = method
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or("POST");

        FormTarget {
            action: action.to_string(),
            method: method.to_uppercase(),
        }
    }
}

/// Multipart payload: the form's current fields, minus `drop_fields`, plus
/// the image attached as `file_field`.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartUpload<B> {
    pub blob: B,
    pub filename: String,
    pub file_field: &'static str,
    pub drop_fields: &'static [&'static str],
}

impl<B: ImageBlob> MultipartUpload<B> {
    pub fn new(blob: B, epoch_millis: u64) -> Self {
        let filename = upload_filename(epoch_millis, &blob.mime_type());
        MultipartUpload {
            blob,
            filename,
            file_field: IMAGE_FILE_FIELD,
            drop_fields: &[PASTED_DATA_FIELD],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub status: u16,
    /// Final URL after redirects, if the response reported one.
    pub url: Option<String>,
}

impl SubmitResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Forms and navigation, as seen by the paste-and-save flow.
#[async_trait(?Send)]
pub trait FormHost {
    type Blob: ImageBlob;

    fn find_form(&self, form_id: &str) -> Option<FormTarget>;

    /// Whether multipart requests can be built and sent without a reload.
    fn supports_multipart(&self) -> bool;

    /// Sends the form with same-origin credentials.
    async fn submit_multipart(
        &self,
        form_id: &str,
        target: &FormTarget,
        upload: MultipartUpload<Self::Blob>,
    ) -> Result<SubmitResponse, String>;

    /// Submits the form the classic way, preferring a submit that fires
    /// the form's submit event.
    fn submit_legacy(&self, form_id: &str);

    fn current_url(&self) -> String;

    fn now_millis(&self) -> u64;

    fn navigate(&self, url: &str);
}

/// Pastes the clipboard image and saves it as an alternative through the
/// form `form_id`, navigating to the resulting page on success.
pub async fn paste_image_and_submit<P, G, H>(
    service: &ClipboardService<P, G>,
    forms: &H,
    input_id: &str,
    feedback_id: &str,
    form_id: &str,
) -> bool
where
    P: ClipboardPlatform,
    G: Page,
    H: FormHost<Blob = P::Blob>,
{
    let page = service.page();

    let Some(target) = forms.find_form(form_id) else {
        page.show_feedback(feedback_id, &feedback::FORM_MISSING);
        return false;
    };

    if !forms.supports_multipart() {
        debug!("Multipart unsupported, submitting #{} with a data URL", form_id);
        let options = PasteOptions {
            success: feedback::UPLOADING,
        };
        let pasted = service.paste_image_to_hidden(input_id, feedback_id, &options).await;
        if pasted {
            forms.submit_legacy(form_id);
        }
        return pasted;
    }

    let blob = match service.read_clipboard_image_blob().await {
        Ok(blob) => blob,
        Err(e) => {
            warn!("Paste for #{} failed: {}", form_id, e);
            page.show_feedback(feedback_id, &paste_failure_message(&e));
            return false;
        }
    };

    page.set_input_value(input_id, "");
    page.show_feedback(feedback_id, &feedback::UPLOADING);

    let upload = MultipartUpload::new(blob, forms.now_millis());
    debug!("Uploading {} to {} {}", upload.filename, target.method, target.action);

    match forms.submit_multipart(form_id, &target, upload).await {
        Ok(response) if response.is_success() => {
            let destination = response
                .url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| forms.current_url());
            info!("Alternative saved, navigating to {}", destination);
            forms.navigate(&destination);
            true
        }
        Ok(response) => {
            warn!("Upload to {} answered {}", target.action, response.status);
            let message = if response.status == PAYLOAD_TOO_LARGE {
                feedback::UPLOAD_TOO_LARGE
            } else {
                feedback::UPLOAD_FAILED
            };
            page.show_feedback(feedback_id, &message);
            false
        }
        Err(e) => {
            warn!("Upload to {} failed: {}", target.action, e);
            page.show_feedback(feedback_id, &feedback::UPLOAD_FAILED);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBlob, FakeClipboard, FakeEntry, FakeForms, FakePage};
    use futures::executor::block_on;

    fn service(entries: Vec<FakeEntry>) -> ClipboardService<FakeClipboard, FakePage> {
        let page = FakePage::default();
        page.add_element("hidden", None);
        page.add_element("fb", None);
        page.set_input_value("hidden", "data:image/png;base64,OLD");
        let mut clipboard = FakeClipboard::default();
        clipboard.entries = entries;
        ClipboardService::new(clipboard, page)
    }

    fn feedback_text(svc: &ClipboardService<FakeClipboard, FakePage>) -> Option<String> {
        svc.page().feedback("fb").map(|m| m.text.into_owned())
    }

    #[test]
    fn test_extension_lookup() {
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("image/webp"), "webp");
        assert_eq!(extension_for_mime("image/gif"), "gif");
        assert_eq!(extension_for_mime("image/bmp"), "png");
        assert_eq!(extension_for_mime(""), "png");
    }

    #[test]
    fn test_upload_filename() {
        assert_eq!(upload_filename(1700000000123, "image/jpeg"), "pasted-1700000000123.jpg");
    }

    #[test]
    fn test_form_target_defaults() {
        let target = FormTarget::resolve(None, Some(" "), "https://x.test/cuento/a");
        assert_eq!(target.action, "https://x.test/cuento/a");
        assert_eq!(target.method, "POST");

        let target = FormTarget::resolve(Some("/upload"), Some("put"), "https://x.test/");
        assert_eq!(target.action, "/upload");
        assert_eq!(target.method, "PUT");
    }

    #[test]
    fn test_submit_success_navigates_to_response_url() {
        let svc = service(vec![FakeEntry::image("image/png", 12)]);
        let forms = FakeForms::with_form("alt-form");
        forms.respond(200, Some("https://x.test/cuento/a?p=2"));

        let ok = block_on(paste_image_and_submit(&svc, &forms, "hidden", "fb", "alt-form"));

        assert!(ok);
        assert_eq!(forms.navigated(), vec!["https://x.test/cuento/a?p=2".to_string()]);
        let sent = forms.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].filename, "pasted-1700000000000.png");
        assert_eq!(sent[0].file_field, "image_file");
        assert_eq!(sent[0].drop_fields, &["pasted_image_data"]);
        assert_eq!(svc.page().input_value("hidden").as_deref(), Some(""));
        assert_eq!(feedback_text(&svc).as_deref(), Some("Imagen pegada. Guardando alternativa..."));
    }

    #[test]
    fn test_submit_success_without_url_reloads_current_page() {
        let svc = service(vec![FakeEntry::image("image/jpeg", 12)]);
        let forms = FakeForms::with_form("alt-form");
        forms.respond(200, None);

        assert!(block_on(paste_image_and_submit(&svc, &forms, "hidden", "fb", "alt-form")));
        assert_eq!(forms.navigated(), vec![forms.current_url()]);
        assert_eq!(forms.sent()[0].filename, "pasted-1700000000000.jpg");
    }

    #[test]
    fn test_submit_payload_too_large() {
        let svc = service(vec![FakeEntry::image("image/png", 12)]);
        let forms = FakeForms::with_form("alt-form");
        forms.respond(413, None);

        let ok = block_on(paste_image_and_submit(&svc, &forms, "hidden", "fb", "alt-form"));

        assert!(!ok);
        assert!(forms.navigated().is_empty());
        assert_eq!(feedback_text(&svc).as_deref(), Some("La imagen supera el limite permitido"));
    }

    #[test]
    fn test_submit_server_error_is_generic() {
        let svc = service(vec![FakeEntry::image("image/png", 12)]);
        let forms = FakeForms::with_form("alt-form");
        forms.respond(500, None);

        assert!(!block_on(paste_image_and_submit(&svc, &forms, "hidden", "fb", "alt-form")));
        assert_eq!(svc.page().feedback("fb"), Some(feedback::UPLOAD_FAILED));
        assert!(forms.navigated().is_empty());
    }

    #[test]
    fn test_submit_network_error_is_generic() {
        let svc = service(vec![FakeEntry::image("image/png", 12)]);
        let forms = FakeForms::with_form("alt-form");
        forms.fail_with("offline");

        assert!(!block_on(paste_image_and_submit(&svc, &forms, "hidden", "fb", "alt-form")));
        assert_eq!(svc.page().feedback("fb"), Some(feedback::UPLOAD_FAILED));
    }

    #[test]
    fn test_missing_form() {
        let svc = service(vec![FakeEntry::image("image/png", 12)]);
        let forms = FakeForms::default();

        assert!(!block_on(paste_image_and_submit(&svc, &forms, "hidden", "fb", "alt-form")));
        assert_eq!(svc.page().feedback("fb"), Some(feedback::FORM_MISSING));
        assert!(forms.sent().is_empty());
    }

    #[test]
    fn test_clipboard_without_image() {
        let svc = service(vec![FakeEntry::new(vec![("text/plain", FakeBlob::new("text/plain", 5))])]);
        let forms = FakeForms::with_form("alt-form");

        assert!(!block_on(paste_image_and_submit(&svc, &forms, "hidden", "fb", "alt-form")));
        assert_eq!(feedback_text(&svc).as_deref(), Some("No se detecto imagen en el portapapeles"));
        assert!(forms.sent().is_empty());
        assert_eq!(
            svc.page().input_value("hidden").as_deref(),
            Some("data:image/png;base64,OLD")
        );
    }

    #[test]
    fn test_legacy_path_pastes_then_submits() {
        let svc = service(vec![FakeEntry::image("image/png", 12)]);
        let mut forms = FakeForms::with_form("alt-form");
        forms.multipart = false;

        assert!(block_on(paste_image_and_submit(&svc, &forms, "hidden", "fb", "alt-form")));
        assert_eq!(forms.legacy_submits(), vec!["alt-form".to_string()]);
        assert!(forms.sent().is_empty());
        assert_eq!(
            svc.page().input_value("hidden").as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert_eq!(svc.page().feedback("fb"), Some(feedback::UPLOADING));
    }

    #[test]
    fn test_legacy_path_does_not_submit_without_image() {
        let svc = service(Vec::new());
        let mut forms = FakeForms::with_form("alt-form");
        forms.multipart = false;

        assert!(!block_on(paste_image_and_submit(&svc, &forms, "hidden", "fb", "alt-form")));
        assert!(forms.legacy_submits().is_empty());
        assert_eq!(svc.page().feedback("fb"), Some(feedback::NO_IMAGE));
    }
}
