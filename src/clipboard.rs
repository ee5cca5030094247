/// Clipboard helpers: copy text and images out, paste images in
use async_trait::async_trait;
use log::{debug, warn};

use crate::error::ClipboardError;
use crate::feedback::{self, FeedbackMessage, Page};

/// A binary payload read from the clipboard or the network.
pub trait ImageBlob {
    fn mime_type(&self) -> String;
    fn size(&self) -> f64;
}

/// One entry of a clipboard read, offering its data in one or more types.
#[async_trait(?Send)]
pub trait ClipboardEntry {
    type Blob: ImageBlob;

    fn types(&self) -> Vec<String>;

    async fn blob(&self, mime_type: &str) -> Result<Self::Blob, ClipboardError>;
}

/// Browser clipboard capabilities.
#[async_trait(?Send)]
pub trait ClipboardPlatform {
    type Blob: ImageBlob;
    type Entry: ClipboardEntry<Blob = Self::Blob>;

    /// Async text writes need the Clipboard API in a secure context.
    fn can_write_text(&self) -> bool;

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Copies through a temporary editable element and the copy command.
    fn copy_text_fallback(&self, text: &str) -> Result<(), ClipboardError>;

    /// Fetches `url` bypassing the HTTP cache.
    async fn fetch_blob(&self, url: &str) -> Result<Self::Blob, ClipboardError>;

    fn can_write_image(&self) -> bool;

    async fn write_image(&self, blob: &Self::Blob) -> Result<(), ClipboardError>;

    fn can_read(&self) -> bool;

    async fn read_entries(&self) -> Result<Vec<Self::Entry>, ClipboardError>;

    async fn to_data_url(&self, blob: &Self::Blob) -> Result<String, ClipboardError>;
}

/// Overrides for the message shown after a successful paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteOptions {
    pub success: FeedbackMessage,
}

impl Default for PasteOptions {
    fn default() -> Self {
        PasteOptions {
            success: feedback::IMAGE_PASTED,
        }
    }
}

impl PasteOptions {
    /// Default options with the success message and/or its duration replaced.
    pub fn overridden(text: Option<String>, duration_ms: Option<u32>) -> Self {
        let default = feedback::IMAGE_PASTED;
        PasteOptions {
            success: FeedbackMessage::new(
                text.unwrap_or_else(|| default.text.into_owned()),
                duration_ms.unwrap_or(default.duration_ms),
            ),
        }
    }
}

/// Feedback for a failed clipboard read. Used by both paste flows.
pub fn paste_failure_message(error: &ClipboardError) -> FeedbackMessage {
    match error {
        ClipboardError::Unsupported => feedback::PASTE_UNSUPPORTED,
        ClipboardError::NoImage => feedback::NO_IMAGE,
        ClipboardError::ReadError | ClipboardError::Failed(_) => feedback::CLIPBOARD_READ_FAILED,
    }
}

pub struct ClipboardService<P, G> {
    platform: P,
    page: G,
}

impl<P, G> ClipboardService<P, G>
where
    P: ClipboardPlatform,
    G: Page,
{
    pub fn new(platform: P, page: G) -> Self {
        ClipboardService { platform, page }
    }

    pub fn page(&self) -> &G {
        &self.page
    }

    /// Copies the text of `element_id` and reports the outcome in `feedback_id`.
    /// Does nothing when the element does not exist.
    pub async fn copy_text_from_element(&self, element_id: &str, feedback_id: &str) -> bool {
        let Some(text) = self.page.element_text(element_id) else {
            return false;
        };

        let result = if self.platform.can_write_text() {
            self.platform.write_text(&text).await
        } else {
            self.platform.copy_text_fallback(&text)
        };

        match result {
            Ok(()) => {
                self.page.show_feedback(feedback_id, &feedback::COPIED);
                true
            }
            Err(e) => {
                warn!("Copy from #{} failed: {}", element_id, e);
                self.page.show_feedback(feedback_id, &feedback::COPY_FAILED);
                false
            }
        }
    }

    pub async fn copy_image_from_url(&self, url: &str, feedback_id: &str) -> bool {
        match self.write_image_from_url(url).await {
            Ok(()) => {
                self.page.show_feedback(feedback_id, &feedback::IMAGE_COPIED);
                true
            }
            Err(e) => {
                warn!("Copy of image {} failed: {}", url, e);
                self.page.show_feedback(feedback_id, &feedback::IMAGE_COPY_FAILED);
                false
            }
        }
    }

    async fn write_image_from_url(&self, url: &str) -> Result<(), ClipboardError> {
        let blob = self.platform.fetch_blob(url).await?;
        if !blob.mime_type().starts_with("image/") {
            return Err(ClipboardError::Failed("El archivo no es una imagen".to_string()));
        }
        if !self.platform.can_write_image() {
            return Err(ClipboardError::Unsupported);
        }
        self.platform.write_image(&blob).await
    }

    /// First non-empty image in the clipboard, in entry order. Within an
    /// entry only its first `image/*` type is considered.
    pub async fn read_clipboard_image_blob(&self) -> Result<P::Blob, ClipboardError> {
        if !self.platform.can_read() {
            return Err(ClipboardError::Unsupported);
        }

        for entry in self.platform.read_entries().await? {
            let Some(mime) = entry.types().into_iter().find(|t| t.starts_with("image/")) else {
                continue;
            };
            let blob = entry.blob(&mime).await?;
            if blob.size() > 0.0 {
                return Ok(blob);
            }
        }

        Err(ClipboardError::NoImage)
    }

    pub async fn read_clipboard_image_data_url(&self) -> Result<String, ClipboardError> {
        let blob = self.read_clipboard_image_blob().await?;
        match self.platform.to_data_url(&blob).await {
            Ok(data_url) if !data_url.is_empty() => Ok(data_url),
            Ok(_) => Err(ClipboardError::ReadError),
            Err(e) => {
                debug!("Data URL encoding failed: {}", e);
                Err(ClipboardError::ReadError)
            }
        }
    }

    /// Stores the clipboard image as a data URL in the hidden input `input_id`.
    pub async fn paste_image_to_hidden(
        &self,
        input_id: &str,
        feedback_id: &str,
        options: &PasteOptions,
    ) -> bool {
        if !self.page.has_element(input_id) {
            self.page.show_feedback(feedback_id, &feedback::PASTE_TARGET_MISSING);
            return false;
        }

        match self.read_clipboard_image_data_url().await {
            Ok(data_url) => {
                if !self.page.set_input_value(input_id, &data_url) {
                    warn!("#{} does not accept a value", input_id);
                    self.page.show_feedback(feedback_id, &feedback::PASTE_TARGET_MISSING);
                    return false;
                }
                self.page.show_feedback(feedback_id, &options.success);
                true
            }
            Err(e) => {
                warn!("Paste into #{} failed: {}", input_id, e);
                self.page.show_feedback(feedback_id, &paste_failure_message(&e));
                false
            }
        }
    }
}
