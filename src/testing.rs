/// In-memory stand-ins for the browser, used by unit tests
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;

use crate::api::{HttpRequest, HttpResponse, Transport};
use crate::clipboard::{ClipboardEntry, ClipboardPlatform, ImageBlob};
use crate::error::{ApiError, ClipboardError};
use crate::feedback::{FeedbackMessage, Page};
use crate::upload::{FormHost, FormTarget, MultipartUpload, SubmitResponse};

#[derive(Debug, Clone, PartialEq)]
pub struct FakeBlob {
    pub mime: String,
    pub size: f64,
}

impl FakeBlob {
    pub fn new(mime: &str, size: u32) -> Self {
        FakeBlob {
            mime: mime.to_string(),
            size: f64::from(size),
        }
    }
}

impl ImageBlob for FakeBlob {
    fn mime_type(&self) -> String {
        self.mime.clone()
    }

    fn size(&self) -> f64 {
        self.size
    }
}

pub struct FakeEntry {
    items: Vec<(String, FakeBlob)>,
}

impl FakeEntry {
    pub fn new(items: Vec<(&str, FakeBlob)>) -> Self {
        FakeEntry {
            items: items.into_iter().map(|(t, b)| (t.to_string(), b)).collect(),
        }
    }

    pub fn image(mime: &str, size: u32) -> Self {
        FakeEntry::new(vec![(mime, FakeBlob::new(mime, size))])
    }
}

#[async_trait(?Send)]
impl ClipboardEntry for FakeEntry {
    type Blob = FakeBlob;

    fn types(&self) -> Vec<String> {
        self.items.iter().map(|(t, _)| t.clone()).collect()
    }

    async fn blob(&self, mime_type: &str) -> Result<FakeBlob, ClipboardError> {
        self.items
            .iter()
            .find(|(t, _)| t == mime_type)
            .map(|(_, b)| b.clone())
            .ok_or_else(|| ClipboardError::Failed(format!("no {}", mime_type)))
    }
}

pub struct FakeClipboard {
    pub secure: bool,
    pub fail_writes: bool,
    pub image_write: bool,
    pub readable: bool,
    pub remote: Option<FakeBlob>,
    pub entries: Vec<FakeEntry>,
    /// Overrides the encoded data URL; `None` encodes as `data:<mime>;base64,AAAA`.
    pub data_url: Option<String>,
    text: RefCell<Vec<String>>,
    fallback: RefCell<Vec<String>>,
    images: RefCell<Vec<String>>,
    reads: Cell<usize>,
}

impl Default for FakeClipboard {
    fn default() -> Self {
        FakeClipboard {
            secure: true,
            fail_writes: false,
            image_write: true,
            readable: true,
            remote: None,
            entries: Vec::new(),
            data_url: None,
            text: RefCell::new(Vec::new()),
            fallback: RefCell::new(Vec::new()),
            images: RefCell::new(Vec::new()),
            reads: Cell::new(0),
        }
    }
}

impl FakeClipboard {
    pub fn written_text(&self) -> Vec<String> {
        self.text.borrow().clone()
    }

    pub fn fallback_text(&self) -> Vec<String> {
        self.fallback.borrow().clone()
    }

    pub fn written_images(&self) -> Vec<String> {
        self.images.borrow().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    fn check_write(&self) -> Result<(), ClipboardError> {
        if self.fail_writes {
            Err(ClipboardError::Failed("write denied".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait(?Send)]
impl ClipboardPlatform for FakeClipboard {
    type Blob = FakeBlob;
    type Entry = FakeEntry;

    fn can_write_text(&self) -> bool {
        self.secure
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.check_write()?;
        self.text.borrow_mut().push(text.to_string());
        Ok(())
    }

    fn copy_text_fallback(&self, text: &str) -> Result<(), ClipboardError> {
        self.check_write()?;
        self.fallback.borrow_mut().push(text.to_string());
        Ok(())
    }

    async fn fetch_blob(&self, url: &str) -> Result<FakeBlob, ClipboardError> {
        self.remote
            .clone()
            .ok_or_else(|| ClipboardError::Failed(format!("fetch {} failed", url)))
    }

    fn can_write_image(&self) -> bool {
        self.image_write
    }

    async fn write_image(&self, blob: &FakeBlob) -> Result<(), ClipboardError> {
        self.check_write()?;
        self.images.borrow_mut().push(blob.mime.clone());
        Ok(())
    }

    fn can_read(&self) -> bool {
        self.readable
    }

    async fn read_entries(&self) -> Result<Vec<FakeEntry>, ClipboardError> {
        self.reads.set(self.reads.get() + 1);
        Ok(self
            .entries
            .iter()
            .map(|e| FakeEntry { items: e.items.clone() })
            .collect())
    }

    async fn to_data_url(&self, blob: &FakeBlob) -> Result<String, ClipboardError> {
        Ok(self
            .data_url
            .clone()
            .unwrap_or_else(|| format!("data:{};base64,AAAA", blob.mime)))
    }
}

#[derive(Default)]
struct FakeElement {
    text: Option<String>,
    value: String,
    accepts_value: bool,
}

#[derive(Default)]
pub struct FakePage {
    elements: RefCell<HashMap<String, FakeElement>>,
    feedback: RefCell<HashMap<String, FeedbackMessage>>,
}

impl FakePage {
    pub fn add_element(&self, id: &str, text: Option<&str>) {
        self.elements.borrow_mut().insert(
            id.to_string(),
            FakeElement {
                text: text.map(str::to_string),
                value: String::new(),
                accepts_value: true,
            },
        );
    }

    /// An element without a value, like a `<div>`.
    pub fn add_static_element(&self, id: &str, text: &str) {
        self.elements.borrow_mut().insert(
            id.to_string(),
            FakeElement {
                text: Some(text.to_string()),
                value: String::new(),
                accepts_value: false,
            },
        );
    }

    pub fn input_value(&self, id: &str) -> Option<String> {
        self.elements.borrow().get(id).map(|e| e.value.clone())
    }

    pub fn feedback(&self, id: &str) -> Option<FeedbackMessage> {
        self.feedback.borrow().get(id).cloned()
    }
}

impl Page for FakePage {
    fn element_text(&self, id: &str) -> Option<String> {
        self.elements
            .borrow()
            .get(id)
            .map(|e| e.text.clone().unwrap_or_else(|| e.value.clone()))
    }

    fn has_element(&self, id: &str) -> bool {
        self.elements.borrow().contains_key(id)
    }

    fn set_input_value(&self, id: &str, value: &str) -> bool {
        match self.elements.borrow_mut().get_mut(id) {
            Some(element) if element.accepts_value => {
                element.value = value.to_string();
                true
            }
            _ => false,
        }
    }

    fn show_feedback(&self, id: &str, message: &FeedbackMessage) {
        if self.has_element(id) {
            self.feedback.borrow_mut().insert(id.to_string(), message.clone());
        }
    }
}

pub struct FakeForms {
    pub multipart: bool,
    forms: Vec<String>,
    response: RefCell<Result<SubmitResponse, String>>,
    sent: RefCell<Vec<MultipartUpload<FakeBlob>>>,
    legacy: RefCell<Vec<String>>,
    navigated: RefCell<Vec<String>>,
}

impl Default for FakeForms {
    fn default() -> Self {
        FakeForms {
            multipart: true,
            forms: Vec::new(),
            response: RefCell::new(Ok(SubmitResponse { status: 200, url: None })),
            sent: RefCell::new(Vec::new()),
            legacy: RefCell::new(Vec::new()),
            navigated: RefCell::new(Vec::new()),
        }
    }
}

impl FakeForms {
    pub fn with_form(form_id: &str) -> Self {
        FakeForms {
            forms: vec![form_id.to_string()],
            ..FakeForms::default()
        }
    }

    pub fn respond(&self, status: u16, url: Option<&str>) {
        *self.response.borrow_mut() = Ok(SubmitResponse {
            status,
            url: url.map(str::to_string),
        });
    }

    pub fn fail_with(&self, reason: &str) {
        *self.response.borrow_mut() = Err(reason.to_string());
    }

    pub fn sent(&self) -> Vec<MultipartUpload<FakeBlob>> {
        self.sent.borrow().clone()
    }

    pub fn legacy_submits(&self) -> Vec<String> {
        self.legacy.borrow().clone()
    }

    pub fn navigated(&self) -> Vec<String> {
        self.navigated.borrow().clone()
    }
}

#[async_trait(?Send)]
impl FormHost for FakeForms {
    type Blob = FakeBlob;

    fn find_form(&self, form_id: &str) -> Option<FormTarget> {
        self.forms
            .iter()
            .any(|f| f == form_id)
            .then(|| FormTarget::resolve(Some("/cuento/a/editar"), None, &self.current_url()))
    }

    fn supports_multipart(&self) -> bool {
        self.multipart
    }

    async fn submit_multipart(
        &self,
        _form_id: &str,
        _target: &FormTarget,
        upload: MultipartUpload<FakeBlob>,
    ) -> Result<SubmitResponse, String> {
        self.sent.borrow_mut().push(upload);
        self.response.borrow().clone()
    }

    fn submit_legacy(&self, form_id: &str) {
        self.legacy.borrow_mut().push(form_id.to_string());
    }

    fn current_url(&self) -> String {
        "https://x.test/cuento/a".to_string()
    }

    fn now_millis(&self) -> u64 {
        1_700_000_000_000
    }

    fn navigate(&self, url: &str) {
        self.navigated.borrow_mut().push(url.to_string());
    }
}

/// Replays canned responses and records every request.
#[derive(Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn reply(&self, status: u16, body: &str) -> &Self {
        self.responses.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn fail(&self, error: ApiError) -> &Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::new("no canned response")))
    }
}
