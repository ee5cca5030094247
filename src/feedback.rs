/// Transient status text shown next to the controls that triggered it
use std::borrow::Cow;

/// Text written into a feedback element, cleared after `duration_ms`.
/// A duration of 0 keeps the text until something else replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub text: Cow<'static, str>,
    pub duration_ms: u32,
}

impl FeedbackMessage {
    pub const fn fixed(text: &'static str, duration_ms: u32) -> Self {
        FeedbackMessage {
            text: Cow::Borrowed(text),
            duration_ms,
        }
    }

    pub fn new(text: impl Into<String>, duration_ms: u32) -> Self {
        FeedbackMessage {
            text: Cow::Owned(text.into()),
            duration_ms,
        }
    }
}

pub const COPIED: FeedbackMessage = FeedbackMessage::fixed("Copiado", 1200);
pub const COPY_FAILED: FeedbackMessage = FeedbackMessage::fixed("Error al copiar", 1600);
pub const IMAGE_COPIED: FeedbackMessage = FeedbackMessage::fixed("Imagen copiada", 1200);
pub const IMAGE_COPY_FAILED: FeedbackMessage =
    FeedbackMessage::fixed("No se pudo copiar; abre la imagen y copia manualmente", 2500);
pub const IMAGE_PASTED: FeedbackMessage =
    FeedbackMessage::fixed("Imagen pegada y lista para guardar", 1600);
pub const PASTE_UNSUPPORTED: FeedbackMessage =
    FeedbackMessage::fixed("El navegador no soporta pegar imagen", 1800);
pub const NO_IMAGE: FeedbackMessage =
    FeedbackMessage::fixed("No se detecto imagen en el portapapeles", 1800);
pub const CLIPBOARD_READ_FAILED: FeedbackMessage =
    FeedbackMessage::fixed("No se pudo leer el portapapeles", 1800);
pub const PASTE_TARGET_MISSING: FeedbackMessage =
    FeedbackMessage::fixed("No se encontro el campo de imagen", 1800);
pub const FORM_MISSING: FeedbackMessage = FeedbackMessage::fixed("No se encontro el formulario", 1800);
pub const UPLOADING: FeedbackMessage =
    FeedbackMessage::fixed("Imagen pegada. Guardando alternativa...", 1200);
pub const UPLOAD_TOO_LARGE: FeedbackMessage =
    FeedbackMessage::fixed("La imagen supera el limite permitido", 2400);
pub const UPLOAD_FAILED: FeedbackMessage =
    FeedbackMessage::fixed("No se pudo guardar la alternativa", 2400);

/// The parts of the document the clipboard flows read and write.
///
/// Every method tolerates a missing element: lookups return `None`/`false`
/// and writes do nothing.
pub trait Page {
    /// Rendered text of the element, falling back to its form value.
    fn element_text(&self, id: &str) -> Option<String>;

    fn has_element(&self, id: &str) -> bool;

    /// Sets the value of an input; returns `false` when it does not exist.
    fn set_input_value(&self, id: &str, value: &str) -> bool;

    fn show_feedback(&self, id: &str, message: &FeedbackMessage);
}
