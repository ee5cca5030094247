/// Cuentos - browser front end of the illustrated story library
/// Built with Rust + WASM + Yew

pub mod api;
pub mod browser;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod feedback;
pub mod models;
pub mod router;
pub mod scroll;
pub mod toasts;
pub mod ui;
pub mod upload;

#[cfg(test)]
mod testing;

use std::rc::Rc;

use gloo::utils::document;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::browser::{clipboard_service, WebForms};
use crate::clipboard::PasteOptions;
use crate::config::AppConfig;
use crate::ui::app::{App, AppProps};

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    // Everything passes here; `start_app` narrows it to the configured level.
    wasm_logger::init(wasm_logger::Config::new(log::Level::Trace));
}

/// Copies the visible text of `element_id` and reports in `feedback_id`.
#[wasm_bindgen]
pub async fn copy_text_from_element(element_id: String, feedback_id: String) -> bool {
    clipboard_service()
        .copy_text_from_element(&element_id, &feedback_id)
        .await
}

/// Copies the image at `url` as an image clipboard item.
#[wasm_bindgen]
pub async fn copy_image_from_url(url: String, feedback_id: String) -> bool {
    clipboard_service()
        .copy_image_from_url(&url, &feedback_id)
        .await
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct PasteOptionsInput {
    success_message: Option<String>,
    success_timeout: Option<u32>,
}

fn paste_options(options: JsValue) -> PasteOptions {
    if options.is_undefined() || options.is_null() {
        return PasteOptions::default();
    }
    match serde_wasm_bindgen::from_value::<PasteOptionsInput>(options) {
        Ok(input) => PasteOptions::overridden(input.success_message, input.success_timeout),
        Err(e) => {
            log::warn!("Ignoring invalid paste options: {}", e);
            PasteOptions::default()
        }
    }
}

/// Pastes the clipboard image into the hidden input `input_id` as a data
/// URL. `options` may carry `successMessage` and `successTimeout`.
#[wasm_bindgen]
pub async fn paste_image_to_hidden(input_id: String, feedback_id: String, options: JsValue) -> bool {
    clipboard_service()
        .paste_image_to_hidden(&input_id, &feedback_id, &paste_options(options))
        .await
}

/// Pastes the clipboard image and saves it through the form `form_id`.
#[wasm_bindgen]
pub async fn paste_image_and_submit(input_id: String, feedback_id: String, form_id: String) -> bool {
    upload::paste_image_and_submit(
        &clipboard_service(),
        &WebForms,
        &input_id,
        &feedback_id,
        &form_id,
    )
    .await
}

/// Installs the post-swap scroll handler for the life of the page. Returns
/// `false` when it is already installed, by an earlier call or `start_app`.
#[wasm_bindgen]
pub fn install_read_progress_scroll(config: JsValue) -> bool {
    let config = AppConfig::from_js(config);
    scroll::install_page_scroll_once(&config)
}

// Start the Yew app
#[wasm_bindgen]
pub fn start_app(config: JsValue) {
    let config = AppConfig::from_js(config);
    log::set_max_level(config.level().to_level_filter());
    log::info!("Starting app against {}", config.api_base);

    scroll::install_page_scroll_once(&config);

    let root = config.mount_id.as_deref().and_then(|id| {
        let element = document().get_element_by_id(id);
        if element.is_none() {
            log::warn!("Mount element #{} not found, using <body>", id);
        }
        element
    });
    let props = AppProps {
        config: Rc::new(config),
    };

    match root {
        Some(root) => {
            yew::Renderer::<App>::with_root_and_props(root, props).render();
        }
        None => {
            yew::Renderer::<App>::with_props(props).render();
        }
    }
}
