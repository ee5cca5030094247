/// Brings the story content into view after an htmx-style fragment swap
use std::cell::Cell;

use gloo::events::EventListener;
use gloo::utils::{body, window};
use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, ScrollBehavior, ScrollToOptions};

use crate::config::AppConfig;

/// Page offset that leaves an element's top `offset_px` below the viewport top.
pub fn scroll_top_for(element_top: f64, scroll_y: f64, offset_px: f64) -> f64 {
    element_top + scroll_y - offset_px
}

/// Listens on `<body>` for `config.swap_event`. Dropping the listener
/// detaches it.
pub fn install_read_progress_scroll(config: &AppConfig) -> EventListener {
    let container_id = config.story_container_id.clone();
    let offset_px = config.scroll_offset_px;

    EventListener::new(&body(), config.swap_event.clone(), move |event| {
        on_after_swap(event, &container_id, offset_px);
    })
}

thread_local! {
    static PAGE_LISTENER_INSTALLED: Cell<bool> = const { Cell::new(false) };
}

/// Marks the page-lifetime listener as installed; `false` if it already was.
fn claim_page_listener() -> bool {
    PAGE_LISTENER_INSTALLED.with(|installed| !installed.replace(true))
}

/// Installs the listener for the life of the page. Later calls, from
/// either `start_app` or the standalone export, are no-ops.
pub fn install_page_scroll_once(config: &AppConfig) -> bool {
    if !claim_page_listener() {
        debug!("Read progress scroll already installed");
        return false;
    }
    install_read_progress_scroll(config).forget();
    true
}

fn on_after_swap(event: &Event, container_id: &str, offset_px: f64) {
    let Some(target) = event
        .target()
        .and_then(|t| t.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    if target.id() != container_id {
        return;
    }

    let window = window();
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let top = scroll_top_for(target.get_bounding_client_rect().top(), scroll_y, offset_px);
    debug!("Scrolling to #{} at {}", container_id, top);

    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}
