/// Story reader and editor: one page with its text and illustration slots

use std::future::Future;
use std::rc::Rc;

use log::{debug, warn};
use patternfly_yew::prelude::*;
use serde::{Deserialize, Serialize};
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, FormData, HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::ApiClient;
use crate::browser::FetchTransport;
use crate::error::ApiError;
use crate::models::{Alternative, PageEdit, Slot, StoryDetail};
use crate::router::Route;
use crate::toasts::ToastTone;
use crate::ui::app::{use_app_context, AppContext};
use crate::ui::components::Loading;
use crate::upload::IMAGE_FILE_FIELD;

/// `?p=` of a story URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
}

impl PageQuery {
    pub fn page(number: u32) -> Self {
        PageQuery { p: Some(number) }
    }
}

#[derive(Clone, PartialEq)]
enum StoryState {
    Loading,
    Idle,
    Saving(String),
    Error(String),
}

type Api = Rc<ApiClient<FetchTransport>>;

/// Runs a page/slot mutation and swaps in the story detail it returns.
fn run_mutation<F, Fut>(
    ctx: &AppContext,
    state: &UseStateHandle<StoryState>,
    detail: &UseStateHandle<Option<StoryDetail>>,
    busy: &str,
    done: &'static str,
    request: F,
) where
    F: FnOnce(Api) -> Fut + 'static,
    Fut: Future<Output = Result<StoryDetail, ApiError>> + 'static,
{
    let api = ctx.api.clone();
    let toasts = ctx.toasts.clone();
    let state = state.clone();
    let detail = detail.clone();
    let busy = busy.to_string();

    state.set(StoryState::Saving(busy.clone()));
    spawn_local(async move {
        match request(api).await {
            Ok(updated) => {
                detail.set(Some(updated));
                toasts.push(done, ToastTone::Success);
            }
            Err(e) => {
                warn!("{} failed: {:?}", busy, e);
                toasts.push(e.to_string(), ToastTone::Danger);
            }
        }
        state.set(StoryState::Idle);
    });
}

fn upload_form(file: &File) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(|e| ApiError::new(format!("{:?}", e)))?;
    form.append_with_blob_and_filename(IMAGE_FILE_FIELD, file, &file.name())
        .map_err(|e| ApiError::new(format!("{:?}", e)))?;
    Ok(form)
}

#[derive(Properties, PartialEq)]
pub struct StoryViewProps {
    pub story_path: String,
}

#[function_component(StoryView)]
pub fn story_view(props: &StoryViewProps) -> Html {
    let ctx = use_app_context();
    let location = use_location();
    let requested_page = location
        .and_then(|l| l.query::<PageQuery>().ok())
        .and_then(|q| q.p);

    let state = use_state(|| StoryState::Loading);
    let detail = use_state(|| None::<StoryDetail>);
    // Unsaved text; `None` shows the stored text
    let draft = use_state(|| None::<String>);

    // Load on mount and whenever the story or page changes
    {
        let state = state.clone();
        let detail = detail.clone();
        let draft = draft.clone();
        let ctx = ctx.clone();
        use_effect_with(
            (props.story_path.clone(), requested_page),
            move |(story_path, page)| {
                let story_path = story_path.clone();
                let page = *page;
                state.set(StoryState::Loading);
                draft.set(None);

                spawn_local(async move {
                    match ctx.api.get_story(&story_path, page).await {
                        Ok(loaded) => {
                            debug!("Loaded {} page {:?}", story_path, page);
                            detail.set(Some(loaded));
                            state.set(StoryState::Idle);
                        }
                        Err(e) => {
                            warn!("Failed to load story {}: {:?}", story_path, e);
                            ctx.toasts.push(e.to_string(), ToastTone::Danger);
                            state.set(StoryState::Error(e.to_string()));
                        }
                    }
                });
                || ()
            },
        );
    }

    let Some(story) = (*detail).clone() else {
        return match &*state {
            StoryState::Error(message) => html! {
                <section class="story-view">
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {message}
                    </Alert>
                    <Link<Route> to={Route::Library}>{"Volver a la biblioteca"}</Link<Route>>
                </section>
            },
            _ => html! { <Loading message={"Cargando cuento..."} /> },
        };
    };

    let is_busy = matches!(*state, StoryState::Loading | StoryState::Saving(_));
    let page_number = story
        .page
        .as_ref()
        .map(|p| p.page_number)
        .unwrap_or(story.pagination.selected_page);
    let story_path = if story.story.story_rel_path.is_empty() {
        props.story_path.clone()
    } else {
        story.story.story_rel_path.clone()
    };

    let on_text_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                draft.set(Some(area.value()));
            }
        })
    };

    let on_save_text = {
        let ctx = ctx.clone();
        let state = state.clone();
        let detail = detail.clone();
        let draft = draft.clone();
        let story_path = story_path.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(text) = (*draft).clone() else {
                return;
            };
            let edit = PageEdit {
                text_current: Some(text),
                ..PageEdit::default()
            };
            let body = match serde_json::to_value(&edit) {
                Ok(body) => body,
                Err(e) => {
                    ctx.toasts.push(e.to_string(), ToastTone::Danger);
                    return;
                }
            };
            let story_path = story_path.clone();
            run_mutation(&ctx, &state, &detail, "Guardando texto", "Texto guardado", move |api| async move {
                api.patch_story_page(&story_path, page_number, body).await
            });
        })
    };

    let on_activate = {
        let ctx = ctx.clone();
        let state = state.clone();
        let detail = detail.clone();
        let story_path = story_path.clone();
        Callback::from(move |(slot_name, alternative_id): (String, String)| {
            let story_path = story_path.clone();
            run_mutation(&ctx, &state, &detail, "Activando alternativa", "Alternativa activada", move |api| async move {
                api.set_slot_active(&story_path, page_number, &slot_name, &alternative_id)
                    .await
            });
        })
    };

    let on_upload = {
        let ctx = ctx.clone();
        let state = state.clone();
        let detail = detail.clone();
        let story_path = story_path.clone();
        Callback::from(move |(slot_name, file): (String, File)| {
            let form = match upload_form(&file) {
                Ok(form) => form,
                Err(e) => {
                    warn!("Failed to prepare upload for {}: {:?}", slot_name, e);
                    ctx.toasts.push(e.to_string(), ToastTone::Danger);
                    return;
                }
            };
            let story_path = story_path.clone();
            run_mutation(&ctx, &state, &detail, "Subiendo imagen", "Imagen subida", move |api| async move {
                api.upload_alternative(&story_path, page_number, &slot_name, form)
                    .await
            });
        })
    };

    let page_html = match &story.page {
        Some(page) => {
            let text = (*draft)
                .clone()
                .unwrap_or_else(|| page.text.current.clone());
            let has_changes = draft.is_some();
            html! {
                <>
                    <article class="story-text">
                        <h2>{format!("Página {}", page.page_number)}</h2>
                        <p class="story-text-original">{page.text.original.clone()}</p>
                        <textarea
                            class="story-text-current"
                            value={text}
                            oninput={on_text_input}
                            disabled={is_busy}
                        />
                        <Button
                            onclick={on_save_text}
                            disabled={is_busy || !has_changes}
                            variant={ButtonVariant::Primary}
                        >
                            {"Guardar texto"}
                        </Button>
                    </article>
                    <div class="story-slots">
                        { for page.slots.iter().map(|slot| html! {
                            <SlotCard
                                key={slot.slot_name.clone()}
                                slot={slot.clone()}
                                busy={is_busy}
                                on_activate={on_activate.clone()}
                                on_upload={on_upload.clone()}
                            />
                        }) }
                    </div>
                </>
            }
        }
        None => html! { <p class="story-empty">{"Este cuento no tiene páginas."}</p> },
    };

    let title = if story.story.title.is_empty() {
        story_path.clone()
    } else {
        story.story.title.clone()
    };

    html! {
        <section class="story-view">
            <nav class="breadcrumbs">
                <Link<Route> to={Route::Library}>{"Biblioteca"}</Link<Route>>
                { for story.breadcrumbs.iter().map(|crumb| html! {
                    <>
                        {" / "}
                        <Link<Route> to={Route::for_library_path(&crumb.path)}>
                            {crumb.name.clone()}
                        </Link<Route>>
                    </>
                }) }
            </nav>
            <h1>{title}</h1>
            if let StoryState::Saving(message) = &*state {
                <Loading message={format!("{}...", message)} />
            }
            {page_html}
            {pagination(&story_path, &story)}
        </section>
    }
}

fn pagination(story_path: &str, story: &StoryDetail) -> Html {
    let route = Route::for_story_path(story_path);
    let link = |number: u32, label: String| {
        html! {
            <Link<Route, PageQuery> to={route.clone()} query={Some(PageQuery::page(number))}>
                {label}
            </Link<Route, PageQuery>>
        }
    };
    let pages = &story.pagination;

    html! {
        <nav class="story-pagination">
            if let Some(prev) = pages.prev_page {
                {link(prev, "« Anterior".to_string())}
            }
            { for pages.page_numbers.iter().map(|n| {
                if *n == pages.selected_page {
                    html! { <strong class="story-page-current">{n.to_string()}</strong> }
                } else {
                    link(*n, n.to_string())
                }
            }) }
            if let Some(next) = pages.next_page {
                {link(next, "Siguiente »".to_string())}
            }
        </nav>
    }
}

#[derive(Properties, PartialEq)]
struct SlotCardProps {
    slot: Slot,
    busy: bool,
    on_activate: Callback<(String, String)>,
    on_upload: Callback<(String, File)>,
}

#[function_component(SlotCard)]
fn slot_card(props: &SlotCardProps) -> Html {
    let slot_name = props.slot.slot_name.clone();

    let on_file = {
        let on_upload = props.on_upload.clone();
        let slot_name = slot_name.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                on_upload.emit((slot_name.clone(), file));
            }
            input.set_value("");
        })
    };

    html! {
        <div class="slot-card">
            <h3>{slot_name.clone()}</h3>
            if !props.slot.prompt.current.is_empty() {
                <p class="slot-prompt">{props.slot.prompt.current.clone()}</p>
            }
            <ul class="slot-alternatives">
                { for props.slot.alternatives.iter().map(|alternative| {
                    alternative_item(alternative, &slot_name, props.busy, &props.on_activate)
                }) }
            </ul>
            <label class="slot-upload">
                {"Subir imagen"}
                <input type="file" accept="image/*" onchange={on_file} disabled={props.busy} />
            </label>
        </div>
    }
}

fn alternative_item(
    alternative: &Alternative,
    slot_name: &str,
    busy: bool,
    on_activate: &Callback<(String, String)>,
) -> Html {
    let onclick = {
        let on_activate = on_activate.clone();
        let key = (slot_name.to_string(), alternative.id.clone());
        Callback::from(move |_: MouseEvent| on_activate.emit(key.clone()))
    };

    html! {
        <li key={alternative.id.clone()} class={classes!("slot-alternative", alternative.is_active.then_some("is-active"))}>
            if let Some(url) = alternative.image_url.as_ref().filter(|_| alternative.image_exists) {
                <img src={url.clone()} alt={alternative.slug.clone()} loading="lazy" />
            } else {
                <span class="slot-alternative-missing">{"Imagen no disponible"}</span>
            }
            if alternative.is_active {
                <span class="slot-alternative-active">{"Activa"}</span>
            } else {
                <Button {onclick} disabled={busy} variant={ButtonVariant::Secondary}>
                    {"Activar"}
                </Button>
            }
        </li>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_serialization() {
        assert_eq!(serde_json::to_string(&PageQuery::page(3)).unwrap(), r#"{"p":3}"#);
        assert_eq!(serde_json::to_string(&PageQuery::default()).unwrap(), "{}");
    }

    #[test]
    fn test_page_query_missing_page() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.p, None);
    }
}
