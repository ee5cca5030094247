/// Library browser: one node of the tree with its children

use log::warn;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::LibraryQuery;
use crate::models::{KindFilter, LibraryChild, LibraryListing, NodeType};
use crate::router::Route;
use crate::toasts::ToastTone;
use crate::ui::app::use_app_context;
use crate::ui::components::Loading;

const KIND_OPTIONS: [KindFilter; 4] = [
    KindFilter::All,
    KindFilter::Node,
    KindFilter::Book,
    KindFilter::Story,
];

fn kind_label(kind: KindFilter) -> &'static str {
    match kind {
        KindFilter::All => "Todo",
        KindFilter::Node => "Carpetas",
        KindFilter::Book => "Libros",
        KindFilter::Story => "Cuentos",
    }
}

/// Where a listing entry leads: stories open the reader, the rest browse deeper.
fn child_route(child: &LibraryChild) -> Route {
    match (child.node_type, &child.story) {
        (NodeType::Story, Some(story)) if !story.story_rel_path.is_empty() => {
            Route::for_story_path(&story.story_rel_path)
        }
        (NodeType::Story, _) => Route::for_story_path(&child.path_rel),
        _ => Route::for_library_path(&child.path_rel),
    }
}

#[derive(Clone, PartialEq)]
enum ViewState {
    Loading,
    Ready(LibraryListing),
    Error(String),
}

#[derive(Properties, PartialEq)]
pub struct LibraryViewProps {
    pub node_path: String,
}

#[function_component(LibraryView)]
pub fn library_view(props: &LibraryViewProps) -> Html {
    let ctx = use_app_context();
    let state = use_state(|| ViewState::Loading);
    let query_input = use_state(String::new);
    // (q, kind) actually sent to the server
    let applied = use_state(|| (String::new(), KindFilter::All));

    // Reload whenever the node or the applied filters change
    {
        let state = state.clone();
        let ctx = ctx.clone();
        use_effect_with(
            (props.node_path.clone(), (*applied).clone()),
            move |(path, (q, kind))| {
                let query = LibraryQuery {
                    path: path.clone(),
                    q: q.clone(),
                    kind: *kind,
                    ..LibraryQuery::default()
                };
                state.set(ViewState::Loading);

                spawn_local(async move {
                    match ctx.api.get_library_node(&query).await {
                        Ok(listing) => state.set(ViewState::Ready(listing)),
                        Err(e) => {
                            warn!("Failed to load library node {:?}: {:?}", query.path, e);
                            ctx.toasts.push(e.to_string(), ToastTone::Danger);
                            state.set(ViewState::Error(e.to_string()));
                        }
                    }
                });
                || ()
            },
        );
    }

    let on_query_input = {
        let query_input = query_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                query_input.set(input.value());
            }
        })
    };

    let on_search = {
        let query_input = query_input.clone();
        let applied = applied.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            applied.set(((*query_input).trim().to_string(), applied.1));
        })
    };

    let on_kind = {
        let applied = applied.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                applied.set((applied.0.clone(), KindFilter::parse(&select.value())));
            }
        })
    };

    let filters = html! {
        <form class="library-filters" onsubmit={on_search}>
            <input
                type="search"
                placeholder="Buscar"
                value={(*query_input).clone()}
                oninput={on_query_input}
            />
            <select onchange={on_kind}>
                { for KIND_OPTIONS.iter().map(|kind| html! {
                    <option value={kind.as_str()} selected={applied.1 == *kind}>
                        {kind_label(*kind)}
                    </option>
                }) }
            </select>
            <button type="submit">{"Buscar"}</button>
        </form>
    };

    let body = match &*state {
        ViewState::Loading => html! { <Loading message={"Cargando biblioteca..."} /> },
        ViewState::Error(message) => html! {
            <p class="library-error">{message}</p>
        },
        ViewState::Ready(listing) => render_listing(listing),
    };

    html! {
        <section class="library-view">
            {filters}
            {body}
        </section>
    }
}

fn render_listing(listing: &LibraryListing) -> Html {
    let title = if listing.node.name.is_empty() {
        "Biblioteca".to_string()
    } else {
        listing.node.name.clone()
    };

    html! {
        <>
            <nav class="breadcrumbs">
                <Link<Route> to={Route::Library}>{"Biblioteca"}</Link<Route>>
                { for listing.breadcrumbs.iter().map(|crumb| html! {
                    <>
                        {" / "}
                        <Link<Route> to={Route::for_library_path(&crumb.path)}>
                            {crumb.name.clone()}
                        </Link<Route>>
                    </>
                }) }
            </nav>
            <h1>{title}</h1>
            if listing.children.is_empty() {
                <p class="library-empty">{"No hay elementos."}</p>
            } else {
                <ul class="library-children">
                    { for listing.children.iter().map(render_child) }
                </ul>
            }
        </>
    }
}

fn render_child(child: &LibraryChild) -> Html {
    let details = child.story.as_ref().map(|story| {
        format!(
            "{} · {} páginas · {} imágenes",
            story.status, story.pages, story.alternatives
        )
    });

    html! {
        <li class={classes!("library-child", format!("library-child-{}", kind_class(child.node_type)))}>
            <Link<Route> to={child_route(child)}>{child.name.clone()}</Link<Route>>
            if let Some(details) = details {
                <span class="library-child-details">{details}</span>
            }
        </li>
    }
}

fn kind_class(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Node => "node",
        NodeType::Book => "book",
        NodeType::Story => "story",
    }
}
