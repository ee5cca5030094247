/// URL → view mapping of the single-page app
use yew::prelude::*;
use yew_router::prelude::*;

use crate::ui::library::LibraryView;
use crate::ui::story::StoryView;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub enum Route {
    #[at("/")]
    Root,
    #[at("/biblioteca")]
    Library,
    #[at("/biblioteca/*node_path")]
    LibraryNode { node_path: String },
    #[at("/cuento/*story_path")]
    Story { story_path: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Routes without a view of their own send the user to the library.
    pub fn redirect_target(&self) -> Option<Route> {
        match self {
            Route::Root | Route::NotFound => Some(Route::Library),
            _ => None,
        }
    }

    /// Library path of a library route, `""` for the root listing. Route
    /// parameters are already percent-decoded by the router.
    pub fn library_path(&self) -> Option<String> {
        match self {
            Route::Library => Some(String::new()),
            Route::LibraryNode { node_path } => Some(node_path.clone()),
            _ => None,
        }
    }

    pub fn story_path(&self) -> Option<String> {
        match self {
            Route::Story { story_path } => Some(story_path.clone()),
            _ => None,
        }
    }

    pub fn for_library_path(path: &str) -> Route {
        let path = path.trim_matches('/');
        if path.is_empty() {
            Route::Library
        } else {
            Route::LibraryNode {
                node_path: path.to_string(),
            }
        }
    }

    pub fn for_story_path(path: &str) -> Route {
        Route::Story {
            story_path: path.trim_matches('/').to_string(),
        }
    }
}

pub fn switch(route: Route) -> Html {
    if let Some(target) = route.redirect_target() {
        return html! { <Redirect<Route> to={target} /> };
    }

    if let Some(node_path) = route.library_path() {
        return html! { <LibraryView {node_path} /> };
    }

    match route.story_path() {
        Some(story_path) => html! { <StoryView {story_path} /> },
        None => html! {},
    }
}
