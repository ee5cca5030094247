/// Application shell: router, shared context and toasts

use std::rc::Rc;

use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::ApiClient;
use crate::browser::FetchTransport;
use crate::config::AppConfig;
use crate::router::{switch, Route};
use crate::toasts::ToastQueue;
use crate::ui::components::{use_toasts, ToastHost};

/// What every view needs: settings, the API client and the toast queue.
#[derive(Clone)]
pub struct AppContext {
    pub config: Rc<AppConfig>,
    pub api: Rc<ApiClient<FetchTransport>>,
    pub toasts: ToastQueue,
}

impl AppContext {
    pub fn new(config: Rc<AppConfig>, toasts: ToastQueue) -> Self {
        let api = Rc::new(ApiClient::new(FetchTransport, config.api_base.clone()));
        AppContext { config, api, toasts }
    }
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.config, &other.config)
            && Rc::ptr_eq(&self.api, &other.api)
            && self.toasts == other.toasts
    }
}

/// The provided `AppContext`, or a default one when rendered outside `App`.
#[hook]
pub fn use_app_context() -> AppContext {
    let fallback = use_memo((), |_| {
        AppContext::new(Rc::new(AppConfig::default()), ToastQueue::default())
    });
    use_context::<AppContext>().unwrap_or_else(|| (*fallback).clone())
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    #[prop_or_default]
    pub config: Rc<AppConfig>,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let toasts = use_toasts();

    let context = {
        let toasts = toasts.clone();
        use_memo(props.config.clone(), move |config| {
            AppContext::new(config.clone(), toasts)
        })
    };

    let on_dismiss = {
        let toasts = toasts.clone();
        Callback::from(move |id: u64| toasts.dismiss(id))
    };

    html! {
        <ContextProvider<AppContext> context={(*context).clone()}>
            <BrowserRouter>
                <main class="cuentos-app">
                    <Switch<Route> render={switch} />
                </main>
            </BrowserRouter>
            <ToastHost toasts={toasts.items()} {on_dismiss} />
        </ContextProvider<AppContext>>
    }
}
