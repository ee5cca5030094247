/// Shared UI pieces: toast stack and its hook

use std::rc::Rc;

use patternfly_yew::prelude::*;
use yew::prelude::*;

use crate::toasts::{Toast, ToastQueue, ToastTone};

/// Returns the component's `ToastQueue`, re-rendering the caller whenever a
/// toast is pushed, dismissed or expires.
#[hook]
pub fn use_toasts() -> ToastQueue {
    let queue = use_state(ToastQueue::default);
    let update = use_force_update();

    {
        let queue = (*queue).clone();
        use_effect_with((), move |_| {
            queue.set_listener(Some(Rc::new(move || update.force_update())));
            move || queue.set_listener(None)
        });
    }

    (*queue).clone()
}

fn alert_type(tone: ToastTone) -> AlertType {
    match tone {
        ToastTone::Info => AlertType::Info,
        ToastTone::Success => AlertType::Success,
        ToastTone::Warning => AlertType::Warning,
        ToastTone::Danger => AlertType::Danger,
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastHostProps {
    pub toasts: Vec<Toast>,
    pub on_dismiss: Callback<u64>,
}

/// Active toasts, oldest first.
#[function_component(ToastHost)]
pub fn toast_host(props: &ToastHostProps) -> Html {
    if props.toasts.is_empty() {
        return html! {};
    }

    html! {
        <div class="toast-stack" role="status" aria-live="polite">
            { for props.toasts.iter().map(|toast| {
                let on_close = {
                    let on_dismiss = props.on_dismiss.clone();
                    let id = toast.id;
                    Callback::from(move |_: MouseEvent| on_dismiss.emit(id))
                };
                html! {
                    <div class="toast-item" key={toast.id}>
                        <Alert r#type={alert_type(toast.tone)} title={toast.message.clone()} inline={true}>
                            <Button onclick={on_close} variant={ButtonVariant::Plain}>
                                {"Cerrar"}
                            </Button>
                        </Alert>
                    </div>
                }
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    #[prop_or_default]
    pub message: Option<String>,
}

#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <div class="loading-container">
            <Spinner />
            if let Some(msg) = &props.message {
                <p class="loading-message">{msg}</p>
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tone_has_an_alert_type() {
        assert!(matches!(alert_type(ToastTone::Info), AlertType::Info));
        assert!(matches!(alert_type(ToastTone::Success), AlertType::Success));
        assert!(matches!(alert_type(ToastTone::Warning), AlertType::Warning));
        assert!(matches!(alert_type(ToastTone::Danger), AlertType::Danger));
    }
}
