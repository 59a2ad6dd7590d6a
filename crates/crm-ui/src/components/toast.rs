//! Toast stack with one auto-dismiss timer per toast.

use crate::core::store::{AppStore, TOAST_TIMEOUT_MS, Toast, app_dispatch, dismiss_toast};
use gloo::timers::callback::Timeout;
use yew::prelude::*;
use yewdux::prelude::use_selector;

/// Renders the store's toast stack, newest first.
#[function_component(ToastHost)]
pub(crate) fn toast_host() -> Html {
    let toasts = use_selector(|store: &AppStore| store.toasts.items.clone());
    let on_dismiss = Callback::from(|id: u64| {
        app_dispatch().reduce_mut(|store| dismiss_toast(&mut store.toasts, id));
    });

    html! {
        <div class="toast-host" aria-live="polite" aria-atomic="true">
            {for toasts.iter().map(|toast| html! {
                <ToastItem key={toast.id} toast={toast.clone()} on_dismiss={on_dismiss.clone()} />
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ToastItemProps {
    toast: Toast,
    on_dismiss: Callback<u64>,
}

/// One toast; its timer starts when it mounts and is cancelled if it is dismissed first.
#[function_component(ToastItem)]
fn toast_item(props: &ToastItemProps) -> Html {
    let id = props.toast.id;
    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with_deps(
            move |id: &u64| {
                let id = *id;
                let handle = Timeout::new(TOAST_TIMEOUT_MS, move || on_dismiss.emit(id));
                move || drop(handle)
            },
            id,
        );
    }
    let on_close = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_| on_dismiss.emit(id))
    };

    html! {
        <div class={classes!("toast", props.toast.kind.css_class())} role="status">
            <div>
                <strong>{props.toast.title.clone()}</strong>
                <span>{props.toast.message.clone()}</span>
            </div>
            <button class="ghost" aria-label="Dismiss" onclick={on_close}>{"✕"}</button>
        </div>
    }
}
