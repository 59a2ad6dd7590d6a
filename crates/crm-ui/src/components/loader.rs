//! Global loading overlay driven by the in-flight request count.

use crate::core::store::AppStore;
use yew::prelude::*;
use yewdux::prelude::use_selector;

/// Full-page spinner shown while counted requests are in flight.
#[function_component(GlobalLoader)]
pub(crate) fn global_loader() -> Html {
    let visible = use_selector(|store: &AppStore| store.loader.visible());
    if !*visible {
        return html! {};
    }
    html! {
        <div class="loader-overlay" role="progressbar" aria-busy="true">
            <div class="spinner"></div>
        </div>
    }
}
