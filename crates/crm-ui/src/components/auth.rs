use crate::app::Route;
use crate::app::api::ApiCtx;
use crate::services::auth::{self, login_error_message};
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::use_navigator;

/// Sign-in page; an existing session is re-validated before showing the form.
#[function_component(LoginPage)]
pub(crate) fn login_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let navigator = use_navigator();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None as Option<String>);
    let busy = use_state(|| false);

    {
        let api_ctx = api_ctx.clone();
        let navigator = navigator.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    if ctx.client.session().is_some() {
                        spawn_local(async move {
                            match auth::validate_session(&ctx.client).await {
                                Ok(user) => {
                                    info!(username = %user.username, "resumed session");
                                    if let Some(navigator) = navigator {
                                        navigator.push(&Route::Dashboard);
                                    }
                                }
                                Err(err) => warn!(error = %err, "stored session rejected"),
                            }
                        });
                    }
                }
                || ()
            },
            (),
        );
    }

    let Some(api_ctx) = api_ctx else {
        return html! {
            <div class="panel">
                <p class="text-sm text-error">{"Missing API context."}</p>
            </div>
        };
    };

    let on_username = {
        let username = username.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                username.set(input.value());
            }
        })
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                password.set(input.value());
            }
        })
    };

    let on_submit = {
        let username = username.clone();
        let password = password.clone();
        let error = error.clone();
        let busy = busy.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *busy {
                return;
            }
            busy.set(true);
            error.set(None);
            let client = api_ctx.client.clone();
            let navigator = navigator.clone();
            let username = (*username).clone();
            let password = (*password).clone();
            let error = error.clone();
            let busy = busy.clone();
            spawn_local(async move {
                match auth::login(&client, &username, &password).await {
                    Ok(_) => {
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Dashboard);
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "sign-in failed");
                        error.set(Some(login_error_message(&err)));
                    }
                }
                busy.set(false);
            });
        })
    };

    html! {
        <div class="login-page">
            <form class="card" onsubmit={on_submit}>
                <header>
                    <h3>{"Sign in"}</h3>
                </header>
                <label class="stack">
                    <span>{"Username"}</span>
                    <input type="text" autocomplete="username" value={(*username).clone()} oninput={on_username} />
                </label>
                <label class="stack">
                    <span>{"Password"}</span>
                    <input type="password" autocomplete="current-password" value={(*password).clone()} oninput={on_password} />
                </label>
                {if let Some(err) = &*error {
                    html! { <p class="error-text">{err}</p> }
                } else { html! {} }}
                <div class="actions">
                    <button class="solid" type="submit" disabled={*busy}>{"Sign in"}</button>
                </div>
            </form>
        </div>
    }
}
