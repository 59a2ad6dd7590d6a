use crate::app::api::ApiCtx;
use crate::core::store::{toast_error, toast_success};
use crate::features::admin::logic::{
    THRESHOLD_FAILED_MESSAGE, format_threshold, parse_threshold, role_list,
    threshold_updated_message,
};
use crate::services::admin;
use crm_api_models::UserSummary;
use std::collections::BTreeMap;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[function_component(AdminUsersPage)]
pub(crate) fn admin_users_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let users = use_state(Vec::<UserSummary>::new);
    let drafts = use_state(BTreeMap::<i64, String>::new);
    let generation = use_state(|| 0_u32);

    {
        let api_ctx = api_ctx.clone();
        let users = users.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match admin::users(&ctx.client).await {
                            Ok(list) => users.set(list),
                            Err(err) => {
                                warn!(error = %err, "failed to load users");
                                toast_error(err.user_message());
                            }
                        }
                    });
                }
                || ()
            },
            *generation,
        );
    }

    let Some(api_ctx) = api_ctx else {
        return html! {
            <div class="panel">
                <p class="text-sm text-error">{"Missing API context."}</p>
            </div>
        };
    };

    let on_draft = {
        let drafts = drafts.clone();
        Callback::from(move |(id, value): (i64, String)| {
            let mut next = (*drafts).clone();
            next.insert(id, value);
            drafts.set(next);
        })
    };
    let on_save = {
        let client = api_ctx.client.clone();
        let drafts = drafts.clone();
        let generation = generation.clone();
        Callback::from(move |user: UserSummary| {
            let Some(threshold) = drafts.get(&user.id).and_then(|value| parse_threshold(value)) else {
                toast_error(THRESHOLD_FAILED_MESSAGE);
                return;
            };
            let client = client.clone();
            let drafts = drafts.clone();
            let generation = generation.clone();
            spawn_local(async move {
                match admin::update_threshold(&client, user.id, threshold).await {
                    Ok(_) => {
                        toast_success(threshold_updated_message(&user));
                        let mut next = (*drafts).clone();
                        next.remove(&user.id);
                        drafts.set(next);
                        generation.set(generation.wrapping_add(1));
                    }
                    Err(err) => {
                        warn!(error = %err, user = user.id, "threshold update rejected");
                        toast_error(THRESHOLD_FAILED_MESSAGE);
                    }
                }
            });
        })
    };

    html! {
        <div class="page admin-users">
            <header class="page-head">
                <h2>{"Users"}</h2>
            </header>
            <table class="table">
                <thead>
                    <tr>
                        <th>{"Username"}</th>
                        <th>{"Email"}</th>
                        <th>{"Team"}</th>
                        <th>{"Roles"}</th>
                        <th>{"Revenue threshold"}</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {for users.iter().map(|user| user_row(user, drafts.get(&user.id), &on_draft, &on_save))}
                </tbody>
            </table>
        </div>
    }
}

fn user_row(
    user: &UserSummary,
    draft: Option<&String>,
    on_draft: &Callback<(i64, String)>,
    on_save: &Callback<UserSummary>,
) -> Html {
    let id = user.id;
    let on_input = {
        let on_draft = on_draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                on_draft.emit((id, input.value()));
            }
        })
    };
    let on_click = {
        let on_save = on_save.clone();
        let user = user.clone();
        Callback::from(move |_| on_save.emit(user.clone()))
    };
    html! {
        <tr>
            <td>{user.username.clone()}</td>
            <td>{user.email.clone()}</td>
            <td>{user.team.map(|team| team.as_str()).unwrap_or("-")}</td>
            <td>{role_list(user)}</td>
            <td>
                <input
                    type="number"
                    min="0"
                    step="0.01"
                    placeholder={format_threshold(user.revenue_threshold)}
                    value={draft.cloned().unwrap_or_default()}
                    oninput={on_input}
                />
            </td>
            <td><button class="ghost" onclick={on_click} disabled={draft.is_none()}>{"Save"}</button></td>
        </tr>
    }
}
