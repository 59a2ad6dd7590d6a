use crate::app::Route;
use crate::app::api::ApiCtx;
use crate::core::store::{toast_error, toast_success};
use crate::features::new_lead::state::{CREATE_FAILED_MESSAGE, created_message, is_complete, submit};
use crate::services::leads;
use crm_api_models::{NewLead, TeamCode, UserSummary};
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;
use yew_router::prelude::*;

type Setter = fn(&mut NewLead, String);

fn text_field(label: &'static str, kind: &'static str, value: &str, form: &UseStateHandle<NewLead>, set: Setter) -> Html {
    let form = form.clone();
    let oninput = Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
            let mut next = (*form).clone();
            set(&mut next, input.value());
            form.set(next);
        }
    });
    html! {
        <label class="form-group">
            {label}
            <input type={kind} value={value.to_string()} {oninput} />
        </label>
    }
}

#[function_component(NewLeadPage)]
pub(crate) fn new_lead_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let navigator = use_navigator();
    let form = use_state(NewLead::default);
    let users = use_state(Vec::<UserSummary>::new);
    let saving = use_state(|| false);

    {
        let api_ctx = api_ctx.clone();
        let users = users.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = api_ctx {
                    spawn_local(async move {
                        match leads::users(&ctx.client).await {
                            Ok(list) => users.set(list),
                            Err(err) => warn!(error = %err, "failed to load lead generators"),
                        }
                    });
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

    let on_team = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            if let Some(team) = e
                .target_dyn_into::<HtmlSelectElement>()
                .and_then(|select| TeamCode::parse(&select.value()))
            {
                let mut next = (*form).clone();
                next.assigned_team = team;
                form.set(next);
            }
        })
    };
    let on_generator = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                let mut next = (*form).clone();
                next.lead_generator = select.value().parse::<i64>().ok();
                form.set(next);
            }
        })
    };
    let on_requirements = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                let mut next = (*form).clone();
                next.tech_requirements = area.value();
                form.set(next);
            }
        })
    };
    let on_submit = {
        let client = api_ctx.client.clone();
        let form = form.clone();
        let saving = saving.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let client = client.clone();
            let body = (*form).clone();
            let saving = saving.clone();
            let navigator = navigator.clone();
            saving.set(true);
            spawn_local(async move {
                match submit(&client, &body).await {
                    Ok(Some(lead)) => {
                        toast_success(created_message(&lead));
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::TeamLeads);
                        }
                    }
                    Ok(None) => saving.set(false),
                    Err(err) => {
                        warn!(error = %err, "lead creation failed");
                        toast_error(CREATE_FAILED_MESSAGE);
                        saving.set(false);
                    }
                }
            });
        })
    };

    html! {
        <div class="page new-lead">
            <header class="page-head">
                <h2>{"Create Lead"}</h2>
            </header>
            <form class="panel form" onsubmit={on_submit}>
                {text_field("First name", "text", &form.first_name, &form, |lead, value| lead.first_name = value)}
                {text_field("Last name", "text", &form.last_name, &form, |lead, value| lead.last_name = value)}
                {text_field("Email", "email", &form.email, &form, |lead, value| lead.email = value)}
                {text_field("Phone", "tel", &form.phone, &form, |lead, value| lead.phone = value)}
                {text_field("Company", "text", &form.company_name, &form, |lead, value| lead.company_name = value)}
                <label class="form-group">
                    {"Tech requirements"}
                    <textarea value={form.tech_requirements.clone()} oninput={on_requirements} />
                </label>
                <label class="form-group">
                    {"Team"}
                    <select onchange={on_team}>
                        {for TeamCode::ALL.iter().map(|team| html! {
                            <option value={team.as_str()} selected={form.assigned_team == *team}>{team.as_str()}</option>
                        })}
                    </select>
                </label>
                <label class="form-group">
                    {"Lead generator"}
                    <select onchange={on_generator}>
                        <option value="" selected={form.lead_generator.is_none()}>{"None"}</option>
                        {for users.iter().map(|user| html! {
                            <option value={user.id.to_string()} selected={form.lead_generator == Some(user.id)}>{user.username.clone()}</option>
                        })}
                    </select>
                </label>
                <button class="solid" type="submit" disabled={*saving || !is_complete(&form)}>
                    {if *saving { "Saving..." } else { "Create Lead" }}
                </button>
            </form>
        </div>
    }
}
