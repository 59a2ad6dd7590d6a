//! App shell: context wiring, routing and the wasm entry point.
//!
//! # Design
//! - One `ApiCtx` per boot, provided through context.
//! - The stored session is mirrored into the store before the first render.
//! - Routes under `/dashboard` require a session and render inside the shell.

use crate::app::api::ApiCtx;
use crate::components::auth::LoginPage;
use crate::components::loader::GlobalLoader;
use crate::components::shell::AppShell;
use crate::components::toast::ToastHost;
use crate::core::store::{AppStore, app_dispatch, set_session};
use crate::features::admin::view::AdminUsersPage;
use crate::features::dashboard::view::DashboardPage;
use crate::features::lead_detail::view::LeadDetailPage;
use crate::features::leads::view::LeadBoardPage;
use crate::features::new_lead::view::NewLeadPage;
use crate::features::notifications::view::NotificationsPage;
use crate::features::pipeline::view::TechPipelinePage;
use crate::features::reminders::view::RemindersPage;
use crate::features::tasks::view::TasksPage;
use crate::features::team_leads::view::TeamLeadsPage;
use crate::features::teams::view::{MemberTasksPage, TeamMembersPage, TeamsPage};
use preferences::client_config;
pub(crate) use routes::{Route, TeamLeadsQuery};
use tracing::{error, info};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

pub(crate) mod api;
mod preferences;
mod routes;

#[function_component(CrmApp)]
pub fn crm_app() -> Html {
    let api_ctx = use_memo(
        |_| match client_config() {
            Ok(config) => {
                info!(api_base = %config.api_base(), "api client configured");
                let ctx = ApiCtx::new(config);
                let session = ctx.client.session();
                app_dispatch().reduce_mut(|store| set_session(&mut store.auth, session));
                Some(ctx)
            }
            Err(err) => {
                error!(error = %err, "invalid api configuration");
                None
            }
        },
        (),
    );

    let Some(api_ctx) = (*api_ctx).clone() else {
        return html! {
            <div class="panel">
                <p class="text-sm text-error">{"The API base URL is not valid. Check the crm.api_base_url setting."}</p>
            </div>
        };
    };

    html! {
        <ContextProvider<ApiCtx> context={api_ctx}>
            <BrowserRouter>
                <Switch<Route> render={switch} />
                <GlobalLoader />
                <ToastHost />
            </BrowserRouter>
        </ContextProvider<ApiCtx>>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Login => html! { <LoginPage /> },
        Route::NotFound => html! { <Redirect<Route> to={Route::Login} /> },
        protected => html! { <Protected route={protected} /> },
    }
}

#[derive(Properties, PartialEq)]
struct ProtectedProps {
    route: Route,
}

#[function_component(Protected)]
fn protected(props: &ProtectedProps) -> Html {
    let signed_in = use_selector(|store: &AppStore| store.auth.is_authenticated());
    if !*signed_in {
        return html! { <Redirect<Route> to={Route::Login} /> };
    }
    let page = match &props.route {
        Route::Dashboard => html! { <DashboardPage /> },
        Route::TeamLeads => html! { <TeamLeadsPage /> },
        Route::LeadBoard => html! { <LeadBoardPage /> },
        Route::NewLead => html! { <NewLeadPage /> },
        Route::LeadDetail { id } => html! { <LeadDetailPage id={*id} /> },
        Route::Teams => html! { <TeamsPage /> },
        Route::TeamMembers { team } => html! { <TeamMembersPage team={team.clone()} /> },
        Route::MemberTasks { team, member_id } => html! {
            <MemberTasksPage team={team.clone()} member_id={*member_id} />
        },
        Route::Tasks => html! { <TasksPage /> },
        Route::Reminders => html! { <RemindersPage /> },
        Route::Notifications => html! { <NotificationsPage /> },
        Route::TechPipeline => html! { <TechPipelinePage /> },
        Route::AdminUsers => html! { <AdminUsersPage /> },
        Route::Login | Route::NotFound => html! {},
    };
    html! {
        <AppShell active={props.route.clone()}>
            {page}
        </AppShell>
    }
}

/// Install logging and the panic hook, then mount the app on `#root`.
pub fn run_app() {
    console_error_panic_hook::set_once();
    wasm_tracing::set_as_global_default();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<CrmApp>::with_root(root).render();
    } else {
        yew::Renderer::<CrmApp>::new().render();
    }
}
