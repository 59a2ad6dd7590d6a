//! Routing definitions for the CRM UI.
use serde::{Deserialize, Serialize};
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Login,
    #[at("/dashboard")]
    Dashboard,
    #[at("/dashboard/leads")]
    TeamLeads,
    #[at("/dashboard/leads/pipeline")]
    LeadBoard,
    #[at("/dashboard/leads/new")]
    NewLead,
    #[at("/dashboard/leads/:id")]
    LeadDetail { id: i64 },
    #[at("/dashboard/teams")]
    Teams,
    #[at("/dashboard/teams/:team")]
    TeamMembers { team: String },
    #[at("/dashboard/teams/:team/member/:member_id")]
    MemberTasks { team: String, member_id: i64 },
    #[at("/dashboard/tasks")]
    Tasks,
    #[at("/dashboard/reminders")]
    Reminders,
    #[at("/dashboard/notifications")]
    Notifications,
    #[at("/dashboard/tech-pipeline")]
    TechPipeline,
    #[at("/dashboard/admin/users")]
    AdminUsers,
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Query string understood by the team lead list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TeamLeadsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unassigned: Option<String>,
}

impl TeamLeadsQuery {
    pub(crate) fn unassigned_override(&self) -> bool {
        self.unassigned.as_deref() == Some("true")
    }
}
