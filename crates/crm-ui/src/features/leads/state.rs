//! Lead board state and the optimistic transition flow.
//!
//! # Design
//! - `begin_move` mutates the board and returns the pending move, or the reason it was rejected.
//! - `persist_move` is the only network step; `settle_move` folds its result back in.
//! - Search filters a derived copy; the stored board keeps every card.

use crate::core::board::{Board, BoardError, DropOutcome, MoveSettlement, PendingMove, StageCard};
use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::leads::{self, transition_note};
use crm_api_models::{Lead, LeadStage};
use tracing::warn;

impl StageCard for Lead {
    type Stage = LeadStage;

    fn card_id(&self) -> i64 {
        self.id
    }

    fn stage(&self) -> LeadStage {
        self.stage
    }

    fn set_stage(&mut self, stage: LeadStage) {
        self.stage = stage;
    }
}

/// Lead board slice.
#[derive(Clone, Debug, PartialEq)]
pub struct LeadBoardState {
    /// Every lead grouped by stage.
    pub board: Board<Lead>,
    /// Current search box contents.
    pub search: String,
}

impl Default for LeadBoardState {
    fn default() -> Self {
        Self {
            board: Board::new(&LeadStage::ALL),
            search: String::new(),
        }
    }
}

impl LeadBoardState {
    /// Board restricted to cards matching the search box.
    #[must_use]
    pub fn visible(&self) -> Board<Lead> {
        self.board.filtered(|lead| matches_search(lead, &self.search))
    }
}

/// Case-insensitive match on `"first last"` or on the stage with underscores read as spaces.
#[must_use]
pub fn matches_search(lead: &Lead, term: &str) -> bool {
    let term = term.to_lowercase();
    if term.is_empty() {
        return true;
    }
    lead.full_name().to_lowercase().contains(&term)
        || lead
            .stage
            .as_str()
            .to_lowercase()
            .replace('_', " ")
            .contains(&term)
}

/// Replace the board contents with a fresh listing.
pub fn set_leads(state: &mut LeadBoardState, leads: Vec<Lead>) {
    state.board = Board::from_items(&LeadStage::ALL, leads);
}

/// Apply a drop coming from the DOM, where the target column is a wire string.
///
/// # Errors
///
/// [`BoardError::UnknownColumn`] when `target` names no stage, [`BoardError::UnknownCard`]
/// when the card is gone. The board is unchanged in both cases.
pub fn begin_move(
    state: &mut LeadBoardState,
    card_id: i64,
    target: &str,
    anchor: Option<i64>,
) -> Result<DropOutcome<LeadStage>, BoardError> {
    let stage = LeadStage::parse(target).ok_or(BoardError::UnknownColumn)?;
    state.board.drop_before(card_id, stage, anchor)
}

/// Persist a cross-column move with its audit note.
///
/// # Errors
///
/// Propagates the transition failure.
pub async fn persist_move(client: &ApiClient, pending: &PendingMove<LeadStage>) -> Result<(), ApiError> {
    leads::transition(
        client,
        pending.card_id,
        pending.to_stage,
        transition_note(pending.to_stage),
    )
    .await
}

/// Fold the persist result into the board; returns the error toast text on failure.
pub fn settle_move(
    state: &mut LeadBoardState,
    pending: &PendingMove<LeadStage>,
    result: &Result<(), ApiError>,
) -> Option<String> {
    if state.board.settle(pending, result) == MoveSettlement::Missing {
        warn!(lead = pending.card_id, "lead left the board before its move settled");
    }
    result.as_ref().err().map(failure_message)
}

/// Toast shown when the backend rejects a transition.
#[must_use]
pub fn failure_message(err: &ApiError) -> String {
    format!("Failed to update stage: {}", err.user_message())
}
