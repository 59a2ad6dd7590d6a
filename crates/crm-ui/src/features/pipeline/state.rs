//! Tech pipeline board state.

use crate::core::board::{Board, BoardError, DropOutcome, MoveSettlement, PendingMove, StageCard};
use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::pipeline;
use crm_api_models::{TechPipeline, TechPipelineStage};
use tracing::warn;

/// Toast shown when the board cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load Tech Pipelines";
/// Toast shown when a stage change is rejected.
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update stage";

impl StageCard for TechPipeline {
    type Stage = TechPipelineStage;

    fn card_id(&self) -> i64 {
        self.id
    }

    fn stage(&self) -> TechPipelineStage {
        self.stage
    }

    fn set_stage(&mut self, stage: TechPipelineStage) {
        self.stage = stage;
    }
}

/// Pipeline board slice.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineBoardState {
    /// Pipelines grouped by stage.
    pub board: Board<TechPipeline>,
}

impl Default for PipelineBoardState {
    fn default() -> Self {
        Self {
            board: Board::new(&TechPipelineStage::ALL),
        }
    }
}

/// Replace the board contents.
pub fn set_pipelines(state: &mut PipelineBoardState, items: Vec<TechPipeline>) {
    state.board = Board::from_items(&TechPipelineStage::ALL, items);
}

/// Apply a drop on the column identified by its wire value.
///
/// # Errors
///
/// [`BoardError`] when the column or card is unknown.
pub fn begin_move(
    state: &mut PipelineBoardState,
    card_id: i64,
    target: &str,
    anchor: Option<i64>,
) -> Result<DropOutcome<TechPipelineStage>, BoardError> {
    let stage = TechPipelineStage::parse(target).ok_or(BoardError::UnknownColumn)?;
    state.board.drop_before(card_id, stage, anchor)
}

/// Persist the new stage.
///
/// # Errors
///
/// Propagates the patch failure.
pub async fn persist_move(
    client: &ApiClient,
    pending: &PendingMove<TechPipelineStage>,
) -> Result<(), ApiError> {
    pipeline::update_stage(client, pending.card_id, pending.to_stage).await
}

/// Toast to show once a move settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettleToast {
    /// Move accepted.
    Success(String),
    /// Move rejected and reverted.
    Error(String),
}

/// Fold the persist result into the board.
pub fn settle_move(
    state: &mut PipelineBoardState,
    pending: &PendingMove<TechPipelineStage>,
    result: &Result<(), ApiError>,
) -> SettleToast {
    if state.board.settle(pending, result) == MoveSettlement::Missing {
        warn!(pipeline = pending.card_id, "pipeline left the board before its move settled");
    }
    match result {
        Ok(()) => SettleToast::Success(format!("Moved to {}", pending.to_stage.as_str())),
        Err(_) => SettleToast::Error(UPDATE_FAILED_MESSAGE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{Harness, json_response, session};
    use serde_json::json;

    fn pipeline(id: i64, stage: &str) -> TechPipeline {
        serde_json::from_value(json!({
            "id": id,
            "lead": id * 10,
            "lead_name": format!("Lead {id}"),
            "stage": stage,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        }))
        .expect("pipeline fixture")
    }

    fn state() -> PipelineBoardState {
        let mut state = PipelineBoardState::default();
        set_pipelines(
            &mut state,
            vec![pipeline(1, "PLANNING"), pipeline(2, "PLANNING"), pipeline(3, "REVIEW")],
        );
        state
    }

    #[tokio::test]
    async fn accepted_move_patches_stage_and_announces_wire_value() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("a1", Some("r1"))));
        harness.transport.push(json_response(200, &json!({})));
        let mut state = state();

        let DropOutcome::Moved(pending) = begin_move(&mut state, 2, "TESTING", None)? else {
            panic!("expected a cross-column move");
        };
        let result = persist_move(&harness.client, &pending).await;

        assert_eq!(
            settle_move(&mut state, &pending, &result),
            SettleToast::Success("Moved to TESTING".to_string())
        );
        let call = &harness.transport.calls()[0];
        assert_eq!(call.url, "http://api.test/api/tech-pipeline/2/");
        assert_eq!(call.json_body(), Some(json!({"stage": "TESTING"})));
        assert_eq!(
            state.board.card(2).map(|item| item.stage),
            Some(TechPipelineStage::Testing)
        );
        Ok(())
    }

    #[tokio::test]
    async fn rejected_move_restores_column_and_index() -> anyhow::Result<()> {
        let harness = Harness::new(Some(session("a1", Some("r1"))));
        harness.transport.push(json_response(500, &json!({})));
        let mut state = state();
        let before = state.clone();

        let DropOutcome::Moved(pending) = begin_move(&mut state, 1, "REVIEW", Some(3))? else {
            panic!("expected a cross-column move");
        };
        let result = persist_move(&harness.client, &pending).await;

        assert_eq!(
            settle_move(&mut state, &pending, &result),
            SettleToast::Error("Failed to update stage".to_string())
        );
        assert_eq!(state, before);
        Ok(())
    }
}
