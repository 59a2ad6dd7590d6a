//! Tech pipeline service.

use crate::services::api::ApiClient;
use crate::services::error::ApiError;
use crate::services::http::{ApiRequest, Method};
use crm_api_models::{PipelineNotesPatch, PipelineStagePatch, TechPipeline, TechPipelineStage};

/// Every pipeline visible to the user.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn list(client: &ApiClient) -> Result<Vec<TechPipeline>, ApiError> {
    client.fetch(ApiRequest::get("tech-pipeline/")).await
}

/// One pipeline.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn get(client: &ApiClient, id: i64) -> Result<TechPipeline, ApiError> {
    client.fetch(ApiRequest::get(format!("tech-pipeline/{id}/"))).await
}

/// Move a pipeline to another stage.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn update_stage(
    client: &ApiClient,
    id: i64,
    stage: TechPipelineStage,
) -> Result<(), ApiError> {
    client
        .fetch_unit(ApiRequest::json(
            Method::Patch,
            format!("tech-pipeline/{id}/"),
            &PipelineStagePatch { stage },
        )?)
        .await
}

/// Replace the delivery notes.
///
/// # Errors
///
/// Propagates any [`ApiError`].
pub async fn update_notes(client: &ApiClient, id: i64, notes: &str) -> Result<TechPipeline, ApiError> {
    client
        .fetch(ApiRequest::json(
            Method::Patch,
            format!("tech-pipeline/{id}/"),
            &PipelineNotesPatch {
                notes: notes.to_string(),
            },
        )?)
        .await
}
