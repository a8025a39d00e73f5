use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::dtos::{AskRequest, AskResponse};
use crate::services::Query;
use crate::startup::AppState;

/// `POST /api/ask`: answer one student question.
#[tracing::instrument(skip(state, request))]
pub async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let query = Query::try_from(request).map_err(|e| {
        tracing::warn!(error = %e, "Rejected ask request");
        e
    })?;

    tracing::info!(
        subject = %query.subject,
        chapter = %query.chapter,
        question_len = query.question.len(),
        "Answering question"
    );

    let answer = state.tutor.ask(&query).await?;

    Ok(Json(AskResponse { answer }))
}
