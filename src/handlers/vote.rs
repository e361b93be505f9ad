use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use log::{info, warn};
use serde::Serialize;
use serde_json::{Value, json};

use super::AppState;
use crate::error::AppError;
use crate::models::OrderedMap;
use crate::voting::validate::{VoteSubmission, validate_submission};

#[derive(Debug, Serialize)]
pub struct PositionSummary {
    pub selected: usize,
    pub maximum: usize,
    pub votes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub summary: OrderedMap<PositionSummary>,
}

pub async fn check_contact(
    State(state): State<AppState>,
    Path(contact_number): Path<String>,
) -> Result<Json<Value>, AppError> {
    if state.database.contact_exists(&contact_number).await? {
        return Err(AppError::DuplicateSubmission);
    }
    Ok(Json(json!({ "message": "Contact number is available" })))
}

pub async fn submit_vote(
    State(state): State<AppState>,
    payload: Result<Json<VoteSubmission>, JsonRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let Json(submission) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let vote = validate_submission(&state.catalog, submission).map_err(|e| {
        warn!("Rejected vote submission: {}", e);
        AppError::from(e)
    })?;

    // The column constraint still catches a concurrent insert that passes this check.
    if let Some(contact) = vote.contact_number.as_deref() {
        if state
            .database
            .contact_exists(contact)
            .await
            .map_err(|e| AppError::from(e).during_submission())?
        {
            warn!("Rejected vote submission: contact number already used");
            return Err(AppError::DuplicateSubmission);
        }
    }

    let record = state
        .database
        .insert_vote(vote)
        .await
        .map_err(|e| AppError::from(e).during_submission())?;
    info!(
        "Recorded vote {} (barangay: {})",
        record.id,
        record.barangay.as_deref().unwrap_or("unspecified")
    );

    let summary = state
        .catalog
        .positions()
        .iter()
        .map(|position| {
            let votes = record.votes.get(&position.name).cloned().unwrap_or_default();
            let summary = PositionSummary {
                selected: votes.len(),
                maximum: position.max_votes,
                votes,
            };
            (position.name.clone(), summary)
        })
        .collect();

    Ok(Json(SubmitResponse {
        message: "Vote submitted successfully",
        summary,
    }))
}
