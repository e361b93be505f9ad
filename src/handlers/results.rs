use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use super::AppState;
use crate::error::AppError;
use crate::models::barangay;
use crate::voting::stats::{HourlyStats, hourly_stats};
use crate::voting::tally::{
    BarangayResults, LiveResults, PositionResults, barangay_results, live_results,
    position_results,
};

pub async fn live(State(state): State<AppState>) -> Result<Json<LiveResults>, AppError> {
    let records = state.database.all_votes().await?;
    Ok(Json(live_results(state.catalog.positions(), &records, Utc::now())))
}

pub async fn by_position(
    State(state): State<AppState>,
    Path(position): Path<String>,
) -> Result<Json<PositionResults>, AppError> {
    let position = state
        .catalog
        .position(&position)
        .ok_or(AppError::NotFound("Position"))?;

    let records = state.database.all_votes().await?;
    Ok(Json(position_results(position, &records, Utc::now())))
}

pub async fn by_barangay(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<BarangayResults>, AppError> {
    if !barangay::is_known(&name) {
        return Err(AppError::NotFound("Barangay"));
    }

    let records = state.database.votes_in_barangay(&name).await?;
    Ok(Json(barangay_results(
        &name,
        state.catalog.positions(),
        &records,
        Utc::now(),
    )))
}

pub async fn hourly(State(state): State<AppState>) -> Result<Json<HourlyStats>, AppError> {
    let records = state.database.all_votes().await?;
    Ok(Json(hourly_stats(&records)))
}
