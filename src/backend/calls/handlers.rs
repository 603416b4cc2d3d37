//! Call HTTP Handlers

use axum::{extract::State, Json};
use chrono::Utc;
use uuid::Uuid;

use super::db::{self, CallLogRow};
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::server::state::AppState;
use crate::shared::messaging::{
    Call, CallKind, CallLogEntry, CallStatus, EndCallRequest, StartCallRequest, StartCallResponse,
    UpdateCallRequest,
};
use crate::shared::{ApiResponse, UserProfile, UserStatus};

async fn start_call(
    state: &AppState,
    caller: Uuid,
    kind: CallKind,
    request: StartCallRequest,
) -> Result<Json<ApiResponse<StartCallResponse>>, BackendError> {
    let pool = state.pool()?;

    if request.id == caller {
        return Err(BackendError::bad_request("You cannot call yourself"));
    }

    let callee = get_user_by_id(pool, request.id).await?.ok_or_else(|| {
        tracing::warn!("Call to unknown user: {}", request.id);
        BackendError::not_found("User not found")
    })?;

    let call = Call::start(kind, caller, callee.id);
    db::insert_call(pool, &call).await?;

    tracing::info!("{} call {} started: {} -> {}", kind.as_str(), call.id, caller, callee.id);

    Ok(Json(ApiResponse::success(
        "Call started",
        StartCallResponse {
            from: UserProfile::from(&callee),
            room_id: call.id,
            stream_id: call.to,
            user_id: call.from,
            user_name: call.from,
        },
    )))
}

/// POST /users/start-audio-call
pub async fn start_audio_call(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<StartCallRequest>,
) -> Result<Json<ApiResponse<StartCallResponse>>, BackendError> {
    start_call(&state, auth.user_id, CallKind::Audio, request).await
}

/// POST /users/start-video-call
pub async fn start_video_call(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<StartCallRequest>,
) -> Result<Json<ApiResponse<StartCallResponse>>, BackendError> {
    start_call(&state, auth.user_id, CallKind::Video, request).await
}

async fn participant_call(
    state: &AppState,
    room_id: Uuid,
    user_id: Uuid,
) -> Result<Call, BackendError> {
    let call = db::get_call(state.pool()?, room_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Call not found"))?;

    if !call.has_participant(user_id) {
        tracing::warn!("User {} is not a participant of call {}", user_id, room_id);
        return Err(BackendError::forbidden("You are not a participant of this call"));
    }
    Ok(call)
}

/// Record the callee's answer
///
/// `Accepted` keeps the call ongoing; every other verdict ends it.
pub async fn update_call(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<UpdateCallRequest>,
) -> Result<Json<ApiResponse<Call>>, BackendError> {
    let mut call = participant_call(&state, request.room_id, auth.user_id).await?;

    if call.status == CallStatus::Ended {
        return Err(BackendError::bad_request("Call has already ended"));
    }

    call.verdict = Some(request.verdict);
    if request.verdict.ends_call() {
        call.status = CallStatus::Ended;
        call.ended_at = Some(Utc::now());
    }

    db::update_call_state(state.pool()?, call.id, call.verdict, call.status, call.ended_at).await?;
    tracing::info!("Call {} verdict: {}", call.id, request.verdict.as_str());

    Ok(Json(ApiResponse::success("Call updated", call)))
}

/// Hang up; ending an already ended call is a no-op
pub async fn end_call(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<EndCallRequest>,
) -> Result<Json<ApiResponse<Call>>, BackendError> {
    let mut call = participant_call(&state, request.room_id, auth.user_id).await?;

    if call.status == CallStatus::Ongoing {
        call.status = CallStatus::Ended;
        call.ended_at = Some(Utc::now());
        db::update_call_state(state.pool()?, call.id, call.verdict, call.status, call.ended_at)
            .await?;
        tracing::info!("Call {} ended by {}", call.id, auth.user_id);
    }

    Ok(Json(ApiResponse::success("Call ended", call)))
}

fn log_entry(user_id: Uuid, row: CallLogRow) -> CallLogEntry {
    CallLogEntry {
        id: row.call.id,
        kind: row.call.kind,
        img: row.other_avatar,
        name: row.other_name,
        online: row.other_status == UserStatus::Online,
        incoming: row.call.is_incoming_for(user_id),
        missed: row.call.is_missed(),
        started_at: row.call.started_at,
    }
}

/// Audio and video calls of the caller, newest first
pub async fn get_call_logs(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<ApiResponse<Vec<CallLogEntry>>>, BackendError> {
    let pool = state.pool()?;
    let logs = db::list_calls_for_user(pool, auth.user_id)
        .await?
        .into_iter()
        .map(|row| log_entry(auth.user_id, row))
        .collect();

    Ok(Json(ApiResponse::success("Call Logs Found successfully!", logs)))
}
