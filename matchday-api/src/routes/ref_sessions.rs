/// Referee session endpoints
///
/// Match-day officiating: open a session, append events while play runs,
/// end it at the final whistle. The stream endpoint serves the event log
/// over SSE: it backfills from the client's cursor, then tails the log by
/// polling for new rows until the session ends.
///
/// # Endpoints
///
/// - `GET  /v1/ref-sessions`
/// - `POST /v1/ref-sessions`
/// - `GET  /v1/ref-sessions/:id`
/// - `POST /v1/ref-sessions/:id/end`
/// - `GET  /v1/ref-sessions/:id/events` (optional `after_seq`)
/// - `POST /v1/ref-sessions/:id/events`
/// - `GET  /v1/ref-sessions/:id/stream` (SSE, optional `after_seq`)
///
/// # Stream format
///
/// Each SSE message carries one event as JSON, with the event's seq as
/// the SSE id so clients can resume with `after_seq`:
///
/// ```text
/// id: 3
/// data: {"id":"...","session_id":"...","seq":3,"kind":"goal","team":"home",...}
/// ```

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use matchday_shared::models::ref_event::{CreateRefEvent, RefEvent};
use matchday_shared::models::ref_session::{CreateRefSession, RefSession};
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

/// How often the SSE tail polls for new events
const TAIL_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Cursor query parameter for event listing and streaming
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventCursorQuery {
    /// Only events with a seq greater than this (default: 0, everything)
    #[serde(default)]
    pub after_seq: i64,
}

/// Lists sessions, newest first
pub async fn list_sessions(State(state): State<AppState>) -> ApiResult<Json<Vec<RefSession>>> {
    Ok(Json(RefSession::list(&state.db).await?))
}

/// Opens a session
pub async fn create_session(
    State(state): State<AppState>,
    Json(data): Json<CreateRefSession>,
) -> ApiResult<Json<RefSession>> {
    let session = RefSession::create(&state.db, data).await?;

    tracing::info!(session_id = %session.id, "Referee session opened");

    Ok(Json(session))
}

/// Fetches a session by ID
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RefSession>> {
    let session = RefSession::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Referee session not found".to_string()))?;

    Ok(Json(session))
}

/// Ends an open session
///
/// Conflicts when the session is already ended. Active SSE tails observe
/// the end on their next poll and close.
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RefSession>> {
    match RefSession::end(&state.db, id).await? {
        Some(session) => {
            tracing::info!(session_id = %session.id, "Referee session ended");
            Ok(Json(session))
        }
        None => match RefSession::find_by_id(&state.db, id).await? {
            Some(_) => Err(ApiError::Conflict("Session is already ended".to_string())),
            None => Err(ApiError::NotFound("Referee session not found".to_string())),
        },
    }
}

/// Lists a session's events
pub async fn list_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<EventCursorQuery>,
) -> ApiResult<Json<Vec<RefEvent>>> {
    // 404 on unknown sessions rather than returning an empty log
    RefSession::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Referee session not found".to_string()))?;

    let events = RefEvent::list_after(&state.db, id, query.after_seq).await?;

    Ok(Json(events))
}

/// Appends an event to an open session
///
/// Conflicts when the session has ended.
pub async fn append_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<CreateRefEvent>,
) -> ApiResult<Json<RefEvent>> {
    let session = RefSession::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Referee session not found".to_string()))?;

    if !session.is_open() {
        return Err(ApiError::Conflict(
            "Session has ended; no further events".to_string(),
        ));
    }

    let event = RefEvent::append(&state.db, id, data).await?;

    tracing::info!(
        session_id = %id,
        seq = event.seq,
        kind = ?event.kind,
        "Referee event recorded"
    );

    Ok(Json(event))
}

/// State carried across SSE tail iterations
struct TailState {
    db: PgPool,
    session_id: Uuid,
    cursor: i64,
    buffer: VecDeque<RefEvent>,
    done: bool,
}

/// Streams a session's events over SSE
///
/// Backfills everything after `after_seq`, then polls for new events
/// until the session ends. A client that drops can resume by passing the
/// last SSE id it saw as `after_seq`.
pub async fn stream_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<EventCursorQuery>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    RefSession::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Referee session not found".to_string()))?;

    let initial = TailState {
        db: state.db.clone(),
        session_id: id,
        cursor: query.after_seq,
        buffer: VecDeque::new(),
        done: false,
    };

    let stream = futures::stream::unfold(initial, |mut tail| async move {
        loop {
            // Drain buffered events first
            if let Some(event) = tail.buffer.pop_front() {
                tail.cursor = event.seq;
                let message = Event::default().id(event.seq.to_string()).json_data(&event);
                return Some((message, tail));
            }

            if tail.done {
                return None;
            }

            match RefEvent::list_after(&tail.db, tail.session_id, tail.cursor).await {
                Ok(events) if !events.is_empty() => {
                    tail.buffer.extend(events);
                }
                Ok(_) => {
                    // Nothing new; close once the session has ended,
                    // otherwise wait for the next poll.
                    match RefSession::find_by_id(&tail.db, tail.session_id).await {
                        Ok(Some(session)) if !session.is_open() => return None,
                        Ok(Some(_)) => tokio::time::sleep(TAIL_POLL_INTERVAL).await,
                        Ok(None) => return None,
                        Err(e) => {
                            tracing::warn!(error = %e, "SSE tail poll failed");
                            return None;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "SSE tail fetch failed");
                    return None;
                }
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cursor_defaults_to_zero() {
        let query: EventCursorQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.after_seq, 0);
    }
}
