//! # Chat Commands
//!
//! Live support widget. Replies arrive asynchronously, so a client posts a
//! message and then polls the transcript (or reopens the widget) to see
//! the delivery receipt and the agent's answer.
//!
//! ```text
//! POST .../chat/messages ──► message (sent)
//!        │
//!        ├── chat_delivery ──────────────► status: delivered
//!        └── chat_reply_min..max ────────► agent reply (unless superseded)
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;
use vitrine_core::chat::{self, ChatAgent, ChatMessage, ChatTranscript, QUICK_REPLIES};

use crate::commands::shopper;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessage {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAgent {
    pub agent_id: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateChat {
    pub rating: u8,
}

/// `GET /api/sessions/{sid}/chat`
pub async fn transcript(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> ApiResult<Json<ChatTranscript>> {
    let session = shopper(&state, sid).await?;
    Ok(Json(session.chat.snapshot()))
}

/// `POST /api/sessions/{sid}/chat/open`
///
/// Opening the widget clears the unread badge.
pub async fn open(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> ApiResult<Json<ChatTranscript>> {
    let session = shopper(&state, sid).await?;
    Ok(Json(session.chat.open()))
}

/// `POST /api/sessions/{sid}/chat/close`
pub async fn close(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> ApiResult<Json<ChatTranscript>> {
    let session = shopper(&state, sid).await?;
    Ok(Json(session.chat.close()))
}

/// `POST /api/sessions/{sid}/chat/messages`
pub async fn send(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(request): Json<SendMessage>,
) -> ApiResult<(StatusCode, Json<ChatMessage>)> {
    debug!(session = %sid, len = request.content.len(), "chat send command");
    let session = shopper(&state, sid).await?;
    let message = session.chat.send(&request.content)?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// `POST /api/sessions/{sid}/chat/agent`
pub async fn select_agent(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(request): Json<SelectAgent>,
) -> ApiResult<Json<ChatMessage>> {
    debug!(session = %sid, agent_id = %request.agent_id, "select_agent command");
    let session = shopper(&state, sid).await?;
    Ok(Json(session.chat.select_agent(&request.agent_id)?))
}

/// `POST /api/sessions/{sid}/chat/end`
pub async fn end(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> ApiResult<Json<ChatTranscript>> {
    let session = shopper(&state, sid).await?;
    Ok(Json(session.chat.end()))
}

/// `POST /api/sessions/{sid}/chat/rating`
pub async fn rate(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(request): Json<RateChat>,
) -> ApiResult<Json<ChatTranscript>> {
    let session = shopper(&state, sid).await?;
    session.chat.rate(request.rating)?;
    Ok(Json(session.chat.snapshot()))
}

/// `GET /api/chat/agents`
pub async fn agents() -> Json<Vec<ChatAgent>> {
    Json(chat::agents())
}

/// `GET /api/chat/quick-replies`
pub async fn quick_replies() -> Json<[&'static str; 6]> {
    Json(QUICK_REPLIES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::session::create_session;
    use crate::commands::test_support::instant_state;
    use crate::error::ErrorCode;
    use std::time::Duration;
    use vitrine_core::chat::{ChatStatus, MessageStatus, Sender};

    async fn new_session(state: &AppState) -> Uuid {
        let (_, Json(created)) = create_session(State(state.clone())).await;
        created.session_id
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_gets_delivered_and_answered() {
        let state = instant_state();
        let sid = new_session(&state).await;

        let (status, Json(message)) = send(
            State(state.clone()),
            Path(sid),
            Json(SendMessage {
                content: "Does the orb glow?".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(message.sender, Sender::User);

        tokio::time::sleep(Duration::from_millis(5)).await;

        let Json(chat) = transcript(State(state), Path(sid)).await.unwrap();
        let sent = chat.messages.iter().find(|m| m.id == message.id).unwrap();
        assert_eq!(sent.status, MessageStatus::Delivered);
        assert_eq!(chat.messages.last().unwrap().sender, Sender::Agent);
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let state = instant_state();
        let sid = new_session(&state).await;

        let err = send(
            State(state),
            Path(sid),
            Json(SendMessage {
                content: "   ".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_rate_only_after_end() {
        let state = instant_state();
        let sid = new_session(&state).await;

        let err = rate(State(state.clone()), Path(sid), Json(RateChat { rating: 5 }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let Json(ended) = end(State(state.clone()), Path(sid)).await.unwrap();
        assert_eq!(ended.status, ChatStatus::Ended);

        let Json(rated) = rate(State(state.clone()), Path(sid), Json(RateChat { rating: 4 }))
            .await
            .unwrap();
        assert_eq!(rated.satisfaction, Some(4));

        let err = send(
            State(state),
            Path(sid),
            Json(SendMessage {
                content: "hello?".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_select_agent() {
        let state = instant_state();
        let sid = new_session(&state).await;

        select_agent(
            State(state.clone()),
            Path(sid),
            Json(SelectAgent {
                agent_id: "2".to_string(),
            }),
        )
        .await
        .unwrap();
        let Json(chat) = transcript(State(state.clone()), Path(sid)).await.unwrap();
        assert_eq!(chat.current_agent.unwrap().name, "Mike Chen");

        let err = select_agent(
            State(state),
            Path(sid),
            Json(SelectAgent {
                agent_id: "42".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_open_and_close() {
        let state = instant_state();
        let sid = new_session(&state).await;

        let Json(opened) = open(State(state.clone()), Path(sid)).await.unwrap();
        assert!(opened.is_open);
        assert_eq!(opened.unread_count, 0);

        let Json(closed) = close(State(state), Path(sid)).await.unwrap();
        assert!(!closed.is_open);
    }
}
