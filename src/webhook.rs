//! Webhook ingress — the platform-facing axum routes.
//!
//! GET /webhook answers the verification handshake; POST /webhook
//! walks the Cloud API envelope (entries → changes → messages),
//! dispatches every message it can extract, and acknowledges with 200
//! regardless of dispatch outcome. Failing to acknowledge causes
//! event redelivery storms, so only a payload without the top-level
//! `object` marker is rejected (404).

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use serde::Deserialize;
use tracing::{debug, info};

use crate::dispatch::{Dispatcher, EventKind, InboundEvent};

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub verify_token: String,
    pub dispatcher: Arc<Dispatcher>,
}

// ── Verification handshake ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

/// GET /webhook
///
/// Echoes the challenge when mode is "subscribe" and the token matches
/// the configured secret; 403 otherwise.
async fn verify(
    State(state): State<WebhookState>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    let subscribed = params.mode.as_deref() == Some("subscribe");
    let token_ok = params.verify_token.as_deref() == Some(state.verify_token.as_str());
    if subscribed && token_ok {
        info!("Webhook verified");
        (StatusCode::OK, params.challenge.unwrap_or_default())
    } else {
        (StatusCode::FORBIDDEN, String::new())
    }
}

// ── Delivery payload ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub value: ChangeValue,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// One inbound message as the platform delivers it. Everything is
/// optional — messages missing expected fields are skipped, not
/// rejected.
#[derive(Debug, Deserialize)]
pub struct Message {
    pub from: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<TextBody>,
    pub interactive: Option<Interactive>,
    pub button: Option<TemplateButton>,
}

#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct Interactive {
    pub button_reply: Option<ButtonReply>,
}

#[derive(Debug, Deserialize)]
pub struct ButtonReply {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct TemplateButton {
    pub payload: Option<String>,
}

impl Message {
    /// Extract the event this message carries, if it carries one.
    ///
    /// A button click (interactive reply or legacy template payload)
    /// wins over a text body when both are present.
    pub fn into_event(self) -> Option<InboundEvent> {
        let sender = self.from?;
        let button_id = self
            .interactive
            .and_then(|i| i.button_reply)
            .map(|b| b.id)
            .or_else(|| self.button.and_then(|b| b.payload));
        if let Some(id) = button_id {
            return Some(InboundEvent {
                sender,
                kind: EventKind::Button(id),
            });
        }
        let text = self.text?.body;
        Some(InboundEvent {
            sender,
            kind: EventKind::Text(text),
        })
    }
}

/// POST /webhook
///
/// Processes every extractable message in the delivery, then
/// acknowledges. 404 only when the top-level `object` marker is
/// missing.
async fn receive(
    State(state): State<WebhookState>,
    axum::Json(payload): axum::Json<WebhookPayload>,
) -> StatusCode {
    if payload.object.is_none() {
        return StatusCode::NOT_FOUND;
    }

    for entry in payload.entry {
        for change in entry.changes {
            for message in change.value.messages {
                match message.into_event() {
                    Some(event) => state.dispatcher.handle(&event).await,
                    None => debug!("Skipping message without sender or content"),
                }
            }
        }
    }

    StatusCode::OK
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Build the webhook routes.
pub fn webhook_routes(state: WebhookState) -> Router {
    Router::new()
        .route("/webhook", get(verify).post(receive))
        .route("/health", get(health))
        .with_state(state)
}
