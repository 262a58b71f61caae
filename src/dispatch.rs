//! Per-message dispatch: state machine first, then buttons, then keywords.
//!
//! Precedence is fixed (the near-duplicate bot variants disagreed;
//! this order is the documented decision):
//! 1. A user mid-questionnaire feeds the state machine, whether the
//!    event is text or a button click.
//! 2. A button click either starts the questionnaire (the `sell`
//!    trigger) or resolves through the catalog's button responses.
//! 3. Free text resolves through the catalog's keyword rules.
//! 4. Anything left gets the default reply and one audit log entry.
//!
//! Every outbound send is awaited and error-checked here; failures are
//! logged and swallowed so the webhook can always acknowledge.

use std::sync::Arc;

use tracing::{info, warn};

use crate::audit::UnknownMessageLog;
use crate::catalog::model::ButtonSpec;
use crate::catalog::reload::CatalogHandle;
use crate::flow::machine::{self, AdvanceOutcome, Prompt};
use crate::flow::store::ConversationStore;
use crate::outbound::WhatsAppSender;

/// Reply for messages nothing matched.
pub const DEFAULT_REPLY: &str = "Sorry, I didn't understand that.";

/// Catalog rule key holding the welcome/menu reply.
pub const WELCOME_RULE: &str = "welcome";

/// An inbound message, reduced to what dispatch needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub sender: String,
    pub kind: EventKind,
}

/// What the message carried: typed text or a clicked button id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Text(String),
    Button(String),
}

/// Routes each inbound event to the state machine or the catalog and
/// sends the resulting replies.
pub struct Dispatcher {
    catalog: Arc<CatalogHandle>,
    store: Arc<dyn ConversationStore>,
    sender: WhatsAppSender,
    audit: UnknownMessageLog,
    operator_contact: Option<String>,
}

impl Dispatcher {
    pub fn new(
        catalog: Arc<CatalogHandle>,
        store: Arc<dyn ConversationStore>,
        sender: WhatsAppSender,
        audit: UnknownMessageLog,
        operator_contact: Option<String>,
    ) -> Self {
        Self {
            catalog,
            store,
            sender,
            audit,
            operator_contact,
        }
    }

    /// Handle one inbound event end to end. Never fails: every error
    /// is logged here so the webhook can acknowledge regardless.
    pub async fn handle(&self, event: &InboundEvent) {
        // 1. Mid-questionnaire users feed the machine.
        if let Some(state) = self.store.get(&event.sender).await
            && state.step.is_active()
        {
            self.advance_flow(event, state).await;
            return;
        }

        match &event.kind {
            EventKind::Button(id) if id == machine::FLOW_TRIGGER => {
                self.start_flow(&event.sender).await;
            }
            EventKind::Button(id) => {
                let catalog = self.catalog.current().await;
                match catalog.match_button(id) {
                    Some((rule, reply)) => {
                        info!(user = %event.sender, rule = %rule, button = %id, "Button matched");
                        self.send_checked(self.sender.send_reply(&event.sender, reply))
                            .await;
                    }
                    None => self.unmatched(&event.sender, id).await,
                }
            }
            EventKind::Text(text) => {
                let catalog = self.catalog.current().await;
                match catalog.match_text(text) {
                    Some((rule, reply)) => {
                        info!(user = %event.sender, rule = %rule, "Keyword matched");
                        self.send_checked(self.sender.send_reply(&event.sender, reply))
                            .await;
                    }
                    None => self.unmatched(&event.sender, text).await,
                }
            }
        }
    }

    async fn start_flow(&self, user_id: &str) {
        let (state, prompt) = machine::start(user_id);
        info!(user = %user_id, "Questionnaire started");
        self.send_prompt(user_id, prompt).await;
        self.store.put(state).await;
    }

    async fn advance_flow(
        &self,
        event: &InboundEvent,
        mut state: crate::flow::store::ConversationState,
    ) {
        let value = match &event.kind {
            EventKind::Text(text) => text.as_str(),
            EventKind::Button(id) => id.as_str(),
        };

        match machine::advance(&mut state, value) {
            AdvanceOutcome::Continued { prompt } => {
                info!(user = %event.sender, step = %state.step, "Questionnaire advanced");
                self.send_prompt(&event.sender, prompt).await;
                self.store.put(state).await;
            }
            AdvanceOutcome::Finished { summary } => {
                info!(user = %event.sender, "Questionnaire finished");
                self.send_checked(self.sender.send_text(&event.sender, &summary))
                    .await;
                if let Some(operator) = &self.operator_contact {
                    let forwarded =
                        format!("New submission from {}:\n{}", event.sender, summary);
                    self.send_checked(self.sender.send_text(operator, &forwarded))
                        .await;
                }
                self.store.delete(&event.sender).await;
            }
            AdvanceOutcome::Stale => {
                warn!(user = %event.sender, step = %state.step, "Stale questionnaire step, resetting");
                self.store.delete(&event.sender).await;
                self.send_welcome(&event.sender).await;
            }
        }
    }

    /// Default reply plus exactly one audit log entry.
    async fn unmatched(&self, user_id: &str, content: &str) {
        info!(user = %user_id, "No rule matched, sending default reply");
        if let Err(e) = self.audit.append(user_id, content).await {
            warn!(error = %e, "Failed to log unknown message");
        }
        self.send_checked(self.sender.send_text(user_id, DEFAULT_REPLY))
            .await;
    }

    /// The welcome/menu reply from the catalog, or the default reply
    /// when the catalog has no welcome rule.
    async fn send_welcome(&self, user_id: &str) {
        let catalog = self.catalog.current().await;
        match catalog.get(WELCOME_RULE) {
            Some(rule) => {
                self.send_checked(self.sender.send_reply(user_id, &rule.reply))
                    .await;
            }
            None => {
                self.send_checked(self.sender.send_text(user_id, DEFAULT_REPLY))
                    .await;
            }
        }
    }

    async fn send_prompt(&self, to: &str, prompt: Prompt) {
        match prompt {
            Prompt::Text(text) => {
                self.send_checked(self.sender.send_text(to, text)).await;
            }
            Prompt::Buttons { body, options } => {
                let buttons: Vec<ButtonSpec> = options
                    .iter()
                    .map(|(id, title)| ButtonSpec::new(*id, *title))
                    .collect();
                self.send_checked(self.sender.send_buttons(to, body, &buttons))
                    .await;
            }
        }
    }

    async fn send_checked(
        &self,
        send: impl Future<Output = Result<(), crate::error::SendError>>,
    ) {
        if let Err(e) = send.await {
            warn!(error = %e, "Outbound send failed");
        }
    }
}
