//! Outbound sender — posts messages through the WhatsApp Cloud API.
//!
//! Three request shapes (text, image, interactive buttons) against one
//! endpoint: `{base}/{phone_number_id}/messages`, bearer-authenticated.
//! One network call per message, no retries; callers at the webhook
//! boundary log failures and always acknowledge the platform anyway.

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::catalog::model::{ButtonSpec, Reply};
use crate::error::SendError;

/// WhatsApp allows at most three buttons per interactive message.
const MAX_BUTTONS: usize = 3;

/// Client for the Cloud API `messages` endpoint.
pub struct WhatsAppSender {
    client: reqwest::Client,
    base_url: String,
    phone_number_id: String,
    access_token: SecretString,
}

impl WhatsAppSender {
    pub fn new(base_url: String, phone_number_id: String, access_token: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            phone_number_id,
            access_token,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.base_url, self.phone_number_id)
    }

    /// Send a plain text message.
    pub async fn send_text(&self, to: &str, body: &str) -> Result<(), SendError> {
        self.post(serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to,
            "text": { "body": body }
        }))
        .await?;
        info!(to = %to, "Text message sent");
        Ok(())
    }

    /// Send an image by link, with an optional caption.
    pub async fn send_image(
        &self,
        to: &str,
        link: &str,
        caption: Option<&str>,
    ) -> Result<(), SendError> {
        let mut image = serde_json::json!({ "link": link });
        if let Some(caption) = caption {
            image["caption"] = serde_json::Value::String(caption.to_string());
        }
        self.post(serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "image",
            "image": image
        }))
        .await?;
        info!(to = %to, link = %link, "Image message sent");
        Ok(())
    }

    /// Send an interactive button message. Buttons beyond the platform
    /// limit of three are dropped with a warning.
    pub async fn send_buttons(
        &self,
        to: &str,
        body: &str,
        buttons: &[ButtonSpec],
    ) -> Result<(), SendError> {
        let buttons = if buttons.len() > MAX_BUTTONS {
            warn!(
                to = %to,
                dropped = buttons.len() - MAX_BUTTONS,
                "Too many buttons for one message, dropping extras"
            );
            &buttons[..MAX_BUTTONS]
        } else {
            buttons
        };
        self.post(serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "interactive",
            "interactive": {
                "type": "button",
                "body": { "text": body },
                "action": { "buttons": buttons }
            }
        }))
        .await?;
        info!(to = %to, "Button message sent");
        Ok(())
    }

    /// Send a catalog reply payload, dispatching on its shape.
    pub async fn send_reply(&self, to: &str, reply: &Reply) -> Result<(), SendError> {
        match reply {
            Reply::Text(body) => self.send_text(to, body).await,
            Reply::Image { link, caption } => {
                self.send_image(to, link, caption.as_deref()).await
            }
            Reply::Buttons { text, buttons } => self.send_buttons(to, text, buttons).await,
        }
    }

    async fn post(&self, body: serde_json::Value) -> Result<(), SendError> {
        let resp = self
            .client
            .post(self.messages_url())
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| SendError::Request {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SendError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
