//! Catalog data model.
//!
//! The catalog is an ordered map from rule key to rule, loaded from a
//! JSON file. Declaration order matters: the matcher scans rules in
//! file order and the first hit wins, so iteration order is preserved
//! with an `IndexMap` rather than a hash map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A reply payload, one of the three shapes the sender knows how to post.
///
/// Wire shape (adjacently tagged) matches the catalog file:
/// `{"reply_type": "text", "reply": "..."}`,
/// `{"reply_type": "image", "reply": {"link": "...", "caption": "..."}}`,
/// `{"reply_type": "buttons", "reply": {"text": "...", "buttons": [...]}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reply_type", content = "reply", rename_all = "snake_case")]
pub enum Reply {
    Text(String),
    Image {
        link: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Buttons {
        text: String,
        buttons: Vec<ButtonSpec>,
    },
}

/// An interactive button in the WhatsApp wire shape:
/// `{"type": "reply", "reply": {"id": "...", "title": "..."}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonSpec {
    #[serde(rename = "type", default = "reply_button_kind")]
    pub kind: String,
    pub reply: ButtonLabel,
}

/// Id + title pair carried by an interactive button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonLabel {
    pub id: String,
    pub title: String,
}

fn reply_button_kind() -> String {
    "reply".to_string()
}

impl ButtonSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: reply_button_kind(),
            reply: ButtonLabel {
                id: id.into(),
                title: title.into(),
            },
        }
    }
}

/// A single catalog rule: keywords that trigger it, the reply it
/// produces, and optional per-button sub-replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Keywords matched case-insensitively as substrings of inbound text.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Reply sent when a keyword matches.
    #[serde(flatten)]
    pub reply: Reply,
    /// Replies keyed by button id, for clicks on buttons this rule sent.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub button_responses: IndexMap<String, Reply>,
}

/// The full reply catalog, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub rules: IndexMap<String, Rule>,
}

impl Catalog {
    /// Empty catalog — every message goes unmatched.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up a rule by its key.
    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }
}
