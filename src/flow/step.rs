//! Questionnaire steps and answer fields.

use serde::{Deserialize, Serialize};

/// The steps of the seller questionnaire.
///
/// Progresses linearly: Idle → AppName → AppLink → RevenueSource →
/// MarketingSpend → MarketingAmount → Dau → Mau → Retention → Done,
/// with one branch: a negative answer at MarketingSpend skips
/// MarketingAmount and goes straight to Dau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Idle,
    AppName,
    AppLink,
    RevenueSource,
    MarketingSpend,
    MarketingAmount,
    Dau,
    Mau,
    Retention,
    Done,
}

impl Step {
    /// The next step in the linear chain, if any. The MarketingSpend
    /// branch is decided by the transition table, not here.
    pub fn next(&self) -> Option<Step> {
        use Step::*;
        match self {
            Idle => Some(AppName),
            AppName => Some(AppLink),
            AppLink => Some(RevenueSource),
            RevenueSource => Some(MarketingSpend),
            MarketingSpend => Some(MarketingAmount),
            MarketingAmount => Some(Dau),
            Dau => Some(Mau),
            Mau => Some(Retention),
            Retention => Some(Done),
            Done => None,
        }
    }

    /// Whether the questionnaire is finished at this step.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Whether a user at this step is mid-questionnaire (an inbound
    /// event should feed the state machine, not the catalog matcher).
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle | Self::Done)
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::AppName => "app_name",
            Self::AppLink => "app_link",
            Self::RevenueSource => "revenue_source",
            Self::MarketingSpend => "marketing_spend",
            Self::MarketingAmount => "marketing_amount",
            Self::Dau => "dau",
            Self::Mau => "mau",
            Self::Retention => "retention",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// The answer fields the questionnaire collects.
///
/// Ordered by declaration so a `BTreeMap<AnswerField, String>` iterates
/// in questionnaire order when the summary is assembled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AnswerField {
    AppName,
    AppLink,
    RevenueSource,
    MarketingSpend,
    MarketingAmount,
    Dau,
    Mau,
    Retention,
}

impl AnswerField {
    /// Human-readable label for the summary message.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AppName => "App Name",
            Self::AppLink => "App Link",
            Self::RevenueSource => "Revenue Source",
            Self::MarketingSpend => "Marketing Spend",
            Self::MarketingAmount => "Marketing Budget",
            Self::Dau => "DAU",
            Self::Mau => "MAU",
            Self::Retention => "Retention",
        }
    }
}

impl std::fmt::Display for AnswerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
