//! The questionnaire state machine.
//!
//! Transitions are data, not branching code: each active step has a
//! `StepSpec` naming the answer field it writes, the prompt that asked
//! it, and how to pick the next step. A button click carrying a value
//! and typed text carrying a value are the same transition input — the
//! dispatcher extracts the value, the machine never cares which it was.

use crate::flow::step::{AnswerField, Step};
use crate::flow::store::ConversationState;

/// Button id that starts the questionnaire.
pub const FLOW_TRIGGER: &str = "sell";

/// A prompt sent when a step is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Text(&'static str),
    Buttons {
        body: &'static str,
        /// (button id, title) pairs, at most three.
        options: &'static [(&'static str, &'static str)],
    },
}

/// How the next step is chosen once a step's answer is in.
enum NextStep {
    /// Follow the linear chain.
    Linear,
    /// Branch on the answer value.
    On(fn(&str) -> Step),
}

/// One row of the transition table.
pub struct StepSpec {
    field: AnswerField,
    prompt: Prompt,
    next: NextStep,
}

impl StepSpec {
    pub fn field(&self) -> AnswerField {
        self.field
    }

    pub fn prompt(&self) -> Prompt {
        self.prompt
    }
}

fn after_marketing_spend(answer: &str) -> Step {
    if is_affirmative(answer) {
        Step::MarketingAmount
    } else {
        Step::Dau
    }
}

static APP_NAME: StepSpec = StepSpec {
    field: AnswerField::AppName,
    prompt: Prompt::Text("Please provide your App Name"),
    next: NextStep::Linear,
};

static APP_LINK: StepSpec = StepSpec {
    field: AnswerField::AppLink,
    prompt: Prompt::Text("Please share a link to your app (App Store or Play Store)."),
    next: NextStep::Linear,
};

static REVENUE_SOURCE: StepSpec = StepSpec {
    field: AnswerField::RevenueSource,
    prompt: Prompt::Buttons {
        body: "How does your app make money?",
        options: &[
            ("ads", "Ads"),
            ("iap", "In-app purchases"),
            ("subscriptions", "Subscriptions"),
        ],
    },
    next: NextStep::Linear,
};

static MARKETING_SPEND: StepSpec = StepSpec {
    field: AnswerField::MarketingSpend,
    prompt: Prompt::Text("Are you currently spending on marketing? (Yes/No)"),
    next: NextStep::On(after_marketing_spend),
};

static MARKETING_AMOUNT: StepSpec = StepSpec {
    field: AnswerField::MarketingAmount,
    prompt: Prompt::Text("How much do you spend on marketing per month?"),
    next: NextStep::Linear,
};

static DAU: StepSpec = StepSpec {
    field: AnswerField::Dau,
    prompt: Prompt::Text("What is your daily active users (DAU) count?"),
    next: NextStep::Linear,
};

static MAU: StepSpec = StepSpec {
    field: AnswerField::Mau,
    prompt: Prompt::Text("What is your monthly active users (MAU) count?"),
    next: NextStep::Linear,
};

static RETENTION: StepSpec = StepSpec {
    field: AnswerField::Retention,
    prompt: Prompt::Text("What is your retention? (e.g. D1,D7,D30 as 10%,5%,2%)"),
    next: NextStep::Linear,
};

/// Look up the transition table row for a step.
///
/// Total over active steps; `Idle` and `Done` have no row (nothing to
/// answer there).
pub fn step_spec(step: Step) -> Option<&'static StepSpec> {
    use Step::*;
    match step {
        AppName => Some(&APP_NAME),
        AppLink => Some(&APP_LINK),
        RevenueSource => Some(&REVENUE_SOURCE),
        MarketingSpend => Some(&MARKETING_SPEND),
        MarketingAmount => Some(&MARKETING_AMOUNT),
        Dau => Some(&DAU),
        Mau => Some(&MAU),
        Retention => Some(&RETENTION),
        Idle | Done => None,
    }
}

/// Result of feeding one inbound value to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Answer recorded, next question to send.
    Continued { prompt: Prompt },
    /// Last answer recorded; the flow is done and the state can go.
    Finished { summary: String },
    /// The state referenced a step with no table row — the caller
    /// falls back to re-sending the welcome/menu.
    Stale,
}

/// Start a fresh questionnaire for `user_id`.
pub fn start(user_id: &str) -> (ConversationState, Prompt) {
    (
        ConversationState::new(user_id, Step::AppName),
        APP_NAME.prompt,
    )
}

/// Apply one inbound value to the user's current step: write the
/// step's answer field, move to the selected next step, and produce
/// the next prompt (or the summary at the terminal step).
pub fn advance(state: &mut ConversationState, value: &str) -> AdvanceOutcome {
    let Some(spec) = step_spec(state.step) else {
        return AdvanceOutcome::Stale;
    };

    state.answers.insert(spec.field, value.trim().to_string());

    let next = match spec.next {
        NextStep::Linear => state.step.next().unwrap_or(Step::Done),
        NextStep::On(select) => select(value),
    };
    state.step = next;

    if next.is_terminal() {
        return AdvanceOutcome::Finished {
            summary: summary(state),
        };
    }
    match step_spec(next) {
        Some(next_spec) => AdvanceOutcome::Continued {
            prompt: next_spec.prompt,
        },
        None => AdvanceOutcome::Stale,
    }
}

/// Assemble the end-of-flow summary from all collected answers, in
/// questionnaire order.
pub fn summary(state: &ConversationState) -> String {
    let mut out = String::from("Thanks! Here's a summary of your submission:\n");
    for (field, answer) in &state.answers {
        out.push_str(&format!("\n{}: {}", field.label(), answer));
    }
    out
}

fn is_affirmative(answer: &str) -> bool {
    let t = answer.trim().to_lowercase();
    t == "y" || t == "yes" || t == "yeah" || t == "yep" || t.starts_with("yes,") || t.starts_with("yes ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIVE_STEPS: [Step; 8] = [
        Step::AppName,
        Step::AppLink,
        Step::RevenueSource,
        Step::MarketingSpend,
        Step::MarketingAmount,
        Step::Dau,
        Step::Mau,
        Step::Retention,
    ];

    #[test]
    fn table_is_total_over_active_steps() {
        for step in ACTIVE_STEPS {
            let spec = step_spec(step);
            assert!(spec.is_some(), "step {step} must have a table row");
            match spec.unwrap().prompt() {
                Prompt::Text(text) => assert!(!text.is_empty()),
                Prompt::Buttons { body, options } => {
                    assert!(!body.is_empty());
                    assert!(!options.is_empty() && options.len() <= 3);
                }
            }
        }
        assert!(step_spec(Step::Idle).is_none());
        assert!(step_spec(Step::Done).is_none());
    }

    #[test]
    fn every_transition_yields_next_step_and_prompt() {
        for step in ACTIVE_STEPS {
            let mut state = ConversationState::new("u", step);
            let outcome = advance(&mut state, "some answer");
            match outcome {
                AdvanceOutcome::Continued { prompt } => {
                    assert!(state.step.is_active(), "from {step}");
                    match prompt {
                        Prompt::Text(text) => assert!(!text.is_empty()),
                        Prompt::Buttons { body, .. } => assert!(!body.is_empty()),
                    }
                }
                AdvanceOutcome::Finished { summary } => {
                    assert_eq!(state.step, Step::Done, "from {step}");
                    assert!(!summary.is_empty());
                }
                AdvanceOutcome::Stale => panic!("active step {step} must transition"),
            }
            assert_eq!(state.answers.len(), 1, "one field written from {step}");
        }
    }

    #[test]
    fn start_enters_app_name() {
        let (state, prompt) = start("15550001111");
        assert_eq!(state.step, Step::AppName);
        assert!(state.answers.is_empty());
        assert_eq!(prompt, Prompt::Text("Please provide your App Name"));
    }

    #[test]
    fn full_walk_with_marketing_yes() {
        let (mut state, _) = start("u");
        let answers = [
            "PixelRunner",
            "https://apps.example.com/pixelrunner",
            "iap",
            "Yes",
            "$2000",
            "1200",
            "9000",
        ];
        for answer in answers {
            assert!(matches!(
                advance(&mut state, answer),
                AdvanceOutcome::Continued { .. }
            ));
        }
        assert_eq!(state.step, Step::Retention);

        let outcome = advance(&mut state, "10%,5%,2%");
        let AdvanceOutcome::Finished { summary } = outcome else {
            panic!("expected Finished, got {outcome:?}");
        };
        assert_eq!(state.step, Step::Done);
        assert!(summary.contains("App Name: PixelRunner"));
        assert!(summary.contains("Marketing Budget: $2000"));
        assert!(summary.contains("Retention: 10%,5%,2%"));
    }

    #[test]
    fn negative_marketing_spend_skips_amount() {
        let mut state = ConversationState::new("u", Step::MarketingSpend);
        let outcome = advance(&mut state, "No");
        assert_eq!(state.step, Step::Dau);
        assert_eq!(
            state.answers.get(&AnswerField::MarketingSpend).map(String::as_str),
            Some("No")
        );
        assert!(state.answers.get(&AnswerField::MarketingAmount).is_none());
        assert!(matches!(outcome, AdvanceOutcome::Continued { .. }));
    }

    #[test]
    fn affirmative_marketing_spend_asks_amount() {
        let mut state = ConversationState::new("u", Step::MarketingSpend);
        let outcome = advance(&mut state, "yes");
        assert_eq!(state.step, Step::MarketingAmount);
        let AdvanceOutcome::Continued { prompt } = outcome else {
            panic!("expected Continued");
        };
        assert_eq!(
            prompt,
            Prompt::Text("How much do you spend on marketing per month?")
        );
    }

    #[test]
    fn affirmative_parsing() {
        for yes in ["yes", "Yes", " YES ", "y", "yeah", "yep", "yes, around $500"] {
            assert!(is_affirmative(yes), "{yes:?} should be affirmative");
        }
        for no in ["no", "No", "nope", "not yet", "maybe", "yesterday I stopped"] {
            assert!(!is_affirmative(no), "{no:?} should not be affirmative");
        }
    }

    #[test]
    fn button_value_and_text_value_transition_identically() {
        // Revenue source selected via button id...
        let mut via_button = ConversationState::new("u", Step::RevenueSource);
        advance(&mut via_button, "iap");
        // ...or typed as free text.
        let mut via_text = ConversationState::new("u", Step::RevenueSource);
        advance(&mut via_text, "iap");

        assert_eq!(via_button.step, via_text.step);
        assert_eq!(via_button.answers, via_text.answers);
    }

    #[test]
    fn advance_from_idle_is_stale() {
        let mut state = ConversationState::new("u", Step::Idle);
        assert_eq!(advance(&mut state, "hello"), AdvanceOutcome::Stale);
        assert!(state.answers.is_empty());
    }

    #[test]
    fn answers_accumulate_and_overwrite() {
        let mut state = ConversationState::new("u", Step::AppName);
        advance(&mut state, "First Name");
        // Walking back to AppName (e.g. a re-run) overwrites, never removes.
        state.step = Step::AppName;
        advance(&mut state, "Second Name");
        assert_eq!(
            state.answers.get(&AnswerField::AppName).map(String::as_str),
            Some("Second Name")
        );
    }

    #[test]
    fn summary_lists_fields_in_questionnaire_order() {
        let mut state = ConversationState::new("u", Step::Retention);
        state.answers.insert(AnswerField::Retention, "10%".into());
        state.answers.insert(AnswerField::AppName, "App".into());
        state.answers.insert(AnswerField::Dau, "100".into());
        let text = summary(&state);
        let app = text.find("App Name:").unwrap();
        let dau = text.find("DAU:").unwrap();
        let ret = text.find("Retention:").unwrap();
        assert!(app < dau && dau < ret);
    }
}
