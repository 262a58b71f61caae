//! Seller questionnaire flow: steps, transition table, conversation store.

pub mod machine;
pub mod step;
pub mod store;

pub use machine::{AdvanceOutcome, Prompt, FLOW_TRIGGER};
pub use step::{AnswerField, Step};
pub use store::{ConversationState, ConversationStore, InMemoryStore};
