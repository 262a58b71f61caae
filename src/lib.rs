//! waflow — WhatsApp webhook reply bot with a seller questionnaire flow.

pub mod audit;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod flow;
pub mod outbound;
pub mod webhook;
