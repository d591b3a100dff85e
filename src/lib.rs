//! Eco Assist — conversation/session engine for a sustainability assistant.

pub mod classifier;
pub mod config;
pub mod error;
pub mod messages;
pub mod profile;
pub mod session;
