#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

//! Valet — an offline-first personal-assistant message router.
//!
//! Incoming messages are answered locally whenever possible (arithmetic,
//! unit conversion, the operator's knowledge base, search routing, small
//! talk) and escalated to an external model only when every local stage
//! declines. The model is optional; without one the router still answers
//! everything, just less conversationally.

pub mod bot;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod llm;
pub mod nlp;
pub mod orchestrator;
pub mod profile;
pub mod prompt;
pub mod sessions;

pub use config::Config;
pub use error::{Result, ValetError};
