//! # PromptCart Common Library
//!
//! Shared code for the PromptCart workspace:
//! - Error and result types
//! - TOML configuration loading
//! - Event types and the broadcast EventBus
//! - Server-Sent Events helpers

pub mod config;
pub mod error;
pub mod events;
pub mod sse;

pub use error::{Error, Result};
