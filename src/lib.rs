//! Demonstration client for the Halcyon online services SDK.
//!
//! The vendor runtime is closed-source and callback driven: every async call
//! takes an options struct and a completion callback, and completions are
//! only ever delivered from inside `tick()`. The crate models that boundary
//! as the [`platform_adapter::PlatformAdapter`] trait and drives one full
//! login → unlock → query → report workflow over it with
//! [`sequencer::Sequencer`].

pub mod achievements;
pub mod auth;
pub mod config;
pub mod mock_platform;
pub mod platform;
pub mod platform_adapter;
pub mod sequencer;
pub mod session;
pub mod stats;
pub mod types;
