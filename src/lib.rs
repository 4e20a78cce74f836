//! Client for the chef food-recommendation assistant.
//!
//! The library holds everything that is not a pixel: the session state machine
//! ([`session`]), its async driver ([`controller`]), the backend client ([`api`]),
//! message formatting ([`markup`]), the typing effect ([`typing`]), the username
//! store ([`storage`]) and configuration ([`config`]). The Dioxus widget lives in
//! [`ui`] and [`views`] behind the `ui` feature.

pub mod api;
pub mod config;
pub mod controller;
pub mod markup;
pub mod session;
pub mod storage;
pub mod types;
pub mod typing;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;

pub use controller::ChefChat;
pub use session::{ChatSession, Quantity, ResetOutcome, SessionError, SessionState};
