//! Smart-home control dashboard.
//!
//! A single-page Dioxus app over mocked backends:
//! - Session lifecycle with a post-login door transition
//! - Menu navigation kept in step with browser history
//! - Device control with optimistic toggles and rollback
//! - Camera monitoring, automation routines and household members
//! - Notification tray with archive and clear-all

pub mod app;
pub mod bus;
#[cfg(feature = "server")]
pub mod config;
pub mod navigation;
pub mod panels;
pub mod session;
pub mod storage;
pub mod timer;
pub mod transition;
