//! Shared UI components for the dashboard.

pub mod door_transition;
pub mod form_inputs;
pub mod inline_message;
pub mod layout;
pub mod modal;
pub mod nav;
pub mod notification_tray;
pub mod theme;

pub use door_transition::DoorTransition;
pub use form_inputs::{TextInput, ToggleInput};
pub use inline_message::InlineMessage;
pub use layout::Layout;
pub use modal::Modal;
pub use nav::Nav;
pub use notification_tray::NotificationBell;
pub use theme::ThemeSwitcher;
