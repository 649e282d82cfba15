//! One component per menu entry, plus the two public auth pages.

mod configuration;
mod devices;
mod enrollment;
mod home;
mod login;
mod placeholder;
mod recover;
mod routines;
mod security;

pub use configuration::Configuration;
pub use devices::Devices;
pub use home::Home;
pub use login::Login;
pub use placeholder::{Chat, House3d, Music};
pub use recover::RecoverPassword;
pub use routines::Routines;
pub use security::Security;
