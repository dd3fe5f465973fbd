//! Terminal feedback for the launcher
//!
//! Everything is written to stderr and only when it is an interactive
//! terminal. stdout is reserved for the launched toolchain.

mod context;
mod progress;

pub use context::UiContext;
pub use progress::InstallSpinner;
