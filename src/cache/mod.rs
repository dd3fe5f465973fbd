//! Toolchain cache directory
//!
//! One directory per (application, version) under the user's cache root.
//! A directory that exists is treated as installed; nothing inside it is
//! verified before use.
//!
//! # Lifecycle
//!
//! | State | Description |
//! |-------|-------------|
//! | Missing | First run for this version, install required |
//! | Installing | Being populated, removed again if the copy fails |
//! | Present | Used as-is on every later run |

pub mod dir;
pub mod manifest;

pub use dir::{process_env, user_cache_dir};
pub use manifest::{InstallManifest, MANIFEST_FILE};
