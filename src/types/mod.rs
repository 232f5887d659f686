// Shared type definitions
// Each submodule defines types used across the crate.

pub mod credential;
pub mod errors;
pub mod event;
pub mod notification;
pub mod settings;
pub mod tab;
