//! WideChat session: session lifecycle manager for the WideChat agent extension.
//!
//! Keeps the operator's WideChat login alive while an agent tab is open and
//! logs it out once the last one closes. Credentials are stored locally with
//! the password encrypted under a PBKDF2-derived AES-256-GCM key.
//!
//! This library crate exposes all modules for use by the host binary and
//! integration tests.

pub mod app;
pub mod database;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod reactor;
pub mod rpc_handler;
pub mod services;
pub mod types;
