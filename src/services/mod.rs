// Session services
// Stateless or I/O-bound building blocks: password cipher, auth API client, notifications, settings.

pub mod crypto_service;
pub mod notifier;
pub mod session_client;
pub mod settings_engine;
