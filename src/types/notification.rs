use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-visible notification raised through the extension host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: &str, message: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}
