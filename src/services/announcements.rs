//! Bulletin board kept in process memory.
//!
//! The board starts empty and is never persisted: a restart clears it.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnouncementError {
    #[error("Missing title or content")]
    MissingField,
}

#[derive(Debug, Default)]
pub struct AnnouncementBoard {
    items: RwLock<Vec<Announcement>>,
}

impl AnnouncementBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All announcements in insertion order.
    pub async fn list(&self) -> Vec<Announcement> {
        self.items.read().await.clone()
    }

    pub async fn create(
        &self,
        title: &str,
        content: &str,
    ) -> Result<Announcement, AnnouncementError> {
        if title.is_empty() || content.is_empty() {
            return Err(AnnouncementError::MissingField);
        }

        let announcement = Announcement {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: content.to_string(),
        };

        self.items.write().await.push(announcement.clone());
        info!(id = %announcement.id, "Announcement created");

        Ok(announcement)
    }
}
