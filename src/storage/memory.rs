//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::clicks::ClickContext;
use crate::clicks::ClickEvent;
use crate::links::Link;

use super::Error;
use super::Result;
use super::Storage;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All links in storage, by short code
    links: Arc<Mutex<HashMap<String, Link>>>,

    /// All clicks in storage, in order of insertion
    clicks: Arc<Mutex<Vec<ClickEvent>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// All clicks in storage
    #[cfg(test)]
    pub async fn clicks(&self) -> Vec<ClickEvent> {
        self.clicks.lock().await.clone()
    }

    /// Seed a link, `None` when the short code is already taken
    ///
    /// Links are created outside of this service, tests need them in storage regardless
    #[cfg(test)]
    pub async fn create_link(&self, short_code: &str, url: &str) -> Option<Link> {
        use std::collections::hash_map::Entry;

        match self.links.lock().await.entry(short_code.to_string()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(entry) => {
                let link = Link {
                    id: uuid::Uuid::new_v4(),
                    short_code: short_code.to_string(),
                    url: url.to_string(),
                    user_id: uuid::Uuid::new_v4(),
                    created_at: chrono::Utc::now().naive_utc(),
                };

                Some(entry.insert(link).clone())
            }
        }
    }
}

#[async_trait]
impl Storage for Memory {
    async fn find_single_link_by_short_code(&self, short_code: &str) -> Result<Option<Link>> {
        Ok(self.links.lock().await.get(short_code).cloned())
    }

    async fn save_click(&self, link: &Link, context: &ClickContext) -> Result<ClickEvent> {
        let click = ClickEvent::new(link, context);

        self.clicks.lock().await.push(click.clone());

        Ok(click)
    }

    async fn count_clicks_by_link(&self, link: &Link) -> Result<i64> {
        let count = self
            .clicks
            .lock()
            .await
            .iter()
            .filter(|click| click.link_id == link.id)
            .count();

        i64::try_from(count).map_err(|err| Error::Connection(err.to_string()))
    }
}
