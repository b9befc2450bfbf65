//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::links::Link;

use super::CreateLinkValues;
use super::Error;
use super::Result;
use super::Storage;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All links in storage, by code
    links: Arc<Mutex<HashMap<String, Link>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for Memory {
    async fn find_single_link_by_code(&self, code: &str) -> Result<Option<Link>> {
        Ok(self.links.lock().await.get(code).cloned())
    }

    async fn find_all_links(&self) -> Result<Vec<Link>> {
        let mut links = self
            .links
            .lock()
            .await
            .values()
            .cloned()
            .collect::<Vec<Link>>();

        // same order as Postgres: newest first, ties by code
        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });

        Ok(links)
    }

    async fn create_link(&self, values: &CreateLinkValues<'_>) -> Result<Link> {
        match self.links.lock().await.entry(values.code.to_string()) {
            Entry::Occupied(_) => Err(Error::UniqueViolation(format!(
                "code \"{}\" already exists",
                values.code
            ))),
            Entry::Vacant(entry) => {
                let link = Link {
                    code: values.code.to_string(),
                    url: values.url.to_string(),
                    click_count: 0,
                    last_clicked: None,
                    created_at: values.created_at,
                };

                entry.insert(link.clone());

                Ok(link)
            }
        }
    }

    async fn increment_clicks(
        &self,
        code: &str,
        clicked_at: DateTime<Utc>,
    ) -> Result<Option<Link>> {
        Ok(self.links.lock().await.get_mut(code).map(|link| {
            link.register_click(clicked_at);

            link.clone()
        }))
    }

    async fn delete_link(&self, code: &str) -> Result<bool> {
        Ok(self.links.lock().await.remove(code).is_some())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
