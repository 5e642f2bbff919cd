//! In-memory items store
//!
//! The marketplace side of the application: a flat list of items held in
//! memory for the lifetime of the process. The store is an explicit object
//! created at application start and shared by handle, not process-wide
//! state. Lookups are linear scans; the list is small and unindexed.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("item {0} not found")]
    NotFound(Uuid),
}

/// Sale status of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    OnSale,
    SoldOut,
}

/// An item listed for sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ItemStatus,
}

/// Payload for creating an item
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub price: u32,
    pub description: Option<String>,
}

/// Shared in-memory item collection
#[derive(Debug, Default)]
pub struct ItemStore {
    items: RwLock<Vec<Item>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<Item> {
        self.items.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Result<Item, ItemError> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(ItemError::NotFound(id))
    }

    /// Add a new item; it starts on sale
    pub async fn create(&self, input: CreateItem) -> Item {
        let item = Item {
            id: Uuid::new_v4(),
            name: input.name,
            price: input.price,
            description: input.description,
            status: ItemStatus::OnSale,
        };

        self.items.write().await.push(item.clone());
        item
    }

    /// Mark an item as sold out
    pub async fn mark_sold(&self, id: Uuid) -> Result<Item, ItemError> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(ItemError::NotFound(id))?;
        item.status = ItemStatus::SoldOut;
        Ok(item.clone())
    }

    /// Remove an item; deleting an unknown id is a no-op
    pub async fn delete(&self, id: Uuid) {
        self.items.write().await.retain(|item| item.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> CreateItem {
        CreateItem {
            name: "widget".to_string(),
            price: 1200,
            description: Some("a widget".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let store = ItemStore::new();
        let created = store.create(widget()).await;
        assert_eq!(created.status, ItemStatus::OnSale);

        let items = store.list().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, created.id);
        assert_eq!(items[0].name, "widget");
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let store = ItemStore::new();
        let err = store.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ItemError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mark_sold() {
        let store = ItemStore::new();
        let created = store.create(widget()).await;

        let updated = store.mark_sold(created.id).await.unwrap();
        assert_eq!(updated.status, ItemStatus::SoldOut);
        assert_eq!(store.get(created.id).await.unwrap().status, ItemStatus::SoldOut);
    }

    #[tokio::test]
    async fn test_mark_sold_unknown_is_not_found() {
        let store = ItemStore::new();
        assert!(store.mark_sold(Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = ItemStore::new();
        let created = store.create(widget()).await;

        store.delete(created.id).await;
        assert!(store.list().await.is_empty());
        // Deleting again is fine
        store.delete(created.id).await;
    }
}
