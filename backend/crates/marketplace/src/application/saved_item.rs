//! Saved Items
//!
//! Bookmarks live on the user document as typed references. Saving checks
//! the referenced listing exists; listing resolves each reference by its
//! tag and skips references whose listing has since been deleted.

use std::sync::Arc;

use accounts::UserRepository;
use accounts::domain::{SavedItem, SavedItemType};
use kernel::id::{TutorialId, UserId};

use crate::domain::entity::{Job, Post, Product};
use crate::domain::repository::ListingRepository;
use crate::error::{MarketError, MarketResult};

/// A resolved bookmark
#[derive(Debug, Clone)]
pub enum SavedEntry {
    Product(Product),
    Post(Post),
    Job(Job),
    Tutorial(TutorialId),
}

/// Saved items use case
pub struct SavedItemService<U, P, Q, J>
where
    U: UserRepository,
    P: ListingRepository<Product>,
    Q: ListingRepository<Post>,
    J: ListingRepository<Job>,
{
    users: Arc<U>,
    products: Arc<P>,
    posts: Arc<Q>,
    jobs: Arc<J>,
}

impl<U, P, Q, J> SavedItemService<U, P, Q, J>
where
    U: UserRepository + Sync,
    P: ListingRepository<Product> + Sync,
    Q: ListingRepository<Post> + Sync,
    J: ListingRepository<Job> + Sync,
{
    pub fn new(users: Arc<U>, products: Arc<P>, posts: Arc<Q>, jobs: Arc<J>) -> Self {
        Self {
            users,
            products,
            posts,
            jobs,
        }
    }

    /// Bookmark `item`; saving it again changes nothing
    pub async fn save(&self, user: UserId, item: SavedItem) -> MarketResult<Vec<SavedItem>> {
        self.ensure_exists(item).await?;

        let (added, saved) = self
            .users
            .modify(user, |u| {
                let added = u.save_item(item);
                Ok((added, u.saved_items().to_vec()))
            })
            .await?
            .ok_or(MarketError::NotFound("User"))?;

        if added {
            tracing::info!(
                user_id = %user,
                item_type = %item.item_type(),
                item_id = %item.item_id(),
                "Item saved"
            );
        }

        Ok(saved)
    }

    /// Drop a bookmark; removing one that is not saved changes nothing
    pub async fn remove(&self, user: UserId, item: SavedItem) -> MarketResult<Vec<SavedItem>> {
        let saved = self
            .users
            .modify(user, |u| {
                u.remove_item(&item);
                Ok(u.saved_items().to_vec())
            })
            .await?
            .ok_or(MarketError::NotFound("User"))?;

        Ok(saved)
    }

    /// Resolved bookmarks, optionally of one type, in the order they were saved
    pub async fn list(&self, user: UserId, item_type: Option<SavedItemType>) -> MarketResult<Vec<SavedEntry>> {
        let account = self
            .users
            .find_by_id(user)
            .await?
            .ok_or(MarketError::NotFound("User"))?;

        let mut entries = Vec::new();
        for item in account.saved_items() {
            if item_type.is_some_and(|t| t != item.item_type()) {
                continue;
            }
            let entry = match *item {
                SavedItem::Product(id) => self.products.find_by_id(id).await?.map(SavedEntry::Product),
                SavedItem::Post(id) => self.posts.find_by_id(id).await?.map(SavedEntry::Post),
                SavedItem::Job(id) => self.jobs.find_by_id(id).await?.map(SavedEntry::Job),
                SavedItem::Tutorial(id) => Some(SavedEntry::Tutorial(id)),
            };
            match entry {
                Some(entry) => entries.push(entry),
                None => tracing::debug!(
                    user_id = %user,
                    item_id = %item.item_id(),
                    "Skipping saved item whose listing is gone"
                ),
            }
        }

        Ok(entries)
    }

    async fn ensure_exists(&self, item: SavedItem) -> MarketResult<()> {
        let found = match item {
            SavedItem::Product(id) => self.products.find_by_id(id).await?.is_some(),
            SavedItem::Post(id) => self.posts.find_by_id(id).await?.is_some(),
            SavedItem::Job(id) => self.jobs.find_by_id(id).await?.is_some(),
            SavedItem::Tutorial(_) => true,
        };
        if found {
            Ok(())
        } else {
            Err(MarketError::NotFound(item.item_type().code()))
        }
    }
}
