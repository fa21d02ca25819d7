use std::collections::BTreeMap;

use async_trait::async_trait;
use cantstop_domain::{normalize_answer, ItemId, ShopListing};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{RepoError, SaleOutcome, ShopRepo};

pub struct InMemoryShopRepo {
    listings: RwLock<BTreeMap<ItemId, ShopListing>>,
}

impl InMemoryShopRepo {
    pub fn new(listings: Vec<ShopListing>) -> Self {
        Self {
            listings: RwLock::new(
                listings
                    .into_iter()
                    .map(|listing| (listing.item, listing))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl ShopRepo for InMemoryShopRepo {
    async fn list(&self) -> Result<Vec<ShopListing>, RepoError> {
        Ok(self.listings.read().await.values().cloned().collect())
    }

    async fn get(&self, item: ItemId) -> Result<Option<ShopListing>, RepoError> {
        Ok(self.listings.read().await.get(&item).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<ShopListing>, RepoError> {
        let wanted = normalize_answer(name);
        if wanted.is_empty() {
            return Ok(None);
        }
        Ok(self
            .listings
            .read()
            .await
            .values()
            .find(|listing| normalize_answer(&listing.name) == wanted)
            .cloned())
    }

    async fn unlock(&self, item: ItemId) -> Result<bool, RepoError> {
        let mut listings = self.listings.write().await;
        let listing = listings
            .get_mut(&item)
            .ok_or_else(|| RepoError::not_found("ShopListing", item))?;
        let was_locked = !listing.unlocked;
        listing.unlocked = true;
        Ok(was_locked)
    }

    async fn try_record_sale(&self, item: ItemId) -> Result<SaleOutcome, RepoError> {
        let mut listings = self.listings.write().await;
        let Some(listing) = listings.get_mut(&item) else {
            return Ok(SaleOutcome::NotListed);
        };
        if listing.remaining() == Some(0) {
            return Ok(SaleOutcome::SoldOut);
        }
        listing.sold += 1;
        Ok(SaleOutcome::Recorded {
            remaining: listing.remaining(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> InMemoryShopRepo {
        InMemoryShopRepo::new(vec![
            ShopListing::new(ItemId::new(17), "My Map", 40).with_global_limit(2),
            ShopListing::new(ItemId::new(3), "Sweet Talk", 30),
        ])
    }

    #[tokio::test]
    async fn name_lookup_ignores_case_and_spacing() {
        let repo = repo();
        let listing = repo.get_by_name("  my-MAP ").await.expect("lookup");
        assert_eq!(listing.map(|l| l.item), Some(ItemId::new(17)));
        assert!(repo.get_by_name("???").await.expect("lookup").is_none());
    }

    #[tokio::test]
    async fn global_limit_is_enforced() {
        let repo = repo();
        let item = ItemId::new(17);
        assert_eq!(
            repo.try_record_sale(item).await.expect("sale"),
            SaleOutcome::Recorded { remaining: Some(1) }
        );
        assert_eq!(
            repo.try_record_sale(item).await.expect("sale"),
            SaleOutcome::Recorded { remaining: Some(0) }
        );
        assert_eq!(repo.try_record_sale(item).await.expect("sale"), SaleOutcome::SoldOut);
        assert_eq!(
            repo.try_record_sale(ItemId::new(99)).await.expect("sale"),
            SaleOutcome::NotListed
        );
    }

    #[tokio::test]
    async fn unlock_reports_the_first_time_only() {
        let repo = repo();
        assert!(repo.unlock(ItemId::new(3)).await.expect("unlock"));
        assert!(!repo.unlock(ItemId::new(3)).await.expect("unlock"));
        assert!(repo.get(ItemId::new(3)).await.expect("get").is_some_and(|l| l.unlocked));

        let result = repo.unlock(ItemId::new(99)).await;
        assert!(matches!(result, Err(ref e) if e.is_not_found()));
    }
}
