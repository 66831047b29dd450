//! Product Service

use std::sync::Arc;

use kernel::id::{ProductId, UserId};

use crate::application::config::MarketConfig;
use crate::application::listing;
use crate::domain::entity::Product;
use crate::domain::filter::{Page, ProductFilter};
use crate::domain::repository::ListingRepository;
use crate::domain::search::SearchQuery;
use crate::domain::validator::{Mode, ProductInput, validate_product};
use crate::error::MarketResult;

/// Product listing store
pub struct ProductService<P>
where
    P: ListingRepository<Product>,
{
    products: Arc<P>,
    config: Arc<MarketConfig>,
}

impl<P> ProductService<P>
where
    P: ListingRepository<Product> + Sync,
{
    pub fn new(products: Arc<P>, config: Arc<MarketConfig>) -> Self {
        Self { products, config }
    }

    /// Validate the listing form and store a new product for `seller`
    pub async fn create(&self, seller: UserId, input: ProductInput) -> MarketResult<Product> {
        let draft = validate_product(input, Mode::Create)?;
        let product = Product::new(seller, draft);
        self.products.create(&product).await?;

        tracing::info!(product_id = %product.id, seller = %seller, "Product listed");

        Ok(product)
    }

    pub async fn get(&self, id: ProductId) -> MarketResult<Product> {
        listing::fetch(self.products.as_ref(), id).await
    }

    /// Filtered page, ranked by `q` when one is given
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: Page,
        q: Option<&str>,
        fields: Option<&str>,
    ) -> MarketResult<Vec<Product>> {
        let pattern = filter.pattern()?;
        let query = SearchQuery::parse::<Product>(q, fields)?;
        listing::browse(self.products.as_ref(), &pattern, &query, self.config.slice(page)).await
    }

    /// Owner-only patch; the merged product must still validate
    pub async fn update(
        &self,
        id: ProductId,
        requester: UserId,
        patch: ProductInput,
    ) -> MarketResult<Product> {
        let product = listing::edit(self.products.as_ref(), id, requester, |product: &mut Product| {
            let merged = ProductInput::from(&*product).merge(patch.clone());
            let draft = validate_product(merged, Mode::Update)?;
            product.apply(draft);
            Ok(())
        })
        .await?;

        tracing::info!(product_id = %id, "Product updated");

        Ok(product)
    }

    pub async fn delete(&self, id: ProductId, requester: UserId) -> MarketResult<()> {
        listing::remove::<Product, _>(self.products.as_ref(), id, requester).await
    }
}
