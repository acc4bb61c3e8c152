use crate::adapters::wix::WixClientFactory;
use crate::domain::catalog::{Collection, Product, ProductPage, ProductQuery};
use crate::domain::tokens::TokenBundle;
use crate::error::{AppError, Result};
use crate::services::WithSession;

/// A collection together with (the first page of) its products.
#[derive(Debug, Clone)]
pub struct CollectionPage {
    pub collection: Collection,
    pub products: ProductPage,
}

/// Read-only catalog access. Browsing works with any session; visitors get
/// anonymous tokens minted on first use.
#[derive(Clone, Debug)]
pub struct CatalogService {
    wix: WixClientFactory,
}

impl CatalogService {
    #[must_use]
    pub const fn new(wix: WixClientFactory) -> Self {
        Self { wix }
    }

    /// # Errors
    /// Propagates platform errors.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn products(
        &self,
        session: Option<TokenBundle>,
        query: ProductQuery,
    ) -> Result<WithSession<ProductPage>> {
        let client = self.wix.session(session).await?;
        let page = client.products().query(&normalize(query)).await?;
        Ok(WithSession::from_client(page, &client))
    }

    /// # Errors
    /// `NotFound` when no product has the slug.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn product(&self, session: Option<TokenBundle>, slug: &str) -> Result<WithSession<Product>> {
        let client = self.wix.session(session).await?;
        let product = client.products().by_slug(slug).await?.ok_or(AppError::NotFound)?;
        Ok(WithSession::from_client(product, &client))
    }

    /// # Errors
    /// Propagates platform errors.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn collections(&self, session: Option<TokenBundle>) -> Result<WithSession<Vec<Collection>>> {
        let client = self.wix.session(session).await?;
        let collections = client.collections().list().await?;
        Ok(WithSession::from_client(collections, &client))
    }

    /// # Errors
    /// `NotFound` when no collection has the slug.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn collection(&self, session: Option<TokenBundle>, slug: &str) -> Result<WithSession<CollectionPage>> {
        let client = self.wix.session(session).await?;
        let collection = client.collections().by_slug(slug).await?;
        let query = ProductQuery {
            limit: ProductQuery::MAX_LIMIT,
            collection_id: Some(collection.id.clone()),
            ..ProductQuery::default()
        };
        let products = client.products().query(&query).await?;
        Ok(WithSession::from_client(CollectionPage { collection, products }, &client))
    }
}

fn normalize(mut query: ProductQuery) -> ProductQuery {
    query.limit = match query.limit {
        0 => ProductQuery::DEFAULT_LIMIT,
        limit => limit.min(ProductQuery::MAX_LIMIT),
    };
    query.name_prefix = query.name_prefix.map(|q| q.trim().to_string()).filter(|q| !q.is_empty());
    query
}
