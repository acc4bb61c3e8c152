use crate::adapters::wix::records::{CollectionRecord, ProductRecord};
use crate::adapters::wix::{WixClient, WixError, send_json};
use crate::domain::catalog::{Collection, Product, ProductPage, ProductQuery};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

#[derive(Serialize)]
struct Paging {
    limit: u32,
    offset: u32,
}

#[derive(Serialize)]
struct QueryBody {
    paging: Paging,
    /// The platform expects the filter as a JSON-encoded string.
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    query: QueryBody,
    include_variants: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductsResponse {
    #[serde(default)]
    products: Vec<ProductRecord>,
    total_results: Option<i64>,
}

#[derive(Deserialize)]
struct CollectionsResponse {
    #[serde(default)]
    collections: Vec<CollectionRecord>,
}

#[derive(Deserialize)]
struct CollectionEnvelope {
    collection: CollectionRecord,
}

fn product_filter(query: &ProductQuery) -> Option<String> {
    let mut filter = Map::new();
    if let Some(collection_id) = &query.collection_id {
        filter.insert("collectionIds".into(), json!({ "$hasSome": [collection_id] }));
    }
    if let Some(prefix) = &query.name_prefix {
        filter.insert("name".into(), json!({ "$startsWith": prefix }));
    }
    if let Some(slug) = &query.slug {
        filter.insert("slug".into(), Value::String(slug.clone()));
    }
    (!filter.is_empty()).then(|| Value::Object(filter).to_string())
}

#[derive(Debug)]
pub struct Products<'a> {
    client: &'a WixClient,
}

impl<'a> Products<'a> {
    pub(crate) const fn new(client: &'a WixClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Propagates platform errors.
    pub async fn query(&self, query: &ProductQuery) -> Result<ProductPage, WixError> {
        let body = QueryRequest {
            query: QueryBody {
                paging: Paging { limit: query.limit, offset: query.offset },
                filter: product_filter(query),
            },
            include_variants: false,
        };
        let response: ProductsResponse =
            send_json(self.client.request(Method::POST, "/stores-reader/v1/products/query").json(&body)).await?;

        let products: Vec<Product> = response.products.into_iter().map(Product::from).collect();
        let total = response.total_results.unwrap_or_else(|| i64::try_from(products.len()).unwrap_or(i64::MAX));
        Ok(ProductPage { products, total })
    }

    /// # Errors
    /// Propagates platform errors.
    pub async fn by_slug(&self, slug: &str) -> Result<Option<Product>, WixError> {
        let query = ProductQuery { limit: 1, slug: Some(slug.to_string()), ..ProductQuery::default() };
        Ok(self.query(&query).await?.products.into_iter().next())
    }
}

#[derive(Debug)]
pub struct Collections<'a> {
    client: &'a WixClient,
}

impl<'a> Collections<'a> {
    pub(crate) const fn new(client: &'a WixClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Propagates platform errors.
    pub async fn list(&self) -> Result<Vec<Collection>, WixError> {
        let body = QueryRequest {
            query: QueryBody { paging: Paging { limit: ProductQuery::MAX_LIMIT, offset: 0 }, filter: None },
            include_variants: false,
        };
        let response: CollectionsResponse =
            send_json(self.client.request(Method::POST, "/stores-reader/v1/collections/query").json(&body)).await?;
        Ok(response.collections.into_iter().map(Collection::from).collect())
    }

    /// # Errors
    /// Unknown slugs surface as `WixError::Api` with status 404.
    pub async fn by_slug(&self, slug: &str) -> Result<Collection, WixError> {
        let path = format!("/stores-reader/v1/collections/slug/{}", urlencoding::encode(slug));
        let envelope: CollectionEnvelope = send_json(self.client.request(Method::GET, &path)).await?;
        Ok(envelope.collection.into())
    }
}
