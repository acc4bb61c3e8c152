use crate::domain::catalog::{Collection, Product, ProductQuery};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub collection_id: Option<String>,
    pub q: Option<String>,
}

impl From<ProductListParams> for ProductQuery {
    fn from(params: ProductListParams) -> Self {
        Self {
            limit: params.limit.unwrap_or(Self::DEFAULT_LIMIT),
            offset: params.offset.unwrap_or(0),
            collection_id: params.collection_id.filter(|id| !id.is_empty()),
            name_prefix: params.q,
            slug: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct CollectionsResponse {
    pub collections: Vec<Collection>,
}

#[derive(Debug, Serialize)]
pub struct CollectionResponse {
    pub collection: Collection,
    pub products: Vec<Product>,
    pub total: i64,
}
