use crate::api::AppState;
use crate::api::middleware::{PathParam, QueryParams, Session};
use crate::api::schemas::catalog::{CollectionResponse, CollectionsResponse, ProductListParams, ProductResponse};
use crate::error::Result;
use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;

pub async fn list_products(
    State(state): State<AppState>,
    Session(session): Session,
    jar: CookieJar,
    QueryParams(params): QueryParams<ProductListParams>,
) -> Result<impl IntoResponse> {
    let result = state.catalog_service.products(session, params.into()).await?;
    let jar = state.session_cookies.persist(jar, result.session.as_ref())?;
    Ok((jar, Json(result.value)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Session(session): Session,
    jar: CookieJar,
    PathParam(slug): PathParam<String>,
) -> Result<impl IntoResponse> {
    let result = state.catalog_service.product(session, &slug).await?;
    let jar = state.session_cookies.persist(jar, result.session.as_ref())?;
    Ok((jar, Json(ProductResponse { product: result.value })))
}

pub async fn list_collections(
    State(state): State<AppState>,
    Session(session): Session,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let result = state.catalog_service.collections(session).await?;
    let jar = state.session_cookies.persist(jar, result.session.as_ref())?;
    Ok((jar, Json(CollectionsResponse { collections: result.value })))
}

pub async fn get_collection(
    State(state): State<AppState>,
    Session(session): Session,
    jar: CookieJar,
    PathParam(slug): PathParam<String>,
) -> Result<impl IntoResponse> {
    let result = state.catalog_service.collection(session, &slug).await?;
    let jar = state.session_cookies.persist(jar, result.session.as_ref())?;
    let page = result.value;
    Ok((
        jar,
        Json(CollectionResponse {
            collection: page.collection,
            products: page.products.products,
            total: page.products.total,
        }),
    ))
}
