use crate::adapters::wix::{WixClient, WixClientFactory};
use crate::domain::cart::{Cart, CheckoutRedirect, NewCartLine};
use crate::domain::tokens::TokenBundle;
use crate::error::{AppError, Result};
use crate::services::WithSession;
use opentelemetry::{KeyValue, global, metrics::Counter};

#[derive(Clone, Debug)]
struct Metrics {
    mutations_total: Counter<u64>,
    checkouts_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("pokecollect-server");
        Self {
            mutations_total: meter
                .u64_counter("cart_mutations_total")
                .with_description("Cart changes by action")
                .build(),
            checkouts_total: meter
                .u64_counter("cart_checkouts_total")
                .with_description("Total number of checkouts started")
                .build(),
        }
    }
}

/// The current cart of a member or visitor. A visitor session is started
/// when the request carries none, and its tokens are handed back for
/// persistence so the cart survives the next request.
#[derive(Clone, Debug)]
pub struct CartService {
    wix: WixClientFactory,
    metrics: Metrics,
}

impl CartService {
    #[must_use]
    pub fn new(wix: WixClientFactory) -> Self {
        Self { wix, metrics: Metrics::new() }
    }

    async fn client(&self, session: Option<TokenBundle>) -> Result<WixClient> {
        Ok(self.wix.session(session).await?)
    }

    /// # Errors
    /// Propagates platform errors.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn cart(&self, session: Option<TokenBundle>) -> Result<WithSession<Cart>> {
        let client = self.client(session).await?;
        let cart = client.current_cart().get().await?;
        Ok(WithSession::from_client(cart, &client))
    }

    /// # Errors
    /// `BadRequest` for a blank product id or a quantity below one.
    #[tracing::instrument(skip(self, session), fields(product.id = %line.product_id), err(level = "warn"))]
    pub async fn add_item(&self, session: Option<TokenBundle>, line: NewCartLine) -> Result<WithSession<Cart>> {
        if line.product_id.trim().is_empty() {
            return Err(AppError::BadRequest("productId is required".into()));
        }
        validate_quantity(line.quantity)?;

        let client = self.client(session).await?;
        let cart = client.current_cart().add(std::slice::from_ref(&line)).await?;
        self.record("add");
        Ok(WithSession::from_client(cart, &client))
    }

    /// # Errors
    /// `BadRequest` for a quantity below one; removal has its own route.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn update_item(
        &self,
        session: Option<TokenBundle>,
        line_item_id: &str,
        quantity: u32,
    ) -> Result<WithSession<Cart>> {
        validate_quantity(quantity)?;

        let client = self.client(session).await?;
        let cart = client.current_cart().update_quantity(line_item_id, quantity).await?;
        self.record("update");
        Ok(WithSession::from_client(cart, &client))
    }

    /// # Errors
    /// Propagates platform errors.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn remove_item(&self, session: Option<TokenBundle>, line_item_id: &str) -> Result<WithSession<Cart>> {
        let client = self.client(session).await?;
        let cart = client.current_cart().remove(line_item_id).await?;
        self.record("remove");
        Ok(WithSession::from_client(cart, &client))
    }

    /// Turns the cart into a checkout and returns the hosted checkout URL.
    ///
    /// # Errors
    /// Propagates platform errors, e.g. for an empty cart.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn checkout(
        &self,
        session: Option<TokenBundle>,
        post_flow_url: Option<&str>,
    ) -> Result<WithSession<CheckoutRedirect>> {
        let client = self.client(session).await?;
        let checkout_id = client.current_cart().create_checkout().await?;
        let checkout_url = client.redirects().checkout_url(&checkout_id, post_flow_url).await?;

        tracing::info!(checkout.id = %checkout_id, "Checkout created");
        self.metrics.checkouts_total.add(1, &[]);
        Ok(WithSession::from_client(CheckoutRedirect { checkout_id, checkout_url }, &client))
    }

    fn record(&self, action: &'static str) {
        self.metrics.mutations_total.add(1, &[KeyValue::new("action", action)]);
    }
}

fn validate_quantity(quantity: u32) -> Result<()> {
    if quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".into()));
    }
    Ok(())
}
