//! Order history read path.

use std::sync::Arc;

use tracing::debug;

use crate::{
    api::{ApiError, StorefrontApi},
    domain::orders::models::Order,
    ids::UserId,
};

/// Read-only view of a user's past orders.
#[derive(Clone)]
pub struct OrderHistory {
    api: Arc<dyn StorefrontApi>,
}

impl std::fmt::Debug for OrderHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderHistory").finish_non_exhaustive()
    }
}

impl OrderHistory {
    /// History backed by `api`.
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self { api }
    }

    /// Orders placed by `user`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error when the service cannot be reached or replies with an
    /// unexpected response.
    pub async fn list(&self, user: &UserId) -> Result<Vec<Order>, ApiError> {
        let mut orders = self.api.fetch_orders(user).await?;

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!(user = %user, count = orders.len(), "loaded order history");

        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        api::MockStorefrontApi,
        domain::orders::models::{OrderId, OrderStatus},
    };

    use super::*;

    fn order(id: &str, created_at: &str) -> Result<Order, jiff::Error> {
        Ok(Order {
            id: OrderId::new(id),
            user_id: UserId::new("u1"),
            items: Vec::new(),
            total_amount: 0,
            status: OrderStatus::Pending,
            created_at: created_at.parse()?,
        })
    }

    #[tokio::test]
    async fn list_returns_newest_orders_first() -> TestResult {
        let older = order("1", "2026-01-01T08:00:00Z")?;
        let newer = order("2", "2026-02-01T08:00:00Z")?;
        let rows = vec![older.clone(), newer.clone()];

        let mut api = MockStorefrontApi::new();

        api.expect_fetch_orders()
            .once()
            .withf(|user| user.as_str() == "u1")
            .return_once(move |_| Ok(rows));

        let history = OrderHistory::new(Arc::new(api));

        assert_eq!(history.list(&UserId::new("u1")).await?, vec![newer, older]);

        Ok(())
    }

    #[tokio::test]
    async fn list_surfaces_service_errors() {
        let mut api = MockStorefrontApi::new();

        api.expect_fetch_orders()
            .once()
            .return_once(|_| Err(ApiError::UnexpectedResponse("boom".to_string())));

        let result = OrderHistory::new(Arc::new(api))
            .list(&UserId::new("u1"))
            .await;

        assert!(
            matches!(result, Err(ApiError::UnexpectedResponse(_))),
            "expected UnexpectedResponse, got {result:?}"
        );
    }
}
