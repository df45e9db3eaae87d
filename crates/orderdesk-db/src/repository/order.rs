//! # Order History Repository
//!
//! Stores finalized orders as immutable snapshots.
//!
//! ## Storage Layout
//! Each row keeps the complete [`OrderRecord`] as JSON in `payload`; the
//! remaining columns are denormalised copies used for ordering and quick
//! inspection. Reads always decode `payload`, so a record comes back exactly
//! as it was saved.

use chrono::{DateTime, SecondsFormat, Utc};
use orderdesk_core::calculations::order_total;
use orderdesk_core::{NewOrderRecord, OrderRecord};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for the finalized order history.
#[derive(Debug, Clone)]
pub struct OrderHistoryRepository {
    pool: SqlitePool,
}

impl OrderHistoryRepository {
    /// Creates a new repository with the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        OrderHistoryRepository { pool }
    }

    /// Saves a finalized order.
    ///
    /// A missing id becomes a fresh UUID v4 and a missing timestamp becomes
    /// now. Returns the stored record.
    ///
    /// ## Errors
    /// [`DbError::UniqueViolation`] when the id is already taken.
    pub async fn save(&self, new_record: NewOrderRecord) -> DbResult<OrderRecord> {
        let id = new_record
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let created_at = new_record.created_at.unwrap_or_else(Utc::now);
        let record = new_record.into_record(id, created_at);

        let monthly_total = order_total(&record.order);
        let payload = serde_json::to_string(&record)?;

        debug!(
            id = %record.id,
            total = %monthly_total,
            customer = %record.order.customer.name,
            "Saving order"
        );

        sqlx::query(
            r#"
            INSERT INTO order_history (
                id, created_at, customer_name, product_id, plan_id,
                monthly_total, payload
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&record.id)
        .bind(sortable_timestamp(&record.created_at))
        .bind(&record.order.customer.name)
        .bind(record.order.product.as_ref().map(|product| product.id.as_str()))
        .bind(record.order.selected_plan.as_ref().map(|plan| plan.id.as_str()))
        .bind(monthly_total.to_string())
        .bind(&payload)
        .execute(&self.pool)
        .await
        .map_err(|err| match DbError::from(err) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, record.id.clone()),
            other => other,
        })?;

        Ok(record)
    }

    /// Lists every stored order, newest first.
    ///
    /// Orders with the same timestamp come back in reverse insertion order.
    pub async fn list(&self) -> DbResult<Vec<OrderRecord>> {
        let payloads: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT payload
            FROM order_history
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        payloads.iter().map(|payload| decode(payload)).collect()
    }

    /// Gets an order by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<OrderRecord>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM order_history WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        payload.as_deref().map(decode).transpose()
    }

    /// Deletes an order. Returns false when no order had that id.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM order_history WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(id = %id, deleted, "Deleting order");

        Ok(deleted)
    }

    /// Counts stored orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_history")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Fixed-width UTC timestamp; lexicographic order equals time order.
fn sortable_timestamp(created_at: &DateTime<Utc>) -> String {
    created_at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode(payload: &str) -> DbResult<OrderRecord> {
    Ok(serde_json::from_str(payload)?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, TimeZone};
    use orderdesk_core::catalog::find_product;
    use orderdesk_core::{Customer, Money, OrderSession};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn finalized(customer: &str, plan_id: &str) -> NewOrderRecord {
        let mut session = OrderSession::default();
        session.update_customer(Customer {
            name: customer.to_string(),
            ..Customer::default()
        });
        session.select_product(find_product("api-gateway").unwrap());
        session.select_plan(plan_id).unwrap();
        session.toggle_add_on("support-hours").unwrap();
        session.set_add_on_quantity("support-hours", 2).unwrap();
        session.finalize().unwrap()
    }

    #[tokio::test]
    async fn test_save_generates_id_and_timestamp() {
        let db = setup().await;
        let repo = db.orders();

        let before = Utc::now();
        let saved = repo
            .save(finalized("Acme Corp", "gateway-professional"))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&saved.id).is_ok());
        assert!(saved.created_at >= before);
        // 299 + 2 x 150
        assert_eq!(saved.breakdown.total, 599.0);
        assert_eq!(saved.order.total, 599.0);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id_returns_saved_snapshot() {
        let db = setup().await;
        let repo = db.orders();

        let saved = repo
            .save(finalized("Acme Corp", "gateway-starter").with_id("order-1"))
            .await
            .unwrap();

        let fetched = repo.get_by_id("order-1").await.unwrap().unwrap();
        assert_eq!(fetched, saved);
        assert_eq!(
            fetched.order.selected_plan.unwrap().price,
            Money::from_cents(9_900)
        );

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_total_column_keeps_exact_decimal() {
        let db = setup().await;
        let repo = db.orders();

        repo.save(finalized("Acme Corp", "gateway-enterprise").with_id("order-1"))
            .await
            .unwrap();

        let total: String =
            sqlx::query_scalar("SELECT monthly_total FROM order_history WHERE id = 'order-1'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(total, "1099");
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let db = setup().await;
        let repo = db.orders();

        repo.save(finalized("First", "gateway-starter").with_id("dup"))
            .await
            .unwrap();
        let err = repo
            .save(finalized("Second", "gateway-starter").with_id("dup"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "dup"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = setup().await;
        let repo = db.orders();
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        for (id, offset) in [("middle", 1), ("oldest", 0), ("newest", 2)] {
            repo.save(
                finalized(id, "gateway-starter")
                    .with_id(id)
                    .with_created_at(base + Duration::hours(offset)),
            )
            .await
            .unwrap();
        }

        let ids: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, vec!["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_same_timestamp_lists_latest_insert_first() {
        let db = setup().await;
        let repo = db.orders();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        for id in ["a", "b"] {
            repo.save(finalized(id, "gateway-starter").with_id(id).with_created_at(at))
                .await
                .unwrap();
        }

        let records = repo.list().await.unwrap();
        assert_eq!(records[0].id, "b");
        assert_eq!(records[1].id, "a");
    }

    #[tokio::test]
    async fn test_delete() {
        let db = setup().await;
        let repo = db.orders();

        repo.save(finalized("Acme Corp", "gateway-starter").with_id("order-1"))
            .await
            .unwrap();

        assert!(repo.delete("order-1").await.unwrap());
        assert!(!repo.delete("order-1").await.unwrap());
        assert!(!repo.delete("never-existed").await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[test]
    fn test_sortable_timestamp_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(sortable_timestamp(&whole), "2024-03-01T09:00:00.000000Z");
    }
}
