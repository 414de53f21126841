//! # Customer Repository
//!
//! The customer registry: CRUD over the `customers` table.
//!
//! A customer can be deleted only while no sale points at it; the check and
//! the delete share one transaction (see [`CustomerRepository::delete`]).

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::begin_write;
use toko_core::identifier;
use toko_core::validation::{validate_customer, validate_customer_patch};
use toko_core::{Customer, CustomerPatch, CUSTOMER_ID_PREFIX};

/// Repository for customer operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<Customer>> {
        let mut conn = self.pool.acquire().await?;
        fetch_customer(&mut conn, id).await
    }

    /// Lists all customers in identifier order.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let mut customers =
            sqlx::query_as::<_, Customer>("SELECT id, name, domicile, gender FROM customers")
                .fetch_all(&self.pool)
                .await?;

        identifier::sort_by_id(&mut customers, |c| c.id.as_str());
        Ok(customers)
    }

    /// Registers a new customer.
    ///
    /// ## Errors
    /// * `Validation` - malformed id, empty or over-long name/domicile
    /// * `UniqueViolation` - the id is taken
    pub async fn create(&self, customer: Customer) -> DbResult<Customer> {
        validate_customer(&customer)?;

        debug!(id = %customer.id, "Inserting customer");

        sqlx::query("INSERT INTO customers (id, name, domicile, gender) VALUES (?1, ?2, ?3, ?4)")
            .bind(&customer.id)
            .bind(&customer.name)
            .bind(&customer.domicile)
            .bind(customer.gender)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("id", &customer.id),
                other => other,
            })?;

        Ok(customer)
    }

    /// Applies a partial update. The id never changes.
    pub async fn update(&self, id: &str, patch: CustomerPatch) -> DbResult<Customer> {
        let mut tx = begin_write(&self.pool).await?;

        let mut customer = fetch_customer(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))?;
        validate_customer_patch(&patch)?;
        customer.apply(patch);

        debug!(id = %id, "Updating customer");

        sqlx::query("UPDATE customers SET name = ?1, domicile = ?2, gender = ?3 WHERE id = ?4")
            .bind(&customer.name)
            .bind(&customer.domicile)
            .bind(customer.gender)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(customer)
    }

    /// Deletes a customer with no sales.
    ///
    /// ## Errors
    /// * `NotFound` - no customer with this id
    /// * `ReferentialConflict` - at least one sale belongs to the customer
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        if fetch_customer(&mut tx, id).await?.is_none() {
            return Err(DbError::not_found("Customer", id));
        }

        let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE customer_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if sales > 0 {
            warn!(id = %id, sales, "Refusing to delete customer with sales");
            return Err(DbError::referenced("Customer", id, "sales"));
        }

        sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::ForeignKeyViolation { .. } => DbError::referenced("Customer", id, "sales"),
                other => other,
            })?;

        tx.commit().await?;

        debug!(id = %id, "Customer deleted");
        Ok(())
    }

    /// Suggests the next free id: `PELANGGAN_<highest suffix + 1>`.
    pub async fn next_id(&self) -> DbResult<String> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM customers")
            .fetch_all(&self.pool)
            .await?;

        Ok(identifier::next_id(
            CUSTOMER_ID_PREFIX,
            ids.iter().map(String::as_str),
        ))
    }

    /// Number of registered customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Loads one customer on an existing connection (pool or transaction).
pub(crate) async fn fetch_customer(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(
        "SELECT id, name, domicile, gender FROM customers WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(customer)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{customer, product, test_db};
    use chrono::NaiveDate;
    use toko_core::sale::{LineItemInput, NewSale};
    use toko_core::{ErrorKind, Gender};

    #[tokio::test]
    async fn test_create_get_update() {
        let db = test_db().await;
        let repo = db.customers();

        repo.create(customer("PELANGGAN_1")).await.unwrap();

        let updated = repo
            .update(
                "PELANGGAN_1",
                CustomerPatch {
                    domicile: Some("BALI".into()),
                    gender: Some(Gender::Wanita),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.domicile, "BALI");
        assert_eq!(updated.gender, Gender::Wanita);
        assert_eq!(updated.name, "CUSTOMER PELANGGAN_1");

        let stored = repo.get("PELANGGAN_1").await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_duplicate_and_invalid() {
        let db = test_db().await;
        let repo = db.customers();
        repo.create(customer("PELANGGAN_1")).await.unwrap();

        let err = repo.create(customer("PELANGGAN_1")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);

        let mut long_domicile = customer("PELANGGAN_2");
        long_domicile.domicile = "X".repeat(21);
        let err = repo.create(long_domicile).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_list_order_and_next_id() {
        let db = test_db().await;
        let repo = db.customers();
        for id in ["PELANGGAN_10", "PELANGGAN_2", "PELANGGAN_1"] {
            repo.create(customer(id)).await.unwrap();
        }

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["PELANGGAN_1", "PELANGGAN_2", "PELANGGAN_10"]);
        assert_eq!(repo.next_id().await.unwrap(), "PELANGGAN_11");
    }

    #[tokio::test]
    async fn test_delete_customer_with_sales_conflicts() {
        let db = test_db().await;
        db.products().create(product("BRG_1", 15_000)).await.unwrap();
        db.customers().create(customer("PELANGGAN_1")).await.unwrap();
        db.customers().create(customer("PELANGGAN_2")).await.unwrap();
        db.sales()
            .create(NewSale {
                id: "NOTA_1".into(),
                date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
                customer_id: "PELANGGAN_1".into(),
                items: vec![LineItemInput::new("BRG_1", 1)],
            })
            .await
            .unwrap();

        let err = db.customers().delete("PELANGGAN_1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReferentialConflict);

        db.customers().delete("PELANGGAN_2").await.unwrap();
        assert_eq!(db.customers().count().await.unwrap(), 1);

        let err = db.customers().delete("PELANGGAN_9").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
