//! # Sale Repository
//!
//! Sales and sale lines. Every line variant has its own insert so that only
//! the columns belonging to that variant are filled.
//!
//! ## Sale-Line Columns
//! ```text
//! ┌──────────────────────────┬─────────────┬──────────────────────────────┐
//! │ Operation                │ Item type   │ Columns set                  │
//! ├──────────────────────────┼─────────────┼──────────────────────────────┤
//! │ add_product_to_sale      │ P           │ productType = 'P'            │
//! │ add_lease_to_sale        │ P           │ productType = 'L', dates     │
//! │ add_service_to_sale      │ S           │ numHours, servicerId         │
//! │ add_data_plan_to_sale    │ D           │ numGBs                       │
//! │ add_voice_plan_to_sale   │ V           │ phoneNum, numDays            │
//! └──────────────────────────┴─────────────┴──────────────────────────────┘
//! ```
//!
//! Lookups run item first, then sale, then servicer; the first key that
//! does not resolve is reported and nothing is written.

use chrono::NaiveDate;
use salesgraph_core::ItemKind;
use sqlx::SqlitePool;
use tracing::debug;

use super::{lookup_id, with_key};
use crate::error::{DbError, DbResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

/// Optional columns of one SaleItem row.
#[derive(Debug, Default)]
struct LineColumns {
    product_type: Option<&'static str>,
    start_date: Option<String>,
    end_date: Option<String>,
    num_hours: Option<f64>,
    servicer_id: Option<i64>,
    num_gbs: Option<f64>,
    phone_num: Option<String>,
    num_days: Option<i64>,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale header.
    ///
    /// ## Errors
    /// - `NotFound` for an unknown store, customer or salesperson
    /// - `UniqueViolation` when the sale code is taken
    pub async fn add_sale(
        &self,
        code: &str,
        store_code: &str,
        customer_uuid: &str,
        salesperson_uuid: &str,
        date: NaiveDate,
    ) -> DbResult<i64> {
        debug!(code, store = store_code, "Adding sale");

        let store_id = lookup_id(
            &self.pool,
            "SELECT storeId FROM Store WHERE storeCode = ?1",
            store_code,
            "Store",
        )
        .await?;
        let customer_id = self.person_id(customer_uuid).await?;
        let salesperson_id = self.person_id(salesperson_uuid).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO Sale (saleCode, storeId, customerId, salesPersonId, date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(code)
        .bind(store_id)
        .bind(customer_id)
        .bind(salesperson_id)
        .bind(date.format(DATE_FORMAT).to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| with_key(e, "saleCode", code))?;

        Ok(result.last_insert_rowid())
    }

    /// Adds an outright product purchase.
    pub async fn add_product_to_sale(&self, sale_code: &str, item_code: &str) -> DbResult<i64> {
        let columns = LineColumns {
            product_type: Some("P"),
            ..Default::default()
        };
        self.insert_line(sale_code, item_code, ItemKind::Product, columns).await
    }

    /// Adds a product lease over `[start, end]`.
    pub async fn add_lease_to_sale(
        &self,
        sale_code: &str,
        item_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<i64> {
        let columns = LineColumns {
            product_type: Some("L"),
            start_date: Some(start.format(DATE_FORMAT).to_string()),
            end_date: Some(end.format(DATE_FORMAT).to_string()),
            ..Default::default()
        };
        self.insert_line(sale_code, item_code, ItemKind::Product, columns).await
    }

    /// Adds billed service hours performed by an existing person.
    pub async fn add_service_to_sale(
        &self,
        sale_code: &str,
        item_code: &str,
        num_hours: f64,
        servicer_uuid: &str,
    ) -> DbResult<i64> {
        if !num_hours.is_finite() {
            return Err(DbError::invalid("numHours", "not a finite number"));
        }
        let item_id = self.item_id(item_code, ItemKind::Service).await?;
        let sale_id = self.sale_id(sale_code).await?;
        let servicer_id = self.person_id(servicer_uuid).await?;

        let columns = LineColumns {
            num_hours: Some(num_hours),
            servicer_id: Some(servicer_id),
            ..Default::default()
        };
        self.write_line(sale_id, item_id, columns).await
    }

    /// Adds a data plan line.
    pub async fn add_data_plan_to_sale(&self, sale_code: &str, item_code: &str, num_gbs: f64) -> DbResult<i64> {
        if !num_gbs.is_finite() {
            return Err(DbError::invalid("numGBs", "not a finite number"));
        }
        let columns = LineColumns {
            num_gbs: Some(num_gbs),
            ..Default::default()
        };
        self.insert_line(sale_code, item_code, ItemKind::Data, columns).await
    }

    /// Adds a voice plan line.
    pub async fn add_voice_plan_to_sale(
        &self,
        sale_code: &str,
        item_code: &str,
        phone: &str,
        num_days: u32,
    ) -> DbResult<i64> {
        let columns = LineColumns {
            phone_num: Some(phone.to_string()),
            num_days: Some(i64::from(num_days)),
            ..Default::default()
        };
        self.insert_line(sale_code, item_code, ItemKind::Voice, columns).await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn person_id(&self, uuid: &str) -> DbResult<i64> {
        lookup_id(&self.pool, "SELECT personId FROM Person WHERE uuid = ?1", uuid, "Person").await
    }

    async fn sale_id(&self, code: &str) -> DbResult<i64> {
        lookup_id(&self.pool, "SELECT saleId FROM Sale WHERE saleCode = ?1", code, "Sale").await
    }

    /// Resolves an item code and checks it has the type the line needs.
    async fn item_id(&self, code: &str, expected: ItemKind) -> DbResult<i64> {
        let row: Option<(i64, String)> = sqlx::query_as("SELECT itemId, type FROM Item WHERE code = ?1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        let (id, type_code) = row.ok_or_else(|| DbError::not_found("Item", code))?;
        if ItemKind::from_code(&type_code) != Some(expected) {
            return Err(DbError::invalid(
                "item",
                format!("{} is a {} item, expected {}", code, type_code, expected),
            ));
        }
        Ok(id)
    }

    async fn insert_line(
        &self,
        sale_code: &str,
        item_code: &str,
        kind: ItemKind,
        columns: LineColumns,
    ) -> DbResult<i64> {
        let item_id = self.item_id(item_code, kind).await?;
        let sale_id = self.sale_id(sale_code).await?;
        self.write_line(sale_id, item_id, columns).await
    }

    async fn write_line(&self, sale_id: i64, item_id: i64, columns: LineColumns) -> DbResult<i64> {
        debug!(sale_id, item_id, "Adding sale line");

        let result = sqlx::query(
            r#"
            INSERT INTO SaleItem (
                saleId, itemId, productType, startDate, endDate,
                numHours, servicerId, numGBs, phoneNum, numDays
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(sale_id)
        .bind(item_id)
        .bind(columns.product_type)
        .bind(columns.start_date)
        .bind(columns.end_date)
        .bind(columns.num_hours)
        .bind(columns.servicer_id)
        .bind(columns.num_gbs)
        .bind(columns.phone_num)
        .bind(columns.num_days)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
