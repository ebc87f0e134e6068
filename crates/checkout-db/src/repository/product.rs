//! # Product Repository
//!
//! Catalog CRUD, search and batch import.
//!
//! ## Batch Import
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    import(rows, source)                                 │
//! │                                                                         │
//! │  row 1  ──► validate ──► INSERT ──► imported += 1                      │
//! │  row 2  ──► validate ✗ ─────────► errors.push({ row: 2, message })     │
//! │  row 3  ──► validate ──► INSERT ✗ (duplicate id) ──► errors.push(...)  │
//! │  row 4  ──► validate ──► INSERT ──► imported += 1                      │
//! │                                                                         │
//! │  A bad row never stops the batch. Rows are numbered from 1.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decoding CSV or Excel files into rows happens upstream; this module only
//! sees [`NewProduct`] values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use checkout_core::validation::{validate_product, validate_search_query};
use checkout_core::{ImportSource, MemoryCatalog, Product};

// =============================================================================
// Records
// =============================================================================

/// Input for insert, update and import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
}

impl NewProduct {
    /// Trimmed product, not yet validated.
    fn to_product(&self) -> Product {
        Product::new(
            self.id.trim(),
            self.name.trim(),
            self.price_cents,
            self.image.trim(),
            self.category.trim(),
        )
    }
}

impl From<Product> for NewProduct {
    fn from(product: Product) -> Self {
        NewProduct {
            id: product.id,
            name: product.name,
            price_cents: product.price_cents,
            image: product.image,
            category: product.category,
        }
    }
}

/// A stored catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub product: Product,
    pub import_source: ImportSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price_cents: i64,
    image: String,
    category: String,
    import_source: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for CatalogRecord {
    fn from(row: ProductRow) -> Self {
        let import_source = row.import_source.parse().unwrap_or_else(|e| {
            warn!(id = %row.id, "{}; treating as manual", e);
            ImportSource::Manual
        });

        CatalogRecord {
            product: Product::new(row.id, row.name, row.price_cents, row.image, row.category),
            import_source,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One rejected import row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowError {
    /// 1-based position in the batch.
    pub row: usize,
    pub message: String,
}

/// Outcome of a batch import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: usize,
    pub failed: usize,
    pub errors: Vec<ImportRowError>,
}

impl ImportReport {
    /// `true` when every row was imported.
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

const SELECT_COLUMNS: &str = "SELECT id, name, price_cents, image, category, import_source, \
     created_at, updated_at FROM products";

/// Escapes `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog rows.
///
/// ```rust,ignore
/// let repo = db.products();
/// repo.insert(&row, ImportSource::Manual).await?;
/// let catalog = repo.load_catalog().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Validates and inserts one product.
    ///
    /// ## Returns
    /// * `Ok(CatalogRecord)` - The stored row
    /// * `Err(DbError::Validation)` - A field broke a rule
    /// * `Err(DbError::UniqueViolation)` - The id already exists
    pub async fn insert(&self, new: &NewProduct, source: ImportSource) -> DbResult<CatalogRecord> {
        let product = new.to_product();
        validate_product(&product)?;

        debug!(id = %product.id, source = %source, "Inserting product");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, price_cents, image, category,
                import_source, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(&product.image)
        .bind(&product.category)
        .bind(source.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &product.id),
            other => other,
        })?;

        Ok(CatalogRecord {
            product,
            import_source: source,
            created_at: now,
            updated_at: now,
        })
    }

    /// Exact lookup by product id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CatalogRecord>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CatalogRecord::from))
    }

    /// Every row in insertion order.
    pub async fn list(&self) -> DbResult<Vec<CatalogRecord>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!("{} ORDER BY rowid", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CatalogRecord::from).collect())
    }

    /// Rows whose name or id contains `query`, case-insensitively, in
    /// insertion order. An empty query lists the first `limit` rows; an
    /// overlong one is a `Validation` error.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<CatalogRecord>> {
        let query = validate_search_query(query)?;

        debug!(query = %query, limit = %limit, "Searching products");

        // SQLite LIKE is case-insensitive for ASCII
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            r"{} WHERE name LIKE ?1 ESCAPE '\' OR id LIKE ?1 ESCAPE '\' ORDER BY rowid LIMIT ?2",
            SELECT_COLUMNS
        ))
        .bind(like_pattern(&query))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Search returned products");
        Ok(rows.into_iter().map(CatalogRecord::from).collect())
    }

    /// Replaces name, price, image and category of the row with `new.id`.
    /// The import source and creation time are kept.
    pub async fn update(&self, new: &NewProduct) -> DbResult<()> {
        let product = new.to_product();
        validate_product(&product)?;

        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                price_cents = ?3,
                image = ?4,
                category = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(&product.image)
        .bind(&product.category)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a row. Carts already holding the product keep their copy.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts each row independently, collecting per-row failures.
    pub async fn import(&self, rows: Vec<NewProduct>, source: ImportSource) -> ImportReport {
        let mut report = ImportReport::default();

        for (idx, row) in rows.iter().enumerate() {
            match self.insert(row, source).await {
                Ok(_) => report.imported += 1,
                Err(err) => {
                    let row_number = idx + 1;
                    warn!(row = row_number, id = %row.id, "Import row rejected: {}", err);
                    report.failed += 1;
                    report.errors.push(ImportRowError {
                        row: row_number,
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            source = %source,
            imported = report.imported,
            failed = report.failed,
            "Catalog import finished"
        );
        report
    }

    /// Snapshot of the whole catalog for a kiosk session.
    pub async fn load_catalog(&self) -> DbResult<MemoryCatalog> {
        let records = self.list().await?;
        info!(products = records.len(), "Catalog loaded");
        Ok(MemoryCatalog::from_products(
            records.into_iter().map(|r| r.product),
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use checkout_core::Catalog;

    async fn repo() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    fn row(id: &str, name: &str, price_cents: i64) -> NewProduct {
        NewProduct {
            id: id.to_string(),
            name: name.to_string(),
            price_cents,
            image: String::new(),
            category: "Test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;

        let stored = repo
            .insert(&row(" 0345678 ", "Fresh Milk 1L", 499), ImportSource::Manual)
            .await
            .unwrap();
        assert_eq!(stored.product.id, "0345678");

        let fetched = repo.get_by_id("0345678").await.unwrap().unwrap();
        assert_eq!(fetched.product.name, "Fresh Milk 1L");
        assert_eq!(fetched.product.price_cents, 499);
        assert_eq!(fetched.import_source, ImportSource::Manual);
        assert!(repo.get_by_id("345678").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id() {
        let repo = repo().await;
        repo.insert(&row("1", "A", 100), ImportSource::Manual).await.unwrap();

        let err = repo
            .insert(&row("1", "B", 200), ImportSource::Manual)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "1"));
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_rows() {
        let repo = repo().await;

        let err = repo
            .insert(&row("12-A", "Bad id", 100), ImportSource::Manual)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let err = repo
            .insert(&row("42", "Negative", -1), ImportSource::Manual)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_case_insensitive_name_or_id() {
        let repo = repo().await;
        repo.insert(&row("0345678", "Fresh Milk 1L", 499), ImportSource::Manual)
            .await
            .unwrap();
        repo.insert(&row("0234567", "Whole Wheat Bread", 349), ImportSource::Manual)
            .await
            .unwrap();

        let hits = repo.search("MILK", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].product.id, "0345678");

        let hits = repo.search("0234", 10).await.unwrap();
        assert_eq!(hits[0].product.name, "Whole Wheat Bread");

        assert_eq!(repo.search("", 10).await.unwrap().len(), 2);
        assert_eq!(repo.search("", 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let repo = repo().await;
        repo.insert(&row("1", "Tomatoes", 249), ImportSource::Manual)
            .await
            .unwrap();

        assert!(repo.search("%", 10).await.unwrap().is_empty());
        assert!(repo.search("T_matoes", 10).await.unwrap().is_empty());
        assert!(matches!(
            repo.search(&"x".repeat(101), 10).await,
            Err(DbError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update() {
        let repo = repo().await;
        repo.insert(&row("1", "Tomatoes", 249), ImportSource::Csv)
            .await
            .unwrap();

        repo.update(&row("1", "Vine Tomatoes", 299)).await.unwrap();

        let record = repo.get_by_id("1").await.unwrap().unwrap();
        assert_eq!(record.product.name, "Vine Tomatoes");
        assert_eq!(record.product.price_cents, 299);
        assert_eq!(record.import_source, ImportSource::Csv);
        assert!(record.updated_at >= record.created_at);

        let err = repo.update(&row("2", "Missing", 1)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        repo.insert(&row("1", "A", 100), ImportSource::Manual).await.unwrap();

        repo.delete("1").await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(matches!(
            repo.delete("1").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_import_reports_failed_rows_and_continues() {
        let repo = repo().await;

        let report = repo
            .import(
                vec![
                    row("1", "A", 100),
                    row("", "No id", 100),
                    row("1", "Dup", 100),
                    row("4", "D", 400),
                ],
                ImportSource::Excel,
            )
            .await;

        assert_eq!(report.imported, 2);
        assert_eq!(report.failed, 2);
        assert!(!report.success());
        let rows: Vec<usize> = report.errors.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![2, 3]);
        assert_eq!(report.errors[0].message, "Invalid record: id must not be empty");

        let record = repo.get_by_id("4").await.unwrap().unwrap();
        assert_eq!(record.import_source, ImportSource::Excel);
    }

    #[tokio::test]
    async fn test_import_all_good() {
        let repo = repo().await;
        let rows = checkout_core::catalog::seed_products()
            .into_iter()
            .map(NewProduct::from)
            .collect();

        let report = repo.import(rows, ImportSource::Api).await;

        assert!(report.success());
        assert_eq!(report.imported, 12);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["imported"], 12);
    }

    #[tokio::test]
    async fn test_load_catalog_keeps_insertion_order() {
        let repo = repo().await;
        for (id, name) in [("30", "C"), ("10", "A"), ("20", "B")] {
            repo.insert(&row(id, name, 100), ImportSource::Manual)
                .await
                .unwrap();
        }
        repo.update(&row("30", "C2", 150)).await.unwrap();

        let catalog = repo.load_catalog().await.unwrap();

        let ids: Vec<String> = catalog.products().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["30", "10", "20"]);
        assert_eq!(catalog.get("30").unwrap().name, "C2");
    }

    #[test]
    fn test_like_pattern_escapes() {
        assert_eq!(like_pattern("milk"), "%milk%");
        assert_eq!(like_pattern("50%_off"), r"%50\%\_off%");
    }
}
