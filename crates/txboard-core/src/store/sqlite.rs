//! SQLite-backed record store
//!
//! Records live in one `transactions` table; `seq` keeps insertion order.
//! The listing filter is compiled into a parameterized `WHERE` clause.
//! Sale month and lowercased text are derived in Rust at insert time and
//! stored next to the record, so both backends share one matching rule.

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::TransactionStore;
use crate::error::{CoreError, CoreResult};
use crate::models::{TransactionPage, TransactionRecord};
use crate::query::{Page, TransactionFilter};

const COLUMNS: &str = "id, title, price, description, category, image, sold, date_of_sale";
const DERIVED_COLUMNS: &str = "sale_month, title_folded, description_folded, category_folded";
const FOLDED_COLUMNS: [&str; 3] = ["title_folded", "description_folded", "category_folded"];

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`; `:memory:` opens a private in-memory db
    pub fn open(path: &Path) -> CoreResult<Self> {
        if path.as_os_str() == ":memory:" {
            return Self::open_in_memory();
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::Store {
                message: format!("cannot create {}: {}", parent.display(), e),
            })?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> CoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> CoreResult<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run blocking database work off the async runtime
    async fn with_conn<F, T>(&self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&mut Connection) -> CoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| CoreError::Store {
                message: "sqlite connection lock poisoned".to_string(),
            })?;
            f(&mut guard)
        })
        .await
        .map_err(|e| CoreError::Store {
            message: format!("sqlite task failed: {}", e),
        })?
    }
}

/// Creates the `transactions` table if it does not already exist.
///
/// A table without the derived columns is dropped first; its rows are a
/// copy of the upstream dataset and come back on the next initialize.
fn init_schema(conn: &Connection) -> CoreResult<()> {
    let derived: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name = 'sale_month'",
        [],
        |row| row.get(0),
    )?;
    let existing: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info('transactions')",
        [],
        |row| row.get(0),
    )?;
    if existing > 0 && derived == 0 {
        log::warn!("Dropping transactions table with outdated schema");
        conn.execute_batch("DROP TABLE transactions;")?;
    }

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS transactions (
            seq          INTEGER PRIMARY KEY,
            id           INTEGER NOT NULL,
            title        TEXT NOT NULL,
            price        REAL NOT NULL,
            description  TEXT NOT NULL,
            category     TEXT NOT NULL,
            image        TEXT NOT NULL,
            sold         INTEGER NOT NULL,
            date_of_sale TEXT NOT NULL,
            sale_month   INTEGER,
            title_folded       TEXT NOT NULL,
            description_folded TEXT NOT NULL,
            category_folded    TEXT NOT NULL
        );",
    )?;
    Ok(())
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<TransactionRecord> {
    Ok(TransactionRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        price: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        sold: row.get(6)?,
        date_of_sale: row.get(7)?,
    })
}

/// Translate the filter into a `WHERE` clause and its positional parameters
fn where_clause(filter: &TransactionFilter) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(month) = filter.month {
        values.push(Value::Integer(i64::from(month.number())));
        clauses.push(format!("sale_month = ?{}", values.len()));
    }

    if let Some(search) = &filter.search {
        values.push(Value::Text(search.needle.clone()));
        let n = values.len();
        let mut any: Vec<String> = FOLDED_COLUMNS
            .iter()
            .map(|col| format!("instr({}, ?{}) > 0", col, n))
            .collect();
        if let Some(price) = search.price {
            values.push(Value::Real(price));
            any.push(format!("price = ?{}", values.len()));
        }
        clauses.push(format!("({})", any.join(" OR ")));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

#[async_trait]
impl TransactionStore for SqliteStore {
    async fn replace_all(&self, records: Vec<TransactionRecord>) -> CoreResult<usize> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM transactions", [])?;
            {
                let mut stmt = tx.prepare_cached(&format!(
                    "INSERT INTO transactions ({}, {}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                    COLUMNS, DERIVED_COLUMNS
                ))?;
                for r in &records {
                    stmt.execute(params![
                        r.id,
                        r.title,
                        r.price,
                        r.description,
                        r.category,
                        r.image,
                        r.sold,
                        r.date_of_sale,
                        r.sale_month().map(|m| m.number()),
                        r.title.to_lowercase(),
                        r.description.to_lowercase(),
                        r.category.to_lowercase()
                    ])?;
                }
            }
            tx.commit()?;
            log::debug!("SQLite store committed {} records", records.len());
            Ok(records.len())
        })
        .await
    }

    async fn list(&self, filter: &TransactionFilter, page: Page) -> CoreResult<TransactionPage> {
        let (clause, mut values) = where_clause(filter);
        self.with_conn(move |conn| {
            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM transactions{}", clause),
                params_from_iter(values.iter()),
                |row| row.get(0),
            )?;

            values.push(Value::Integer(i64::try_from(page.per_page).unwrap_or(i64::MAX)));
            let limit_idx = values.len();
            values.push(Value::Integer(i64::try_from(page.offset()).unwrap_or(i64::MAX)));
            let offset_idx = values.len();

            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM transactions{} ORDER BY seq LIMIT ?{} OFFSET ?{}",
                COLUMNS, clause, limit_idx, offset_idx
            ))?;
            let transactions = stmt
                .query_map(params_from_iter(values.iter()), row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(TransactionPage {
                transactions,
                total: total as usize,
            })
        })
        .await
    }

    async fn count(&self) -> CoreResult<usize> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
            Ok(n as usize)
        })
        .await
    }
}
