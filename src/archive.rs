//! Year-sharded table routing.
//!
//! Rows older than the current calendar year are moved out of the live
//! tables into schema-identical `{table}_{year}` archive tables. The
//! registry resolves (kind, year) to the table that holds that year's
//! rows, and `archive_year` performs the copy-and-delete migration in a
//! single transaction.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::Datelike;
use serde::Serialize;

use crate::commands::utils::kst_today;
use crate::db::DbPool;
use crate::error::{DomaeError, DomaeResult};

/// Entity families that participate in year sharding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    SalesRecords,
    Orders,
    ClientVisits,
    Purchases,
    FranchiseOrders,
}

impl ArchiveKind {
    pub const ALL: [ArchiveKind; 5] = [
        ArchiveKind::SalesRecords,
        ArchiveKind::Orders,
        ArchiveKind::ClientVisits,
        ArchiveKind::Purchases,
        ArchiveKind::FranchiseOrders,
    ];

    pub fn live_table(&self) -> &'static str {
        match self {
            ArchiveKind::SalesRecords => "sales_records",
            ArchiveKind::Orders => "orders",
            ArchiveKind::ClientVisits => "client_visits",
            ArchiveKind::Purchases => "purchases",
            ArchiveKind::FranchiseOrders => "franchise_orders",
        }
    }

    /// Column the year predicate is evaluated against.
    pub fn year_column(&self) -> &'static str {
        match self {
            ArchiveKind::SalesRecords => "sale_date",
            ArchiveKind::Orders => "order_date",
            ArchiveKind::ClientVisits => "visit_datetime",
            ArchiveKind::Purchases => "purchase_date",
            ArchiveKind::FranchiseOrders => "order_date",
        }
    }

    /// Item table migrated together with its parent, if any.
    pub fn companion_table(&self) -> Option<&'static str> {
        match self {
            ArchiveKind::Orders => Some("order_items"),
            ArchiveKind::FranchiseOrders => Some("franchise_order_items"),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ArchiveKind::SalesRecords => "sales",
            ArchiveKind::Orders => "orders",
            ArchiveKind::ClientVisits => "visits",
            ArchiveKind::Purchases => "purchases",
            ArchiveKind::FranchiseOrders => "franchise",
        }
    }

    pub fn from_slug(s: &str) -> Option<ArchiveKind> {
        Self::ALL.iter().copied().find(|k| k.slug() == s)
    }
}

/// Table names are derived from the enum only, never from request input.
pub fn archive_table_name(live_table: &str, year: i32) -> String {
    format!("{}_{}", live_table, year)
}

pub fn current_year() -> i32 {
    kst_today().year()
}

fn validate_past_year(year: i32, curr: i32) -> DomaeResult<()> {
    if year >= curr {
        return Err(DomaeError::Validation(format!(
            "{}년은 아카이브할 수 없습니다. 지난 연도만 가능합니다.",
            year
        )));
    }
    if year < 2000 {
        return Err(DomaeError::Validation(format!("잘못된 연도입니다: {}", year)));
    }
    Ok(())
}

/// Resolved handle: the tables holding a given year's rows.
#[derive(Debug, Serialize)]
pub struct YearTables {
    pub year: i32,
    pub table: String,
    pub companion: Option<String>,
    pub is_live: bool,
}

const MAX_CACHED: usize = 64;

/// Bounded, invalidatable cache of verified archive tables.
///
/// Live-year lookups are never cached so the calendar rollover needs no
/// invalidation. Past-year entries are inserted after the archive table
/// has been created (or found) and evicted oldest-first past MAX_CACHED.
pub struct ArchiveRegistry {
    inner: Mutex<RegistryInner>,
}

struct RegistryInner {
    entries: HashMap<(ArchiveKind, i32), Arc<YearTables>>,
    order: VecDeque<(ArchiveKind, i32)>,
}

impl Default for ArchiveRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Resolve (kind, year) to the table holding that year's rows.
    ///
    /// The current year maps to the live table. A past year maps to the
    /// archive table, created on first use with the live table's layout.
    pub async fn resolve(
        &self,
        pool: &DbPool,
        kind: ArchiveKind,
        year: i32,
    ) -> DomaeResult<Arc<YearTables>> {
        let curr = current_year();
        if year == curr {
            return Ok(Arc::new(YearTables {
                year,
                table: kind.live_table().to_string(),
                companion: kind.companion_table().map(str::to_string),
                is_live: true,
            }));
        }
        validate_past_year(year, curr)?;

        if let Some(hit) = self.inner.lock().unwrap().entries.get(&(kind, year)) {
            return Ok(hit.clone());
        }

        ensure_archive_tables(pool, kind, year).await?;

        let handle = Arc::new(YearTables {
            year,
            table: archive_table_name(kind.live_table(), year),
            companion: kind
                .companion_table()
                .map(|t| archive_table_name(t, year)),
            is_live: false,
        });

        let mut inner = self.inner.lock().unwrap();
        if inner.entries.insert((kind, year), handle.clone()).is_none() {
            inner.order.push_back((kind, year));
            while inner.order.len() > MAX_CACHED {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.entries.remove(&oldest);
                }
            }
        }
        Ok(handle)
    }

    pub fn invalidate(&self, kind: ArchiveKind, year: i32) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.remove(&(kind, year));
        inner.order.retain(|k| *k != (kind, year));
    }

    pub fn invalidate_all(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.clear();
        inner.order.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }
}

pub async fn table_exists(pool: &DbPool, table: &str) -> DomaeResult<bool> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = $1
        )",
    )
    .bind(table)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// Create the archive table(s) for (kind, year) with the live layout.
/// LIKE copies columns, defaults and indexes but not foreign keys.
async fn ensure_archive_tables(pool: &DbPool, kind: ArchiveKind, year: i32) -> DomaeResult<()> {
    let live = kind.live_table();
    let arch = archive_table_name(live, year);
    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {} (LIKE {} INCLUDING ALL)",
        arch, live
    ))
    .execute(pool)
    .await?;

    if let Some(items) = kind.companion_table() {
        let items_arch = archive_table_name(items, year);
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (LIKE {} INCLUDING ALL)",
            items_arch, items
        ))
        .execute(pool)
        .await?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ArchiveReport {
    pub kind: String,
    pub year: i32,
    pub table: String,
    pub copied: u64,
    pub deleted: u64,
    pub items_copied: u64,
    pub skipped: bool,
}

/// Move one past year's rows from the live table(s) into the archive.
///
/// No-op when the archive table already exists. Otherwise create, copy
/// and delete run in one transaction; a copied/deleted count mismatch
/// aborts instead of committing a half-migration.
pub async fn archive_year(
    pool: &DbPool,
    registry: &ArchiveRegistry,
    kind: ArchiveKind,
    year: i32,
) -> DomaeResult<ArchiveReport> {
    validate_past_year(year, current_year())?;

    let live = kind.live_table();
    let arch = archive_table_name(live, year);

    if table_exists(pool, &arch).await? {
        tracing::info!("archive table {} already exists, skipping", arch);
        return Ok(ArchiveReport {
            kind: kind.slug().to_string(),
            year,
            table: arch,
            copied: 0,
            deleted: 0,
            items_copied: 0,
            skipped: true,
        });
    }

    let col = kind.year_column();
    let mut tx = pool.begin().await?;

    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {} (LIKE {} INCLUDING ALL)",
        arch, live
    ))
    .execute(&mut *tx)
    .await?;

    let mut items_copied = 0u64;
    if let Some(items) = kind.companion_table() {
        let items_arch = archive_table_name(items, year);
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (LIKE {} INCLUDING ALL)",
            items_arch, items
        ))
        .execute(&mut *tx)
        .await?;

        // Items go first, while the parent rows are still in the live table.
        items_copied = sqlx::query(&format!(
            "INSERT INTO {items_arch}
             SELECT i.* FROM {items} i JOIN {live} p ON i.order_id = p.id
             WHERE EXTRACT(YEAR FROM p.{col}) = $1",
        ))
        .bind(year)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    let copied = sqlx::query(&format!(
        "INSERT INTO {arch} SELECT * FROM {live} WHERE EXTRACT(YEAR FROM {col}) = $1",
    ))
    .bind(year)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if let Some(items) = kind.companion_table() {
        let items_deleted = sqlx::query(&format!(
            "DELETE FROM {items} i USING {live} p
             WHERE i.order_id = p.id AND EXTRACT(YEAR FROM p.{col}) = $1",
        ))
        .bind(year)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if items_deleted != items_copied {
            return Err(DomaeError::Internal(format!(
                "{}년 {} 품목 이관 건수 불일치: 복사 {} / 삭제 {}",
                year, items, items_copied, items_deleted
            )));
        }
    }

    let deleted = sqlx::query(&format!(
        "DELETE FROM {live} WHERE EXTRACT(YEAR FROM {col}) = $1",
    ))
    .bind(year)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if deleted != copied {
        // Dropping the transaction rolls everything back.
        return Err(DomaeError::Internal(format!(
            "{}년 {} 이관 건수 불일치: 복사 {} / 삭제 {}",
            year, live, copied, deleted
        )));
    }

    tx.commit().await?;
    registry.invalidate(kind, year);

    tracing::info!(
        "archived {} rows ({} item rows) from {} into {}",
        copied,
        items_copied,
        live,
        arch
    );

    Ok(ArchiveReport {
        kind: kind.slug().to_string(),
        year,
        table: arch,
        copied,
        deleted,
        items_copied,
        skipped: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_table_names_are_year_suffixed() {
        assert_eq!(
            archive_table_name(ArchiveKind::SalesRecords.live_table(), 2023),
            "sales_records_2023"
        );
        assert_eq!(
            archive_table_name(ArchiveKind::Orders.live_table(), 2021),
            "orders_2021"
        );
        assert_eq!(archive_table_name("order_items", 2021), "order_items_2021");
    }

    #[test]
    fn slug_round_trip() {
        for kind in ArchiveKind::ALL {
            assert_eq!(ArchiveKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(ArchiveKind::from_slug("unknown"), None);
    }

    #[test]
    fn only_past_years_are_archivable() {
        assert!(validate_past_year(2020, 2025).is_ok());
        assert!(validate_past_year(2025, 2025).is_err());
        assert!(validate_past_year(2026, 2025).is_err());
        assert!(validate_past_year(1999, 2025).is_err());
    }

    #[test]
    fn companions_only_where_items_exist() {
        assert_eq!(ArchiveKind::Orders.companion_table(), Some("order_items"));
        assert_eq!(
            ArchiveKind::FranchiseOrders.companion_table(),
            Some("franchise_order_items")
        );
        assert_eq!(ArchiveKind::SalesRecords.companion_table(), None);
        assert_eq!(ArchiveKind::Purchases.companion_table(), None);
        assert_eq!(ArchiveKind::ClientVisits.companion_table(), None);
    }
}
