#[cfg(test)]
mod tests {
    use crate::archive::{self, ArchiveKind};
    use crate::commands;
    use crate::db::{self, DbPool};
    use crate::state::AppState;
    use axum::extract::{Path, State};
    use axum::Json;
    use std::sync::Arc;

    async fn setup_test_db() -> DbPool {
        dotenvy::dotenv().ok();
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = db::init_pool(&database_url)
            .await
            .expect("Failed to create pool");
        db::init_database(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    async fn table_columns(pool: &DbPool, table: &str) -> Vec<String> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT column_name FROM information_schema.columns
             WHERE table_schema = 'public' AND table_name = $1
             ORDER BY column_name",
        )
        .bind(table)
        .fetch_all(pool)
        .await
        .unwrap();
        rows.into_iter().map(|r| r.0).collect()
    }

    #[tokio::test]
    async fn test_create_and_delete_sales_record_handler() {
        let pool = setup_test_db().await;
        let state = AppState::new(pool.clone());

        let input = commands::sales::SalesRecordInput {
            employee_id: None,
            client_id: 901,
            product_id: 902,
            quantity: 10,
            unit_price: 1000,
            return_amount: 0,
            subsidy_amount: 0,
            total_amount: 10000,
            sale_date: "2024-11-01".to_string(),
        };

        let result = commands::sales::create_sales_record(State(state.clone()), Json(input)).await;
        assert!(result.is_ok(), "create failed: {:?}", result.err());
        let record = result.unwrap().0;
        assert_eq!(record.quantity, 10);
        assert_eq!(record.total_amount, 10000);

        let delete_res =
            commands::sales::delete_sales_record(State(state.clone()), Path(record.id)).await;
        assert!(delete_res.is_ok(), "delete failed: {:?}", delete_res.err());

        let check: Option<(i64,)> = sqlx::query_as("SELECT id FROM sales_records WHERE id = $1")
            .bind(record.id)
            .fetch_optional(&pool)
            .await
            .unwrap();
        assert!(check.is_none(), "Sales record still exists after deletion");
    }

    #[tokio::test]
    async fn test_resolver_routes_current_and_past_years() {
        let pool = setup_test_db().await;
        let state = AppState::new(pool.clone());
        let curr = archive::current_year();

        // Current year resolves to the live table, uncached.
        let live = state
            .archive
            .resolve(&pool, ArchiveKind::SalesRecords, curr)
            .await
            .unwrap();
        assert!(live.is_live);
        assert_eq!(live.table, "sales_records");

        // Past year resolves to the year-suffixed table; clean slate first.
        let _ = sqlx::query("DROP TABLE IF EXISTS sales_records_2007")
            .execute(&pool)
            .await;
        state.archive.invalidate(ArchiveKind::SalesRecords, 2007);

        let first = state
            .archive
            .resolve(&pool, ArchiveKind::SalesRecords, 2007)
            .await
            .unwrap();
        assert!(!first.is_live);
        assert_eq!(first.table, "sales_records_2007");

        // Repeated lookups return the same cached handle.
        let second = state
            .archive
            .resolve(&pool, ArchiveKind::SalesRecords, 2007)
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // The reflected archive table has the live table's columns.
        let live_cols = table_columns(&pool, "sales_records").await;
        let arch_cols = table_columns(&pool, "sales_records_2007").await;
        assert_eq!(live_cols, arch_cols);

        let _ = sqlx::query("DROP TABLE IF EXISTS sales_records_2007")
            .execute(&pool)
            .await;
        state.archive.invalidate(ArchiveKind::SalesRecords, 2007);
    }

    #[tokio::test]
    async fn test_archive_migration_conserves_rows() {
        let pool = setup_test_db().await;
        let state = AppState::new(pool.clone());
        let curr = archive::current_year();

        let _ = sqlx::query("DROP TABLE IF EXISTS sales_records_2009")
            .execute(&pool)
            .await;
        state.archive.invalidate(ArchiveKind::SalesRecords, 2009);
        let _ = sqlx::query(
            "DELETE FROM sales_records WHERE EXTRACT(YEAR FROM sale_date) = 2009",
        )
        .execute(&pool)
        .await;

        for day in 1..=3 {
            sqlx::query(
                "INSERT INTO sales_records (client_id, product_id, quantity, unit_price, total_amount, sale_date)
                 VALUES (910, 911, 1, 500, 500, make_date(2009, 6, $1))",
            )
            .bind(day)
            .execute(&pool)
            .await
            .unwrap();
        }
        let current_id: i64 = sqlx::query_scalar(
            "INSERT INTO sales_records (client_id, product_id, quantity, unit_price, total_amount, sale_date)
             VALUES (910, 911, 1, 500, 500, make_date($1, 6, 1)) RETURNING id",
        )
        .bind(curr)
        .fetch_one(&pool)
        .await
        .unwrap();

        let report = archive::archive_year(&pool, &state.archive, ArchiveKind::SalesRecords, 2009)
            .await
            .expect("archive run failed");
        assert!(!report.skipped);
        assert_eq!(report.copied, 3);
        assert_eq!(report.deleted, 3);

        let live_2009: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sales_records WHERE EXTRACT(YEAR FROM sale_date) = 2009",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(live_2009, 0, "2009 rows remain in the live table");

        let archived: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_records_2009")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(archived, 3, "archive row count mismatch");

        // The current year's row is untouched.
        let current_exists: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM sales_records WHERE id = $1")
                .bind(current_id)
                .fetch_optional(&pool)
                .await
                .unwrap();
        assert!(current_exists.is_some());

        // Second run short-circuits on the existing archive table.
        let rerun = archive::archive_year(&pool, &state.archive, ArchiveKind::SalesRecords, 2009)
            .await
            .unwrap();
        assert!(rerun.skipped);
        assert_eq!(rerun.copied, 0);

        let _ = sqlx::query("DROP TABLE IF EXISTS sales_records_2009")
            .execute(&pool)
            .await;
        state.archive.invalidate(ArchiveKind::SalesRecords, 2009);
        let _ = sqlx::query("DELETE FROM sales_records WHERE id = $1")
            .bind(current_id)
            .execute(&pool)
            .await;
    }

    #[tokio::test]
    async fn test_archive_migration_moves_order_items_with_orders() {
        let pool = setup_test_db().await;
        let state = AppState::new(pool.clone());

        let _ = sqlx::query("DROP TABLE IF EXISTS order_items_2008")
            .execute(&pool)
            .await;
        let _ = sqlx::query("DROP TABLE IF EXISTS orders_2008")
            .execute(&pool)
            .await;
        state.archive.invalidate(ArchiveKind::Orders, 2008);

        let client_id: i32 = sqlx::query_scalar(
            "INSERT INTO clients (client_name) VALUES ('아카이브 테스트 거래처') RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        let emp_id: i32 = sqlx::query_scalar(
            "INSERT INTO employees (name, password_hash) VALUES ('아카이브 테스트 사원', 'x') RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        let order_id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (client_id, employee_id, order_date, total_amount)
             VALUES ($1, $2, '2008-04-10 09:00:00', 3000) RETURNING id",
        )
        .bind(client_id)
        .bind(emp_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        for _ in 0..2 {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price, line_total)
                 VALUES ($1, 920, 1, 1500, 1500)",
            )
            .bind(order_id)
            .execute(&pool)
            .await
            .unwrap();
        }

        let report = archive::archive_year(&pool, &state.archive, ArchiveKind::Orders, 2008)
            .await
            .expect("order archive failed");
        assert!(!report.skipped);
        assert_eq!(report.copied, 1);
        assert_eq!(report.items_copied, 2);

        let live_items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = $1")
                .bind(order_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(live_items, 0, "order items remain in the live table");

        let archived_items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_items_2008 WHERE order_id = $1")
                .bind(order_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(archived_items, 2);

        let _ = sqlx::query("DROP TABLE IF EXISTS order_items_2008")
            .execute(&pool)
            .await;
        let _ = sqlx::query("DROP TABLE IF EXISTS orders_2008")
            .execute(&pool)
            .await;
        state.archive.invalidate(ArchiveKind::Orders, 2008);
        let _ = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(emp_id)
            .execute(&pool)
            .await;
        let _ = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(client_id)
            .execute(&pool)
            .await;
    }

    #[tokio::test]
    async fn test_archive_rejects_current_and_future_years() {
        let pool = setup_test_db().await;
        let state = AppState::new(pool.clone());
        let curr = archive::current_year();

        for year in [curr, curr + 1] {
            let result =
                archive::archive_year(&pool, &state.archive, ArchiveKind::Purchases, year).await;
            assert!(result.is_err(), "year {} should be rejected", year);
        }
    }

    #[tokio::test]
    async fn test_employee_inventory_upsert() {
        let pool = setup_test_db().await;
        let state = AppState::new(pool.clone());

        let emp_id: i32 = sqlx::query_scalar(
            "INSERT INTO employees (name, password_hash) VALUES ('재고 테스트 사원', 'x') RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        let brand_id: i32 =
            sqlx::query_scalar("INSERT INTO brands (brand_name) VALUES ('재고 테스트') RETURNING id")
                .fetch_one(&pool)
                .await
                .unwrap();
        let product_id: i32 = sqlx::query_scalar(
            "INSERT INTO products (brand_id, product_name) VALUES ($1, '재고 테스트 상품') RETURNING id",
        )
        .bind(brand_id)
        .fetch_one(&pool)
        .await
        .unwrap();

        let input = commands::inventory::InventoryUpdateInput {
            employee_id: emp_id,
            items: vec![commands::inventory::InventoryItemInput {
                product_id,
                quantity: 7,
            }],
        };
        commands::inventory::update_employee_inventory(State(state.clone()), Json(input))
            .await
            .expect("initial upsert failed");

        // Same product again replaces the quantity instead of duplicating.
        let input = commands::inventory::InventoryUpdateInput {
            employee_id: emp_id,
            items: vec![commands::inventory::InventoryItemInput {
                product_id,
                quantity: 4,
            }],
        };
        commands::inventory::update_employee_inventory(State(state.clone()), Json(input))
            .await
            .expect("second upsert failed");

        let rows: Vec<(i32,)> = sqlx::query_as(
            "SELECT quantity FROM employee_inventory WHERE employee_id = $1 AND product_id = $2",
        )
        .bind(emp_id)
        .bind(product_id)
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 4);

        let _ = sqlx::query("DELETE FROM employee_inventory WHERE employee_id = $1")
            .bind(emp_id)
            .execute(&pool)
            .await;
        let _ = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&pool)
            .await;
        let _ = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(brand_id)
            .execute(&pool)
            .await;
        let _ = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(emp_id)
            .execute(&pool)
            .await;
    }
}
