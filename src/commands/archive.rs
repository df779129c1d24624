use crate::archive::{self, ArchiveKind};
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

fn parse_kind(slug: &str) -> DomaeResult<ArchiveKind> {
    ArchiveKind::from_slug(slug)
        .ok_or_else(|| DomaeError::Validation(format!("알 수 없는 아카이브 종류: {}", slug)))
}

/// Move one past year of an entity family into its archive table.
pub async fn run_archive(
    State(state): State<AppState>,
    Path((kind, year)): Path<(String, i32)>,
) -> DomaeResult<Json<archive::ArchiveReport>> {
    let kind = parse_kind(&kind)?;
    let report = archive::archive_year(&state.pool, &state.archive, kind, year).await?;
    Ok(Json(report))
}

#[derive(Serialize)]
pub struct ArchiveStatus {
    pub kind: String,
    pub live_table: String,
    pub archived_years: Vec<i32>,
}

/// Which archive tables exist, per entity family.
pub async fn archive_status(
    State(state): State<AppState>,
) -> DomaeResult<Json<Vec<ArchiveStatus>>> {
    let mut statuses = Vec::with_capacity(ArchiveKind::ALL.len());
    for kind in ArchiveKind::ALL {
        let prefix = format!("{}_", kind.live_table());
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT table_name FROM information_schema.tables
             WHERE table_schema = 'public' AND table_name LIKE $1
             ORDER BY table_name",
        )
        .bind(format!("{}%", prefix))
        .fetch_all(&state.pool)
        .await?;

        let mut years: Vec<i32> = rows
            .iter()
            .filter_map(|(name,)| name.strip_prefix(&prefix)?.parse().ok())
            .collect();
        years.sort_unstable();

        statuses.push(ArchiveStatus {
            kind: kind.slug().to_string(),
            live_table: kind.live_table().to_string(),
            archived_years: years,
        });
    }
    Ok(Json(statuses))
}

/// Drop every cached year-table handle; the next resolve re-verifies.
pub async fn invalidate_registry(State(state): State<AppState>) -> DomaeResult<Json<Value>> {
    let before = state.archive.cached_len();
    state.archive.invalidate_all();
    Ok(Json(json!({
        "message": "아카이브 캐시를 초기화했습니다.",
        "invalidated": before,
    })))
}
