//! E-book and meal plan endpoints.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::content::{
    parse_page, Chapter, ChapterSummary, DayPlanView, ReaderPosition, Weekday, TOTAL_PAGES,
};
use crate::errors::AppError;
use crate::search::SearchHit;
use crate::AppState;

const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EbookView {
    pub chapters: Vec<ChapterSummary>,
    pub total_pages: u32,
    pub position: ReaderPosition,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterView {
    pub chapter: Chapter,
    pub total_pages: u32,
    pub position: ReaderPosition,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    /// Whether the requested page was inside the book
    pub moved: bool,
    pub total_pages: u32,
    pub position: ReaderPosition,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOption {
    pub day: Weekday,
    pub label: &'static str,
    pub short_label: &'static str,
    pub has_plan: bool,
}

/// GET /api/ebook - Table of contents and reader position.
pub async fn get_ebook(State(state): State<AppState>) -> ApiResult<EbookView> {
    let revision_id = state.store.revision().await;
    success(
        EbookView {
            chapters: state.content.ebook.table_of_contents(),
            total_pages: TOTAL_PAGES,
            position: *state.session.reader.read().await,
        },
        revision_id,
    )
}

/// GET /api/ebook/chapters/:id - Open a chapter at its first page.
pub async fn get_chapter(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<ChapterView> {
    let revision_id = state.store.revision().await;

    let chapter = state.content.ebook.chapter(id).cloned().ok_or_else(|| {
        AppError::NotFound(format!("Chapter {} not found", id)).with_revision(revision_id)
    })?;

    let mut reader = state.session.reader.write().await;
    reader.open_chapter(id);

    success(
        ChapterView {
            chapter,
            total_pages: TOTAL_PAGES,
            position: *reader,
        },
        revision_id,
    )
}

/// PUT /api/ebook/pages/:page - Turn to a page. Pages outside the book are ignored.
pub async fn turn_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> ApiResult<PageView> {
    let revision_id = state.store.revision().await;

    let mut reader = state.session.reader.write().await;
    let moved = reader.turn_to(parse_page(&page));

    success(
        PageView {
            moved,
            total_pages: TOTAL_PAGES,
            position: *reader,
        },
        revision_id,
    )
}

/// GET /api/ebook/search?q= - Chapters matching the query.
pub async fn search_ebook(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<SearchHit>> {
    let revision_id = state.store.revision().await;

    let hits = state
        .search
        .search(&query.q, SEARCH_LIMIT)
        .map_err(|e| e.with_revision(revision_id))?;

    success(hits, revision_id)
}

/// GET /api/meals - Days of the week.
pub async fn list_meal_days(State(state): State<AppState>) -> ApiResult<Vec<DayOption>> {
    let revision_id = state.store.revision().await;
    success(
        Weekday::ALL
            .iter()
            .map(|day| DayOption {
                day: *day,
                label: day.label(),
                short_label: day.short_label(),
                has_plan: state.content.meals.has_plan(*day),
            })
            .collect(),
        revision_id,
    )
}

/// GET /api/meals/:day - The day's meals, flagged for the user's diabetes type.
pub async fn get_meal_day(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> ApiResult<DayPlanView> {
    let committed = state.store.current().await;
    let diabetes_type = committed.document.user.as_ref().map(|u| u.diabetes_type);

    success(
        state.content.meals.day_view(&day, diabetes_type),
        committed.revision_id,
    )
}
