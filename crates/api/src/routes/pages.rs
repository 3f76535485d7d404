//! Console page catalog and navigation routes.

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use domain::models::page::{Page, ALL_PAGES, DEFAULT_PAGE};
use domain::services::indicators::Indicators;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentSession;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageDescriptor {
    name: &'static str,
    icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    placeholder: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageCatalog {
    pages: Vec<PageDescriptor>,
    /// Page to restore on load: the operator's last-opened page when known.
    current: Page,
}

/// GET /api/v1/pages
pub async fn list_pages(
    State(state): State<AppState>,
    session: CurrentSession,
) -> impl IntoResponse {
    let current = state
        .preferences
        .last_page(session.account_id())
        .unwrap_or(DEFAULT_PAGE);

    Json(PageCatalog {
        pages: ALL_PAGES
            .into_iter()
            .map(|page| PageDescriptor {
                name: page.as_str(),
                icon: page.icon(),
                placeholder: page.placeholder_text(),
            })
            .collect(),
        current,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OpenPageResponse {
    page: Page,
    indicators: Indicators,
    #[serde(skip_serializing_if = "Option::is_none")]
    placeholder: Option<&'static str>,
}

/// POST /api/v1/pages/{page}/open
///
/// Marks the page active for this session, clears its badge, and remembers
/// it as the operator's last-opened page (best-effort).
pub async fn open_page(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(page): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let page = Page::from_str(&page).map_err(ApiError::Validation)?;

    let indicators = session.handle.open_page(page);
    state.preferences.remember(session.account_id(), page);

    Ok(Json(OpenPageResponse {
        page,
        indicators,
        placeholder: page.placeholder_text(),
    }))
}
