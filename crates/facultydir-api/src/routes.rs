use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::routing::get;

use crate::store::{FacultyRow, FacultyStore, SearchParams};

pub fn router(store: Arc<FacultyStore>) -> Router {
    Router::new()
        .route("/faculty", get(list_faculty))
        .route("/faculty/search", get(search_faculty))
        .with_state(store)
}

async fn list_faculty(State(store): State<Arc<FacultyStore>>) -> Json<Vec<FacultyRow>> {
    log::debug!("Listing {} faculty row(s)", store.len());
    Json(store.all().to_vec())
}

async fn search_faculty(
    State(store): State<Arc<FacultyStore>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<FacultyRow>> {
    let rows: Vec<FacultyRow> = store.search(&params).into_iter().cloned().collect();
    log::debug!("Search {:?} matched {} row(s)", params, rows.len());
    Json(rows)
}
