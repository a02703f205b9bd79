//! Route definitions for the SiteHub HTTP API.
//!
//! Phase-scoped routes are grouped by domain and nested under
//! `/api/projects/{project_id}/phases/{phase}`.

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::handlers;
use crate::state::AppState;

/// Build the API router with state applied.
pub fn build_router(state: AppState) -> Router {
    let phase_routes = Router::new()
        .merge(lifecycle_routes())
        .merge(requirement_routes())
        .merge(folder_routes())
        .merge(file_routes())
        .merge(note_routes())
        .merge(budget_routes());

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/events", get(handlers::events::event_stream))
        .route(
            "/projects/{project_id}/phases",
            get(handlers::phase::list_phases).post(handlers::phase::create_phase),
        )
        .nest("/projects/{project_id}/phases/{phase}", phase_routes);

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Phase view, delete, and state transitions
fn lifecycle_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::phase::get_view).delete(handlers::phase::delete_phase),
        )
        .route("/overview", get(handlers::phase::get_overview))
        .route("/lock", post(handlers::phase::lock_phase))
        .route("/unlock", post(handlers::phase::unlock_phase))
        .route("/close", post(handlers::phase::close_phase))
        .route("/reopen", post(handlers::phase::reopen_phase))
        .route("/start", post(handlers::phase::start_phase))
}

/// Requirement checklist CRUD, completion, and drag-and-drop
fn requirement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/requirements",
            get(handlers::requirement::get_tree).post(handlers::requirement::create_requirement),
        )
        .route(
            "/requirements/{id}",
            put(handlers::requirement::update_requirement)
                .delete(handlers::requirement::delete_requirement),
        )
        .route(
            "/requirements/{id}/completion",
            put(handlers::requirement::set_completion),
        )
        .route(
            "/requirements/{id}/move",
            put(handlers::requirement::move_requirement),
        )
}

/// Folder listing, custom folders, ordering, and sync
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route("/folders/sync", post(handlers::folder::sync_folders))
        .route("/folders/order", put(handlers::folder::reorder_folders))
        .route(
            "/folders/{id}",
            put(handlers::folder::rename_folder).delete(handlers::folder::delete_folder),
        )
}

/// Files
fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/files",
            get(handlers::file::list_files).post(handlers::file::add_file),
        )
        .route("/files/{id}", delete(handlers::file::delete_file))
        .route("/files/{id}/move", put(handlers::file::move_file))
}

/// Notes
fn note_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notes",
            get(handlers::note::list_notes).post(handlers::note::add_note),
        )
        .route("/notes/{id}", delete(handlers::note::delete_note))
}

/// Budget lines
fn budget_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/budget",
            get(handlers::budget::get_budget).post(handlers::budget::add_item),
        )
        .route(
            "/budget/{id}",
            put(handlers::budget::update_item).delete(handlers::budget::delete_item),
        )
}
