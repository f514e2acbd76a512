pub mod book;

use crate::{error::ApiError, state::AppState};

/// Routes of the REST API, to be nested under the API base path.
pub fn api_router() -> axum::Router<AppState> {
    axum::Router::new()
        .nest("/books", book::router())
        .fallback(fallback)
}

pub async fn fallback() -> ApiError {
    ApiError::ResourceNotFound("Route".into())
}
