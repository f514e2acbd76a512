use axum::{
    extract::{FromRequestParts, Path},
    response::IntoResponse,
    routing::get,
    Json, RequestPartsExt as _,
};
use bookinv_dal::book::{parse_id, BookRepository};
use bookinv_types::{ApiResponse, BookFields, BookId, Confirmation};
use http::{request::Parts, StatusCode};
use std::future::Future;

use crate::{
    error::{ApiError, ApiResult},
    payload::Payload,
    state::AppState,
};

crate::repository_from_request!(BookRepository);

/// Book id taken from the URL path; a malformed id is reported as not found.
#[derive(Debug, Clone, Copy)]
pub struct BookPath(pub BookId);

impl<S> FromRequestParts<S> for BookPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let Path(id) = parts.extract::<Path<String>>().await?;
            let id = parse_id(&id)?;
            Ok(BookPath(id))
        }
    }
}

pub async fn list(repository: BookRepository) -> ApiResult<impl IntoResponse> {
    let books = repository.list().await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(books))))
}

pub async fn get_book(
    BookPath(id): BookPath,
    repository: BookRepository,
) -> ApiResult<impl IntoResponse> {
    let record = repository.get(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(record))))
}

pub async fn create(
    repository: BookRepository,
    Payload(payload): Payload<BookFields>,
) -> ApiResult<impl IntoResponse> {
    let record = repository.create(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))))
}

pub async fn update(
    BookPath(id): BookPath,
    repository: BookRepository,
    Payload(payload): Payload<BookFields>,
) -> ApiResult<impl IntoResponse> {
    let record = repository.update(&id, payload).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(record))))
}

pub async fn delete(
    BookPath(id): BookPath,
    repository: BookRepository,
) -> ApiResult<impl IntoResponse> {
    repository.delete(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(Confirmation {}))))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_book).put(update).delete(delete))
}
