use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use std::ops::{Deref, DerefMut};

use crate::error::ApiError;

/// JSON request body whose rejection is reported in the API envelope.
///
/// Only the shape of the body is checked here, field rules are applied by the repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<T>(pub T);

impl<T> Deref for Payload<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Payload<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> Payload<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Payload(value))
    }
}
