#![allow(async_fn_in_trait)]

use bookinv_types::{ApiResponse, Book, BookFields, BookId, Confirmation};
use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Book operations offered by the API.
pub trait BookApi {
    async fn list_books(&self) -> Result<Vec<Book>>;
    async fn get_book(&self, id: &BookId) -> Result<Book>;
    async fn create_book(&self, fields: &BookFields) -> Result<Book>;
    /// Full replace of all editable fields
    async fn update_book(&self, id: &BookId, fields: &BookFields) -> Result<Book>;
    async fn delete_book(&self, id: &BookId) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct BookClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BookClient {
    /// `base_url` is the API root, e.g. `http://localhost:5000/api/`
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        BookClient { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn books_url(&self, id: Option<&BookId>) -> Result<Url> {
        let url = match id {
            Some(id) => self.base_url.join(&format!("books/{id}"))?,
            None => self.base_url.join("books")?,
        };
        Ok(url)
    }

    pub async fn health(&self) -> Result<bool> {
        #[derive(Deserialize)]
        struct Health {
            ok: bool,
        }
        let response = self.http.get(self.base_url.join("health")?).send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }
        let health: Health = response.json().await?;
        Ok(health.ok)
    }
}

impl BookApi for BookClient {
    async fn list_books(&self) -> Result<Vec<Book>> {
        let response = self.http.get(self.books_url(None)?).send().await?;
        decode(response).await
    }

    async fn get_book(&self, id: &BookId) -> Result<Book> {
        let response = self.http.get(self.books_url(Some(id))?).send().await?;
        decode(response).await
    }

    async fn create_book(&self, fields: &BookFields) -> Result<Book> {
        fields.check().map_err(Error::Validation)?;
        let response = self
            .http
            .post(self.books_url(None)?)
            .json(fields)
            .send()
            .await?;
        decode(response).await
    }

    async fn update_book(&self, id: &BookId, fields: &BookFields) -> Result<Book> {
        fields.check().map_err(Error::Validation)?;
        let response = self
            .http
            .put(self.books_url(Some(id))?)
            .json(fields)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete_book(&self, id: &BookId) -> Result<()> {
        let response = self.http.delete(self.books_url(Some(id))?).send().await?;
        let _: Confirmation = decode(response).await?;
        Ok(())
    }
}

/// Unwraps response envelope, turning failures into [`Error`] by status code.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let envelope: ApiResponse<T> = response.json().await?;
    if status.is_success() && envelope.success {
        return envelope.data.ok_or_else(|| Error::Server {
            status: status.as_u16(),
            message: "Response without data".to_string(),
        });
    }

    let message = envelope
        .error
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
    debug!("API call failed with {status}: {message}");
    let error = match status {
        StatusCode::BAD_REQUEST => match envelope.errors {
            Some(errors) => Error::Validation(errors),
            None => Error::BadRequest(message),
        },
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::CONFLICT => Error::Conflict(message),
        _ => Error::Server {
            status: status.as_u16(),
            message,
        },
    };
    Err(error)
}
