use bookinv_types::{Book, BookFields, BookId};
use tracing::debug;

use crate::{client::BookApi, error::Result};

/// Local view of the book list.
///
/// Local state changes only after the API confirms the operation, so a failed
/// call leaves the list as it was and records the error message.
#[derive(Debug, Default)]
pub struct BookCatalog {
    books: Vec<Book>,
    last_error: Option<String>,
}

impl BookCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn find(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == *id)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub async fn refresh(&mut self, api: &impl BookApi) -> Result<()> {
        let books = self.track(api.list_books().await)?;
        debug!("Catalog refreshed with {} books", books.len());
        self.books = books;
        Ok(())
    }

    pub async fn add(&mut self, api: &impl BookApi, fields: &BookFields) -> Result<Book> {
        let book = self.track(api.create_book(fields).await)?;
        self.books.insert(0, book.clone());
        Ok(book)
    }

    pub async fn replace(
        &mut self,
        api: &impl BookApi,
        id: &BookId,
        fields: &BookFields,
    ) -> Result<Book> {
        let book = self.track(api.update_book(id, fields).await)?;
        match self.books.iter_mut().find(|b| b.id == *id) {
            Some(existing) => *existing = book.clone(),
            None => self.books.insert(0, book.clone()),
        }
        Ok(book)
    }

    pub async fn remove(&mut self, api: &impl BookApi, id: &BookId) -> Result<()> {
        self.track(api.delete_book(id).await)?;
        self.books.retain(|b| b.id != *id);
        Ok(())
    }

    fn track<T>(&mut self, res: Result<T>) -> Result<T> {
        match res {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::Mutex;
    use time::{macros::date, OffsetDateTime};

    #[derive(Default)]
    struct FakeApi {
        books: Mutex<Vec<Book>>,
        fail: Mutex<Option<u16>>,
    }

    impl FakeApi {
        fn failing(&self, status: u16) {
            *self.fail.lock().unwrap() = Some(status);
        }

        fn check_failure(&self) -> Result<()> {
            match self.fail.lock().unwrap().take() {
                Some(404) => Err(Error::NotFound("Book not found".into())),
                Some(409) => Err(Error::Conflict("Duplicate email".into())),
                Some(status) => Err(Error::Server {
                    status,
                    message: "Boom".into(),
                }),
                None => Ok(()),
            }
        }
    }

    fn book_from(id: BookId, fields: &BookFields) -> Book {
        let now = OffsetDateTime::now_utc();
        let new = fields.clone().into_new_book().unwrap();
        Book {
            id,
            title: new.title,
            author_name: new.author_name,
            author_age: new.author_age,
            author_email: new.author_email,
            publisher: new.publisher,
            published_date: new.published_date,
            overview: new.overview,
            created_at: now,
            updated_at: now,
        }
    }

    impl BookApi for FakeApi {
        async fn list_books(&self) -> Result<Vec<Book>> {
            self.check_failure()?;
            Ok(self.books.lock().unwrap().clone())
        }

        async fn get_book(&self, id: &BookId) -> Result<Book> {
            self.check_failure()?;
            self.books
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.id == *id)
                .cloned()
                .ok_or_else(|| Error::NotFound("Book not found".into()))
        }

        async fn create_book(&self, fields: &BookFields) -> Result<Book> {
            self.check_failure()?;
            let book = book_from(BookId::new_random(), fields);
            self.books.lock().unwrap().insert(0, book.clone());
            Ok(book)
        }

        async fn update_book(&self, id: &BookId, fields: &BookFields) -> Result<Book> {
            self.check_failure()?;
            let mut books = self.books.lock().unwrap();
            let existing = books
                .iter_mut()
                .find(|b| b.id == *id)
                .ok_or_else(|| Error::NotFound("Book not found".into()))?;
            *existing = book_from(*id, fields);
            Ok(existing.clone())
        }

        async fn delete_book(&self, id: &BookId) -> Result<()> {
            self.check_failure()?;
            let mut books = self.books.lock().unwrap();
            let before = books.len();
            books.retain(|b| b.id != *id);
            if books.len() == before {
                return Err(Error::NotFound("Book not found".into()));
            }
            Ok(())
        }
    }

    fn fields(title: &str, email: &str) -> BookFields {
        BookFields {
            title: Some(title.into()),
            author_name: Some("Ursula K. Le Guin".into()),
            author_age: Some(39),
            author_email: Some(email.into()),
            publisher: Some("Ace Books".into()),
            published_date: Some(date!(1969 - 03 - 01).to_string()),
            overview: Some("A human envoy visits the planet Gethen.".into()),
        }
    }

    #[tokio::test]
    async fn test_add_and_refresh() {
        let api = FakeApi::default();
        let mut catalog = BookCatalog::new();

        let first = catalog
            .add(&api, &fields("The Left Hand of Darkness", "ursula@example.com"))
            .await
            .unwrap();
        let second = catalog
            .add(&api, &fields("The Dispossessed", "le.guin@example.com"))
            .await
            .unwrap();
        assert_eq!(catalog.books().len(), 2);
        assert_eq!(catalog.books()[0].id, second.id);
        assert!(catalog.find(&first.id).is_some());

        let mut fresh = BookCatalog::new();
        fresh.refresh(&api).await.unwrap();
        assert_eq!(fresh.books(), catalog.books());
        assert!(fresh.last_error().is_none());
    }

    #[tokio::test]
    async fn test_failed_remove_keeps_state() {
        let api = FakeApi::default();
        let mut catalog = BookCatalog::new();
        let book = catalog
            .add(&api, &fields("The Lathe of Heaven", "ursula@example.com"))
            .await
            .unwrap();

        api.failing(500);
        let res = catalog.remove(&api, &book.id).await;
        assert!(matches!(res, Err(Error::Server { status: 500, .. })));
        assert_eq!(catalog.books().len(), 1);
        assert!(catalog.last_error().unwrap().contains("Boom"));

        catalog.remove(&api, &book.id).await.unwrap();
        assert!(catalog.books().is_empty());
        assert!(catalog.last_error().is_none());
    }

    #[tokio::test]
    async fn test_failed_replace_keeps_state() {
        let api = FakeApi::default();
        let mut catalog = BookCatalog::new();
        let book = catalog
            .add(&api, &fields("Rocannon's World", "ursula@example.com"))
            .await
            .unwrap();

        api.failing(409);
        let res = catalog
            .replace(&api, &book.id, &fields("Planet of Exile", "other@example.com"))
            .await;
        assert!(matches!(res, Err(Error::Conflict(_))));
        assert_eq!(catalog.books()[0], book);

        let updated = catalog
            .replace(&api, &book.id, &fields("Planet of Exile", "ursula@example.com"))
            .await
            .unwrap();
        assert_eq!(catalog.books()[0], updated);
        assert_eq!(catalog.books()[0].title, "Planet of Exile");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_books() {
        let api = FakeApi::default();
        let mut catalog = BookCatalog::new();
        catalog
            .add(&api, &fields("The Word for World Is Forest", "ursula@example.com"))
            .await
            .unwrap();

        api.failing(503);
        assert!(catalog.refresh(&api).await.is_err());
        assert_eq!(catalog.books().len(), 1);
        assert!(catalog.last_error().is_some());
    }
}
