use bookinv_types::{Book, BookFields, BookId, NewBook};
use futures::TryStreamExt as _;
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::{error::Result, ChosenDB, Error, Pool};

const SELECT_BOOK: &str = "SELECT id, title, author_name, author_age, author_email, publisher, published_date, overview, created_at, updated_at FROM book";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BookRow {
    id: String,
    title: String,
    author_name: String,
    author_age: i64,
    author_email: String,
    publisher: String,
    published_date: Date,
    overview: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<BookRow> for Book {
    type Error = Error;

    fn try_from(value: BookRow) -> Result<Self> {
        let id = value.id.parse::<BookId>().map_err(Error::storage)?;
        Ok(Book {
            id,
            title: value.title,
            author_name: value.author_name,
            author_age: value.author_age,
            author_email: value.author_email,
            publisher: value.publisher,
            published_date: value.published_date,
            overview: value.overview,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

/// Parses identifier coming from outside; anything malformed cannot exist, so it is not found.
pub fn parse_id(id: &str) -> Result<BookId> {
    id.parse::<BookId>().map_err(|e| {
        debug!("Malformed book id {id}: {e}");
        Error::RecordNotFound(format!("Book {id}"))
    })
}

#[derive(Clone)]
pub struct BookRepository {
    pool: Pool,
}

impl BookRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// All books, newest first
    pub async fn list(&self) -> Result<Vec<Book>> {
        let query = format!("{SELECT_BOOK} ORDER BY created_at DESC, rowid DESC");
        let rows = sqlx::query_as::<_, BookRow>(&query)
            .fetch(&self.pool)
            .try_collect::<Vec<_>>()
            .await?;
        rows.into_iter().map(Book::try_from).collect()
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM book")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn get(&self, id: &BookId) -> Result<Book> {
        get(id, &self.pool).await
    }

    pub async fn create(&self, payload: BookFields) -> Result<Book> {
        let book = payload.into_new_book()?;
        let id = BookId::new_random();
        let now = OffsetDateTime::now_utc();

        let mut transaction = self.pool.begin().await?;
        bind_fields(
            sqlx::query(
                "INSERT INTO book (title, author_name, author_age, author_email, publisher, published_date, overview, updated_at, created_at, id) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            ),
            &book,
            now,
        )
        .bind(now)
        .bind(id.to_string())
        .execute(&mut *transaction)
        .await?;

        let record = get(&id, &mut *transaction).await?;
        transaction.commit().await?;
        debug!("Created book {id}");
        Ok(record)
    }

    /// Replaces all editable fields of an existing book.
    pub async fn update(&self, id: &BookId, payload: BookFields) -> Result<Book> {
        // absent record is reported before any validation failure
        get(id, &self.pool).await?;
        let book = payload.into_new_book()?;
        let now = OffsetDateTime::now_utc();

        let mut transaction = self.pool.begin().await?;
        let result = bind_fields(
            sqlx::query(
                "UPDATE book SET title = ?, author_name = ?, author_age = ?, author_email = ?, publisher = ?, published_date = ?, overview = ?, updated_at = ? WHERE id = ?",
            ),
            &book,
            now,
        )
        .bind(id.to_string())
        .execute(&mut *transaction)
        .await?;

        if result.rows_affected() == 0 {
            // deleted in the meantime
            return Err(Error::RecordNotFound(format!("Book {id}")));
        }
        let record = get(id, &mut *transaction).await?;
        transaction.commit().await?;
        debug!("Updated book {id}");
        Ok(record)
    }

    pub async fn delete(&self, id: &BookId) -> Result<()> {
        let res = sqlx::query("DELETE FROM book WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound(format!("Book {id}")))
        } else {
            debug!("Deleted book {id}");
            Ok(())
        }
    }
}

type Query<'q> = sqlx::query::Query<'q, ChosenDB, <ChosenDB as sqlx::Database>::Arguments<'q>>;

fn bind_fields<'q>(query: Query<'q>, book: &'q NewBook, updated_at: OffsetDateTime) -> Query<'q> {
    query
        .bind(&book.title)
        .bind(&book.author_name)
        .bind(book.author_age)
        .bind(&book.author_email)
        .bind(&book.publisher)
        .bind(book.published_date)
        .bind(&book.overview)
        .bind(updated_at)
}

async fn get<'c, E>(id: &BookId, executor: E) -> Result<Book>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    let query = format!("{SELECT_BOOK} WHERE id = ?");
    let row = sqlx::query_as::<_, BookRow>(&query)
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| Error::RecordNotFound(format!("Book {id}")))?;
    row.try_into()
}
