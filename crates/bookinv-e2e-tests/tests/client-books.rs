use bookinv_client::{BookApi as _, BookCatalog, BookClient, Error};
use bookinv_e2e_tests::{api_url, dune, prepare_env, spawn_server};
use bookinv_types::{BookFields, BookId};
use tracing_test::traced_test;

fn dune_fields() -> BookFields {
    serde_json::from_value(dune()).unwrap()
}

#[tokio::test]
#[traced_test]
async fn test_client_crud() {
    let (args, _config_guard) = prepare_env("test_client_crud").await.unwrap();
    let client = BookClient::new(api_url(&args).unwrap());
    spawn_server(args).await.unwrap();

    assert!(client.health().await.unwrap());
    assert!(client.list_books().await.unwrap().is_empty());

    let created = client.create_book(&dune_fields()).await.unwrap();
    assert_eq!(created.author_email, "frank@example.com");
    assert_eq!(client.get_book(&created.id).await.unwrap(), created);

    let res = client.create_book(&dune_fields()).await;
    assert!(matches!(res, Err(Error::Conflict(_))), "{res:?}");

    let mut fields = created.fields();
    fields.title = Some("Dune Messiah".into());
    let updated = client.update_book(&created.id, &fields).await.unwrap();
    assert_eq!(updated.title, "Dune Messiah");
    assert_eq!(updated.created_at, created.created_at);

    // rejected locally, server never sees it
    let mut invalid = created.fields();
    invalid.author_age = Some(0);
    let res = client.update_book(&created.id, &invalid).await;
    assert!(matches!(res, Err(Error::Validation(_))), "{res:?}");

    client.delete_book(&created.id).await.unwrap();
    let res = client.get_book(&created.id).await;
    assert!(matches!(res, Err(Error::NotFound(_))), "{res:?}");
    let res = client.delete_book(&BookId::new_random()).await;
    assert!(matches!(res, Err(Error::NotFound(_))), "{res:?}");
}

#[tokio::test]
#[traced_test]
async fn test_catalog() {
    let (args, _config_guard) = prepare_env("test_catalog").await.unwrap();
    let client = BookClient::new(api_url(&args).unwrap());
    spawn_server(args).await.unwrap();

    let mut catalog = BookCatalog::new();
    catalog.refresh(&client).await.unwrap();
    assert!(catalog.books().is_empty());

    let book = catalog.add(&client, &dune_fields()).await.unwrap();
    assert_eq!(catalog.books().len(), 1);

    let res = catalog.add(&client, &dune_fields()).await;
    assert!(res.is_err());
    assert_eq!(catalog.books().len(), 1);
    assert!(catalog.last_error().is_some());

    // deleted behind catalog's back, so removal fails and local copy stays
    client.delete_book(&book.id).await.unwrap();
    let res = catalog.remove(&client, &book.id).await;
    assert!(matches!(res, Err(Error::NotFound(_))), "{res:?}");
    assert_eq!(catalog.books().len(), 1);

    catalog.refresh(&client).await.unwrap();
    assert!(catalog.books().is_empty());
    assert!(catalog.last_error().is_none());
}
