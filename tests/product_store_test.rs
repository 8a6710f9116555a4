use admin_console::clients::ProductClient;
use admin_console::model::{ImageBlob, ImageRef, Product, ProductDraft, ProductId};
use admin_console::product_actor::{self, ProductError};
use admin_console::upload::PartBody;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use sync_framework::mock::{
    create_mock_remote, expect_create, expect_delete, expect_fetch_all, expect_update,
    MockRemote, RemoteCall,
};
use sync_framework::{RemoteError, SyncClient};
use tokio::sync::mpsc;

fn shirt() -> Product {
    Product::new("a", "Shirt", dec!(20)).with_images(["https://cdn/shirt.png"])
}

fn hat() -> Product {
    Product::new("b", "Hat", dec!(10)).with_images(["https://cdn/hat.png"])
}

fn socks() -> Product {
    Product::new("c", "Socks", dec!(5))
}

fn ids(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.0.as_str()).collect()
}

/// Spawns a Product store backed by a hand-answered remote and loads `products`.
async fn store_with(
    products: Vec<Product>,
) -> (ProductClient, mpsc::Receiver<RemoteCall<Product>>) {
    let (remote, mut calls) = create_mock_remote::<Product>(16);
    let (actor, client) = product_actor::new(16);
    tokio::spawn(actor.run(remote));

    let refresh = {
        let client = client.clone();
        tokio::spawn(async move { client.refresh().await })
    };
    expect_fetch_all(&mut calls)
        .await
        .expect("Expected FetchAll call")
        .send(Ok(products))
        .unwrap();
    refresh.await.unwrap().unwrap();

    (client, calls)
}

#[tokio::test]
async fn test_rejected_remove_keeps_original_order() {
    let remote = MockRemote::<Product>::new();
    remote.expect_fetch_all().return_ok(vec![shirt(), hat()]);
    remote
        .expect_delete(ProductId::from("b"))
        .return_err(RemoteError::new("Product is referenced by an order"));

    let (actor, client) = product_actor::new(8);
    tokio::spawn(actor.run(Arc::new(remote.clone())));
    client.refresh().await.unwrap();

    let result = client.remove_product(ProductId::from("b")).await;
    assert_eq!(
        result,
        Err(ProductError::RemoteRejected(
            "Product is referenced by an order".into()
        ))
    );

    assert_eq!(client.items().await.unwrap(), vec![shirt(), hat()]);
    remote.verify();
}

#[tokio::test]
async fn test_removal_is_visible_in_flight_and_restored_in_place() {
    let (client, mut calls) = store_with(vec![shirt(), hat(), socks()]).await;

    let removal = {
        let client = client.clone();
        tokio::spawn(async move { client.remove_product(ProductId::from("b")).await })
    };
    let (id, responder) = expect_delete(&mut calls).await.expect("Expected Delete call");
    assert_eq!(id, ProductId::from("b"));

    assert_eq!(ids(&client.items().await.unwrap()), ["a", "c"]);

    responder.send(Err(RemoteError::new("offline"))).unwrap();
    assert!(removal.await.unwrap().is_err());

    let snapshot = client.snapshot().await.unwrap();
    assert_eq!(ids(&snapshot.items), ["a", "b", "c"]);
    // Only the initial refresh reconciled
    assert_eq!(snapshot.revision, 1);
}

#[tokio::test]
async fn test_add_product_appends_only_after_the_backend_answers() {
    let (client, mut calls) = store_with(vec![shirt(), hat()]).await;

    let draft = ProductDraft::new("Scarf", dec!(12.5))
        .description("Wool")
        .image(0, ImageBlob::new("scarf.jpg", "image/jpeg", vec![0xFF, 0xD8]));
    let add = {
        let client = client.clone();
        tokio::spawn(async move { client.add_product(draft).await })
    };

    let (payload, responder) = expect_create(&mut calls).await.expect("Expected Create call");
    assert_eq!(payload.text("name"), Some("Scarf"));
    assert_eq!(payload.text("price"), Some("12.5"));
    assert!(matches!(
        payload.parts().last().map(|p| (&p.name[..], &p.body)),
        Some(("image1", PartBody::File(_)))
    ));

    // No placeholder while the server has not assigned an id
    assert_eq!(ids(&client.items().await.unwrap()), ["a", "b"]);

    let created = Product::new("z", "Scarf", dec!(12.5)).with_images(["https://cdn/scarf.jpg"]);
    responder.send(Ok(created.clone())).unwrap();
    assert_eq!(add.await.unwrap().unwrap(), created);

    let snapshot = client.snapshot().await.unwrap();
    assert_eq!(ids(&snapshot.items), ["a", "b", "z"]);
    assert_eq!(snapshot.revision, 2);
}

#[tokio::test]
async fn test_failed_add_leaves_collection_unchanged() {
    let remote = MockRemote::<Product>::new();
    remote.expect_fetch_all().return_ok(vec![shirt()]);
    remote
        .expect_create()
        .return_err(RemoteError::new("Not Authorized Login Again"));

    let (actor, client) = product_actor::new(8);
    tokio::spawn(actor.run(Arc::new(remote.clone())));
    client.refresh().await.unwrap();

    let result = client.add_product(ProductDraft::new("Cap", dec!(3))).await;
    assert!(matches!(result, Err(ProductError::RemoteRejected(msg)) if msg.contains("Login")));
    assert_eq!(client.items().await.unwrap(), vec![shirt()]);
    remote.verify();
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_the_backend() {
    let remote = MockRemote::<Product>::new();
    remote.expect_fetch_all().return_ok(vec![shirt()]);

    let (actor, client) = product_actor::new(8);
    tokio::spawn(actor.run(Arc::new(remote.clone())));
    client.refresh().await.unwrap();

    let blank = client.add_product(ProductDraft::new("  ", dec!(3))).await;
    assert!(matches!(blank, Err(ProductError::ValidationError(_))));

    let negative = ProductDraft::from_product(&shirt());
    let negative = ProductDraft {
        price: dec!(-1),
        ..negative
    };
    let result = client.update_product(ProductId::from("a"), negative).await;
    assert!(matches!(result, Err(ProductError::ValidationError(_))));

    assert_eq!(client.items().await.unwrap(), vec![shirt()]);
    remote.verify();
}

#[tokio::test]
async fn test_update_shows_merged_draft_then_canonical_value() {
    let (client, mut calls) = store_with(vec![shirt(), hat()]).await;

    let new_image = ImageBlob::new("shirt-2.png", "image/png", vec![1, 2, 3]);
    let draft = ProductDraft {
        name: "Oxford Shirt".into(),
        ..ProductDraft::from_product(&shirt())
    }
    .image(1, new_image.clone());
    let update = {
        let client = client.clone();
        tokio::spawn(async move { client.update_product(ProductId::from("a"), draft).await })
    };

    let (id, patch, responder) = expect_update(&mut calls).await.expect("Expected Update call");
    assert_eq!(id, ProductId::from("a"));
    assert_eq!(patch.payload.files().count(), 1);

    let in_flight = client.items().await.unwrap();
    assert_eq!(in_flight[0].name, "Oxford Shirt");
    assert_eq!(
        in_flight[0].images,
        vec![
            ImageRef::Remote("https://cdn/shirt.png".into()),
            ImageRef::Pending(new_image),
        ]
    );

    let canonical = Product {
        name: "Oxford Shirt".into(),
        ..shirt()
    }
    .with_images(["https://cdn/shirt.png", "https://cdn/shirt-2.png"]);
    responder.send(Ok(canonical.clone())).unwrap();
    assert_eq!(update.await.unwrap().unwrap(), canonical);

    let settled = client.snapshot().await.unwrap();
    assert_eq!(settled.items, vec![canonical, hat()]);
    assert_eq!(settled.revision, 2);
}

#[tokio::test]
async fn test_every_failed_mutation_restores_the_previous_state() {
    let (client, mut calls) = store_with(vec![shirt(), hat(), socks()]).await;
    let before = client.items().await.unwrap();

    // Update "a", remove "c" and add a product; all three are in flight together
    let update = {
        let client = client.clone();
        let draft = ProductDraft {
            name: "Renamed".into(),
            ..ProductDraft::from_product(&shirt())
        };
        tokio::spawn(async move { client.update_product(ProductId::from("a"), draft).await })
    };
    let (_, _, update_responder) = expect_update(&mut calls).await.expect("Expected Update call");

    let remove = {
        let client = client.clone();
        tokio::spawn(async move { client.remove_product(ProductId::from("c")).await })
    };
    let (_, remove_responder) = expect_delete(&mut calls).await.expect("Expected Delete call");

    let add = {
        let client = client.clone();
        tokio::spawn(async move { client.add_product(ProductDraft::new("Belt", dec!(9))).await })
    };
    let (_, add_responder) = expect_create(&mut calls).await.expect("Expected Create call");

    // Answer in reverse order
    add_responder.send(Err(RemoteError::new("disk full"))).unwrap();
    remove_responder.send(Err(RemoteError::new("locked"))).unwrap();
    update_responder.send(Err(RemoteError::new("conflict"))).unwrap();

    assert!(add.await.unwrap().is_err());
    assert!(remove.await.unwrap().is_err());
    assert!(update.await.unwrap().is_err());

    assert_eq!(client.items().await.unwrap(), before);
}

#[tokio::test]
async fn test_update_and_remove_of_one_product_run_one_after_the_other() {
    let (client, mut calls) = store_with(vec![shirt(), hat()]).await;

    let update = {
        let client = client.clone();
        let draft = ProductDraft::from_product(&hat());
        tokio::spawn(async move { client.update_product(ProductId::from("b"), draft).await })
    };
    let (_, _, update_responder) = expect_update(&mut calls).await.expect("Expected Update call");

    let remove = {
        let client = client.clone();
        tokio::spawn(async move { client.remove_product(ProductId::from("b")).await })
    };
    let early = tokio::time::timeout(Duration::from_millis(50), calls.recv()).await;
    assert!(early.is_err(), "remove must wait for the update to settle");

    update_responder.send(Ok(hat())).unwrap();
    update.await.unwrap().unwrap();

    let (_, remove_responder) = expect_delete(&mut calls).await.expect("Expected Delete call");
    remove_responder.send(Ok(())).unwrap();
    remove.await.unwrap().unwrap();

    assert_eq!(ids(&client.items().await.unwrap()), ["a"]);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let (client, _calls) = store_with(vec![shirt()]).await;

    assert_eq!(
        client.remove_product(ProductId::from("missing")).await,
        Err(ProductError::NotFound("missing".into()))
    );
    assert_eq!(
        client.get_product(&ProductId::from("missing")).await,
        Err(ProductError::NotFound("missing".into()))
    );
    assert_eq!(client.get_product(&ProductId::from("a")).await, Ok(shirt()));
}
