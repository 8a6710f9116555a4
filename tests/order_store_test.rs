use admin_console::clients::OrderClient;
use admin_console::model::{Address, Order, OrderId, OrderItem, OrderStatus};
use admin_console::order_actor::{self, OrderAction, OrderError};
use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use std::sync::Arc;
use sync_framework::mock::{
    create_mock_remote, expect_fetch_all, expect_perform, MockRemote, RemoteCall,
};
use sync_framework::{RemoteError, SyncClient};
use tokio::sync::mpsc;

fn order(id: &str, status: OrderStatus) -> Order {
    Order {
        id: OrderId::from(id),
        items: vec![OrderItem {
            product_name: "Shirt".into(),
            quantity: 1,
            size: "M".into(),
        }],
        address: Address {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            street: "12 St James's Square".into(),
            city: "London".into(),
            state: "London".into(),
            country: "UK".into(),
            zip_code: "SW1Y 4JH".into(),
            phone: "0123".into(),
        },
        amount: dec!(30),
        payment_method: "COD".into(),
        payment: false,
        date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        status,
    }
}

async fn store_with(orders: Vec<Order>) -> (OrderClient, mpsc::Receiver<RemoteCall<Order>>) {
    let (remote, mut calls) = create_mock_remote::<Order>(16);
    let (actor, client) = order_actor::new(16);
    tokio::spawn(actor.run(remote));

    let refresh = {
        let client = client.clone();
        tokio::spawn(async move { client.refresh().await })
    };
    expect_fetch_all(&mut calls)
        .await
        .expect("Expected FetchAll call")
        .send(Ok(orders))
        .unwrap();
    refresh.await.unwrap().unwrap();

    (client, calls)
}

#[tokio::test]
async fn test_status_is_shown_while_the_backend_confirms() {
    let (client, mut calls) = store_with(vec![
        order("o1", OrderStatus::Placed),
        order("o2", OrderStatus::Packing),
    ])
    .await;

    let change = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .set_order_status(OrderId::from("o1"), OrderStatus::Shipped)
                .await
        })
    };
    let (id, action, responder) = expect_perform(&mut calls).await.expect("Expected Perform call");
    assert_eq!(id, OrderId::from("o1"));
    assert_eq!(action, OrderAction::SetStatus(OrderStatus::Shipped));

    let in_flight = client.get_order(&OrderId::from("o1")).await.unwrap();
    assert_eq!(in_flight.status, OrderStatus::Shipped);

    responder.send(Ok(())).unwrap();
    let settled = change.await.unwrap().unwrap();
    assert_eq!(settled.status, OrderStatus::Shipped);

    let snapshot = client.snapshot().await.unwrap();
    assert_eq!(snapshot.items[0].status, OrderStatus::Shipped);
    assert_eq!(snapshot.items[1].status, OrderStatus::Packing);
    assert_eq!(snapshot.revision, 2);
}

#[tokio::test]
async fn test_rejected_status_change_restores_previous_status() {
    let remote = MockRemote::<Order>::new();
    remote
        .expect_fetch_all()
        .return_ok(vec![order("o1", OrderStatus::Packing)]);
    remote
        .expect_perform(OrderId::from("o1"))
        .return_err(RemoteError::new("Not Authorized Login Again"));

    let (actor, client) = order_actor::new(8);
    tokio::spawn(actor.run(Arc::new(remote.clone())));
    client.refresh().await.unwrap();

    let result = client
        .set_order_status(OrderId::from("o1"), OrderStatus::OutForDelivery)
        .await;
    assert_eq!(
        result,
        Err(OrderError::RemoteRejected("Not Authorized Login Again".into()))
    );

    let restored = client.get_order(&OrderId::from("o1")).await.unwrap();
    assert_eq!(restored, order("o1", OrderStatus::Packing));
    remote.verify();
}

#[tokio::test]
async fn test_delivered_orders_cannot_move_back() {
    let remote = MockRemote::<Order>::new();
    remote
        .expect_fetch_all()
        .return_ok(vec![order("o1", OrderStatus::Delivered)]);

    let (actor, client) = order_actor::new(8);
    tokio::spawn(actor.run(Arc::new(remote.clone())));
    client.refresh().await.unwrap();

    let result = client
        .set_order_status(OrderId::from("o1"), OrderStatus::Packing)
        .await;
    assert_eq!(
        result,
        Err(OrderError::InvalidTransition {
            id: "o1".into(),
            from: OrderStatus::Delivered,
            to: OrderStatus::Packing,
        })
    );
    assert_eq!(
        result.unwrap_err().to_string(),
        "Order o1 cannot move from Delivered to Packing"
    );

    assert_eq!(
        client.get_order(&OrderId::from("o1")).await.unwrap().status,
        OrderStatus::Delivered
    );
    // Re-selecting Delivered is allowed
    remote
        .expect_perform(OrderId::from("o1"))
        .return_ok();
    let same = client
        .set_order_status(OrderId::from("o1"), OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(same.status, OrderStatus::Delivered);
    remote.verify();
}

#[tokio::test]
async fn test_status_changes_of_one_order_are_applied_in_order() {
    let (client, mut calls) = store_with(vec![order("o1", OrderStatus::Placed)]).await;

    let first = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .set_order_status(OrderId::from("o1"), OrderStatus::Packing)
                .await
        })
    };
    let (_, _, first_responder) = expect_perform(&mut calls).await.expect("Expected Perform call");

    let second = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .set_order_status(OrderId::from("o1"), OrderStatus::Shipped)
                .await
        })
    };

    // The second change waits; failing the first puts "Order Placed" back before it starts
    first_responder.send(Err(RemoteError::new("timeout"))).unwrap();
    assert!(first.await.unwrap().is_err());

    let (_, action, second_responder) =
        expect_perform(&mut calls).await.expect("Expected Perform call");
    assert_eq!(action, OrderAction::SetStatus(OrderStatus::Shipped));
    second_responder.send(Ok(())).unwrap();
    assert_eq!(second.await.unwrap().unwrap().status, OrderStatus::Shipped);
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let (client, _calls) = store_with(vec![order("o1", OrderStatus::Placed)]).await;

    let result = client
        .set_order_status(OrderId::from("nope"), OrderStatus::Shipped)
        .await;
    assert_eq!(result, Err(OrderError::NotFound("nope".into())));
}
