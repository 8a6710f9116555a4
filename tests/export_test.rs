use admin_console::export::{self, ExportOptions};
use admin_console::lifecycle::AdminConsole;
use admin_console::model::{Address, Order, OrderId, OrderItem, OrderStatus, Product, ProductId};
use admin_console::report::CsvOptions;
use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use std::sync::Arc;
use sync_framework::mock::MockRemote;
use sync_framework::RemoteError;

fn products() -> Vec<Product> {
    vec![
        Product::new("a", "Shirt", dec!(20)).with_images(["https://cdn/shirt.png"]),
        Product::new("b", "Hat", dec!(10)).with_images(["https://cdn/hat.png"]),
    ]
}

fn order(id: &str, first_name: &str, status: OrderStatus) -> Order {
    Order {
        id: OrderId::from(id),
        items: vec![
            OrderItem {
                product_name: "Shirt".into(),
                quantity: 2,
                size: "M".into(),
            },
            OrderItem {
                product_name: "Cap".into(),
                quantity: 1,
                size: "L".into(),
            },
        ],
        address: Address {
            first_name: first_name.into(),
            last_name: "Smith".into(),
            street: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            country: "USA".into(),
            zip_code: "62701".into(),
            phone: "555-0100".into(),
        },
        amount: dec!(45.50),
        payment_method: "Stripe".into(),
        payment: true,
        date: Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap(),
        status,
    }
}

fn lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8(bytes.to_vec())
        .unwrap()
        .split('\n')
        .map(str::to_string)
        .collect()
}

#[test]
fn test_products_csv_matches_the_collection() {
    let generated_at = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let export =
        export::export_products_csv(&products(), &ExportOptions::default(), generated_at).unwrap();

    assert_eq!(export.file_name, "product_report_2024-06-15.csv");
    assert_eq!(export.content_type, "text/csv");

    let lines = lines(&export.bytes);
    assert_eq!(lines.len(), products().len() + 1);
    assert_eq!(lines[0], "Name,Category,Price,Image URL");
    assert_eq!(lines[1], "Shirt,Men,$20,https://cdn/shirt.png");
    assert_eq!(lines[2], "Hat,Men,$10,https://cdn/hat.png");
}

#[test]
fn test_orders_csv_uses_currency_and_delimiter() {
    let options = ExportOptions {
        currency: "€".into(),
        csv: CsvOptions { delimiter: b';' },
    };
    let orders = vec![
        order("o2", "Jane", OrderStatus::OutForDelivery),
        order("o1", "John", OrderStatus::Placed),
    ];
    let generated_at = Utc.with_ymd_and_hms(2024, 6, 15, 23, 59, 0).unwrap();
    let export = export::export_orders_csv(&orders, &options, generated_at).unwrap();

    assert_eq!(export.file_name, "order_report_2024-06-15.csv");
    let lines = lines(&export.bytes);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Name;Address;Items;Amount;Status");
    assert!(lines[1].starts_with("Jane Smith;"));
    assert!(lines[1].ends_with(";Shirt x 2, Cap x 1;€45.5;Out for delivery"));
    assert!(lines[2].ends_with(";Order Placed"));
}

#[test]
fn test_documents_are_pdf_with_report_titles() {
    let generated_at = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
    let options = ExportOptions::default();

    let products = export::export_products_document(&products(), &options, generated_at).unwrap();
    assert_eq!(products.file_name, "product_report_2024-01-05.pdf");
    assert_eq!(products.content_type, "application/pdf");
    assert!(products.bytes.starts_with(b"%PDF-1.4"));
    let text = String::from_utf8_lossy(&products.bytes);
    assert!(text.contains("(Product Report)"));
    assert!(text.contains("(Generated on: 2024-01-05)"));
    assert!(text.contains("(Total Products: 2)"));

    let orders = export::export_orders_document(
        &[order("o1", "John", OrderStatus::Shipped)],
        &options,
        generated_at,
    )
    .unwrap();
    assert_eq!(orders.file_name, "order_report_2024-01-05.pdf");
    let text = String::from_utf8_lossy(&orders.bytes);
    assert!(text.contains("(Order Report)"));
    assert!(text.contains("(Total Orders: 1)"));
    assert!(text.trim_end().ends_with("%%EOF"));
}

#[test]
fn test_empty_collections_still_export_headers() {
    let generated_at = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
    let export = export::export_products_csv(&[], &ExportOptions::default(), generated_at).unwrap();
    assert_eq!(export.bytes, b"Name,Category,Price,Image URL");
}

#[tokio::test]
async fn test_export_after_rejected_removal_matches_export_before() {
    let product_remote = MockRemote::<Product>::new();
    product_remote.expect_fetch_all().return_ok(products());
    product_remote
        .expect_delete(ProductId::from("b"))
        .return_err(RemoteError::new("Product is referenced by an order"));
    let order_remote = MockRemote::<Order>::new();
    order_remote
        .expect_fetch_all()
        .return_ok(vec![order("o1", "John", OrderStatus::Packing)]);

    let console = AdminConsole::with_remotes(
        Arc::new(product_remote.clone()),
        Arc::new(order_remote.clone()),
        8,
        ExportOptions::default(),
    );
    console.refresh_all().await.unwrap();

    let generated_at = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let before = console.export_products_csv(generated_at).await.unwrap();

    let removal = console
        .product_client
        .remove_product(ProductId::from("b"))
        .await;
    assert!(removal.is_err());

    let after = console.export_products_csv(generated_at).await.unwrap();
    assert_eq!(after, before);

    let stats = console.stats().await.unwrap();
    assert_eq!(stats.total_products, 2);
    assert_eq!(stats.count(OrderStatus::Packing), 1);

    console.shutdown().await.unwrap();
    product_remote.verify();
    order_remote.verify();
}
