//! HTTP implementation of [`AdminApi`].
//!
//! Every request carries the admin token in a `token` header. Every response is a JSON
//! envelope:
//!
//! ```json
//! { "success": true, "message": "Product Added", "product": { "_id": "...", ... } }
//! ```
//!
//! `success: false`, a non-2xx status and transport failures all become a [`RemoteError`]
//! carrying the backend's message when there is one.

use super::AdminApi;
use crate::config::Settings;
use crate::model::{
    Address, Category, ImageRef, Order, OrderId, OrderItem, OrderStatus, Product, ProductId,
    Size, SubCategory, MAX_IMAGES,
};
use crate::upload::MultipartPayload;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use sync_framework::RemoteError;
use tracing::{debug, instrument, warn};

pub struct HttpAdminApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpAdminApi {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.backend_url, &settings.token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Map<String, Value>, RemoteError> {
        let response = request
            .header("token", &self.token)
            .send()
            .await
            .map_err(|e| RemoteError::new(format!("Request failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::new(format!("Failed to read response: {e}")))?;
        debug!(%status, len = body.len(), "Backend responded");
        parse_envelope(status, &body)
    }

    /// Reads one product back when a mutation response does not include it.
    async fn fetch_product(&self, id: &ProductId) -> Result<Product, RemoteError> {
        let data = self
            .send(
                self.client
                    .post(self.url("/api/product/single"))
                    .json(&json!({ "productId": id.0 })),
            )
            .await?;
        take::<WireProduct>(data, "product")?.try_into()
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, RemoteError> {
        let data = self
            .send(self.client.get(self.url("/api/product/list")))
            .await?;
        take::<Vec<WireProduct>>(data, "products")?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn fetch_orders(&self) -> Result<Vec<Order>, RemoteError> {
        let data = self
            .send(self.client.post(self.url("/api/order/list")).json(&json!({})))
            .await?;
        let mut orders = take::<Vec<WireOrder>>(data, "orders")?
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        // The backend lists oldest first
        orders.reverse();
        Ok(orders)
    }

    #[instrument(skip(self, payload))]
    async fn create_product(&self, payload: MultipartPayload) -> Result<Product, RemoteError> {
        let name = payload.text("name").unwrap_or_default().to_string();
        let form = payload
            .to_form()
            .map_err(|e| RemoteError::new(format!("Failed to build upload: {e}")))?;
        let data = self
            .send(self.client.post(self.url("/api/product/add")).multipart(form))
            .await?;

        if data.contains_key("product") {
            return take::<WireProduct>(data, "product")?.try_into();
        }
        // Without the created product in the response, the newest entry with this name is it
        warn!("Create response has no product, reading the list back");
        self.fetch_products()
            .await?
            .into_iter()
            .rev()
            .find(|product| product.name == name)
            .ok_or_else(|| RemoteError::new(format!("Created product {name:?} is not listed")))
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn update_product(
        &self,
        id: ProductId,
        payload: MultipartPayload,
    ) -> Result<Product, RemoteError> {
        let form = payload
            .to_form()
            .map_err(|e| RemoteError::new(format!("Failed to build upload: {e}")))?;
        let data = self
            .send(
                self.client
                    .put(self.url(&format!("/api/product/update/{}", id.0)))
                    .multipart(form),
            )
            .await?;

        if data.contains_key("product") {
            return take::<WireProduct>(data, "product")?.try_into();
        }
        self.fetch_product(&id).await
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn delete_product(&self, id: ProductId) -> Result<(), RemoteError> {
        self.send(
            self.client
                .post(self.url("/api/product/remove"))
                .json(&json!({ "id": id.0 })),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(id = %id, status = %status))]
    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RemoteError> {
        self.send(
            self.client
                .post(self.url("/api/order/status"))
                .json(&json!({ "orderId": id.0, "status": status })),
        )
        .await?;
        Ok(())
    }
}

// --- Wire format ---

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    data: Map<String, Value>,
}

fn parse_envelope(status: StatusCode, body: &str) -> Result<Map<String, Value>, RemoteError> {
    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => return Err(RemoteError::new(format!("HTTP {status}"))),
        Err(e) => return Err(RemoteError::new(format!("Malformed response: {e}"))),
    };
    if !status.is_success() || !envelope.success {
        return Err(RemoteError::new(
            envelope
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| format!("HTTP {status}")),
        ));
    }
    Ok(envelope.data)
}

fn take<T: DeserializeOwned>(mut data: Map<String, Value>, key: &str) -> Result<T, RemoteError> {
    let value = data
        .remove(key)
        .ok_or_else(|| RemoteError::new(format!("Response has no {key}")))?;
    serde_json::from_value(value).map_err(|e| RemoteError::new(format!("Malformed {key}: {e}")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProduct {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    category: String,
    sub_category: String,
    #[serde(default)]
    sizes: Vec<String>,
    #[serde(default)]
    bestseller: bool,
    #[serde(default)]
    image: Vec<String>,
}

impl TryFrom<WireProduct> for Product {
    type Error = RemoteError;

    fn try_from(wire: WireProduct) -> Result<Self, Self::Error> {
        let malformed = |e: String| RemoteError::new(format!("Malformed product {}: {e}", wire.id));
        if wire.image.len() > MAX_IMAGES {
            return Err(malformed(format!("{} images", wire.image.len())));
        }
        let category = wire.category.parse::<Category>().map_err(malformed)?;
        let sub_category = wire.sub_category.parse::<SubCategory>().map_err(malformed)?;
        let sizes = wire
            .sizes
            .iter()
            .map(|size| size.parse::<Size>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(malformed)?;

        Ok(Product {
            id: ProductId(wire.id),
            name: wire.name,
            description: wire.description,
            price: wire.price,
            category,
            sub_category,
            sizes,
            bestseller: wire.bestseller,
            images: wire.image.into_iter().map(ImageRef::Remote).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOrder {
    #[serde(rename = "_id")]
    id: String,
    items: Vec<WireItem>,
    address: Address,
    amount: Decimal,
    #[serde(default)]
    payment_method: String,
    #[serde(default)]
    payment: bool,
    /// Milliseconds since the Unix epoch.
    date: i64,
    status: OrderStatus,
}

#[derive(Debug, Deserialize)]
struct WireItem {
    name: String,
    quantity: u32,
    #[serde(default)]
    size: String,
}

impl TryFrom<WireOrder> for Order {
    type Error = RemoteError;

    fn try_from(wire: WireOrder) -> Result<Self, Self::Error> {
        let date = DateTime::from_timestamp_millis(wire.date).ok_or_else(|| {
            RemoteError::new(format!("Malformed order {}: date {}", wire.id, wire.date))
        })?;
        let order = Order {
            id: OrderId(wire.id),
            items: wire
                .items
                .into_iter()
                .map(|item| OrderItem {
                    product_name: item.name,
                    quantity: item.quantity,
                    size: item.size,
                })
                .collect(),
            address: wire.address,
            amount: wire.amount,
            payment_method: wire.payment_method,
            payment: wire.payment,
            date,
            status: wire.status,
        };
        order
            .validate()
            .map_err(|e| RemoteError::new(format!("Malformed order: {e}")))?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn products_body() -> &'static str {
        r#"{
            "success": true,
            "products": [{
                "_id": "a", "name": "Shirt", "description": "Cotton", "price": 20,
                "category": "Men", "subCategory": "Topwear", "sizes": ["M", "XL"],
                "bestseller": true, "image": ["https://cdn/a1.png", "https://cdn/a2.png"],
                "date": 1700000000000
            }]
        }"#
    }

    fn order_json(id: &str, status: &str) -> Value {
        json!({
            "_id": id,
            "userId": "u1",
            "items": [{ "name": "Shirt", "quantity": 2, "size": "M", "price": 20 }],
            "address": {
                "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com",
                "street": "12 Analytical Way", "city": "London", "state": "LDN",
                "zipCode": "N1", "country": "UK", "phone": "0100"
            },
            "amount": 50,
            "paymentMethod": "COD",
            "payment": false,
            "date": 1709294400000i64,
            "status": status
        })
    }

    #[test]
    fn parses_product_list() {
        let data = parse_envelope(StatusCode::OK, products_body()).unwrap();
        let products: Vec<Product> = take::<Vec<WireProduct>>(data, "products")
            .unwrap()
            .into_iter()
            .map(|wire| wire.try_into().unwrap())
            .collect();

        let shirt = &products[0];
        assert_eq!(shirt.id, ProductId::from("a"));
        assert_eq!(shirt.price, dec!(20));
        assert_eq!(shirt.category, Category::Men);
        assert_eq!(shirt.sub_category, SubCategory::Topwear);
        assert_eq!(shirt.sizes, vec![Size::M, Size::XL]);
        assert!(shirt.bestseller);
        assert_eq!(shirt.description, "Cotton");
        assert_eq!(shirt.images[1], ImageRef::Remote("https://cdn/a2.png".into()));
    }

    #[test]
    fn parses_orders() {
        let body = json!({ "success": true, "orders": [order_json("o1", "Out for delivery")] });
        let data = parse_envelope(StatusCode::OK, &body.to_string()).unwrap();
        let wire = take::<Vec<WireOrder>>(data, "orders").unwrap();
        let order = Order::try_from(wire.into_iter().next().unwrap()).unwrap();

        assert_eq!(order.status, OrderStatus::OutForDelivery);
        assert_eq!(order.items_summary(), "Shirt x 2");
        assert_eq!(order.date.to_rfc3339(), "2024-03-01T12:00:00+00:00");
        assert_eq!(order.amount, dec!(50));
    }

    #[test]
    fn unsuccessful_envelope_carries_backend_message() {
        let err = parse_envelope(
            StatusCode::OK,
            r#"{"success": false, "message": "Not Authorized Login Again"}"#,
        )
        .unwrap_err();
        assert_eq!(err.message, "Not Authorized Login Again");
    }

    #[test]
    fn http_errors_are_rejections() {
        let err = parse_envelope(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.message, "HTTP 502 Bad Gateway");

        let err = parse_envelope(
            StatusCode::UNAUTHORIZED,
            r#"{"success": true, "message": ""}"#,
        )
        .unwrap_err();
        assert_eq!(err.message, "HTTP 401 Unauthorized");
    }

    #[test]
    fn malformed_records_are_rejected() {
        let mut order = order_json("o2", "Packing");
        order["items"] = json!([]);
        let wire: WireOrder = serde_json::from_value(order).unwrap();
        assert!(Order::try_from(wire).unwrap_err().message.contains("no items"));

        let unknown = json!({
            "_id": "x", "name": "Robe", "price": 5, "category": "Pets", "subCategory": "Topwear"
        });
        let wire: WireProduct = serde_json::from_value(unknown).unwrap();
        assert!(Product::try_from(wire).unwrap_err().message.contains("Pets"));
    }

    #[test]
    fn orders_without_contact_details_are_rejected() {
        let mut order = order_json("o3", "Shipped");
        order["address"]["zipCode"] = json!("");
        let wire: WireOrder = serde_json::from_value(order).unwrap();
        assert!(Order::try_from(wire).unwrap_err().message.contains("zipCode"));

        let mut order = order_json("o4", "Shipped");
        order["address"]["phone"] = json!(" ");
        let wire: WireOrder = serde_json::from_value(order).unwrap();
        assert!(Order::try_from(wire).unwrap_err().message.contains("phone"));
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let data = parse_envelope(StatusCode::OK, r#"{"success": true}"#).unwrap();
        let err = take::<Vec<WireProduct>>(data, "products").unwrap_err();
        assert_eq!(err.message, "Response has no products");
    }
}
