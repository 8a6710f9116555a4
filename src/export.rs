//! # Exports
//!
//! Turns store snapshots into downloadable reports. Column sets are fixed:
//!
//! | report            | columns                                 |
//! |-------------------|-----------------------------------------|
//! | products CSV      | Name, Category, Price, Image URL        |
//! | products document | Name, Category, Price                   |
//! | orders CSV        | Name, Address, Items, Amount, Status    |
//! | orders document   | Name, Items, Amount, Status             |
//!
//! Every function takes the generation instant as an argument; nothing here reads the clock.

use crate::model::{Order, Product};
use crate::report::{
    encode_csv_with, encode_paginated_document, CsvOptions, ReportError, TabularModel,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A named report ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Export {
    /// Writes the report into `dir` under its file name.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Prefix for money values, e.g. `$`.
    pub currency: String,
    pub csv: CsvOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            currency: "$".into(),
            csv: CsvOptions::default(),
        }
    }
}

fn money(currency: &str, value: Decimal) -> String {
    format!("{currency}{}", value.normalize())
}

fn report_date(generated_at: DateTime<Utc>) -> String {
    generated_at.format("%Y-%m-%d").to_string()
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub fn products_csv_table(
    products: &[Product],
    currency: &str,
) -> Result<TabularModel, ReportError> {
    TabularModel::build(
        headers(&["Name", "Category", "Price", "Image URL"]),
        products
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.category.to_string(),
                    money(currency, p.price),
                    p.primary_image_url().unwrap_or_default().to_string(),
                ]
            })
            .collect(),
    )
}

pub fn products_document_table(
    products: &[Product],
    currency: &str,
) -> Result<TabularModel, ReportError> {
    TabularModel::build(
        headers(&["Name", "Category", "Price"]),
        products
            .iter()
            .map(|p| vec![p.name.clone(), p.category.to_string(), money(currency, p.price)])
            .collect(),
    )
}

pub fn orders_csv_table(orders: &[Order], currency: &str) -> Result<TabularModel, ReportError> {
    TabularModel::build(
        headers(&["Name", "Address", "Items", "Amount", "Status"]),
        orders
            .iter()
            .map(|o| {
                vec![
                    o.address.full_name(),
                    o.address.one_line(),
                    o.items_summary(),
                    money(currency, o.amount),
                    o.status.to_string(),
                ]
            })
            .collect(),
    )
}

pub fn orders_document_table(
    orders: &[Order],
    currency: &str,
) -> Result<TabularModel, ReportError> {
    TabularModel::build(
        headers(&["Name", "Items", "Amount", "Status"]),
        orders
            .iter()
            .map(|o| {
                vec![
                    o.address.full_name(),
                    o.items_summary(),
                    money(currency, o.amount),
                    o.status.to_string(),
                ]
            })
            .collect(),
    )
}

pub fn export_products_csv(
    products: &[Product],
    options: &ExportOptions,
    generated_at: DateTime<Utc>,
) -> Result<Export, ReportError> {
    let model = products_csv_table(products, &options.currency)?;
    Ok(Export {
        file_name: format!("product_report_{}.csv", report_date(generated_at)),
        content_type: CSV_CONTENT_TYPE,
        bytes: encode_csv_with(&model, &options.csv)?,
    })
}

pub fn export_products_document(
    products: &[Product],
    options: &ExportOptions,
    generated_at: DateTime<Utc>,
) -> Result<Export, ReportError> {
    let model = products_document_table(products, &options.currency)?;
    let date = report_date(generated_at);
    let subtitles = vec![
        format!("Generated on: {date}"),
        format!("Total Products: {}", products.len()),
    ];
    Ok(Export {
        file_name: format!("product_report_{date}.pdf"),
        content_type: PDF_CONTENT_TYPE,
        bytes: encode_paginated_document("Product Report", &subtitles, &model)?,
    })
}

pub fn export_orders_csv(
    orders: &[Order],
    options: &ExportOptions,
    generated_at: DateTime<Utc>,
) -> Result<Export, ReportError> {
    let model = orders_csv_table(orders, &options.currency)?;
    Ok(Export {
        file_name: format!("order_report_{}.csv", report_date(generated_at)),
        content_type: CSV_CONTENT_TYPE,
        bytes: encode_csv_with(&model, &options.csv)?,
    })
}

pub fn export_orders_document(
    orders: &[Order],
    options: &ExportOptions,
    generated_at: DateTime<Utc>,
) -> Result<Export, ReportError> {
    let model = orders_document_table(orders, &options.currency)?;
    let date = report_date(generated_at);
    let subtitles = vec![
        format!("Generated on: {date}"),
        format!("Total Orders: {}", orders.len()),
    ];
    Ok(Export {
        file_name: format!("order_report_{date}.pdf"),
        content_type: PDF_CONTENT_TYPE,
        bytes: encode_paginated_document("Order Report", &subtitles, &model)?,
    })
}
