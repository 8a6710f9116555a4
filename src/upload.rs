//! # Upload Encoder
//!
//! Builds the `multipart/form-data` body used to create and edit products.
//!
//! Part order is fixed so that encoded payloads can be compared byte for byte:
//!
//! 1. `name`, `description`, `price`, `category`, `subCategory`, `bestseller`, `sizes`
//! 2. any extra text fields, in key order
//! 3. `image1` to `image4`, only for the slots that hold a new image
//!
//! Absent image slots contribute nothing. Editing a product with a new second image sends
//! `image2` alone, and the backend keeps the other images.
//!
//! Everything here is validated before a request is built, so an invalid draft never
//! reaches the network.

use crate::model::{ImageBlob, ProductDraft, MAX_IMAGES};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

/// Text fields every product submission carries, in submission order.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "name",
    "description",
    "price",
    "category",
    "subCategory",
    "bestseller",
    "sizes",
];

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UploadError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Too many images: {0} slots given, at most {MAX_IMAGES} allowed")]
    TooManyImages(usize),
}

impl UploadError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        UploadError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartBody {
    Text(String),
    File(ImageBlob),
}

/// One named entry of a multipart submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub body: PartBody,
}

/// A validated product submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultipartPayload {
    parts: Vec<Part>,
}

impl MultipartPayload {
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Value of the text field `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.body {
            PartBody::Text(value) if part.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn text_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parts.iter().filter_map(|part| match &part.body {
            PartBody::Text(value) => Some((part.name.as_str(), value.as_str())),
            PartBody::File(_) => None,
        })
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &ImageBlob)> {
        self.parts.iter().filter_map(|part| match &part.body {
            PartBody::File(blob) => Some((part.name.as_str(), blob)),
            PartBody::Text(_) => None,
        })
    }

    /// `Content-Type` header value for a body rendered with `boundary`.
    pub fn content_type(boundary: &str) -> String {
        format!("multipart/form-data; boundary={boundary}")
    }

    /// Renders the body as RFC 7578 `multipart/form-data`.
    pub fn to_bytes(&self, boundary: &str) -> Vec<u8> {
        let mut out = Vec::new();
        for part in &self.parts {
            out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match &part.body {
                PartBody::Text(value) => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                            escape_quoted(&part.name)
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(value.as_bytes());
                }
                PartBody::File(blob) => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: {}\r\n\r\n",
                            escape_quoted(&part.name),
                            escape_quoted(&blob.file_name),
                            blob.content_type
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(&blob.bytes);
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        out
    }

    /// Converts into a `reqwest` form, keeping part order.
    pub fn to_form(&self) -> Result<reqwest::multipart::Form, reqwest::Error> {
        let mut form = reqwest::multipart::Form::new();
        for part in &self.parts {
            form = match &part.body {
                PartBody::Text(value) => form.text(part.name.clone(), value.clone()),
                PartBody::File(blob) => form.part(
                    part.name.clone(),
                    reqwest::multipart::Part::bytes(blob.bytes.clone())
                        .file_name(blob.file_name.clone())
                        .mime_str(&blob.content_type)?,
                ),
            };
        }
        Ok(form)
    }
}

// Quotes, CR and LF are percent-encoded inside quoted header parameters.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Validates `fields` and `images` and lays them out in submission order.
///
/// `images` holds up to four slots; `None` leaves the slot out of the payload.
pub fn encode(
    fields: &BTreeMap<String, String>,
    images: &[Option<ImageBlob>],
) -> Result<MultipartPayload, UploadError> {
    if images.len() > MAX_IMAGES {
        return Err(UploadError::TooManyImages(images.len()));
    }

    let mut parts = Vec::with_capacity(fields.len() + images.len());
    for name in REQUIRED_FIELDS {
        let value = fields.get(name).ok_or(UploadError::MissingField(name))?;
        validate_field(name, value)?;
        parts.push(Part {
            name: name.to_string(),
            body: PartBody::Text(value.clone()),
        });
    }

    for (name, value) in fields {
        if REQUIRED_FIELDS.contains(&name.as_str()) {
            continue;
        }
        if image_slot(name).is_some() {
            return Err(UploadError::invalid(name, "reserved for image uploads"));
        }
        parts.push(Part {
            name: name.clone(),
            body: PartBody::Text(value.clone()),
        });
    }

    for (slot, blob) in images.iter().enumerate() {
        if let Some(blob) = blob {
            parts.push(Part {
                name: format!("image{}", slot + 1),
                body: PartBody::File(blob.clone()),
            });
        }
    }

    Ok(MultipartPayload { parts })
}

/// Encodes an add/edit form.
pub fn encode_draft(draft: &ProductDraft) -> Result<MultipartPayload, UploadError> {
    encode(&draft.fields(), &draft.images)
}

fn validate_field(name: &str, value: &str) -> Result<(), UploadError> {
    match name {
        "name" if value.trim().is_empty() => Err(UploadError::invalid(name, "must not be empty")),
        "price" => {
            let price = Decimal::from_str(value.trim())
                .map_err(|_| UploadError::invalid(name, format!("{value:?} is not a number")))?;
            if price.is_sign_negative() && !price.is_zero() {
                return Err(UploadError::invalid(name, "must not be negative"));
            }
            Ok(())
        }
        "bestseller" if value != "true" && value != "false" => Err(UploadError::invalid(
            name,
            format!("expected \"true\" or \"false\", got {value:?}"),
        )),
        "sizes" => serde_json::from_str::<Vec<String>>(value)
            .map(|_| ())
            .map_err(|_| UploadError::invalid(name, "expected a JSON array of size labels")),
        _ => Ok(()),
    }
}

fn image_slot(name: &str) -> Option<usize> {
    let slot: usize = name.strip_prefix("image")?.parse().ok()?;
    (1..=MAX_IMAGES).contains(&slot).then_some(slot)
}
