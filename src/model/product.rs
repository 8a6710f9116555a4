/// Represents a catalog product.
///
/// # Sync Framework
/// This struct implements the [`SyncEntity`](sync_framework::SyncEntity) trait,
/// allowing it to be held by a [`StoreActor`](sync_framework::StoreActor).
///
/// See [`impl SyncEntity for Product`](#impl-SyncEntity-for-Product) for details on:
/// - Creation payload ([`MultipartPayload`](crate::upload::MultipartPayload))
/// - Update payload ([`ProductPatch`](crate::product_actor::ProductPatch))
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

/// A product never carries more than this many images.
pub const MAX_IMAGES: usize = 4;

/// Server-assigned identifier for Products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates `as_str`, `Display` and `FromStr` for a fixed label enumeration.
macro_rules! labelled_enum {
    ($name:ident, $what:literal, [$($variant:ident => $label:literal),+ $(,)?]) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(format!("unknown {}: {:?}", $what, other)),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Men,
    Women,
    Kids,
}

labelled_enum!(Category, "category", [Men => "Men", Women => "Women", Kids => "Kids"]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubCategory {
    #[default]
    Topwear,
    Bottomwear,
    Winterwear,
}

labelled_enum!(SubCategory, "sub-category", [
    Topwear => "Topwear",
    Bottomwear => "Bottomwear",
    Winterwear => "Winterwear",
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Size {
    S,
    M,
    L,
    XL,
    XXL,
}

labelled_enum!(Size, "size", [S => "S", M => "M", L => "L", XL => "XL", XXL => "XXL"]);

/// An image picked locally and not yet uploaded.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlob {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

// Image payloads can be megabytes; logs only need the size.
impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBlob")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One image slot of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImageRef {
    /// Already stored by the server.
    Remote(String),
    /// Chosen locally; shown while an upload is in flight.
    Pending(ImageBlob),
}

impl ImageRef {
    pub fn url(&self) -> Option<&str> {
        match self {
            ImageRef::Remote(url) => Some(url),
            ImageRef::Pending(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub sub_category: SubCategory,
    pub sizes: Vec<Size>,
    pub bestseller: bool,
    pub images: Vec<ImageRef>,
}

impl Product {
    /// Creates a Product with default classification and no images.
    ///
    /// Mostly useful in tests; real products come from the server.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            category: Category::default(),
            sub_category: SubCategory::default(),
            sizes: Vec::new(),
            bestseller: false,
            images: Vec::new(),
        }
    }

    pub fn with_images<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = urls
            .into_iter()
            .map(|url| ImageRef::Remote(url.into()))
            .take(MAX_IMAGES)
            .collect();
        self
    }

    /// URL of the first image, if it has been uploaded.
    pub fn primary_image_url(&self) -> Option<&str> {
        self.images.first().and_then(ImageRef::url)
    }

    /// The value shown while an edit is in flight.
    ///
    /// Scalar fields come from the draft. Image slot *i* takes the draft's new image when
    /// one was picked and keeps the current image otherwise.
    pub fn merged_with(&self, draft: &ProductDraft) -> Product {
        let images = (0..MAX_IMAGES)
            .filter_map(|slot| {
                match draft.images.get(slot).and_then(Option::as_ref) {
                    Some(blob) => Some(ImageRef::Pending(blob.clone())),
                    None => self.images.get(slot).cloned(),
                }
            })
            .collect();

        Product {
            id: self.id.clone(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            category: draft.category,
            sub_category: draft.sub_category,
            sizes: draft.sizes.clone(),
            bestseller: draft.bestseller,
            images,
        }
    }
}

/// The add/edit form: everything a create or update submits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub sub_category: SubCategory,
    pub sizes: Vec<Size>,
    pub bestseller: bool,
    /// Image slots in order; `None` leaves a slot untouched.
    pub images: Vec<Option<ImageBlob>>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            ..Self::default()
        }
    }

    /// Starts an edit from the current product. No image slot is replaced yet.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category,
            sub_category: product.sub_category,
            sizes: product.sizes.clone(),
            bestseller: product.bestseller,
            images: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: Category, sub_category: SubCategory) -> Self {
        self.category = category;
        self.sub_category = sub_category;
        self
    }

    pub fn sizes(mut self, sizes: impl IntoIterator<Item = Size>) -> Self {
        self.sizes = Vec::new();
        for size in sizes {
            if !self.sizes.contains(&size) {
                self.sizes.push(size);
            }
        }
        self
    }

    pub fn bestseller(mut self, bestseller: bool) -> Self {
        self.bestseller = bestseller;
        self
    }

    /// Puts `blob` in image slot `slot` (0-based), growing the slot list as needed.
    pub fn image(mut self, slot: usize, blob: ImageBlob) -> Self {
        if self.images.len() <= slot {
            self.images.resize(slot + 1, None);
        }
        self.images[slot] = Some(blob);
        self
    }

    /// Adds the size if absent, removes it otherwise. Selection order is kept.
    pub fn toggle_size(&mut self, size: Size) {
        match self.sizes.iter().position(|s| *s == size) {
            Some(index) => {
                self.sizes.remove(index);
            }
            None => self.sizes.push(size),
        }
    }

    /// Text fields as submitted to the server.
    pub fn fields(&self) -> BTreeMap<String, String> {
        let sizes: Vec<&str> = self.sizes.iter().map(Size::as_str).collect();
        BTreeMap::from([
            ("name".to_string(), self.name.clone()),
            ("description".to_string(), self.description.clone()),
            ("price".to_string(), self.price.normalize().to_string()),
            ("category".to_string(), self.category.to_string()),
            ("subCategory".to_string(), self.sub_category.to_string()),
            ("bestseller".to_string(), self.bestseller.to_string()),
            (
                "sizes".to_string(),
                serde_json::to_string(&sizes).unwrap_or_else(|_| "[]".to_string()),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn blob(name: &str) -> ImageBlob {
        ImageBlob::new(name, "image/png", vec![1, 2, 3])
    }

    #[test]
    fn merge_keeps_unreplaced_image_slots() {
        let product = Product::new("p1", "Shirt", dec!(20))
            .with_images(["https://cdn/1.png", "https://cdn/2.png"]);
        let draft = ProductDraft::from_product(&product).image(1, blob("new.png"));

        let merged = product.merged_with(&draft);
        assert_eq!(merged.images[0], ImageRef::Remote("https://cdn/1.png".into()));
        assert_eq!(merged.images[1], ImageRef::Pending(blob("new.png")));
        assert_eq!(merged.images.len(), 2);
    }

    #[test]
    fn merge_takes_scalar_fields_from_draft() {
        let product = Product::new("p1", "Shirt", dec!(20));
        let draft = ProductDraft::new("Polo", dec!(35.5))
            .category(Category::Kids, SubCategory::Winterwear)
            .bestseller(true);

        let merged = product.merged_with(&draft);
        assert_eq!(merged.id, ProductId::from("p1"));
        assert_eq!(merged.name, "Polo");
        assert_eq!(merged.price, dec!(35.5));
        assert_eq!(merged.category, Category::Kids);
        assert!(merged.bestseller);
        // The original is untouched
        assert_eq!(product.name, "Shirt");
    }

    #[test]
    fn toggle_size_preserves_selection_order() {
        let mut draft = ProductDraft::new("Shirt", dec!(1));
        draft.toggle_size(Size::XL);
        draft.toggle_size(Size::S);
        draft.toggle_size(Size::M);
        draft.toggle_size(Size::XL);
        assert_eq!(draft.sizes, vec![Size::S, Size::M]);
    }

    #[test]
    fn fields_serialize_sizes_as_json_array() {
        let draft = ProductDraft::new("Shirt", dec!(20.00)).sizes([Size::S, Size::XXL, Size::S]);
        let fields = draft.fields();
        assert_eq!(fields["sizes"], r#"["S","XXL"]"#);
        assert_eq!(fields["price"], "20");
        assert_eq!(fields["bestseller"], "false");
        assert_eq!(fields["subCategory"], "Topwear");
    }

    #[test]
    fn labels_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), *category);
        }
        assert!("Unisex".parse::<Category>().is_err());
        assert_eq!("XXL".parse::<Size>().unwrap(), Size::XXL);
    }
}
