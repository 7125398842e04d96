use derive_more::{AsRef, Deref, Display, From, Into};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Category(String);

cardslide::impl_string_newtype!(Category);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default, deserialize_with = "one_or_many")]
    pub images: Vec<PathBuf>,
    #[serde(default)]
    pub original_price: Option<u64>,
    #[serde(default)]
    pub discount: u8,
    #[serde(skip)]
    pub image_index: usize,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(PathBuf),
        Many(Vec<PathBuf>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(p) => vec![p],
        OneOrMany::Many(v) => v,
    })
}

impl Product {
    /// WhatsApp deep link asking to order this product.
    pub fn order_url(&self, phone: &str) -> String {
        let text = format!(
            "Hi, I want to order: {} (ID: {}) - Price: {}",
            self.name,
            self.id,
            format_price(self.discounted_price())
        );
        format!("https://wa.me/{}?text={}", phone, urlencoding::encode(&text))
    }

    pub fn has_discount(&self) -> bool {
        self.discount > 0
    }

    pub fn original_price(&self) -> u64 {
        self.original_price.unwrap_or(self.price)
    }

    /// Price after the percentage discount, rounded to whole rupiah.
    pub fn discounted_price(&self) -> u64 {
        if !self.has_discount() {
            return self.price;
        }
        let factor = 1.0 - f64::from(self.discount.min(100)) / 100.0;
        (self.original_price() as f64 * factor).round() as u64
    }

    pub fn current_image(&self) -> Option<&Path> {
        self.images.get(self.image_index).map(PathBuf::as_path)
    }

    pub fn next_image(&mut self) -> Option<&Path> {
        if self.images.len() > 1 {
            self.image_index = (self.image_index + 1) % self.images.len();
        }
        self.current_image()
    }

    pub fn previous_image(&mut self) -> Option<&Path> {
        if self.images.len() > 1 {
            self.image_index = (self.image_index + self.images.len() - 1) % self.images.len();
        }
        self.current_image()
    }
}

/// `Rp 1.250.000`
pub fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("Rp {}", grouped)
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)?;
        let mut catalog = Self::from_json(&raw)?;

        // relative image paths are relative to the catalog file
        if let Some(base) = path.parent() {
            catalog
                .products
                .iter_mut()
                .flat_map(|p| p.images.iter_mut())
                .filter(|img| img.is_relative())
                .for_each(|img| *img = base.join(&*img));
        }
        Ok(catalog)
    }

    /// Loads `path`, falling back to the bundled catalog when it is missing
    /// or malformed.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            match Self::load(path) {
                Ok(catalog) => return catalog,
                Err(e) => log::error!("Catalog {}: {}", path.display(), e),
            }
        }
        Self::from_json(crate::config::DEFAULT_CATALOG).unwrap_or_default()
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(raw)?;
        Ok(Self { products })
    }

    /// Products of one category, in catalog order.
    pub fn in_category(&self, category: &Category) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }

    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for p in &self.products {
            if !seen.contains(&p.category) {
                seen.push(p.category.clone());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        { "id": 1, "name": "Linen Shirt", "price": 250000, "category": "Casualwear",
          "images": ["a.jpg", "b.jpg", "c.jpg"] },
        { "id": 2, "name": "Running Tee", "price": 180000, "category": "Sportwear",
          "images": "tee.jpg", "original_price": 200000, "discount": 15 },
        { "id": 3, "name": "Chino", "price": 320000, "category": "casualwear" }
    ]"#;

    #[test]
    fn test_category_filter_keeps_order() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let casual = catalog.in_category(&Category::new("Casualwear"));

        let ids: Vec<_> = casual.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(catalog.categories().len(), 3);
    }

    #[test]
    fn test_discount_uses_original_price() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let tee = &catalog.products[1];

        assert!(tee.has_discount());
        assert_eq!(tee.discounted_price(), 170000);
        assert_eq!(catalog.products[0].discounted_price(), 250000);
    }

    #[test]
    fn test_single_image_string_is_accepted() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.products[1].images, vec![PathBuf::from("tee.jpg")]);
        assert!(catalog.products[2].images.is_empty());
    }

    #[test]
    fn test_image_cycling_wraps() {
        let mut shirt = Catalog::from_json(SAMPLE).unwrap().products.remove(0);

        assert_eq!(shirt.previous_image(), Some(Path::new("c.jpg")));
        assert_eq!(shirt.next_image(), Some(Path::new("a.jpg")));
        assert_eq!(shirt.next_image(), Some(Path::new("b.jpg")));
    }

    #[test]
    fn test_order_url_is_encoded() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let url = catalog.products[1].order_url("6281234567890");

        assert_eq!(
            url,
            "https://wa.me/6281234567890?text=Hi%2C%20I%20want%20to%20order%3A%20Running%20Tee\
             %20%28ID%3A%202%29%20-%20Price%3A%20Rp%20170.000"
        );
    }

    #[test]
    fn test_missing_catalog_falls_back_to_bundled() {
        let catalog = Catalog::load_or_default(Some(Path::new("/nonexistent/catalog.json")));
        assert!(!catalog.products.is_empty());
    }

    #[test]
    fn test_format_price_groups_thousands() {
        let cases = [(0, "Rp 0"), (950, "Rp 950"), (1000, "Rp 1.000"), (1250000, "Rp 1.250.000")];
        for (price, expected) in cases {
            assert_eq!(format_price(price), expected);
        }
    }
}
