//! Catalog products.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{Features, ImageUrls, Price, ProductId, features};
use crate::validation::{ValidationError, require};

/// A catalog product as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// `None` when absent or not a JSON array.
    #[serde(default, deserialize_with = "features::lenient")]
    pub additional_images: Option<ImageUrls>,
    /// `None` when absent or not a JSON array.
    #[serde(default, deserialize_with = "features::lenient")]
    pub features: Option<Features>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_available")]
    pub is_available: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

const fn default_available() -> bool {
    true
}

impl Product {
    /// Feature list, empty when the product has none.
    #[must_use]
    pub fn feature_list(&self) -> &[String] {
        self.features.as_ref().map_or(&[], |f| f.items())
    }

    /// Start an edit session pre-filled with this product's values.
    #[must_use]
    pub fn to_update(&self) -> ProductUpdate {
        ProductUpdate {
            title: Some(self.title.clone()),
            description: self.description.clone(),
            price: Some(self.price),
            category: self.category.clone(),
            image_url: self.image_url.clone(),
            additional_images: self.additional_images.clone(),
            features: self.features.clone(),
            is_featured: Some(self.is_featured),
            is_available: Some(self.is_available),
        }
    }
}

/// Body of `POST /api/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProduct {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_images: Option<ImageUrls>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,
    pub is_featured: bool,
    pub is_available: bool,
}

impl NewProduct {
    /// A visible, non-featured product with only the required fields set.
    #[must_use]
    pub fn new(title: impl Into<String>, price: Price) -> Self {
        Self {
            title: title.into(),
            description: None,
            price,
            category: None,
            image_url: None,
            additional_images: None,
            features: None,
            is_featured: false,
            is_available: true,
        }
    }

    /// Attach features; an empty list is dropped.
    #[must_use]
    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features.non_empty();
        self
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if the title is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)
    }
}

/// Body of `PUT /api/products/{id}`. Only set fields are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_images: Option<ImageUrls>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl ProductUpdate {
    /// Check that a title, if being changed, is not blanked out.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if the new title is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.title.as_deref().map_or(Ok(()), |t| require("title", t))
    }
}

/// Query string of `GET /api/products`. Unset filters are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl ProductQuery {
    /// Only featured products.
    #[must_use]
    pub fn featured() -> Self {
        Self {
            featured: Some(true),
            ..Self::default()
        }
    }

    /// Only products in `category`.
    #[must_use]
    pub fn in_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product_json() -> serde_json::Value {
        json!({
            "id": 3,
            "title": "Brand Kit",
            "description": "Logo, palette and type",
            "price": 149.5,
            "category": "branding",
            "image_url": "/uploads/kit.png",
            "additional_images": null,
            "features": "[\"SEO\",\"Fast\",\"Responsive\"]",
            "is_featured": true,
            "is_available": true,
            "created_at": "2024-05-01T10:00:00.123456",
            "updated_at": "2024-05-02T08:30:00"
        })
    }

    #[test]
    fn test_decode_backend_product() {
        let product: Product = serde_json::from_value(product_json()).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.price, Price::from_cents(14950).unwrap());
        assert_eq!(product.feature_list(), ["SEO", "Fast", "Responsive"]);
        assert!(product.additional_images.is_none());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "title": "Poster",
            "price": 20,
            "created_at": "2024-05-01T10:00:00",
            "updated_at": "2024-05-01T10:00:00"
        }))
        .unwrap();
        assert!(product.feature_list().is_empty());
        assert!(product.is_available);
        assert!(!product.is_featured);
    }

    #[test]
    fn test_malformed_list_column_keeps_listing() {
        let mut broken = product_json();
        broken["id"] = json!(4);
        broken["features"] = json!("SEO, Fast");
        broken["additional_images"] = json!("/uploads/a.png");

        let products: Vec<Product> =
            serde_json::from_value(json!([product_json(), broken])).unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].feature_list(), ["SEO", "Fast", "Responsive"]);
        assert!(products[1].feature_list().is_empty());
        assert!(products[1].additional_images.is_none());
        // Not sent on edit, so the stored text is left alone.
        assert!(products[1].to_update().features.is_none());
    }

    #[test]
    fn test_new_product_body() {
        let body = NewProduct::new("Poster", Price::from_cents(2000).unwrap())
            .with_features(Features::from_lines("A3\nMatte"));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "title": "Poster",
                "price": 20.0,
                "features": "[\"A3\",\"Matte\"]",
                "is_featured": false,
                "is_available": true
            })
        );
    }

    #[test]
    fn test_empty_features_are_not_sent() {
        let body = NewProduct::new("Poster", Price::ZERO).with_features(Features::from_lines(""));
        assert!(body.features.is_none());
    }

    #[test]
    fn test_blank_title_rejected() {
        let body = NewProduct::new("  ", Price::ZERO);
        assert_eq!(body.validate(), Err(ValidationError::MissingField("title")));
        let update = ProductUpdate {
            title: Some(String::new()),
            ..ProductUpdate::default()
        };
        assert!(update.validate().is_err());
        assert!(ProductUpdate::default().validate().is_ok());
    }

    #[test]
    fn test_partial_update_sends_only_set_fields() {
        let update = ProductUpdate {
            is_featured: Some(false),
            ..ProductUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"is_featured": false})
        );
    }

    #[test]
    fn test_to_update_round_trips_features() {
        let product: Product = serde_json::from_value(product_json()).unwrap();
        let update = product.to_update();
        assert_eq!(update.features, product.features);
        assert_eq!(update.price, Some(product.price));
    }
}
