//! Customer orders.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{Email, OrderId, OrderStatus, OrderType, Price, ProductId};
use crate::validation::{ValidationError, require};

use super::Product;

/// Who placed an order or request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerContact {
    #[serde(rename = "customer_name")]
    pub name: String,
    #[serde(rename = "customer_email")]
    pub email: Email,
    #[serde(rename = "customer_phone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CustomerContact {
    /// Build a contact from form input, validating the email.
    ///
    /// A blank phone number is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the name is blank or the email malformed.
    pub fn parse(name: &str, email: &str, phone: Option<&str>) -> Result<Self, ValidationError> {
        require("customer_name", name)?;
        Ok(Self {
            name: name.trim().to_owned(),
            email: Email::parse(email)?,
            phone: phone
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_owned),
        })
    }
}

/// An order as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub order_type: OrderType,
    #[serde(default)]
    pub customization_details: Option<String>,
    #[serde(default)]
    pub total_amount: Option<Price>,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(flatten)]
    pub contact: CustomerContact,
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization_details: Option<String>,
    pub total_amount: Price,
}

impl NewOrder {
    /// Order `product` as listed. The total is the product price.
    #[must_use]
    pub fn purchase(product: &Product, contact: CustomerContact) -> Self {
        Self {
            product_id: Some(product.id),
            contact,
            order_type: OrderType::Purchase,
            customization_details: None,
            total_amount: product.price,
        }
    }

    /// Order `product`, or bespoke work when `product` is `None`, with the
    /// requested changes. The total is the product price, or zero.
    #[must_use]
    pub fn customization(
        product: Option<&Product>,
        contact: CustomerContact,
        details: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product.map(|p| p.id),
            contact,
            order_type: OrderType::Customization,
            customization_details: Some(details.into()),
            total_amount: product.map_or(Price::ZERO, |p| p.price),
        }
    }

    /// Check the order before submission.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCustomizationDetails`] for a
    /// customization order whose details are missing or blank, and
    /// [`ValidationError::MissingField`] for a blank customer name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("customer_name", &self.contact.name)?;
        if self.order_type == OrderType::Customization
            && self
                .customization_details
                .as_deref()
                .is_none_or(|d| d.trim().is_empty())
        {
            return Err(ValidationError::MissingCustomizationDetails);
        }
        Ok(())
    }
}

/// Body of `PUT /api/orders/{id}`. Only set fields are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization_details: Option<String>,
}

impl OrderUpdate {
    /// An update that only changes the status.
    #[must_use]
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            customization_details: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn contact() -> CustomerContact {
        CustomerContact::parse("Ada", "ada@studio.io", Some("  ")).unwrap()
    }

    #[test]
    fn test_contact_drops_blank_phone() {
        assert!(contact().phone.is_none());
    }

    #[test]
    fn test_contact_rejects_bad_email() {
        assert!(matches!(
            CustomerContact::parse("Ada", "ada-at-studio", None),
            Err(ValidationError::Email(_))
        ));
    }

    #[test]
    fn test_customization_requires_details() {
        let order = NewOrder::customization(None, contact(), "   ");
        assert_eq!(
            order.validate(),
            Err(ValidationError::MissingCustomizationDetails)
        );

        let mut order = NewOrder::customization(None, contact(), "Blue palette");
        assert!(order.validate().is_ok());
        order.customization_details = None;
        assert!(order.validate().is_err());
    }

    #[test]
    fn test_purchase_needs_no_details() {
        let order = NewOrder {
            product_id: Some(ProductId::new(1)),
            contact: contact(),
            order_type: OrderType::Purchase,
            customization_details: None,
            total_amount: Price::from_cents(999).unwrap(),
        };
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_new_order_body_is_flat() {
        let order = NewOrder::customization(None, contact(), "Blue palette");
        assert_eq!(
            serde_json::to_value(&order).unwrap(),
            json!({
                "customer_name": "Ada",
                "customer_email": "ada@studio.io",
                "order_type": "customization",
                "customization_details": "Blue palette",
                "total_amount": 0.0
            })
        );
    }

    #[test]
    fn test_decode_backend_order() {
        let order: Order = serde_json::from_value(json!({
            "id": 12,
            "product_id": null,
            "customer_name": "Ada",
            "customer_email": "ada@studio.io",
            "customer_phone": null,
            "order_type": "purchase",
            "customization_details": null,
            "total_amount": 49.5,
            "status": "processing",
            "created_at": "2024-06-01T09:15:00.5",
            "updated_at": "2024-06-02T09:15:00"
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.total_amount, Some(Price::from_cents(4950).unwrap()));
    }

    #[test]
    fn test_status_update_body() {
        assert_eq!(
            serde_json::to_value(OrderUpdate::status(OrderStatus::Completed)).unwrap(),
            json!({"status": "completed"})
        );
    }
}
