//! Data types as they are stored in the database, plus the validation rules that gate what is
//! allowed in.

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use ts_common::Rupees;

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static PINCODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

#[derive(Debug, Clone, Error)]
#[error("Validation failed: {0}")]
pub struct ValidationError(pub String);

//--------------------------------------        Size          ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
pub enum Size {
    XS,
    S,
    M,
    L,
    XL,
    XXL,
}

impl Size {
    pub const ALL: [Size; 6] = [Size::XS, Size::S, Size::M, Size::L, Size::XL, Size::XXL];
}

impl Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Size::XS => "XS",
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::XL => "XL",
            Size::XXL => "XXL",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

impl FromStr for Size {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "XS" => Ok(Self::XS),
            "S" => Ok(Self::S),
            "M" => Ok(Self::M),
            "L" => Ok(Self::L),
            "XL" => Ok(Self::XL),
            "XXL" => Ok(Self::XXL),
            s => Err(ConversionError(format!("Invalid size: {s}"))),
        }
    }
}

//--------------------------------------      Category        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum Category {
    #[sqlx(rename = "T-Shirt")]
    #[serde(rename = "T-Shirt")]
    TShirt,
    Hoodie,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::TShirt => write!(f, "T-Shirt"),
            Category::Hoodie => write!(f, "Hoodie"),
        }
    }
}

//--------------------------------------     OrderStatus      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatus {
    /// The order has been placed and paid for, but not shipped yet.
    Pending,
    /// The order has left the warehouse.
    Shipped,
    /// The order has arrived at the customer.
    Delivered,
    /// The order was cancelled before shipping. Stock has been returned.
    Cancelled,
}

impl OrderStatus {
    /// The complete set of legal status transitions. Everything not listed here is rejected,
    /// including no-op transitions to the current status.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!((self, next), (Pending, Shipped) | (Pending, Cancelled) | (Shipped, Delivered))
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Shipped => write!(f, "Shipped"),
            OrderStatus::Delivered => write!(f, "Delivered"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------    PaymentStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Success => write!(f, "Success"),
            PaymentStatus::Failed => write!(f, "Failed"),
        }
    }
}

//--------------------------------------       Address        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl Address {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.street.trim().is_empty() ||
            self.city.trim().is_empty() ||
            self.state.trim().is_empty()
        {
            return Err(ValidationError("Shipping address is incomplete".to_string()));
        }
        if !PINCODE_REGEX.is_match(&self.pincode) {
            return Err(ValidationError(format!("Invalid pincode: {}", self.pincode)));
        }
        Ok(())
    }
}

//--------------------------------------    CustomerInfo      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    #[sqlx(flatten)]
    pub address: Address,
}

impl CustomerInfo {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError("Customer name is required".to_string()));
        }
        if !PHONE_REGEX.is_match(&self.phone) {
            return Err(ValidationError(format!("Invalid phone number: {}", self.phone)));
        }
        self.address.validate()
    }
}

//--------------------------------------     PaymentInfo      ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    /// The order id assigned by the payment gateway. Unique per order.
    pub gateway_order_id: String,
    pub payment_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

//--------------------------------------        Order         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_id: String,
    #[sqlx(flatten)]
    pub customer_info: CustomerInfo,
    pub total_price: Rupees,
    pub status: OrderStatus,
    #[sqlx(flatten)]
    pub payment: PaymentInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_id: String,
    /// Where the order confirmation email goes. Comes from the auth claims, never stored.
    pub customer_email: Option<String>,
    pub customer_info: CustomerInfo,
    pub items: Vec<NewOrderItem>,
    pub total_price: Rupees,
    pub payment: PaymentInfo,
}

impl NewOrder {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customer_id.trim().is_empty() {
            return Err(ValidationError("Customer id is required".to_string()));
        }
        if self.items.is_empty() {
            return Err(ValidationError("An order must contain at least one item".to_string()));
        }
        for item in &self.items {
            item.validate()?;
        }
        if self.total_price.is_negative() {
            return Err(ValidationError("Order total cannot be negative".to_string()));
        }
        if self.payment.gateway_order_id.trim().is_empty() {
            return Err(ValidationError("Payment gateway order id is required".to_string()));
        }
        self.customer_info.validate()
    }
}

//--------------------------------------     OrderItem        ---------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product_id: i64,
    pub name: String,
    pub price: Rupees,
    #[serde(default)]
    pub image: String,
    pub quantity: i64,
    pub size: Size,
}

impl NewOrderItem {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity < 1 {
            return Err(ValidationError(format!(
                "Invalid quantity {} for product {}",
                self.quantity, self.name
            )));
        }
        if self.price.is_negative() {
            return Err(ValidationError(format!("Invalid price for product {}", self.name)));
        }
        Ok(())
    }
}

/// A purchased line item, snapshotted at the time the order was placed.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub name: String,
    pub price: Rupees,
    pub image: String,
    pub quantity: i64,
    pub size: Size,
}

//--------------------------------------       Product        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Rupees,
    pub category: Category,
    /// Arithmetic mean of review ratings. Zero when there are no reviews.
    pub rating: f64,
    pub num_reviews: i64,
    pub featured: bool,
    pub trending: bool,
    pub new_arrival: bool,
    pub best_seller: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Rupees,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<SizeStock>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub trending: bool,
    #[serde(default)]
    pub new_arrival: bool,
    #[serde(default)]
    pub best_seller: bool,
}

#[derive(Debug, Clone, Copy, FromRow, Serialize, Deserialize)]
pub struct SizeStock {
    pub size: Size,
    pub stock: i64,
}

//--------------------------------------       Review         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub product_id: i64,
    pub customer_id: String,
    pub customer_name: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub product_id: i64,
    pub customer_id: String,
    pub customer_name: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError(format!("Rating must be between 1 and 5, got {}", self.rating)));
        }
        if self.customer_id.trim().is_empty() {
            return Err(ValidationError("Customer id is required".to_string()));
        }
        Ok(())
    }
}

//--------------------------------------  PaymentConfirmation -------------------------------------------------------
/// The server-side record of a "payment succeeded" event from the gateway. The webhook is the
/// authoritative source for these; the client-driven verify poll is the fallback path.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub gateway_order_id: String,
    pub payment_id: Option<String>,
    pub amount: Option<Rupees>,
    pub payment_method: Option<String>,
    pub confirmed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentConfirmation {
    pub gateway_order_id: String,
    pub payment_id: Option<String>,
    pub amount: Option<Rupees>,
    pub payment_method: Option<String>,
}
