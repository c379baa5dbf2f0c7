use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use cashfree_tools::CashfreeApiError;
use storefront_engine::traits::{CatalogApiError, OrderFlowError, OrderQueryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("{0}")]
    CannotPlaceOrder(String),
    #[error("Insufficient stock for {product} ({size}). {available} left, {requested} requested.")]
    InsufficientStock { product: String, size: String, available: i64, requested: i64 },
    #[error("Order payment has not been verified. {0}")]
    PaymentNotVerified(String),
    #[error("Cannot change order status. {0}")]
    InvalidStatusChange(String),
    #[error("Webhook signature is invalid or missing.")]
    InvalidSignature,
    #[error("The payment gateway returned an error. {0}")]
    PaymentGatewayError(String),
    #[error("Review was rejected. {0}")]
    InvalidReview(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::BAD_REQUEST,
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::CannotPlaceOrder(_) => StatusCode::BAD_REQUEST,
            Self::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            Self::PaymentNotVerified(_) => StatusCode::BAD_REQUEST,
            Self::InvalidStatusChange(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSignature => StatusCode::BAD_REQUEST,
            Self::PaymentGatewayError(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidReview(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "success": false, "message": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("Access token signature is invalid. {0}")]
    ValidationError(String),
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("No access token was provided.")]
    MissingToken,
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            OrderFlowError::InvalidOrder(e) => Self::CannotPlaceOrder(e.to_string()),
            OrderFlowError::PaymentNotVerified(s) => Self::PaymentNotVerified(s),
            OrderFlowError::ProductNotFound(id) => Self::NoRecordFound(format!("Product {id} does not exist.")),
            OrderFlowError::InsufficientStock { product, size, available, requested } => {
                Self::InsufficientStock { product, size: size.to_string(), available, requested }
            },
            OrderFlowError::OrderNotFound(id) => Self::NoRecordFound(format!("Order {id} does not exist.")),
            OrderFlowError::InvalidTransition { id, from, to } => {
                Self::InvalidStatusChange(format!("Order {id} cannot move from {from} to {to}."))
            },
            OrderFlowError::Forbidden => Self::InsufficientPermissions("You do not own this order.".to_string()),
        }
    }
}

impl From<OrderQueryError> for ServerError {
    fn from(e: OrderQueryError) -> Self {
        match e {
            OrderQueryError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            OrderQueryError::OrderNotFound(id) => Self::NoRecordFound(format!("Order {id} does not exist.")),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            CatalogApiError::ProductNotFound(id) => Self::NoRecordFound(format!("Product {id} does not exist.")),
            CatalogApiError::AlreadyReviewed => {
                Self::InvalidReview("You have already reviewed this product.".to_string())
            },
            CatalogApiError::NotEligible => {
                Self::InvalidReview("You can only review products you have purchased.".to_string())
            },
            CatalogApiError::InvalidReview(e) => Self::InvalidReview(e.to_string()),
        }
    }
}

impl From<CashfreeApiError> for ServerError {
    fn from(e: CashfreeApiError) -> Self {
        Self::PaymentGatewayError(e.to_string())
    }
}
