use mockall::mock;
use storefront_engine::{
    catalog_objects::ProductDetail,
    db_types::{
        NewOrder,
        NewPaymentConfirmation,
        NewProduct,
        NewReview,
        Order,
        OrderItem,
        OrderStatus,
        PaymentConfirmation,
        Product,
        Review,
    },
    order_objects::{OrderQueryFilter, StatusChange},
    traits::{
        CatalogApiError,
        CatalogManagement,
        OrderFlowDatabase,
        OrderFlowError,
        OrderManagement,
        OrderQueryError,
    },
};

mock! {
    pub Backend {}

    impl Clone for Backend {
        fn clone(&self) -> Self;
    }

    impl OrderManagement for Backend {
        async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderQueryError>;
        async fn fetch_order_by_gateway_id(&self, gateway_order_id: &str) -> Result<Option<Order>, OrderQueryError>;
        async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, OrderQueryError>;
        async fn fetch_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderQueryError>;
        async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderQueryError>;
    }

    impl OrderFlowDatabase for Backend {
        fn url(&self) -> &str;
        async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), OrderFlowError>;
        async fn set_order_status(&self, order_id: i64, new_status: OrderStatus) -> Result<StatusChange, OrderFlowError>;
        async fn record_payment_confirmation(
            &self,
            confirmation: NewPaymentConfirmation,
        ) -> Result<(PaymentConfirmation, bool), OrderFlowError>;
        async fn fetch_payment_confirmation(
            &self,
            gateway_order_id: &str,
        ) -> Result<Option<PaymentConfirmation>, OrderFlowError>;
    }

    impl CatalogManagement for Backend {
        async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;
        async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError>;
        async fn fetch_product_detail(&self, id: i64) -> Result<Option<ProductDetail>, CatalogApiError>;
        async fn add_review(&self, review: NewReview) -> Result<Review, CatalogApiError>;
        async fn has_purchased(&self, customer_id: &str, product_id: i64) -> Result<bool, CatalogApiError>;
    }
}
