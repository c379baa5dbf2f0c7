use chrono::Utc;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Generate a locally-unique order id to hand to the payment gateway.
///
/// The id doubles as the idempotency key for order creation, so it must be unique per checkout attempt. A millisecond
/// timestamp plus nine random alphanumerics is comfortably collision-free at storefront traffic levels.
pub fn new_gateway_order_id() -> String {
    let nonce: String = thread_rng().sample_iter(&Alphanumeric).take(9).map(char::from).collect();
    format!("order_{}_{}", Utc::now().timestamp_millis(), nonce.to_lowercase())
}
