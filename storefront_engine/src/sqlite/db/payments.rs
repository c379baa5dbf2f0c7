use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{NewPaymentConfirmation, PaymentConfirmation};

/// Inserts the confirmation, returning `false` in the second element if one already exists for
/// the gateway order id. The first delivery wins; redeliveries do not overwrite.
pub async fn idempotent_insert(
    confirmation: NewPaymentConfirmation,
    conn: &mut SqliteConnection,
) -> Result<(PaymentConfirmation, bool), sqlx::Error> {
    let inserted = match fetch_confirmation(&confirmation.gateway_order_id, conn).await? {
        Some(existing) => (existing, false),
        None => {
            let confirmation = insert_confirmation(confirmation, conn).await?;
            debug!("📝️ Payment confirmation recorded for gateway order {}", confirmation.gateway_order_id);
            (confirmation, true)
        },
    };
    Ok(inserted)
}

async fn insert_confirmation(
    confirmation: NewPaymentConfirmation,
    conn: &mut SqliteConnection,
) -> Result<PaymentConfirmation, sqlx::Error> {
    let confirmation = sqlx::query_as(
        r#"
            INSERT INTO payment_confirmations (gateway_order_id, payment_id, amount, payment_method)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(confirmation.gateway_order_id)
    .bind(confirmation.payment_id)
    .bind(confirmation.amount)
    .bind(confirmation.payment_method)
    .fetch_one(conn)
    .await?;
    Ok(confirmation)
}

pub async fn fetch_confirmation(
    gateway_order_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentConfirmation>, sqlx::Error> {
    let confirmation = sqlx::query_as("SELECT * FROM payment_confirmations WHERE gateway_order_id = $1")
        .bind(gateway_order_id)
        .fetch_optional(conn)
        .await?;
    Ok(confirmation)
}
