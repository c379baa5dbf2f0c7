use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use cashfree_tools::CashfreeApi;
use log::*;
use sendgrid_tools::{EmailLineItem, MailApi, OrderEmail};
use storefront_engine::{
    db_types::{Order, OrderItem},
    events::{EventHandlers, EventHooks, EventProducers},
    CatalogApi,
    OrderFlowApi,
    OrderQueryApi,
    SqliteDatabase,
};

use crate::{
    auth::TokenVerifier,
    broadcaster::{OrderBroadcaster, OrderEvent},
    config::ServerConfig,
    errors::ServerError,
    routes::{configure_catalog, configure_orders, configure_payments, health, webhook_route},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let broadcaster = OrderBroadcaster::new();
    let mailer = MailApi::new(config.mailer.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(10, side_effect_hooks(mailer, broadcaster.clone()));
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers, broadcaster)?;
    srv.await.map_err(|e| ServerError::InitializeError(e.to_string()))
}

/// Wires up the post-commit side effects: confirmation and admin emails, and the realtime broadcast. All of
/// them are best-effort; failures are logged and never propagate back into the order flow.
pub fn side_effect_hooks(mailer: MailApi, broadcaster: OrderBroadcaster) -> EventHooks {
    let mut hooks = EventHooks::default();
    let status_broadcaster = broadcaster.clone();
    hooks.on_order_created(move |event| {
        let mailer = mailer.clone();
        let broadcaster = broadcaster.clone();
        Box::pin(async move {
            broadcaster.publish(OrderEvent::OrderCreated { order: event.order.clone(), items: event.items.clone() });
            if !mailer.is_enabled() {
                return;
            }
            let email = order_email(&event.order, &event.items);
            match &event.customer_email {
                Some(to) => {
                    if let Err(e) = mailer.send_order_confirmation(to, &email).await {
                        warn!("📧 Could not send the confirmation email for order #{}. {e}", event.order.id);
                    }
                },
                None => warn!("📧 Order #{} has no customer email on record. Skipping confirmation.", event.order.id),
            }
            if let Err(e) = mailer.send_admin_alert(&email).await {
                warn!("📧 Could not send the admin alert for order #{}. {e}", event.order.id);
            }
        })
    });
    hooks.on_order_status_changed(move |event| {
        let broadcaster = status_broadcaster.clone();
        Box::pin(async move {
            broadcaster.publish(OrderEvent::OrderStatusChanged { old_status: event.old_status, order: event.order });
        })
    });
    hooks
}

/// Snapshots an order into the flat view the mailer templates consume.
fn order_email(order: &Order, items: &[OrderItem]) -> OrderEmail {
    let items = items
        .iter()
        .map(|item| EmailLineItem {
            name: item.name.clone(),
            size: item.size.to_string(),
            quantity: item.quantity,
            line_total: (item.price * item.quantity).to_string(),
        })
        .collect();
    OrderEmail {
        order_ref: format!("{:06}", order.id),
        customer_name: order.customer_info.name.clone(),
        customer_phone: order.customer_info.phone.clone(),
        street: order.customer_info.address.street.clone(),
        city: order.customer_info.address.city.clone(),
        state: order.customer_info.address.state.clone(),
        pincode: order.customer_info.address.pincode.clone(),
        status: order.status.to_string(),
        order_date: order.created_at.format("%d %b %Y").to_string(),
        total: order.total_price.to_string(),
        items,
    }
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
    broadcaster: OrderBroadcaster,
) -> Result<Server, ServerError> {
    let gateway =
        CashfreeApi::new(config.cashfree.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let webhook_secret = config.cashfree.api_secret.clone();
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let order_flow_api = OrderFlowApi::new(db.clone(), producers.clone());
        let order_query_api = OrderQueryApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let verifier = TokenVerifier::new(config.auth.clone());
        let api_scope = web::scope("/api")
            .configure(configure_orders::<SqliteDatabase>)
            .configure(configure_catalog::<SqliteDatabase>)
            .configure(configure_payments::<SqliteDatabase>)
            .service(webhook_route::<SqliteDatabase>(webhook_secret.clone(), true));
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("tss::access_log"))
            .app_data(web::Data::new(order_flow_api))
            .app_data(web::Data::new(order_query_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(verifier))
            .app_data(web::Data::new(broadcaster.clone()))
            .app_data(web::Data::new(config.clone()))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
