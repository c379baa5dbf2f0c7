//! HTML bodies for the transactional emails the store sends.
//!
//! The builders here take flat view structs rather than engine types so this crate stays free of
//! any database machinery. Callers are responsible for snapshotting the order into an
//! [`OrderEmail`] first.

use std::fmt::Write;

#[derive(Debug, Clone)]
pub struct EmailLineItem {
    pub name: String,
    pub size: String,
    pub quantity: i64,
    /// Line total, already multiplied by quantity, formatted for display.
    pub line_total: String,
}

#[derive(Debug, Clone)]
pub struct OrderEmail {
    /// Short human-facing order reference, e.g. the last digits of the order id.
    pub order_ref: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub status: String,
    pub order_date: String,
    pub total: String,
    pub items: Vec<EmailLineItem>,
}

impl OrderEmail {
    pub fn confirmation_subject(&self) -> String {
        format!("Order Confirmation - #{}", self.order_ref)
    }

    pub fn admin_subject(&self) -> String {
        format!("New Order Received - #{}", self.order_ref)
    }

    /// The confirmation email sent to the customer after a successful checkout.
    pub fn confirmation_body(&self) -> String {
        let mut rows = String::new();
        for item in &self.items {
            let _ = write!(
                rows,
                "<tr>\
                 <td style=\"padding: 10px; border-bottom: 1px solid #eee;\">{}</td>\
                 <td style=\"padding: 10px; border-bottom: 1px solid #eee; text-align: center;\">{}</td>\
                 <td style=\"padding: 10px; border-bottom: 1px solid #eee; text-align: center;\">{}</td>\
                 <td style=\"padding: 10px; border-bottom: 1px solid #eee; text-align: right;\">{}</td>\
                 </tr>",
                escape(&item.name),
                escape(&item.size),
                item.quantity,
                item.line_total,
            );
        }
        format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="margin: 0; padding: 20px; font-family: Arial, sans-serif; background-color: #f4f4f4;">
  <div style="max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 10px; overflow: hidden;">
    <div style="background: #667eea; padding: 30px; text-align: center;">
      <h1 style="margin: 0; color: #ffffff;">ThreadStore</h1>
      <p style="margin: 10px 0 0 0; color: #ffffff;">Order Confirmation</p>
    </div>
    <div style="padding: 30px;">
      <h2 style="color: #333;">Thank you for your order!</h2>
      <p style="color: #666; line-height: 1.6;">
        Hi {name},<br><br>
        Your order has been confirmed and will be shipped soon. Here are your order details:
      </p>
      <p><strong>Order Number:</strong> #{order_ref}</p>
      <p><strong>Order Date:</strong> {order_date}</p>
      <p><strong>Status:</strong> {status}</p>
      <h3 style="color: #333;">Order Items</h3>
      <table width="100%" style="border: 1px solid #eee; border-collapse: collapse;">
        <thead>
          <tr style="background-color: #f8f9fa;">
            <th style="padding: 12px; text-align: left;">Product</th>
            <th style="padding: 12px; text-align: center;">Size</th>
            <th style="padding: 12px; text-align: center;">Qty</th>
            <th style="padding: 12px; text-align: right;">Price</th>
          </tr>
        </thead>
        <tbody>{rows}</tbody>
        <tfoot>
          <tr style="background-color: #f8f9fa;">
            <td colspan="3" style="padding: 15px; text-align: right; font-weight: bold;">Total:</td>
            <td style="padding: 15px; text-align: right; font-weight: bold; color: #667eea;">{total}</td>
          </tr>
        </tfoot>
      </table>
      <h3 style="color: #333;">Shipping Address</h3>
      <p style="background-color: #f8f9fa; padding: 20px; border-radius: 8px; color: #666; line-height: 1.8;">
        <strong>{name}</strong><br>
        {street}<br>
        {city}, {state}<br>
        {pincode}<br>
        Phone: {phone}
      </p>
    </div>
  </div>
</body>
</html>"#,
            name = escape(&self.customer_name),
            order_ref = escape(&self.order_ref),
            order_date = escape(&self.order_date),
            status = escape(&self.status),
            rows = rows,
            total = self.total,
            street = escape(&self.street),
            city = escape(&self.city),
            state = escape(&self.state),
            pincode = escape(&self.pincode),
            phone = escape(&self.customer_phone),
        )
    }

    /// The heads-up email sent to the store admin when a new order lands.
    pub fn admin_body(&self) -> String {
        let mut items = String::new();
        for item in &self.items {
            let _ = write!(
                items,
                "<li>{} - Size: {}, Qty: {}, Price: {}</li>",
                escape(&item.name),
                escape(&item.size),
                item.quantity,
                item.line_total,
            );
        }
        format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="margin: 0; padding: 20px; font-family: Arial, sans-serif; background-color: #f4f4f4;">
  <div style="max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 10px; padding: 30px;">
    <h2 style="color: #667eea; margin-top: 0;">New Order Received!</h2>
    <p><strong>Order ID:</strong> #{order_ref}</p>
    <p><strong>Customer:</strong> {name}</p>
    <p><strong>Phone:</strong> {phone}</p>
    <p><strong>Total Amount:</strong> {total}</p>
    <h3>Order Items:</h3>
    <ul style="line-height: 1.8;">{items}</ul>
    <h3>Shipping Address:</h3>
    <p style="line-height: 1.8;">
      {street}<br>
      {city}, {state}<br>
      {pincode}
    </p>
  </div>
</body>
</html>"#,
            order_ref = escape(&self.order_ref),
            name = escape(&self.customer_name),
            phone = escape(&self.customer_phone),
            total = self.total,
            items = items,
            street = escape(&self.street),
            city = escape(&self.city),
            state = escape(&self.state),
            pincode = escape(&self.pincode),
        )
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
