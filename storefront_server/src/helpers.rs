use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the gateway's webhook signature: HMAC-SHA256 over `timestamp + body`, base64-encoded.
pub fn webhook_signature(secret: &str, timestamp: &str, body: &[u8]) -> String {
    // HMAC-SHA256 accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take a key of any size");
    mac.update(timestamp.as_bytes());
    mac.update(body);
    base64::encode(mac.finalize().into_bytes())
}

/// Constant-time check of the `x-webhook-signature` header value against the expected signature.
pub fn verify_webhook_signature(secret: &str, timestamp: &str, body: &[u8], signature: &str) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(timestamp.as_bytes());
    mac.update(body);
    let Ok(signature) = base64::decode(signature) else {
        return false;
    };
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod test {
    use super::*;

    const SECRET: &str = "cf_test_secret";
    const BODY: &[u8] = br#"{"type":"PAYMENT_SUCCESS_WEBHOOK","data":{}}"#;

    #[test]
    fn signature_round_trip() {
        let sig = webhook_signature(SECRET, "1717245000", BODY);
        assert!(verify_webhook_signature(SECRET, "1717245000", BODY, &sig));
    }

    #[test]
    fn altered_body_fails_verification() {
        let sig = webhook_signature(SECRET, "1717245000", BODY);
        assert!(!verify_webhook_signature(SECRET, "1717245000", b"{}", &sig));
    }

    #[test]
    fn altered_timestamp_fails_verification() {
        let sig = webhook_signature(SECRET, "1717245000", BODY);
        assert!(!verify_webhook_signature(SECRET, "1717245001", BODY, &sig));
    }

    #[test]
    fn garbage_signatures_fail_verification() {
        assert!(!verify_webhook_signature(SECRET, "1717245000", BODY, "not-base64!!"));
    }
}
