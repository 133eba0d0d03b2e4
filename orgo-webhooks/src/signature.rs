//! Webhook signature generation and verification
//!
//! Orgo signs each delivery over `payload + "|" + secret` and sends the result
//! in the `x-webhook-signature` header. The default [`SignatureScheme::RollingHash`]
//! reproduces the platform's wire format; [`SignatureScheme::HmacSha256`] is an
//! opt-in alternative for endpoints where both sides agree on it.

use crate::{Result, WebhookError};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature. Matched case-insensitively.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Algorithm used to compute signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureScheme {
    /// 32-bit rolling hash over UTF-16 code units, lowercase hex.
    #[default]
    RollingHash,
    /// HMAC-SHA256 keyed by the secret, lowercase hex.
    HmacSha256,
}

impl std::str::FromStr for SignatureScheme {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rolling" | "rolling-hash" | "legacy" => Ok(Self::RollingHash),
            "hmac" | "hmac-sha256" => Ok(Self::HmacSha256),
            other => Err(WebhookError::Config(format!(
                "unknown signature scheme: {}",
                other
            ))),
        }
    }
}

/// Webhook signature utilities
#[derive(Clone)]
pub struct WebhookSignature {
    secret: String,
    scheme: SignatureScheme,
}

impl std::fmt::Debug for WebhookSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSignature")
            .field("secret", &"***")
            .field("scheme", &self.scheme)
            .finish()
    }
}

impl WebhookSignature {
    /// Create a new signature utility with the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            scheme: SignatureScheme::default(),
        }
    }

    /// Select the signing algorithm
    pub fn with_scheme(mut self, scheme: SignatureScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Signing algorithm in use
    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    /// Generate the signature the platform sends for `payload`
    pub fn sign(&self, payload: &str) -> String {
        let signed = format!("{}|{}", payload, self.secret);
        match self.scheme {
            SignatureScheme::RollingHash => rolling_hash(&signed),
            SignatureScheme::HmacSha256 => self.compute_hmac_sha256(signed.as_bytes()),
        }
    }

    /// Whether `signature` is exactly the expected one for `payload`
    pub fn is_valid(&self, payload: &str, signature: &str) -> bool {
        !signature.is_empty() && constant_time_compare(signature, &self.sign(payload))
    }

    /// Verify a header-supplied signature against the payload
    pub fn verify(&self, payload: &str, signature: Option<&str>) -> Result<()> {
        let signature = signature
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::SignatureMissing)?;

        if self.is_valid(payload, signature) {
            Ok(())
        } else {
            Err(WebhookError::SignatureInvalid)
        }
    }

    /// Compute HMAC-SHA256 signature
    fn compute_hmac_sha256(&self, data: &[u8]) -> String {
        let mut mac =
            HmacSha256::new_from_slice(self.secret.as_bytes()).expect("HMAC can take any size key");
        mac.update(data);
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Verify `signature` for `payload` with an optional secret.
///
/// Without a secret (absent or empty) there is nothing to check and the
/// payload is accepted.
pub fn verify_signature(payload: &str, signature: Option<&str>, secret: Option<&str>) -> Result<()> {
    match secret.filter(|s| !s.is_empty()) {
        Some(secret) => WebhookSignature::new(secret).verify(payload, signature),
        None => Ok(()),
    }
}

/// `h = (h << 5) - h + c` over UTF-16 code units, wrapping at 32 bits.
fn rolling_hash(input: &str) -> String {
    let hash = input.encode_utf16().fold(0i32, |h, unit| {
        (h << 5).wrapping_sub(h).wrapping_add(i32::from(unit))
    });
    // Widen before abs so i32::MIN does not overflow.
    format!("{:x}", i64::from(hash).abs())
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_hash_known_vectors() {
        assert_eq!(rolling_hash("a|b"), "17b87");
        assert_eq!(rolling_hash("|"), "7c");
        assert_eq!(rolling_hash("hello world|secret"), "a4bc518");
        assert_eq!(
            rolling_hash(r#"{"id":"evt_1","event":"user.created"}|s3cret"#),
            "7b5fbd81"
        );
        // Non-ASCII input hashes UTF-16 code units, not bytes.
        assert_eq!(rolling_hash("héllo ✓|k"), "28173390");
    }

    #[test]
    fn test_sign_matches_wire_format() {
        let signer = WebhookSignature::new("s3cret");
        assert_eq!(
            signer.sign(r#"{"id":"evt_1","event":"user.created"}"#),
            "7b5fbd81"
        );
        assert_eq!(WebhookSignature::new("").sign(""), "7c");
    }

    #[test]
    fn test_sign_and_verify() {
        for scheme in [SignatureScheme::RollingHash, SignatureScheme::HmacSha256] {
            let signer = WebhookSignature::new("test-secret").with_scheme(scheme);
            let payload = r#"{"id":"evt_1"}"#;

            let signature = signer.sign(payload);
            assert!(signer.verify(payload, Some(&signature)).is_ok());
        }
    }

    #[test]
    fn test_hmac_is_hex_sha256() {
        let signature = WebhookSignature::new("key")
            .with_scheme(SignatureScheme::HmacSha256)
            .sign("payload");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_flipped_character_is_invalid() {
        let signer = WebhookSignature::new("test-secret");
        let payload = "test payload";
        let signature = signer.sign(payload);

        let mut flipped: Vec<char> = signature.chars().collect();
        flipped[0] = if flipped[0] == '0' { '1' } else { '0' };
        let flipped: String = flipped.into_iter().collect();

        assert!(!signer.is_valid(payload, &flipped));
        assert!(matches!(
            signer.verify(payload, Some(&flipped)),
            Err(WebhookError::SignatureInvalid)
        ));
    }

    #[test]
    fn test_missing_signature() {
        let signer = WebhookSignature::new("test-secret");

        assert!(matches!(
            signer.verify("payload", None),
            Err(WebhookError::SignatureMissing)
        ));
        assert!(matches!(
            signer.verify("payload", Some("")),
            Err(WebhookError::SignatureMissing)
        ));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let signature = WebhookSignature::new("secret1").sign("test payload");
        let result = WebhookSignature::new("secret2").verify("test payload", Some(&signature));
        assert!(matches!(result, Err(WebhookError::SignatureInvalid)));
    }

    #[test]
    fn test_verify_signature_without_secret() {
        assert!(verify_signature("anything", None, None).is_ok());
        assert!(verify_signature("anything", None, Some("")).is_ok());
        assert!(verify_signature("anything", Some(""), Some("secret")).is_err());
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("hmac".parse::<SignatureScheme>().unwrap(), SignatureScheme::HmacSha256);
        assert_eq!(
            "rolling".parse::<SignatureScheme>().unwrap(),
            SignatureScheme::RollingHash
        );
        assert!("md5".parse::<SignatureScheme>().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", WebhookSignature::new("super-secret"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "ab"));
        assert!(!constant_time_compare("", "a"));
    }
}
