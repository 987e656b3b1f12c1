//! Webhook signature verification
//!
//! Neynar signs each delivery with HMAC-SHA512 over the raw request body and
//! sends the hex digest in `X-Neynar-Signature`. The body must be verified as
//! bytes before anything parses it.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha512 = Hmac<Sha512>;

/// Reasons a delivery is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("webhook secret is not configured")]
    MissingSecret,

    #[error("signature header is missing")]
    MissingSignature,

    #[error("signature header is not valid hex")]
    MalformedSignature,

    #[error("signature does not match payload")]
    Mismatch,
}

/// HMAC-SHA512 verifier bound to one shared secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Option<Vec<u8>>,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier").field("configured", &self.secret.is_some()).finish()
    }
}

impl WebhookVerifier {
    /// Create a verifier. `None` or an empty secret rejects every delivery.
    #[must_use]
    pub fn new(secret: Option<&str>) -> Self {
        let secret = secret.filter(|s| !s.is_empty()).map(|s| s.as_bytes().to_vec());
        Self { secret }
    }

    /// Hex HMAC-SHA512 of `body`, or `None` without a secret.
    #[must_use]
    pub fn sign(&self, body: &[u8]) -> Option<String> {
        let mac = self.mac(body)?;
        Some(hex::encode(mac.finalize().into_bytes()))
    }

    /// Authenticate `body` against the received signature header.
    ///
    /// On success returns the body untouched so callers parse only verified
    /// bytes.
    pub fn verify<'a>(
        &self,
        body: &'a [u8],
        signature: Option<&str>,
    ) -> Result<&'a [u8], SignatureError> {
        let mac = self.mac(body).ok_or(SignatureError::MissingSecret)?;

        let signature = signature.map(str::trim).filter(|s| !s.is_empty());
        let signature = signature.ok_or(SignatureError::MissingSignature)?;
        let received = hex::decode(signature).map_err(|_| SignatureError::MalformedSignature)?;

        let computed = mac.finalize().into_bytes();
        if computed.as_slice().ct_eq(&received).into() {
            Ok(body)
        } else {
            Err(SignatureError::Mismatch)
        }
    }

    fn mac(&self, body: &[u8]) -> Option<HmacSha512> {
        let secret = self.secret.as_deref()?;
        // HMAC accepts keys of any length.
        let mut mac = HmacSha512::new_from_slice(secret).ok()?;
        mac.update(body);
        Some(mac)
    }
}
