//! PKCE (Proof Key for Code Exchange) implementation for OAuth 2.0
//!
//! Implements the S256 method of RFC 7636.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Random bytes behind a code verifier (43 base64url characters).
const VERIFIER_BYTES: usize = 32;

/// Random bytes behind a state token (22 base64url characters).
const STATE_BYTES: usize = 16;

fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a cryptographically secure code verifier
///
/// Returns a URL-safe base64-encoded random string of 32 bytes (43 characters).
/// Per RFC 7636, verifiers must be 43-128 characters long.
#[must_use]
pub fn generate_code_verifier() -> String {
    random_token(VERIFIER_BYTES)
}

/// Generate code challenge from verifier using SHA256
///
/// Per RFC 7636, the challenge is BASE64URL(SHA256(ASCII(code_verifier))).
/// Deterministic, always 43 characters.
#[must_use]
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Generate a random anti-CSRF state token (16 bytes).
#[must_use]
pub fn generate_state() -> String {
    random_token(STATE_BYTES)
}

/// PKCE challenge pair for OAuth 2.0 authorization
///
/// Contains the code verifier (sent during token exchange), the code
/// challenge (sent during the authorization request) and the state value
/// that keys the pending session.
#[derive(Debug, Clone)]
pub struct PKCEChallenge {
    /// Random string (43 chars, base64url encoded)
    /// Kept secret until token exchange
    pub code_verifier: String,

    /// SHA256 hash of code_verifier (base64url encoded)
    pub code_challenge: String,

    /// Random CSRF protection token
    pub state: String,
}

impl PKCEChallenge {
    /// Generate a new PKCE challenge with cryptographically secure random
    /// values
    ///
    /// # Examples
    /// ```
    /// use castbridge_common::auth::pkce::PKCEChallenge;
    ///
    /// let challenge = PKCEChallenge::generate();
    /// assert_eq!(challenge.code_verifier.len(), 43);
    /// assert_eq!(challenge.challenge_method(), "S256");
    /// ```
    #[must_use]
    pub fn generate() -> Self {
        let code_verifier = generate_code_verifier();
        let code_challenge = generate_code_challenge(&code_verifier);
        let state = generate_state();

        Self { code_verifier, code_challenge, state }
    }

    /// Get the challenge method (always "S256" for SHA256)
    #[must_use]
    pub fn challenge_method(&self) -> &'static str {
        "S256"
    }
}
