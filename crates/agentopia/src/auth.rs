//! Request authentication.
//!
//! Two credential kinds are supported:
//! - a private key, which signs `"Agentopia Auth: {address}:{timestamp}"` with
//!   EIP-191 `personal_sign` on every request
//! - an API key issued by the server, sent as-is
//!
//! Both travel in the `Authorization` header as a bearer token. Signed tokens
//! have the form `{address}:{timestamp}:{0x-signature}`.

use alloy::primitives::{Address, Signature};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::AgentopiaError;

pub const AUTH_MESSAGE_PREFIX: &str = "Agentopia Auth";

/// The exact bytes a signer commits to.
pub fn auth_message(address: Address, timestamp: u64) -> String {
    format!("{AUTH_MESSAGE_PREFIX}: {address}:{timestamp}")
}

/// Credentials attached to every authenticated request.
#[derive(Clone)]
pub enum Credentials {
    PrivateKey(PrivateKeySigner),
    ApiKey(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::PrivateKey(signer) => f
                .debug_tuple("PrivateKey")
                .field(&signer.address())
                .finish(),
            Credentials::ApiKey(_) => f.debug_tuple("ApiKey").field(&"[REDACTED]").finish(),
        }
    }
}

impl Credentials {
    /// Parse a hex private key (with or without `0x`).
    pub fn from_private_key(key: &str) -> Result<Self, AgentopiaError> {
        let signer: PrivateKeySigner = key
            .trim()
            .parse()
            .map_err(|e| AgentopiaError::Signature(format!("invalid private key: {e}")))?;
        Ok(Credentials::PrivateKey(signer))
    }

    pub fn from_api_key(key: impl Into<String>) -> Self {
        Credentials::ApiKey(key.into())
    }

    /// Address of the signing key. API keys carry no address.
    pub fn address(&self) -> Option<Address> {
        match self {
            Credentials::PrivateKey(signer) => Some(signer.address()),
            Credentials::ApiKey(_) => None,
        }
    }

    pub fn signer(&self) -> Option<&PrivateKeySigner> {
        match self {
            Credentials::PrivateKey(signer) => Some(signer),
            Credentials::ApiKey(_) => None,
        }
    }

    /// Value for the `Authorization` header, signed for the current time.
    pub fn authorization(&self) -> Result<String, AgentopiaError> {
        match self {
            Credentials::PrivateKey(signer) => {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map_err(|e| AgentopiaError::Config(format!("system time error: {e}")))?
                    .as_secs();
                sign_authorization(signer, now)
            }
            Credentials::ApiKey(key) => Ok(format!("Bearer {key}")),
        }
    }
}

/// Build a signed `Authorization` value for `timestamp`.
pub fn sign_authorization(
    signer: &PrivateKeySigner,
    timestamp: u64,
) -> Result<String, AgentopiaError> {
    let address = signer.address();
    let message = auth_message(address, timestamp);
    let sig = signer
        .sign_message_sync(message.as_bytes())
        .map_err(|e| AgentopiaError::Signature(format!("signing failed: {e}")))?;

    Ok(format!(
        "Bearer {address}:{timestamp}:{}",
        alloy::hex::encode_prefixed(sig.as_bytes())
    ))
}

/// Check a signed `Authorization` value and return the signer and timestamp.
///
/// Fails if the recovered address differs from the claimed one.
pub fn verify_authorization(header: &str) -> Result<(Address, u64), AgentopiaError> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AgentopiaError::Signature("missing bearer prefix".to_string()))?;

    let mut parts = token.splitn(3, ':');
    let (Some(address), Some(timestamp), Some(signature)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(AgentopiaError::Signature(
            "expected address:timestamp:signature".to_string(),
        ));
    };

    let claimed: Address = address
        .parse()
        .map_err(|e| AgentopiaError::Signature(format!("invalid address: {e}")))?;
    let timestamp: u64 = timestamp
        .parse()
        .map_err(|e| AgentopiaError::Signature(format!("invalid timestamp: {e}")))?;
    let sig_bytes = alloy::hex::decode(signature)
        .map_err(|e| AgentopiaError::Signature(format!("invalid signature hex: {e}")))?;
    if sig_bytes.len() != 65 {
        return Err(AgentopiaError::Signature(format!(
            "signature must be 65 bytes, got {}",
            sig_bytes.len()
        )));
    }
    let sig = Signature::from_raw(&sig_bytes)
        .map_err(|e| AgentopiaError::Signature(format!("invalid signature: {e}")))?;

    let recovered = sig
        .recover_address_from_msg(auth_message(claimed, timestamp).as_bytes())
        .map_err(|e| AgentopiaError::Signature(format!("recovery failed: {e}")))?;

    if recovered != claimed {
        return Err(AgentopiaError::Signature(format!(
            "signature recovers to {recovered}, not {claimed}"
        )));
    }
    Ok((claimed, timestamp))
}
