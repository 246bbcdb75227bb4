use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::UsdcAmount;

/// Ledger balance for one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub available_balance: UsdcAmount,
    #[serde(default)]
    pub amount_on_hold: UsdcAmount,
}

/// A provisional reservation of funds made before a billed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hold {
    pub id: Uuid,
    pub service_id: Uuid,
    pub amount: UsdcAmount,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for `POST /v1/hold`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateHoldRequest {
    pub service_id: Uuid,
    pub amount: UsdcAmount,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl WithdrawalStatus {
    /// `true` once the server will no longer change the status.
    pub fn is_terminal(self) -> bool {
        matches!(self, WithdrawalStatus::Completed | WithdrawalStatus::Failed)
    }
}

/// An on-chain payout of ledger balance back to the owner's wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: Uuid,
    pub amount: UsdcAmount,
    pub status: WithdrawalStatus,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Request body for `POST /v1/withdrawal`.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawRequest {
    pub amount: UsdcAmount,
}

/// An API key scoped to the issuing account. `key` is only returned on create.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("key", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Request body for `POST /v1/api-key`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_balance_defaults_hold_to_zero() {
        let balance: Balance =
            serde_json::from_value(json!({"available_balance": 10000000})).unwrap();
        assert_eq!(balance.available_balance.units(), 10_000_000);
        assert_eq!(balance.amount_on_hold, UsdcAmount::ZERO);
    }

    #[test]
    fn test_withdrawal_status_wire_format() {
        let w: Withdrawal = serde_json::from_value(json!({
            "id": "5b0c7f36-1111-4c4c-8f8f-0123456789ab",
            "amount": "250000",
            "status": "completed",
            "transaction_hash": "0xabc"
        }))
        .unwrap();
        assert_eq!(w.status, WithdrawalStatus::Completed);
        assert!(w.status.is_terminal());
        assert!(!WithdrawalStatus::Processing.is_terminal());
        assert_eq!(
            serde_json::to_value(WithdrawalStatus::Pending).unwrap(),
            json!("pending")
        );
    }

    #[test]
    fn test_api_key_debug_redacts_secret() {
        let key = ApiKey {
            id: Uuid::nil(),
            name: "test-api-key".to_string(),
            key: "ak_live_secret".to_string(),
            created_at: None,
        };
        let debug = format!("{key:?}");
        assert!(!debug.contains("ak_live_secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
