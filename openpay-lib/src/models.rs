//! Data models shared by the directory, resolver and HTTP facade.

use serde::{Deserialize, Serialize};

/// A directory entry mapping an alias to a wallet URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasRecord {
    /// Row identifier, assigned on insert and never reused
    pub id: u64,
    /// Unique, case-sensitive alias
    #[serde(rename = "publicName")]
    pub alias: String,
    /// Wallet endpoint the alias points at
    pub wallet_url: String,
}

/// Wallet address document as served by an Open Payments wallet endpoint.
///
/// Every field is optional; the resolver passes through what the remote
/// returns and nothing else.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_server: Option<String>,
}

/// Resolved wallet: directory entry plus remote wallet metadata.
///
/// Built fresh on every resolve and never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDescriptor {
    /// Wallet address identifier reported by the remote
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Alias the wallet was resolved from (empty when fetched by URL)
    pub public_name: String,
    /// Wallet endpoint that was fetched
    pub wallet_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_server: Option<String>,
}

impl WalletDescriptor {
    /// Combine a directory entry with the fetched wallet address document.
    pub fn from_parts(
        public_name: impl Into<String>,
        wallet_url: impl Into<String>,
        remote: WalletAddress,
    ) -> Self {
        Self {
            id: remote.id,
            public_name: public_name.into(),
            wallet_url: wallet_url.into(),
            asset_code: remote.asset_code,
            asset_scale: remote.asset_scale,
            auth_server: remote.auth_server,
            resource_server: remote.resource_server,
        }
    }

    /// Convert a decimal amount into the wallet's smallest unit.
    ///
    /// Returns `None` when the asset scale is unknown or the result does not
    /// fit in a `u64`.
    pub fn to_base_units(&self, amount: f64) -> Option<u64> {
        let scale = i32::try_from(self.asset_scale?).ok()?;
        let scaled = (amount * 10f64.powi(scale)).round();
        if !scaled.is_finite() || scaled < 0.0 || scaled > u64::MAX as f64 {
            return None;
        }
        Some(scaled as u64)
    }
}

/// A validated request to initiate a payment from an alias.
#[derive(Clone, Debug, PartialEq)]
pub struct SendRequest {
    /// Sender alias
    pub sender: String,
    /// Decimal amount; must be finite and positive
    pub amount: f64,
    /// Optional recipient wallet, fetched with the same rules as the sender
    pub recipient_wallet_url: Option<String>,
}

impl SendRequest {
    pub fn new(sender: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            amount,
            recipient_wallet_url: None,
        }
    }

    pub fn with_recipient(mut self, wallet_url: impl Into<String>) -> Self {
        self.recipient_wallet_url = Some(wallet_url.into());
        self
    }
}

/// Result of a send operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    /// Always "initiated"; settlement is not tracked here
    pub status: String,
    /// Resolved sender wallet
    pub sender: WalletDescriptor,
    /// Recipient wallet, when a recipient URL was supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<WalletDescriptor>,
    /// Amount as requested
    pub amount: f64,
    /// Amount in the sender asset's smallest unit, when its scale is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_in_base_units: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(scale: Option<u32>) -> WalletDescriptor {
        WalletDescriptor::from_parts(
            "alice_wallet",
            "https://example.test/alice",
            WalletAddress {
                asset_scale: scale,
                ..WalletAddress::default()
            },
        )
    }

    #[test]
    fn test_alias_record_json_shape() {
        let record = AliasRecord {
            id: 1,
            alias: "alice_wallet".to_string(),
            wallet_url: "https://example.test/alice".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["publicName"], "alice_wallet");
        assert_eq!(json["walletUrl"], "https://example.test/alice");
    }

    #[test]
    fn test_descriptor_omits_absent_fields() {
        let json = serde_json::to_value(descriptor(None)).unwrap();
        assert_eq!(json["publicName"], "alice_wallet");
        assert!(json.get("assetCode").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_base_units() {
        assert_eq!(descriptor(Some(2)).to_base_units(10.0), Some(1000));
        assert_eq!(descriptor(Some(2)).to_base_units(12.34), Some(1234));
        assert_eq!(descriptor(Some(0)).to_base_units(7.4), Some(7));
        assert_eq!(descriptor(None).to_base_units(10.0), None);
        assert_eq!(descriptor(Some(2)).to_base_units(f64::MAX), None);
    }
}
