use almoner_dispatch::TargetId;
use serde::{Deserialize, Serialize};

/// Gateway name used for donations recorded by hand.
pub const OFFLINE_GATEWAY: &str = "offline";

/// A single donation as the admin sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: TargetId,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub gateway: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    /// Admin-visible notes, oldest first.
    #[serde(default)]
    pub log: Vec<String>,
}

impl Donation {
    pub fn new(id: TargetId, status: impl Into<String>) -> Self {
        Self {
            id,
            status: status.into(),
            donor: None,
            amount: 0.0,
            gateway: String::new(),
            campaign: None,
            log: Vec::new(),
        }
    }

    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    pub fn with_donor(mut self, donor: impl Into<String>) -> Self {
        self.donor = Some(donor.into());
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn is_offline(&self) -> bool {
        self.gateway == OFFLINE_GATEWAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json() {
        let donation: Donation = serde_json::from_str(r#"{"id": 4, "status": "paid"}"#).unwrap();
        assert_eq!(donation, Donation::new(4, "paid"));
        assert!(!donation.is_offline());
    }

    #[test]
    fn test_builders_fill_optional_fields() {
        let donation = Donation::new(9, "paid").with_donor("Ada").with_amount(25.5);
        assert_eq!(donation.donor.as_deref(), Some("Ada"));
        assert_eq!(donation.amount, 25.5);

        let parsed: Donation =
            serde_json::from_str(r#"{"id": 9, "status": "paid", "donor": "Ada", "amount": 25.5}"#)
                .unwrap();
        assert_eq!(parsed, donation);
    }

    #[test]
    fn test_offline() {
        assert!(Donation::new(1, "pending").with_gateway("offline").is_offline());
    }
}
