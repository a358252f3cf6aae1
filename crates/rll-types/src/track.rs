use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::validate_entity_id;

/// Upper bound for the sum of a track's beneficiary percentages.
pub const MAX_PERCENTAGE_TOTAL: u64 = 100;

/// An account entitled to a share of a track's play revenue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    /// Id of the receiving [`Account`](crate::Account).
    pub account_id: String,
    /// Share of the price in parts per hundred.
    pub percentage: u32,
}

impl Beneficiary {
    pub fn new(account_id: impl Into<String>, percentage: u32) -> Self {
        Self {
            account_id: account_id.into(),
            percentage,
        }
    }
}

/// A registered media asset.
///
/// Tracks are immutable once stored. `content` is opaque to the ledger: it
/// may be a content hash or a locator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub content: String,
    /// Price of one play in the smallest currency unit.
    pub price: u64,
    /// Beneficiaries in payout order.
    pub beneficiaries: Vec<Beneficiary>,
}

impl Track {
    /// Sum of all beneficiary percentages, computed without overflow.
    pub fn percentage_total(&self) -> u64 {
        self.beneficiaries
            .iter()
            .map(|b| u64::from(b.percentage))
            .sum()
    }

    /// Validate the structural invariants of a track.
    ///
    /// - `id` is a usable entity key
    /// - every beneficiary names a non-empty, non-reserved account id
    /// - no account is listed twice
    /// - percentages sum to at most [`MAX_PERCENTAGE_TOTAL`]
    ///
    /// Whether the beneficiary accounts exist is checked by the ledger, not
    /// here.
    pub fn validate(&self) -> Result<(), TypeError> {
        validate_entity_id("track id", &self.id)?;

        let mut seen = BTreeSet::new();
        for beneficiary in &self.beneficiaries {
            validate_entity_id("beneficiary accountId", &beneficiary.account_id)?;
            if !seen.insert(beneficiary.account_id.as_str()) {
                return Err(TypeError::DuplicateBeneficiary {
                    track: self.id.clone(),
                    account: beneficiary.account_id.clone(),
                });
            }
        }

        let total = self.percentage_total();
        if total > MAX_PERCENTAGE_TOTAL {
            return Err(TypeError::PercentageOverflow {
                track: self.id.clone(),
                total,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn track(beneficiaries: Vec<Beneficiary>) -> Track {
        Track {
            id: "t1".into(),
            title: "Song".into(),
            artist: "Band".into(),
            content: "ipfs://abc".into(),
            price: 100,
            beneficiaries,
        }
    }

    #[test]
    fn decodes_camel_case_fields() {
        let json = r#"{
            "id": "t1", "title": "Song", "artist": "Band",
            "content": "ipfs://abc", "price": 250,
            "beneficiaries": [{"accountId": "a", "percentage": 40}]
        }"#;
        let t: Track = serde_json::from_str(json).unwrap();
        assert_eq!(t.price, 250);
        assert_eq!(t.beneficiaries, vec![Beneficiary::new("a", 40)]);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{
            "id": "t1", "title": "Song", "artist": "Band", "content": "c",
            "price": 1, "beneficiaries": [], "genre": "jazz"
        }"#;
        assert!(serde_json::from_str::<Track>(json).is_ok());
    }

    #[test]
    fn missing_price_fails_to_decode() {
        let json = r#"{"id": "t1", "title": "S", "artist": "B", "content": "c", "beneficiaries": []}"#;
        assert!(serde_json::from_str::<Track>(json).is_err());
    }

    #[test]
    fn negative_price_fails_to_decode() {
        let json = r#"{"id": "t1", "title": "S", "artist": "B", "content": "c", "price": -5, "beneficiaries": []}"#;
        assert!(serde_json::from_str::<Track>(json).is_err());
    }

    #[test]
    fn full_split_is_valid() {
        let t = track(vec![Beneficiary::new("a", 30), Beneficiary::new("b", 70)]);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn over_one_hundred_is_rejected() {
        let t = track(vec![Beneficiary::new("a", 60), Beneficiary::new("b", 41)]);
        assert_eq!(
            t.validate(),
            Err(TypeError::PercentageOverflow {
                track: "t1".into(),
                total: 101
            })
        );
    }

    #[test]
    fn duplicate_beneficiary_is_rejected() {
        let t = track(vec![Beneficiary::new("a", 10), Beneficiary::new("a", 10)]);
        assert!(matches!(
            t.validate(),
            Err(TypeError::DuplicateBeneficiary { .. })
        ));
    }

    #[test]
    fn reserved_track_id_is_rejected() {
        let mut t = track(vec![]);
        t.id = "_tracks".into();
        assert_eq!(t.validate(), Err(TypeError::ReservedId("_tracks".into())));
    }

    proptest! {
        #[test]
        fn validate_agrees_with_percentage_total(
            shares in proptest::collection::vec(0u32..=60, 0..6)
        ) {
            let beneficiaries = shares
                .iter()
                .enumerate()
                .map(|(i, p)| Beneficiary::new(format!("acc{i}"), *p))
                .collect();
            let t = track(beneficiaries);
            let total: u64 = shares.iter().map(|p| u64::from(*p)).sum();
            prop_assert_eq!(t.validate().is_ok(), total <= MAX_PERCENTAGE_TOTAL);
        }
    }
}
