//! # src/models/receipt.rs
//!
//! Der Beleg (Receipt), wie ihn der Identitätsdienst nach einem abgeschlossenen
//! Teilen zurückliefert. Der Kern liest daraus nur die Base64-Chiffrate und die
//! Metadaten; die äußere HTTP/JSON-Schicht ist nicht Teil dieser Bibliothek.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ergebnis des Teilens laut entferntem Dienst.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum SharingOutcome {
    Success,
    Failure,
    /// Jeder andere (oder fehlende) Wert. Wird wie ein Fehlschlag behandelt.
    Unknown(String),
}

impl Default for SharingOutcome {
    fn default() -> Self {
        SharingOutcome::Unknown(String::new())
    }
}

impl From<String> for SharingOutcome {
    fn from(value: String) -> Self {
        match value.as_str() {
            "SUCCESS" => SharingOutcome::Success,
            "FAILURE" => SharingOutcome::Failure,
            _ => SharingOutcome::Unknown(value),
        }
    }
}

impl From<SharingOutcome> for String {
    fn from(outcome: SharingOutcome) -> Self {
        outcome.to_string()
    }
}

impl fmt::Display for SharingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SharingOutcome::Success => write!(f, "SUCCESS"),
            SharingOutcome::Failure => write!(f, "FAILURE"),
            SharingOutcome::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// Der dekodierte Beleg. Nach dem Einlesen unveränderlich.
///
/// Fehlende Felder und `null` werden gleich behandelt.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Receipt {
    pub receipt_id: Option<String>,
    #[serde(default)]
    pub sharing_outcome: SharingOutcome,
    /// Der mit dem öffentlichen RSA-Schlüssel der Anwendung verschlüsselte Inhaltsschlüssel (Base64).
    pub wrapped_receipt_key: Option<String>,
    /// Profil des Nutzers (Base64 eines `EncryptedData`-Umschlags).
    pub other_party_profile_content: Option<String>,
    /// Profil der Anwendung.
    pub profile_content: Option<String>,
    pub extra_data_content: Option<String>,
    pub remember_me_id: Option<String>,
    pub parent_remember_me_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Schlüssel, unter dem die Antwort des Dienstes den Beleg enthält.
const RECEIPT_KEY: &str = "receipt";

impl Receipt {
    /// Liest einen Beleg aus JSON; akzeptiert sowohl `{"receipt": {...}}` als auch das nackte Objekt.
    ///
    /// Ist der Schlüssel `receipt` vorhanden, muss sein Inhalt ein gültiger Beleg sein.
    pub fn from_json(json_str: &str) -> Result<Receipt, serde_json::Error> {
        let mut document: serde_json::Value = serde_json::from_str(json_str)?;
        let receipt = match document.as_object_mut().and_then(|o| o.remove(RECEIPT_KEY)) {
            Some(inner) => inner,
            None => document,
        };
        serde_json::from_value(receipt)
    }

    pub fn is_success(&self) -> bool {
        self.sharing_outcome == SharingOutcome::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped_receipt() {
        let json = r#"{"session_data":"x","receipt":{"receipt_id":"r1","wrapped_receipt_key":"a2V5","sharing_outcome":"SUCCESS","timestamp":"2016-09-23T13:04:11Z","other_party_profile_content":null}}"#;
        let receipt = Receipt::from_json(json).unwrap();
        assert_eq!(receipt.receipt_id.as_deref(), Some("r1"));
        assert!(receipt.is_success());
        assert!(receipt.other_party_profile_content.is_none());
        assert_eq!(receipt.timestamp.unwrap().to_rfc3339(), "2016-09-23T13:04:11+00:00");
    }

    #[test]
    fn test_parse_bare_receipt_with_unknown_outcome() {
        let receipt = Receipt::from_json(r#"{"sharing_outcome":"CANCELLED"}"#).unwrap();
        assert_eq!(receipt.sharing_outcome, SharingOutcome::Unknown("CANCELLED".to_string()));
        assert!(!receipt.is_success());
    }

    #[test]
    fn test_missing_outcome_is_not_success() {
        let receipt = Receipt::from_json(r#"{"receipt":{"remember_me_id":"abc"}}"#).unwrap();
        assert_eq!(receipt.sharing_outcome, SharingOutcome::default());
        assert_eq!(receipt.remember_me_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_wrapped_receipt_with_invalid_field_is_rejected() {
        // Ein ungültiger Zeitstempel darf nicht zu einem leeren Beleg führen.
        let json = r#"{"receipt":{"receipt_id":"r1","sharing_outcome":"SUCCESS","wrapped_receipt_key":"a2V5","timestamp":"19/07/2016"}}"#;
        assert!(Receipt::from_json(json).is_err());

        let json = r#"{"receipt":"not an object"}"#;
        assert!(Receipt::from_json(json).is_err());
    }
}
