//! # src/error.rs
//!
//! Definiert den zentralen Fehlertyp für die gesamte receipt_core-Bibliothek.
//! Verwendet `thiserror` zur einfachen Erstellung von aussagekräftigen Fehlern
//! und zur automatischen Konvertierung von untergeordneten Fehlertypen.
//!
//! Zusätzlich liegen hier die feldbezogenen Fehler (`AttributeParseError`,
//! `IssuanceTokenError`), die nie die gesamte Verarbeitung abbrechen, sondern
//! nur über den Accessor des betroffenen Feldes sichtbar werden.

use crate::models::receipt::SharingOutcome;
use crate::services::crypto_utils::CryptoError;
use crate::services::wire_codec::WireDecodeError;
use thiserror::Error;

/// Der zentrale Fehlertyp für alle fatalen Fehler der Beleg-Verarbeitung.
///
/// Tritt einer dieser Fehler auf, wird niemals ein teilweise aufgebautes
/// `ActivityDetails` zurückgegeben.
#[derive(Error, Debug)]
pub enum ReceiptCoreError {
    /// Der entfernte Dienst meldet, dass der Nutzer das Teilen nicht abgeschlossen hat.
    /// Wird immer vor jeder Entschlüsselung geprüft.
    #[error("Sharing failure: the receipt reports outcome '{0}'")]
    SharingFailure(SharingOutcome),

    /// Fehler beim Entpacken des Schlüssels oder beim Entschlüsseln eines Inhalts.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Das äußere oder innere Binärformat ist fehlerhaft.
    #[error("Wire decode error: {0}")]
    Wire(#[from] WireDecodeError),

    /// Ein Fehler bei der Verarbeitung von JSON (z.B. beim Einlesen eines Belegs).
    #[error("JSON Processing Error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ein Fehler bei der Deserialisierung von TOML (beim Laden der Konfiguration).
    #[error("TOML Deserialization Error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Ein Fehler bei I/O-Operationen (z.B. beim Lesen der Schlüsseldatei).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ein Attribut konnte nicht unter seinem deklarierten Inhaltstyp gelesen werden.
///
/// Diese Fehler werden im `Profile` pro Attributname abgelegt und protokolliert;
/// das Attribut gilt danach als "nicht vorhanden".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeParseError {
    #[error("Unable to parse date value (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Unable to parse JSON value: {0}")]
    InvalidJson(String),

    // Werte werden nicht in Fehlermeldungen übernommen, da diese protokolliert werden.
    #[error("Unable to parse boolean value")]
    InvalidBoolean,

    #[error("Attribute value is not valid UTF-8: {0}")]
    InvalidText(String),
}

/// Die Ausstellungsdetails eines Drittanbieter-Attributs sind unvollständig oder ungültig.
///
/// Wird nur über `ExtraData::attribute_issuance_details()` sichtbar, das Profil bleibt nutzbar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssuanceTokenError {
    #[error("Issuance Token is invalid")]
    MissingToken,

    #[error("Unable to decode third party attribute: {0}")]
    Malformed(String),
}
