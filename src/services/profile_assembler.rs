//! # src/services/profile_assembler.rs
//!
//! Orchestriert die gesamte Verarbeitung eines Belegs: Ergebnis prüfen, Schlüssel
//! entpacken, Inhalte entschlüsseln und dekodieren, Attribute mappen und das
//! `ActivityDetails` zusammensetzen.

use crate::error::{IssuanceTokenError, ReceiptCoreError};
use crate::models::activity::ActivityDetails;
use crate::models::anchor::{AnchorResolver, CertificateMarkerResolver};
use crate::models::extra_data::{AttributeDefinition, AttributeIssuanceDetails, ExtraData};
use crate::models::profile::{ApplicationProfile, Profile, UserProfile};
use crate::models::receipt::Receipt;
use crate::models::wire::{DataEntryType, ThirdPartyAttribute};
use crate::services::attribute_mapper::map_attributes;
use crate::services::crypto_utils::{self, CryptoError};
use crate::services::wire_codec::{
    decode_attribute_list, decode_envelope, decode_extra_data, decode_third_party_attribute,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use rsa::RsaPrivateKey;
use tracing::{debug, warn};

/// Verarbeitet einen Beleg mit dem Standard-Resolver für Anchors.
///
/// # Arguments
///
/// * `receipt` - Der eingelesene Beleg.
/// * `private_key` - Der RSA-Schlüssel der Anwendung. Wird nur gelesen.
///
/// # Returns
///
/// Das vollständige `ActivityDetails` oder den ersten fatalen Fehler.
pub fn assemble_activity_details(
    receipt: &Receipt,
    private_key: &RsaPrivateKey,
) -> Result<ActivityDetails, ReceiptCoreError> {
    assemble_activity_details_with_resolver(receipt, private_key, &CertificateMarkerResolver)
}

/// Wie `assemble_activity_details`, aber mit einem frei wählbaren `AnchorResolver`.
///
/// Fatal sind: ein anderes Ergebnis als `SUCCESS` (wird vor jeder Kryptographie
/// geprüft), ein nicht entpackbarer Schlüssel sowie Krypto- oder Formatfehler
/// eines der verschlüsselten Inhalte. Fehler einzelner Attribute sind es nicht.
pub fn assemble_activity_details_with_resolver(
    receipt: &Receipt,
    private_key: &RsaPrivateKey,
    resolver: &dyn AnchorResolver,
) -> Result<ActivityDetails, ReceiptCoreError> {
    if !receipt.is_success() {
        debug!(outcome = %receipt.sharing_outcome, "Receipt does not report a successful share");
        return Err(ReceiptCoreError::SharingFailure(receipt.sharing_outcome.clone()));
    }

    // Ein fehlender Schlüssel scheitert beim Entpacken, nicht vorher.
    let wrapped_key = receipt.wrapped_receipt_key.as_deref().unwrap_or_default();
    let content_key = crypto_utils::unwrap_key(private_key, wrapped_key)?;
    debug!(key_len = content_key.len(), "Receipt key unwrapped");

    let user_profile = UserProfile::new(decrypt_profile(
        &content_key,
        receipt.other_party_profile_content.as_deref(),
        resolver,
    )?);
    let application_profile = ApplicationProfile::new(decrypt_profile(
        &content_key,
        receipt.profile_content.as_deref(),
        resolver,
    )?);

    let extra_data = match decrypt_receipt_content(&content_key, receipt.extra_data_content.as_deref())? {
        Some(plaintext) => parse_extra_data(&plaintext)?,
        None => ExtraData::default(),
    };

    debug!(
        user_attributes = user_profile.len(),
        application_attributes = application_profile.len(),
        "Activity details assembled"
    );
    Ok(ActivityDetails::new(receipt, user_profile, application_profile, extra_data))
}

/// Entschlüsselt einen Base64-kodierten `EncryptedData`-Umschlag.
///
/// Fehlende oder leere Inhalte ergeben `Ok(None)`.
pub fn decrypt_receipt_content(
    content_key: &[u8],
    content: Option<&str>,
) -> Result<Option<Vec<u8>>, ReceiptCoreError> {
    let encoded = match content.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => return Ok(None),
    };

    let envelope_bytes = BASE64.decode(encoded).map_err(CryptoError::from)?;
    let envelope = decode_envelope(&envelope_bytes)?;
    let plaintext = crypto_utils::decrypt_aes_cbc(content_key, &envelope.iv, &envelope.cipher_text)?;
    debug!(
        cipher_len = envelope.cipher_text.len(),
        plain_len = plaintext.len(),
        "Receipt content decrypted"
    );
    Ok(Some(plaintext))
}

fn decrypt_profile(
    content_key: &[u8],
    content: Option<&str>,
    resolver: &dyn AnchorResolver,
) -> Result<Profile, ReceiptCoreError> {
    match decrypt_receipt_content(content_key, content)? {
        Some(plaintext) => {
            let list = decode_attribute_list(&plaintext)?;
            Ok(map_attributes(&list, resolver))
        }
        None => Ok(Profile::default()),
    }
}

/// Wertet die Zusatzdaten aus. Gibt es mehrere Drittanbieter-Einträge, gilt der letzte.
fn parse_extra_data(plaintext: &[u8]) -> Result<ExtraData, ReceiptCoreError> {
    let proto = decode_extra_data(plaintext)?;

    let third_party = proto.list.iter().rev().find(|e| {
        matches!(DataEntryType::try_from(e.entry_type), Ok(DataEntryType::ThirdPartyAttribute))
    });

    let Some(entry) = third_party else {
        debug!(entries = proto.list.len(), "Extra data without third party attribute");
        return Ok(ExtraData::default());
    };

    let extra_data = match decode_third_party_attribute(&entry.value) {
        Ok(attribute) => match issuance_details(attribute) {
            Ok(details) => ExtraData::with_issuance_details(details),
            Err(e) => {
                warn!(error = %e, "Third party attribute has no usable issuance token");
                ExtraData::with_issuance_error(e)
            }
        },
        Err(e) => {
            warn!(error = %e, "Unable to decode third party attribute");
            ExtraData::with_issuance_error(IssuanceTokenError::Malformed(e.to_string()))
        }
    };
    Ok(extra_data)
}

fn issuance_details(attribute: ThirdPartyAttribute) -> Result<AttributeIssuanceDetails, IssuanceTokenError> {
    if attribute.issuance_token.is_empty() {
        return Err(IssuanceTokenError::MissingToken);
    }

    let issuing = attribute.issuing_attributes.unwrap_or_default();
    Ok(AttributeIssuanceDetails {
        token: BASE64.encode(&attribute.issuance_token),
        expiry_date: parse_expiry_date(&issuing.expiry_date),
        attributes: issuing
            .definitions
            .into_iter()
            .map(|d| AttributeDefinition { name: d.name })
            .collect(),
    })
}

fn parse_expiry_date(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!(error = %e, "Unable to parse issuance expiry date");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_or_missing_content_yields_none() {
        let key = [0u8; 16];
        assert!(decrypt_receipt_content(&key, None).unwrap().is_none());
        assert!(decrypt_receipt_content(&key, Some("")).unwrap().is_none());
        assert!(decrypt_receipt_content(&key, Some("   ")).unwrap().is_none());
    }

    #[test]
    fn test_invalid_base64_content_is_fatal() {
        let key = [0u8; 16];
        let result = decrypt_receipt_content(&key, Some("%%% not base64 %%%"));
        assert!(matches!(result, Err(ReceiptCoreError::Crypto(CryptoError::Decode(_)))));
    }

    #[test]
    fn test_parse_expiry_date() {
        let parsed = parse_expiry_date("2026-03-01T10:00:00Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-03-01T10:00:00+00:00");
        assert!(parse_expiry_date("").is_none());
        assert!(parse_expiry_date("next tuesday").is_none());
    }

    #[test]
    fn test_missing_token_is_reported() {
        let attribute = ThirdPartyAttribute {
            issuance_token: vec![],
            issuing_attributes: None,
        };
        assert_eq!(issuance_details(attribute), Err(IssuanceTokenError::MissingToken));
    }
}
