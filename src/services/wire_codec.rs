//! # src/services/wire_codec.rs
//!
//! Reine Dekodierung der Protobuf-Nachrichten aus (entschlüsselten) Bytes.
//! Es findet keine inhaltliche Prüfung der Attributwerte statt.

use crate::models::wire::{EncryptedData, ExtraDataProto, RawAttributeList, ThirdPartyAttribute};
use prost::Message;

/// Definiert die Fehler, die beim Dekodieren des Wire-Formats auftreten können.
#[derive(Debug, thiserror::Error)]
pub enum WireDecodeError {
    #[error("Failed to decode encrypted envelope: {0}")]
    Envelope(prost::DecodeError),
    #[error("Failed to decode attribute list: {0}")]
    AttributeList(prost::DecodeError),
    #[error("Failed to decode extra data: {0}")]
    ExtraData(prost::DecodeError),
    #[error("Failed to decode third party attribute: {0}")]
    ThirdPartyAttribute(prost::DecodeError),
}

/// Dekodiert den äußeren Umschlag (`iv`, `cipher_text`) eines verschlüsselten Inhalts.
pub fn decode_envelope(bytes: &[u8]) -> Result<EncryptedData, WireDecodeError> {
    EncryptedData::decode(bytes).map_err(WireDecodeError::Envelope)
}

/// Dekodiert die entschlüsselte Attributliste. Reihenfolge und Duplikate bleiben erhalten.
pub fn decode_attribute_list(bytes: &[u8]) -> Result<RawAttributeList, WireDecodeError> {
    RawAttributeList::decode(bytes).map_err(WireDecodeError::AttributeList)
}

/// Dekodiert die entschlüsselten Zusatzdaten eines Belegs.
pub fn decode_extra_data(bytes: &[u8]) -> Result<ExtraDataProto, WireDecodeError> {
    ExtraDataProto::decode(bytes).map_err(WireDecodeError::ExtraData)
}

/// Dekodiert den Wert eines `THIRD_PARTY_ATTRIBUTE`-Eintrags der Zusatzdaten.
pub fn decode_third_party_attribute(bytes: &[u8]) -> Result<ThirdPartyAttribute, WireDecodeError> {
    ThirdPartyAttribute::decode(bytes).map_err(WireDecodeError::ThirdPartyAttribute)
}
