//! # src/models/wire.rs
//!
//! Protobuf-Nachrichten des Identitätsdienstes. Die Tags entsprechen dem
//! externen Wire-Format und dürfen nicht verändert werden.

use prost::{Enumeration, Message};

/// Äußerer Umschlag eines verschlüsselten Inhalts: IV und AES-CBC-Chiffrat.
#[derive(Clone, PartialEq, Message)]
pub struct EncryptedData {
    #[prost(bytes = "vec", tag = "1")]
    pub iv: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub cipher_text: Vec<u8>,
}

/// Deklarierter Inhaltstyp eines Attributwertes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum ContentType {
    Undefined = 0,
    String = 1,
    Jpeg = 2,
    Date = 3,
    Png = 4,
    Json = 5,
    MultiValue = 6,
    Int = 7,
}

/// Herkunfts- bzw. Prüfnachweis eines Attributs, wird unverändert weitergereicht.
#[derive(Clone, PartialEq, Message)]
pub struct RawAnchor {
    #[prost(bytes = "vec", tag = "1")]
    pub artifact_link: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub origin_server_certs: Vec<Vec<u8>>,
    #[prost(bytes = "vec", tag = "3")]
    pub artifact_signature: Vec<u8>,
    #[prost(string, tag = "4")]
    pub sub_type: String,
    #[prost(bytes = "vec", tag = "5")]
    pub signature: Vec<u8>,
    #[prost(bytes = "vec", tag = "6")]
    pub signed_time_stamp: Vec<u8>,
}

/// Ein einzelnes, noch untypisiertes Attribut aus der entschlüsselten Liste.
#[derive(Clone, PartialEq, Message)]
pub struct RawAttribute {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
    #[prost(enumeration = "ContentType", tag = "3")]
    pub content_type: i32,
    #[prost(message, repeated, tag = "4")]
    pub anchors: Vec<RawAnchor>,
}

impl RawAttribute {
    /// Liefert den deklarierten Inhaltstyp, `None` für unbekannte Tag-Werte.
    pub fn declared_content_type(&self) -> Option<ContentType> {
        ContentType::try_from(self.content_type).ok()
    }
}

/// Geordnete Liste von Attributen. Namen sind nicht eindeutig.
#[derive(Clone, PartialEq, Message)]
pub struct RawAttributeList {
    #[prost(message, repeated, tag = "1")]
    pub attributes: Vec<RawAttribute>,
}

/// Art eines Eintrags in den Zusatzdaten eines Belegs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum DataEntryType {
    Unknown = 0,
    Invoice = 1,
    PaymentTransaction = 2,
    Location = 3,
    Transaction = 4,
    AgeVerificationSecret = 5,
    ThirdPartyAttribute = 6,
}

#[derive(Clone, PartialEq, Message)]
pub struct DataEntry {
    #[prost(enumeration = "DataEntryType", tag = "1")]
    pub entry_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ExtraDataProto {
    #[prost(message, repeated, tag = "1")]
    pub list: Vec<DataEntry>,
}

#[derive(Clone, PartialEq, Message)]
pub struct AttributeDefinitionProto {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct IssuingAttributes {
    #[prost(string, tag = "1")]
    pub expiry_date: String,
    #[prost(message, repeated, tag = "2")]
    pub definitions: Vec<AttributeDefinitionProto>,
}

/// Ausstellungsdaten eines Drittanbieter-Attributs.
#[derive(Clone, PartialEq, Message)]
pub struct ThirdPartyAttribute {
    #[prost(bytes = "vec", tag = "1")]
    pub issuance_token: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub issuing_attributes: Option<IssuingAttributes>,
}
