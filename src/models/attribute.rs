//! # src/models/attribute.rs
//!
//! Definiert die typisierten Attributwerte, die der `attribute_mapper` aus den
//! rohen Protobuf-Attributen erzeugt.

use crate::models::anchor::{Anchor, AnchorType};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// Unterstützte Bildformate.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
}

impl ImageType {
    /// Liefert den MIME-Typ des Formats.
    pub fn mime(&self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
        }
    }
}

/// Ein Bild mit seinem Format und den unveränderten Rohdaten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub image_type: ImageType,
    pub data: Vec<u8>,
}

impl Image {
    pub fn mime(&self) -> &'static str {
        self.image_type.mime()
    }

    /// Kodiert das Bild als `data:`-URL, z.B. `data:image/png;base64,...`.
    pub fn base64_url(&self) -> String {
        format!("data:{};base64,{}", self.mime(), BASE64.encode(&self.data))
    }
}

// Bilder werden in JSON-Ausgaben als data-URL dargestellt.
impl Serialize for Image {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.base64_url())
    }
}

/// Der typisierte Wert eines Attributs.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "value")]
pub enum AttributeValue {
    Text(String),
    Date(NaiveDate),
    Image(Image),
    Json(serde_json::Value),
    /// Abgeleiteter Wahrheitswert der Altersprüfungen (`age_over:N`, `age_under:N`).
    Boolean(bool),
    /// Inhaltstyp außerhalb der unterstützten Menge. Nur über `get_attribute` erreichbar.
    Unknown { content_type: i32, data: Vec<u8> },
}

/// Ein fertig gemapptes Attribut inklusive seiner Anchors.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TypedAttribute {
    pub name: String,
    pub value: AttributeValue,
    pub anchors: Vec<Anchor>,
}

impl TypedAttribute {
    pub fn new(name: impl Into<String>, value: AttributeValue, anchors: Vec<Anchor>) -> Self {
        Self {
            name: name.into(),
            value,
            anchors,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self.value {
            AttributeValue::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match &self.value {
            AttributeValue::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match &self.value {
            AttributeValue::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            AttributeValue::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.value, AttributeValue::Unknown { .. })
    }

    /// Anchors, die beschreiben, wie der Wert erfasst wurde.
    pub fn sources(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter().filter(|a| a.anchor_type == AnchorType::Source)
    }

    /// Anchors, die beschreiben, wie der Wert geprüft wurde.
    pub fn verifiers(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter().filter(|a| a.anchor_type == AnchorType::Verifier)
    }
}
