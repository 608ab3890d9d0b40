//! # src/services/attribute_mapper.rs
//!
//! Wandelt eine dekodierte `RawAttributeList` in ein typisiertes `Profile` um.
//!
//! Die Zuordnung `(Name, Inhaltstyp) -> Handler` ist datengetrieben: eine Tabelle
//! für bekannte Namen, eine Tabelle für Namenspräfixe (Altersprüfungen) und ein
//! Rückfall über den deklarierten Inhaltstyp. Fehler einzelner Attribute brechen
//! das Mapping nie ab, sondern werden protokolliert und im Profil vermerkt.

use crate::error::AttributeParseError;
use crate::models::anchor::AnchorResolver;
use crate::models::attribute::{AttributeValue, Image, ImageType, TypedAttribute};
use crate::models::profile::{
    Profile, AGE_OVER_PREFIX, AGE_UNDER_PREFIX, ATTR_ADDRESS, ATTR_APPLICATION_LOGO,
    ATTR_DATE_OF_BIRTH, ATTR_EMAIL_ADDRESS, ATTR_FAMILY_NAME, ATTR_FULL_NAME, ATTR_GENDER,
    ATTR_GIVEN_NAMES, ATTR_NATIONALITY, ATTR_PHONE_NUMBER, ATTR_SELFIE,
    ATTR_STRUCTURED_POSTAL_ADDRESS,
};
use crate::models::wire::{ContentType, RawAttribute, RawAttributeList};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Schlüssel in der strukturierten Adresse, der die fertig formatierte Adresse enthält.
pub const FORMATTED_ADDRESS_KEY: &str = "formatted_address";

/// Die Verarbeitungsvorschrift für ein einzelnes Attribut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeHandler {
    Text,
    Date,
    Json,
    Jpeg,
    Png,
    /// `age_over:N` / `age_under:N`: Wahrheitswert. Die Altersgrenze wird erst in `AgeVerification` gelesen.
    AgeVerification,
    /// Das Attribut wird stillschweigend verworfen.
    Drop,
    /// Rohbytes mit dem deklarierten Inhaltstyp behalten.
    Unknown,
}

/// Welche deklarierten Inhaltstypen ein Tabelleneintrag abdeckt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTypeMatch {
    Any,
    Exactly(ContentType),
}

impl ContentTypeMatch {
    fn matches(&self, declared: Option<ContentType>) -> bool {
        match self {
            ContentTypeMatch::Any => true,
            ContentTypeMatch::Exactly(expected) => declared == Some(*expected),
        }
    }
}

/// Ein Eintrag der Namenstabelle. Der erste passende Eintrag gewinnt.
#[derive(Debug, Clone, Copy)]
pub struct HandlerEntry {
    pub name: &'static str,
    pub content_type: ContentTypeMatch,
    pub handler: AttributeHandler,
}

const fn entry(name: &'static str, content_type: ContentTypeMatch, handler: AttributeHandler) -> HandlerEntry {
    HandlerEntry {
        name,
        content_type,
        handler,
    }
}

pub static NAMED_HANDLERS: &[HandlerEntry] = &[
    // Selfies gibt es nur als JPEG oder PNG, alles andere wird verworfen.
    entry(ATTR_SELFIE, ContentTypeMatch::Exactly(ContentType::Jpeg), AttributeHandler::Jpeg),
    entry(ATTR_SELFIE, ContentTypeMatch::Exactly(ContentType::Png), AttributeHandler::Png),
    entry(ATTR_SELFIE, ContentTypeMatch::Any, AttributeHandler::Drop),
    entry(ATTR_APPLICATION_LOGO, ContentTypeMatch::Exactly(ContentType::Jpeg), AttributeHandler::Jpeg),
    entry(ATTR_APPLICATION_LOGO, ContentTypeMatch::Exactly(ContentType::Png), AttributeHandler::Png),
    entry(ATTR_DATE_OF_BIRTH, ContentTypeMatch::Any, AttributeHandler::Date),
    entry(ATTR_STRUCTURED_POSTAL_ADDRESS, ContentTypeMatch::Any, AttributeHandler::Json),
    entry(ATTR_GIVEN_NAMES, ContentTypeMatch::Any, AttributeHandler::Text),
    entry(ATTR_FAMILY_NAME, ContentTypeMatch::Any, AttributeHandler::Text),
    entry(ATTR_FULL_NAME, ContentTypeMatch::Any, AttributeHandler::Text),
    entry(ATTR_PHONE_NUMBER, ContentTypeMatch::Any, AttributeHandler::Text),
    entry(ATTR_EMAIL_ADDRESS, ContentTypeMatch::Any, AttributeHandler::Text),
    entry(ATTR_ADDRESS, ContentTypeMatch::Any, AttributeHandler::Text),
    entry(ATTR_GENDER, ContentTypeMatch::Any, AttributeHandler::Text),
    entry(ATTR_NATIONALITY, ContentTypeMatch::Any, AttributeHandler::Text),
];

pub static PREFIX_HANDLERS: &[(&str, AttributeHandler)] = &[
    (AGE_OVER_PREFIX, AttributeHandler::AgeVerification),
    (AGE_UNDER_PREFIX, AttributeHandler::AgeVerification),
];

/// Bestimmt den Handler für ein Attribut: Namenstabelle, dann Präfixe, dann Inhaltstyp.
pub fn lookup_handler(name: &str, declared: Option<ContentType>) -> AttributeHandler {
    NAMED_HANDLERS
        .iter()
        .find(|e| e.name == name && e.content_type.matches(declared))
        .map(|e| e.handler)
        .or_else(|| {
            PREFIX_HANDLERS
                .iter()
                .find(|(prefix, _)| name.starts_with(prefix))
                .map(|(_, handler)| *handler)
        })
        .unwrap_or_else(|| handler_for_content_type(declared))
}

fn handler_for_content_type(declared: Option<ContentType>) -> AttributeHandler {
    match declared {
        Some(ContentType::String) => AttributeHandler::Text,
        Some(ContentType::Date) => AttributeHandler::Date,
        Some(ContentType::Json) => AttributeHandler::Json,
        Some(ContentType::Jpeg) => AttributeHandler::Jpeg,
        Some(ContentType::Png) => AttributeHandler::Png,
        Some(ContentType::Undefined | ContentType::MultiValue | ContentType::Int) | None => {
            AttributeHandler::Unknown
        }
    }
}

impl AttributeHandler {
    /// Wendet den Handler an. `Ok(None)` bedeutet: Attribut verwerfen, ohne Fehler.
    pub fn apply(&self, raw: &RawAttribute) -> Result<Option<AttributeValue>, AttributeParseError> {
        let value = match self {
            AttributeHandler::Text => AttributeValue::Text(parse_text(&raw.value)?),
            AttributeHandler::Date => AttributeValue::Date(parse_date(&raw.value)?),
            AttributeHandler::Json => AttributeValue::Json(parse_json(&raw.value)?),
            AttributeHandler::Jpeg => AttributeValue::Image(Image {
                image_type: ImageType::Jpeg,
                data: raw.value.clone(),
            }),
            AttributeHandler::Png => AttributeValue::Image(Image {
                image_type: ImageType::Png,
                data: raw.value.clone(),
            }),
            AttributeHandler::AgeVerification => AttributeValue::Boolean(parse_bool(&raw.value)?),
            AttributeHandler::Drop => return Ok(None),
            AttributeHandler::Unknown => AttributeValue::Unknown {
                content_type: raw.content_type,
                data: raw.value.clone(),
            },
        };
        Ok(Some(value))
    }
}

/// Mappt alle Attribute der Liste in Eingangsreihenfolge. Bei doppelten Namen
/// gewinnt der letzte Eintrag, auch wenn dieser fehlschlägt.
pub fn map_attributes(list: &RawAttributeList, resolver: &dyn AnchorResolver) -> Profile {
    let mut profile = Profile::default();

    for raw in &list.attributes {
        let handler = lookup_handler(&raw.name, raw.declared_content_type());
        match handler.apply(raw) {
            Ok(Some(value)) => {
                let anchors = raw.anchors.iter().map(|a| resolver.resolve(a)).collect();
                profile.insert(TypedAttribute::new(raw.name.clone(), value, anchors));
            }
            Ok(None) => {
                debug!(
                    attribute = %raw.name,
                    content_type = raw.content_type,
                    "Dropping attribute with unsupported content type"
                );
            }
            Err(e) => {
                warn!(attribute = %raw.name, error = %e, "Unable to map attribute, treating it as absent");
                profile.record_failure(&raw.name, e);
            }
        }
    }

    synthesize_address(&mut profile);
    debug!(count = profile.len(), "Attribute list mapped");
    profile
}

/// Leitet `postal_address` aus `structured_postal_address.formatted_address` ab,
/// falls keine formatierte Adresse geliefert wurde. Die Anchors werden übernommen.
fn synthesize_address(profile: &mut Profile) {
    if profile.get_attribute(ATTR_ADDRESS).is_some() {
        return;
    }

    let derived = profile
        .get_json_attribute(ATTR_STRUCTURED_POSTAL_ADDRESS)
        .and_then(|structured| {
            let formatted = structured
                .as_json()?
                .as_object()?
                .get(FORMATTED_ADDRESS_KEY)?
                .as_str()?;
            Some(TypedAttribute::new(
                ATTR_ADDRESS,
                AttributeValue::Text(formatted.to_string()),
                structured.anchors.clone(),
            ))
        });

    if let Some(address) = derived {
        debug!("Derived postal_address from structured_postal_address");
        profile.insert(address);
    }
}

fn parse_text(value: &[u8]) -> Result<String, AttributeParseError> {
    String::from_utf8(value.to_vec()).map_err(|e| AttributeParseError::InvalidText(e.utf8_error().to_string()))
}

fn parse_date(value: &[u8]) -> Result<NaiveDate, AttributeParseError> {
    let text = std::str::from_utf8(value).map_err(|e| AttributeParseError::InvalidDate(e.to_string()))?;
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| AttributeParseError::InvalidDate(e.to_string()))
}

fn parse_json(value: &[u8]) -> Result<serde_json::Value, AttributeParseError> {
    serde_json::from_slice(value).map_err(|e| AttributeParseError::InvalidJson(e.to_string()))
}

/// Akzeptiert genau die Schreibweisen 1/t/T/TRUE/true/True und 0/f/F/FALSE/false/False.
fn parse_bool(value: &[u8]) -> Result<bool, AttributeParseError> {
    match value {
        b"1" | b"t" | b"T" | b"TRUE" | b"true" | b"True" => Ok(true),
        b"0" | b"f" | b"F" | b"FALSE" | b"false" | b"False" => Ok(false),
        _ => Err(AttributeParseError::InvalidBoolean),
    }
}
