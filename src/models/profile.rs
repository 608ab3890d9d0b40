//! # src/models/profile.rs
//!
//! Definiert das typisierte Profil, das aus einer entschlüsselten Attributliste
//! entsteht. Es gibt genau eine Ablage (Name -> Attribut); `UserProfile` und
//! `ApplicationProfile` sind dünne Sichten mit benannten Accessoren darauf.

use crate::error::AttributeParseError;
use crate::models::attribute::{AttributeValue, TypedAttribute};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::Deref;

pub const ATTR_SELFIE: &str = "selfie";
pub const ATTR_GIVEN_NAMES: &str = "given_names";
pub const ATTR_FAMILY_NAME: &str = "family_name";
pub const ATTR_FULL_NAME: &str = "full_name";
pub const ATTR_PHONE_NUMBER: &str = "phone_number";
pub const ATTR_EMAIL_ADDRESS: &str = "email_address";
pub const ATTR_DATE_OF_BIRTH: &str = "date_of_birth";
pub const ATTR_ADDRESS: &str = "postal_address";
pub const ATTR_STRUCTURED_POSTAL_ADDRESS: &str = "structured_postal_address";
pub const ATTR_GENDER: &str = "gender";
pub const ATTR_NATIONALITY: &str = "nationality";

pub const ATTR_APPLICATION_NAME: &str = "application_name";
pub const ATTR_APPLICATION_URL: &str = "application_url";
pub const ATTR_APPLICATION_LOGO: &str = "application_logo";
pub const ATTR_APPLICATION_RECEIPT_BGCOLOR: &str = "application_receipt_bgcolor";

pub const AGE_OVER_PREFIX: &str = "age_over:";
pub const AGE_UNDER_PREFIX: &str = "age_under:";

/// Die Ablage aller gemappten Attribute eines Profils.
///
/// Fehlgeschlagene Attribute werden nicht gespeichert, sondern ihr Fehler unter
/// dem Attributnamen vermerkt. Pro Name gilt der zuletzt empfangene Eintrag.
#[derive(Serialize, Debug, Clone, Default)]
pub struct Profile {
    attributes: HashMap<String, TypedAttribute>,
    #[serde(skip)]
    failures: HashMap<String, AttributeParseError>,
}

impl Profile {
    /// Legt ein erfolgreich gemapptes Attribut ab und ersetzt frühere Einträge gleichen Namens.
    pub(crate) fn insert(&mut self, attribute: TypedAttribute) {
        self.failures.remove(&attribute.name);
        self.attributes.insert(attribute.name.clone(), attribute);
    }

    /// Vermerkt einen Parse-Fehler; ein früherer Wert gleichen Namens verfällt.
    pub(crate) fn record_failure(&mut self, name: &str, error: AttributeParseError) {
        self.attributes.remove(name);
        self.failures.insert(name.to_string(), error);
    }

    /// Liefert ein Attribut beliebigen Typs, inklusive `Unknown`.
    pub fn get_attribute(&self, name: &str) -> Option<&TypedAttribute> {
        self.attributes.get(name)
    }

    pub fn get_text_attribute(&self, name: &str) -> Option<&TypedAttribute> {
        self.get_typed(name, |v| matches!(v, AttributeValue::Text(_)))
    }

    pub fn get_date_attribute(&self, name: &str) -> Option<&TypedAttribute> {
        self.get_typed(name, |v| matches!(v, AttributeValue::Date(_)))
    }

    pub fn get_image_attribute(&self, name: &str) -> Option<&TypedAttribute> {
        self.get_typed(name, |v| matches!(v, AttributeValue::Image(_)))
    }

    pub fn get_json_attribute(&self, name: &str) -> Option<&TypedAttribute> {
        self.get_typed(name, |v| matches!(v, AttributeValue::Json(_)))
    }

    /// Der beim Mapping aufgetretene Fehler für dieses Attribut, falls vorhanden.
    pub fn attribute_error(&self, name: &str) -> Option<&AttributeParseError> {
        self.failures.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &TypedAttribute> {
        self.attributes.values()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Alle erfolgreich abgeleiteten Altersprüfungen dieses Profils.
    pub fn age_verifications(&self) -> Vec<AgeVerification<'_>> {
        self.attributes.values().filter_map(AgeVerification::from_attribute).collect()
    }

    /// Sucht die Prüfung `age_over:<age>`.
    pub fn find_age_over_verification(&self, age: u32) -> Option<AgeVerification<'_>> {
        self.attributes
            .get(&format!("{}{}", AGE_OVER_PREFIX, age))
            .and_then(AgeVerification::from_attribute)
    }

    /// Sucht die Prüfung `age_under:<age>`.
    pub fn find_age_under_verification(&self, age: u32) -> Option<AgeVerification<'_>> {
        self.attributes
            .get(&format!("{}{}", AGE_UNDER_PREFIX, age))
            .and_then(AgeVerification::from_attribute)
    }

    fn get_typed(&self, name: &str, is_kind: fn(&AttributeValue) -> bool) -> Option<&TypedAttribute> {
        self.attributes.get(name).filter(|a| is_kind(&a.value))
    }

    /// Liefert das Attribut oder den gespeicherten Parse-Fehler.
    fn get_or_error<'a>(
        &'a self,
        attribute: Option<&'a TypedAttribute>,
        name: &str,
    ) -> Result<Option<&'a TypedAttribute>, &'a AttributeParseError> {
        match attribute {
            Some(a) => Ok(Some(a)),
            None => self.failures.get(name).map_or(Ok(None), Err),
        }
    }
}

/// Art einer Altersprüfung.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeCheckType {
    AgeOver,
    AgeUnder,
}

/// Abgeleitete Sicht auf ein `age_over:N` / `age_under:N`-Attribut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeVerification<'a> {
    pub check_type: AgeCheckType,
    pub age: u32,
    pub result: bool,
    pub attribute: &'a TypedAttribute,
}

impl<'a> AgeVerification<'a> {
    fn from_attribute(attribute: &'a TypedAttribute) -> Option<Self> {
        let result = attribute.as_bool()?;
        let (check_type, threshold) = split_age_attribute_name(&attribute.name)?;
        Some(Self {
            check_type,
            age: threshold.parse().ok()?,
            result,
            attribute,
        })
    }
}

/// Zerlegt `age_over:18` in `(AgeOver, "18")`.
pub fn split_age_attribute_name(name: &str) -> Option<(AgeCheckType, &str)> {
    if let Some(rest) = name.strip_prefix(AGE_OVER_PREFIX) {
        Some((AgeCheckType::AgeOver, rest))
    } else {
        name.strip_prefix(AGE_UNDER_PREFIX)
            .map(|rest| (AgeCheckType::AgeUnder, rest))
    }
}

/// Das Profil des Nutzers, der seine Daten geteilt hat.
#[derive(Serialize, Debug, Clone, Default)]
pub struct UserProfile(Profile);

impl UserProfile {
    pub fn new(profile: Profile) -> Self {
        Self(profile)
    }

    /// Das Selfie als JPEG- oder PNG-Bild.
    pub fn selfie(&self) -> Option<&TypedAttribute> {
        self.get_image_attribute(ATTR_SELFIE)
    }

    pub fn given_names(&self) -> Option<&TypedAttribute> {
        self.get_text_attribute(ATTR_GIVEN_NAMES)
    }

    pub fn family_name(&self) -> Option<&TypedAttribute> {
        self.get_text_attribute(ATTR_FAMILY_NAME)
    }

    pub fn full_name(&self) -> Option<&TypedAttribute> {
        self.get_text_attribute(ATTR_FULL_NAME)
    }

    pub fn mobile_number(&self) -> Option<&TypedAttribute> {
        self.get_text_attribute(ATTR_PHONE_NUMBER)
    }

    pub fn email_address(&self) -> Option<&TypedAttribute> {
        self.get_text_attribute(ATTR_EMAIL_ADDRESS)
    }

    pub fn gender(&self) -> Option<&TypedAttribute> {
        self.get_text_attribute(ATTR_GENDER)
    }

    pub fn nationality(&self) -> Option<&TypedAttribute> {
        self.get_text_attribute(ATTR_NATIONALITY)
    }

    /// Die formatierte Adresse; ggf. aus der strukturierten Adresse abgeleitet.
    pub fn address(&self) -> Option<&TypedAttribute> {
        self.get_text_attribute(ATTR_ADDRESS)
    }

    /// Das Geburtsdatum oder der Fehler, der beim Lesen des Wertes aufgetreten ist.
    pub fn date_of_birth(&self) -> Result<Option<&TypedAttribute>, &AttributeParseError> {
        self.get_or_error(self.get_date_attribute(ATTR_DATE_OF_BIRTH), ATTR_DATE_OF_BIRTH)
    }

    /// Die strukturierte Adresse (beliebiges JSON) oder der JSON-Parse-Fehler.
    pub fn structured_postal_address(&self) -> Result<Option<&TypedAttribute>, &AttributeParseError> {
        self.get_or_error(
            self.get_json_attribute(ATTR_STRUCTURED_POSTAL_ADDRESS),
            ATTR_STRUCTURED_POSTAL_ADDRESS,
        )
    }

    pub fn into_inner(self) -> Profile {
        self.0
    }
}

impl Deref for UserProfile {
    type Target = Profile;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Das Profil der empfangenden Anwendung, wie es dem Nutzer angezeigt wurde.
#[derive(Serialize, Debug, Clone, Default)]
pub struct ApplicationProfile(Profile);

impl ApplicationProfile {
    pub fn new(profile: Profile) -> Self {
        Self(profile)
    }

    pub fn application_name(&self) -> Option<&TypedAttribute> {
        self.get_text_attribute(ATTR_APPLICATION_NAME)
    }

    pub fn application_url(&self) -> Option<&TypedAttribute> {
        self.get_text_attribute(ATTR_APPLICATION_URL)
    }

    pub fn application_logo(&self) -> Option<&TypedAttribute> {
        self.get_image_attribute(ATTR_APPLICATION_LOGO)
    }

    pub fn application_receipt_bgcolor(&self) -> Option<&TypedAttribute> {
        self.get_text_attribute(ATTR_APPLICATION_RECEIPT_BGCOLOR)
    }

    pub fn into_inner(self) -> Profile {
        self.0
    }
}

impl Deref for ApplicationProfile {
    type Target = Profile;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
