//! # src/models/extra_data.rs
//!
//! Zusatzdaten eines Belegs. Derzeit wird nur der Eintrag für
//! Drittanbieter-Attribute (Ausstellungs-Token) ausgewertet.

use crate::error::IssuanceTokenError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Ein Attribut, das der Drittanbieter ausstellen darf.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub name: String,
}

/// Details zur Ausstellung von Drittanbieter-Attributen.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AttributeIssuanceDetails {
    /// Das Ausstellungs-Token, Base64-kodiert.
    pub token: String,
    /// Ablaufzeitpunkt; `None`, wenn er fehlt oder nicht lesbar ist.
    pub expiry_date: Option<DateTime<Utc>>,
    pub attributes: Vec<AttributeDefinition>,
}

/// Entschlüsselte Zusatzdaten. Ein ungültiges Token macht nur dieses Feld unbrauchbar.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ExtraData {
    issuance_details: Option<AttributeIssuanceDetails>,
    #[serde(skip)]
    issuance_error: Option<IssuanceTokenError>,
}

impl ExtraData {
    pub(crate) fn with_issuance_details(details: AttributeIssuanceDetails) -> Self {
        Self {
            issuance_details: Some(details),
            issuance_error: None,
        }
    }

    pub(crate) fn with_issuance_error(error: IssuanceTokenError) -> Self {
        Self {
            issuance_details: None,
            issuance_error: Some(error),
        }
    }

    /// Die Ausstellungsdetails, `Ok(None)` wenn der Beleg keine enthält.
    pub fn attribute_issuance_details(&self) -> Result<Option<&AttributeIssuanceDetails>, &IssuanceTokenError> {
        match &self.issuance_error {
            Some(e) => Err(e),
            None => Ok(self.issuance_details.as_ref()),
        }
    }
}
