//! # src/models/activity.rs
//!
//! Das Endergebnis der Beleg-Verarbeitung. Wird nur vollständig erzeugt;
//! danach ist es schreibgeschützt.

use crate::models::extra_data::ExtraData;
use crate::models::profile::{ApplicationProfile, UserProfile};
use crate::models::receipt::{Receipt, SharingOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, Debug, Clone)]
pub struct ActivityDetails {
    user_profile: UserProfile,
    application_profile: ApplicationProfile,
    extra_data: ExtraData,
    remember_me_id: Option<String>,
    parent_remember_me_id: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    receipt_id: Option<String>,
    outcome: SharingOutcome,
}

impl ActivityDetails {
    /// Übernimmt die Metadaten unverändert aus dem Beleg.
    pub(crate) fn new(
        receipt: &Receipt,
        user_profile: UserProfile,
        application_profile: ApplicationProfile,
        extra_data: ExtraData,
    ) -> Self {
        Self {
            user_profile,
            application_profile,
            extra_data,
            remember_me_id: receipt.remember_me_id.clone(),
            parent_remember_me_id: receipt.parent_remember_me_id.clone(),
            timestamp: receipt.timestamp,
            receipt_id: receipt.receipt_id.clone(),
            outcome: receipt.sharing_outcome.clone(),
        }
    }

    pub fn user_profile(&self) -> &UserProfile {
        &self.user_profile
    }

    pub fn application_profile(&self) -> &ApplicationProfile {
        &self.application_profile
    }

    pub fn extra_data(&self) -> &ExtraData {
        &self.extra_data
    }

    /// Stabile, pseudonyme ID eines wiederkehrenden Nutzers (pro Anwendung verschieden).
    pub fn remember_me_id(&self) -> Option<&str> {
        self.remember_me_id.as_deref()
    }

    pub fn parent_remember_me_id(&self) -> Option<&str> {
        self.parent_remember_me_id.as_deref()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn receipt_id(&self) -> Option<&str> {
        self.receipt_id.as_deref()
    }

    pub fn outcome(&self) -> &SharingOutcome {
        &self.outcome
    }
}
