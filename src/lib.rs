//! # receipt_core
//!
//! Die Kernlogik zum Entschlüsseln von Belegen eines Identitäts-Sharing-Dienstes.
//! Aus einem Beleg (verpackter Schlüssel plus verschlüsselte Inhalte) und dem
//! privaten RSA-Schlüssel der Anwendung entsteht ein typisiertes `ActivityDetails`
//! mit Nutzerprofil, Anwendungsprofil und Zusatzdaten.

// Deklariert die Hauptmodule der Bibliothek und macht sie öffentlich.
pub mod config;
pub mod error;
pub mod models;
pub mod services;

// Re-exportiert die wichtigsten öffentlichen Typen für eine einfachere Nutzung.

// Modelle
pub use models::activity::ActivityDetails;
pub use models::anchor::{Anchor, AnchorResolver, AnchorType, CertificateMarkerResolver};
pub use models::attribute::{AttributeValue, Image, ImageType, TypedAttribute};
pub use models::extra_data::{AttributeDefinition, AttributeIssuanceDetails, ExtraData};
pub use models::profile::{AgeCheckType, AgeVerification, ApplicationProfile, Profile, UserProfile};
pub use models::receipt::{Receipt, SharingOutcome};

// Fehler
pub use error::{AttributeParseError, IssuanceTokenError, ReceiptCoreError};

// Services
pub use config::{load_config, ReceiptConfig};
pub use services::crypto_utils;
pub use services::profile_assembler::{assemble_activity_details, assemble_activity_details_with_resolver};
