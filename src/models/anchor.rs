//! # src/models/anchor.rs
//!
//! Schmale Schnittstelle zur externen Anchor-Auflösung. Der Kern interpretiert
//! die Zertifikate eines Anchors nicht selbst, sondern lässt sie von einem
//! `AnchorResolver` in "Sources" und "Verifiers" einordnen.

use crate::models::wire::RawAnchor;
use serde::Serialize;

/// Rolle eines Anchors in der Herkunftskette eines Attributs.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorType {
    /// Beschreibt, wie und wann der Wert erfasst wurde.
    Source,
    /// Beschreibt, wie und wann der Wert von einem Dritten geprüft wurde.
    Verifier,
    Unknown,
}

/// Ein aufgelöster Anchor. Die Rohdaten bleiben für nachgelagerte Prüfungen erhalten.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Anchor {
    pub anchor_type: AnchorType,
    pub sub_type: String,
    #[serde(skip)]
    pub raw: RawAnchor,
}

/// Ordnet einen rohen Anchor-Datensatz einer Rolle zu.
///
/// Implementierungen müssen `Send + Sync` sein, damit dieselbe Instanz von
/// mehreren Aufrufern parallel verwendet werden kann.
pub trait AnchorResolver: Send + Sync {
    fn resolve(&self, raw: &RawAnchor) -> Anchor;
}

/// DER-Kodierung der OID 1.3.6.1.4.1.47127.1.1.1 (Source-Anchor-Erweiterung).
const SOURCE_EXTENSION_OID: &[u8] = &[
    0x06, 0x0B, 0x2B, 0x06, 0x01, 0x04, 0x01, 0x82, 0xF0, 0x17, 0x01, 0x01, 0x01,
];
/// DER-Kodierung der OID 1.3.6.1.4.1.47127.1.1.2 (Verifier-Anchor-Erweiterung).
const VERIFIER_EXTENSION_OID: &[u8] = &[
    0x06, 0x0B, 0x2B, 0x06, 0x01, 0x04, 0x01, 0x82, 0xF0, 0x17, 0x01, 0x01, 0x02,
];

/// Standard-Resolver: sucht in den Ursprungszertifikaten nach der Markierungs-OID
/// für Source- bzw. Verifier-Anchors. Es findet keine ASN.1-Dekodierung statt.
#[derive(Debug, Default, Clone, Copy)]
pub struct CertificateMarkerResolver;

impl AnchorResolver for CertificateMarkerResolver {
    fn resolve(&self, raw: &RawAnchor) -> Anchor {
        let contains = |marker: &[u8]| {
            raw.origin_server_certs
                .iter()
                .any(|cert| cert.windows(marker.len()).any(|w| w == marker))
        };

        let anchor_type = if contains(SOURCE_EXTENSION_OID) {
            AnchorType::Source
        } else if contains(VERIFIER_EXTENSION_OID) {
            AnchorType::Verifier
        } else {
            AnchorType::Unknown
        };

        Anchor {
            anchor_type,
            sub_type: raw.sub_type.clone(),
            raw: raw.clone(),
        }
    }
}

/// Löst alle Anchors auf und gruppiert sie in `(sources, verifiers)`.
/// Anchors mit unbekannter Rolle tauchen in keiner der beiden Gruppen auf.
pub fn group_anchors(raw: &[RawAnchor], resolver: &dyn AnchorResolver) -> (Vec<Anchor>, Vec<Anchor>) {
    raw.iter()
        .map(|a| resolver.resolve(a))
        .filter(|a| a.anchor_type != AnchorType::Unknown)
        .partition(|a| a.anchor_type == AnchorType::Source)
}

/// Die DER-Markierung für Source-Anchors, z.B. zum Erzeugen von Testzertifikaten.
pub fn source_marker() -> &'static [u8] {
    SOURCE_EXTENSION_OID
}

/// Die DER-Markierung für Verifier-Anchors.
pub fn verifier_marker() -> &'static [u8] {
    VERIFIER_EXTENSION_OID
}
