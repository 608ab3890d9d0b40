//! # src/config.rs
//!
//! Laden der Konfiguration aus einer TOML-Datei.
//!
//! ```toml
//! private_key_path = "keys/application.pem"
//! log_filter = "receipt_lib=debug"
//! ```

use crate::error::ReceiptCoreError;
use crate::services::crypto_utils;
use rsa::RsaPrivateKey;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn default_log_filter() -> String {
    "info".to_string()
}

/// Die Konfiguration einer Anwendung, die Belege verarbeitet.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReceiptConfig {
    /// Pfad zur PEM-Datei des privaten RSA-Schlüssels (PKCS#1 oder PKCS#8).
    pub private_key_path: PathBuf,
    /// Filter für `tracing-subscriber`, z.B. `"info"` oder `"receipt_lib=debug"`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Parst eine Konfiguration aus einem TOML-String.
pub fn load_config(toml_str: &str) -> Result<ReceiptConfig, ReceiptCoreError> {
    let config: ReceiptConfig = toml::from_str(toml_str)?;
    Ok(config)
}

impl ReceiptConfig {
    /// Liest die Konfiguration aus einer Datei. Ein relativer Schlüsselpfad
    /// wird relativ zum Verzeichnis der Konfigurationsdatei aufgelöst.
    pub fn from_file(path: &Path) -> Result<Self, ReceiptCoreError> {
        let content = fs::read_to_string(path)?;
        let mut config = load_config(&content)?;

        if config.private_key_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.private_key_path = dir.join(&config.private_key_path);
            }
        }
        Ok(config)
    }

    /// Liest und parst den privaten Schlüssel aus `private_key_path`.
    pub fn load_private_key(&self) -> Result<RsaPrivateKey, ReceiptCoreError> {
        let pem = fs::read_to_string(&self.private_key_path)?;
        Ok(crypto_utils::load_private_key_pem(&pem)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_defaults_to_info() {
        let config = load_config(r#"private_key_path = "key.pem""#).unwrap();
        assert_eq!(config.private_key_path, PathBuf::from("key.pem"));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_missing_key_path_is_rejected() {
        let result = load_config(r#"log_filter = "debug""#);
        assert!(matches!(result, Err(ReceiptCoreError::Toml(_))));
    }
}
