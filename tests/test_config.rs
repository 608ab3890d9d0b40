// cargo test --test test_config


#[cfg(test)]
mod tests {
    use super::test_utils::{successful_receipt, text_attr, TEST_KEY};
    use receipt_lib::crypto_utils::CryptoError;
    use receipt_lib::{assemble_activity_details, load_config, ReceiptConfig, ReceiptCoreError};
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_from_str() {
        let config = load_config(
            r#"
            private_key_path = "/etc/receipts/application.pem"
            log_filter = "receipt_lib=debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.private_key_path, PathBuf::from("/etc/receipts/application.pem"));
        assert_eq!(config.log_filter, "receipt_lib=debug");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = load_config(
            r#"
            private_key_path = "key.pem"
            private_key_password = "secret"
            "#,
        );
        assert!(matches!(result, Err(ReceiptCoreError::Toml(_))));
    }

    #[test]
    fn test_from_file_resolves_relative_key_path_and_loads_key() {
        // --- 1. SETUP ---
        let temp_dir = tempdir().expect("Failed to create temp dir");
        fs::create_dir_all(temp_dir.path().join("keys")).unwrap();
        let pem = TEST_KEY.to_pkcs8_pem(LineEnding::LF).unwrap();
        fs::write(temp_dir.path().join("keys/application.pem"), pem.as_bytes()).unwrap();

        let config_path = temp_dir.path().join("receipt.toml");
        fs::write(&config_path, "private_key_path = \"keys/application.pem\"\n").unwrap();

        // --- 2. ACTION ---
        let config = ReceiptConfig::from_file(&config_path).unwrap();
        let private_key = config.load_private_key().unwrap();

        // --- 3. VERIFICATION ---
        assert_eq!(config.private_key_path, temp_dir.path().join("keys/application.pem"));
        assert_eq!(config.log_filter, "info");
        assert_eq!(private_key, *TEST_KEY);

        let receipt = successful_receipt(vec![text_attr("given_names", "Alice")], vec![]);
        let details = assemble_activity_details(&receipt, &private_key).unwrap();
        assert_eq!(details.user_profile().given_names().unwrap().as_text(), Some("Alice"));
    }

    #[test]
    fn test_missing_or_invalid_key_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");

        let config = load_config(&format!(
            "private_key_path = {:?}",
            temp_dir.path().join("missing.pem").display().to_string()
        ))
        .unwrap();
        assert!(matches!(config.load_private_key(), Err(ReceiptCoreError::Io(_))));

        let invalid = temp_dir.path().join("invalid.pem");
        fs::write(&invalid, "not a pem file").unwrap();
        let config = ReceiptConfig {
            private_key_path: invalid,
            log_filter: "info".to_string(),
        };
        assert!(matches!(
            config.load_private_key(),
            Err(ReceiptCoreError::Crypto(CryptoError::InvalidKey(_)))
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let result = ReceiptConfig::from_file(&PathBuf::from("/nonexistent/receipt.toml"));
        assert!(matches!(result, Err(ReceiptCoreError::Io(_))));
    }
}
