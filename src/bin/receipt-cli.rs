//! # receipt-cli.rs
//!
//! Ein Kommandozeilen-Tool zum Entschlüsseln und Untersuchen von Belegen.
//!
//! ## Befehle:
//! - `decrypt`: Entschlüsselt einen Beleg und gibt das `ActivityDetails` als JSON aus.
//! - `inspect`: Zeigt die Metadaten eines Belegs, ohne etwas zu entschlüsseln.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use receipt_lib::{assemble_activity_details, crypto_utils, Receipt, ReceiptConfig};
use rsa::RsaPrivateKey;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Das Haupt-Struct für das CLI-Tool, das von `clap` geparst wird.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Definiert die verfügbaren Unterbefehle.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Entschlüsselt einen Beleg und gibt Profile und Zusatzdaten als JSON aus.
    Decrypt {
        /// Pfad zur Konfigurationsdatei (.toml) mit `private_key_path`.
        #[arg(short, long, conflicts_with = "key")]
        config: Option<PathBuf>,

        /// Pfad zur PEM-Datei des privaten Schlüssels.
        #[arg(short, long)]
        key: Option<PathBuf>,

        /// Pfad zur JSON-Datei des Belegs.
        receipt_file: PathBuf,
    },

    /// Zeigt die Metadaten eines Belegs an.
    Inspect {
        /// Pfad zur JSON-Datei des Belegs.
        receipt_file: PathBuf,
    },
}

/// Hauptfunktion des Programms.
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decrypt { config, key, receipt_file } => decrypt(config.as_deref(), key.as_deref(), &receipt_file)?,
        Commands::Inspect { receipt_file } => inspect(&receipt_file)?,
    }

    Ok(())
}

/// Installiert den Log-Subscriber. `RUST_LOG` hat Vorrang vor der Konfiguration.
fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn read_receipt(path: &Path) -> Result<Receipt> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Konnte Beleg {} nicht lesen", path.display()))?;
    Receipt::from_json(&json).with_context(|| format!("Beleg {} ist kein gültiges JSON", path.display()))
}

/// Logik für den `decrypt`-Befehl.
fn decrypt(config_path: Option<&Path>, key_path: Option<&Path>, receipt_path: &Path) -> Result<()> {
    let private_key: RsaPrivateKey = match (config_path, key_path) {
        (Some(config_path), _) => {
            let config = ReceiptConfig::from_file(config_path)
                .with_context(|| format!("Konnte Konfiguration {} nicht laden", config_path.display()))?;
            init_logging(&config.log_filter);
            config
                .load_private_key()
                .with_context(|| format!("Konnte Schlüssel {} nicht laden", config.private_key_path.display()))?
        }
        (None, Some(key_path)) => {
            init_logging("info");
            let pem = fs::read_to_string(key_path)
                .with_context(|| format!("Konnte Schlüssel {} nicht lesen", key_path.display()))?;
            crypto_utils::load_private_key_pem(&pem)?
        }
        (None, None) => bail!("Entweder --config oder --key muss angegeben werden"),
    };

    let receipt = read_receipt(receipt_path)?;
    let details = assemble_activity_details(&receipt, &private_key)
        .context("Beleg konnte nicht verarbeitet werden")?;

    println!("{}", serde_json::to_string_pretty(&details)?);
    Ok(())
}

/// Logik für den `inspect`-Befehl.
fn inspect(receipt_path: &Path) -> Result<()> {
    init_logging("info");
    let receipt = read_receipt(receipt_path)?;

    let present = |content: &Option<String>| match content.as_deref() {
        Some(c) if !c.is_empty() => "ja",
        _ => "nein",
    };

    println!("Beleg:          {}", receipt.receipt_id.as_deref().unwrap_or("-"));
    println!("Ergebnis:       {}", receipt.sharing_outcome);
    println!("Zeitstempel:    {}", receipt.timestamp.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".into()));
    println!("Remember-Me-ID: {}", receipt.remember_me_id.as_deref().unwrap_or("-"));
    println!("Nutzerprofil:   {}", present(&receipt.other_party_profile_content));
    println!("App-Profil:     {}", present(&receipt.profile_content));
    println!("Zusatzdaten:    {}", present(&receipt.extra_data_content));
    Ok(())
}
