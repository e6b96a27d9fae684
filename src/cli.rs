use clap::{Parser, Subcommand};
use prompt_meta_common::CsvStyle;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prompt-meta")]
#[command(about = "Bilddateien Prompts zuordnen und Metadaten (CSV/JSON) erzeugen", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Ausführliche Logausgabe
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Cache-Verzeichnis (Standard: OS-Cache-Verzeichnis)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dateinamen dem Katalog zuordnen und Metadaten schreiben
    Generate {
        /// Bildordner oder Dateinamen
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Katalog-JSON (ohne Angabe: vom Prompt-Store laden)
        #[arg(short, long)]
        catalogue: Option<PathBuf>,

        /// Ausgabeverzeichnis
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ausgabeformat (csv/json/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// CSV-Variante (plain/extended/quoted)
        #[arg(long, default_value = "plain")]
        csv_style: CsvStyle,

        /// Beim Ordner-Scan nur Dateien mit bekanntem Präfix
        #[arg(long)]
        known_prefixes_only: bool,

        /// Ohne Store-Verbindung den zwischengespeicherten Katalog verwenden
        #[arg(long)]
        offline: bool,

        /// Zusätzlich einen Bericht mit nicht zugeordneten Dateien schreiben
        #[arg(long)]
        report: bool,
    },

    /// Zuordnung für einen einzelnen Dateinamen anzeigen
    Match {
        #[arg(required = true)]
        filename: String,

        /// Katalog-JSON
        #[arg(short, long)]
        catalogue: Option<PathBuf>,

        #[arg(long)]
        offline: bool,
    },

    /// Prompt-Katalog auflisten
    Prompts {
        /// Nur offene Prompts (erfolgreiche < erwartete Ausführungen)
        #[arg(long)]
        pending: bool,

        /// Maximale Anzahl
        #[arg(short, long)]
        limit: Option<usize>,

        /// Katalog-JSON
        #[arg(short, long)]
        catalogue: Option<PathBuf>,

        #[arg(long)]
        offline: bool,
    },

    /// Erreichbarkeit des Prompt-Stores prüfen
    Health,

    /// Konfiguration anzeigen/ändern
    Config {
        /// Basis-URL der API setzen
        #[arg(long)]
        set_api_url: Option<String>,

        /// API-Token setzen
        #[arg(long)]
        set_token: Option<String>,

        /// Konfiguration anzeigen
        #[arg(long)]
        show: bool,
    },

    /// Katalog-Cache verwalten
    Cache {
        /// Cache löschen
        #[arg(long)]
        clear: bool,

        /// Cache-Informationen anzeigen
        #[arg(long)]
        info: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use csv, json, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
