use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Konfigurationsfehler: {0}")]
    Config(String),

    #[error("Keine API-URL konfiguriert. Mit `prompt-meta config --set-api-url URL` setzen oder PROMPT_META_API_URL verwenden")]
    MissingApiUrl,

    #[error("Datei nicht gefunden: {0}")]
    FileNotFound(String),

    #[error("Ordner nicht gefunden: {0}")]
    FolderNotFound(String),

    #[error("API-Fehler: {0}")]
    Api(String),

    #[error("HTTP-Fehler: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Prompt-Katalog nicht verfügbar: {0}")]
    CatalogueUnavailable(String),

    #[error("JSON-Fehler: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] prompt_meta_common::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
