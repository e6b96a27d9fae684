//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Keine Prompts gefunden. Bitte fügen Sie zuerst Prompts hinzu.")]
    EmptyCatalogue,

    #[error("Keine Bilder gefunden")]
    EmptyFileList,

    #[error("Ungültige Daten: {0}")]
    Parse(String),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON-Fehler: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 入力エラー（処理前に検出され、出力は一切生成されない）
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::EmptyCatalogue | Error::EmptyFileList)
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO-Fehler"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON-Fehler"));
    }

    #[test]
    fn test_error_display_input() {
        assert_eq!(
            Error::EmptyCatalogue.to_string(),
            "Keine Prompts gefunden. Bitte fügen Sie zuerst Prompts hinzu."
        );
        assert_eq!(Error::EmptyFileList.to_string(), "Keine Bilder gefunden");
    }

    #[test]
    fn test_is_input_error() {
        assert!(Error::EmptyCatalogue.is_input_error());
        assert!(Error::EmptyFileList.is_input_error());
        assert!(!Error::Parse("x".into()).is_input_error());
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
