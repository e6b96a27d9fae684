//! プロンプトカタログの読み込みと絞り込み
//!
//! ストアのレスポンス・管理画面のJSONエクスポートのどちらからでも読めるようにする。

use crate::error::{Error, Result};
use crate::types::PromptEntry;
use serde::Deserialize;

/// カタログJSONの受け入れ形式
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogueDocument {
    /// `[ {...}, ... ]`
    List(Vec<PromptEntry>),
    /// `{ "prompts": [...] }`
    Prompts { prompts: Vec<PromptEntry> },
    /// `{ "success": true, "data": ... }`
    Envelope {
        success: bool,
        data: Option<Box<CatalogueDocument>>,
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
}

impl CatalogueDocument {
    fn into_entries(self) -> Result<Vec<PromptEntry>> {
        match self {
            CatalogueDocument::List(entries) => Ok(entries),
            CatalogueDocument::Prompts { prompts } => Ok(prompts),
            CatalogueDocument::Envelope {
                success: true,
                data: Some(data),
                ..
            } => data.into_entries(),
            CatalogueDocument::Envelope { success: true, data: None, .. } => Ok(Vec::new()),
            CatalogueDocument::Envelope { error, message, .. } => Err(Error::Parse(
                error
                    .or(message)
                    .unwrap_or_else(|| "Prompt-Abfrage fehlgeschlagen".to_string()),
            )),
        }
    }
}

/// カタログJSONをパースする
///
/// 配列、`{ "prompts": [...] }`、ストアのエンベロープ形式に対応。
pub fn parse_catalogue(json: &str) -> Result<Vec<PromptEntry>> {
    let document: CatalogueDocument = serde_json::from_str(json)
        .map_err(|e| Error::Parse(format!("Katalog-JSON ungültig: {}", e)))?;
    document.into_entries()
}

/// ファイルからカタログを読み込む
pub fn load_catalogue(path: &std::path::Path) -> Result<Vec<PromptEntry>> {
    let content = std::fs::read_to_string(path)?;
    parse_catalogue(&content)
}

/// 予定回数に達していないプロンプト（カタログ順）
///
/// `limit` が `None` または0なら全件。
pub fn pending(catalogue: &[PromptEntry], limit: Option<usize>) -> Vec<&PromptEntry> {
    catalogue
        .iter()
        .filter(|p| p.is_pending())
        .take(effective_limit(limit))
        .collect()
}

/// 先頭から `limit` 件（`pending` と同じく `None`/0は全件）
pub fn limited(catalogue: &[PromptEntry], limit: Option<usize>) -> Vec<&PromptEntry> {
    catalogue.iter().take(effective_limit(limit)).collect()
}

fn effective_limit(limit: Option<usize>) -> usize {
    match limit {
        Some(n) if n > 0 => n,
        _ => usize::MAX,
    }
}
