use prompt_meta_common::PromptEntry;
use serde::Deserialize;

/// ストア共通のレスポンス形式
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `/prompts` と `/prompts/pending` の `data`
///
/// Node版は `{ prompts, total }`、PHP版は `{ prompts }`、古いpendingは配列そのもの。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PromptPayload {
    Page {
        prompts: Vec<PromptEntry>,
        #[serde(default)]
        total: Option<usize>,
    },
    List(Vec<PromptEntry>),
}

impl PromptPayload {
    pub fn into_parts(self) -> (Vec<PromptEntry>, Option<usize>) {
        match self {
            PromptPayload::Page { prompts, total } => (prompts, total),
            PromptPayload::List(prompts) => (prompts, None),
        }
    }
}

/// `/health` のレスポンス（エンベロープなし）
#[derive(Debug, Default, Deserialize)]
pub struct HealthBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}

/// ヘルスチェック結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub reachable: bool,
    pub message: String,
    /// DB接続状態（ストアが返した場合のみ）
    pub database: Option<String>,
}

impl HealthStatus {
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            reachable: false,
            message: message.into(),
            database: None,
        }
    }
}
