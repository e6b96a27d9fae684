//! データモデル
//!
//! - PromptEntry: プロンプトストアのカタログ項目（読み取り専用）
//! - MatchResult: ファイル名ごとの照合結果（リクエスト内でのみ使用）
//! - MetadataRecord: 出力メタデータ（1ファイル1レコード）
//! - GenerationSummary: 生成結果の集計

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};

/// 出力レコードのカテゴリ（固定値）
pub const CATEGORY: &str = "8";

/// 照合できなかったファイルのタイトル
pub const UNMATCHED_TITLE: &str = "Kein passender Prompt gefunden";

/// プロンプトカタログの項目
///
/// PHP版・Node版どちらのストアのJSONも読めるようにしている。
/// 実行回数は文字列で保存されていることがあるが、ここでは数値として保持し数値で比較する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEntry {
    #[serde(default, deserialize_with = "de_id")]
    pub id: String,

    #[serde(default, deserialize_with = "de_text")]
    pub title: String,

    /// 照合キー
    #[serde(default, deserialize_with = "de_text")]
    pub prompt: String,

    /// カンマ/空白区切りのタグ
    #[serde(default, deserialize_with = "de_keywords")]
    pub keywords: String,

    #[serde(default, alias = "expectedRuns", deserialize_with = "de_runs")]
    pub expected_runs: u32,

    #[serde(default, alias = "successfulRuns", deserialize_with = "de_runs")]
    pub successful_runs: u32,
}

impl PromptEntry {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        prompt: impl Into<String>,
        keywords: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            prompt: prompt.into(),
            keywords: keywords.into(),
            ..Default::default()
        }
    }

    /// 予定回数に達していない
    pub fn is_pending(&self) -> bool {
        self.successful_runs < self.expected_runs
    }

    /// 進捗率（%）。予定回数0は完了扱い
    pub fn progress_percent(&self) -> u32 {
        if self.expected_runs == 0 {
            return 100;
        }
        (self.successful_runs as f64 / self.expected_runs as f64 * 100.0).round() as u32
    }

    /// キーワードを個別のタグに分割
    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Keywords {
    Text(String),
    List(Vec<String>),
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn de_keywords<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Keywords>::deserialize(deserializer)? {
        Some(Keywords::Text(s)) => s,
        Some(Keywords::List(list)) => list.join(","),
        None => String::new(),
    })
}

fn de_runs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Scalar::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| de::Error::custom(format!("ungültiger Zähler: {}", n))),
        Some(Scalar::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse::<u32>()
                .map_err(|_| de::Error::custom(format!("ungültiger Zähler: {}", s)))
        }
    }
}

/// ファイル名1件の照合結果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub filename: String,
    pub matched_prompt: Option<PromptEntry>,
    /// ファイル名から抽出したフレーズ
    pub extracted_phrase: String,
    /// 正規化後のフレーズ（小文字化・ウムラウト削除）
    pub normalized_phrase: String,
}

impl MatchResult {
    pub fn is_matched(&self) -> bool {
        self.matched_prompt.is_some()
    }
}

/// 出力メタデータ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub filename: String,
    pub title: String,
    pub keywords: String,
    pub category: String,
    pub releases: String,
}

impl MetadataRecord {
    pub fn matched(filename: &str, entry: &PromptEntry) -> Self {
        Self {
            filename: filename.to_string(),
            title: entry.title.clone(),
            keywords: entry.keywords.clone(),
            category: CATEGORY.to_string(),
            releases: String::new(),
        }
    }

    pub fn unmatched(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            title: UNMATCHED_TITLE.to_string(),
            keywords: String::new(),
            category: CATEGORY.to_string(),
            releases: String::new(),
        }
    }
}

/// 照合できなかったファイルの詳細（画面表示用）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedFile {
    pub filename: String,
    /// 抽出したフレーズ
    pub original_prompt: String,
    /// ウムラウト削除後
    pub cleaned_prompt: String,
}

impl From<&MatchResult> for UnmatchedFile {
    fn from(m: &MatchResult) -> Self {
        Self {
            filename: m.filename.clone(),
            original_prompt: m.extracted_phrase.clone(),
            cleaned_prompt: m.normalized_phrase.clone(),
        }
    }
}

/// 生成結果の区分（全件成功/一部未照合/全件未照合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SummaryStatus {
    Success,
    Partial,
    NoMatches,
}

/// 生成結果の集計
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    pub files_processed: usize,
    pub metadata_generated: usize,
    pub message: String,
    pub status: SummaryStatus,
}
