//! メタデータ生成
//!
//! ファイル名リストとカタログから、1ファイル1レコードのメタデータを生成する。
//!
//! ## 処理フロー
//! 1. 入力チェック（空のファイルリスト・空のカタログはエラー）
//! 2. ファイル名ごとにフレーズ抽出 → 照合
//! 3. 入力順のままレコード化、未照合ファイルを記録
//! 4. 集計メッセージを決定

use crate::error::{Error, Result};
use crate::export::{self, CsvStyle};
use crate::matcher::match_file;
use crate::types::{
    GenerationSummary, MatchResult, MetadataRecord, PromptEntry, SummaryStatus, UnmatchedFile,
};

/// 生成結果
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutput {
    /// 入力順のレコード
    pub records: Vec<MetadataRecord>,
    /// 入力順の照合結果
    pub matches: Vec<MatchResult>,
    /// 未照合のファイル名（入力順）
    pub unmatched: Vec<String>,
    pub summary: GenerationSummary,
}

impl GenerationOutput {
    /// 基本形式のCSV
    pub fn to_csv(&self) -> String {
        export::csv::to_csv(&self.records)
    }

    /// 指定形式のCSV
    pub fn to_csv_with(&self, style: CsvStyle) -> String {
        style.render(&self.records, &self.matches)
    }

    pub fn to_json(&self) -> Result<String> {
        export::json::to_json(&self.records)
    }

    /// 未照合ファイルの詳細（抽出フレーズ付き）
    pub fn unmatched_files(&self) -> Vec<UnmatchedFile> {
        self.matches
            .iter()
            .filter(|m| !m.is_matched())
            .map(UnmatchedFile::from)
            .collect()
    }
}

/// メタデータを生成する
///
/// # Arguments
/// * `filenames` - 画像ファイル名（順序は出力に保持される）
/// * `catalogue` - プロンプトストアから取得済みのカタログ
///
/// # Returns
/// * `Ok(GenerationOutput)` - 一致0件でも成功として返す
/// * `Err(Error::EmptyFileList | Error::EmptyCatalogue)` - 入力エラー
pub fn generate<S: AsRef<str>>(
    filenames: &[S],
    catalogue: &[PromptEntry],
) -> Result<GenerationOutput> {
    if filenames.is_empty() {
        return Err(Error::EmptyFileList);
    }
    if catalogue.is_empty() {
        return Err(Error::EmptyCatalogue);
    }

    let mut records = Vec::with_capacity(filenames.len());
    let mut matches = Vec::with_capacity(filenames.len());
    let mut unmatched = Vec::new();

    for filename in filenames {
        let filename = filename.as_ref();
        let result = match_file(filename, catalogue);

        let record = match &result.matched_prompt {
            Some(entry) => MetadataRecord::matched(filename, entry),
            None => {
                unmatched.push(filename.to_string());
                MetadataRecord::unmatched(filename)
            }
        };

        records.push(record);
        matches.push(result);
    }

    let summary = summarize(filenames.len(), records.len(), unmatched.len());

    Ok(GenerationOutput {
        records,
        matches,
        unmatched,
        summary,
    })
}

/// 集計とメッセージ
///
/// - 未照合なし: 成功
/// - 全件未照合: 警告（一致なし）
/// - 一部未照合: 警告（n von m）
pub fn summarize(files_processed: usize, record_count: usize, unmatched_count: usize) -> GenerationSummary {
    let (status, message) = if unmatched_count == 0 {
        (SummaryStatus::Success, "Metadaten erfolgreich generiert".to_string())
    } else if unmatched_count == record_count {
        (
            SummaryStatus::NoMatches,
            "Warnung: Keine Übereinstimmungen gefunden!".to_string(),
        )
    } else {
        (
            SummaryStatus::Partial,
            format!(
                "Warnung: {} von {} Dateien ohne Übereinstimmung",
                unmatched_count, record_count
            ),
        )
    };

    GenerationSummary {
        files_processed,
        metadata_generated: record_count - unmatched_count,
        message,
        status,
    }
}
