//! メタデータのシリアライズ（CSV/JSON）
//!
//! CLIからもWeb側からも同じ文字列を生成できるよう、I/Oは行わない。

pub mod csv;
pub mod json;

use crate::types::{MatchResult, MetadataRecord};

/// CSVのMIMEタイプ
pub const CSV_MIME: &str = "text/csv;charset=utf-8";

/// JSONのMIMEタイプ
pub const JSON_MIME: &str = "application/json";

/// CSVの出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CsvStyle {
    /// 5列。Keywordsのみ引用符で囲み、エスケープしない
    #[default]
    Plain,
    /// Plain + 抽出フレーズ・一致したプロンプトの2列
    Extended,
    /// RFC 4180準拠の引用・エスケープ
    Quoted,
}

impl CsvStyle {
    pub fn render(&self, records: &[MetadataRecord], matches: &[MatchResult]) -> String {
        match self {
            CsvStyle::Plain => csv::to_csv(records),
            CsvStyle::Extended => csv::to_csv_extended(records, matches),
            CsvStyle::Quoted => csv::to_csv_quoted(records),
        }
    }
}

impl std::str::FromStr for CsvStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(CsvStyle::Plain),
            "extended" | "ext" => Ok(CsvStyle::Extended),
            "quoted" | "rfc4180" => Ok(CsvStyle::Quoted),
            _ => Err(format!("Unknown CSV style: {}. Use plain, extended, or quoted", s)),
        }
    }
}

impl std::fmt::Display for CsvStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvStyle::Plain => write!(f, "plain"),
            CsvStyle::Extended => write!(f, "extended"),
            CsvStyle::Quoted => write!(f, "quoted"),
        }
    }
}
