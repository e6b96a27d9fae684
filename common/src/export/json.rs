//! JSON生成

use crate::error::Result;
use crate::types::MetadataRecord;

/// レコード配列を2スペースインデントで整形する
pub fn to_json(records: &[MetadataRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// `to_json` の出力を読み戻す
pub fn from_json(json: &str) -> Result<Vec<MetadataRecord>> {
    Ok(serde_json::from_str(json)?)
}
