//! プロンプト照合
//!
//! 抽出したフレーズとカタログのプロンプトを、正規化後の部分一致（双方向）で照合する。
//! カタログ順で最初に一致した項目を採用する（最長一致・スコアリングはしない）。

use crate::filename::extract_phrase;
use crate::types::{MatchResult, PromptEntry};

/// 照合時に削除する文字（置換ではなく削除）
const STRIPPED_CHARS: [char; 4] = ['ä', 'ö', 'ü', 'ß'];

/// 小文字化してウムラウトとßを削除する
///
/// `"Möwe"` は `"mwe"` になる（`"moewe"` ではない）。
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect()
}

/// 正規化済みの2つの文字列が関連するか（どちらかがもう一方を含む）
///
/// 空文字列はどちらの側でも一致しない。
pub fn is_related(normalized_phrase: &str, normalized_prompt: &str) -> bool {
    if normalized_phrase.is_empty() || normalized_prompt.is_empty() {
        return false;
    }
    normalized_prompt.contains(normalized_phrase) || normalized_phrase.contains(normalized_prompt)
}

/// フレーズに対応するカタログ項目を探す
///
/// カタログ順で最初の一致を返す。一致なし・空カタログは `None`。
pub fn find_prompt<'a>(phrase: &str, catalogue: &'a [PromptEntry]) -> Option<&'a PromptEntry> {
    let normalized = normalize(phrase);
    find_normalized(&normalized, catalogue)
}

fn find_normalized<'a>(normalized: &str, catalogue: &'a [PromptEntry]) -> Option<&'a PromptEntry> {
    catalogue
        .iter()
        .find(|entry| is_related(normalized, &normalize(&entry.prompt)))
}

/// ファイル名1件を照合する
pub fn match_file(filename: &str, catalogue: &[PromptEntry]) -> MatchResult {
    let extracted_phrase = extract_phrase(filename);
    let normalized_phrase = normalize(&extracted_phrase);
    let matched_prompt = find_normalized(&normalized_phrase, catalogue).cloned();

    match &matched_prompt {
        Some(entry) => log::debug!("{} -> \"{}\" ({})", filename, entry.title, entry.id),
        None => log::debug!("{} -> kein Treffer für \"{}\"", filename, normalized_phrase),
    }

    MatchResult {
        filename: filename.to_string(),
        matched_prompt,
        extracted_phrase,
        normalized_phrase,
    }
}
