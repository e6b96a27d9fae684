//! CSV生成

use crate::types::{MatchResult, MetadataRecord};

/// 基本の列
pub const CSV_HEADER: [&str; 5] = ["Filename", "Title", "Keywords", "Category", "Releases"];

/// Extended形式で追加する列
pub const EXTENDED_COLUMNS: [&str; 2] = ["Original Prompt", "Matched Prompt"];

/// 基本形式のCSVを生成する
///
/// Keywordsは常に `"` で囲む。カンマや引用符のエスケープはしない（既存の取り込み側との互換）。
/// 行区切りは `\n`、末尾改行なし。
pub fn to_csv(records: &[MetadataRecord]) -> String {
    let rows = records.iter().map(|r| plain_row(r).join(","));
    join_lines(CSV_HEADER.join(","), rows)
}

/// 抽出フレーズと一致したプロンプトを追加したCSV
///
/// `records` と `matches` は同じ順序・同じ件数であること。
pub fn to_csv_extended(records: &[MetadataRecord], matches: &[MatchResult]) -> String {
    let header = CSV_HEADER
        .iter()
        .chain(EXTENDED_COLUMNS.iter())
        .copied()
        .collect::<Vec<_>>()
        .join(",");

    let rows = records.iter().zip(matches).map(|(record, m)| {
        let matched = m
            .matched_prompt
            .as_ref()
            .map(|p| p.prompt.as_str())
            .unwrap_or("");
        let mut row = plain_row(record);
        row.push(wrap(&m.extracted_phrase));
        row.push(wrap(matched));
        row.join(",")
    });

    join_lines(header, rows)
}

/// RFC 4180準拠のCSV
///
/// カンマ・引用符・改行を含むフィールドを引用し、`"` は `""` に置換する。
pub fn to_csv_quoted(records: &[MetadataRecord]) -> String {
    let rows = records.iter().map(|r| {
        [
            escape_field(&r.filename),
            escape_field(&r.title),
            wrap(&r.keywords.replace('"', "\"\"")),
            escape_field(&r.category),
            escape_field(&r.releases),
        ]
        .join(",")
    });
    join_lines(CSV_HEADER.join(","), rows)
}

fn plain_row(record: &MetadataRecord) -> Vec<String> {
    vec![
        record.filename.clone(),
        record.title.clone(),
        wrap(&record.keywords),
        record.category.clone(),
        record.releases.clone(),
    ]
}

fn wrap(value: &str) -> String {
    format!("\"{}\"", value)
}

fn escape_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\r' | '\n')) {
        wrap(&value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn join_lines(header: String, rows: impl Iterator<Item = String>) -> String {
    std::iter::once(header).chain(rows).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PromptEntry;

    fn fox_record() -> MetadataRecord {
        let entry = PromptEntry::new("1", "Fox", "red fox", "fox,snow");
        MetadataRecord::matched("quicklink_red_fox_9f3_001.png", &entry)
    }

    #[test]
    fn test_to_csv() {
        let records = vec![fox_record(), MetadataRecord::unmatched("unrelated_xyz.png")];
        let csv = to_csv(&records);
        assert_eq!(
            csv,
            "Filename,Title,Keywords,Category,Releases\n\
             quicklink_red_fox_9f3_001.png,Fox,\"fox,snow\",8,\n\
             unrelated_xyz.png,Kein passender Prompt gefunden,\"\",8,"
        );
    }

    #[test]
    fn test_to_csv_header_only() {
        assert_eq!(to_csv(&[]), "Filename,Title,Keywords,Category,Releases");
    }

    #[test]
    fn test_to_csv_does_not_escape() {
        let record = MetadataRecord {
            filename: "a,b.png".into(),
            title: "Say \"hi\"".into(),
            keywords: "x\"y".into(),
            category: "8".into(),
            releases: String::new(),
        };
        let csv = to_csv(&[record]);
        assert!(csv.ends_with("a,b.png,Say \"hi\",\"x\"y\",8,"));
    }

    #[test]
    fn test_to_csv_extended() {
        let entry = PromptEntry::new("1", "Fox", "a red fox", "fox");
        let matches = vec![
            MatchResult {
                filename: "quicklink_red_fox_1_a.png".into(),
                matched_prompt: Some(entry.clone()),
                extracted_phrase: "red fox".into(),
                normalized_phrase: "red fox".into(),
            },
            MatchResult {
                filename: "x.png".into(),
                matched_prompt: None,
                extracted_phrase: "x".into(),
                normalized_phrase: "x".into(),
            },
        ];
        let records = vec![
            MetadataRecord::matched("quicklink_red_fox_1_a.png", &entry),
            MetadataRecord::unmatched("x.png"),
        ];
        let csv = to_csv_extended(&records, &matches);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Filename,Title,Keywords,Category,Releases,Original Prompt,Matched Prompt"
        );
        assert_eq!(lines[1], "quicklink_red_fox_1_a.png,Fox,\"fox\",8,,\"red fox\",\"a red fox\"");
        assert_eq!(lines[2], "x.png,Kein passender Prompt gefunden,\"\",8,,\"x\",\"\"");
    }

    #[test]
    fn test_to_csv_quoted() {
        let record = MetadataRecord {
            filename: "a,b.png".into(),
            title: "Say \"hi\"".into(),
            keywords: "x\"y".into(),
            category: "8".into(),
            releases: String::new(),
        };
        let csv = to_csv_quoted(&[record, fox_record()]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "\"a,b.png\",\"Say \"\"hi\"\"\",\"x\"\"y\",8,");
        // 特殊文字がなければ基本形式と同じ
        assert_eq!(lines[2], "quicklink_red_fox_9f3_001.png,Fox,\"fox,snow\",8,");
    }

    #[test]
    fn test_to_csv_quoted_newline() {
        let record = MetadataRecord {
            title: "zwei\nZeilen".into(),
            ..MetadataRecord::unmatched("n.png")
        };
        assert!(to_csv_quoted(&[record]).contains("\"zwei\nZeilen\""));
    }
}
