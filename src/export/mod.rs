//! メタデータのファイル出力
//!
//! 文字列の生成は共通ライブラリ側。ここではファイル名の決定と書き込みのみ。

use crate::cli::ExportFormat;
use crate::error::Result;
use prompt_meta_common::export::{CSV_MIME, JSON_MIME};
use prompt_meta_common::{CsvStyle, GenerationOutput, GenerationSummary, UnmatchedFile};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CSV_FILE_NAME: &str = "metadata.csv";
pub const JSON_FILE_NAME: &str = "metadata.json";
pub const REPORT_FILE_NAME: &str = "metadata-report.json";

/// 書き込んだファイル
#[derive(Debug, Clone, Default)]
pub struct WrittenFiles {
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

impl WrittenFiles {
    /// 書き込んだファイルとMIMEタイプ（CSV → JSONの順）
    pub fn files(&self) -> Vec<OutputFile> {
        let csv = self.csv.as_ref().map(|p| OutputFile::new(p, CSV_MIME));
        let json = self.json.as_ref().map(|p| OutputFile::new(p, JSON_MIME));
        csv.into_iter().chain(json).collect()
    }
}

/// レポートに載せる出力ファイル
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFile {
    pub file_name: String,
    pub mime_type: &'static str,
}

impl OutputFile {
    fn new(path: &Path, mime_type: &'static str) -> Self {
        Self {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            mime_type,
        }
    }
}

/// 生成レポート（集計と未照合ファイルの一覧）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub generated_at: String,
    pub summary: GenerationSummary,
    pub files: Vec<OutputFile>,
    pub unmatched: Vec<UnmatchedFile>,
}

impl GenerationReport {
    pub fn new(output: &GenerationOutput, written: &WrittenFiles) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary: output.summary.clone(),
            files: written.files(),
            unmatched: output.unmatched_files(),
        }
    }
}

/// CSV/JSONを出力ディレクトリに書き込む
pub fn write_outputs(
    output: &GenerationOutput,
    output_dir: &Path,
    format: &ExportFormat,
    csv_style: CsvStyle,
) -> Result<WrittenFiles> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = WrittenFiles::default();

    if matches!(format, ExportFormat::Csv | ExportFormat::Both) {
        let path = output_dir.join(CSV_FILE_NAME);
        std::fs::write(&path, output.to_csv_with(csv_style))?;
        log::debug!("CSV geschrieben ({}): {}", csv_style, path.display());
        written.csv = Some(path);
    }

    if matches!(format, ExportFormat::Json | ExportFormat::Both) {
        let path = output_dir.join(JSON_FILE_NAME);
        std::fs::write(&path, output.to_json()?)?;
        log::debug!("JSON geschrieben: {}", path.display());
        written.json = Some(path);
    }

    Ok(written)
}

/// レポートを書き込む
pub fn write_report(
    output: &GenerationOutput,
    written: &WrittenFiles,
    output_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(REPORT_FILE_NAME);
    let json = serde_json::to_string_pretty(&GenerationReport::new(output, written))?;
    std::fs::write(&path, json)?;
    Ok(path)
}
