use crate::error::{AppError, Result};
use prompt_meta_common::has_known_prefix;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// quicklink_ / drunkenmunkey1986_86250_ で始まるファイルのみ
    pub known_prefixes_only: bool,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// フォルダ直下の画像ファイル名（名前順）
pub fn scan_folder(folder: &Path, options: &ScanOptions) -> Result<Vec<String>> {
    if !folder.is_dir() {
        return Err(AppError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || !is_image_path(path) {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if options.known_prefixes_only && !has_known_prefix(&file_name) {
            log::debug!("übersprungen (unbekanntes Präfix): {}", file_name);
            continue;
        }

        images.push(file_name);
    }

    // ファイル名でソート
    images.sort();

    Ok(images)
}

/// 入力（フォルダまたはファイル名）をファイル名のリストにする
///
/// フォルダはスキャンし、それ以外は最後のパス要素をそのまま使う（存在確認はしない）。
/// 入力順は保持する。
pub fn collect_filenames(inputs: &[PathBuf], options: &ScanOptions) -> Result<Vec<String>> {
    let mut filenames = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let images = scan_folder(input, options)?;
            log::info!("{}: {} Bilder", input.display(), images.len());
            filenames.extend(images);
        } else if let Some(name) = input.file_name() {
            filenames.push(name.to_string_lossy().to_string());
        } else {
            return Err(AppError::FileNotFound(input.display().to_string()));
        }
    }

    Ok(filenames)
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

/// Check if a file extension is a supported image format (case-insensitive)
fn is_image_extension(ext: &str) -> bool {
    let lower = ext.to_lowercase();
    IMAGE_EXTENSIONS.contains(&lower.as_str())
}
