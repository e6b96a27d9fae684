//! カタログキャッシュモジュール
//!
//! 最後にプロンプトストアから取得したカタログを保存し、
//! ストアに接続できないとき（またはオフライン指定時）の代替として使う。

use crate::error::{AppError, Result};
use prompt_meta_common::PromptEntry;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = "catalogue.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueCache {
    /// バージョン（互換性チェック用）
    version: u32,
    /// 取得日時（RFC 3339）
    pub fetched_at: Option<String>,
    /// 取得元のURL
    pub source: Option<String>,
    /// カタログ内容のSHA-256
    pub fingerprint: String,
    entries: Vec<PromptEntry>,
}

impl CatalogueCache {
    const CURRENT_VERSION: u32 = 1;

    /// 既定のキャッシュディレクトリ
    pub fn default_dir() -> Result<PathBuf> {
        let base = dirs::cache_dir()
            .ok_or_else(|| AppError::Config("Cache-Verzeichnis nicht gefunden".into()))?;
        Ok(base.join("prompt-meta"))
    }

    pub fn cache_path(dir: &Path) -> PathBuf {
        dir.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み
    ///
    /// ファイルがない・壊れている・バージョン不一致の場合は空のキャッシュ。
    pub fn load(dir: &Path) -> Self {
        let cache_path = Self::cache_path(dir);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(e) => {
                log::warn!("Cache nicht lesbar ({}): {}", cache_path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_reader::<_, CatalogueCache>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(cache) => {
                log::warn!(
                    "Cache-Version {} passt nicht (erwartet {}), wird verworfen",
                    cache.version,
                    Self::CURRENT_VERSION
                );
                Self::default()
            }
            Err(e) => {
                log::warn!("Cache beschädigt ({}): {}", cache_path.display(), e);
                Self::default()
            }
        }
    }

    /// キャッシュファイルを保存
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let file = File::create(Self::cache_path(dir))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// カタログを差し替える
    pub fn store(&mut self, entries: Vec<PromptEntry>, source: Option<String>) {
        self.fingerprint = fingerprint(&entries);
        self.fetched_at = Some(chrono::Utc::now().to_rfc3339());
        self.source = source;
        self.entries = entries;
    }

    pub fn entries(&self) -> &[PromptEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PromptEntry> {
        self.entries
    }

    /// キャッシュ件数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// キャッシュファイルを削除。削除した場合 `true`
    pub fn clear(dir: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(dir);
        if cache_path.exists() {
            std::fs::remove_file(cache_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

impl Default for CatalogueCache {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            fetched_at: None,
            source: None,
            fingerprint: fingerprint(&[]),
            entries: Vec::new(),
        }
    }
}

/// カタログのSHA-256（順序も含めて比較する）
pub fn fingerprint(entries: &[PromptEntry]) -> String {
    let mut hasher = Sha256::new();
    for entry in entries {
        for field in [&entry.id, &entry.title, &entry.prompt, &entry.keywords] {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update(entry.expected_runs.to_le_bytes());
        hasher.update(entry.successful_runs.to_le_bytes());
    }
    hex::encode(hasher.finalize())
}
