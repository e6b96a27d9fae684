//! プロンプトストアAPI
//!
//! クライアントは呼び出し側で1つ生成して渡す。到達可否は `health()` で都度確認し、
//! フラグとして保持しない。

mod client;
mod types;

pub use client::{decode_envelope, parse_health, PromptStoreClient, PAGE_SIZE};
pub use types::{ApiResponse, HealthStatus, PromptPayload};

use crate::catalogue_cache::CatalogueCache;
use crate::error::{AppError, Result};
use prompt_meta_common::PromptEntry;
use std::path::Path;

/// カタログの取得元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogueOrigin {
    Store,
    Cache,
}

impl std::fmt::Display for CatalogueOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogueOrigin::Store => write!(f, "Prompt-Store"),
            CatalogueOrigin::Cache => write!(f, "Cache"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchedCatalogue {
    pub entries: Vec<PromptEntry>,
    pub origin: CatalogueOrigin,
}

/// カタログを取得する
///
/// 1. オフライン指定ならキャッシュのみ
/// 2. ヘルスチェック成功 → ストアから全件取得してキャッシュを更新
/// 3. 接続不可 → キャッシュにフォールバック
pub async fn fetch_catalogue(
    client: Option<&PromptStoreClient>,
    cache_dir: &Path,
    offline: bool,
) -> Result<FetchedCatalogue> {
    let client = match client {
        Some(client) if !offline => client,
        _ => return from_cache(cache_dir, "offline"),
    };

    let health = client.health().await;
    if !health.reachable {
        log::warn!(
            "Prompt-Store nicht erreichbar ({}): {}",
            client.base_url(),
            health.message
        );
        return from_cache(cache_dir, &health.message);
    }

    let entries = client.list_prompts().await?;
    log::info!("{} Prompts vom Store geladen", entries.len());

    let mut cache = CatalogueCache::load(cache_dir);
    cache.store(entries.clone(), Some(client.base_url().to_string()));
    if let Err(e) = cache.save(cache_dir) {
        log::warn!("Cache konnte nicht gespeichert werden: {}", e);
    }

    Ok(FetchedCatalogue {
        entries,
        origin: CatalogueOrigin::Store,
    })
}

fn from_cache(cache_dir: &Path, reason: &str) -> Result<FetchedCatalogue> {
    let cache = CatalogueCache::load(cache_dir);
    if cache.is_empty() {
        return Err(AppError::CatalogueUnavailable(format!(
            "{} und kein Cache unter {}",
            reason,
            CatalogueCache::cache_path(cache_dir).display()
        )));
    }

    log::info!(
        "{} Prompts aus dem Cache ({})",
        cache.len(),
        cache.fetched_at.as_deref().unwrap_or("unbekannt")
    );

    Ok(FetchedCatalogue {
        entries: cache.into_entries(),
        origin: CatalogueOrigin::Cache,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_offline_without_cache_fails() {
        let dir = tempdir().unwrap();
        let result = fetch_catalogue(None, dir.path(), true).await;
        assert!(matches!(result, Err(AppError::CatalogueUnavailable(_))));
    }

    #[tokio::test]
    async fn test_offline_uses_cache() {
        let dir = tempdir().unwrap();
        let mut cache = CatalogueCache::default();
        cache.store(vec![PromptEntry::new("1", "Fox", "red fox", "fox")], None);
        cache.save(dir.path()).unwrap();

        let fetched = fetch_catalogue(None, dir.path(), true).await.unwrap();
        assert_eq!(fetched.origin, CatalogueOrigin::Cache);
        assert_eq!(fetched.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_store_falls_back_to_cache() {
        let dir = tempdir().unwrap();
        let mut cache = CatalogueCache::default();
        cache.store(vec![PromptEntry::new("1", "Fox", "red fox", "fox")], None);
        cache.save(dir.path()).unwrap();

        // ポート9（discard）は通常閉じている
        let client = PromptStoreClient::new(
            "http://127.0.0.1:9/api",
            None,
            std::time::Duration::from_secs(2),
        )
        .unwrap();
        let fetched = fetch_catalogue(Some(&client), dir.path(), false).await.unwrap();
        assert_eq!(fetched.origin, CatalogueOrigin::Cache);
    }
}
