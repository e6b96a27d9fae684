use anyhow::Context;
use clap::Parser;
use prompt_meta::{api, catalogue_cache, cli, config, error, export, scanner};
use api::PromptStoreClient;
use catalogue_cache::CatalogueCache;
use cli::{Cli, Commands};
use config::Config;
use prompt_meta_common::{self as meta, PromptEntry, UNMATCHED_TITLE};
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load().context("Konfiguration konnte nicht geladen werden")?;
    let cache_dir = match cli.cache_dir {
        Some(dir) => dir,
        None => CatalogueCache::default_dir()?,
    };

    match cli.command {
        Commands::Generate { inputs, catalogue, output, format, csv_style, known_prefixes_only, offline, report } => {
            println!("📝 prompt-meta - Metadaten erzeugen\n");

            // 1. ファイル名の収集
            println!("[1/3] Dateien sammeln...");
            let options = scanner::ScanOptions {
                known_prefixes_only: known_prefixes_only || config.known_prefixes_only,
            };
            let filenames = scanner::collect_filenames(&inputs, &options)?;
            println!("✔ {} Dateien gefunden\n", filenames.len());

            // 2. カタログ取得
            println!("[2/3] Prompt-Katalog laden...");
            let entries = resolve_catalogue(&config, catalogue.as_deref(), &cache_dir, offline).await?;
            println!();

            // 3. 照合と書き込み
            println!("[3/3] Zuordnen und speichern...");
            let generated = match meta::generate(&filenames, &entries) {
                Ok(generated) => generated,
                // 入力不備は何も書き出さずに終了
                Err(e) if e.is_input_error() => {
                    eprintln!("✘ {}", e);
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            };
            let output_dir = output
                .or_else(|| config.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));

            let written = export::write_outputs(&generated, &output_dir, &format, csv_style)
                .with_context(|| format!("Ausgabe nach {} fehlgeschlagen", output_dir.display()))?;
            for path in written.csv.iter().chain(written.json.iter()) {
                println!("✔ Gespeichert: {}", path.display());
            }
            if report {
                let path = export::write_report(&generated, &written, &output_dir)?;
                println!("✔ Bericht: {}", path.display());
            }

            let unmatched = generated.unmatched_files();
            if !unmatched.is_empty() {
                println!("\nOhne Übereinstimmung:");
                for file in &unmatched {
                    println!("  {}", file.filename);
                    println!("    Original: {}", file.original_prompt);
                    println!("    Bereinigt: {}", file.cleaned_prompt);
                }
            }

            let summary = &generated.summary;
            println!("\n{}", summary.message);
            println!(
                "  Verarbeitet: {} / Zugeordnet: {}",
                summary.files_processed, summary.metadata_generated
            );
        }

        Commands::Match { filename, catalogue, offline } => {
            let entries = resolve_catalogue(&config, catalogue.as_deref(), &cache_dir, offline).await?;
            let result = meta::match_file(&filename, &entries);

            println!("Datei: {}", result.filename);
            println!("  Phrase: {}", result.extracted_phrase);
            println!("  Normalisiert: {}", result.normalized_phrase);

            match &result.matched_prompt {
                Some(entry) => {
                    println!("✔ Treffer: {} (ID {})", entry.title, entry.id);
                    println!("  Prompt: {}", entry.prompt);
                    println!("  Keywords: {}", entry.keyword_list().join(", "));
                }
                None => println!("✘ {}", UNMATCHED_TITLE),
            }
        }

        Commands::Prompts { pending, limit, catalogue, offline } => {
            let entries: Vec<PromptEntry> = match (&catalogue, pending, offline) {
                // オンラインの未完了一覧はストア側で絞り込む
                (None, true, false) => {
                    let client = PromptStoreClient::from_config(&config)?;
                    client.list_pending(limit).await?
                }
                _ => {
                    let all = resolve_catalogue(&config, catalogue.as_deref(), &cache_dir, offline).await?;
                    let selected = if pending {
                        meta::pending(&all, limit)
                    } else {
                        meta::limited(&all, limit)
                    };
                    selected.into_iter().cloned().collect()
                }
            };

            if entries.is_empty() {
                println!("Keine Prompts vorhanden");
            }
            for entry in &entries {
                println!(
                    "{:>4}  {:>3}% ({}/{})  {}",
                    entry.id,
                    entry.progress_percent(),
                    entry.successful_runs,
                    entry.expected_runs,
                    entry.title
                );
                println!("      {}", entry.prompt);
            }
        }

        Commands::Health => {
            let client = PromptStoreClient::from_config(&config)?;
            let status = client.health().await;

            if !status.reachable {
                anyhow::bail!("Prompt-Store nicht erreichbar ({}): {}", client.base_url(), status.message);
            }

            println!("✔ Prompt-Store erreichbar: {}", client.base_url());
            if !status.message.is_empty() {
                println!("  Meldung: {}", status.message);
            }
            if let Some(database) = &status.database {
                println!("  Datenbank: {}", database);
            }
        }

        Commands::Config { set_api_url, set_token, show } => {
            let mut config = config;

            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ API-URL gespeichert");
            }

            if let Some(token) = set_token {
                config.set_api_token(token)?;
                println!("✔ API-Token gespeichert");
            }

            if show {
                println!("Konfiguration:");
                println!("  Datei: {}", Config::config_path()?.display());
                println!("  API-URL: {}", config.get_api_url().unwrap_or_else(|_| "nicht gesetzt".into()));
                println!(
                    "  API-Token: {}",
                    if config.get_api_token().is_some() { "gesetzt" } else { "nicht gesetzt" }
                );
                println!(
                    "  Ausgabe: {}",
                    config
                        .output_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| ".".into())
                );
                println!("  Timeout: {}s", config.timeout_seconds);
                println!("  Nur bekannte Präfixe: {}", if config.known_prefixes_only { "ja" } else { "nein" });
            }
        }

        Commands::Cache { clear, info } => {
            let cache_path = CatalogueCache::cache_path(&cache_dir);

            if info || !clear {
                // 既定または--info: 情報表示
                if cache_path.exists() {
                    let cache = CatalogueCache::load(&cache_dir);
                    println!("Cache-Informationen:");
                    println!("  Pfad: {}", cache_path.display());
                    println!("  Prompts: {}", cache.len());
                    println!("  Abgerufen: {}", cache.fetched_at.as_deref().unwrap_or("-"));
                    println!("  Quelle: {}", cache.source.as_deref().unwrap_or("-"));
                    println!("  Fingerprint: {}", cache.fingerprint);
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  Größe: {} bytes", meta.len());
                    }
                } else {
                    println!("Keine Cache-Datei vorhanden: {}", cache_path.display());
                }
            }

            if clear {
                match CatalogueCache::clear(&cache_dir) {
                    Ok(true) => println!("✔ Cache gelöscht: {}", cache_path.display()),
                    Ok(false) => println!("Keine Cache-Datei vorhanden"),
                    Err(e) => println!("Fehler beim Löschen des Caches: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// カタログJSONの指定があればそれを、なければストア（またはキャッシュ）から読み込む
async fn resolve_catalogue(
    config: &Config,
    catalogue: Option<&Path>,
    cache_dir: &Path,
    offline: bool,
) -> anyhow::Result<Vec<PromptEntry>> {
    if let Some(path) = catalogue {
        if !path.exists() {
            return Err(error::AppError::FileNotFound(path.display().to_string()).into());
        }
        let entries = meta::load_catalogue(path)
            .with_context(|| format!("Katalog {} konnte nicht gelesen werden", path.display()))?;
        println!("✔ {} Prompts aus {}", entries.len(), path.display());
        return Ok(entries);
    }

    let client = if offline {
        None
    } else {
        match PromptStoreClient::from_config(config) {
            Ok(client) => Some(client),
            Err(error::AppError::MissingApiUrl) => {
                log::warn!("Keine API-URL konfiguriert, verwende Cache");
                None
            }
            Err(e) => return Err(e.into()),
        }
    };

    let fetched = api::fetch_catalogue(client.as_ref(), cache_dir, offline).await?;
    println!("✔ {} Prompts ({})", fetched.entries.len(), fetched.origin);
    Ok(fetched.entries)
}
