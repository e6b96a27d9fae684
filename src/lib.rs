//! prompt-meta
//!
//! 画像ファイル名をプロンプトカタログと照合し、メタデータCSV/JSONを出力するCLIの本体。
//! 照合・シリアライズは `prompt_meta_common`、ここではI/O（設定・スキャン・API・ファイル出力）を扱う。

pub mod api;
pub mod catalogue_cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod scanner;
