//! Prompt Meta Common Library
//!
//! 画像ファイル名とプロンプトカタログの照合、メタデータ（CSV/JSON）の生成。
//! 照合と出力文字列の生成は純粋な処理。ファイルを読むのは `load_catalogue` のみ。

pub mod types;
pub mod error;
pub mod filename;
pub mod matcher;
pub mod metadata;
pub mod catalogue;
pub mod export;

pub use types::{
    GenerationSummary, MatchResult, MetadataRecord, PromptEntry, SummaryStatus, UnmatchedFile,
    CATEGORY, UNMATCHED_TITLE,
};
pub use error::{Error, Result};
pub use filename::{extract_phrase, has_known_prefix, NamingConvention};
pub use matcher::{find_prompt, match_file, normalize};
pub use metadata::{generate, GenerationOutput};
pub use catalogue::{limited, load_catalogue, parse_catalogue, pending};
pub use export::CsvStyle;
