//! ファイル名パーサー
//!
//! アップロード画像のファイル名からプロンプトのフレーズを取り出す。
//! 命名規則は事前に分からないので、既知のプレフィックスから順に判定する。

use regex::Regex;

/// 生成ツールA（quicklink）のプレフィックス
pub const QUICKLINK_PREFIX: &str = "quicklink_";

/// 生成ツールB（アカウント名+ID）のプレフィックス
pub const DRUNKENMUNKEY_PREFIX: &str = "drunkenmunkey1986_86250_";

/// 末尾で常に捨てるトークン数（連番/ハッシュ + 拡張子付きトークン）
const TRAILING_TOKENS: usize = 2;

/// ファイル名の命名規則
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingConvention {
    /// `quicklink_<phrase>_<n>_<suffix>.ext`
    Quicklink,
    /// `drunkenmunkey1986_86250_<phrase>_<n>_<suffix>.ext`
    Drunkenmunkey,
    /// `<phrase>[_<hex-id>].ext`
    Generic,
}

impl NamingConvention {
    /// プレフィックスで判定（判定順は固定）
    pub fn detect(filename: &str) -> Self {
        if filename.starts_with(QUICKLINK_PREFIX) {
            NamingConvention::Quicklink
        } else if filename.starts_with(DRUNKENMUNKEY_PREFIX) {
            NamingConvention::Drunkenmunkey
        } else {
            NamingConvention::Generic
        }
    }

    /// 先頭で捨てるトークン数
    fn leading_tokens(&self) -> usize {
        match self {
            NamingConvention::Quicklink => 1,
            NamingConvention::Drunkenmunkey => 2,
            NamingConvention::Generic => 0,
        }
    }
}

/// 既知のプレフィックスを持つか
pub fn has_known_prefix(filename: &str) -> bool {
    NamingConvention::detect(filename) != NamingConvention::Generic
}

/// ファイル名からフレーズを抽出する
///
/// 失敗しない。トークンが足りない場合は空文字列を返す。
///
/// # Examples
/// ```
/// use prompt_meta_common::extract_phrase;
///
/// assert_eq!(extract_phrase("quicklink_red_fox_9f3_001.png"), "red fox");
/// assert_eq!(extract_phrase("myphoto_2024.jpg"), "myphoto 2024");
/// ```
pub fn extract_phrase(filename: &str) -> String {
    match NamingConvention::detect(filename) {
        NamingConvention::Generic => extract_generic(filename),
        convention => extract_prefixed(filename, convention.leading_tokens()),
    }
}

fn extract_prefixed(filename: &str, leading: usize) -> String {
    let tokens: Vec<&str> = filename.split('_').collect();
    if tokens.len() <= leading + TRAILING_TOKENS {
        return String::new();
    }
    tokens[leading..tokens.len() - TRAILING_TOKENS].join(" ")
}

fn extract_generic(filename: &str) -> String {
    lazy_static::lazy_static! {
        // 最後の "." 以降（"/" を含まない）
        static ref EXTENSION_RE: Regex = Regex::new(r"\.[^/.]+$").unwrap();
    }

    let stem = EXTENSION_RE.replace(filename, "");
    strip_trailing_id(&stem).replace('_', " ")
}

/// 末尾の `_<id>` を除去する
///
/// idは小文字16進とハイフンのみ。数字だけの末尾（年号・連番）はフレーズの一部として残す。
fn strip_trailing_id(stem: &str) -> &str {
    lazy_static::lazy_static! {
        static ref TRAILING_ID_RE: Regex = Regex::new(r"_([a-f0-9-]+)$").unwrap();
    }

    if let Some(caps) = TRAILING_ID_RE.captures(stem) {
        if let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) {
            if !id.as_str().bytes().all(|b| b.is_ascii_digit()) {
                return &stem[..whole.start()];
            }
        }
    }
    stem
}
