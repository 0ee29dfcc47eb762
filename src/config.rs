use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_TOPN: usize = 5;
const DEFAULT_PORT: u16 = 5002;
const DEFAULT_MODEL_PATH: &str = "model/ta_small.bin";
const DEFAULT_FONT_PATH: &str = "Font/Lohit-Tamil.ttf";
const DEFAULT_MAX_TOPN: usize = 50;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub port: u16,
    pub model_path: PathBuf,
    pub font_path: PathBuf,
    /// Requests asking for more neighbors are clamped to this.
    pub max_topn: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            font_path: lookup("FONT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_PATH)),
            max_topn: parse_or(&lookup, "MAX_TOPN", DEFAULT_MAX_TOPN).max(1),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("invalid {}: {:?}, fall back to default", key, raw);
            default
        }),
        None => default,
    }
}

/// Missing, unparsable and non-positive values all mean the default.
pub fn parse_topn(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_TOPN)
}
