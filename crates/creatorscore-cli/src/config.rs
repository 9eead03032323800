use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use colored::Color;
use creatorscore_core::{BreakdownAggregator, PlatformLabels, DEFAULT_TOP_K, OTHER_LABEL};
use serde::Deserialize;

static CONFIG: OnceLock<CreatorscoreConfig> = OnceLock::new();

const MIN_TOP_K: usize = 1;
const MAX_TOP_K: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownKind {
    Earnings,
    Followers,
    Posts,
}

impl BreakdownKind {
    pub const ALL: [BreakdownKind; 3] = [
        BreakdownKind::Earnings,
        BreakdownKind::Followers,
        BreakdownKind::Posts,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            BreakdownKind::Earnings => "Total Earnings",
            BreakdownKind::Followers => "Total Followers",
            BreakdownKind::Posts => "Total Posts",
        }
    }

    fn default_color(&self) -> Color {
        match self {
            BreakdownKind::Earnings => Color::Green,
            BreakdownKind::Followers => Color::TrueColor {
                r: 236,
                g: 72,
                b: 153,
            }, // #EC4899 pink
            BreakdownKind::Posts => Color::Blue,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatorscoreConfig {
    #[serde(default)]
    pub breakdown: BreakdownConfig,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub colors: ColorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BreakdownConfig {
    pub top_k: usize,
    pub other_label: String,
}

impl Default for BreakdownConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            other_label: OTHER_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColorsConfig {
    pub earnings: Option<String>,
    pub followers: Option<String>,
    pub posts: Option<String>,
}

impl CreatorscoreConfig {
    fn config_path() -> Option<PathBuf> {
        std::env::var_os("CREATORSCORE_CONFIG")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".creatorscore")))
    }

    pub fn load() -> &'static CreatorscoreConfig {
        CONFIG.get_or_init(|| {
            Self::config_path()
                .map(|path| Self::load_from(&path))
                .unwrap_or_default()
        })
    }

    /// Missing file means defaults; an unreadable one is logged and ignored.
    pub fn load_from(path: &Path) -> CreatorscoreConfig {
        let Ok(content) = fs::read_to_string(path) else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return CreatorscoreConfig::default();
        };

        toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
            CreatorscoreConfig::default()
        })
    }

    /// Priority: --top-k flag > CREATORSCORE_TOP_K env var > config file > default (5)
    pub fn top_k(&self, flag: Option<usize>) -> usize {
        let top_k = flag
            .or_else(|| {
                std::env::var("CREATORSCORE_TOP_K")
                    .ok()
                    .and_then(|v| v.parse::<usize>().ok())
            })
            .unwrap_or(self.breakdown.top_k);

        top_k.clamp(MIN_TOP_K, MAX_TOP_K)
    }

    pub fn aggregator(&self, flag: Option<usize>) -> BreakdownAggregator {
        BreakdownAggregator::new(self.top_k(flag))
            .with_other_label(self.breakdown.other_label.clone())
    }

    pub fn labels(&self) -> PlatformLabels {
        PlatformLabels::with_overrides(self.labels.clone())
    }

    pub fn color_for(&self, kind: BreakdownKind) -> Color {
        let configured = match kind {
            BreakdownKind::Earnings => self.colors.earnings.as_deref(),
            BreakdownKind::Followers => self.colors.followers.as_deref(),
            BreakdownKind::Posts => self.colors.posts.as_deref(),
        };
        configured
            .and_then(parse_color)
            .unwrap_or_else(|| kind.default_color())
    }
}

/// `#RRGGBB` or a named terminal color.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::TrueColor { r, g, b });
    }
    value.parse::<Color>().ok()
}
