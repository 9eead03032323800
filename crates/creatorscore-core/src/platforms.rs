use std::collections::{BTreeMap, HashMap};

use crate::aggregator::{Breakdown, Weight};
use crate::snapshot::SocialAccount;

#[derive(Debug, Clone, Copy)]
pub struct PlatformDef {
    pub id: &'static str,
    pub label: &'static str,
    /// Canonical profile URL prefix, completed with the account handle
    pub profile_url_prefix: Option<&'static str>,
}

pub const PLATFORMS: &[PlatformDef] = &[
    PlatformDef {
        id: "paragraph",
        label: "Paragraph",
        profile_url_prefix: None,
    },
    PlatformDef {
        id: "zora",
        label: "Zora",
        profile_url_prefix: None,
    },
    PlatformDef {
        id: "mirror",
        label: "Mirror",
        profile_url_prefix: None,
    },
    PlatformDef {
        id: "farcaster",
        label: "Farcaster",
        profile_url_prefix: Some("https://farcaster.xyz/"),
    },
    PlatformDef {
        id: "lens",
        label: "Lens",
        profile_url_prefix: None,
    },
];

/// Look up a known platform, ignoring ASCII case.
pub fn find_platform(id: &str) -> Option<&'static PlatformDef> {
    PLATFORMS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

/// Platform id to display label, with optional overrides on top of the
/// built-in table. Unknown ids map to themselves.
#[derive(Debug, Clone, Default)]
pub struct PlatformLabels {
    overrides: HashMap<String, String>,
}

impl PlatformLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    pub fn label_for<'a>(&'a self, id: &'a str) -> &'a str {
        if let Some(label) = self.overrides.get(id) {
            return label;
        }
        PLATFORMS
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.label)
            .unwrap_or(id)
    }

    /// Effective table, built-ins merged with overrides, sorted by id.
    pub fn entries(&self) -> BTreeMap<String, String> {
        let mut table: BTreeMap<String, String> = PLATFORMS
            .iter()
            .map(|p| (p.id.to_string(), p.label.to_string()))
            .collect();
        for (id, label) in &self.overrides {
            table.insert(id.clone(), label.clone());
        }
        table
    }

    /// Replace named segment keys with their display labels. "Other" is left alone.
    pub fn relabel<W: Weight>(&self, mut breakdown: Breakdown<W>) -> Breakdown<W> {
        for segment in breakdown.segments.iter_mut().filter(|s| !s.is_other) {
            let label = self.label_for(&segment.name);
            if label != segment.name {
                segment.name = label.to_string();
            }
        }
        breakdown
    }
}

/// Resolve the link of an earnings segment.
///
/// An existing non-empty URL wins. Otherwise the linked account whose
/// platform id matches `platform_name` (ignoring case) supplies the handle
/// for platforms that have a canonical profile URL.
pub fn resolve_platform_url(
    platform_name: &str,
    accounts: &[SocialAccount],
    existing_url: Option<&str>,
) -> Option<String> {
    if let Some(url) = existing_url.filter(|url| !url.is_empty()) {
        return Some(url.to_string());
    }

    let prefix = find_platform(platform_name)?.profile_url_prefix?;
    let account = accounts
        .iter()
        .find(|account| account.source.eq_ignore_ascii_case(platform_name))?;
    let handle = account.handle.as_deref()?;
    let handle = handle.strip_prefix('@').unwrap_or(handle);
    if handle.is_empty() {
        return None;
    }

    Some(format!("{prefix}{handle}"))
}

/// Fill in segment links from the linked accounts. Without accounts the
/// breakdown is returned untouched.
pub fn resolve_segment_links<W: Weight>(
    mut breakdown: Breakdown<W>,
    accounts: Option<&[SocialAccount]>,
) -> Breakdown<W> {
    let Some(accounts) = accounts else {
        return breakdown;
    };

    for segment in breakdown.segments.iter_mut().filter(|s| !s.is_other) {
        segment.url = resolve_platform_url(&segment.name, accounts, segment.url.as_deref());
    }
    breakdown
}
