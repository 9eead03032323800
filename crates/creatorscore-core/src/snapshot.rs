//! Profile snapshot input
//!
//! A snapshot is the already-fetched profile data of one creator. Each
//! collection is decoded on its own so one malformed section only empties
//! that section instead of failing the whole profile.

use crate::error::SnapshotError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;

/// Stands in for a post platform or earnings name the snapshot left out
pub const UNKNOWN_KEY: &str = "unknown";

fn unknown_key() -> String {
    UNKNOWN_KEY.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    /// Platform id, e.g. "farcaster"
    pub source: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub follower_count: Option<i64>,
    #[serde(default)]
    pub profile_url: Option<String>,
}

impl SocialAccount {
    /// Display name, or the platform id when the name is missing or empty.
    pub fn group_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.source,
        }
    }

    pub fn followers(&self) -> i64 {
        self.follower_count.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default = "unknown_key")]
    pub platform: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsEntry {
    /// Platform or issuer name
    #[serde(default = "unknown_key")]
    pub name: String,
    /// Missing amounts count as zero and drop out of the breakdown
    #[serde(default, alias = "value")]
    pub amount: f64,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    SocialAccounts,
    Posts,
    Earnings,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::SocialAccounts, Section::Posts, Section::Earnings];

    pub fn key(&self) -> &'static str {
        match self {
            Section::SocialAccounts => "socialAccounts",
            Section::Posts => "posts",
            Section::Earnings => "earnings",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionError {
    pub section: Section,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSnapshot {
    pub identifier: Option<String>,
    pub social_accounts: Option<Vec<SocialAccount>>,
    pub posts: Option<Vec<Post>>,
    pub earnings: Option<Vec<EarningsEntry>>,
    pub section_errors: Vec<SectionError>,
}

impl ProfileSnapshot {
    pub fn section_error(&self, section: Section) -> Option<&str> {
        self.section_errors
            .iter()
            .find(|e| e.section == section)
            .map(|e| e.message.as_str())
    }
}

pub fn parse_snapshot(json: &str) -> Result<ProfileSnapshot, SnapshotError> {
    let Value::Object(mut root) = serde_json::from_str::<Value>(json)? else {
        return Err(SnapshotError::NotAnObject);
    };

    let mut section_errors = Vec::new();
    let social_accounts = take_section(&mut root, Section::SocialAccounts, &mut section_errors);
    let posts = take_section(&mut root, Section::Posts, &mut section_errors);
    let earnings = take_section(&mut root, Section::Earnings, &mut section_errors);

    let identifier = root
        .get("identifier")
        .and_then(Value::as_str)
        .map(str::to_string);

    tracing::debug!(
        identifier = identifier.as_deref().unwrap_or("-"),
        social_accounts = social_accounts.as_ref().map_or(0, Vec::len),
        posts = posts.as_ref().map_or(0, Vec::len),
        earnings = earnings.as_ref().map_or(0, Vec::len),
        "parsed snapshot"
    );

    Ok(ProfileSnapshot {
        identifier,
        social_accounts,
        posts,
        earnings,
        section_errors,
    })
}

pub fn load_snapshot(path: &Path) -> Result<ProfileSnapshot, SnapshotError> {
    let content = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&content)
}

fn take_section<T: DeserializeOwned>(
    root: &mut Map<String, Value>,
    section: Section,
    errors: &mut Vec<SectionError>,
) -> Option<Vec<T>> {
    match root.remove(section.key()) {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value::<Vec<T>>(value) {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(%section, error = %e, "dropping malformed snapshot section");
                errors.push(SectionError {
                    section,
                    message: e.to_string(),
                });
                None
            }
        },
    }
}
