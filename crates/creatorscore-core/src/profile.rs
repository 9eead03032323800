//! Stats breakdowns of a creator profile

use serde::Serialize;

use crate::aggregator::{Breakdown, BreakdownAggregator, Weight};
use crate::platforms::{resolve_segment_links, PlatformLabels};
use crate::snapshot::{EarningsEntry, Post, ProfileSnapshot, Section, SocialAccount};

/// Followers grouped by account display name, linked to the first profile URL.
pub fn followers_breakdown(
    accounts: Option<&[SocialAccount]>,
    aggregator: &BreakdownAggregator,
) -> Breakdown<i64> {
    aggregator.compute(
        accounts,
        SocialAccount::group_name,
        SocialAccount::followers,
        |account| account.profile_url.as_deref(),
    )
}

/// Posts counted per platform, keyed by display label.
pub fn posts_breakdown(
    posts: Option<&[Post]>,
    aggregator: &BreakdownAggregator,
    labels: &PlatformLabels,
) -> Breakdown<i64> {
    let breakdown = aggregator.compute(posts, |post| post.platform.as_str(), |_| 1, |_| None);
    labels.relabel(breakdown)
}

pub fn earnings_breakdown(
    entries: Option<&[EarningsEntry]>,
    accounts: Option<&[SocialAccount]>,
    aggregator: &BreakdownAggregator,
) -> Breakdown<f64> {
    let breakdown = aggregator.compute(
        entries,
        |entry| entry.name.as_str(),
        |entry| entry.amount,
        |entry| entry.url.as_deref(),
    );
    resolve_segment_links(breakdown, accounts)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSection<W> {
    #[serde(flatten)]
    pub breakdown: Breakdown<W>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<W: Weight> StatsSection<W> {
    fn new(breakdown: Breakdown<W>, snapshot: &ProfileSnapshot, section: Section) -> Self {
        Self {
            breakdown,
            error: snapshot.section_error(section).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub earnings: StatsSection<f64>,
    pub followers: StatsSection<i64>,
    pub posts: StatsSection<i64>,
}

impl ProfileStats {
    pub fn from_snapshot(
        snapshot: &ProfileSnapshot,
        aggregator: &BreakdownAggregator,
        labels: &PlatformLabels,
    ) -> Self {
        let accounts = snapshot.social_accounts.as_deref();

        let earnings = earnings_breakdown(snapshot.earnings.as_deref(), accounts, aggregator);
        let followers = followers_breakdown(accounts, aggregator);
        let posts = posts_breakdown(snapshot.posts.as_deref(), aggregator, labels);

        Self {
            identifier: snapshot.identifier.clone(),
            earnings: StatsSection::new(earnings, snapshot, Section::Earnings),
            // Account parse errors also blank the earnings links, but only
            // the followers bar reports them.
            followers: StatsSection::new(followers, snapshot, Section::SocialAccounts),
            posts: StatsSection::new(posts, snapshot, Section::Posts),
        }
    }
}
