//! Segmented breakdown aggregation
//!
//! Groups items by key, sums a weight per group, ranks the groups and caps
//! them to the top K plus a trailing "Other" bucket.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Debug;
use std::ops::Add;

pub const DEFAULT_TOP_K: usize = 5;
pub const OTHER_LABEL: &str = "Other";

/// Numeric weight that can be summed and turned into a percentage.
pub trait Weight: Copy + Default + PartialOrd + Debug {
    fn is_positive(self) -> bool;
    fn as_f64(self) -> f64;
    /// Sum of two weights. Integer weights saturate instead of overflowing.
    fn accumulate(self, other: Self) -> Self;
}

macro_rules! impl_weight {
    ( $accumulate:ident: $( $t:ty ),+ $(,)? ) => {
        $(
            impl Weight for $t {
                fn is_positive(self) -> bool {
                    self > <$t>::default()
                }

                fn as_f64(self) -> f64 {
                    self as f64
                }

                fn accumulate(self, other: Self) -> Self {
                    <$t>::$accumulate(self, other)
                }
            }
        )+
    };
}

impl_weight!(saturating_add: i32, i64, u32, u64);
impl_weight!(add: f32, f64);

/// One named slice of a breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment<W> {
    pub name: String,
    pub value: W,
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Set on the synthetic tail bucket only
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_other: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown<W> {
    pub grand_total: W,
    pub segments: Vec<Segment<W>>,
}

impl<W: Weight> Breakdown<W> {
    pub fn empty() -> Self {
        Self {
            grand_total: W::default(),
            segments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of all segment values, "Other" included
    pub fn segments_total(&self) -> W {
        self.segments
            .iter()
            .fold(W::default(), |acc, segment| acc.accumulate(segment.value))
    }

    pub fn other(&self) -> Option<&Segment<W>> {
        self.segments.last().filter(|segment| segment.is_other)
    }
}

impl<W: Weight> Default for Breakdown<W> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Breakdown computation with a fixed cap and tail label
#[derive(Debug, Clone)]
pub struct BreakdownAggregator {
    top_k: usize,
    other_label: String,
}

impl Default for BreakdownAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl BreakdownAggregator {
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k,
            other_label: OTHER_LABEL.to_string(),
        }
    }

    pub fn with_other_label(mut self, label: impl Into<String>) -> Self {
        self.other_label = label.into();
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn other_label(&self) -> &str {
        &self.other_label
    }

    /// Compute a breakdown over `items`.
    ///
    /// Items whose weight is not strictly positive are ignored. Groups are
    /// ordered by descending total; equal totals keep the order in which
    /// their keys were first seen. Groups past `top_k` fold into a single
    /// "Other" segment appended last when its value is positive.
    pub fn compute<T, W, K, V, U>(
        &self,
        items: Option<&[T]>,
        key_of: K,
        weight_of: V,
        url_of: U,
    ) -> Breakdown<W>
    where
        W: Weight,
        K: Fn(&T) -> &str,
        V: Fn(&T) -> W,
        U: Fn(&T) -> Option<&str>,
    {
        let items = match items {
            Some(items) if !items.is_empty() => items,
            _ => return Breakdown::empty(),
        };

        let mut groups = group_items(items, &key_of, &weight_of, &url_of);
        if groups.is_empty() {
            return Breakdown::empty();
        }

        // sort_by is stable: ties keep first-seen order
        groups.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));

        let tail = groups.split_off(self.top_k.min(groups.len()));
        let other_value = tail
            .iter()
            .fold(W::default(), |acc, group| acc.accumulate(group.total));

        // Summed in segment order so it matches segments_total() exactly
        let grand_total = groups
            .iter()
            .fold(W::default(), |acc, group| acc.accumulate(group.total))
            .accumulate(other_value);
        if !grand_total.is_positive() {
            return Breakdown::empty();
        }

        let total = grand_total.as_f64();
        let mut segments: Vec<Segment<W>> = Vec::with_capacity(groups.len() + 1);
        segments.extend(groups.into_iter().map(|group| Segment {
            name: group.key,
            value: group.total,
            percentage: percentage_of(group.total, total),
            url: group.url,
            is_other: false,
        }));

        if other_value.is_positive() {
            segments.push(Segment {
                name: self.other_label.clone(),
                value: other_value,
                percentage: percentage_of(other_value, total),
                url: None,
                is_other: true,
            });
        }

        tracing::trace!(
            named = segments.len(),
            folded = tail.len(),
            "computed breakdown"
        );

        Breakdown {
            grand_total,
            segments,
        }
    }
}

/// Compute a breakdown with the default "Other" label.
pub fn compute_breakdown<T, W, K, V, U>(
    items: Option<&[T]>,
    key_of: K,
    weight_of: V,
    url_of: U,
    top_k: usize,
) -> Breakdown<W>
where
    W: Weight,
    K: Fn(&T) -> &str,
    V: Fn(&T) -> W,
    U: Fn(&T) -> Option<&str>,
{
    BreakdownAggregator::new(top_k).compute(items, key_of, weight_of, url_of)
}

#[derive(Debug)]
struct Group<W> {
    key: String,
    total: W,
    url: Option<String>,
}

fn group_items<T, W, K, V, U>(items: &[T], key_of: &K, weight_of: &V, url_of: &U) -> Vec<Group<W>>
where
    W: Weight,
    K: Fn(&T) -> &str,
    V: Fn(&T) -> W,
    U: Fn(&T) -> Option<&str>,
{
    let mut index: HashMap<String, usize> = HashMap::with_capacity(items.len().min(64));
    let mut groups: Vec<Group<W>> = Vec::with_capacity(index.capacity());

    for item in items {
        let weight = weight_of(item);
        if !weight.is_positive() {
            continue;
        }

        let key = key_of(item);
        let url = url_of(item).filter(|url| !url.is_empty());

        match index.get(key) {
            Some(&i) => {
                let group = &mut groups[i];
                group.total = group.total.accumulate(weight);
                if group.url.is_none() {
                    group.url = url.map(str::to_string);
                }
            }
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(Group {
                    key: key.to_string(),
                    total: weight,
                    url: url.map(str::to_string),
                });
            }
        }
    }

    groups
}

fn percentage_of<W: Weight>(value: W, total: f64) -> f64 {
    (value.as_f64() / total) * 100.0
}
