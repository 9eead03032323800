#![deny(clippy::all)]

mod aggregator;
mod error;
pub mod platforms;
mod profile;
mod snapshot;

pub use aggregator::*;
pub use error::SnapshotError;
pub use platforms::{resolve_platform_url, resolve_segment_links, PlatformLabels};
pub use profile::*;
pub use snapshot::*;

pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
