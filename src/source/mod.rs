//! Item source abstraction layer.
//!
//! This module defines the [`ItemSource`] trait and the item types shared by
//! the rest of the application.  The only concrete source today is the
//! Hacker News Firebase API ([`HnClient`]).
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `lobsters.rs`).
//! 2. Define a client struct and implement [`ItemSource`] for it.
//! 3. Add `mod lobsters;` below and re-export your struct in the `pub use` block.
//! 4. Construct an instance in `main.rs` instead of [`HnClient`].
//!
//! The pipeline, renderers and terminal view are all source-agnostic.

mod hn;
mod story;

pub use hn::{HnClient, HN_API_BASE};
pub use story::{qualifies, Item, Story};

use anyhow::Result;
use async_trait::async_trait;

/// Opaque key of a remote item.
pub type ItemId = u64;

/// Trait that every item source must implement.
///
/// The pipeline calls [`item()`](ItemSource::item) from many tokio tasks at
/// once, so implementations must be [`Send`] + [`Sync`].
///
/// ## Implementing a new source
///
/// ```ignore
/// pub struct MySource { /* config fields */ }
///
/// #[async_trait]
/// impl ItemSource for MySource {
///     fn name(&self) -> &str { "my-source" }
///
///     async fn top_ids(&self) -> Result<Vec<ItemId>> { todo!() }
///
///     async fn item(&self, id: ItemId) -> Result<Item> { todo!() }
/// }
/// ```
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Human-readable label used in logs and feed metadata.
    fn name(&self) -> &str;

    /// The current top-ranked identifiers, best first.
    async fn top_ids(&self) -> Result<Vec<ItemId>>;

    /// Resolve one identifier into its record.
    async fn item(&self, id: ItemId) -> Result<Item>;
}
