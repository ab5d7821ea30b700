//! Feed retrieval and parsing.
//!
//! - [`parser`] - feed document parsing using the `feed-rs` crate, with
//!   per-entry recovery (entries missing a timestamp or links are skipped
//!   and counted, not fatal)
//! - [`fetcher`] - one-shot HTTP retrieval with a timeout and a streamed
//!   body size cap
//!
//! A failure at this layer aborts the whole run: there is nothing to
//! partially recover before the feed has been parsed.

mod fetcher;
mod parser;

pub use fetcher::{fetch_feed, FetchError};
pub use parser::{parse_channel, Channel, FeedEntry, ParseResult};
