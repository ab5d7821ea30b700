use anyhow::Result;
use chrono::{DateTime, Utc};
use feed_rs::parser;

/// One syndicated article, immutable once parsed.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub description: Option<String>,
    /// All links carried by the entry, in document order.
    pub links: Vec<String>,
    pub published: DateTime<Utc>,
}

/// The parsed feed document: channel metadata plus its entries.
#[derive(Debug, Clone)]
pub struct Channel {
    pub title: String,
    pub language: Option<String>,
    /// Detected feed flavor (RSS2, Atom, ...), logged for observability.
    pub version: String,
    pub entries: Vec<FeedEntry>,
}

/// Result of parsing, with a count of entries dropped during recovery.
pub struct ParseResult {
    pub channel: Channel,
    /// Entries skipped because they carry no publication timestamp or no links.
    pub skipped: usize,
}

/// Parse a feed document into a [`Channel`].
///
/// Malformed individual entries are recovered from rather than failing the
/// whole document: an entry without any publication timestamp cannot be
/// date-filtered and an entry without links cannot be exported, so both are
/// skipped and counted in [`ParseResult::skipped`].
pub fn parse_channel(bytes: &[u8]) -> Result<ParseResult> {
    let feed = parser::parse(bytes)?;

    let title = feed
        .title
        .map(|t| t.content)
        .unwrap_or_else(|| "Untitled".to_string());
    let version = format!("{:?}", feed.feed_type);
    let language = feed.language;

    let mut skipped = 0;
    let entries: Vec<FeedEntry> = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let published = match entry.published.or(entry.updated) {
                Some(dt) => dt.with_timezone(&Utc),
                None => {
                    skipped += 1;
                    return None;
                }
            };
            let links: Vec<String> = entry.links.into_iter().map(|l| l.href).collect();
            if links.is_empty() {
                skipped += 1;
                return None;
            }
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());
            let description = entry.summary.map(|s| s.content);

            Some(FeedEntry {
                title,
                description,
                links,
                published,
            })
        })
        .collect();

    Ok(ParseResult {
        channel: Channel {
            title,
            language,
            version,
            entries,
        },
        skipped,
    })
}
