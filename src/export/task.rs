use crate::export::filename::output_filename;
use crate::feed::FeedEntry;
use std::path::{Path, PathBuf};

/// Format of the publication key compared against the date-key prefix.
const PUBLISHED_KEY_FORMAT: &str = "%Y%m%d%H%M%S";

/// The unit of work: convert one feed-entry link into one output document.
#[derive(Debug, Clone)]
pub struct ExportTask {
    /// Entry title, suffixed `-1`, `-2`, ... for links after the first.
    pub display_name: String,
    /// The link to render.
    pub url: String,
    /// Full `YYYYMMDDhhmmss` publication key of the source entry.
    pub date_key: String,
    /// Deterministic destination of the final text document.
    pub output_path: PathBuf,
}

/// Select entries matching `date_key` and expand them into tasks.
///
/// An entry is kept iff its formatted publication timestamp starts with
/// `date_key` (prefix match, so `"202602"` matches the whole month). Each
/// kept entry yields one task per link, preserving link order. Pure and
/// deterministic; an empty match yields an empty task set.
pub fn plan_tasks(
    entries: &[FeedEntry],
    date_key: &str,
    channel_title: &str,
    output_dir: &Path,
) -> Vec<ExportTask> {
    let mut tasks = Vec::new();
    for entry in entries {
        let published_key = entry.published.format(PUBLISHED_KEY_FORMAT).to_string();
        if !published_key.starts_with(date_key) {
            continue;
        }
        for (i, link) in entry.links.iter().enumerate() {
            let display_name = if i == 0 {
                entry.title.clone()
            } else {
                format!("{}-{}", entry.title, i)
            };
            let output_path = output_dir.join(output_filename(
                &published_key,
                channel_title,
                &display_name,
                link,
            ));
            tasks.push(ExportTask {
                display_name,
                url: link.clone(),
                date_key: published_key.clone(),
                output_path,
            });
        }
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(title: &str, links: &[&str], published: (i32, u32, u32, u32, u32, u32)) -> FeedEntry {
        let (y, mo, d, h, mi, s) = published;
        FeedEntry {
            title: title.to_string(),
            description: None,
            links: links.iter().map(|l| l.to_string()).collect(),
            published: Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap(),
        }
    }

    #[test]
    fn test_prefix_match_not_exact_match() {
        let entries = vec![entry("A", &["https://e.com/a"], (2026, 2, 3, 15, 30, 0))];
        assert_eq!(plan_tasks(&entries, "202602", "C", Path::new("/out")).len(), 1);
        assert_eq!(
            plan_tasks(&entries, "20260203153000", "C", Path::new("/out")).len(),
            1
        );
        assert!(plan_tasks(&entries, "202603", "C", Path::new("/out")).is_empty());
    }

    #[test]
    fn test_no_match_yields_empty_set_not_error() {
        let entries = vec![entry("A", &["https://e.com/a"], (2026, 1, 1, 0, 0, 0))];
        assert!(plan_tasks(&entries, "20260203", "C", Path::new("/out")).is_empty());
    }

    #[test]
    fn test_multi_link_entry_expands_with_suffixes() {
        let entries = vec![entry(
            "Multi",
            &["https://e.com/1", "https://e.com/2", "https://e.com/3"],
            (2026, 2, 3, 10, 0, 0),
        )];
        let tasks = plan_tasks(&entries, "20260203", "C", Path::new("/out"));
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].display_name, "Multi");
        assert_eq!(tasks[1].display_name, "Multi-1");
        assert_eq!(tasks[2].display_name, "Multi-2");
        // Link order preserved
        assert_eq!(tasks[0].url, "https://e.com/1");
        assert_eq!(tasks[2].url, "https://e.com/3");
    }

    #[test]
    fn test_task_carries_full_published_key() {
        let entries = vec![entry("A", &["https://e.com/a"], (2026, 2, 3, 15, 30, 0))];
        let tasks = plan_tasks(&entries, "202602", "C", Path::new("/out"));
        assert_eq!(tasks[0].date_key, "20260203153000");
    }

    #[test]
    fn test_output_path_under_output_dir() {
        let entries = vec![entry("A", &["https://e.com/a"], (2026, 2, 3, 10, 0, 0))];
        let tasks = plan_tasks(&entries, "20260203", "Channel", Path::new("/out"));
        assert!(tasks[0].output_path.starts_with("/out"));
        assert_eq!(
            tasks[0].output_path.extension().and_then(|e| e.to_str()),
            Some("md")
        );
    }

    #[test]
    fn test_planning_is_deterministic() {
        let entries = vec![entry(
            "A",
            &["https://e.com/a", "https://e.com/b"],
            (2026, 2, 3, 10, 0, 0),
        )];
        let first = plan_tasks(&entries, "20260203", "C", Path::new("/out"));
        let second = plan_tasks(&entries, "20260203", "C", Path::new("/out"));
        let paths = |ts: &[ExportTask]| ts.iter().map(|t| t.output_path.clone()).collect::<Vec<_>>();
        assert_eq!(paths(&first), paths(&second));
    }
}
