//! List and find command implementations

use anyhow::Result;
use nook_core::{Config, PageRecord};

use super::saved_snapshot;
use crate::output::{OutputFormat, write_pages};

/// Print every saved page.
pub fn list(config: &Config, format: OutputFormat) -> Result<()> {
    let pages = saved_pages(config, format)?;
    print(&pages, format)
}

/// Print saved pages whose name contains `query`, ignoring case.
pub fn find(config: &Config, query: &str, format: OutputFormat) -> Result<()> {
    let pages = filter_by_name(saved_pages(config, format)?, query);
    if pages.is_empty() && format == OutputFormat::Text {
        println!("No pages match '{query}'.");
        return Ok(());
    }
    print(&pages, format)
}

fn saved_pages(config: &Config, format: OutputFormat) -> Result<Vec<PageRecord>> {
    match saved_snapshot(config)? {
        Some(snapshot) => Ok(snapshot.pages),
        None => {
            if format == OutputFormat::Text {
                println!("No pages saved yet. Run 'nook refresh' first.");
            }
            Ok(Vec::new())
        },
    }
}

fn print(pages: &[PageRecord], format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    write_pages(&mut stdout.lock(), pages, format)
}

fn filter_by_name(pages: Vec<PageRecord>, query: &str) -> Vec<PageRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return pages;
    }
    pages
        .into_iter()
        .filter(|page| page.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(name: &str) -> PageRecord {
        PageRecord {
            id: name.to_lowercase(),
            name: name.into(),
            parent: String::new(),
            parent_id: String::new(),
            url: format!("https://www.notion.so/{}", name.to_lowercase()),
            icon: None,
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let pages = vec![page("Roadmap"), page("Team roadmap"), page("Notes")];
        let names: Vec<String> = filter_by_name(pages, "ROAD")
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Roadmap", "Team roadmap"]);
    }

    #[test]
    fn test_blank_query_keeps_everything() {
        let pages = vec![page("A"), page("B")];
        assert_eq!(filter_by_name(pages, "  ").len(), 2);
    }

    #[test]
    fn test_parent_name_is_not_searched() {
        let mut child = page("Child");
        child.parent = "Roadmap".into();
        assert!(filter_by_name(vec![child], "roadmap").is_empty());
    }
}
