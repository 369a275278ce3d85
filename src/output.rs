// src/output.rs
// =============================================================================
// Saving the collected titles to a text file.
//
// File format:
//   Titles found: 3
//   ==================================================
//
//   1. First title
//   2. Second title
//   3. Third title
//
// The conventional filename is derived from the query:
//   "gaming laptop" -> "titulos_gaming_laptop.txt"
// =============================================================================

use std::path::Path;

use crate::error::ScrapeError;

pub fn default_filename(query: &str) -> String {
    format!("titulos_{}.txt", query.replace(' ', "_"))
}

pub fn format_listing(titles: &[String]) -> String {
    let mut listing = format!("Titles found: {}\n", titles.len());
    listing.push_str(&"=".repeat(50));
    listing.push_str("\n\n");

    for (index, title) in titles.iter().enumerate() {
        listing.push_str(&format!("{}. {}\n", index + 1, title));
    }

    listing
}

// Creates (or truncates) the file at `path` and writes the listing
pub fn write_titles(path: &Path, titles: &[String]) -> Result<(), ScrapeError> {
    std::fs::write(path, format_listing(titles))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filename_replaces_spaces() {
        assert_eq!(default_filename("test query"), "titulos_test_query.txt");
        assert_eq!(default_filename("notebook"), "titulos_notebook.txt");
    }

    #[test]
    fn test_format_listing() {
        let titles = vec!["First title".to_string(), "Second title".to_string()];
        let listing = format_listing(&titles);
        let lines: Vec<&str> = listing.lines().collect();

        assert_eq!(lines[0], "Titles found: 2");
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "1. First title");
        assert_eq!(lines[4], "2. Second title");
    }

    #[test]
    fn test_write_titles_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(default_filename("test query"));

        write_titles(&path, &["Only one".to_string()]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Titles found: 1\n"));
        assert!(content.ends_with("1. Only one\n"));
    }

    #[test]
    fn test_write_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");

        let result = write_titles(&path, &[]);
        assert!(matches!(result, Err(ScrapeError::Io(_))));
    }
}
