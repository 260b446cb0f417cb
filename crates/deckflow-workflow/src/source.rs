//! Source material assembly.

use std::path::Path;

use tracing::{debug, warn};

/// Material used when neither files nor notes were supplied.
pub const NO_SOURCES: &str = "No files or notes were provided.";

const TRUNCATION_MARKER: &str = "\n\n[TRUNCATED]";
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "csv"];

/// Builds the `source_material` text for a new session.
#[derive(Debug, Clone)]
pub struct SourceBundle {
    char_limit: usize,
    sections: Vec<String>,
}

impl SourceBundle {
    /// Create a bundle that truncates each file to `char_limit` characters.
    pub fn new(char_limit: usize) -> Self {
        Self {
            char_limit,
            sections: Vec::new(),
        }
    }

    /// Add a named file's text content.
    pub fn add_file(&mut self, name: &str, content: &str) -> &mut Self {
        let content = truncate(content, self.char_limit);
        self.sections.push(format!("FILE: {name}\n{content}"));
        self
    }

    /// Add free-form notes. Blank notes are ignored.
    pub fn add_notes(&mut self, notes: &str) -> &mut Self {
        let notes = notes.trim();
        if !notes.is_empty() {
            self.sections.push(format!("NOTES:\n{notes}"));
        }
        self
    }

    /// Read a file from disk and add it.
    pub async fn add_path(&mut self, path: &Path) -> &mut Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content = read_source_file(path).await;
        self.add_file(&name, &content)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Join all sections with a blank line.
    pub fn build(&self) -> String {
        if self.sections.is_empty() {
            return NO_SOURCES.to_string();
        }
        self.sections.join("\n\n")
    }
}

/// Read a source file as text.
///
/// Plain-text formats are decoded as lossy UTF-8. Other formats and read
/// failures produce a short placeholder so the session can still start.
pub async fn read_source_file(path: &Path) -> String {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if !TEXT_EXTENSIONS.contains(&extension.as_str()) {
        debug!(path = %path.display(), "Skipping unsupported source file");
        return format!("Unsupported file type: .{extension}");
    }

    match tokio::fs::read(path).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read source file");
            format!("Failed to read file: {e}")
        }
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_bundle() {
        let bundle = SourceBundle::new(100);
        assert!(bundle.is_empty());
        assert_eq!(bundle.build(), NO_SOURCES);
    }

    #[test]
    fn test_blank_notes_ignored() {
        let mut bundle = SourceBundle::new(100);
        bundle.add_notes("   \n");
        assert_eq!(bundle.build(), NO_SOURCES);
    }

    #[test]
    fn test_files_and_notes_joined() {
        let mut bundle = SourceBundle::new(100);
        bundle
            .add_file("q3.csv", "metric,value\nrevenue,8")
            .add_notes("  Board meets Friday ");
        assert_eq!(
            bundle.build(),
            "FILE: q3.csv\nmetric,value\nrevenue,8\n\nNOTES:\nBoard meets Friday"
        );
    }

    #[test]
    fn test_truncation() {
        let mut bundle = SourceBundle::new(5);
        bundle.add_file("a.txt", "abcdefgh");
        assert_eq!(bundle.build(), "FILE: a.txt\nabcde\n\n[TRUNCATED]");
    }

    #[test]
    fn test_truncation_exact_limit() {
        let mut bundle = SourceBundle::new(3);
        bundle.add_file("a.txt", "abc");
        assert_eq!(bundle.build(), "FILE: a.txt\nabc");
    }

    #[test]
    fn test_truncation_counts_chars() {
        assert_eq!(truncate("ééé", 2), "éé\n\n[TRUNCATED]");
    }

    #[tokio::test]
    async fn test_read_text_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.MD");
        std::fs::write(&path, "# Q3\nRevenue $8M").unwrap();

        assert_eq!(read_source_file(&path).await, "# Q3\nRevenue $8M");
    }

    #[tokio::test]
    async fn test_read_unsupported_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deck.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        assert_eq!(read_source_file(&path).await, "Unsupported file type: .pdf");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let content = read_source_file(Path::new("/nonexistent/q3.txt")).await;
        assert!(content.starts_with("Failed to read file:"));
    }

    #[tokio::test]
    async fn test_add_path_uses_file_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("q3.txt");
        std::fs::write(&path, "Q3 Actual $8M vs Target $10M").unwrap();

        let mut bundle = SourceBundle::new(12_000);
        bundle.add_path(&path).await;
        assert_eq!(bundle.build(), "FILE: q3.txt\nQ3 Actual $8M vs Target $10M");
    }
}
