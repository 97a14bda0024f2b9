//! Plain-text report output.
//!
//! A report is a sequence of sections, one per source:
//!
//! ```text
//!
//!
//! =====================================
//! Hacker News
//! =====================================
//!
//! Title: ...
//! Url: ...
//!
//! Title: ...
//! Url: ...
//!
//! ```

use std::io::{self, Write};

use tracing::info;

use crate::source::RenderableItem;

const RULE: &str = "=====================================";

/// Appends labelled sections to any [`Write`] sink.
#[derive(Debug)]
pub struct ReportWriter<W: Write> {
    sink: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Write one section and return how many items it holds.
    pub fn write_section(&mut self, label: &str, items: &[RenderableItem]) -> io::Result<usize> {
        write!(self.sink, "\n\n{RULE}\n{label}\n{RULE}\n\n")?;
        for item in items {
            write!(self.sink, "{item}\n\n")?;
        }

        info!(section = label, "wrote {} {label} items", items.len());
        Ok(items.len())
    }

    /// Flush and hand back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn render(sections: &[(&str, Vec<RenderableItem>)]) -> String {
        let mut writer = ReportWriter::new(Vec::new());
        for (label, items) in sections {
            writer.write_section(label, items).unwrap();
        }
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn section_layout() {
        let out = render(&[(
            "Hacker News",
            vec![
                RenderableItem::new("One", "https://e/1"),
                RenderableItem::new("Two", "https://e/2"),
            ],
        )]);

        assert_eq!(
            out,
            "\n\n=====================================\nHacker News\n=====================================\n\n\
             Title: One\nUrl: https://e/1\n\n\
             Title: Two\nUrl: https://e/2\n\n"
        );
    }

    #[test]
    fn empty_section_still_has_heading() {
        let mut writer = ReportWriter::new(Vec::new());
        let written = writer.write_section("Reddit golang", &[]).unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();

        assert_eq!(written, 0);
        assert!(out.contains("\nReddit golang\n"));
        assert!(!out.contains("Title:"));
    }

    #[test]
    fn sections_keep_call_order() {
        let out = render(&[
            ("New York Times", vec![RenderableItem::new("a", "b")]),
            ("Hacker News", vec![]),
        ]);

        let nyt = out.find("New York Times").unwrap();
        let hn = out.find("Hacker News").unwrap();
        assert!(nyt < hn);
    }

    #[test]
    fn writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let mut writer = ReportWriter::new(File::create(&path).unwrap());
        let written = writer
            .write_section("RSS", &[RenderableItem::new("t", "u")])
            .unwrap();
        writer.finish().unwrap();

        assert_eq!(written, 1);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with("Title: t\nUrl: u\n\n"));
    }
}
