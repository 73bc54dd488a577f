//! Directory listing module
//!
//! Generates the HTML index for directories without an index file.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters escaped in listing hrefs
const HREF_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    fn href(&self) -> String {
        let encoded = utf8_percent_encode(&self.name, HREF_ESCAPE).to_string();
        if self.is_dir {
            format!("{encoded}/")
        } else {
            encoded
        }
    }

    /// Directories end in `/`, symlinks in `@`
    fn display_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else if self.is_symlink {
            format!("{}@", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Read a directory's entries, sorted case-insensitively by name
///
/// Names that are not valid UTF-8 are shown lossily.
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let file_type = entry.file_type().await?;
        // Follow symlinks so linked directories still get a trailing slash
        let is_dir = if file_type.is_symlink() {
            fs::metadata(entry.path())
                .await
                .is_ok_and(|meta| meta.is_dir())
        } else {
            file_type.is_dir()
        };
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink: file_type.is_symlink(),
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page for `display_path` (the decoded request path)
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = String::with_capacity(256 + entries.len() * 64);

    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(&entry.href()),
            escape_html(&entry.display_name())
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    fn file(name: &str) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir: false,
            is_symlink: false,
        }
    }

    #[test]
    fn test_render_escapes_names() {
        let entries = vec![
            file("a b.txt"),
            file("<script>.gz"),
            ListingEntry {
                name: "sub".to_string(),
                is_dir: true,
                is_symlink: false,
            },
        ];
        let html = render_listing("/files/", &entries);

        assert!(html.contains("<title>Directory listing for /files/</title>"));
        assert!(html.contains(r#"<li><a href="a%20b.txt">a b.txt</a></li>"#));
        assert!(html.contains(r#"<a href="%3Cscript%3E.gz">&lt;script&gt;.gz</a>"#));
        assert!(html.contains(r#"<a href="sub/">sub/</a>"#));
    }

    #[test]
    fn test_symlink_display() {
        let entry = ListingEntry {
            name: "latest".to_string(),
            is_dir: false,
            is_symlink: true,
        };
        assert_eq!(entry.display_name(), "latest@");
        assert_eq!(entry.href(), "latest");
    }

    #[tokio::test]
    async fn test_read_entries_sorted() {
        let temp = TempDir::new().unwrap();
        temp.child("beta.txt").write_str("b").unwrap();
        temp.child("Alpha.gz").write_binary(b"\x1f\x8b").unwrap();
        temp.child("gamma").create_dir_all().unwrap();

        let entries = read_entries(temp.path()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Alpha.gz", "beta.txt", "gamma"]);
        assert!(entries[2].is_dir);
        assert!(!entries[0].is_dir);
    }
}
