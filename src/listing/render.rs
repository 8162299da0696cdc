//! Listing renderers
//!
//! - HTML through a page template (built-in or loaded from disk)
//! - Plain text for terminal output
//!
//! Template placeholders: `{{path}}`, `{{breadcrumb}}` and `{{server}}` in the
//! page, and a row section `{{#items}} ... {{/items}}` using `{{name}}`,
//! `{{link}}`, `{{size}}` and `{{mod_time}}`. All values are HTML-escaped.

use super::page::{DisplayEntry, ListingPage};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

const ROWS_OPEN: &str = "{{#items}}";
const ROWS_CLOSE: &str = "{{/items}}";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template has no {{{{#items}}}} ... {{{{/items}}}} section")]
    MissingRows,
}

/// Parsed page template, split around its row section
#[derive(Debug, Clone)]
pub struct Template {
    head: String,
    row: String,
    tail: String,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let (head, rest) = source
            .split_once(ROWS_OPEN)
            .ok_or(TemplateError::MissingRows)?;
        let (row, tail) = rest
            .split_once(ROWS_CLOSE)
            .ok_or(TemplateError::MissingRows)?;

        Ok(Self {
            head: head.to_string(),
            row: row.to_string(),
            tail: tail.to_string(),
        })
    }

    /// Read and parse a template file; runs once at startup
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    pub fn builtin() -> Self {
        Self::parse(BUILTIN_TEMPLATE).unwrap_or_else(|_| Self {
            head: String::new(),
            row: String::new(),
            tail: String::new(),
        })
    }

    pub fn render(&self, page: &ListingPage, server_name: &str) -> String {
        let crumbs = render_breadcrumb(page);
        let fill_page = |part: &str| {
            part.replace("{{path}}", &escape_html(&page.path))
                .replace("{{breadcrumb}}", &crumbs)
                .replace("{{server}}", &escape_html(server_name))
        };

        let mut html = fill_page(&self.head);
        for item in &page.items {
            html.push_str(&self.render_row(item));
        }
        html.push_str(&fill_page(&self.tail));
        html
    }

    fn render_row(&self, item: &DisplayEntry) -> String {
        self.row
            .replace("{{name}}", &escape_html(&item.name))
            .replace("{{link}}", &escape_html(item.link.as_deref().unwrap_or("")))
            .replace("{{size}}", &escape_html(&item.size))
            .replace("{{mod_time}}", &escape_html(&item.mod_time))
    }
}

fn render_breadcrumb(page: &ListingPage) -> String {
    let mut html = String::new();
    for (i, crumb) in page.breadcrumb.iter().enumerate() {
        let _ = write!(
            html,
            r#"<a href="{}">{}</a>"#,
            escape_html(&crumb.href),
            escape_html(&crumb.label)
        );
        if i > 0 {
            html.push('/');
        }
    }
    if html.is_empty() {
        html = escape_html(&page.path);
    }
    html
}

/// Column layout for terminals
pub fn render_text(page: &ListingPage) -> String {
    let name_width = page
        .items
        .iter()
        .map(|item| item.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    let size_width = page
        .items
        .iter()
        .map(|item| item.size.len())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut out = format!("Index of {}\n\n", page.path);
    let _ = writeln!(out, "{:<name_width$}  {:>size_width$}  Modified", "Name", "Size");
    for item in &page.items {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>size_width$}  {}",
            item.name, item.size, item.mod_time
        );
    }
    out
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const BUILTIN_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Index of {{path}}</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
            max-width: 960px;
            margin: 0 auto;
            padding: 20px;
            color: #333;
        }
        h1 {
            font-size: 1.4em;
            font-weight: 600;
            border-bottom: 2px solid #667eea;
            padding-bottom: 8px;
        }
        h1 a {
            color: #667eea;
            text-decoration: none;
        }
        table {
            width: 100%;
            border-collapse: collapse;
        }
        th, td {
            padding: 6px 10px;
            text-align: left;
        }
        th {
            border-bottom: 1px solid #ddd;
        }
        td.size, th.size {
            text-align: right;
            white-space: nowrap;
        }
        tr:nth-child(even) {
            background: #f7f7fb;
        }
        a {
            color: #4451b8;
        }
        footer {
            margin-top: 20px;
            font-size: 0.85em;
            color: #888;
        }
    </style>
</head>
<body>
    <h1>Index of {{breadcrumb}}</h1>
    <table>
        <thead>
            <tr><th>Name</th><th class="size">Size</th><th>Modified</th></tr>
        </thead>
        <tbody>
{{#items}}            <tr><td><a href="{{link}}">{{name}}</a></td><td class="size">{{size}}</td><td>{{mod_time}}</td></tr>
{{/items}}        </tbody>
    </table>
    <footer>{{server}}</footer>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::entry::Entry;
    use crate::listing::page::SizeUnits;
    use std::time::SystemTime;

    fn sample_page() -> ListingPage {
        let entries = [Entry::dir("docs"), Entry::file("<b>.txt", 12)];
        ListingPage::new("/files/", &entries, SizeUnits::Decimal, SystemTime::UNIX_EPOCH)
    }

    #[test]
    fn test_builtin_template_renders_rows() {
        let html = Template::builtin().render(&sample_page(), "autoindex/test");
        assert!(html.contains("<title>Index of /files/</title>"));
        assert!(html.contains(r#"<a href="/files/docs/">docs/</a>"#));
        assert!(html.contains("&lt;b&gt;.txt"));
        assert!(html.contains(r#"href="/files/%3Cb%3E.txt""#));
        assert!(html.contains("12 B"));
        assert!(html.contains("<footer>autoindex/test</footer>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_breadcrumb_links() {
        let html = Template::builtin().render(&sample_page(), "s");
        assert!(html.contains(r#"<a href="/">/</a><a href="/files/">files</a>/"#));
    }

    #[test]
    fn test_custom_template() {
        let template =
            Template::parse("<ul data-path=\"{{path}}\">{{#items}}<li>{{name}}|{{size}}</li>{{/items}}</ul>")
                .unwrap();
        let html = template.render(&sample_page(), "s");
        assert_eq!(
            html,
            "<ul data-path=\"/files/\"><li>docs/|-</li><li>&lt;b&gt;.txt|12 B</li></ul>"
        );
    }

    #[test]
    fn test_template_without_rows_is_rejected() {
        assert!(matches!(
            Template::parse("<p>{{path}}</p>"),
            Err(TemplateError::MissingRows)
        ));
        assert!(matches!(
            Template::parse("{{#items}}<p>"),
            Err(TemplateError::MissingRows)
        ));
    }

    #[test]
    fn test_load_missing_template() {
        let err = Template::load(Path::new("/nonexistent/autoindex.html")).unwrap_err();
        assert!(matches!(err, TemplateError::Read { .. }));
    }

    #[test]
    fn test_render_text_columns() {
        let page = ListingPage::plain(
            ".",
            &[Entry::dir("src"), Entry::file("Cargo.toml", 1500)],
            SizeUnits::Decimal,
            SystemTime::UNIX_EPOCH,
        );
        let text = render_text(&page);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Index of .");
        assert!(lines[2].starts_with("Name"));
        assert!(lines[3].starts_with("src/ "));
        assert!(lines[3].contains("     -  now"));
        assert!(lines[4].starts_with("Cargo.toml  1.5 kB  now"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a&b<"c">'"#), "a&amp;b&lt;&quot;c&quot;&gt;&#39;");
    }
}
