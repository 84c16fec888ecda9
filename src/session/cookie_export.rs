//! Parser for cookie tables copied out of browser dev tools.
//!
//! Each data row is tab separated with at least seven columns, the first
//! three being name, value and domain. Rows may carry a line-number prefix
//! ending in a marker (`  12→name\tvalue\t...`), which is dropped before
//! splitting. Blank lines and `#` comments are skipped.

use tracing::debug;

use super::cookie_store::CookieStore;

/// Grammar of a cookie export.
#[derive(Debug, Clone)]
pub struct CookieExportFormat {
    pub row_marker: char,
    pub field_delimiter: char,
    pub comment_prefix: char,
    pub min_fields: usize,
    /// Rows are kept only when their domain column contains this.
    pub domain: String,
}

impl CookieExportFormat {
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            row_marker: '→',
            field_delimiter: '\t',
            comment_prefix: '#',
            min_fields: 7,
            domain: domain.into(),
        }
    }

    /// Accepts both `xueqiu.com` and `.xueqiu.com` style domain columns.
    pub fn matches_domain(&self, domain_field: &str) -> bool {
        let bare = self.domain.trim_start_matches('.');
        !bare.is_empty() && domain_field.contains(bare)
    }
}

/// Outcome of parsing a cookie export: the retained cookies plus counts of
/// what was dropped, so an export with only malformed rows can be told
/// apart from an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieExport {
    pub cookies: CookieStore,
    pub comment_rows: usize,
    pub malformed_rows: usize,
    pub foreign_rows: usize,
}

enum Row<'a> {
    Blank,
    Comment,
    Malformed(usize),
    Cookie { name: &'a str, value: &'a str, domain: &'a str },
}

fn parse_row<'a>(line: &'a str, format: &CookieExportFormat) -> Row<'a> {
    let mut line = line.trim();
    if line.is_empty() {
        return Row::Blank;
    }
    if line.starts_with(format.comment_prefix) {
        return Row::Comment;
    }
    if let Some((_, rest)) = line.split_once(format.row_marker) {
        line = rest.trim();
    }

    let fields: Vec<&str> = line.split(format.field_delimiter).collect();
    if fields.len() < format.min_fields {
        return Row::Malformed(fields.len());
    }
    Row::Cookie {
        name: fields[0].trim(),
        value: fields[1].trim(),
        domain: fields[2].trim(),
    }
}

pub fn parse_cookie_export(text: &str, format: &CookieExportFormat) -> CookieExport {
    let mut export = CookieExport::default();

    for (idx, line) in text.lines().enumerate() {
        match parse_row(line, format) {
            Row::Blank => {}
            Row::Comment => export.comment_rows += 1,
            Row::Malformed(field_count) => {
                export.malformed_rows += 1;
                debug!(line = idx + 1, field_count, "Skipping cookie row with too few columns");
            }
            Row::Cookie { name, value, domain } => {
                if format.matches_domain(domain) {
                    let value_prefix: String = value.chars().take(20).collect();
                    debug!(line = idx + 1, cookie = %name, value_prefix = %value_prefix, "Loaded cookie");
                    export.cookies.insert(name, value);
                } else {
                    export.foreign_rows += 1;
                    debug!(line = idx + 1, cookie = %name, domain = %domain, "Skipping cookie for other domain");
                }
            }
        }
    }

    export
}
