use std::io::Write;

use httpmock::prelude::*;
use serde_json::json;
use tempfile::NamedTempFile;

use xueqiu_fetcher::api::XueqiuClient;
use xueqiu_fetcher::config::Config;
use xueqiu_fetcher::error::AuthError;
use xueqiu_fetcher::session::Session;

// Copied from the browser's cookie table, with the viewer's line numbers.
const EXPORT: &str = "\
# xueqiu cookies exported 2024-03-01
     1→xq_a_token\tabcdef0123456789\t.xueqiu.com\t/\t2024-04-01T00:00:00.000Z\t50\t✓
     2→xq_r_token\tr-token\t.xueqiu.com\t/\t2024-04-01T00:00:00.000Z\t42\t✓
     3→u\t1234567890\txueqiu.com\t/\t2024-04-01T00:00:00.000Z\t11\t
     4→_ga\tGA1.2.3\t.google.com\t/\t2025-01-01T00:00:00.000Z\t18\t
     5→truncated\trow
     6→xq_a_token\tfresh-token\t.xueqiu.com\t/\t2024-04-02T00:00:00.000Z\t50\t✓

";

fn write_export(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn loads_domain_cookies_from_export() {
    let file = write_export(EXPORT);
    let mut session = Session::new(&Config::default()).unwrap();

    let cookies = session.load_from_file(file.path()).unwrap();
    assert_eq!(cookies.get("xq_a_token"), Some("fresh-token"));
    assert_eq!(cookies.get("xq_r_token"), Some("r-token"));
    assert_eq!(cookies.get("_ga"), None);
    assert_eq!(cookies.get("truncated"), None);
    assert!(session.is_authenticated());
}

#[test]
fn row_with_trailing_empty_column_is_short_after_trim() {
    // Row 3 ends in an empty column that trimming removes, leaving six fields.
    let file = write_export(EXPORT);
    let mut session = Session::new(&Config::default()).unwrap();
    let cookies = session.load_from_file(file.path()).unwrap();
    assert_eq!(cookies.get("u"), None);
    assert_eq!(cookies.len(), 2);
}

#[test]
fn nonexistent_file_fails_and_stays_unauthenticated() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(&Config::default()).unwrap();
    let err = session.load_from_file(dir.path().join("xueqiu_cookie.txt")).unwrap_err();
    assert!(matches!(err, AuthError::CookieFileMissing(_)));
    assert!(!session.is_authenticated());
}

#[test]
fn non_utf8_file_is_unreadable_and_stays_unauthenticated() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"a\t\xff\xfe\txueqiu.com\t/\tx\t1\ty\n").unwrap();
    let mut session = Session::new(&Config::default()).unwrap();

    let err = session.load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, AuthError::CookieFileUnreadable { .. }));
    assert!(!session.is_authenticated());
    assert!(session.cookies().is_empty());
}

#[test]
fn comments_only_file_fails() {
    let file = write_export("# nothing here\n\n");
    let mut session = Session::new(&Config::default()).unwrap();
    let err = session.load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, AuthError::NoValidCookies { malformed_rows: 0, .. }));
    assert!(!session.is_authenticated());
}

#[test]
fn custom_domain_is_respected() {
    let file = write_export("a\t1\t.example.com\t/\tSession\t2\tx\nb\t2\t.xueqiu.com\t/\tSession\t2\tx\n");
    let config = Config { cookie_domain: "example.com".to_string(), ..Config::default() };
    let mut session = Session::new(&config).unwrap();
    let cookies = session.load_from_file(file.path()).unwrap();
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies.get("a"), Some("1"));
}

#[test]
fn header_string_merges_over_file_cookies() {
    let file = write_export(EXPORT);
    let mut session = Session::new(&Config::default()).unwrap();
    session.load_from_file(file.path()).unwrap();

    let cookies = session.set_from_string("xq_a_token=override; device_id=abc");
    assert_eq!(cookies.get("xq_a_token"), Some("override"));
    assert_eq!(cookies.get("xq_r_token"), Some("r-token"));
    assert_eq!(cookies.get("device_id"), Some("abc"));
}

#[test]
fn loaded_cookies_are_sent_with_requests() {
    let server = MockServer::start();
    let history = server.mock(|when, then| {
        when.method(GET)
            .path("/cubes/rebalancing/history.json")
            .header("cookie", "xq_a_token=fresh-token; xq_r_token=r-token")
            .header("referer", format!("{}/", server.base_url()));
        then.status(200).json_body(json!({"list": []}));
    });

    let file = write_export(EXPORT);
    let config = Config { base_url: server.base_url(), ..Config::default() };
    let mut session = Session::new(&config).unwrap();
    session.load_from_file(file.path()).unwrap();

    let client = XueqiuClient::new(session);
    assert_eq!(client.session().base_url().as_str(), format!("{}/", server.base_url()));
    assert_eq!(client.session().cookies().len(), 2);

    let records = client.fetch_rebalancing_history("ZH1", 20).unwrap();
    assert!(records.is_empty());
    history.assert_hits(1);
}
