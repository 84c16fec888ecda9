use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use reqwest::blocking::{Client, Response};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tracing::{info, warn, error, instrument};
use url::Url;

use super::cookie_export::{parse_cookie_export, CookieExportFormat};
use super::cookie_store::CookieStore;
use crate::config::Config;
use crate::error::{AuthError, FetchError};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "application/json, text/plain, */*";
const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

/// One authenticated browser-like session against the site. Built once by
/// the caller and handed to the API client; cookies only change through
/// [`Session::load_from_file`] and [`Session::set_from_string`].
#[derive(Debug)]
pub struct Session {
    http: Client,
    base_url: Url,
    cookie_format: CookieExportFormat,
    cookies: CookieStore,
    authenticated: bool,
}

fn browser_headers(base_url: &Url) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(HeaderName::from_static("x-requested-with"), HeaderValue::from_static("XMLHttpRequest"));
    if let Ok(referer) = HeaderValue::from_str(base_url.as_str()) {
        headers.insert(header::REFERER, referer);
    }
    headers
}

impl Session {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)?;
        let http = Client::builder()
            .default_headers(browser_headers(&base_url))
            .danger_accept_invalid_certs(true)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            cookie_format: CookieExportFormat::for_domain(config.cookie_domain.clone()),
            cookies: CookieStore::new(),
            authenticated: false,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn cookies(&self) -> &CookieStore {
        &self.cookies
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Loads a tab-separated cookie export. Only cookies for the configured
    /// domain are kept. Fails without touching the session when the file
    /// cannot be read or holds no usable cookie.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<&CookieStore, AuthError> {
        let path = path.as_ref();
        info!("Loading cookies from file");

        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                error!("Cookie file does not exist");
                AuthError::CookieFileMissing(path.to_path_buf())
            } else {
                error!(error = %source, "Failed to read cookie file");
                AuthError::CookieFileUnreadable { path: path.to_path_buf(), source }
            }
        })?;

        let export = parse_cookie_export(&text, &self.cookie_format);
        if export.cookies.is_empty() {
            error!(
                malformed_rows = export.malformed_rows,
                foreign_rows = export.foreign_rows,
                domain = %self.cookie_format.domain,
                "No valid cookies found for target domain"
            );
            return Err(AuthError::NoValidCookies {
                path: path.to_path_buf(),
                malformed_rows: export.malformed_rows,
            });
        }

        let loaded = export.cookies.len();
        self.cookies.merge(export.cookies);
        self.authenticated = true;
        info!(
            loaded,
            malformed_rows = export.malformed_rows,
            foreign_rows = export.foreign_rows,
            "Cookies loaded"
        );

        let key_cookies = self.cookies.key_cookies();
        if key_cookies.is_empty() {
            warn!("None of the login cookies (xq_a_token, xq_r_token, u) were found");
        } else {
            info!(key_cookies = %key_cookies.join(", "), "Login cookies present");
        }

        Ok(&self.cookies)
    }

    /// Merges a raw `Cookie` header string. No domain filtering is applied.
    #[instrument(skip_all)]
    pub fn set_from_string(&mut self, raw: &str) -> &CookieStore {
        let parsed = CookieStore::parse_header_string(raw);
        info!(count = parsed.len(), "Cookies set from header string");
        self.cookies.merge(parsed);
        self.authenticated = true;
        &self.cookies
    }

    /// Sends a GET to `path` under the base url with the session headers and
    /// cookies. The response is returned whatever its status.
    pub fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response, FetchError> {
        let url = self.base_url.join(path)?;
        let mut request = self.http.get(url).query(query);
        if !self.cookies.is_empty() {
            let cookie_header = HeaderValue::from_str(&self.cookies.to_header_value())
                .map_err(|_| FetchError::InvalidCookieHeader)?;
            request = request.header(header::COOKIE, cookie_header);
        }
        Ok(request.send()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn session() -> Session {
        Session::new(&Config::default()).unwrap()
    }

    #[test]
    fn new_session_is_unauthenticated() {
        let session = session();
        assert!(!session.is_authenticated());
        assert!(session.cookies().is_empty());
    }

    #[test]
    fn missing_file_leaves_session_unauthenticated() {
        let mut session = session();
        let dir = tempfile::tempdir().unwrap();
        let err = session.load_from_file(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, AuthError::CookieFileMissing(_)));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn file_without_domain_cookies_fails() {
        let mut session = session();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a\t1\t.example.com\t/\tSession\t3\tLax").unwrap();
        writeln!(file, "short\trow").unwrap();
        let err = session.load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, AuthError::NoValidCookies { malformed_rows: 1, .. }));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn set_from_string_authenticates() {
        let mut session = session();
        let cookies = session.set_from_string("xq_a_token=abc; u=1");
        assert_eq!(cookies.len(), 2);
        assert!(session.is_authenticated());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = Config { base_url: "not a url".to_string(), ..Config::default() };
        assert!(matches!(Session::new(&config), Err(FetchError::InvalidUrl(_))));
    }
}
