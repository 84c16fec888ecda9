pub mod cookie_export;
pub mod cookie_store;
pub mod session;

pub use cookie_export::{CookieExport, CookieExportFormat};
pub use cookie_store::CookieStore;
pub use session::Session;
