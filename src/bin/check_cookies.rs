use std::path::PathBuf;
use tracing::info;

use xueqiu_fetcher::config;
use xueqiu_fetcher::logging;
use xueqiu_fetcher::session::Session;
use xueqiu_fetcher::session::cookie_store::KEY_COOKIES;

fn main() -> eyre::Result<()> {
    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let cfg = config::Config::load()?;
    let cookie_file = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.cookie_file.clone());
    info!(cookie_file = %cookie_file.display(), domain = %cfg.cookie_domain, "Checking cookie file");

    let mut session = Session::new(&cfg)?;
    let cookies = session.load_from_file(&cookie_file)?;

    println!("Loaded {} cookies for {}", cookies.len(), cfg.cookie_domain);
    for (name, value) in cookies.iter() {
        println!("  {:<24} {} chars", name, value.chars().count());
    }

    let present = cookies.key_cookies();
    for key in KEY_COOKIES {
        let mark = if present.contains(&key) { "present" } else { "MISSING" };
        println!("{:<12} {}", key, mark);
    }

    Ok(())
}
