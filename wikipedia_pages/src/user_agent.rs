/// User agent sent with every page request.
///
/// Wikimedia asks automated clients to identify themselves instead of
/// impersonating a browser.
pub fn get_user_agent() -> &'static str {
    concat!(
        "oscar-budgets/",
        env!("CARGO_PKG_VERSION"),
        " (budget survey; reqwest)"
    )
}
