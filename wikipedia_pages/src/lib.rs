mod client;
mod errors;
mod source;
mod user_agent;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::source::PageSource;
pub use self::user_agent::get_user_agent;
