//! All things related to the storage of links and their clicks

use core::fmt;

use async_trait::async_trait;

use crate::clicks::ClickContext;
use crate::clicks::ClickEvent;
use crate::links::Link;

pub use memory::Memory;
pub use postgres::Postgres;

mod memory;
mod postgres;

/// Storage configuration
#[derive(Debug, PartialEq, Eq)]
pub enum Config {
    /// Keep everything in memory, gone on shutdown
    Memory,

    /// Connect to Postgres
    Postgres {
        /// Connection string
        database_url: String,

        /// Size of the connection pool
        max_connections: u32,
    },
}

/// Storage errors
#[derive(Debug)]
pub enum Error {
    /// A connection error with the storage
    Connection(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Connection(error) => write!(f, "Connection error: {error}"),
        }
    }
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find a single link by its short code
    ///
    /// Short codes are unique, so there is at most one
    async fn find_single_link_by_short_code(&self, short_code: &str) -> Result<Option<Link>>;

    /// Append a click to a link
    async fn save_click(&self, link: &Link, context: &ClickContext) -> Result<ClickEvent>;

    /// Count all clicks of a link
    async fn count_clicks_by_link(&self, link: &Link) -> Result<i64>;
}
