//! Configuration and settings for the traffic service.

mod settings;

#[allow(unused_imports)]
pub use settings::{
    get_db_path,
    require_secret,
    ServerConfig,
    CORS_MAX_AGE_SECS,
    DEFAULT_LOG_FILTER,
    DEFAULT_PAGE_LIMIT,
    DEFAULT_PORT,
    DEFAULT_TOKEN_TTL_SECS,
    MAX_PAGE_LIMIT,
    MAX_VISITS,
};
