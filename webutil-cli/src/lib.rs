pub mod commands;
pub mod config;

pub use webutil_http as http;
pub use webutil_query as query;
