pub mod schema;
pub mod url_reduce;
pub mod user_agent;
pub mod record;
pub mod ingest;
pub mod filter;
pub mod dataset;
pub mod logging;
