pub mod cookies;
pub mod headers;
pub mod logging;
