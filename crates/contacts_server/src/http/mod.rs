//! HTTP surface: JSON contact API, CORS, access logging and static assets.

pub mod assets;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod view;
