//! HTTP surface: error mapping, router assembly, and server startup.

pub mod error;
pub mod routes;
pub mod server;

pub use routes::{build_router, ApiState};
pub use server::{build_app, start};
