pub mod api;
pub mod config;
pub mod coordinators;
pub mod error;
pub mod fetch;
pub mod membership;
pub mod models;
pub mod nav;
pub mod overlay;
pub mod session;

pub use api::{HttpBackend, MovieBackend};
pub use config::Config;
pub use error::{AppError, AppResult};
