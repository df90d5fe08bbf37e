//! Client-side feed core: aggregation, optimistic mutations and realtime
//! merge over the managed backend contracts in `provider-api`.

pub mod config;
pub mod domain;
pub mod error;
pub mod realtime;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
