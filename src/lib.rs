//! BreezeBuy Server - multi-tenant e-commerce backend
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/       # config, shared state, HTTP server
//! ├── auth/       # JWT, middleware, extractor
//! ├── services/   # cart, order workflow, notifications
//! ├── api/        # HTTP routes and handlers
//! ├── db/         # models and repositories (embedded SurrealDB)
//! └── utils/      # errors, result alias, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

pub use utils::logger::init_logger;
