//! Store Server - storefront back office
//!
//! # Architecture overview
//!
//! - **Catalog** (`catalog`, `db/repository/product`): filtered, sorted,
//!   paginated product queries plus slug-addressed lookups
//! - **Orders** (`db/repository/order`): order records with embedded line
//!   items, status buckets, bulk purges
//! - **Fulfillment** (`fulfillment`): the pay → deliver state machine and
//!   its transactional inventory reconciliation
//! - **HTTP API** (`api`): axum routes and handlers
//!
//! # Module structure
//!
//! ```text
//! store-server/src/
//! ├── core/          # config, state, server startup
//! ├── api/           # HTTP routes and handlers
//! ├── catalog/       # query builder (filter / sort / pagination)
//! ├── fulfillment/   # order state machine
//! ├── db/            # pool, migrations, repositories
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod fulfillment;
pub mod utils;

// Re-export public types
pub use self::core::{Config, Server, ServerState};
pub use fulfillment::FulfillmentError;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
