//! Storefront Server - embedded e-commerce backend
//!
//! # Architecture overview
//!
//! - **Inventory core** (`inventory`): append-only stock ledger with
//!   derived availability, plus reservation coordination
//! - **Order domain** (`orders`): checkout and the admin decision
//!   state machine
//! - **Database** (`db`): embedded SurrealDB storage and repositories
//! - **HTTP API** (`api`): RESTful routes and handlers
//!
//! # Module structure
//!
//! ```text
//! storefront-server/src/
//! ├── core/          # configuration, state, server
//! ├── inventory/     # stock ledger + reservations
//! ├── orders/        # checkout workflow
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # database layer
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod inventory;
pub mod orders;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use inventory::{ReservationManager, StockError, StockLedger};
pub use orders::{OrderError, OrderWorkflow};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and set up logging. Call once at process start.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(level.as_deref(), None);
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __                  ____                 __
  / ___// /_____  ________  / __/________  ____  / /_
  \__ \/ __/ __ \/ ___/ _ \/ /_/ ___/ __ \/ __ \/ __/
 ___/ / /_/ /_/ / /  /  __/ __/ /  / /_/ / / / / /_
/____/\__/\____/_/   \___/_/ /_/   \____/_/ /_/\__/
    "#
    );
}
