pub mod memory;
pub mod models;
pub mod monitor;
pub mod postgres;
pub mod repository;

pub use memory::MemoryUserStore;
pub use monitor::{ConnectionMonitor, ConnectionState};
pub use postgres::PgUserStore;
pub use repository::{StoreError, UserStore};
