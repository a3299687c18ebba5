mod config;
mod types;

pub use config::{StoreConfig, StoreType, connect_data_store};
pub use types::DataStore;
pub(crate) use types::DbTransaction;
