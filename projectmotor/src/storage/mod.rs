mod data_store;
mod errors;

pub use data_store::{DataStore, StoreConfig, StoreType, connect_data_store};
pub(crate) use data_store::DbTransaction;
pub(crate) use errors::{StorageError, is_unique_violation};
