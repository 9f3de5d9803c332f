pub mod editors;
pub mod models;
pub mod persistence;
pub mod storage;
pub mod store;
