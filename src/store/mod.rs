pub mod entry_store;
pub mod json_store;
