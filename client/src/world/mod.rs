pub mod id_registry;
pub mod shape_store;
