pub mod error;
pub mod global_id;
pub mod local_id;
