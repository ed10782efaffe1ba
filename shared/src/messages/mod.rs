pub mod client_options;
pub mod error;
pub mod message;
pub mod payloads;
