pub mod access;
pub mod entity;
pub mod tracker;
