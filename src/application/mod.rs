//! Application services layer.

pub mod catalog;
pub mod repos;
