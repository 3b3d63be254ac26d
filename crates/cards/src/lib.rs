//! Card records: validation, persistence and the HTTP routes over them.

pub mod handler;
pub mod models;
mod repository;
pub mod service;
