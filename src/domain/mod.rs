//! Domain entities, request/response types and the storage ports.

pub mod category;
pub mod expense;
pub mod ports;
pub mod user;
