//! Side-by-side demo of two request-handling styles over one expense-tracking
//! domain: a non-blocking pipeline mode and a thread-per-request blocking
//! mode, plus a harness that times the same operation through both.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
