//! Data service implementations.
//!
//! Available backends:
//! - `MemoryFactService` - In-process storage (development and tests)
//! - `RestFactService` - PostgREST `facts` table over HTTP

pub mod memory;
pub mod rest;

pub use memory::MemoryFactService;
pub use rest::RestFactService;
