//! Infrastructure Layer
//!
//! Repository implementations: in-memory (default, tests) and
//! PostgreSQL.

pub mod memory;
pub mod postgres;

pub use memory::MemoryAuthRepository;
pub use postgres::PgAuthRepository;
