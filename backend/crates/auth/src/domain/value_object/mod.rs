//! Value Object Module

pub mod claims;
pub mod subject;
pub mod token_hash;
pub mod user_name;
