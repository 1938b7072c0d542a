//! Entity Module

pub mod blacklist;
pub mod refresh_token;
pub mod user;
