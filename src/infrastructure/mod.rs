//! Infrastructure layer - storage, hashing and service implementations

pub mod account;
pub mod logging;
pub mod profile;
pub mod storage;
