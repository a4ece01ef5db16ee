//! Storage for account records.

pub mod user_repository;
