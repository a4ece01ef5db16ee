//! Types shared by every API endpoint.

pub mod common;
