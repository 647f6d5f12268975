//! Core building blocks for the roster student-records service.
//!
//! This crate is I/O free: it holds the domain types, the cache key
//! discipline, and the contracts that storage and cache backends implement.

pub mod cache;
pub mod roster;
pub mod storage;
