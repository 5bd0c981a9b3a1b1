//! Storage layer
//!
//! The book record, the dataset loader and the in-memory collection that
//! backs offline mode.

pub mod book;
pub mod collection;
pub mod dataset;
