//! Convenience-store product scrapers: listing and detail pages from
//! Seven-Eleven, FamilyMart and Lawson flattened into one CSV schema.

pub mod assembler;
pub mod collector;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod scrapers;
pub mod seeds;
pub mod storage;
pub mod utils;

pub use error::ScrapeError;
