//! Core types and trait definitions for ScriptGo.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// Trait futures spell out their `Send` bounds explicitly.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod content;
pub mod error;
pub mod script;
pub mod store;

pub use error::{Error, Result};
