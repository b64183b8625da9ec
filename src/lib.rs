//! # Six Degrees
//!
//! Word-association puzzle: connect a start word to a target word through
//! semantically linked words in six steps or less.
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Word vectors, the semantic graph, path rules, scoring, hints |
//! | [`store`] | REST client persisting finished games and reading aggregate stats |
//! | [`server`] | Axum JSON API in front of both |
//! | [`config`] | TOML + environment configuration |
//!
//! Store operations never fail loudly: they return `false` / `None` and
//! report the underlying error through `log` and an optional diagnostic
//! channel.

pub mod config;
pub mod engine;
pub mod server;
pub mod store;
