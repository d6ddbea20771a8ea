//! # Plotz Architecture
//!
//! Plotz keeps a garden's records: the plants growing in it, the activities
//! (watering, planting, harvesting, ...) done or planned for them, and a small
//! settings record. It is a library first; the `plotz` binary is one client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (args.rs, cli/, wired by main.rs)                      │
//! │  - Parses arguments, prints tables and messages             │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - Validate input, call the stores, return CmdResult        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Garden (api.rs) + stores (store/, settings.rs, undo.rs)    │
//! │  - Ordered in-memory records, written through on change     │
//! │  - Delete/undo protocol                                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Persistence (codec.rs + store/backend.rs)                  │
//! │  - Versioned JSON envelopes under fixed string keys         │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `commands` inward, code never prints and never exits. Errors come back
//! as [`error::PlotzError`].
//!
//! ## Module Overview
//!
//! - [`model`]: `Plant`, `Activity`, their ids, labels and patch types
//! - [`codec`]: blob envelope and date format
//! - [`store`]: `RecordStore`, the `Record` trait and storage backends
//! - [`undo`]: staged deletes and single-use deletion tokens
//! - [`settings`]: the garden settings record
//! - [`seed`]: sample data for a brand new garden
//! - [`api`]: the `Garden` context owning all stores
//! - [`commands`]: validated operations returning `CmdResult`
//! - [`config`]: `config.json` in the data directory
//! - [`logging`]: `env_logger` setup
//! - [`error`]: error types

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod seed;
pub mod settings;
pub mod store;
pub mod undo;
