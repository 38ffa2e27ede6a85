//! A Redis-compatible in-memory key-value server.
//!
//! This crate implements the core of a Redis-compatible server:
//!
//! - RESP protocol framing (decode client frames, encode responses)
//! - Basic key-value operations (GET, SET) with per-key expiration
//! - Stream appends (XADD) with monotonic entry IDs
//! - Keyspace introspection (TYPE, KEYS, CONFIG GET)
//! - RDB snapshot loading at startup
//! - A background reaper that evicts expired keys
//!
//! The server handles concurrent connections through async/await with
//! Tokio; the keyspace is shared behind a single readers-writer lock.

pub mod commands;
pub mod config;
pub mod connection;
pub mod expiry;
pub mod keyspace;
pub mod rdb;
pub mod resp;
