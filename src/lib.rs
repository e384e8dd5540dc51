//! Slide template catalog client.
//!
//! `slidepane` drives a presentation add-in's task pane: it lists a catalog of
//! slide templates kept in a Supabase project, searches it (ranked remotely or
//! by local substring match), narrows it by template type and section, and
//! inserts a chosen slide into the open presentation through a host seam.
//!
//! # Flow
//!
//! - **Browse**: on startup the catalog and the filter vocabulary are fetched
//!   concurrently; the catalog becomes an owned snapshot.
//! - **Search**: keystrokes are debounced, dropdown changes search at once, and
//!   only the newest request is ever rendered.
//! - **Insert**: a slide id is exchanged for a short-lived signed URL (or a
//!   public URL in legacy mode), the deck is downloaded, base64-encoded and
//!   handed to the host with source formatting kept.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files and environment variables
//! - [`catalog`] - Backend client, catalog records and the snapshot cache
//! - [`taskpane`] - Filters, search orchestration, insertion flow and rendering
//! - [`host`] - The presentation host seam and a directory-backed host
//! - [`embedding`] - Embedding client used by the catalog maintenance job
//! - [`error`] - Error types shared across the crate

pub mod catalog;
pub mod config;
pub mod embedding;
pub mod error;
pub mod host;
pub mod taskpane;
