//! ```text
//! Section pages ──► ingestion::discover ──► ChapterLink list
//!                                              │
//! Chapter page ──► ingestion::fetch_page ──► PageCache
//!                          │
//!                          ▼
//!              ingestion::extract_blocks ──► ContentBlock sequence
//!                          │
//!                          ▼
//!     fragments::fragment_blocks (group ─► truncate ─► assemble)
//!                          │
//!                          ▼
//!              stores::Backend (chapters + chapter_fragments)
//!
//! RSS feed ──► headlines::feed ──► reader + Summarizer ──► stores::Backend (headlines)
//! ```
//!
//! The `fragments` module is pure and synchronous; everything that touches
//! the network or disk lives in `ingestion`, `headlines`, and `stores`.

pub mod config;
pub mod fragments;
pub mod headlines;
pub mod ingestion;
pub mod stores;
pub mod types;

pub use fragments::{ContentBlock, Fragment, fragment_blocks};
pub use types::IngestError;
