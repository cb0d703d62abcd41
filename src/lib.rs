//! ageless - training companion for soccer players over 35
//!
//! The core is a resource catalog filtered by category tab and a
//! case-insensitive search. Around it sit training customization, a
//! community hub, a progress dashboard and coaching suggestions.
//!
//! # Architecture
//!
//! Remote collaborators are fail-soft:
//! - `DataService` turns store failures into empty lists or `None`
//! - `CoachService` turns assistant failures into built-in content
//! - every remote call is bounded by a timeout and a cancellation token
//!
//! # Modules
//!
//! - `library`: Resource catalog and filtering
//! - `domain`: Training, community, progress and coaching types
//! - `adapters`: Data stores (REST, SQLite) and assistants (OpenAI, canned)
//! - `core`: Fail-soft services and the home overview
//! - `seed`: Built-in demo content
//! - `config`: Layered configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Install demo data locally
//! ageless seed
//!
//! # Browse the library
//! ageless library --category health --search injury
//!
//! # Log a session
//! ageless train --intensity 3 --duration 45 --drills 1,4
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod library;
pub mod seed;

// Re-export main types at crate root for convenience
pub use core::{CoachService, DataService};
pub use library::{Category, CategorySelector, LibraryQuery, Resource, ResourceCatalog, ResourceId};

pub use adapters::{Assistant, DataStore};
