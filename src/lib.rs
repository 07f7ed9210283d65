//! pmfilter - read, edit and write Process Monitor filter files.
//!
//! A filter file is an ordered list of rules. Each rule compares one event
//! column against a value with a relation and either includes or excludes
//! matching events.
//!
//! # Quick Start
//!
//! ```no_run
//! use pmfilter::FilterStore;
//!
//! // Missing or unreadable files start out empty
//! let mut store = FilterStore::open("ProcmonConfiguration.pmf")?;
//!
//! store.append("Operation", "is", "RegQueryValue", "INCLUDE")?;
//! store.append("Process Name", "is", "explorer.exe", "EXCLUDE")?;
//! print!("{}", store);
//!
//! // Nothing reaches the disk until commit
//! store.commit()?;
//! # Ok::<(), pmfilter::Error>(())
//! ```
//!
//! # Saving
//!
//! - [`FilterStore::commit`] rewrites the file in place and truncates
//!   leftover bytes from a previously larger file.
//! - [`FilterStore::commit_atomic`] writes a temporary file and renames it
//!   over the original.
//! - [`FilterStore::close`] commits only when [`StoreOptions::autocommit`]
//!   is set. Dropping a store never writes.
//!
//! # Vocabulary
//!
//! - **Columns**: see [`column::COLUMNS`]; unknown codes are preserved
//! - **Relations**: is, is not, less than, more than, begins with,
//!   ends with, contains, excludes
//! - **Actions**: EXCLUDE, INCLUDE

mod action;
mod error;
mod relation;
mod rule;

pub mod codec;
pub mod column;
pub mod store;

// Re-export core types
pub use action::Action;
pub use column::Column;
pub use error::{Error, Result};
pub use relation::Relation;
pub use rule::{ListedRule, Rule};

// Re-export store types
pub use store::{default_autocommit, set_default_autocommit, FilterStore, StoreOptions};
