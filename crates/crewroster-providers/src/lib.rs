//! RosterProvider trait and implementations.
//!
//! - [`RosterProvider`] - the client of the crew roster service
//! - [`MemoryProvider`] - serves a fixed set of activities and flights
//! - [`JsonFileProvider`] - serves a roster dump read from disk
//! - [`ProviderError`] - errors returned by providers
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────────┐
//! │  roster dump     │    │  in-memory data  │
//! └────────┬─────────┘    └────────┬─────────┘
//!          ▼                       ▼
//! ┌──────────────────┐    ┌──────────────────┐
//! │ JsonFileProvider │───▶│  MemoryProvider  │
//! └────────┬─────────┘    └────────┬─────────┘
//!          │     RosterProvider    │
//!          └───────────┬───────────┘
//!                      ▼
//!          Roster / Vec<ScheduledFlight>
//! ```

pub mod error;
pub mod file;
pub mod memory;
pub mod provider;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use file::{JsonFileProvider, RosterDump};
pub use memory::MemoryProvider;
pub use provider::{BoxFuture, RosterProvider};
