//!  Storage is organized around a single json snapshot.
//!  The basic idea is:
//!   - The whole collection of activity records is serialized as one unit
//!     under a fixed key, and overwritten wholesale on every save.
//!   - The key-value service underneath is an injected trait, so the disk
//!     backed store can be swapped for an in-memory one in tests.
//!   - Aggregation works on loaded collections and never touches storage.

pub mod aggregate;
pub mod entities;
pub mod kv;
pub mod snapshot;
