//! Sort subsystem
//!
//! Resolves `sort` request tokens into a total order.
//!
//! # Guarantees
//!
//! - The primary key is always appended as an ascending tie-break, so no
//!   two rows ever compare equal
//! - NULLs sort after every non-null value, in both directions
//! - `random:<seed>` reproduces the same shuffle on every page without any
//!   server-side state

mod errors;
mod order;
mod random;
mod registry;
mod spec;

pub use errors::{SortError, SortResult};
pub use order::{compare_nullable, compare_rows, OrderTerm};
pub use random::{fresh_seed, seeded_hash, seeded_hash_json};
pub use registry::{SortRegistry, SortableDescriptor};
pub use spec::{resolve, resolve_with_seed, RandomSort, SortDirection, SortKey, SortSpec};
