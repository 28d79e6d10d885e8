//! Opaque pagination cursors.
//!
//! A cursor carries the sort-key values of the last row of a page plus its
//! primary key. Clients treat it as an opaque string and echo it back in the
//! `after` parameter.

mod codec;
mod errors;

pub use codec::{decode, encode, encode_cursor, extract, Cursor};
pub use errors::{CursorError, CursorResult};
