//! The rewrite passes and the pipeline engine.
//!
//! Four passes run in a fixed order against the in-memory assembly:
//!
//! 1. [`fold_strings`] — replace each XOR string-decryption construction
//!    with a literal `ldstr`. Runs first so helper methods lose their last
//!    references before liveness is computed.
//! 2. [`identify_live_code`](crate::analysis::identify_live_code) — compute
//!    live sets from the trace roots plus the public surface. Must see the
//!    original bodies, so it runs before any body is blanked.
//! 3. [`invalidate_unused`] — blank every dead method body to a minimal
//!    `default; ret`.
//! 4. [`reorder_methods`] / [`rename_dead_methods`] / [`rename_dead_types`]
//!    — normalize ordering and names. Renames strictly post-date all
//!    analysis; full-name identity holds until this point.
//!
//! [`clean`] sequences all of the above and returns a [`CleanResult`] with
//! derived statistics and the full [`EventLog`].

mod engine;
mod events;
mod invalidate;
mod reorder;
mod strings;

pub use engine::{clean, CleanResult, CleanSummary};
pub use events::{Event, EventBuilder, EventKind, EventLog};
pub use invalidate::{invalidate_method, invalidate_unused, DefaultValue};
pub use reorder::{rename_dead_methods, rename_dead_types, reorder_methods};
pub use strings::{fold_strings, PLAINTEXT_TERMINATOR};
