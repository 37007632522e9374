//! The pipeline engine.
//!
//! [`clean`] runs the passes in the only order that is correct:
//! string folding must precede reachability (so helper methods lose their
//! last references and die), reachability must precede invalidation (the
//! analyzer has to read original bodies to discover callees), and renames
//! come last (full names are identity until analysis is frozen).

use std::fmt;

use rustc_hash::FxHashSet;

use crate::analysis::{identify_live_code, LiveSets};
use crate::deobfuscation::{
    fold_strings, invalidate_unused, rename_dead_methods, rename_dead_types, reorder_methods,
    EventKind, EventLog,
};
use crate::metadata::Module;

/// Counts summarizing one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanSummary {
    /// Methods found live.
    pub live_methods: usize,
    /// Types found live.
    pub live_types: usize,
    /// Decryption call sites folded into literals.
    pub strings_decrypted: usize,
    /// Dead method bodies blanked.
    pub bodies_invalidated: usize,
    /// Dead methods renamed.
    pub methods_renamed: usize,
    /// Dead types renamed.
    pub types_renamed: usize,
}

impl fmt::Display for CleanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} live methods, {} live types, {} strings decrypted, \
             {} bodies invalidated, {} methods renamed, {} types renamed",
            self.live_methods,
            self.live_types,
            self.strings_decrypted,
            self.bodies_invalidated,
            self.methods_renamed,
            self.types_renamed
        )
    }
}

/// Everything a pipeline run produces besides the rewritten assembly
/// itself.
#[derive(Debug, Clone)]
pub struct CleanResult {
    /// Derived counts.
    pub summary: CleanSummary,
    /// The live sets the run was based on, keyed by pre-rename full names.
    pub live: LiveSets,
    /// Every event the passes recorded.
    pub events: EventLog,
}

/// Runs the full deobfuscation pipeline against `module`.
///
/// `roots` are the method full names observed executing at runtime,
/// typically loaded with [`crate::trace::load_roots`]. Roots that match
/// nothing in the module are ignored.
///
/// The pipeline never fails: malformed decryption sites are skipped,
/// unresolvable references fall out of the closure, and the worst possible
/// input yields an assembly that is merely unchanged.
pub fn clean(module: &mut Module, roots: &FxHashSet<String>) -> CleanResult {
    let mut events = EventLog::new();

    let strings_decrypted = fold_strings(module, &mut events);
    let live = identify_live_code(module, roots);
    let bodies_invalidated = invalidate_unused(module, &live, &mut events);

    let reordered = reorder_methods(module, &live);
    if reordered > 0 {
        events
            .record(EventKind::MethodsReordered)
            .message(format!("{reordered} types partitioned live-first"));
    }
    let methods_renamed = rename_dead_methods(module, &live, &mut events);
    let types_renamed = rename_dead_types(module, &live, &mut events);

    let summary = CleanSummary {
        live_methods: live.methods.len(),
        live_types: live.types.len(),
        strings_decrypted,
        bodies_invalidated,
        methods_renamed,
        types_renamed,
    };
    events.info(summary.to_string());

    CleanResult {
        summary,
        live,
        events,
    }
}
