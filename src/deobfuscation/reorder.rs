//! Method reordering and synthetic renaming of dead code.
//!
//! After analysis is frozen, each type's method list is partitioned so
//! live methods come first (stable within each partition), and dead
//! methods and types receive short synthetic names. Numbering is monotonic
//! per pass invocation and restarts on every run, so two runs over the
//! same inputs produce identical names.

use crate::analysis::LiveSets;
use crate::deobfuscation::{EventKind, EventLog};
use crate::metadata::{Module, TypeId};

/// Partitions each type's method list into live-then-dead, preserving the
/// original relative order inside both partitions. A type is rewritten
/// only when it has more than one method and both partitions are
/// non-empty. Returns the number of types rewritten.
pub fn reorder_methods(module: &mut Module, live: &LiveSets) -> usize {
    let ids: Vec<TypeId> = module.types().collect();
    let mut reordered = 0;

    for id in ids {
        let count = module.type_def(id).methods.len();
        if count < 2 {
            continue;
        }
        let liveness: Vec<bool> = (0..count)
            .map(|index| live.method_is_live(&module.method_full_name(id, index)))
            .collect();
        let live_count = liveness.iter().filter(|&&is_live| is_live).count();
        if live_count == 0 || live_count == count {
            continue;
        }

        let methods = std::mem::take(&mut module.type_def_mut(id).methods);
        let mut partitioned = Vec::with_capacity(count);
        let mut dead = Vec::with_capacity(count - live_count);
        for (method, is_live) in methods.into_iter().zip(liveness) {
            if is_live {
                partitioned.push(method);
            } else {
                dead.push(method);
            }
        }
        partitioned.append(&mut dead);
        module.type_def_mut(id).methods = partitioned;
        reordered += 1;
    }
    reordered
}

/// Renames every dead method to `Method_{n}`, skipping constructors and
/// special-name methods. The counter is monotonic across all types in
/// enumeration order. Returns the number of methods renamed.
///
/// There is deliberately no guard against names already matching the
/// template: re-running the pipeline renumbers previously renamed dead
/// methods with fresh names (the type renamer below behaves differently).
pub fn rename_dead_methods(module: &mut Module, live: &LiveSets, events: &mut EventLog) -> usize {
    let ids: Vec<TypeId> = module.types().collect();
    let mut counter = 0usize;

    for id in ids {
        // Eligibility is decided on the names as they stand when the type
        // is visited, before any of its methods are renamed.
        let count = module.type_def(id).methods.len();
        let mut eligible = Vec::new();
        for index in 0..count {
            let full_name = module.method_full_name(id, index);
            if live.method_is_live(&full_name) {
                continue;
            }
            let method = &module.type_def(id).methods[index];
            if method.is_constructor() || method.is_special_name() {
                continue;
            }
            eligible.push((index, full_name));
        }

        for (index, old_name) in eligible {
            let new_name = format!("Method_{counter}");
            counter += 1;
            module.type_def_mut(id).methods[index].name = new_name.clone();
            events
                .record(EventKind::MethodRenamed)
                .subject(old_name)
                .message(format!("renamed to {new_name}"));
        }
    }
    counter
}

/// Renames every dead type to `Type_{n}`, skipping types whose short name
/// already carries the template prefix (a second run leaves them alone).
/// Returns the number of types renamed.
///
/// Candidates are ordered by ascending full-name length, ties keeping
/// enumeration order — short (usually outer) names are renumbered first,
/// which keeps numbering stable across runs.
pub fn rename_dead_types(module: &mut Module, live: &LiveSets, events: &mut EventLog) -> usize {
    // Full names are captured up front: renaming an outer type changes the
    // rendered names of everything nested below it.
    let mut dead: Vec<(TypeId, String)> = module
        .types()
        .map(|id| (id, module.type_full_name(id)))
        .filter(|(_, full_name)| !live.type_is_live(full_name))
        .collect();
    dead.sort_by_key(|(_, full_name)| full_name.len());

    let mut counter = 0usize;
    for (id, old_name) in dead {
        if module.type_def(id).name.starts_with("Type_") {
            continue;
        }
        let new_name = format!("Type_{counter}");
        counter += 1;
        module.type_def_mut(id).name = new_name.clone();
        events
            .record(EventKind::TypeRenamed)
            .subject(old_name)
            .message(format!("renamed to {new_name}"));
    }
    counter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        MethodAttributes, MethodDef, TypeAttributes, TypeDef, TypeRef,
    };

    fn add_methods(module: &mut Module, id: TypeId, names: &[&str]) {
        for name in names {
            module
                .type_def_mut(id)
                .methods
                .push(MethodDef::new(*name, MethodAttributes::empty(), TypeRef::Void));
        }
    }

    fn live_with(module: &Module, id: TypeId, indices: &[usize]) -> LiveSets {
        let mut live = LiveSets::default();
        for &index in indices {
            live.methods.insert(module.method_full_name(id, index));
        }
        live
    }

    fn method_names(module: &Module, id: TypeId) -> Vec<String> {
        module
            .type_def(id)
            .methods
            .iter()
            .map(|m| m.name.clone())
            .collect()
    }

    #[test]
    fn stable_partition_live_first() {
        let mut module = Module::new("test");
        let id = module.add_type(TypeDef::new("Game", "T", TypeAttributes::empty()));
        add_methods(&mut module, id, &["d1", "L1", "d2", "L2", "d3"]);
        let live = live_with(&module, id, &[1, 3]);

        assert_eq!(reorder_methods(&mut module, &live), 1);
        assert_eq!(method_names(&module, id), vec!["L1", "L2", "d1", "d2", "d3"]);
    }

    #[test]
    fn uniform_types_left_alone() {
        let mut module = Module::new("test");
        let all_dead = module.add_type(TypeDef::new("Game", "A", TypeAttributes::empty()));
        add_methods(&mut module, all_dead, &["x", "y"]);
        let all_live = module.add_type(TypeDef::new("Game", "B", TypeAttributes::empty()));
        add_methods(&mut module, all_live, &["p", "q"]);
        let live = live_with(&module, all_live, &[0, 1]);

        assert_eq!(reorder_methods(&mut module, &live), 0);
        assert_eq!(method_names(&module, all_dead), vec!["x", "y"]);
        assert_eq!(method_names(&module, all_live), vec!["p", "q"]);
    }

    #[test]
    fn dead_methods_renamed_with_monotonic_counter() {
        let mut module = Module::new("test");
        let a = module.add_type(TypeDef::new("Game", "A", TypeAttributes::empty()));
        add_methods(&mut module, a, &["keep", "gone1"]);
        let b = module.add_type(TypeDef::new("Game", "B", TypeAttributes::empty()));
        add_methods(&mut module, b, &["gone2"]);
        let live = live_with(&module, a, &[0]);

        let mut events = EventLog::new();
        assert_eq!(rename_dead_methods(&mut module, &live, &mut events), 2);
        assert_eq!(method_names(&module, a), vec!["keep", "Method_0"]);
        assert_eq!(method_names(&module, b), vec!["Method_1"]);
        assert_eq!(events.count_kind(EventKind::MethodRenamed), 2);
    }

    #[test]
    fn constructors_and_special_names_kept() {
        let mut module = Module::new("test");
        let id = module.add_type(TypeDef::new("Game", "T", TypeAttributes::empty()));
        module.type_def_mut(id).methods.push(MethodDef::new(
            ".ctor",
            MethodAttributes::RT_SPECIAL_NAME,
            TypeRef::Void,
        ));
        module.type_def_mut(id).methods.push(MethodDef::new(
            "get_Value",
            MethodAttributes::SPECIAL_NAME,
            TypeRef::Primitive(crate::metadata::ElementKind::I4),
        ));
        add_methods(&mut module, id, &["plain"]);

        let mut events = EventLog::new();
        let live = LiveSets::default();
        assert_eq!(rename_dead_methods(&mut module, &live, &mut events), 1);
        assert_eq!(
            method_names(&module, id),
            vec![".ctor", "get_Value", "Method_0"]
        );
    }

    /// Re-running the method renamer renumbers; re-running the type
    /// renamer does not. Both behaviors are deliberate.
    #[test]
    fn rename_rerun_asymmetry() {
        let mut module = Module::new("test");
        let ty = module.add_type(TypeDef::new("Game", "Gone", TypeAttributes::empty()));
        add_methods(&mut module, ty, &["orphan"]);
        let live = LiveSets::default();
        let mut events = EventLog::new();

        rename_dead_methods(&mut module, &live, &mut events);
        rename_dead_types(&mut module, &live, &mut events);
        assert_eq!(method_names(&module, ty), vec!["Method_0"]);
        assert_eq!(module.type_def(ty).name, "Type_0");

        // Second run: the method is renamed again (no template guard), the
        // type is skipped by the Type_ prefix check.
        let renamed_again = rename_dead_methods(&mut module, &live, &mut events);
        let types_again = rename_dead_types(&mut module, &live, &mut events);
        assert_eq!(renamed_again, 1);
        assert_eq!(types_again, 0);
        assert_eq!(method_names(&module, ty), vec!["Method_0"]);
        assert_eq!(module.type_def(ty).name, "Type_0");
    }

    #[test]
    fn dead_types_numbered_by_name_length() {
        let mut module = Module::new("test");
        module.add_type(TypeDef::new("Game", "LongDeadName", TypeAttributes::empty()));
        module.add_type(TypeDef::new("Game", "Ab", TypeAttributes::empty()));
        module.add_type(TypeDef::new("Game", "Cd", TypeAttributes::empty()));
        module.add_type(TypeDef::new("Game", "Kept", TypeAttributes::PUBLIC));

        let mut live = LiveSets::default();
        live.types.insert("Game.Kept".into());

        let mut events = EventLog::new();
        assert_eq!(rename_dead_types(&mut module, &live, &mut events), 3);

        let names: Vec<String> = module
            .types()
            .map(|id| module.type_def(id).name.clone())
            .collect();
        // "Game.Ab" and "Game.Cd" tie on length and keep enumeration
        // order; the long name renames last.
        assert_eq!(names, vec!["Type_2", "Type_0", "Type_1", "Kept"]);
    }
}
