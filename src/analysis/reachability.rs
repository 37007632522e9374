//! Liveness analysis: which methods and types are reachable.
//!
//! Reachability is computed from two kinds of roots:
//!
//! - **Trace roots** — methods observed executing at runtime, loaded from
//!   the execution log.
//! - **The always-live floor** — every public non-compiler-generated type,
//!   every enum, and every type transitively inheriting from the reflected
//!   root base (`UnityEngine.Object` — the engine instantiates these
//!   reflectively, so they are presumed reachable even when no call was
//!   traced).
//!
//! From those roots a two-queue worklist closes over the metadata graph:
//! expanding a method marks its declaring type, signature types, and every
//! method/type/field reference in its body; expanding a type marks its
//! base, interfaces, member types, attribute types, and generic
//! constraints. Identities are textual full names captured before any
//! rename; resolution failures (references into other modules) are
//! silently skipped. The analysis is monotone — live sets only grow, each
//! name is enqueued at most once, and no input can make it fail.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::assembly::Operand;
use crate::metadata::{Module, TypeDef, TypeId, TypeRef};

/// Base type whose descendants are presumed reachable via runtime
/// reflection even if no call is recorded in the trace.
pub const REFLECTED_ROOT_BASE: &str = "UnityEngine.Object";

/// Attribute marking compiler-generated types.
pub const COMPILER_GENERATED_ATTRIBUTE: &str =
    "System.Runtime.CompilerServices.CompilerGeneratedAttribute";

/// The output of reachability analysis: live method and type full names.
#[derive(Debug, Clone, Default)]
pub struct LiveSets {
    /// Full names of live methods.
    pub methods: FxHashSet<String>,
    /// Full names of live types.
    pub types: FxHashSet<String>,
}

impl LiveSets {
    /// True if the method full name is in the live set.
    #[must_use]
    pub fn method_is_live(&self, full_name: &str) -> bool {
        self.methods.contains(full_name)
    }

    /// True if the type full name is in the live set.
    #[must_use]
    pub fn type_is_live(&self, full_name: &str) -> bool {
        self.types.contains(full_name)
    }
}

/// Computes `(live-methods, live-types)` for `module` from the given trace
/// roots.
///
/// Roots that match no method in the module (stale log lines, empty lines)
/// are ignored. The analysis never fails; see the module docs for the
/// closure rules.
#[must_use]
pub fn identify_live_code(module: &Module, roots: &FxHashSet<String>) -> LiveSets {
    let mut analyzer = Analyzer::new(module);
    analyzer.seed_roots(roots);
    analyzer.seed_always_live();
    analyzer.run();
    analyzer.live
}

struct Analyzer<'m> {
    module: &'m Module,
    /// Method full name → (declaring type, index in its method list).
    /// First definition wins on duplicate keys.
    method_table: FxHashMap<String, (TypeId, usize)>,
    /// Type full name → handle. First definition wins on duplicate keys.
    type_table: FxHashMap<String, TypeId>,
    live: LiveSets,
    method_queue: VecDeque<String>,
    type_queue: VecDeque<String>,
}

impl<'m> Analyzer<'m> {
    fn new(module: &'m Module) -> Self {
        let mut method_table = FxHashMap::default();
        let mut type_table = FxHashMap::default();

        for id in module.types() {
            type_table
                .entry(module.type_full_name(id))
                .or_insert(id);
            for index in 0..module.type_def(id).methods.len() {
                method_table
                    .entry(module.method_full_name(id, index))
                    .or_insert((id, index));
            }
        }

        Self {
            module,
            method_table,
            type_table,
            live: LiveSets::default(),
            method_queue: VecDeque::new(),
            type_queue: VecDeque::new(),
        }
    }

    /// Seeds live methods from trace roots that exist in the method table.
    fn seed_roots(&mut self, roots: &FxHashSet<String>) {
        for root in roots {
            if self.method_table.contains_key(root) {
                self.enqueue_method(root);
            }
        }
    }

    /// Seeds the always-live type floor.
    fn seed_always_live(&mut self) {
        let module = self.module;
        for id in module.types() {
            let ty = module.type_def(id);
            let always_live = (ty.is_public() && !is_compiler_generated(ty))
                || ty.is_enum()
                || self.inherits_reflected_root(ty);
            if always_live {
                self.enqueue_type_name(module.type_full_name(id));
            }
        }
    }

    /// Walks the base-type chain looking for the reflected root.
    ///
    /// The root itself lives in another module, so the comparison happens
    /// on the reference's full name before resolution is attempted; an
    /// unresolvable intermediate base ends the walk as a negative answer.
    fn inherits_reflected_root(&self, ty: &TypeDef) -> bool {
        let mut current = ty.base.clone();
        while let Some(base) = current {
            if base.full_name() == REFLECTED_ROOT_BASE {
                return true;
            }
            match base.resolve(self.module) {
                Some(id) => current = self.module.type_def(id).base.clone(),
                None => return false,
            }
        }
        false
    }

    /// Fixed point: alternately drain both worklists until empty.
    ///
    /// Terminates because each full name is enqueued at most once.
    fn run(&mut self) {
        while !self.method_queue.is_empty() || !self.type_queue.is_empty() {
            while let Some(name) = self.method_queue.pop_front() {
                self.expand_method(&name);
            }
            while let Some(name) = self.type_queue.pop_front() {
                self.expand_type(&name);
            }
        }
    }

    /// Marks everything a live method touches.
    fn expand_method(&mut self, full_name: &str) {
        let module = self.module;
        let Some(&(type_id, index)) = self.method_table.get(full_name) else {
            return;
        };

        self.enqueue_type_name(module.type_full_name(type_id));

        let method = &module.type_def(type_id).methods[index];
        self.mark_type(&method.return_type);
        for param in &method.params {
            self.mark_type(&param.param_type);
        }
        for generic in &method.generic_params {
            for constraint in &generic.constraints {
                self.mark_type(constraint);
            }
        }

        let Some(body) = &method.body else { return };
        for instruction in &body.instructions {
            match &instruction.operand {
                Operand::Method(target) => self.enqueue_method(&target.full_name),
                Operand::Type(type_ref) => self.mark_type(type_ref),
                // The field itself is not tracked; its type is.
                Operand::Field(field_ref) => self.mark_type(&field_ref.field_type),
                _ => {}
            }
        }
    }

    /// Marks everything a live type's shape depends on.
    fn expand_type(&mut self, full_name: &str) {
        let module = self.module;
        let Some(&type_id) = self.type_table.get(full_name) else {
            return;
        };
        let ty = module.type_def(type_id);

        if let Some(base) = &ty.base {
            self.mark_type(base);
        }
        for interface in &ty.interfaces {
            self.mark_type(interface);
        }
        for field in &ty.fields {
            self.mark_type(&field.field_type);
        }
        for property in &ty.properties {
            self.mark_type(&property.property_type);
        }
        for event in &ty.events {
            self.mark_type(&event.event_type);
        }
        for attribute in &ty.custom_attributes {
            self.mark_type(attribute);
        }
        for generic in &ty.generic_params {
            for constraint in &generic.constraints {
                self.mark_type(constraint);
            }
        }
    }

    /// Transitively marks a type reference live.
    ///
    /// Generic parameters are not types and are skipped. A generic instance
    /// is decomposed: `Container<Foo, Bar>` marks `Container`, `Foo`, and
    /// `Bar` — the constructed components are the live keys, never the
    /// opaque instance.
    fn mark_type(&mut self, type_ref: &TypeRef) {
        match type_ref {
            TypeRef::GenericParam(_) => {}
            TypeRef::GenericInstance { element, args } => {
                self.mark_type(element);
                for arg in args {
                    self.mark_type(arg);
                }
            }
            _ => self.enqueue_type_name(type_ref.full_name()),
        }
    }

    fn enqueue_type_name(&mut self, full_name: String) {
        if !self.live.types.contains(&full_name) {
            self.live.types.insert(full_name.clone());
            self.type_queue.push_back(full_name);
        }
    }

    fn enqueue_method(&mut self, full_name: &str) {
        if !self.live.methods.contains(full_name) {
            self.live.methods.insert(full_name.to_string());
            self.method_queue.push_back(full_name.to_string());
        }
    }
}

/// Compiler-generated detection: angle brackets in the short name, or the
/// `CompilerGeneratedAttribute` on the definition.
///
/// The name heuristic is coarse but matches what this obfuscator leaves
/// behind; the attribute test catches generator output whose names were
/// rewritten.
fn is_compiler_generated(ty: &TypeDef) -> bool {
    ty.name.contains(['<', '>'])
        || ty
            .custom_attributes
            .iter()
            .any(|a| a.full_name() == COMPILER_GENERATED_ATTRIBUTE)
}
