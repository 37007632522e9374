//! Folding of the obfuscator's inlined XOR string decryption.
//!
//! The obfuscator replaces every string literal with a call to a public
//! decryption helper, preceded by the construction of two byte arrays (key
//! and data) from static field initializer blobs:
//!
//! ```text
//! ldc.i4.s 13            ┐
//! newarr   System.Byte   │ key array
//! dup                    │
//! ldtoken  <blob field>  │
//! call     InitializeArray ┘
//! ldc.i4.s 13            ┐
//! newarr   System.Byte   │ data array
//! dup                    │
//! ldtoken  <blob field>  │
//! call     InitializeArray ┘
//! call     Helpers::Decrypt(byte[], byte[])
//! ```
//!
//! The folder finds the helpers by signature, walks backwards from each
//! call site matching the five-instruction setup idiom per array, XORs the
//! blobs, and rewrites the call into a single `ldstr` of the plaintext,
//! deleting the ten setup instructions. A malformed site is skipped and
//! logged; nothing in this pass can fail the run.

use rustc_hash::FxHashSet;

use crate::assembly::{Instruction, OpCode};
use crate::deobfuscation::{EventKind, EventLog};
use crate::metadata::{MethodBody, MethodDef, Module, TypeId};

/// Code point the obfuscator appends to pad plaintexts; everything from
/// the first occurrence on is garbage and is cut.
pub const PLAINTEXT_TERMINATOR: char = '\u{E44F}';

/// Short name of the BCL routine that copies a blob into a fresh array.
const ARRAY_INITIALIZER: &str = "InitializeArray";

/// A recorded decryption call site, addressed by indices so later
/// mutations cannot dangle.
struct CallSite {
    type_id: TypeId,
    method_index: usize,
    instr_index: usize,
}

/// The two recovered arrays plus the span of setup instructions to excise.
/// `instructions[first_index..call_index]` are the ten setup instructions.
struct SetupIdiom {
    key: Vec<u8>,
    data: Vec<u8>,
    first_index: usize,
}

/// Finds every call to an XOR string-decryption helper and folds it into a
/// literal string load. Returns the number of call sites patched.
///
/// Call sites are collected in module walk order and processed in reverse,
/// so instruction removals in one body never perturb the indices of sites
/// still to be processed. Per-site failures (unrecognized idiom, missing
/// initializer blob) are logged as warnings and skipped.
pub fn fold_strings(module: &mut Module, events: &mut EventLog) -> usize {
    let helpers = discover_helpers(module, events);
    if helpers.is_empty() {
        return 0;
    }

    let sites = collect_call_sites(module, &helpers);
    let mut patched = 0;
    for site in sites.iter().rev() {
        if patch_decryption_call(module, site, events) {
            patched += 1;
        }
    }
    patched
}

/// Scans the module's top-level types for decryption-helper candidates.
///
/// A helper is a static public method returning `System.String`, taking
/// exactly two `System.Byte[]` parameters, with a body containing at least
/// one `xor`. Nested types are deliberately not scanned — the obfuscator
/// only ever plants helpers at the top level.
fn discover_helpers(module: &Module, events: &mut EventLog) -> FxHashSet<String> {
    let mut helpers = FxHashSet::default();
    for &type_id in module.top_level_types() {
        for index in 0..module.type_def(type_id).methods.len() {
            let method = &module.type_def(type_id).methods[index];
            if is_helper_candidate(method) {
                let full_name = module.method_full_name(type_id, index);
                if helpers.insert(full_name.clone()) {
                    events
                        .record(EventKind::DecryptorIdentified)
                        .subject(full_name);
                }
            }
        }
    }
    helpers
}

fn is_helper_candidate(method: &MethodDef) -> bool {
    method.is_static()
        && method.is_public()
        && method.return_type.full_name() == "System.String"
        && method.params.len() == 2
        && method
            .params
            .iter()
            .all(|p| p.param_type.full_name() == "System.Byte[]")
        && method
            .body
            .as_ref()
            .is_some_and(|b| b.instructions.iter().any(|i| i.opcode == OpCode::Xor))
}

/// Collects every `call` whose target is a known helper, across all types
/// including nested ones, in walk order.
fn collect_call_sites(module: &Module, helpers: &FxHashSet<String>) -> Vec<CallSite> {
    let mut sites = Vec::new();
    for type_id in module.types() {
        for (method_index, method) in module.type_def(type_id).methods.iter().enumerate() {
            let Some(body) = &method.body else { continue };
            for (instr_index, instruction) in body.instructions.iter().enumerate() {
                if instruction.opcode != OpCode::Call {
                    continue;
                }
                let Some(target) = instruction.method_operand() else {
                    continue;
                };
                if helpers.contains(&target.full_name) {
                    sites.push(CallSite {
                        type_id,
                        method_index,
                        instr_index,
                    });
                }
            }
        }
    }
    sites
}

/// Attempts to fold one call site. Returns true if the site was patched.
fn patch_decryption_call(module: &mut Module, site: &CallSite, events: &mut EventLog) -> bool {
    let method_name = module.method_full_name(site.type_id, site.method_index);

    let Some(body) = module.type_def(site.type_id).methods[site.method_index]
        .body
        .as_ref()
    else {
        return false;
    };
    let Some(idiom) = extract_arrays(module, body, site.instr_index) else {
        events
            .record(EventKind::Warning)
            .subject(method_name)
            .message("decryption call without recognizable setup idiom, left unpatched");
        return false;
    };

    let Some(plaintext) = decrypt(&idiom.key, &idiom.data) else {
        events
            .record(EventKind::Warning)
            .subject(method_name)
            .message("decryption call with empty key array, left unpatched");
        return false;
    };

    let Some(body) = module.type_def_mut(site.type_id).methods[site.method_index]
        .body
        .as_mut()
    else {
        return false;
    };
    body.instructions[site.instr_index] = Instruction::ldstr(plaintext.clone());
    // Highest index first so the remaining indices stay valid; the bounds
    // check stands in for the membership test of a node-based list.
    for index in (idiom.first_index..site.instr_index).rev() {
        if index < body.instructions.len() {
            body.instructions.remove(index);
        }
    }

    events
        .record(EventKind::StringDecrypted)
        .subject(method_name)
        .message(format!("decrypted: {plaintext:?}"));
    true
}

/// Extracts both byte arrays by walking backwards from the helper call.
///
/// The instruction immediately before the call must be the data array's
/// `InitializeArray` call; the key array, pushed first, lies immediately
/// before the data array's five instructions. Any mismatch aborts the
/// extraction.
fn extract_arrays(module: &Module, body: &MethodBody, call_index: usize) -> Option<SetupIdiom> {
    if call_index < 2 {
        return None;
    }
    let (data, data_first) = match_array_init(module, body, call_index - 1)?;
    let (key, key_first) = match_array_init(module, body, data_first.checked_sub(1)?)?;
    Some(SetupIdiom {
        key,
        data,
        first_index: key_first,
    })
}

/// Matches one five-instruction array construction ending at `end`:
/// `ldc.i4* / newarr / dup / ldtoken <field> / call InitializeArray`.
///
/// Returns the field's initializer blob and the index of the first matched
/// instruction. The `newarr` element type and the pushed length are not
/// validated — the blob is the source of truth for the array contents.
fn match_array_init(
    module: &Module,
    body: &MethodBody,
    end: usize,
) -> Option<(Vec<u8>, usize)> {
    let first = end.checked_sub(4)?;
    let instructions = &body.instructions;

    let init_call = &instructions[end];
    if init_call.opcode != OpCode::Call || init_call.method_operand()?.name != ARRAY_INITIALIZER {
        return None;
    }

    let token_load = &instructions[end - 1];
    if token_load.opcode != OpCode::Ldtoken {
        return None;
    }
    let blob = token_load
        .field_operand()?
        .resolve(module)?
        .initial_value
        .as_ref()?
        .clone();

    if instructions[end - 2].opcode != OpCode::Dup {
        return None;
    }
    if instructions[end - 3].opcode != OpCode::Newarr {
        return None;
    }
    if !instructions[first].opcode.is_ldc_i4() {
        return None;
    }

    Some((blob, first))
}

/// XORs the data bytes against the cycled key, decodes as UTF-8, and cuts
/// at the first terminator code point.
fn decrypt(key: &[u8], data: &[u8]) -> Option<String> {
    if key.is_empty() {
        return None;
    }
    let bytes: Vec<u8> = data
        .iter()
        .enumerate()
        .map(|(i, b)| b ^ key[i % key.len()])
        .collect();
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if let Some(position) = text.find(PLAINTEXT_TERMINATOR) {
        text.truncate(position);
    }
    Some(text)
}
