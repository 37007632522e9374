//! End-to-end pipeline runs against a synthetic obfuscated assembly.
//!
//! The fixture mirrors what the obfuscator actually emits: an internal
//! helper type with the public static XOR decryptor, an explicit-layout
//! blob carrier, a traced entry point whose body carries the full
//! encrypted-string idiom, live code reached through calls and field
//! types, and dead code that must be blanked, reordered, and renamed.

use rustc_hash::FxHashSet;

use trimscope::prelude::*;

const HELPER_FULL_NAME: &str =
    "System.String Obfu.Helpers::Decrypt(System.Byte[],System.Byte[])";
const INITIALIZE_ARRAY: &str =
    "System.Void System.Runtime.CompilerServices.RuntimeHelpers::InitializeArray(System.Array,System.RuntimeFieldHandle)";

const KEY: [u8; 3] = [0x10, 0x20, 0x30];
const PLAINTEXT: &str = "Hello!";

fn encrypt(plain: &str) -> Vec<u8> {
    plain
        .bytes()
        .enumerate()
        .map(|(i, b)| b ^ KEY[i % KEY.len()])
        .collect()
}

fn array_init_instructions(field: &str) -> Vec<Instruction> {
    vec![
        Instruction::new(
            OpCode::LdcI4S,
            Operand::Immediate(Immediate::Int8(3)),
        ),
        Instruction::new(
            OpCode::Newarr,
            Operand::Type(TypeRef::Primitive(ElementKind::U1)),
        ),
        Instruction::simple(OpCode::Dup),
        Instruction::new(
            OpCode::Ldtoken,
            Operand::Field(FieldRef::new(field, "Obfu.Blobs", TypeRef::byte_array())),
        ),
        Instruction::call(MethodRef::new("InitializeArray", INITIALIZE_ARRAY)),
    ]
}

/// Builds the obfuscated fixture module. Deterministic: two calls yield
/// byte-identical object graphs.
fn build_fixture() -> (Module, String) {
    let mut module = Module::new("Game.dll");

    // Internal helper type; the decryptor method itself is public static.
    let helpers = module.add_type(TypeDef::new(
        "Obfu",
        "Helpers",
        TypeAttributes::SEALED,
    ));
    let mut decrypt = MethodDef::new(
        "Decrypt",
        MethodAttributes::PUBLIC | MethodAttributes::STATIC,
        TypeRef::String,
    );
    decrypt.params.push(Parameter::new(TypeRef::byte_array()));
    decrypt.params.push(Parameter::new(TypeRef::byte_array()));
    decrypt.body = Some(MethodBody::with_instructions(vec![
        Instruction::simple(OpCode::Ldarg0),
        Instruction::simple(OpCode::Ldarg1),
        Instruction::simple(OpCode::Xor),
        Instruction::simple(OpCode::Pop),
        Instruction::simple(OpCode::Ldnull),
        Instruction::simple(OpCode::Ret),
    ]));
    module.type_def_mut(helpers).methods.push(decrypt);

    // Blob carrier with the key and data field initializers.
    let blobs = module.add_type(TypeDef::new(
        "Obfu",
        "Blobs",
        TypeAttributes::EXPLICIT_LAYOUT,
    ));
    module.type_def_mut(blobs).fields.push(FieldDef::with_initial_value(
        "key0",
        TypeRef::byte_array(),
        KEY.to_vec(),
    ));
    module.type_def_mut(blobs).fields.push(FieldDef::with_initial_value(
        "data0",
        TypeRef::byte_array(),
        encrypt(PLAINTEXT),
    ));

    // Live code reached through the call graph and a field type.
    let state = module.add_type(TypeDef::new("Game", "State", TypeAttributes::empty()));
    module
        .type_def_mut(state)
        .fields
        .push(FieldDef::new("ticks", TypeRef::Primitive(ElementKind::I8)));

    let logic = module.add_type(TypeDef::new("Game", "Logic", TypeAttributes::empty()));
    // Dead before live: reorder must flip these.
    let mut unused = MethodDef::new(
        "Unused",
        MethodAttributes::empty(),
        TypeRef::Primitive(ElementKind::I4),
    );
    unused.body = Some(MethodBody::with_instructions(vec![
        Instruction::new(OpCode::LdcI4, Operand::Immediate(Immediate::Int32(1234))),
        Instruction::simple(OpCode::Ret),
    ]));
    module.type_def_mut(logic).methods.push(unused);
    let mut helper = MethodDef::new("Helper", MethodAttributes::empty(), TypeRef::Void);
    helper.body = Some(MethodBody::with_instructions(vec![
        Instruction::new(
            OpCode::Ldsfld,
            Operand::Field(FieldRef::new("shared", "Game.Logic", TypeRef::named("Game.State"))),
        ),
        Instruction::simple(OpCode::Pop),
        Instruction::simple(OpCode::Ret),
    ]));
    module.type_def_mut(logic).methods.push(helper);
    let helper_full_name = module.method_full_name(logic, 1);

    // The traced entry point with the encrypted-string construction.
    let boot = module.add_type(TypeDef::new("Game", "Boot", TypeAttributes::PUBLIC));
    let mut main = MethodDef::new(
        "Main",
        MethodAttributes::PUBLIC | MethodAttributes::STATIC,
        TypeRef::Void,
    );
    let mut instructions = array_init_instructions("key0");
    instructions.extend(array_init_instructions("data0"));
    instructions.push(Instruction::call(MethodRef::new("Decrypt", HELPER_FULL_NAME)));
    instructions.push(Instruction::simple(OpCode::Pop));
    instructions.push(Instruction::call(MethodRef::new("Helper", helper_full_name)));
    instructions.push(Instruction::simple(OpCode::Ret));
    main.body = Some(MethodBody::with_instructions(instructions));
    module.type_def_mut(boot).methods.push(main);
    let main_full_name = module.method_full_name(boot, 0);

    // Always-live floor members.
    module.add_type(TypeDef::with_base(
        "Game",
        "Season",
        TypeAttributes::SEALED,
        TypeRef::named("System.Enum"),
    ));
    module.add_type(TypeDef::with_base(
        "Game",
        "PlayerBehaviour",
        TypeAttributes::empty(),
        TypeRef::named("UnityEngine.Object"),
    ));

    // Purely dead code.
    let dead = module.add_type(TypeDef::new("Game", "Leftover", TypeAttributes::empty()));
    let mut dead_method = MethodDef::new("Orphan", MethodAttributes::empty(), TypeRef::String);
    dead_method.body = Some(MethodBody::with_instructions(vec![
        Instruction::ldstr("never seen"),
        Instruction::simple(OpCode::Ret),
    ]));
    module.type_def_mut(dead).methods.push(dead_method);

    (module, main_full_name)
}

fn roots_of(name: &str) -> FxHashSet<String> {
    std::iter::once(name.to_string()).collect()
}

fn find_type<'m>(module: &'m Module, short_name: &str) -> &'m TypeDef {
    for id in module.types() {
        if module.type_def(id).name == short_name {
            return module.type_def(id);
        }
    }
    panic!("type {short_name} not found");
}

#[test]
fn full_pipeline_run() {
    let (mut module, main) = build_fixture();
    let result = clean(&mut module, &roots_of(&main));

    assert_eq!(result.summary.strings_decrypted, 1);
    assert!(result.live.method_is_live(&main));
    assert!(result.live.method_is_live("System.Void Game.Logic::Helper()"));
    // The folded helper lost its only call before analysis ran.
    assert!(!result.live.method_is_live(HELPER_FULL_NAME));

    for ty in ["Game.Boot", "Game.Logic", "Game.State", "Game.Season", "Game.PlayerBehaviour"] {
        assert!(result.live.type_is_live(ty), "{ty} should be live");
    }
    assert!(!result.live.type_is_live("Obfu.Helpers"));
    assert!(!result.live.type_is_live("Game.Leftover"));

    // Main's body: the whole idiom collapsed to one ldstr.
    let boot = find_type(&module, "Boot");
    let main_body = boot.methods[0].body.as_ref().unwrap();
    assert_eq!(main_body.instructions[0], Instruction::ldstr(PLAINTEXT));
    assert_eq!(main_body.instructions.len(), 4); // ldstr, pop, call, ret

    // Dead int-returning method blanked to [ldc.i4.0, ret] and pushed
    // behind the live method by the reorder.
    let logic = find_type(&module, "Logic");
    assert_eq!(logic.methods[0].name, "Helper");
    assert!(logic.methods[1].name.starts_with("Method_"));
    let blanked = logic.methods[1].body.as_ref().unwrap();
    let shapes: Vec<OpCode> = blanked.instructions.iter().map(|i| i.opcode).collect();
    assert_eq!(shapes, vec![OpCode::LdcI40, OpCode::Ret]);
    assert!(blanked.exception_handlers.is_empty());
    assert!(blanked.locals.is_empty());

    // Dead string-returning method blanked to [ldnull, ret]. Leftover has
    // the longest dead full name, so it renames last: Type_2.
    let leftover = find_type(&module, "Type_2");
    let orphan_body = leftover.methods[0].body.as_ref().unwrap();
    let orphan_shapes: Vec<OpCode> = orphan_body.instructions.iter().map(|i| i.opcode).collect();
    assert_eq!(orphan_shapes, vec![OpCode::Ldnull, OpCode::Ret]);
    assert!(leftover.methods[0].name.starts_with("Method_"));

    let dead_types: Vec<&TypeDef> = module
        .types()
        .map(|id| module.type_def(id))
        .filter(|t| t.name.starts_with("Type_"))
        .collect();
    assert_eq!(dead_types.len(), result.summary.types_renamed);
    // Obfu.Helpers, Obfu.Blobs, Game.Leftover
    assert_eq!(result.summary.types_renamed, 3);
    assert_eq!(result.summary.methods_renamed, 3);
    assert_eq!(result.summary.bodies_invalidated, 3);

    // Live types kept their names.
    assert!(module.find_type("Game.Boot").is_some());
    assert!(module.find_type("Game.Season").is_some());

    assert_eq!(
        result.summary.bodies_invalidated,
        result.events.count_kind(EventKind::BodyInvalidated)
    );
}

/// Live-set closure: every method operand of a live method's body is live,
/// every type operand (and field-ref field type) is live, and every shape
/// dependency of a live type is live. Checked on a fresh fixture before
/// any rename so the keys still match.
#[test]
fn live_set_closure() {
    let (module, main) = build_fixture();
    let live = identify_live_code(&module, &roots_of(&main));

    for id in module.types() {
        let type_name = module.type_full_name(id);
        for index in 0..module.type_def(id).methods.len() {
            let full_name = module.method_full_name(id, index);
            if !live.method_is_live(&full_name) {
                continue;
            }
            assert!(live.type_is_live(&type_name), "declaring type of {full_name}");
            let method = &module.type_def(id).methods[index];
            let Some(body) = &method.body else { continue };
            for instruction in &body.instructions {
                match &instruction.operand {
                    Operand::Method(target) => {
                        assert!(
                            live.method_is_live(&target.full_name),
                            "callee {} of {full_name}",
                            target.full_name
                        );
                    }
                    Operand::Type(type_ref) if !type_ref.is_generic_param() => {
                        assert!(live.type_is_live(&type_ref.full_name()));
                    }
                    Operand::Field(field_ref) => {
                        assert!(live.type_is_live(&field_ref.field_type.full_name()));
                    }
                    _ => {}
                }
            }
        }

        if live.type_is_live(&type_name) {
            let ty = module.type_def(id);
            if let Some(base) = &ty.base {
                assert!(live.type_is_live(&base.full_name()), "base of {type_name}");
            }
            for field in &ty.fields {
                assert!(live.type_is_live(&field.field_type.full_name()));
            }
            for interface in &ty.interfaces {
                assert!(live.type_is_live(&interface.full_name()));
            }
        }
    }
}

/// Folding, invalidation, reorder, and rename are deterministic functions
/// of (assembly, trace): two runs over identical inputs agree exactly.
#[test]
fn pipeline_is_deterministic() {
    let (mut first, main_a) = build_fixture();
    let (mut second, main_b) = build_fixture();
    assert_eq!(main_a, main_b);

    let result_a = clean(&mut first, &roots_of(&main_a));
    let result_b = clean(&mut second, &roots_of(&main_b));

    assert_eq!(result_a.summary, result_b.summary);

    let names = |module: &Module| -> Vec<(String, Vec<String>)> {
        module
            .types()
            .map(|id| {
                (
                    module.type_full_name(id),
                    module
                        .type_def(id)
                        .methods
                        .iter()
                        .map(|m| m.name.clone())
                        .collect(),
                )
            })
            .collect()
    };
    assert_eq!(names(&first), names(&second));
}

/// The trace loader and the pipeline compose: roots loaded from a file on
/// disk drive the same analysis.
#[test]
fn roots_from_log_file() {
    use std::io::Write;

    let (mut module, main) = build_fixture();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{main}").unwrap();
    writeln!(file, "{main}").unwrap(); // duplicates collapse
    writeln!(file, "System.Void Stale.Type::Gone()").unwrap(); // stale line
    file.flush().unwrap();

    let roots = load_roots(file.path()).unwrap();
    let result = clean(&mut module, &roots);
    assert!(result.live.method_is_live(&main));
    assert!(!result.live.method_is_live("System.Void Stale.Type::Gone()"));
    assert_eq!(result.summary.strings_decrypted, 1);
}
