//! End-to-end declaration/initializer scenarios, driving the full pipeline
//! from source text through to the resulting symbol (and, for
//! initializers, the emitted bytes).

use c65_types::{StorageClass, TypeElem};
use c65_frontend::{DefaultParser, Options};
use pretty_assertions::assert_eq;

fn parse(src: &str) -> DefaultParser {
    let mut p = DefaultParser::new_default(src, Options::default());
    p.parse_top_level_decl(StorageClass::AUTO);
    p
}

#[test]
fn pointer_to_array_of_int() {
    let mut p = DefaultParser::new_default("int (*p)[4];", Options::default());
    let decl = p.parse_top_level_decl(StorageClass::AUTO);
    let elems: Vec<_> = decl.ty.elements().collect();
    assert_eq!(
        elems,
        vec![TypeElem::Ptr, TypeElem::Array(4), TypeElem::Int, TypeElem::End]
    );
    assert_eq!(decl.ty.size_of(&p.tags), Some(2));
    assert_eq!(decl.ident.as_deref(), Some("p"));
}

#[test]
fn function_returning_pointer_to_char_with_ellipsis() {
    let mut p = DefaultParser::new_default("char *f(int x, ...);", Options::default());
    let decl = p.parse_top_level_decl(StorageClass::EXTERN);
    assert!(decl.ty.is_func());
    let func_id = match decl.ty.elements().next().unwrap() {
        TypeElem::Func(id) => id,
        other => panic!("expected Func, got {other:?}"),
    };
    let desc = p.funcs.get(func_id);
    assert_eq!(desc.param_count, 1);
    assert!(desc.is_variadic());
    assert_eq!(desc.param_byte_size, 2);

    let x = desc.params.find_sym("x").expect("parameter x");
    assert_eq!(x.offset, 1);

    let tail: Vec<_> = decl.ty.tail().to_vec();
    let rest = c65_types::TypeBuf::from_terminated_bytes(tail);
    let rest_elems: Vec<_> = rest.elements().collect();
    assert_eq!(rest_elems, vec![TypeElem::Ptr, TypeElem::Char, TypeElem::End]);
}

#[test]
fn self_referential_struct() {
    let mut p = DefaultParser::new_default(
        "struct N { int v; struct N *next; };",
        Options::default(),
    );
    let spec = p.parse_decl_spec(Some(StorageClass::NONE));
    let id = match spec.base_type.elements().next().unwrap() {
        TypeElem::Struct(id) => id,
        other => panic!("expected Struct, got {other:?}"),
    };
    let tag = p.tags.get(id);
    assert_eq!(tag.size, Some(4));
    let fields = tag.fields.as_ref().unwrap();
    assert_eq!(fields.len(), 2);
    let v = fields.iter().find(|f| f.ident == "v").unwrap();
    assert_eq!(v.offset, 0);
    let next = fields.iter().find(|f| f.ident == "next").unwrap();
    assert_eq!(next.offset, 2);
    assert_eq!(next.ty.size_of(&p.tags), Some(2));
}

#[test]
fn array_initialized_by_string_literal() {
    let mut p = DefaultParser::new_default(r#"char s[] = "ab";"#, Options::default());
    let decl = p.parse_top_level_decl(StorageClass::AUTO);
    let elems: Vec<_> = decl.ty.elements().collect();
    assert_eq!(elems[0], TypeElem::Array(3));
    assert_eq!(p.emitter.bytes, vec![b'a', b'b', 0]);
}

#[test]
fn aggregate_initializer_with_elision() {
    let mut p = DefaultParser::new_default("int a[4] = {1, 2};", Options::default());
    p.parse_top_level_decl(StorageClass::AUTO);
    assert_eq!(
        p.emitter.bytes,
        vec![1, 0, 2, 0, 0, 0, 0, 0]
    );
}

#[test]
fn union_sizing() {
    let mut p = DefaultParser::new_default("union U { char c; long l; } u;", Options::default());
    let decl = p.parse_top_level_decl(StorageClass::AUTO);
    assert_eq!(decl.ty.size_of(&p.tags), Some(4));
    let id = match decl.ty.elements().next().unwrap() {
        TypeElem::Union(id) => id,
        other => panic!("expected Union, got {other:?}"),
    };
    let tag = p.tags.get(id);
    let fields = tag.fields.as_ref().unwrap();
    let c = fields.iter().find(|f| f.ident == "c").unwrap();
    let l = fields.iter().find(|f| f.ident == "l").unwrap();
    assert_eq!(c.offset, 0);
    assert_eq!(l.offset, 0);
}

#[test]
fn typedef_exact_type_copy() {
    let mut p = DefaultParser::new_default("typedef long T;", Options::default());
    p.parse_top_level_decl(StorageClass::NONE);
    let mut p2 = DefaultParser::new_default("T y;", Options::default());
    p2.syms = p.syms;
    let decl = p2.parse_top_level_decl(StorageClass::AUTO);
    assert_eq!(decl.ty, c65_types::TypeBuf::long());
}

#[test]
fn empty_enum_body_is_accepted() {
    let mut p = DefaultParser::new_default("enum {} e;", Options::default());
    let decl = p.parse_top_level_decl(StorageClass::AUTO);
    assert_eq!(decl.ty, c65_types::TypeBuf::int());
}

#[test]
fn object_size_boundary() {
    let mut ok = DefaultParser::new_default("char big[65535];", Options::default());
    ok.parse_top_level_decl(StorageClass::AUTO);
    assert!(!ok.diags.has_errors());

    let mut over = DefaultParser::new_default("char toobig[65536];", Options::default());
    over.parse_top_level_decl(StorageClass::AUTO);
    assert!(over.diags.has_errors());
}

#[test]
fn unnamed_prototype_param_is_fine_in_non_strict_mode() {
    let mut p = parse("int f(int, char);");
    assert!(!p.diags.has_errors());
    let _ = &mut p;
}

#[test]
fn unnamed_param_errors_in_strict_mode_only_with_body() {
    let strict = Options { ansi: true, ..Options::default() };

    let mut proto = DefaultParser::new_default("int f(int);", strict);
    proto.parse_top_level_decl(StorageClass::EXTERN);
    assert!(!proto.diags.has_errors());

    let mut with_body = DefaultParser::new_default("int f(int) {", strict);
    with_body.parse_top_level_decl(StorageClass::EXTERN);
    assert!(with_body.diags.has_errors());
}

#[test]
fn struct_initializer_elides_trailing_fields() {
    let mut p = DefaultParser::new_default(
        "struct P { char a; int b; int c; } pt = { 1, 2 };",
        Options::default(),
    );
    p.parse_top_level_decl(StorageClass::AUTO);
    assert!(!p.diags.has_errors());
    // a: 1 byte, b: 2 bytes, c: zero-filled (2 bytes).
    assert_eq!(p.emitter.bytes, vec![1, 2, 0, 0, 0]);
}

#[test]
fn struct_initializer_of_incomplete_type_errors() {
    let mut p = DefaultParser::new_default(
        "struct Q *qp; struct Q q = { 1 };",
        Options::default(),
    );
    p.parse_top_level_decl(StorageClass::EXTERN);
    p.parse_top_level_decl(StorageClass::AUTO);
    assert!(p.diags.has_errors());
}

#[test]
fn array_over_initialization_errors() {
    let mut p = DefaultParser::new_default("int a[2] = {1, 2, 3};", Options::default());
    p.parse_top_level_decl(StorageClass::AUTO);
    assert!(p.diags.has_errors());
}

#[test]
fn void_initializer_extension_allowed_in_non_strict_mode() {
    let mut p = DefaultParser::new_default("void raw = { 1, 2, 3 };", Options::default());
    p.parse_top_level_decl(StorageClass::AUTO);
    assert!(!p.diags.has_errors());
}

#[test]
fn fastcall_sets_flag_on_the_head_function() {
    let mut p = DefaultParser::new_default("int fastcall g(int x);", Options::default());
    let decl = p.parse_top_level_decl(StorageClass::EXTERN);
    let func_id = match decl.ty.elements().next().unwrap() {
        TypeElem::Func(id) => id,
        other => panic!("expected Func, got {other:?}"),
    };
    assert!(p.funcs.get(func_id).flags.contains(c65_types::FuncFlags::FASTCALL));
    assert!(!p.diags.has_errors());
}

#[test]
fn multi_param_offsets_are_deterministic_and_in_declaration_order() {
    for _ in 0..20 {
        let mut p = DefaultParser::new_default(
            "void g(char a, int b, long c, char d);",
            Options::default(),
        );
        let decl = p.parse_top_level_decl(StorageClass::EXTERN);
        let func_id = match decl.ty.elements().next().unwrap() {
            TypeElem::Func(id) => id,
            other => panic!("expected Func, got {other:?}"),
        };
        let desc = p.funcs.get(func_id);
        let names: Vec<&str> = desc
            .params
            .current_level_symbols()
            .iter()
            .map(|s| s.ident.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);

        let a = desc.params.find_sym("a").unwrap();
        let b = desc.params.find_sym("b").unwrap();
        let c = desc.params.find_sym("c").unwrap();
        let d = desc.params.find_sym("d").unwrap();
        // Last-declared parameter (`d`) gets the lowest offset.
        assert_eq!(d.offset, 0);
        assert_eq!(c.offset, 1);
        assert_eq!(b.offset, 5);
        assert_eq!(a.offset, 7);
    }
}

#[test]
fn union_initializer_targets_first_field_by_declaration_order() {
    for _ in 0..20 {
        let mut p = DefaultParser::new_default(
            "union U { char c; long l; } u = { 5 };",
            Options::default(),
        );
        p.parse_top_level_decl(StorageClass::AUTO);
        assert!(!p.diags.has_errors());
        // The first-declared field (`c`, 1 byte) takes the initializer;
        // each remaining field (here just `l`, 4 bytes) is zero-filled by
        // its own width, matching the original's per-field zero-fill loop
        // (declare.c's `ParseStructInit` tail loop applies to union tags
        // too, so this can over-run the union's own storage size).
        assert_eq!(p.emitter.bytes, vec![5, 0, 0, 0, 0]);
    }
}
