use oscc::{AstNode, Error, NodeKind};

fn parse(code: &str) -> Result<AstNode, Error> {
    let tokens = oscc::tokenize("test.osc", code)?;
    oscc::parse(tokens)
}

fn assert(code: &str) {
    for (line_idx, line) in code.lines().enumerate() {
        println!("{:>2}: {}", line_idx, line);
    }
    match parse(code) {
        Ok(ast) => println!("{}", ast),
        Err(err) => panic!("Error found: {}", err),
    }
}

fn assert_err(code: &str) -> Error {
    match parse(code) {
        Ok(ast) => panic!("Expected an error, got:\n{}", ast),
        Err(err) => {
            println!("{}", err);
            err
        }
    }
}

macro_rules! case {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            assert($code);
        }
    };
}

macro_rules! case_err {
    ($name:ident, $code:expr, $expect:pat) => {
        #[test]
        fn $name() {
            let err = assert_err($code);
            assert!(matches!(err, $expect), "{:?}", err);
        }
    };
}

// Directives
case!(directive_module, ".module \"main\"");
case!(directive_import, ".IMPORT \"io\"");

// Structures
case!(struct_0, "declare struct Point [int] x [int] y end");
case!(struct_empty, "declare struct Unit end");
case!(struct_sized, "declare private struct Name [string(32)] first [string(32)*] last end");
case!(
    struct_implicit,
    "declare struct Person [string] name [struct] address begin [string] city [struct] geo begin [int] lat end end end"
);

// Procedures
case!(proc_void, "declare [void] :: main() end");
case!(proc_args, "declare public [int] :: add([int] a, [int(8)] b) ret a end");
case!(
    proc_statements,
    r#"
    declare [void] :: main()
        declare [string] name : "bob"
        declare [Point] p : init [Point]
        declare [int*] ptr : *count
        p::x : 5
        print name
        call greet(name, 1, call id(2))
        ret
    end
    "#
);
case!(
    proc_anon,
    "declare [void] :: main() declare [Person] p : declare anon first-name : \"a\" last-name end end"
);

// Globals
case!(global_var, "declare [int] x : 5");

// Field paths
case!(path_offset, "declare [void] :: main() print p::list(3)::value end");
case!(path_dynamic, "declare [void] :: main() print p::list(i)::value end");

#[test]
fn end_to_end_declaration() {
    let ast = parse("declare [int] x : 5").unwrap();
    assert_eq!(ast.kind, NodeKind::Root);
    assert_eq!(ast.children.len(), 1);

    let decl = &ast.children[0];
    assert_eq!(decl.kind, NodeKind::Declaration);
    let [target, value] = decl.children.as_slice() else {
        panic!("unexpected children: {:?}", decl.children);
    };
    assert_eq!(target.kind, NodeKind::Variable);
    assert_eq!(target.value, "x");
    assert_eq!(target.value_type.as_deref(), Some("int"));
    assert_eq!(value.kind, NodeKind::Scalar);
    assert_eq!(value.value, "5");
}

#[test]
fn procedure_shape() {
    let ast = parse("declare public [int(4)] :: add([int] a, [uint*] b) ret a end").unwrap();
    let proc = &ast.children[0];
    assert_eq!(proc.kind, NodeKind::Procedure);
    assert_eq!(proc.value, "add");

    let kinds: Vec<_> = proc.children.iter().map(|c| c.kind).collect();
    use NodeKind::*;
    assert_eq!(kinds, vec![Type, Argument, Argument, Return, Modifier]);

    assert_eq!(proc.children[0].value, "int");
    assert_eq!(proc.children[0].value_size, Some(4));
    let b = &proc.children[2];
    assert_eq!(b.value, "b");
    assert_eq!(b.value_type.as_deref(), Some("uint"));
    assert!(b.is_pointer);
    assert_eq!(b.children.len(), 1);
    assert_eq!(proc.children[4].value, "public");
}

#[test]
fn implicit_structure_path() {
    let ast = parse("declare struct Person [struct] address begin [struct] geo begin [int] lat end end end")
        .unwrap();
    let person = &ast.children[0];
    let address = &person.children[0];
    assert_eq!(address.kind, NodeKind::Structure);
    assert_eq!(address.path.as_deref(), Some("Person::address"));
    let geo = &address.children[0];
    assert_eq!(geo.path.as_deref(), Some("Person::address::geo"));
    assert_eq!(geo.children[0].kind, NodeKind::Field);
}

#[test]
fn field_path_chain() {
    let ast = parse("declare [void] :: main() print a::b(2)::c(i) end").unwrap();
    let print = &ast.children[0].children[1];
    let var = &print.children[0];
    assert_eq!((var.kind, var.value.as_str()), (NodeKind::Variable, "a"));

    let b = &var.children[0];
    assert_eq!((b.kind, b.value.as_str(), b.offset), (NodeKind::Field, "b", 2));
    assert_eq!(b.path.as_deref(), Some("a::b"));

    let c = &b.children[0];
    assert_eq!(c.path.as_deref(), Some("a::b::c"));
    assert_eq!(c.children[0].kind, NodeKind::DynOffset);
    assert_eq!(c.children[0].value, "i");
}

#[test]
fn anon_shorthand() {
    let ast = parse("declare [void] :: main() declare [P] p : declare anon x : 1 y end end").unwrap();
    let anon = &ast.children[0].children[1].children[1];
    assert_eq!(anon.kind, NodeKind::Structure);
    assert!(anon.value.is_empty());

    let y = &anon.children[1];
    assert_eq!(y.kind, NodeKind::Assignment);
    assert_eq!((y.children[0].kind, y.children[0].value.as_str()), (NodeKind::Field, "y"));
    assert_eq!((y.children[1].kind, y.children[1].value.as_str()), (NodeKind::Variable, "y"));
}

#[test]
fn string_scalar_size() {
    let ast = parse("declare [string] s : \"hello\"").unwrap();
    let value = &ast.children[0].children[1];
    assert_eq!(value.value_type.as_deref(), Some("string"));
    assert_eq!(value.value_size, Some(5));
}

// Errors
case_err!(err_directive, ".mangler \"x\"", Error::InvalidDirective(..));
case_err!(err_trailing_comma, "declare [void] :: f([int] a,) end", Error::UnexpectedToken { .. });
case_err!(err_double_comma, "declare [void] :: f([int] a,, [int] b) end", Error::UnexpectedToken { .. });
case_err!(err_call_trailing_comma, "declare [void] :: f() call g(1,) end", Error::UnexpectedToken { .. });
case_err!(err_missing_end, "declare struct Point [int] x", Error::UnexpectedToken { .. });
case_err!(err_missing_bracket, "declare [int x : 5", Error::UnexpectedToken { .. });
case_err!(err_top_level, "print x", Error::UnexpectedToken { .. });
case_err!(err_overflow, "declare [int] x : 99999999999999999999999", Error::InvalidNumber(..));
case_err!(err_anon_member, "declare [P] p : declare anon 5 end", Error::UnexpectedToken { .. });
