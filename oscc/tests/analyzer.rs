use oscc::analyze::mangle::mangle;
use oscc::{Analysis, Analyzer, AstNode, Error, NodeKind, Warning};

fn run(code: &str) -> (Analyzer, Result<Analysis, Error>) {
    let tokens = oscc::tokenize("test.osc", code).unwrap();
    let ast = oscc::parse(tokens).unwrap();
    let mut analyzer = Analyzer::new();
    let result = analyzer.analyze(ast);
    (analyzer, result)
}

fn assert(code: &str) -> Analysis {
    let (analyzer, result) = run(code);
    match result {
        Ok(analysis) => {
            println!("{}", analysis.ast);
            assert_eq!(analyzer.depth(), 1);
            analysis
        }
        Err(err) => panic!("Error found: {}", err),
    }
}

fn assert_err(code: &str) -> Error {
    let (analyzer, result) = run(code);
    assert_eq!(analyzer.depth(), 1, "scopes left on the stack");
    match result {
        Ok(analysis) => panic!("Expected an error, got:\n{}", analysis.ast),
        Err(err) => {
            println!("{}", err);
            err
        }
    }
}

fn count(node: &AstNode, kinds: &[NodeKind]) -> usize {
    let own = usize::from(kinds.contains(&node.kind));
    own + node.children.iter().map(|c| count(c, kinds)).sum::<usize>()
}

macro_rules! case {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            let analysis = assert($code);
            assert!(analysis.warnings.is_empty(), "{:?}", analysis.warnings);
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

const POINT: &str = "declare struct Point [int(4)] x [int(8)] y end\n";

#[test]
fn end_to_end_declaration() {
    let analysis = assert("declare [int] x : 5");
    assert!(analysis.warnings.is_empty());

    let x = &analysis.globals.variables[&mangle("x")];
    assert_eq!(x.name, "x");
    assert_eq!(x.ty.name, "int");
    assert!(!x.ty.is_composite());
    assert_eq!(x.size, 1);
}

#[test]
fn structure_size() {
    let analysis = assert(POINT);
    let point = &analysis.globals.types[&mangle("Point")];
    assert_eq!(point.subtypes.len(), 2);
    assert_eq!(point.size(), 12);
}

#[test]
fn nested_structure_size() {
    let code = format!(
        "{}declare struct Line [Point] from [Point] to [struct] meta begin [string(3)] tag end end",
        POINT
    );
    let analysis = assert(&code);
    let line = &analysis.globals.types[&mangle("Line")];
    assert_eq!(line.size(), 27);
    assert_eq!(line.subtype("meta").map(|m| m.size()), Some(3));
    assert!(!analysis.globals.types.contains_key(&mangle("meta")));
}

#[test]
fn balanced_scopes() {
    let code = format!(
        "{}declare [void] :: main() declare [Point] p : declare anon x : 1 end end\ndeclare [int] :: one() ret 1 end",
        POINT
    );
    let analysis = assert(&code);
    let entered = count(&analysis.ast, &[NodeKind::Structure, NodeKind::Procedure]);
    assert_eq!(entered, 4);
    assert_eq!(analysis.scopes.len(), entered);
    assert!(analysis.scopes.iter().all(|scope| scope.depth >= 1));
}

#[test]
fn field_path_resolves() {
    let code = format!(
        "{}declare [void] :: main() declare [Point] p : init [Point] print p::x end",
        POINT
    );
    let analysis = assert(&code);
    let print = &analysis.ast.children[1].children[2];
    let p = &print.children[0];
    assert_eq!(p.value_type.as_deref(), Some("Point"));
    assert_eq!(p.children[0].value_type.as_deref(), Some("int"));
}

#[test]
fn loss_of_information() {
    let analysis = assert("declare [string(2)] s : \"hello\"");
    assert_eq!(
        analysis.warnings,
        vec![Warning::LossOfInformation {
            to: "string(2)".to_string(),
            from: "string(5)".to_string(),
        }]
    );
}

#[test]
fn size_is_taken_from_value() {
    let analysis = assert("declare [string] s : \"hello\"");
    assert!(analysis.warnings.is_empty());
    assert_eq!(analysis.globals.variables[&mangle("s")].size, 5);
}

#[test]
fn string_size_counts_bytes() {
    let analysis = assert("declare [string(1)] s : \"é\"");
    assert_eq!(
        analysis.warnings,
        vec![Warning::LossOfInformation {
            to: "string(1)".to_string(),
            from: "string(2)".to_string(),
        }]
    );

    let analysis = assert("declare [string] s : \"été\"");
    assert_eq!(analysis.globals.variables[&mangle("s")].size, 5);
}

#[test]
fn params_are_scoped() {
    let analysis = assert("declare [int] :: id([int] n) ret n end");
    let proc = &analysis.globals.procedures[&mangle("id")];
    assert_eq!(proc.params.len(), 1);
    assert_eq!(proc.returns.as_ref().map(|ty| ty.name.as_str()), Some("int"));
    assert!(analysis.globals.variables.is_empty());
    assert!(analysis.scopes[0].variables.contains_key(&mangle("n")));
}

// Declarations
case!(shadowing, "declare [int] x : 1\ndeclare [void] :: main() declare [int] x : 2 end");
case!(modifiers, "declare public [int] x : 1\ndeclare private struct S [int] a end");
case!(dyn_offset, "declare struct L [int] item end\ndeclare [void] :: main() declare [int] i : 0 declare [L] l : init [L] print l::item(i) end");
case!(recursion, "declare [int] :: fact([int] n) ret call fact(n) end");
case!(calls, "declare [void] :: greet([string] name) end\ndeclare [void] :: main() call greet(\"bob\") end");
case!(assignment, "declare [void] :: main() declare [int(2)] x : 1 x : 22 end");
case!(pointer, "declare [int] n : 1\ndeclare [void] :: main() declare [int*] p : *n end");

case_err!(redeclaration, "declare [int] x : 1\ndeclare [int] x : 2", Error::Redeclaration("variable", _));
case_err!(redeclared_param, "declare [void] :: f([int] a) declare [int] a : 1 end", Error::Redeclaration("variable", _));
case_err!(redeclared_type, "declare struct S end\ndeclare struct S end", Error::Redeclaration("type", _));
case_err!(duplicate_field, "declare struct S [int] a [string] a end", Error::Redeclaration("field", _));
case_err!(redeclared_proc, "declare [void] :: f() end\ndeclare [void] :: f() end", Error::Redeclaration("procedure", _));
case_err!(self_reference, "declare [void] :: main() declare [int] x : x end", Error::UnresolvedVariable(_));
case_err!(unresolved_type, "declare [float] x : 1", Error::UnresolvedType(_));
case_err!(unresolved_field_type, "declare struct S [Missing] a end", Error::UnresolvedType(_));
case_err!(unresolved_alloc, "declare [void] :: main() declare [int*] p : init [Missing] end", Error::UnresolvedType(_));
case_err!(illegal, "declare [int] x : \"abc\"", Error::IllegalAssignment { .. });
case_err!(illegal_assignment, "declare [void] :: main() declare [uint] x : 1 x : \"a\" end", Error::IllegalAssignment { .. });

// References
case_err!(
    field_path_fails,
    "declare struct Point [int] x [int] y end\ndeclare [void] :: main() declare [Point] p : init [Point] print p::z end",
    Error::UnresolvedPath(_)
);
case_err!(path_on_elementary, "declare [void] :: main() declare [int] n : 1 print n::x end", Error::UnresolvedPath(_));
case_err!(unresolved_variable, "declare [void] :: main() print y end", Error::UnresolvedVariable(_));
case_err!(unresolved_dyn_offset, "declare struct L [int] item end\ndeclare [void] :: main() declare [L] l : init [L] print l::item(j) end", Error::UnresolvedVariable(_));
case_err!(out_of_scope, "declare [void] :: f() declare [int] x : 1 end\ndeclare [void] :: g() print x end", Error::UnresolvedVariable(_));

// Procedures
case_err!(unresolved_procedure, "declare [void] :: main() call nope() end", Error::UnresolvedProcedure(_));
case_err!(argument_count, "declare [void] :: f([int] a) end\ndeclare [void] :: main() call f(1, 2) end", Error::ArgumentCount(_, 1, 2));
case_err!(argument_type, "declare [void] :: f([int] a) end\ndeclare [void] :: main() call f(\"a\") end", Error::IllegalAssignment { .. });
case_err!(unreachable, "declare [int] :: f() ret 1 print 2 end", Error::UnreachableCode(_));
case_err!(void_return_value, "declare [void] :: f() ret 1 end", Error::UnexpectedReturnValue(_));
case_err!(missing_return_value, "declare [int] :: f() ret end", Error::MissingReturnValue(_));
case_err!(return_type, "declare [int] :: f() ret \"a\" end", Error::IllegalAssignment { .. });
