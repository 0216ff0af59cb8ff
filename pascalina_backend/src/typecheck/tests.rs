use super::{analyze, check, SemanticError, SemanticErrorKind, Type};
use crate::{lexer::lex, parser::parse};

fn program_with(decls: &str, body: &str) -> String {
    format!("program test;\nvar\n{}\nbegin\n{}\nend.", decls, body)
}

fn analyze_source(source: &str) -> Result<(), SemanticError> {
    let tokens = lex(source).expect("Expected a successful lex");
    let program = parse(tokens).expect("Expected a successful parse");
    analyze(&program)
}

fn error_kind(decls: &str, body: &str) -> SemanticErrorKind {
    analyze_source(&program_with(decls, body))
        .expect_err("Expected a semantic error")
        .kind
}

fn assert_ok(decls: &str, body: &str) {
    if let Err(err) = analyze_source(&program_with(decls, body)) {
        panic!("unexpected semantic error: {}", err);
    }
}

#[test]
fn symbol_table() {
    let source = program_with("a, b: integer;\nr: real;\ns: string;", "");
    let program = parse(lex(&source).expect("Expected a successful lex"))
        .expect("Expected a successful parse");
    let symbols = check(&program).expect("Expected a successful check");

    assert_eq!(symbols.len(), 4);
    assert_eq!(symbols.get("a"), Some(Type::Integer));
    assert_eq!(symbols.get("b"), Some(Type::Integer));
    assert_eq!(symbols.get("r"), Some(Type::Real));
    assert_eq!(symbols.get("s"), Some(Type::String));
    assert!(!symbols.contains("test"));

    let mut names = symbols.names().collect::<Vec<_>>();
    names.sort_unstable();
    assert_eq!(names, vec!["a", "b", "r", "s"]);

    let b = symbols.declared_at("b").expect("`b` should be declared");
    assert_eq!((b.line, b.column), (3, 4));
}

#[test]
fn redeclaration() {
    let err = analyze_source(&program_with("x: integer;\ny, x: real;", ""))
        .expect_err("Expected a semantic error");

    match err.kind {
        SemanticErrorKind::Redeclared { ref name, previous } => {
            assert_eq!(name, "x");
            assert_eq!((previous.line, previous.column), (3, 1));
        },

        kind => panic!("unexpected error {:?}", kind),
    }

    assert_eq!((err.line, err.column), (4, 4));
    assert_eq!(
        err.message(),
        "variable `x` is declared more than once"
    );
}

#[test]
fn undeclared_variables() {
    let source = program_with("x: integer;", "  y := 1;");
    let err = analyze_source(&source).expect_err("Expected a semantic error");

    assert_eq!(err.kind, SemanticErrorKind::Undeclared { name: "y".into() });
    assert_eq!((err.line, err.column), (5, 3));
    assert_eq!(err.to_string(), "variable `y` not declared at line 5, column 3");

    assert!(matches!(
        error_kind("x: integer;", "x := y + 1;"),
        SemanticErrorKind::Undeclared { .. }
    ));

    assert!(matches!(
        error_kind("x: integer;", "read(z);"),
        SemanticErrorKind::Undeclared { .. }
    ));

    assert!(matches!(
        error_kind("x: integer;", "writeln(x, w);"),
        SemanticErrorKind::Undeclared { .. }
    ));
}

#[test]
fn assignment_compatibility() {
    assert_ok("r: real; i: integer;", "r := 1; r := 1.5; r := i; i := 0x10 + 017;");
    assert_ok("s: string;", "s := 'hello';");

    assert!(matches!(
        error_kind("i: integer;", "i := 1.5;"),
        SemanticErrorKind::MismatchedAssignment {
            target: Type::Integer,
            found: Type::Real,
            ..
        }
    ));

    assert!(matches!(
        error_kind("s: string;", "s := 1;"),
        SemanticErrorKind::MismatchedAssignment {
            target: Type::String,
            found: Type::Integer,
            ..
        }
    ));

    assert!(matches!(
        error_kind("i: integer;", "i := 1 < 2;"),
        SemanticErrorKind::MismatchedAssignment {
            found: Type::Boolean,
            ..
        }
    ));
}

#[test]
fn arithmetic() {
    assert_ok("i: integer; r: real;", "i := i * 2 - -i; r := i / 2; r := r * i;");
    // `/` keeps the operands' type statically
    assert_ok("i: integer;", "i := i / 2;");
    assert_ok("i: integer;", "i := i div 2 + i mod 3;");

    assert!(matches!(
        error_kind("i: integer; r: real;", "i := r + 1;"),
        SemanticErrorKind::MismatchedAssignment {
            found: Type::Real,
            ..
        }
    ));

    assert!(matches!(
        error_kind("i: integer; s: string;", "i := s + 1;"),
        SemanticErrorKind::NonNumericOperand { found: Type::String, .. }
    ));

    assert!(matches!(
        error_kind("r: real;", "r := r div 2;"),
        SemanticErrorKind::IntegerOperandRequired { found: Type::Real, .. }
    ));

    assert!(matches!(
        error_kind("i: integer;", "i := 7 mod 2.0;"),
        SemanticErrorKind::IntegerOperandRequired { .. }
    ));

    assert!(matches!(
        error_kind("s: string;", "s := -s;"),
        SemanticErrorKind::NonNumericOperand { .. }
    ));
}

#[test]
fn operator_errors_point_at_the_operator() {
    let source = program_with("i: integer; s: string;", "i := 1 +  s;");
    let err = analyze_source(&source).expect_err("Expected a semantic error");

    assert_eq!((err.line, err.column), (5, 8));

    match err.kind {
        SemanticErrorKind::NonNumericOperand { operator, operand, .. } => {
            assert_eq!(operator, "+");
            assert_eq!(operand.column, 11);
        },

        kind => panic!("unexpected error {:?}", kind),
    }
}

#[test]
fn comparisons_and_logic() {
    assert_ok(
        "i: integer; r: real; s: string;",
        "if (i < r) and (s = 'x') or not (i <> 2) then i := 1;",
    );

    assert!(matches!(
        error_kind("i: integer; s: string;", "if i = s then i := 1;"),
        SemanticErrorKind::Incomparable {
            lhs: Type::Integer,
            rhs: Type::String
        }
    ));

    assert!(matches!(
        error_kind("i: integer;", "if i and (i > 1) then i := 1;"),
        SemanticErrorKind::NonBooleanOperand { found: Type::Integer, .. }
    ));

    assert!(matches!(
        error_kind("i: integer;", "if not i then i := 1;"),
        SemanticErrorKind::NonBooleanOperand { .. }
    ));

    // Booleans are only good for conditions
    assert!(matches!(
        error_kind("i: integer;", "i := (1 < 2) + 1;"),
        SemanticErrorKind::NonNumericOperand {
            found: Type::Boolean,
            ..
        }
    ));
}

#[test]
fn conditions_must_be_boolean() {
    assert!(matches!(
        error_kind("i: integer;", "if i then i := 1;"),
        SemanticErrorKind::NonBooleanCondition { found: Type::Integer }
    ));

    assert!(matches!(
        error_kind("s: string;", "while s do s := 'a';"),
        SemanticErrorKind::NonBooleanCondition { found: Type::String }
    ));
}

#[test]
fn for_loops() {
    assert_ok("i, n: integer;", "for i := 1 to n do write(i); for i := n downto 0x0 do ;");
    assert_ok("r: real; n: integer;", "for r := 0 to n do ;");

    assert!(matches!(
        error_kind("i: integer; s: string;", "for i := 1 to s do ;"),
        SemanticErrorKind::ForEndMismatch {
            target: Type::Integer,
            found: Type::String,
            ..
        }
    ));

    assert!(matches!(
        error_kind("i: integer;", "for i := 'a' to 10 do ;"),
        SemanticErrorKind::MismatchedAssignment { .. }
    ));

    assert!(matches!(
        error_kind("i: integer;", "for i := 1 to 10 do x := i;"),
        SemanticErrorKind::Undeclared { .. }
    ));
}

#[test]
fn loop_control() {
    assert_ok(
        "i: integer;",
        "while i < 10 do begin if i = 5 then break; i := i + 1; continue; end;",
    );
    assert_ok("i, j: integer;", "for i := 1 to 3 do for j := 1 to 3 do if j = 2 then break;");

    assert_eq!(
        error_kind("i: integer;", "break;"),
        SemanticErrorKind::LoopControlOutsideLoop { keyword: "break" }
    );

    // The loop is over by the time `continue` shows up
    assert_eq!(
        error_kind("i: integer;", "while i < 1 do i := 1; begin continue; end;"),
        SemanticErrorKind::LoopControlOutsideLoop {
            keyword: "continue"
        }
    );
}

#[test]
fn stops_at_first_error() {
    let err = analyze_source(&program_with("i: integer;", "i := 'a';\nj := 1;"))
        .expect_err("Expected a semantic error");

    assert!(matches!(err.kind, SemanticErrorKind::MismatchedAssignment { .. }));
    assert_eq!(err.line, 5);
}
