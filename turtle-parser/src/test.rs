use super::parse;
use turtle_ast::{ArithOp, CompareOp, Exp, FunDec, Param, Stmt};

#[test]
fn parses_the_empty_program() {
    let program = parse("main { }").unwrap();
    assert!(program.globals.is_empty());
    assert!(program.functions.is_empty());
    assert!(program.body.is_empty());
}

#[test]
fn parses_a_global_var_dec_with_default_initializer() {
    let program = parse("var x; main { x := 3; }").unwrap();

    assert_eq!(program.globals.len(), 1);
    assert_eq!(program.globals[0].name, "x");
    assert!(matches!(program.globals[0].init, Exp::Int(0, _)));

    match &program.body[0] {
        Stmt::Assign(name, exp, _) => {
            assert_eq!(name, "x");
            assert!(matches!(exp, Exp::Int(3, _)));
        }
        other => panic!("expected an assignment, got {:?}", other),
    }
}

#[test]
fn parses_an_explicit_global_initializer() {
    let program = parse("var x := 1; main { }").unwrap();
    assert!(matches!(program.globals[0].init, Exp::Int(1, _)));
}

#[test]
fn parses_a_brace_less_if_body() {
    let program = parse("main { if (1 == 2) up; }").unwrap();

    match &program.body[0] {
        Stmt::If { cond, then, .. } => {
            assert_eq!(cond.op, CompareOp::Eq);
            assert!(matches!(cond.left, Exp::Int(1, _)));
            assert!(matches!(cond.right, Exp::Int(2, _)));
            assert_eq!(then.len(), 1);
            assert!(matches!(then[0], Stmt::Up(_)));
        }
        other => panic!("expected an if statement, got {:?}", other),
    }
}

#[test]
fn parses_not_equal_as_its_own_compare_op() {
    let program = parse("main { if (1 != 2) up; }").unwrap();

    match &program.body[0] {
        Stmt::If { cond, .. } => assert_eq!(cond.op, CompareOp::Neq),
        other => panic!("expected an if statement, got {:?}", other),
    }
}

#[test]
fn parses_if_else_with_block_bodies() {
    let program = parse("main { if (1 < 2) { up; } else { down; } }").unwrap();

    match &program.body[0] {
        Stmt::IfElse { then, else_, .. } => {
            assert!(matches!(then[0], Stmt::Up(_)));
            assert!(matches!(else_[0], Stmt::Down(_)));
        }
        other => panic!("expected an if/else statement, got {:?}", other),
    }
}

#[test]
fn parses_while_with_a_single_bare_statement_body() {
    let program = parse("main { while (1 < 2) move(1, 2); }").unwrap();

    match &program.body[0] {
        Stmt::While { body, .. } => {
            assert_eq!(body.len(), 1);
            assert!(matches!(body[0], Stmt::Move(_, _, _)));
        }
        other => panic!("expected a while statement, got {:?}", other),
    }
}

#[test]
fn parses_function_declarations_with_params_and_locals() {
    let program = parse("fun add(a, b) var c; { return a + b; } main { add(1, 2); }").unwrap();

    assert_eq!(program.functions.len(), 1);
    let FunDec {
        name,
        params,
        locals,
        body,
        ..
    } = &program.functions[0];
    assert_eq!(name, "add");
    assert_eq!(
        params,
        &vec![
            Param::new("a", params[0].pos),
            Param::new("b", params[1].pos),
        ]
    );
    assert_eq!(locals.len(), 1);
    assert_eq!(locals[0].name, "c");
    assert!(matches!(body[0], Stmt::Return(_, _)));

    match &program.body[0] {
        Stmt::Call(name, args, _) => {
            assert_eq!(name, "add");
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected a call statement, got {:?}", other),
    }
}

#[test]
fn respects_arithmetic_precedence_and_unary_minus() {
    let program = parse("main { 1 + 2 * -3; }").unwrap();

    match &program.body[0] {
        Stmt::ExpList(exps, _) => match &exps[0] {
            Exp::Op(ArithOp::Add, left, right, _) => {
                assert!(matches!(**left, Exp::Int(1, _)));
                match &**right {
                    Exp::Op(ArithOp::Mul, l, r, _) => {
                        assert!(matches!(**l, Exp::Int(2, _)));
                        assert!(matches!(**r, Exp::Neg(_, _)));
                    }
                    other => panic!("expected a multiplication, got {:?}", other),
                }
            }
            other => panic!("expected an addition, got {:?}", other),
        },
        other => panic!("expected an expression-list statement, got {:?}", other),
    }
}

#[test]
fn parses_read_and_call_expressions() {
    let program = parse("fun zero() { return 0; } main { read x; y := zero(); }").unwrap();
    assert!(matches!(program.body[0], Stmt::Read(_, _)));
    match &program.body[1] {
        Stmt::Assign(_, exp, _) => assert!(matches!(exp, Exp::Call(_, _, _))),
        other => panic!("expected an assignment, got {:?}", other),
    }
}

#[test]
fn skips_line_comments() {
    let program = parse("main { # move the turtle\n up; }").unwrap();
    assert!(matches!(program.body[0], Stmt::Up(_)));
}

#[test]
fn rejects_malformed_input() {
    assert!(parse("main {").is_err());
}
