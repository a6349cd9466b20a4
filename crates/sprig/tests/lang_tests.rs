//! End-to-end tests for the toy language pipeline

use sprig::lang::cst::{AExpr, ArithOp, BExpr, RelOp, Stmt};
use sprig::lang::{Pipeline, compile_to_cst};
use sprig::lang::cst::MAX_NESTING;
use sprig::syntax::pretty::{render, sexpr};
use sprig::{CstError, Error, LexerError, LlConfig, ParseError, ReduceConfig};

fn num(n: i64) -> AExpr {
    AExpr::Num(n)
}

fn var(name: &str) -> AExpr {
    AExpr::Var(name.into())
}

fn add(lhs: AExpr, rhs: AExpr) -> AExpr {
    AExpr::Binary {
        op: ArithOp::Add,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn less(lhs: AExpr, rhs: AExpr) -> BExpr {
    BExpr::Rel {
        op: RelOp::Lt,
        lhs,
        rhs,
    }
}

fn assign(target: &str, value: AExpr) -> Stmt {
    Stmt::Assign {
        target: target.into(),
        value,
    }
}

#[test]
fn test_conditional_loop_program() {
    let program =
        compile_to_cst("if ( 1 ) < 1 then x := 123 + 5 else while x < 10 do x := x + 1 fi")
            .unwrap();

    let expected = Stmt::If {
        cond: less(num(1), num(1)),
        then_branch: Box::new(assign("x", add(num(123), num(5)))),
        else_branch: Box::new(Stmt::While {
            cond: less(var("x"), num(10)),
            body: Box::new(assign("x", add(var("x"), num(1)))),
        }),
    };
    assert_eq!(program.body(), &expected);
}

#[test]
fn test_display_round_trips() {
    let pipeline = Pipeline::new().unwrap();
    for source in [
        "skip",
        "x := 1; while x < 10 do x := x + 1",
        "if x < 1 then skip else x := x - 1 fi",
        "y := (a + b) * (c - d) / e",
        "if not true || x >= 2 && false then a := 1; b := 2 else skip fi",
        "while n > 0 do if n = 1 then n := 0 else n := n - 2 fi; done := 1",
    ] {
        let program = pipeline.compile(source).unwrap();
        let printed = program.to_string();
        assert_eq!(pipeline.compile(&printed).unwrap(), program, "{source}");
    }
}

#[test]
fn test_redundant_parentheses_are_dropped() {
    let program = compile_to_cst("x := ((1)) + (y * 2)").unwrap();
    assert_eq!(program.to_string(), "x := 1 + y * 2");
}

#[test]
fn test_lexer_error_carries_offset() {
    let error = compile_to_cst("x := 1 # 2").unwrap_err();
    assert!(matches!(
        error,
        Error::Lexer(LexerError::UnexpectedChar { ch: '#', offset: 7 })
    ));
}

#[test]
fn test_parse_error_points_at_token() {
    let pipeline = Pipeline::new().unwrap();
    let tokens = pipeline.tokenize("x := 1 +").unwrap();
    assert_eq!(tokens.len(), 5);

    match pipeline.compile("x := := 1") {
        Err(Error::Parse(error @ ParseError::UnexpectedTerminal { .. })) => {
            assert_eq!(error.position(), Some(2));
            assert_eq!(error.offset(), Some(5));
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_lenient_pipeline_ignores_trailing_tokens() {
    let pipeline = Pipeline::with_config(
        LlConfig {
            reject_trailing_input: false,
            ..LlConfig::default()
        },
        ReduceConfig::default(),
    )
    .unwrap();

    let program = pipeline.compile("skip fi").unwrap();
    assert_eq!(program.body(), &Stmt::Skip);
}

#[test]
fn test_pipeline_stages_agree() {
    let pipeline = Pipeline::new().unwrap();
    let source = "a := 1; b := a * 2";

    let raw = pipeline.parse(source).unwrap();
    let reduced = pipeline.reduce(source).unwrap();
    assert_eq!(pipeline.reducer().reduce(&raw).unwrap(), reduced);
    assert!(reduced.len() < raw.len());
    assert!(pipeline.parser().table().is_ll1());
}

fn nested_loops(levels: usize) -> String {
    format!("{}skip", "while true do ".repeat(levels))
}

#[test]
fn test_nesting_past_depth_limit_is_rejected() {
    let pipeline = Pipeline::with_config(
        LlConfig {
            max_depth: 64,
            ..LlConfig::default()
        },
        ReduceConfig::default(),
    )
    .unwrap();

    assert!(pipeline.compile(&nested_loops(32)).is_ok());
    assert!(matches!(
        pipeline.compile(&nested_loops(100)),
        Err(Error::Parse(ParseError::StackOverflow { limit: 64 }))
    ));
}

#[test]
fn test_default_depth_limit_rejects_deep_loops() {
    let pipeline = Pipeline::new().unwrap();
    assert!(matches!(
        pipeline.compile(&nested_loops(20_000)),
        Err(Error::Parse(ParseError::StackOverflow { limit: 10_000 }))
    ));
}

#[test]
fn test_deep_cst_is_rendered_but_not_converted() {
    let pipeline = Pipeline::new().unwrap();
    let source = nested_loops(5_000);

    let cst = pipeline.reduce(&source).unwrap();
    assert!(cst.depth() > 5_000);
    assert!(sexpr(&cst).starts_with("(while true (while true"));
    assert_eq!(render(&cst).lines().count(), cst.len());

    assert!(matches!(
        pipeline.compile(&source),
        Err(Error::Cst(CstError::TooDeep { limit: MAX_NESTING }))
    ));
}

#[test]
fn test_long_operator_chain_counts_toward_nesting() {
    let chain = |operands: usize| format!("x := 1{}", " + 1".repeat(operands - 1));

    assert!(compile_to_cst(&chain(MAX_NESTING / 2)).is_ok());
    assert!(matches!(
        compile_to_cst(&chain(MAX_NESTING * 2)),
        Err(Error::Cst(CstError::TooDeep { .. }))
    ));
}
