//! End-to-end parser tests exercising the full `Lexer` → `Parser` pipeline
//! on small whole programs, rather than unit-testing one production at a
//! time the way the per-module tests do.

use cpc_ast::stmt::{FunctionBody, IfChoice};
use cpc_ast::Stmt;
use cpc_lex::Lexer;
use cpc_util::Handler;

use crate::Parser;

fn parse_source(source: &str) -> (cpc_ast::Program, Handler) {
    let mut handler = Handler::new();
    let tokens: Vec<_> = Lexer::new(source, &mut handler).collect();
    let mut parser = Parser::new(tokens, &mut handler);
    let program = parser.parse();
    (program, handler)
}

#[test]
fn empty_source_yields_an_empty_program() {
    let (program, handler) = parse_source("");
    assert!(!handler.has_errors());
    assert!(program.stmts.is_empty());
}

#[test]
fn whitespace_and_comment_only_source_yields_an_empty_program() {
    let (program, handler) = parse_source("\n-- nothing here\n\n");
    assert!(!handler.has_errors());
    assert!(program.stmts.is_empty());
}

#[test]
fn single_proc_with_no_params() {
    let (program, handler) = parse_source("PROC main ()\n  SKIP\n:\n");
    assert!(!handler.has_errors());
    assert_eq!(program.stmts.len(), 1);
    assert!(matches!(program.stmts[0], Stmt::Proc(_)));
}

#[test]
fn proc_with_an_empty_body() {
    let (program, handler) = parse_source("PROC main ()\n  SKIP\n:\n");
    assert!(!handler.has_errors());
    match &program.stmts[0] {
        Stmt::Proc(p) => assert_eq!(p.body.len(), 1),
        _ => panic!("expected a PROC declaration"),
    }
}

#[test]
fn deeply_nested_seq_blocks_parse() {
    let source = "PROC main ()\n  SEQ\n    SEQ\n      SEQ\n        SKIP\n:\n";
    let (program, handler) = parse_source(source);
    assert!(!handler.has_errors());
    let Stmt::Proc(proc) = &program.stmts[0] else {
        panic!("expected a PROC declaration");
    };
    let Stmt::Seq(outer) = &proc.body[0] else {
        panic!("expected an outer SEQ");
    };
    let Stmt::Seq(middle) = &outer.body[0] else {
        panic!("expected a middle SEQ");
    };
    assert!(matches!(middle.body[0], Stmt::Seq(_)));
}

#[test]
fn multiple_sibling_statements_in_one_block() {
    let source = "PROC main ()\n  SEQ\n    INT a:\n    a := 1\n    report(a)\n:\n";
    let (program, handler) = parse_source(source);
    assert!(!handler.has_errors());
    let Stmt::Proc(proc) = &program.stmts[0] else {
        panic!("expected a PROC declaration");
    };
    let Stmt::Seq(seq) = &proc.body[0] else {
        panic!("expected a SEQ block");
    };
    assert_eq!(seq.body.len(), 3);
}

#[test]
fn if_with_no_else_only_has_its_conditions() {
    let source = "PROC main ()\n  IF\n    x = 1\n      SKIP\n:\n";
    let (program, handler) = parse_source(source);
    assert!(!handler.has_errors());
    let Stmt::Proc(proc) = &program.stmts[0] else {
        panic!("expected a PROC declaration");
    };
    let Stmt::If(if_stmt) = &proc.body[0] else {
        panic!("expected an IF statement");
    };
    assert_eq!(if_stmt.choices.len(), 1);
}

#[test]
fn if_chain_reads_every_condition_as_a_sibling_choice() {
    let source = "PROC main ()\n  IF\n    x = 1\n      SKIP\n    x = 2\n      STOP\n:\n";
    let (program, handler) = parse_source(source);
    assert!(!handler.has_errors());
    let Stmt::Proc(proc) = &program.stmts[0] else {
        panic!("expected a PROC declaration");
    };
    let Stmt::If(if_stmt) = &proc.body[0] else {
        panic!("expected an IF statement");
    };
    assert_eq!(if_stmt.choices.len(), 2);
    assert!(if_stmt.choices.iter().all(|c| matches!(c, IfChoice::Cond { .. })));
}

#[test]
fn nested_if_chain_is_a_nested_choice() {
    let source = "PROC main ()\n  IF\n    x = 1\n      SKIP\n    IF\n      y = 2\n        SKIP\n:\n";
    let (program, handler) = parse_source(source);
    assert!(!handler.has_errors());
    let Stmt::Proc(proc) = &program.stmts[0] else {
        panic!("expected a PROC declaration");
    };
    let Stmt::If(if_stmt) = &proc.body[0] else {
        panic!("expected an IF statement");
    };
    assert!(matches!(if_stmt.choices[1], IfChoice::Nested(_)));
}

#[test]
fn while_loop_parses_condition_and_body() {
    let source = "PROC main ()\n  WHILE running\n    SKIP\n:\n";
    let (program, handler) = parse_source(source);
    assert!(!handler.has_errors());
    let Stmt::Proc(proc) = &program.stmts[0] else {
        panic!("expected a PROC declaration");
    };
    assert!(matches!(proc.body[0], Stmt::While(_)));
}

#[test]
fn par_with_channel_communication_between_two_processes() {
    let source = concat!(
        "PROC main ()\n",
        "  CHAN OF INT link:\n",
        "  PAR\n",
        "    link ! 42\n",
        "    INT v:\n",
        "    link ? v\n",
        ":\n",
    );
    let (program, handler) = parse_source(source);
    assert!(!handler.has_errors());
    let Stmt::Proc(proc) = &program.stmts[0] else {
        panic!("expected a PROC declaration");
    };
    assert!(matches!(proc.body[0], Stmt::ChanDecl(_)));
    assert!(matches!(proc.body[1], Stmt::Par(_)));
}

#[test]
fn function_declarations_are_recognized_at_top_level() {
    let source = "FUNCTION INT square (INT n) IS n * n\n";
    let (program, handler) = parse_source(source);
    assert!(!handler.has_errors());
    match &program.stmts[0] {
        Stmt::Function(f) => assert!(matches!(f.body, FunctionBody::ShortForm(_))),
        _ => panic!("expected a FUNCTION declaration"),
    }
}

#[test]
fn a_line_with_a_stray_token_is_recovered_and_parsing_continues() {
    let source = "PROC main ()\n  )\n  SKIP\n:\n";
    let (program, handler) = parse_source(source);
    assert!(handler.has_errors());
    assert_eq!(program.stmts.len(), 1);
}

#[test]
fn replicated_seq_carries_its_loop_variable() {
    let source = "PROC main ()\n  SEQ i = 0 FOR 10\n    report(i)\n:\n";
    let (program, handler) = parse_source(source);
    assert!(!handler.has_errors());
    let Stmt::Proc(proc) = &program.stmts[0] else {
        panic!("expected a PROC declaration");
    };
    match &proc.body[0] {
        Stmt::Seq(s) => assert!(s.replicator.is_some()),
        _ => panic!("expected a SEQ block"),
    }
}
