//! End-to-end generator tests exercising the full `Lexer` → `Parser` →
//! `Generator` pipeline on small whole programs, rather than unit-testing
//! one lowering rule at a time the way the per-module tests do.

use cpc_lex::Lexer;
use cpc_util::Handler;

fn generate_source(source: &str) -> String {
    let mut handler = Handler::new();
    let tokens: Vec<_> = Lexer::new(source, &mut handler).collect();
    let mut parser = cpc_par::Parser::new(tokens, &mut handler);
    let program = parser.parse();
    assert!(!handler.has_errors());
    crate::generate(&program).expect("generation should succeed")
}

#[test]
fn empty_program_has_package_header_and_no_imports() {
    let out = generate_source("");
    assert!(out.starts_with("package main"));
    assert!(!out.contains("import"));
}

#[test]
fn proc_with_skip_body_emits_empty_function() {
    let out = generate_source("PROC worker ()\n  SKIP\n:\n");
    assert!(out.contains("func worker("));
}

#[test]
fn proc_named_main_is_renamed_to_avoid_the_generated_harness() {
    let out = generate_source("PROC main ()\n  SKIP\n:\n");
    assert!(out.contains("func _main("));
}

#[test]
fn seq_of_assignments_emits_go_statements() {
    let source = "PROC worker ()\n  INT x:\n  SEQ\n    x := 1\n    x := x + 1\n:\n";
    let out = generate_source(source);
    assert!(out.contains("var x int"));
    assert!(out.contains("x = 1"));
    assert!(out.contains("x = (x + 1)"));
}

#[test]
fn par_block_uses_waitgroup_and_goroutines() {
    let source = "PROC worker ()\n  INT x:\n  INT y:\n  PAR\n    x := 1\n    y := 2\n:\n";
    let out = generate_source(source);
    assert!(out.contains("sync.WaitGroup"));
    assert!(out.contains("go func()"));
    assert!(out.contains("import"));
    assert!(out.contains("\"sync\""));
}

#[test]
fn while_loop_lowers_to_go_for() {
    let source = "PROC worker ()\n  BOOL running:\n  WHILE running\n    SKIP\n:\n";
    let out = generate_source(source);
    assert!(out.contains("for running {"));
}

#[test]
fn byte_entry_proc_gets_generated_main_harness() {
    let source = "PROC process (CHAN OF BYTE kb ?, CHAN OF BYTE scr !, CHAN OF BYTE err !)\n  SKIP\n:\n";
    let out = generate_source(source);
    assert!(out.contains("func main() {"));
    assert!(out.contains("bufio.NewReader(os.Stdin)"));
    assert!(out.contains("process(kb, scr, errc)"));
}

#[test]
fn byref_int_param_is_dereferenced_in_body() {
    let source = "PROC bump (INT n)\n  n := n + 1\n:\n";
    let out = generate_source(source);
    assert!(out.contains("func bump(n *int)"));
    assert!(out.contains("(*n) = ((*n) + 1)"));
}

#[test]
fn val_int_param_is_passed_by_value() {
    let source = "PROC show (VAL INT n)\n  SKIP\n:\n";
    let out = generate_source(source);
    assert!(out.contains("func show(n int)"));
}
