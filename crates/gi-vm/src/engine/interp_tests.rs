//! End-to-end tests for the tree-walk interpreter.

use gi_core::{Context, Value};
use gi_compiler::{lower, parse, resolve_program};
use indoc::indoc;

use super::interp::Interp;
use super::trace::{NoopTracer, StepTracer};

fn eval(src: &str) -> String {
    let mut ctx = Context::new();
    let root = parse(&mut ctx, src);
    let program = resolve_program(&ctx, root);
    lower(&mut ctx, program);
    let mut interp = Interp::new();
    interp.run(&mut ctx, &mut NoopTracer);
    interp.out
}

#[test]
fn arithmetic_precedence() {
    assert_eq!(eval("println(1 + 2 * 3)"), "7\n");
}

#[test]
fn division_and_modulo() {
    assert_eq!(eval("a := 10; b := 3; println(a / b); println(a % b)"), "3\n1\n");
}

#[test]
fn for_loop_counts() {
    assert_eq!(eval("i := 0; for i := 0; i < 3; i++ { println(i) }"), "0\n1\n2\n");
}

#[test]
fn if_else_takes_the_true_branch() {
    assert_eq!(eval("x := 5; if x > 3 { println(1) } else { println(0) }"), "1\n");
}

#[test]
fn if_else_takes_the_false_branch() {
    assert_eq!(eval("x := 2; if x > 3 { println(1) } else { println(0) }"), "0\n");
}

#[test]
fn for_with_empty_init_accumulates() {
    assert_eq!(
        eval("n := 0; i := 1; for ; i <= 5; i++ { n = n + i }; println(n)"),
        "15\n"
    );
}

#[test]
fn shift_and_bitwise_or() {
    assert_eq!(eval("println(1 << 3 | 1)"), "9\n");
}

#[test]
fn while_loop() {
    assert_eq!(
        eval("i := 0; while i < 3 { println(i); i = i + 1 }"),
        "0\n1\n2\n"
    );
}

#[test]
fn comparisons_yield_zero_or_one() {
    assert_eq!(
        eval("println(2 < 3); println(2 <= 2); println(2 > 3); println(3 >= 3); println(1 == 2); println(1 != 2)"),
        "1\n1\n0\n1\n0\n1\n"
    );
}

#[test]
fn logical_operators() {
    assert_eq!(
        eval("println(1 && 0); println(1 && 2); println(0 || 3); println(!1); println(!0)"),
        "0\n1\n1\n0\n1\n"
    );
}

#[test]
fn unary_minus_and_complement() {
    assert_eq!(eval("println(-5 + 3)"), "-2\n");
    assert_eq!(eval("println(~0)"), "-1\n");
    assert_eq!(eval("println(6 ^ 3)"), "5\n");
}

#[test]
fn octal_and_hex_literals() {
    assert_eq!(eval("println(010); println(0x10)"), "8\n16\n");
}

#[test]
fn float_and_string_output() {
    assert_eq!(eval("println(2.5)"), "2.5\n");
    assert_eq!(eval("println(\"hi\")"), "hi\n");
}

#[test]
fn assignment_expression_carries_its_value() {
    assert_eq!(eval("b := 0; a := (b = 5); println(a); println(b)"), "5\n5\n");
}

#[test]
fn postfix_decrement() {
    assert_eq!(eval("i := 5; i--; println(i)"), "4\n");
}

#[test]
fn divide_by_zero_keeps_the_prior_value() {
    // the failed divide reports to stderr and leaves its result slot
    // untouched, so the assignment sees the slot's prior value
    assert_eq!(eval("a := 10 / 0; println(a)"), "0\n");
    assert_eq!(eval("println(10 % 0); println(1)"), "0\n1\n");
}

#[test]
fn empty_statements_are_no_ops() {
    assert_eq!(eval(";;\n;println(1)"), "1\n");
}

#[test]
fn operand_less_operator_reads_as_zero() {
    // the primitive has nothing to read and writes nothing, so the
    // node's result slot keeps its initial zero
    assert_eq!(eval("println(!)"), "0\n");
    assert_eq!(eval("println(~)"), "0\n");
}

#[test]
fn package_main_program_runs_its_body() {
    let src = indoc! {"
        package main
        func main() {
            a := 41
            println(a + 1)
        }
    "};
    assert_eq!(eval(src), "42\n");
}

#[test]
fn variables_persist_in_symbol_slots() {
    let mut ctx = Context::new();
    let root = parse(&mut ctx, "n := 0; i := 1; for ; i <= 5; i++ { n = n + i }");
    let program = resolve_program(&ctx, root);
    lower(&mut ctx, program);
    let mut interp = Interp::new();
    interp.run(&mut ctx, &mut NoopTracer);
    let n = ctx.syms.lookup("n").expect("n interned");
    assert_eq!(ctx.syms[n].value, Value::Int(15));
    let i = ctx.syms.lookup("i").expect("i interned");
    assert_eq!(ctx.syms[i].value, Value::Int(6));
}

#[test]
fn trace_records_executed_instructions() {
    let mut ctx = Context::new();
    let root = parse(&mut ctx, "a := 1; println(a)");
    let program = resolve_program(&ctx, root);
    lower(&mut ctx, program);
    let mut interp = Interp::new();
    interp.run(&mut ctx, &mut StepTracer::default());
    assert!(interp.out.contains("[0] $"));
    assert!(interp.out.contains("a := 1: 1"));
    assert!(interp.out.contains("println"));
    assert!(interp.out.ends_with("1\n") || interp.out.contains("\n1\n"));
}

#[test]
fn nested_control_flow() {
    let src = indoc! {"
        total := 0
        for i := 1; i <= 3; i++ {
            if i % 2 == 1 {
                total = total + i
            }
        }
        println(total)
    "};
    assert_eq!(eval(src), "4\n");
}
