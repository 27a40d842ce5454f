//! Unit tests for backend code generation.

use gi_core::{Context, Insn, Reg, VAR_REGS};

use super::codegen::{EmitError, compile};
use super::emitter::{CodeBuf, Emitter as _};
use crate::lower::resolve_program;
use crate::parse::parse;

fn emit(src: &str) -> (Context, gi_core::Code) {
    let mut ctx = Context::new();
    let root = parse(&mut ctx, src);
    let program = resolve_program(&ctx, root);
    let mut buf = CodeBuf::new();
    compile(&mut ctx, program, &mut buf).expect("codegen");
    (ctx, buf.finish())
}

#[test]
fn assignment_emits_an_immediate_move() {
    let (ctx, code) = emit("a := 2; println(a)");
    let a = ctx.syms.lookup("a").expect("a interned");
    assert!(ctx.syms[a].reg.is_some(), "a wins a register");
    assert!(
        code.insns
            .iter()
            .any(|i| matches!(i, Insn::MovRI { imm: 2, .. }))
    );
    assert!(code.insns.iter().any(|i| matches!(i, Insn::Print { .. })));
    assert!(code.insns.contains(&Insn::PrintNl));
}

#[test]
fn variables_load_in_a_prologue_and_store_in_an_epilogue() {
    let (ctx, code) = emit("a := 1; b := a + 1");
    let a = ctx.syms.lookup("a").unwrap();
    let b = ctx.syms.lookup("b").unwrap();
    // prologue: loads come first, one per register-resident variable
    assert_eq!(code.insns[0], Insn::Load { dst: ctx.syms[a].reg.unwrap(), sym: a });
    assert_eq!(code.insns[1], Insn::Load { dst: ctx.syms[b].reg.unwrap(), sym: b });
    // epilogue: both stored back
    let n = code.insns.len();
    assert!(matches!(code.insns[n - 2], Insn::Store { .. }));
    assert!(matches!(code.insns[n - 1], Insn::Store { .. }));
}

#[test]
fn loops_branch_backward() {
    let (_, code) = emit("i := 0; while i < 3 { i++ }");
    let jump_back = code.insns.iter().enumerate().any(|(at, i)| match i {
        Insn::Jump { target } => code.target(*target) <= at,
        _ => false,
    });
    assert!(jump_back, "while body ends with a backward jump");
    assert!(
        code.insns
            .iter()
            .any(|i| matches!(i, Insn::Branch { .. })),
        "condition exits through a branch"
    );
}

#[test]
fn spilled_variables_go_through_their_slots() {
    // more variables than the register pool
    let src = "a := 1; b := 2; c := 3; d := 4; e := 5; f := 6; g := 7; h := 8; i := 9; j := 10; println(i + j)";
    let (ctx, code) = emit(src);
    let i = ctx.syms.lookup("i").unwrap();
    let j = ctx.syms.lookup("j").unwrap();
    assert!(ctx.syms[i].reg.is_none());
    assert!(ctx.syms[j].reg.is_none());
    assert!(code.insns.contains(&Insn::Store { sym: i, src: Reg(VAR_REGS) }));
    assert!(
        code.insns
            .iter()
            .any(|insn| matches!(insn, Insn::Load { sym, .. } if *sym == j)),
        "spilled read loads from the slot"
    );
}

#[test]
fn deep_expressions_overflow_the_scratch_window() {
    let mut expr = String::from("1");
    for _ in 0..20 {
        expr = format!("1 + ({expr})");
    }
    let mut ctx = Context::new();
    let root = parse(&mut ctx, &format!("println({expr})"));
    let program = resolve_program(&ctx, root);
    let mut buf = CodeBuf::new();
    let err = compile(&mut ctx, program, &mut buf);
    assert!(matches!(err, Err(EmitError::OutOfRegisters)));
}

#[test]
fn labels_bind_and_patch_forward_references() {
    let mut buf = CodeBuf::new();
    let l = buf.label();
    buf.jump(l);
    buf.mov_ri(Reg(8), 1);
    buf.bind(l);
    buf.print_nl();
    let code = buf.finish();
    assert_eq!(code.target(l), 2);
}

#[test]
fn dead_forms_emit_nothing() {
    let (_, code) = emit("package main");
    // prologue load for the package-name variable plus its store back
    assert!(
        code.insns
            .iter()
            .all(|i| matches!(i, Insn::Load { .. } | Insn::Store { .. })),
        "namespace statements produce no executable code"
    );
}
