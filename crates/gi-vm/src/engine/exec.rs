//! Register-machine executor for backend-emitted code.
//!
//! Shares divide-by-zero reporting and wrapping integer semantics with
//! the tree-walk primitives, so both strategies print identical output
//! and leave identical symbol state for the supported operator set.

use std::fmt::Write as _;

use gi_core::{AluOp, Code, Cond, Context, Insn, NUM_REGS, Operand, Value};

/// Run `code` to completion against the context's symbol slots,
/// appending program output to `out`.
pub fn execute(code: &Code, ctx: &mut Context, out: &mut String) {
    let mut regs = [0i64; NUM_REGS];
    let mut pc = 0usize;
    while pc < code.insns.len() {
        match code.insns[pc] {
            Insn::MovRR { dst, src } => regs[dst.index()] = regs[src.index()],
            Insn::MovRI { dst, imm } => regs[dst.index()] = imm,
            Insn::Load { dst, sym } => regs[dst.index()] = ctx.syms[sym].value.as_int(),
            Insn::Store { sym, src } => ctx.syms[sym].value = Value::Int(regs[src.index()]),
            Insn::AluRR { op, dst, a, b } => {
                if let Some(v) = alu(op, regs[a.index()], regs[b.index()]) {
                    regs[dst.index()] = v;
                }
            }
            Insn::AluRI { op, dst, a, imm } => {
                if let Some(v) = alu(op, regs[a.index()], imm) {
                    regs[dst.index()] = v;
                }
            }
            Insn::Neg { dst, src } => regs[dst.index()] = regs[src.index()].wrapping_neg(),
            Insn::Com { dst, src } => regs[dst.index()] = !regs[src.index()],
            Insn::Branch { cond, a, b, target } => {
                let b = match b {
                    Operand::Reg(r) => regs[r.index()],
                    Operand::Imm(imm) => imm,
                };
                if test(cond, regs[a.index()], b) {
                    pc = code.target(target);
                    continue;
                }
            }
            Insn::Jump { target } => {
                pc = code.target(target);
                continue;
            }
            Insn::Print { src } => {
                let _ = write!(out, "{}", regs[src.index()]);
            }
            Insn::PrintNl => out.push('\n'),
        }
        pc += 1;
    }
}

/// ALU evaluation; `None` leaves the destination unchanged (divide by
/// zero, reported to standard error).
fn alu(op: AluOp, a: i64, b: i64) -> Option<i64> {
    Some(match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::Mul => a.wrapping_mul(b),
        AluOp::Div => {
            if b == 0 {
                eprintln!("run error: divide by zero");
                return None;
            }
            a.wrapping_div(b)
        }
        AluOp::Rem => {
            if b == 0 {
                eprintln!("run error: divide by zero");
                return None;
            }
            a.wrapping_rem(b)
        }
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        AluOp::Shl => a.wrapping_shl(b as u32),
        AluOp::Shr => a.wrapping_shr(b as u32),
        AluOp::Eq => (a == b) as i64,
        AluOp::Ne => (a != b) as i64,
        AluOp::Lt => (a < b) as i64,
        AluOp::Le => (a <= b) as i64,
        AluOp::Gt => (a > b) as i64,
        AluOp::Ge => (a >= b) as i64,
    })
}

fn test(cond: Cond, a: i64, b: i64) -> bool {
    match cond {
        Cond::Eq => a == b,
        Cond::Ne => a != b,
        Cond::Lt => a < b,
        Cond::Le => a <= b,
        Cond::Gt => a > b,
        Cond::Ge => a >= b,
    }
}
