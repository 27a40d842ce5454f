//! Tree-walk interpreter.
//!
//! Execution starts at a CFG entry point and follows `snext` edges,
//! invoking each node's primitive. A primitive reads its operands
//! through the children's value pointers and writes its result through
//! the node's own; the COND_BRANCH primitive redirects its `snext` to
//! the true or false branch instead.

use gi_core::{Context, NodeId, Prim, Quote, Value};

use super::error::RuntimeError;
use super::trace::Tracer;

/// Interpreter over a lowered context. Owns the pending output buffer.
#[derive(Debug, Default)]
pub struct Interp {
    pub out: String,
}

impl Interp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute from the first entry point to completion. Runtime faults
    /// are reported to standard error and execution continues.
    pub fn run(&mut self, ctx: &mut Context, tracer: &mut dyn Tracer) {
        let Some(&entry) = ctx.entries.first() else {
            return;
        };
        let mut at = Some(entry);
        while let Some(id) = at {
            if let Err(err) = self.exec(ctx, id) {
                eprintln!("run error: {err}");
            }
            tracer.step(ctx, id, &mut self.out);
            at = ctx.arena[id].snext;
        }
    }

    fn exec(&mut self, ctx: &mut Context, id: NodeId) -> Result<(), RuntimeError> {
        let prim = ctx.arena[id].prim;
        match prim {
            Prim::Nop => {}
            Prim::CondBranch => {
                let taken = ctx.value(ctx.arena[id].pv).as_int() != 0;
                let target = ctx.arena[id].next[taken as usize];
                ctx.arena[id].snext = target;
            }
            Prim::Assign => {
                let children = ctx.arena[id].children.clone();
                if let [target, src, ..] = children.as_slice() {
                    let v = ctx.value(ctx.arena[*src].pv).clone();
                    ctx.set_value(ctx.arena[*target].pv, v.clone());
                    ctx.set_value(ctx.arena[id].pv, v);
                }
            }
            Prim::Inc | Prim::Dec => {
                if let Some(&target) = ctx.arena[id].children.first() {
                    let slot = ctx.arena[target].pv;
                    let n = ctx.value(slot).as_int();
                    let step = if prim == Prim::Dec { -1 } else { 1 };
                    ctx.set_value(slot, Value::Int(n.wrapping_add(step)));
                }
            }
            Prim::Println => {
                let children = ctx.arena[id].children.clone();
                for c in children {
                    let v = ctx.value(ctx.arena[c].pv).clone();
                    v.render(Quote::Plain, &mut self.out);
                }
                self.out.push('\n');
            }
            _ => self.exec_op(ctx, id, prim)?,
        }
        Ok(())
    }

    /// Arithmetic, bitwise, comparison and logical operators. A single
    /// child evaluates with an implicit zero left operand.
    fn exec_op(&mut self, ctx: &mut Context, id: NodeId, prim: Prim) -> Result<(), RuntimeError> {
        let children = ctx.arena[id].children.clone();
        let (a, b) = match children.as_slice() {
            [only] => (0, ctx.value(ctx.arena[*only].pv).as_int()),
            [lhs, rhs, ..] => (
                ctx.value(ctx.arena[*lhs].pv).as_int(),
                ctx.value(ctx.arena[*rhs].pv).as_int(),
            ),
            [] => return Ok(()),
        };
        let v = eval_int_op(prim, a, b)?;
        ctx.set_value(ctx.arena[id].pv, Value::Int(v));
        Ok(())
    }
}

/// Integer evaluation shared by the operator primitives.
pub(crate) fn eval_int_op(prim: Prim, a: i64, b: i64) -> Result<i64, RuntimeError> {
    Ok(match prim {
        Prim::Add => a.wrapping_add(b),
        Prim::Sub => a.wrapping_sub(b),
        Prim::Mul => a.wrapping_mul(b),
        Prim::Div => {
            if b == 0 {
                return Err(RuntimeError::DivideByZero);
            }
            a.wrapping_div(b)
        }
        Prim::Mod => {
            if b == 0 {
                return Err(RuntimeError::DivideByZero);
            }
            a.wrapping_rem(b)
        }
        Prim::And => a & b,
        Prim::Or => a | b,
        Prim::Xor => a ^ b,
        Prim::Shl => a.wrapping_shl(b as u32),
        Prim::Shr => a.wrapping_shr(b as u32),
        Prim::Eq => (a == b) as i64,
        Prim::Ne => (a != b) as i64,
        Prim::Lt => (a < b) as i64,
        Prim::Le => (a <= b) as i64,
        Prim::Gt => (a > b) as i64,
        Prim::Ge => (a >= b) as i64,
        Prim::Not => (b == 0) as i64,
        Prim::Com => !b,
        Prim::LAnd => (a != 0 && b != 0) as i64,
        Prim::LOr => (a != 0 || b != 0) as i64,
        _ => 0,
    })
}
