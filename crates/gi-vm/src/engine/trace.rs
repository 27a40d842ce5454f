//! Execution tracing.
//!
//! The tree-walk loop notifies a `Tracer` after each executed node.
//! `StepTracer` renders one line per effective instruction into the
//! pending output buffer, in the form
//! `[tid] $serial: operands: value`.

use std::fmt::Write as _;

use gi_core::{Context, NodeId, NodeKind, Prim, Quote};

pub trait Tracer {
    fn step(&mut self, ctx: &Context, id: NodeId, out: &mut String);
}

/// Tracer that records nothing.
#[derive(Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn step(&mut self, _ctx: &Context, _id: NodeId, _out: &mut String) {}
}

/// Per-instruction tracer for the `-v` option.
#[derive(Debug, Default)]
pub struct StepTracer {
    /// Thread id shown in the trace; entry 0 in the present semantics.
    pub tid: usize,
}

impl Tracer for StepTracer {
    fn step(&mut self, ctx: &Context, id: NodeId, out: &mut String) {
        let node = &ctx.arena[id];
        if node.prim == Prim::Nop || node.kind == NodeKind::Sl {
            return;
        }
        let _ = write!(out, "[{}] ${id}:", self.tid);
        let mut rest = 0;
        if node.kind == NodeKind::Op && !node.children.is_empty() {
            operand(ctx, node.children[0], true, out);
            rest = 1;
        }
        operand(ctx, id, false, out);
        for &c in node.children.iter().skip(rest) {
            operand(ctx, c, true, out);
        }
        out.push_str(": ");
        ctx.value(node.pv).render(Quote::Quoted, out);
        out.push('\n');
    }
}

fn operand(ctx: &Context, id: NodeId, flow: bool, out: &mut String) {
    let node = &ctx.arena[id];
    match node.kind {
        NodeKind::Term => {
            out.push(' ');
            ctx.value(node.pv).render(Quote::Quoted, out);
        }
        NodeKind::Sl => out.push_str(" SL"),
        NodeKind::Var => {
            let name = node.sym.map(|s| ctx.syms[s].name.as_str()).unwrap_or("?");
            let _ = write!(out, " {name}");
        }
        _ => {
            if flow {
                let _ = write!(out, " ${id}");
            } else {
                let name = node.sym.map(|s| ctx.syms[s].name.as_str()).unwrap_or("?");
                let _ = write!(out, " {name}");
            }
        }
    }
}
