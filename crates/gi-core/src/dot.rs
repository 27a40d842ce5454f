//! Graph-description output for the AST and the CFG.
//!
//! Both renderers produce `dot(1)` digraph text: nodes are identified by
//! their serial number, labels carry the kind and value. CFG true
//! branches are colored green, false branches red, entry points red.

use std::fmt::Write as _;

use crate::context::Context;
use crate::node::{FALSE_EDGE, NodeId, NodeKind, TRUE_EDGE};
use crate::value::Quote;

fn node_label(ctx: &Context, id: NodeId, flow: bool, out: &mut String) {
    let node = &ctx.arena[id];
    match node.kind {
        NodeKind::Term => {
            let _ = write!(out, " {id}: ");
            let quote = if flow { Quote::Plain } else { Quote::Escaped };
            ctx.value(node.pv).render(quote, out);
        }
        NodeKind::Sl => {
            let _ = write!(out, " {id}: {}", node.kind);
        }
        NodeKind::Var => {
            let name = node.sym.map(|s| ctx.syms[s].name.as_str()).unwrap_or("?");
            let _ = write!(out, " {id}: {name}");
        }
        _ => {
            if flow {
                let _ = write!(out, " ${id}:");
            } else {
                match node.sym {
                    Some(s) => {
                        let _ = write!(out, " {id}: {}", ctx.syms[s].name);
                    }
                    None => {
                        let _ = write!(out, " {id}: undefined");
                    }
                }
            }
        }
    }
}

/// Render the AST under `root` as a `digraph ast`.
pub fn render_ast(ctx: &Context, root: NodeId) -> String {
    let mut out = String::from("digraph ast {\n");
    for id in ctx.arena.preorder(root) {
        let node = &ctx.arena[id];
        let _ = write!(out, "{id} [type=\"{}\", label=\"", node.kind);
        node_label(ctx, id, false, &mut out);
        out.push_str("\"]\n");
        if let Some(anc) = node.anc {
            let _ = writeln!(out, "{anc} -> {id}");
        }
    }
    out.push_str("}\n");
    out
}

/// Render the CFG overlay under `root` as a `digraph cfg`.
///
/// Leaves and BREAK/CONTINUE are omitted; a node whose successor is a
/// COND_BRANCH draws its branch edges directly.
pub fn render_cfg(ctx: &Context, root: NodeId) -> String {
    let mut out = String::from("digraph cfg {\n");
    for id in ctx.arena.postorder(root) {
        let node = &ctx.arena[id];
        if matches!(
            node.kind,
            NodeKind::Term | NodeKind::Var | NodeKind::Break | NodeKind::Continue
        ) {
            continue;
        }
        let _ = write!(out, "{id} [label=\"{id}:");
        let mut rest = 0;
        if node.kind == NodeKind::Op && !node.children.is_empty() {
            node_label(ctx, node.children[0], true, &mut out);
            rest = 1;
        }
        node_label(ctx, id, false, &mut out);
        for &c in node.children.iter().skip(rest) {
            node_label(ctx, c, true, &mut out);
        }
        out.push_str("\"]\n");

        let Some(sn) = node.snext else { continue };
        let succ = &ctx.arena[sn];
        if let Some(t) = succ.next[TRUE_EDGE] {
            let _ = writeln!(out, "{id} -> {t} [color=green]");
        }
        if let Some(f) = succ.next[FALSE_EDGE] {
            let _ = writeln!(out, "{id} -> {f} [color=red]");
        }
        if succ.next[TRUE_EDGE].is_none() && succ.next[FALSE_EDGE].is_none() {
            let _ = writeln!(out, "{id} -> {sn}");
        }
    }
    for &e in &ctx.entries {
        let _ = writeln!(out, "{e} [color=red]");
    }
    out.push_str("}\n");
    out
}
