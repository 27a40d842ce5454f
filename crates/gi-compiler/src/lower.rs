//! AST to CFG lowering.
//!
//! A postorder walk populates each node's `start`/`snext` fields and
//! synthesizes one COND_BRANCH node per control decision. No nodes are
//! copied: the CFG is an overlay on the AST, and loop back-edges are
//! plain arena indices.

use gi_core::{Context, FALSE_EDGE, NodeId, NodeKind, Prim, TRUE_EDGE};

/// Resolve the executable program inside a parsed root.
///
/// Source shaped as `package x; func main(...) { … }` resolves to the
/// body of `main`; anything else executes the root statement list
/// directly.
pub fn resolve_program(ctx: &Context, root: NodeId) -> NodeId {
    for &c in &ctx.arena[root].children {
        let node = &ctx.arena[c];
        if node.kind != NodeKind::Def || node.children.len() != 3 {
            continue;
        }
        let name = &ctx.arena[node.children[0]];
        let is_main = name
            .sym
            .is_some_and(|s| ctx.syms[s].name == "main");
        if is_main {
            return node.children[2];
        }
    }
    root
}

/// Overlay the CFG onto the subtree under `program` and register its
/// start as an entry point.
pub fn lower(ctx: &mut Context, program: NodeId) {
    for id in ctx.arena.postorder(program) {
        lower_node(ctx, id);
    }
    let entry = ctx.arena[program].start.unwrap_or(program);
    ctx.entries.push(entry);
}

fn is_leaf(ctx: &Context, id: NodeId) -> bool {
    ctx.arena[id].kind.is_leaf()
}

/// First executable node of a subtree, or `fallback` when the subtree
/// is a bare leaf and has nothing to execute.
fn entry_of(ctx: &Context, id: NodeId, fallback: NodeId) -> NodeId {
    ctx.arena[id].start.unwrap_or(fallback)
}

/// Synthesize a conditional-branch node sharing the condition subtree's
/// result slot.
fn add_cond_branch(ctx: &mut Context, cond: NodeId) -> NodeId {
    let pv = ctx.arena[cond].pv;
    let cb = ctx.arena.alloc(NodeKind::CondBranch);
    let sym = ctx.syms.lookup("CB");
    let node = &mut ctx.arena[cb];
    node.sym = sym;
    node.pv = pv;
    node.prim = Prim::CondBranch;
    cb
}

fn lower_node(ctx: &mut Context, id: NodeId) {
    match ctx.arena[id].kind {
        NodeKind::Fun | NodeKind::Op | NodeKind::Ops | NodeKind::Sl => lower_chain(ctx, id),
        NodeKind::If => lower_if(ctx, id),
        NodeKind::While => lower_while(ctx, id),
        NodeKind::For => lower_for(ctx, id),
        NodeKind::Term | NodeKind::Var => {}
        // other statement forms execute as a single (no-op) node
        _ => ctx.arena[id].start = Some(id),
    }
}

/// Operand chaining for statement lists, operators and calls: children
/// evaluate in order, and control reaches the node itself after its last
/// non-leaf child, so the primitive runs once its operands have values.
fn lower_chain(ctx: &mut Context, id: NodeId) {
    let children = ctx.arena[id].children.clone();
    let mut start = None;
    for &c in &children {
        if !is_leaf(ctx, c) {
            start = ctx.arena[c].start;
            break;
        }
    }
    ctx.arena[id].start = Some(start.unwrap_or(id));
    for pair in children.windows(2) {
        let next_start = ctx.arena[pair[1]].start;
        ctx.arena[pair[0]].snext = next_start;
    }
    for &c in children.iter().rev() {
        if !is_leaf(ctx, c) {
            ctx.arena[c].snext = Some(id);
            break;
        }
    }
}

fn lower_if(ctx: &mut Context, id: NodeId) {
    let children = ctx.arena[id].children.clone();
    if children.len() < 2 {
        ctx.arena[id].start = Some(id);
        return;
    }
    let (cond, then) = (children[0], children[1]);
    let cb = add_cond_branch(ctx, cond);
    let cond_entry = entry_of(ctx, cond, cb);
    ctx.arena[id].start = Some(cond_entry);
    ctx.arena[cond].snext = Some(cb);
    ctx.arena[then].snext = Some(id);
    ctx.arena[cb].next[TRUE_EDGE] = Some(entry_of(ctx, then, id));
    if let Some(&els) = children.get(2) {
        ctx.arena[els].snext = Some(id);
        ctx.arena[cb].next[FALSE_EDGE] = Some(entry_of(ctx, els, id));
    } else {
        ctx.arena[cb].next[FALSE_EDGE] = Some(id);
    }
}

fn lower_while(ctx: &mut Context, id: NodeId) {
    let children = ctx.arena[id].children.clone();
    if children.len() < 2 {
        ctx.arena[id].start = Some(id);
        return;
    }
    let (cond, body) = (children[0], children[1]);
    let cb = add_cond_branch(ctx, cond);
    let cond_entry = entry_of(ctx, cond, cb);
    ctx.arena[id].start = Some(cond_entry);
    ctx.arena[cond].snext = Some(cb);
    ctx.arena[body].snext = Some(cond_entry);
    ctx.arena[cb].next[TRUE_EDGE] = Some(entry_of(ctx, body, id));
    ctx.arena[cb].next[FALSE_EDGE] = Some(id);
}

fn lower_for(ctx: &mut Context, id: NodeId) {
    let children = ctx.arena[id].children.clone();
    if children.len() < 4 {
        ctx.arena[id].start = Some(id);
        return;
    }
    let (init, cond, post, body) = (children[0], children[1], children[2], children[3]);
    let cb = add_cond_branch(ctx, cond);
    let cond_entry = entry_of(ctx, cond, cb);
    let post_entry = entry_of(ctx, post, cond_entry);
    ctx.arena[id].start = Some(entry_of(ctx, init, cond_entry));
    ctx.arena[init].snext = Some(cond_entry);
    ctx.arena[cond].snext = Some(cb);
    ctx.arena[cb].next[TRUE_EDGE] = Some(entry_of(ctx, body, post_entry));
    ctx.arena[cb].next[FALSE_EDGE] = Some(id);
    ctx.arena[body].snext = Some(post_entry);
    ctx.arena[post].snext = Some(cond_entry);
}
