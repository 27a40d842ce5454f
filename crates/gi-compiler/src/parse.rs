//! Parser: token stream to AST.
//!
//! `parse_one` consumes exactly one token and dispatches on its class to
//! a per-class constructor; `statement` strings constructed nodes
//! together, applying C operator precedence by restructuring the tree in
//! place; `statement_list` repeats until the input is exhausted.
//!
//! There are no parse diagnostics: a BAD token (or exhausted input)
//! constructs no node and ends the current form, and parsing continues
//! best-effort after it.

use gi_core::{Context, NodeId, NodeKind, Slot, Value};

use crate::scan::{Scan, TokenKind, scan, unscan};

/// Parse a whole source text into a statement-list root. The root is
/// recorded in the context.
pub fn parse(ctx: &mut Context, src: &str) -> NodeId {
    let mut p = Parser {
        ctx: &mut *ctx,
        rest: src,
    };
    let root = p.statement_list();
    ctx.root = Some(root);
    root
}

struct Parser<'c, 's> {
    ctx: &'c mut Context,
    rest: &'s str,
}

impl<'c, 's> Parser<'c, 's> {
    /// Run `f` with the cursor swapped to a block body, then restore it.
    fn enter<R>(&mut self, body: &'s str, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(&mut self.rest, body);
        let r = f(self);
        self.rest = saved;
        r
    }

    /// Statement list: parse statements until the input runs out.
    fn statement_list(&mut self) -> NodeId {
        let node = self.ctx.arena.alloc(NodeKind::Sl);
        let sym = self.ctx.syms.lookup("SL");
        self.ctx.arena[node].sym = sym;
        while !self.rest.is_empty() {
            let before = self.rest.len();
            if let Some(stmt) = self.statement() {
                self.ctx.arena.append_child(node, stmt);
            } else if self.rest.len() == before {
                // nothing consumed: stop rather than spin
                break;
            }
        }
        node
    }

    /// One statement: an expression or control form, with operator
    /// precedence applied. A pure separator run yields `None`.
    fn statement(&mut self) -> Option<NodeId> {
        let mut first: Option<NodeId> = None;
        while !self.rest.is_empty() {
            let sc = scan(&mut self.rest);
            if sc.kind == TokenKind::Csep {
                break;
            }
            // a brace after the statement began belongs to the
            // enclosing control form: `if cond { … }`
            if first.is_some() && sc.kind == TokenKind::Brace {
                unscan(&mut self.rest, &sc);
                break;
            }
            let Some(node) = self.construct(&sc) else {
                break;
            };
            match first {
                None => first = Some(node),
                Some(f) => {
                    if self.ctx.arena[node].kind == NodeKind::Op {
                        first = Some(self.splice(f, node));
                    } else {
                        // statements do not concatenate without an operator
                        unscan(&mut self.rest, &sc);
                        break;
                    }
                }
            }
            if self.ctx.arena[node].kind < NodeKind::Op {
                break;
            }
        }
        first
    }

    /// A statement operand for a control form; an empty statement
    /// becomes an empty (no-op) statement list so the CFG stays wired.
    fn statement_or_empty(&mut self) -> NodeId {
        match self.statement() {
            Some(n) => n,
            None => {
                let node = self.ctx.arena.alloc(NodeKind::Sl);
                self.ctx.arena[node].sym = self.ctx.syms.lookup("SL");
                node
            }
        }
    }

    /// Splice a freshly read infix operator into the statement tree:
    /// walk the rightmost spine of `first` until precedence no longer
    /// binds tighter, then take that position, making the displaced
    /// subtree the operator's first child.
    fn splice(&mut self, first: NodeId, node: NodeId) -> NodeId {
        let prio = self.ctx.arena[node].prio;
        let mut at = Some(first);
        while let Some(n) = at {
            let (kind, nprio, nchildren, right, anc) = {
                let cur = &self.ctx.arena[n];
                (
                    cur.kind,
                    cur.prio,
                    cur.children.len(),
                    cur.children.get(1).copied(),
                    cur.anc,
                )
            };
            if kind != NodeKind::Op || prio <= nprio || nchildren == 1 {
                if n == first {
                    self.ctx.arena.insert_child(node, n);
                    return node;
                }
                if let Some(anc) = anc {
                    self.ctx.arena.replace_child(anc, n, node);
                }
                self.ctx.arena.insert_child(node, n);
                return first;
            }
            at = right;
        }
        // no spliceable position: drop the operator
        first
    }

    /// Consume exactly one token and construct its node.
    fn parse_one(&mut self) -> Option<NodeId> {
        let sc = scan(&mut self.rest);
        self.construct(&sc)
    }

    fn construct(&mut self, sc: &Scan<'s>) -> Option<NodeId> {
        match sc.kind {
            TokenKind::Int => Some(self.term(Value::Int(sc.num))),
            TokenKind::Float => Some(self.term(Value::Float(sc.fnum))),
            TokenKind::Str => Some(self.term(Value::Str(sc.text.to_owned()))),
            TokenKind::Paren => self.parse_paren(sc.text),
            TokenKind::Bracket => Some(self.parse_bracket(sc.text)),
            TokenKind::Brace => Some(self.enter(sc.text, |p| p.statement_list())),
            TokenKind::Oper => Some(self.parse_oper(sc.text)),
            TokenKind::Id => Some(self.parse_id(sc.text)),
            TokenKind::Bad | TokenKind::Bstr | TokenKind::Csep | TokenKind::Lsep => None,
        }
    }

    fn term(&mut self, v: Value) -> NodeId {
        let node = self.ctx.arena.alloc(NodeKind::Term);
        self.ctx.arena[node].value = v;
        node
    }

    /// Parenthesized expression: the inner statement with its precedence
    /// overridden so the splice walk treats it as an atom.
    fn parse_paren(&mut self, body: &'s str) -> Option<NodeId> {
        let node = self.enter(body, |p| p.statement())?;
        self.ctx.arena[node].prio = 20;
        Some(node)
    }

    /// Parenthesized statement list wrapped in an SL node; used for
    /// function parameter lists.
    fn parse_parenthesis(&mut self, body: &'s str) -> NodeId {
        let node = self.ctx.arena.alloc(NodeKind::Sl);
        self.ctx.arena[node].sym = self.ctx.syms.lookup("SL");
        if let Some(stmt) = self.enter(body, |p| p.statement()) {
            self.ctx.arena.append_child(node, stmt);
        }
        node
    }

    fn parse_bracket(&mut self, body: &'s str) -> NodeId {
        let node = self.ctx.arena.alloc(NodeKind::Array);
        if let Some(stmt) = self.enter(body, |p| p.statement()) {
            self.ctx.arena.append_child(node, stmt);
        }
        node
    }

    /// Operator token: OPS takes no operand here (the caller supplies
    /// it), OP takes one following token as its operand.
    fn parse_oper(&mut self, text: &str) -> NodeId {
        let node = self.ctx.arena.alloc(NodeKind::Op);
        if let Some(sym) = self.ctx.syms.lookup(text) {
            let s = &self.ctx.syms[sym];
            let (kind, prio, prim) = (s.kind, s.prio, s.prim);
            let n = &mut self.ctx.arena[node];
            n.sym = Some(sym);
            n.kind = kind;
            n.prio = prio;
            n.prim = prim;
        } else {
            self.ctx.arena[node].kind = NodeKind::Undef;
        }
        if self.ctx.arena[node].kind != NodeKind::Ops
            && let Some(child) = self.parse_one()
        {
            self.ctx.arena.append_child(node, child);
        }
        node
    }

    /// Identifier: resolve against the symbol table (interning a fresh
    /// variable when unknown), then parse the form's operands according
    /// to the symbol's kind.
    fn parse_id(&mut self, text: &str) -> NodeId {
        let sym = match self.ctx.syms.lookup(text) {
            Some(s) => s,
            None => self.ctx.var(text),
        };
        let (kind, prio, prim) = {
            let s = &self.ctx.syms[sym];
            (s.kind, s.prio, s.prim)
        };
        let node = self.ctx.arena.alloc(kind);
        {
            let n = &mut self.ctx.arena[node];
            n.sym = Some(sym);
            n.prio = prio;
            n.prim = prim;
        }
        match kind {
            NodeKind::Namespace => {
                if let Some(child) = self.parse_one() {
                    self.ctx.arena.append_child(node, child);
                }
            }
            NodeKind::Def => {
                // name
                if let Some(name) = self.parse_one() {
                    self.ctx.arena.append_child(node, name);
                }
                // parameter list, scanned as an explicit paren token
                let sc = scan(&mut self.rest);
                let params = if sc.kind == TokenKind::Paren {
                    self.parse_parenthesis(sc.text)
                } else {
                    unscan(&mut self.rest, &sc);
                    self.parse_parenthesis("")
                };
                self.ctx.arena.append_child(node, params);
                // body
                if let Some(body) = self.parse_one() {
                    self.ctx.arena.append_child(node, body);
                }
            }
            NodeKind::For => {
                for _ in 0..4 {
                    let stmt = self.statement_or_empty();
                    self.ctx.arena.append_child(node, stmt);
                }
            }
            NodeKind::While => {
                for _ in 0..2 {
                    let stmt = self.statement_or_empty();
                    self.ctx.arena.append_child(node, stmt);
                }
            }
            NodeKind::If => {
                let cond = self.statement_or_empty();
                self.ctx.arena.append_child(node, cond);
                let then = self.statement_or_empty();
                self.ctx.arena.append_child(node, then);
                let sc = scan(&mut self.rest);
                if sc.kind == TokenKind::Id && sc.text == "else" {
                    let els = self.statement_or_empty();
                    self.ctx.arena.append_child(node, els);
                } else {
                    unscan(&mut self.rest, &sc);
                }
            }
            NodeKind::Return => {
                if let Some(stmt) = self.statement() {
                    self.ctx.arena.append_child(node, stmt);
                }
            }
            NodeKind::Fun => {
                while let Some(arg) = self.parse_one() {
                    self.ctx.arena.append_child(node, arg);
                }
            }
            NodeKind::Op => {
                if let Some(child) = self.parse_one() {
                    self.ctx.arena.append_child(node, child);
                }
            }
            NodeKind::Var => {
                self.ctx.arena[node].pv = Slot::Sym(sym);
                // postfix unary: the variable becomes the operator's child
                let save = self.rest;
                let sc = scan(&mut self.rest);
                let postfix = sc.kind == TokenKind::Oper
                    && self
                        .ctx
                        .syms
                        .lookup(sc.text)
                        .is_some_and(|s| self.ctx.syms[s].kind == NodeKind::Ops);
                self.rest = save;
                if postfix && let Some(ops) = self.parse_one() {
                    self.ctx.arena.append_child(ops, node);
                    return ops;
                }
            }
            _ => {}
        }
        node
    }
}
