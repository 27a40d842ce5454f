//! Shared interpreter state: the node arena, the symbol table, and the
//! CFG entry points. Built by the parser and lowering passes, executed
//! by the tree walk or the backend.

use crate::node::{NodeArena, NodeId, NodeKind, Prim, Slot};
use crate::symbol::{SymbolId, SymbolTable};
use crate::value::Value;

/// Interpreter state shared by compilation and execution.
#[derive(Debug, Default)]
pub struct Context {
    pub arena: NodeArena,
    pub syms: SymbolTable,
    /// AST root statement list, set by the parser.
    pub root: Option<NodeId>,
    /// CFG entry points; present semantics execute entry 0 only, the
    /// array is the extension point for parallel execution.
    pub entries: Vec<NodeId>,
}

impl Context {
    /// Fresh state with the language keywords, operators and built-ins
    /// seeded into the global symbol table.
    pub fn new() -> Self {
        let mut ctx = Context::default();
        ctx.seed();
        ctx
    }

    fn seed(&mut self) {
        use NodeKind::*;
        let table: &[(&str, NodeKind, i32, Prim)] = &[
            ("if", If, 0, Prim::Nop),
            ("while", While, 0, Prim::Nop),
            ("break", Break, 0, Prim::Nop),
            ("continue", Continue, 0, Prim::Nop),
            ("for", For, 0, Prim::Nop),
            ("func", Def, 0, Prim::Nop),
            ("return", Return, 0, Prim::Nop),
            ("eval", Fun, 0, Prim::Nop),
            ("print", Fun, 0, Prim::Nop),
            ("println", Fun, 0, Prim::Println),
            ("source", Fun, 0, Prim::Nop),
            ("dsym", Fun, 0, Prim::Nop),
            ("map", Fun, 0, Prim::Nop),
            ("nop", Op, 0, Prim::Nop),
            ("SL", Sl, 0, Prim::Nop),
            ("CB", NodeKind::CondBranch, 0, Prim::CondBranch),
            ("package", Namespace, 0, Prim::Nop),
            ("++", Ops, 0, Prim::Inc),
            ("--", Ops, 0, Prim::Dec),
            ("!", Op, 10, Prim::Not),
            ("+", Op, 8, Prim::Add),
            ("-", Op, 8, Prim::Sub),
            ("~", Op, 10, Prim::Com),
            ("^", Op, 10, Prim::Xor),
            ("*", Op, 9, Prim::Mul),
            ("/", Op, 9, Prim::Div),
            ("%", Op, 9, Prim::Mod),
            ("<", Op, 6, Prim::Lt),
            ("<=", Op, 6, Prim::Le),
            (">=", Op, 6, Prim::Ge),
            (">", Op, 6, Prim::Gt),
            ("==", Op, 5, Prim::Eq),
            ("!=", Op, 5, Prim::Ne),
            (":=", Op, 0, Prim::Assign),
            ("=", Op, 0, Prim::Assign),
            ("&&", Op, 2, Prim::LAnd),
            ("||", Op, 1, Prim::LOr),
            ("&", Op, 4, Prim::And),
            ("|", Op, 3, Prim::Or),
            ("<<", Op, 7, Prim::Shl),
            (">>", Op, 7, Prim::Shr),
        ];
        for &(name, kind, prio, prim) in table {
            self.syms.intern(name, kind, prio, prim);
        }
    }

    /// Read the value a slot resolves to.
    pub fn value(&self, slot: Slot) -> &Value {
        match slot {
            Slot::Node(id) => &self.arena[id].value,
            Slot::Sym(id) => &self.syms[id].value,
        }
    }

    /// Write through a slot.
    pub fn set_value(&mut self, slot: Slot, v: Value) {
        match slot {
            Slot::Node(id) => self.arena[id].value = v,
            Slot::Sym(id) => self.syms[id].value = v,
        }
    }

    /// The symbol a name resolves to, interning a fresh variable when
    /// the name is unknown.
    pub fn var(&mut self, name: &str) -> SymbolId {
        self.syms.intern(name, NodeKind::Var, 0, Prim::Nop)
    }
}
