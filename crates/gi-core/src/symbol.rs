//! Symbols and the interned symbol table.

use indexmap::IndexMap;

use crate::code::Reg;
use crate::node::{NodeKind, Prim};
use crate::value::Value;

/// Index of a symbol in the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named binding: keyword, operator, built-in, or variable.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub kind: NodeKind,
    /// Operator precedence; higher binds tighter.
    pub prio: i32,
    /// Primitive dispatched for nodes bound to this symbol.
    pub prim: Prim,
    /// Runtime value slot (variables).
    pub value: Value,
    /// Backend register assigned to this symbol, if any.
    pub reg: Option<Reg>,
}

/// Interned symbol table, keyed by owned copies of identifier lexemes.
/// Insertion order is stable, so keyword seeding and auto-declared
/// variables enumerate deterministically.
#[derive(Debug, Default)]
pub struct SymbolTable {
    syms: IndexMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.syms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syms.is_empty()
    }

    /// Add a symbol, returning its id. An existing symbol of the same
    /// name is left untouched.
    pub fn intern(&mut self, name: &str, kind: NodeKind, prio: i32, prim: Prim) -> SymbolId {
        if let Some(idx) = self.syms.get_index_of(name) {
            return SymbolId(idx as u32);
        }
        let idx = self.syms.len();
        self.syms.insert(
            name.to_owned(),
            Symbol {
                name: name.to_owned(),
                kind,
                prio,
                prim,
                value: Value::default(),
                reg: None,
            },
        );
        SymbolId(idx as u32)
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.syms.get_index_of(name).map(|i| SymbolId(i as u32))
    }

    /// Iterate over all symbols in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.syms
            .values()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }
}

impl std::ops::Index<SymbolId> for SymbolTable {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        &self.syms[id.index()]
    }
}

impl std::ops::IndexMut<SymbolId> for SymbolTable {
    fn index_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.syms[id.index()]
    }
}
