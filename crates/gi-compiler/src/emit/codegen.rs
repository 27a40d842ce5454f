//! Code generation: a postorder walk over the AST that emits
//! register-machine instructions equivalent to the tree walk.
//!
//! Variables get a register from a fixed pool on first touch and keep
//! it for the whole program; once the pool is exhausted, accesses go
//! through the symbol's value slot with load/store. Expression
//! temporaries use a scratch window addressed by expression depth.
//! Control flow uses labels patched when the matching arm is emitted.

use gi_core::{
    AluOp, Cond, Context, NodeId, NodeKind, Operand, Prim, Reg, SCRATCH_REGS, SymbolId, VAR_REGS,
    Value,
};

use super::emitter::Emitter;

/// Code generation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EmitError {
    /// Expression nesting exceeded the scratch register window.
    #[error("expression too deep for the register pool")]
    OutOfRegisters,
}

/// Compile the program subtree into `e`.
///
/// A prologue assigns the register pool to variables in order of first
/// appearance and loads their current values, so loop bodies never
/// reload a register-resident variable; an epilogue stores every
/// register back to its symbol slot, so both execution strategies leave
/// identical symbol state.
pub fn compile(
    ctx: &mut Context,
    program: NodeId,
    e: &mut impl Emitter,
) -> Result<(), EmitError> {
    let mut g = CodeGen {
        ctx,
        assigned: Vec::new(),
    };
    let mut nvars = 0u8;
    for id in g.ctx.arena.preorder(program) {
        if nvars >= VAR_REGS {
            break;
        }
        let node = &g.ctx.arena[id];
        if node.kind != NodeKind::Var {
            continue;
        }
        let Some(sym) = node.sym else { continue };
        if g.ctx.syms[sym].reg.is_some() {
            continue;
        }
        let reg = Reg(nvars);
        nvars += 1;
        g.ctx.syms[sym].reg = Some(reg);
        g.assigned.push(sym);
        e.load(reg, sym);
    }
    g.stmt(e, program)?;
    for &sym in &g.assigned {
        if let Some(reg) = g.ctx.syms[sym].reg {
            e.store(sym, reg);
        }
    }
    Ok(())
}

struct CodeGen<'c> {
    ctx: &'c mut Context,
    /// Symbols holding a register, in allocation order.
    assigned: Vec<SymbolId>,
}

impl<'c> CodeGen<'c> {
    /// Scratch register for expression depth `sp`.
    fn scratch(&self, sp: u8) -> Result<Reg, EmitError> {
        if sp >= SCRATCH_REGS {
            return Err(EmitError::OutOfRegisters);
        }
        Ok(Reg(VAR_REGS + sp))
    }

    /// Register held by a variable, if it won one in the prologue.
    fn var_reg(&self, sym: SymbolId) -> Option<Reg> {
        self.ctx.syms[sym].reg
    }

    /// A scratch register holding zero: the value an unwritten result
    /// slot reads as under the tree walk.
    fn zero(&mut self, e: &mut impl Emitter, sp: u8) -> Result<Reg, EmitError> {
        let dst = self.scratch(sp)?;
        e.mov_ri(dst, 0);
        Ok(dst)
    }

    fn stmt(&mut self, e: &mut impl Emitter, id: NodeId) -> Result<(), EmitError> {
        match self.ctx.arena[id].kind {
            NodeKind::Sl => {
                for c in self.ctx.arena[id].children.clone() {
                    self.stmt(e, c)?;
                }
            }
            NodeKind::If => self.stmt_if(e, id)?,
            NodeKind::While => self.stmt_while(e, id)?,
            NodeKind::For => self.stmt_for(e, id)?,
            NodeKind::Op | NodeKind::Ops | NodeKind::Fun | NodeKind::Term | NodeKind::Var => {
                self.expr(e, id, 0)?;
            }
            // declarations and reserved forms emit nothing
            _ => {}
        }
        Ok(())
    }

    fn stmt_if(&mut self, e: &mut impl Emitter, id: NodeId) -> Result<(), EmitError> {
        let children = self.ctx.arena[id].children.clone();
        if children.len() < 2 {
            return Ok(());
        }
        let cond = self.expr(e, children[0], 0)?;
        let skip = e.label();
        e.branch(Cond::Eq, cond, Operand::Imm(0), skip);
        self.stmt(e, children[1])?;
        if let Some(&els) = children.get(2) {
            let done = e.label();
            e.jump(done);
            e.bind(skip);
            self.stmt(e, els)?;
            e.bind(done);
        } else {
            e.bind(skip);
        }
        Ok(())
    }

    fn stmt_while(&mut self, e: &mut impl Emitter, id: NodeId) -> Result<(), EmitError> {
        let children = self.ctx.arena[id].children.clone();
        if children.len() < 2 {
            return Ok(());
        }
        let top = e.label();
        e.bind(top);
        let cond = self.expr(e, children[0], 0)?;
        let done = e.label();
        e.branch(Cond::Eq, cond, Operand::Imm(0), done);
        self.stmt(e, children[1])?;
        e.jump(top);
        e.bind(done);
        Ok(())
    }

    fn stmt_for(&mut self, e: &mut impl Emitter, id: NodeId) -> Result<(), EmitError> {
        let children = self.ctx.arena[id].children.clone();
        if children.len() < 4 {
            return Ok(());
        }
        self.stmt(e, children[0])?;
        let top = e.label();
        e.bind(top);
        let cond = self.expr(e, children[1], 0)?;
        let done = e.label();
        e.branch(Cond::Eq, cond, Operand::Imm(0), done);
        self.stmt(e, children[3])?;
        self.stmt(e, children[2])?;
        e.jump(top);
        e.bind(done);
        Ok(())
    }

    /// Emit code leaving the node's value in the returned register.
    fn expr(&mut self, e: &mut impl Emitter, id: NodeId, sp: u8) -> Result<Reg, EmitError> {
        let kind = self.ctx.arena[id].kind;
        match kind {
            NodeKind::Term => {
                let imm = self.ctx.arena[id].value.as_int();
                let dst = self.scratch(sp)?;
                e.mov_ri(dst, imm);
                Ok(dst)
            }
            NodeKind::Var => {
                let sym = self.ctx.arena[id].sym.expect("variable node has a symbol");
                match self.var_reg(sym) {
                    Some(reg) => Ok(reg),
                    None => {
                        let dst = self.scratch(sp)?;
                        e.load(dst, sym);
                        Ok(dst)
                    }
                }
            }
            NodeKind::Op => self.expr_op(e, id, sp),
            NodeKind::Ops => {
                self.expr_step(e, id, sp)?;
                self.zero(e, sp)
            }
            NodeKind::Fun => {
                self.expr_fun(e, id, sp)?;
                self.zero(e, sp)
            }
            // statement lists and reserved forms evaluate to zero
            _ => self.zero(e, sp),
        }
    }

    fn expr_op(&mut self, e: &mut impl Emitter, id: NodeId, sp: u8) -> Result<Reg, EmitError> {
        let prim = self.ctx.arena[id].prim;
        let children = self.ctx.arena[id].children.clone();
        match prim {
            Prim::Assign => {
                let Some((&target, rest)) = children.split_first() else {
                    return self.zero(e, sp);
                };
                let Some(&rhs) = rest.first() else {
                    return self.zero(e, sp);
                };
                let src = self.expr(e, rhs, sp)?;
                if let Some(sym) = self.var_target(target) {
                    match self.var_reg(sym) {
                        Some(reg) => e.mov_rr(reg, src),
                        None => e.store(sym, src),
                    }
                }
                Ok(src)
            }
            Prim::Not => {
                let Some(src) = self.unary_operand(e, &children, sp)? else {
                    return self.zero(e, sp);
                };
                let dst = self.scratch(sp)?;
                e.alu_ri(AluOp::Eq, dst, src, 0);
                Ok(dst)
            }
            Prim::Com => {
                let Some(src) = self.unary_operand(e, &children, sp)? else {
                    return self.zero(e, sp);
                };
                let dst = self.scratch(sp)?;
                e.com(dst, src);
                Ok(dst)
            }
            Prim::LAnd | Prim::LOr => {
                let Some((a, b)) = self.binary_operands(e, &children, sp)? else {
                    return self.zero(e, sp);
                };
                let dst = self.scratch(sp)?;
                let t = self.scratch(sp + 1)?;
                e.alu_ri(AluOp::Ne, dst, a, 0);
                e.alu_ri(AluOp::Ne, t, b, 0);
                let op = if prim == Prim::LAnd { AluOp::And } else { AluOp::Or };
                e.alu_rr(op, dst, dst, t);
                Ok(dst)
            }
            _ => {
                let Some(op) = alu_op(prim) else {
                    return self.zero(e, sp);
                };
                // immediate form when the right operand is a literal
                if children.len() == 2
                    && let Some(imm) = self.literal(children[1])
                {
                    let a = self.expr(e, children[0], sp)?;
                    let dst = self.scratch(sp)?;
                    e.alu_ri(op, dst, a, imm);
                    return Ok(dst);
                }
                let Some((a, b)) = self.binary_operands(e, &children, sp)? else {
                    return self.zero(e, sp);
                };
                let dst = self.scratch(sp)?;
                e.alu_rr(op, dst, a, b);
                Ok(dst)
            }
        }
    }

    /// `println`-style call: render each argument, then end the line.
    fn expr_fun(&mut self, e: &mut impl Emitter, id: NodeId, sp: u8) -> Result<(), EmitError> {
        if self.ctx.arena[id].prim != Prim::Println {
            return Ok(());
        }
        for c in self.ctx.arena[id].children.clone() {
            let r = self.expr(e, c, sp)?;
            e.print(r);
        }
        e.print_nl();
        Ok(())
    }

    /// Postfix `++`/`--` on its variable operand.
    fn expr_step(&mut self, e: &mut impl Emitter, id: NodeId, sp: u8) -> Result<(), EmitError> {
        let prim = self.ctx.arena[id].prim;
        let children = self.ctx.arena[id].children.clone();
        let Some(&target) = children.first() else {
            return Ok(());
        };
        let Some(sym) = self.var_target(target) else {
            return Ok(());
        };
        let op = if prim == Prim::Dec { AluOp::Sub } else { AluOp::Add };
        match self.var_reg(sym) {
            Some(reg) => e.alu_ri(op, reg, reg, 1),
            None => {
                let t = self.scratch(sp)?;
                e.load(t, sym);
                e.alu_ri(op, t, t, 1);
                e.store(sym, t);
            }
        }
        Ok(())
    }

    /// Operands for a binary operator; a single child is treated as the
    /// right operand of an implicit zero (unary minus and friends).
    /// `None` for a childless node: nothing to compute, like the tree
    /// walk leaving the result slot untouched.
    fn binary_operands(
        &mut self,
        e: &mut impl Emitter,
        children: &[NodeId],
        sp: u8,
    ) -> Result<Option<(Reg, Reg)>, EmitError> {
        match children {
            [only] => {
                let a = self.scratch(sp)?;
                e.mov_ri(a, 0);
                let b = self.expr(e, *only, sp + 1)?;
                Ok(Some((a, b)))
            }
            [lhs, rhs, ..] => {
                let a = self.expr(e, *lhs, sp)?;
                let b = self.expr(e, *rhs, sp + 1)?;
                Ok(Some((a, b)))
            }
            [] => Ok(None),
        }
    }

    fn unary_operand(
        &mut self,
        e: &mut impl Emitter,
        children: &[NodeId],
        sp: u8,
    ) -> Result<Option<Reg>, EmitError> {
        match children.first() {
            Some(&c) => Ok(Some(self.expr(e, c, sp + 1)?)),
            None => Ok(None),
        }
    }

    /// The symbol behind an assignable operand, if it is a variable.
    fn var_target(&self, id: NodeId) -> Option<SymbolId> {
        let node = &self.ctx.arena[id];
        if node.kind == NodeKind::Var { node.sym } else { None }
    }

    /// Integer literal payload of a TERM node.
    fn literal(&self, id: NodeId) -> Option<i64> {
        let node = &self.ctx.arena[id];
        if node.kind == NodeKind::Term
            && let Value::Int(n) = node.value
        {
            Some(n)
        } else {
            None
        }
    }
}

fn alu_op(prim: Prim) -> Option<AluOp> {
    Some(match prim {
        Prim::Add => AluOp::Add,
        Prim::Sub => AluOp::Sub,
        Prim::Mul => AluOp::Mul,
        Prim::Div => AluOp::Div,
        Prim::Mod => AluOp::Rem,
        Prim::And => AluOp::And,
        Prim::Or => AluOp::Or,
        Prim::Xor => AluOp::Xor,
        Prim::Shl => AluOp::Shl,
        Prim::Shr => AluOp::Shr,
        Prim::Eq => AluOp::Eq,
        Prim::Ne => AluOp::Ne,
        Prim::Lt => AluOp::Lt,
        Prim::Le => AluOp::Le,
        Prim::Gt => AluOp::Gt,
        Prim::Ge => AluOp::Ge,
        _ => return None,
    })
}
