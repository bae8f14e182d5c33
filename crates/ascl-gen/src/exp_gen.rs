/*! Expression lowering.
 *
 * Every expression lowers in one of two modes. `Value` yields the instruction computing the
 * expression's value; `Address` yields the byte address of its storage and only differs from
 * `Value` for storage expressions (stack slots, array elements, struct members). Operands are
 * always lowered in `Value` mode.
 */

use crate::context::Gen;
use crate::util::{load_of, meta_gen, slot_size};
use ascl_core::{Exp, ExpKind, IdKind, Meta, OpKind, SymbolId, Type, Value};
use ascl_ir::{BinaryOp, Expression, Literal, UnaryOp, ValType};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowerMode {
    Value,
    Address,
}

impl<'a> Gen<'a> {
    /// Lowers `exp`, or returns `None` for constructs with no direct
    /// lowering (type references, tuples, embedded SQL, unbound names).
    pub fn exp_gen(&mut self, exp: &Exp, mode: LowerMode) -> Option<Expression> {
        match &exp.kind {
            ExpKind::Lit { .. } => {
                let val = exp.lit_value()?.ok()?;
                Some(self.lit_gen(&val, &exp.meta))
            }
            ExpKind::Op { op, left, right } => self.op_gen(exp, *op, left, right.as_deref()),
            ExpKind::Cond {
                cond,
                then_exp,
                else_exp,
            } => {
                let cond = self.exp_gen(cond, LowerMode::Value)?;
                let then_exp = self.exp_gen(then_exp, LowerMode::Value)?;
                let else_exp = self.exp_gen(else_exp, LowerMode::Value)?;
                Some(Expression::select(cond, then_exp, else_exp))
            }
            ExpKind::Call { callee, args } => self.call_gen(exp, callee, args),
            ExpKind::Array { base, index } => self.array_gen(exp, base, index, mode),
            ExpKind::Access { base, member } => self.access_gen(exp, base, member, mode),
            ExpKind::Global { name } => Some(Expression::global_get(
                name.clone(),
                meta_gen(&exp.meta),
            )),
            ExpKind::Local { idx } => {
                let ty = self
                    .local_type(*idx)
                    .unwrap_or_else(|| meta_gen(&exp.meta));
                Some(Expression::local_get(*idx, ty))
            }
            ExpKind::Stack {
                ty,
                base,
                addr,
                offset,
            } => self.stack_gen(exp, *ty, *base, addr + offset, mode),
            ExpKind::Type { .. } | ExpKind::Id { .. } | ExpKind::Tuple { .. } | ExpKind::Sql { .. } => {
                None
            }
        }
    }

    /// Constant for `val` as a value of `meta`. Strings and objects are
    /// copied into the data segment and replaced by their address.
    pub(crate) fn lit_gen(&mut self, val: &Value, meta: &Meta) -> Expression {
        if val.is_null() {
            return Expression::i32(0);
        }

        let bytes = match val {
            Value::Str(s) => Some(s.as_bytes()),
            Value::Object(bytes) => Some(bytes.as_slice()),
            _ => None,
        };
        if let Some(bytes) = bytes {
            let addr = self.dsgmt.add(bytes);
            return Expression::i32(addr as i32);
        }

        self.buf.clear();
        let size = val.serialize(&mut self.buf, meta);
        let is_float = matches!(val, Value::Double(_));
        let ty = match (size, is_float) {
            (4, false) => ValType::I32,
            (8, false) => ValType::I64,
            (4, true) => ValType::F32,
            (8, true) => ValType::F64,
            _ => unreachable!("invalid literal size: {} for {}", size, meta),
        };

        match Literal::from_le_bytes(ty, &self.buf) {
            Some(lit) => Expression::constant(lit),
            None => unreachable!("short literal buffer for {}", ty),
        }
    }

    fn op_gen(
        &mut self,
        exp: &Exp,
        op: OpKind,
        left: &Exp,
        right: Option<&Exp>,
    ) -> Option<Expression> {
        if let Some(val) = fold(op, left, right) {
            trace!("folded '{}' at {}", op, exp.pos);
            return Some(self.lit_gen(&val, &exp.meta));
        }

        let ty = meta_gen(&left.meta);
        if ty == ValType::None {
            return None;
        }

        let l = self.exp_gen(left, LowerMode::Value)?;
        if op.is_unary() {
            return unary_gen(op, ty, l);
        }

        let right = match right {
            Some(right) => right,
            None => unreachable!("operator '{}' without right operand", op),
        };
        let r = self.exp_gen(right, LowerMode::Value)?;
        let bin = binary_op(op, ty, left.meta.is_signed())?;

        Some(Expression::binary(bin, ty, l, r))
    }

    fn call_gen(&mut self, exp: &Exp, callee: &Exp, args: &[Exp]) -> Option<Expression> {
        let ident = self.id(callee.id.or(exp.id)?);
        if !ident.is_fn() {
            return None;
        }

        let operands = args
            .iter()
            .map(|arg| self.exp_gen(arg, LowerMode::Value))
            .collect::<Option<Vec<_>>>()?;

        Some(Expression::call(
            ident.name.clone(),
            operands,
            meta_gen(&ident.meta),
        ))
    }

    /// Element address is `base + index * elem_size`, where `base` is the
    /// array reference.
    fn array_gen(
        &mut self,
        exp: &Exp,
        base: &Exp,
        index: &Exp,
        mode: LowerMode,
    ) -> Option<Expression> {
        // map lookups are runtime calls
        if base.meta.is_map() {
            return None;
        }

        let elem_size = slot_size(&exp.meta) as i32;
        let base_addr = self.exp_gen(base, LowerMode::Value)?;
        let offset = match self.exp_gen(index, LowerMode::Value)? {
            Expression::Const(Literal::I32(idx)) => Expression::i32(idx.wrapping_mul(elem_size)),
            idx => Expression::binary(BinaryOp::Mul, ValType::I32, idx, Expression::i32(elem_size)),
        };

        let addr = match offset {
            Expression::Const(Literal::I32(0)) => base_addr,
            offset => Expression::binary(BinaryOp::Add, ValType::I32, base_addr, offset),
        };

        match mode {
            LowerMode::Address => Some(addr),
            LowerMode::Value => load(&exp.meta, 0, addr),
        }
    }

    fn access_gen(
        &mut self,
        exp: &Exp,
        base: &Exp,
        member: &Exp,
        mode: LowerMode,
    ) -> Option<Expression> {
        if !base.meta.is_struct() {
            // qualified call through a contract or library
            return match member.kind {
                ExpKind::Call { .. } => self.exp_gen(member, mode),
                _ => None,
            };
        }

        let offset = self.field_offset(&base.meta, member.id?)?;
        let base_addr = self.exp_gen(base, LowerMode::Value)?;

        match mode {
            LowerMode::Address if offset == 0 => Some(base_addr),
            LowerMode::Address => Some(Expression::binary(
                BinaryOp::Add,
                ValType::I32,
                base_addr,
                Expression::i32(offset as i32),
            )),
            LowerMode::Value => load(&exp.meta, offset, base_addr),
        }
    }

    /// Byte offset of `field` within the struct described by `meta`.
    pub(crate) fn field_offset(&self, meta: &Meta, field: SymbolId) -> Option<u32> {
        let IdKind::Struct { fields } = &self.id(meta.type_id?).kind else {
            return None;
        };

        let mut offset = 0;
        for &id in fields {
            if id == field {
                return Some(offset);
            }
            offset += slot_size(&self.id(id).meta);
        }
        None
    }

    /// Stack slot at `local[base] + disp`. Array slots hold the 32-bit
    /// array reference.
    fn stack_gen(
        &mut self,
        exp: &Exp,
        ty: Type,
        base: u32,
        disp: u32,
        mode: LowerMode,
    ) -> Option<Expression> {
        let ptr = Expression::local_get(base, ValType::I32);

        match mode {
            LowerMode::Address if disp == 0 => Some(ptr),
            LowerMode::Address => Some(Expression::binary(
                BinaryOp::Add,
                ValType::I32,
                ptr,
                Expression::i32(disp as i32),
            )),
            LowerMode::Value if exp.meta.is_array() => load(&exp.meta, disp, ptr),
            LowerMode::Value => load(&Meta::new(ty), disp, ptr),
        }
    }
}

fn load(meta: &Meta, offset: u32, ptr: Expression) -> Option<Expression> {
    let (bytes, signed, ty) = load_of(meta);
    if bytes == 0 {
        return None;
    }
    Some(Expression::load(bytes, signed, offset, ty, ptr))
}

/// Folds an operator over literal operands.
fn fold(op: OpKind, left: &Exp, right: Option<&Exp>) -> Option<Value> {
    let l = left.lit_value()?.ok()?;
    let r = match right {
        Some(right) => Some(right.lit_value()?.ok()?),
        None => None,
    };

    l.evaluate(op, r.as_deref()).ok()
}

fn lit_of(ty: ValType, v: i32) -> Option<Expression> {
    let lit = match ty {
        ValType::I32 => Literal::I32(v),
        ValType::I64 => Literal::I64(v as i64),
        ValType::F32 => Literal::F32(v as f32),
        ValType::F64 => Literal::F64(v as f64),
        ValType::None => return None,
    };
    Some(Expression::constant(lit))
}

fn unary_gen(op: OpKind, ty: ValType, val: Expression) -> Option<Expression> {
    let inst = match op {
        OpKind::Neg if ty.is_float() => Expression::unary(UnaryOp::Neg, ty, val),
        OpKind::Neg => Expression::binary(BinaryOp::Sub, ty, lit_of(ty, 0)?, val),
        OpKind::Not if ty.is_int() => Expression::unary(UnaryOp::Eqz, ty, val),
        OpKind::BitNot if ty.is_int() => Expression::binary(BinaryOp::Xor, ty, val, lit_of(ty, -1)?),
        OpKind::Inc => Expression::binary(BinaryOp::Add, ty, val, lit_of(ty, 1)?),
        OpKind::Dec => Expression::binary(BinaryOp::Sub, ty, val, lit_of(ty, 1)?),
        _ => return None,
    };
    Some(inst)
}

fn binary_op(op: OpKind, ty: ValType, signed: bool) -> Option<BinaryOp> {
    let float = ty.is_float();
    let pick = |s, u, f| {
        if float {
            f
        } else if signed {
            s
        } else {
            u
        }
    };

    if float && (op.is_bit() || op == OpKind::Mod) {
        return None;
    }

    let bin = match op {
        OpKind::Add => BinaryOp::Add,
        OpKind::Sub => BinaryOp::Sub,
        OpKind::Mul => BinaryOp::Mul,
        OpKind::Div => pick(BinaryOp::DivS, BinaryOp::DivU, BinaryOp::Div),
        OpKind::Mod => pick(BinaryOp::RemS, BinaryOp::RemU, BinaryOp::RemU),
        OpKind::BitAnd => BinaryOp::And,
        OpKind::BitOr => BinaryOp::Or,
        OpKind::BitXor => BinaryOp::Xor,
        OpKind::Shl => BinaryOp::Shl,
        OpKind::Shr => pick(BinaryOp::ShrS, BinaryOp::ShrU, BinaryOp::ShrU),
        OpKind::Eq => BinaryOp::Eq,
        OpKind::Ne => BinaryOp::Ne,
        OpKind::Lt => pick(BinaryOp::LtS, BinaryOp::LtU, BinaryOp::Lt),
        OpKind::Gt => pick(BinaryOp::GtS, BinaryOp::GtU, BinaryOp::Gt),
        OpKind::Le => pick(BinaryOp::LeS, BinaryOp::LeU, BinaryOp::Le),
        OpKind::Ge => pick(BinaryOp::GeS, BinaryOp::GeU, BinaryOp::Ge),
        OpKind::And if !float => BinaryOp::And,
        OpKind::Or if !float => BinaryOp::Or,
        _ => return None,
    };
    Some(bin)
}
