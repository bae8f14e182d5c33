use crate::context::Gen;
use crate::exp_gen::LowerMode;
use crate::{GenConfig, GenError};
use ascl_core::{
    Ast, Block, BlockId, Exp, ExpKind, Identifier, LitKind, Meta, OpKind, SqlKind, SrcPos, Stmt,
    StmtKind, SymbolId, Type, Value,
};
use ascl_ir::{BinaryOp, Expression, Literal, UnaryOp, ValType};
use pretty_assertions::assert_eq;

fn pos() -> SrcPos {
    SrcPos::new(1, 1)
}

fn lit(kind: LitKind, text: &str, meta: Meta) -> Exp {
    let mut exp = Exp::lit(kind, text, pos()).with_meta(meta);
    if let ExpKind::Lit { val, .. } = &mut exp.kind {
        *val = Value::from_literal(kind, text).unwrap();
    }
    exp
}

fn int(text: &str, ty: Type) -> Exp {
    lit(LitKind::Int, text, Meta::new(ty))
}

struct Fixture {
    ast: Ast,
    body: BlockId,
}

impl Fixture {
    fn new() -> Self {
        let mut ast = Ast::new(pos());
        let contract = ast.add_block(Block::contract(pos()), ast.root);
        let body = ast.add_block(Block::function(pos()), contract);
        Self { ast, body }
    }

    fn var(&mut self, name: &str, meta: Meta) -> SymbolId {
        self.ast.add_id(self.body, Identifier::var(name, meta, pos()))
    }

    fn gen(&self, locals: Vec<ValType>) -> Gen<'_> {
        let mut gen = Gen::new(&self.ast, GenConfig::default());
        gen.enter_function(locals);
        gen
    }
}

fn assign(l_exp: Exp, r_exp: Exp) -> Stmt {
    Stmt::assign(l_exp, r_exp, pos())
}

#[test]
fn test_global_assignment() {
    let mut fx = Fixture::new();
    let g = fx.var("g", Meta::new(Type::Int32));
    let stmt = assign(
        Exp::global("g", pos())
            .with_meta(Meta::new(Type::Int32))
            .with_id(g),
        int("5", Type::Int32),
    );

    let mut gen = fx.gen(Vec::new());
    assert_eq!(
        gen.stmt_gen(&stmt),
        Some(Expression::global_set("g", Expression::i32(5)))
    );
}

#[test]
fn test_local_assignment_of_sum() {
    let mut fx = Fixture::new();
    let y = fx.var("y", Meta::new(Type::Int32));
    let x = fx.var("x", Meta::new(Type::Int32));

    let sum = Exp::op(
        OpKind::Add,
        Exp::local(1, pos())
            .with_meta(Meta::new(Type::Int32))
            .with_id(y),
        Some(int("1", Type::Int32)),
        pos(),
    )
    .with_meta(Meta::new(Type::Int32));
    let stmt = assign(
        Exp::local(2, pos())
            .with_meta(Meta::new(Type::Int32))
            .with_id(x),
        sum,
    );

    let mut gen = fx.gen(vec![ValType::I32; 3]);
    assert_eq!(
        gen.stmt_gen(&stmt),
        Some(Expression::local_set(
            2,
            Expression::binary(
                BinaryOp::Add,
                ValType::I32,
                Expression::local_get(1, ValType::I32),
                Expression::i32(1),
            )
        ))
    );
}

#[test]
fn test_array_element_store_uses_element_width() {
    let mut fx = Fixture::new();
    let arr_meta = Meta::array(Type::Int64, 1);
    let arr = fx.var("arr", arr_meta.clone());
    let i = fx.var("i", Meta::new(Type::Int32));

    let base = Exp::stack(Type::Int64, 0, 0, 0, pos())
        .with_meta(arr_meta)
        .with_id(arr);
    let index = Exp::local(1, pos())
        .with_meta(Meta::new(Type::Int32))
        .with_id(i);
    let elem = Exp::array(base, index, pos())
        .with_meta(Meta::new(Type::Int64))
        .with_id(arr);
    let stmt = assign(elem, int("7", Type::Int64));

    let mut gen = fx.gen(vec![ValType::I32, ValType::I32]);
    let addr = Expression::binary(
        BinaryOp::Add,
        ValType::I32,
        Expression::load(4, false, 0, ValType::I32, Expression::local_get(0, ValType::I32)),
        Expression::binary(
            BinaryOp::Mul,
            ValType::I32,
            Expression::local_get(1, ValType::I32),
            Expression::i32(8),
        ),
    );

    assert_eq!(
        gen.stmt_gen(&stmt),
        Some(Expression::store(
            8,
            0,
            ValType::I64,
            addr,
            Expression::constant(Literal::I64(7))
        ))
    );
}

#[test]
fn test_array_variable_store_is_reference_word() {
    let mut fx = Fixture::new();
    let arr_meta = Meta::array(Type::Int64, 1);
    let arr = fx.var("arr", arr_meta.clone());
    let other = fx.var("other", arr_meta.clone());

    let stmt = assign(
        Exp::stack(Type::Int64, 0, 8, 0, pos())
            .with_meta(arr_meta.clone())
            .with_id(arr),
        Exp::local(1, pos()).with_meta(arr_meta).with_id(other),
    );

    let mut gen = fx.gen(vec![ValType::I32, ValType::I32]);
    assert_eq!(
        gen.stmt_gen(&stmt),
        Some(Expression::store(
            4,
            0,
            ValType::I32,
            Expression::binary(
                BinaryOp::Add,
                ValType::I32,
                Expression::local_get(0, ValType::I32),
                Expression::i32(8),
            ),
            Expression::local_get(1, ValType::I32),
        ))
    );
}

#[test]
fn test_stack_scalar_store_uses_declared_type() {
    let mut fx = Fixture::new();
    let s = fx.var("s", Meta::new(Type::Int16));

    let stmt = assign(
        Exp::stack(Type::Int16, 0, 4, 2, pos())
            .with_meta(Meta::new(Type::Int16))
            .with_id(s),
        int("3", Type::Int16),
    );

    let mut gen = fx.gen(vec![ValType::I32]);
    assert_eq!(
        gen.stmt_gen(&stmt),
        Some(Expression::store(
            2,
            0,
            ValType::I32,
            Expression::binary(
                BinaryOp::Add,
                ValType::I32,
                Expression::local_get(0, ValType::I32),
                Expression::i32(6),
            ),
            Expression::i32(3),
        ))
    );
}

#[test]
fn test_map_assignment_is_rejected() {
    let mut fx = Fixture::new();
    let map_meta = Meta::map(Meta::new(Type::String), Meta::new(Type::Int32));
    let m = fx.var("m", map_meta.clone());
    let v = fx.var("v", map_meta.clone());

    let stmt = assign(
        Exp::global("m", pos()).with_meta(map_meta.clone()).with_id(m),
        Exp::global("v", pos()).with_meta(map_meta).with_id(v),
    );

    let mut gen = fx.gen(Vec::new());
    assert_eq!(gen.stmt_gen(&stmt), None);

    let insts = gen.stmts_gen(std::slice::from_ref(&stmt));
    assert!(insts.is_empty());
    assert_eq!(
        gen.diagnostics(),
        &[GenError::Unsupported {
            what: "assign statement".to_string(),
            pos: pos()
        }]
    );
}

#[test]
#[should_panic(expected = "invalid assignment target")]
fn test_struct_target_outside_array_panics() {
    let mut fx = Fixture::new();
    let field = fx.ast.new_id(Identifier::var("x", Meta::new(Type::Int32), pos()));
    let point = fx
        .ast
        .add_id(fx.ast.root, Identifier::structure("Point", vec![field], pos()));
    let struct_meta = Meta::structure(point, vec![Meta::new(Type::Int32)]);
    let p = fx.var("p", struct_meta.clone());

    let target = Exp::access(
        Exp::local(0, pos()).with_meta(struct_meta).with_id(p),
        Exp::id_ref("x", pos()).with_id(field),
        pos(),
    )
    .with_meta(Meta::new(Type::Int32))
    .with_id(p);

    let mut gen = fx.gen(vec![ValType::I32]);
    gen.stmt_gen(&assign(target, int("1", Type::Int32)));
}

#[test]
fn test_return_statements() {
    let fx = Fixture::new();
    let mut gen = fx.gen(Vec::new());

    let ret = Stmt::ret(Some(int("42", Type::Int64)), pos());
    assert_eq!(
        gen.stmt_gen(&ret),
        Some(Expression::ret(Some(Expression::constant(Literal::I64(42)))))
    );

    assert_eq!(
        gen.stmt_gen(&Stmt::ret(None, pos())),
        Some(Expression::ret(None))
    );

    let tuple = Exp::tuple(Some(int("1", Type::Int32)), pos());
    assert_eq!(
        gen.stmt_gen(&Stmt::ret(Some(tuple), pos())),
        Some(Expression::ret(None))
    );
    assert_eq!(gen.diagnostics().len(), 1);
}

#[test]
fn test_ddl_and_null_statements_emit_nothing() {
    let fx = Fixture::new();
    let mut gen = fx.gen(Vec::new());

    let stmts = vec![
        Stmt::ddl(SqlKind::Insert, "insert into t values (1)", pos()),
        Stmt::new(StmtKind::Null, pos()),
    ];
    assert!(gen.stmts_gen(&stmts).is_empty());
    assert_eq!(gen.diagnostics().len(), 1);
}

#[test]
fn test_constant_folding() {
    let fx = Fixture::new();
    let mut gen = fx.gen(Vec::new());

    let product = Exp::op(
        OpKind::Mul,
        int("2", Type::Int32),
        Some(int("3", Type::Int32)),
        pos(),
    )
    .with_meta(Meta::new(Type::Int32));
    assert_eq!(
        gen.exp_gen(&product, LowerMode::Value),
        Some(Expression::i32(6))
    );

    let less = Exp::op(
        OpKind::Lt,
        int("1", Type::Int32),
        Some(int("2", Type::Int32)),
        pos(),
    )
    .with_meta(Meta::new(Type::Bool));
    assert_eq!(
        gen.exp_gen(&less, LowerMode::Value),
        Some(Expression::i32(1))
    );

    let neg = Exp::op(OpKind::Neg, int("9", Type::Int64), None, pos())
        .with_meta(Meta::new(Type::Int64));
    assert_eq!(
        gen.exp_gen(&neg, LowerMode::Value),
        Some(Expression::constant(Literal::I64(-9)))
    );
}

#[test]
fn test_operator_selection_follows_left_operand() {
    let fx = Fixture::new();
    let mut gen = fx.gen(vec![ValType::I32, ValType::F64]);

    let udiv = Exp::op(
        OpKind::Div,
        Exp::local(0, pos()).with_meta(Meta::new(Type::Uint32)),
        Some(int("2", Type::Uint32)),
        pos(),
    )
    .with_meta(Meta::new(Type::Uint32));
    assert!(matches!(
        gen.exp_gen(&udiv, LowerMode::Value),
        Some(Expression::Binary {
            op: BinaryOp::DivU,
            ty: ValType::I32,
            ..
        })
    ));

    let flt = Exp::op(
        OpKind::Lt,
        Exp::local(1, pos()).with_meta(Meta::new(Type::Double)),
        Some(lit(LitKind::Float, "1.5", Meta::new(Type::Double))),
        pos(),
    )
    .with_meta(Meta::new(Type::Bool));
    assert_eq!(
        gen.exp_gen(&flt, LowerMode::Value),
        Some(Expression::binary(
            BinaryOp::Lt,
            ValType::F64,
            Expression::local_get(1, ValType::F64),
            Expression::constant(Literal::F64(1.5)),
        ))
    );

    let not = Exp::op(
        OpKind::Not,
        Exp::local(0, pos()).with_meta(Meta::new(Type::Bool)),
        None,
        pos(),
    )
    .with_meta(Meta::new(Type::Bool));
    assert_eq!(
        gen.exp_gen(&not, LowerMode::Value),
        Some(Expression::unary(
            UnaryOp::Eqz,
            ValType::I32,
            Expression::local_get(0, ValType::I32)
        ))
    );

    let fmod = Exp::op(
        OpKind::Mod,
        Exp::local(1, pos()).with_meta(Meta::new(Type::Double)),
        Some(Exp::local(1, pos()).with_meta(Meta::new(Type::Double))),
        pos(),
    )
    .with_meta(Meta::new(Type::Double));
    assert_eq!(gen.exp_gen(&fmod, LowerMode::Value), None);
}

#[test]
fn test_literals() {
    let fx = Fixture::new();
    let mut gen = fx.gen(Vec::new());

    let single = lit(LitKind::Float, "0.5", Meta::new(Type::Float));
    assert_eq!(
        gen.exp_gen(&single, LowerMode::Value),
        Some(Expression::constant(Literal::F32(0.5)))
    );

    let flag = lit(LitKind::Bool, "true", Meta::new(Type::Bool));
    assert_eq!(gen.exp_gen(&flag, LowerMode::Value), Some(Expression::i32(1)));

    let null = lit(LitKind::Null, "null", Meta::new(Type::Object));
    assert_eq!(gen.exp_gen(&null, LowerMode::Value), Some(Expression::i32(0)));

    let hello = lit(LitKind::Str, "hello", Meta::new(Type::String));
    let world = lit(LitKind::Str, "world", Meta::new(Type::String));
    assert_eq!(gen.exp_gen(&hello, LowerMode::Value), Some(Expression::i32(0)));
    assert_eq!(gen.exp_gen(&world, LowerMode::Value), Some(Expression::i32(8)));
    assert_eq!(gen.dsgmt().entries()[1], (8, b"world".to_vec()));
}

#[test]
fn test_stack_and_member_loads() {
    let mut fx = Fixture::new();
    let a = fx.ast.new_id(Identifier::var("a", Meta::new(Type::Int8), pos()));
    let b = fx.ast.new_id(Identifier::var("b", Meta::new(Type::Int64), pos()));
    let point = fx
        .ast
        .add_id(fx.ast.root, Identifier::structure("Pair", vec![a, b], pos()));
    let pair_meta = Meta::structure(point, vec![Meta::new(Type::Int8), Meta::new(Type::Int64)]);

    let mut gen = fx.gen(vec![ValType::I32]);

    let slot = Exp::stack(Type::Uint16, 0, 12, 0, pos()).with_meta(Meta::new(Type::Uint16));
    assert_eq!(
        gen.exp_gen(&slot, LowerMode::Value),
        Some(Expression::load(
            2,
            false,
            12,
            ValType::I32,
            Expression::local_get(0, ValType::I32)
        ))
    );

    let member = Exp::access(
        Exp::local(0, pos()).with_meta(pair_meta),
        Exp::id_ref("b", pos()).with_id(b),
        pos(),
    )
    .with_meta(Meta::new(Type::Int64));
    assert_eq!(
        gen.exp_gen(&member, LowerMode::Value),
        Some(Expression::load(
            8,
            true,
            1,
            ValType::I64,
            Expression::local_get(0, ValType::I32)
        ))
    );
    assert_eq!(
        gen.exp_gen(&member, LowerMode::Address),
        Some(Expression::binary(
            BinaryOp::Add,
            ValType::I32,
            Expression::local_get(0, ValType::I32),
            Expression::i32(1),
        ))
    );
}

#[test]
fn test_expression_statements() {
    let mut fx = Fixture::new();
    let f = fx.ast.add_id(
        fx.ast.root,
        Identifier::function("f", Vec::new(), Meta::new(Type::Int32), None, pos()),
    );
    let v = fx.ast.add_id(
        fx.ast.root,
        Identifier::function("v", Vec::new(), Meta::new(Type::Void), None, pos()),
    );

    let mut gen = fx.gen(Vec::new());

    let call_f = Exp::call(Exp::id_ref("f", pos()).with_id(f), Vec::new(), pos())
        .with_meta(Meta::new(Type::Int32));
    assert_eq!(
        gen.stmt_gen(&Stmt::exp(call_f, pos())),
        Some(Expression::drop(Expression::call("f", Vec::new(), ValType::I32)))
    );

    let call_v = Exp::call(Exp::id_ref("v", pos()).with_id(v), Vec::new(), pos())
        .with_meta(Meta::new(Type::Void));
    assert_eq!(
        gen.stmt_gen(&Stmt::exp(call_v, pos())),
        Some(Expression::call("v", Vec::new(), ValType::None))
    );

    let unbound = Exp::id_ref("nothing", pos());
    assert_eq!(gen.stmt_gen(&Stmt::exp(unbound, pos())), None);
}

#[test]
fn test_nested_block_statement() {
    let mut fx = Fixture::new();
    let inner = fx.ast.add_block(Block::normal(pos()), fx.body);
    fx.ast.add_stmt(inner, Stmt::ret(None, pos()));
    fx.ast.add_stmt(inner, Stmt::new(StmtKind::Null, pos()));

    let mut gen = fx.gen(Vec::new());
    assert_eq!(
        gen.stmt_gen(&Stmt::block(inner, pos())),
        Some(Expression::Block {
            name: None,
            children: vec![Expression::ret(None)],
            ty: ValType::None,
        })
    );
}

#[test]
#[should_panic(expected = "invalid statement")]
fn test_control_flow_statement_panics() {
    let fx = Fixture::new();
    let mut gen = fx.gen(Vec::new());
    gen.stmt_gen(&Stmt::new(StmtKind::Break, pos()));
}

#[test]
fn test_literal_without_value_uses_text() {
    let fx = Fixture::new();
    let mut gen = fx.gen(Vec::new());

    let five = Exp::lit(LitKind::Int, "5", pos()).with_meta(Meta::new(Type::Int32));
    assert_eq!(gen.exp_gen(&five, LowerMode::Value), Some(Expression::i32(5)));

    let sum = Exp::op(
        OpKind::Add,
        Exp::lit(LitKind::Int, "2", pos()).with_meta(Meta::new(Type::Int64)),
        Some(Exp::lit(LitKind::Int, "40", pos()).with_meta(Meta::new(Type::Int64))),
        pos(),
    )
    .with_meta(Meta::new(Type::Int64));
    assert_eq!(
        gen.exp_gen(&sum, LowerMode::Value),
        Some(Expression::constant(Literal::I64(42)))
    );

    let bad = Exp::lit(LitKind::Bool, "maybe", pos()).with_meta(Meta::new(Type::Bool));
    assert_eq!(gen.exp_gen(&bad, LowerMode::Value), None);

    let stmts = vec![Stmt::exp(bad, pos())];
    assert!(gen.stmts_gen(&stmts).is_empty());
    assert_eq!(gen.diagnostics().len(), 1);
}

#[test]
fn test_oversized_constant_shift_is_not_folded() {
    let fx = Fixture::new();
    let mut gen = fx.gen(Vec::new());

    let shift = Exp::op(
        OpKind::Shl,
        int("1", Type::Int64),
        Some(int("4611686018427387904", Type::Int64)),
        pos(),
    )
    .with_meta(Meta::new(Type::Int64));

    assert!(matches!(
        gen.exp_gen(&shift, LowerMode::Value),
        Some(Expression::Binary {
            op: BinaryOp::Shl,
            ty: ValType::I64,
            ..
        })
    ));
}
