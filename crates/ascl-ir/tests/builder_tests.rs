use ascl_ir::{
    BinaryOp, Expression, FunctionBuilder, IrError, Literal, ModuleBuilder, UnaryOp, ValType,
};
use pretty_assertions::assert_eq;

fn counter_module() -> ModuleBuilder {
    let mut builder = ModuleBuilder::new();
    builder.set_memory(1, None);
    builder
        .add_global("count", ValType::I32, true, Literal::I32(0))
        .unwrap();

    let mut func = FunctionBuilder::new("bump", vec![ValType::I32], ValType::None);
    let tmp = func.add_local(ValType::I64);
    assert_eq!(tmp, 1);

    func.push(Expression::global_set(
        "count",
        Expression::binary(
            BinaryOp::Add,
            ValType::I32,
            Expression::global_get("count", ValType::I32),
            Expression::local_get(0, ValType::I32),
        ),
    ));
    func.push(Expression::ret(None));
    builder.add_function(func.build()).unwrap();
    builder.add_export("bump", "bump").unwrap();
    builder
}

#[test]
fn test_valid_module() {
    let builder = counter_module();
    builder.validate().unwrap();

    let module = builder.finish();
    let func = module.get_function("bump").unwrap();
    assert_eq!(func.local_count(), 2);
    assert_eq!(func.local_type(0), Some(ValType::I32));
    assert_eq!(func.local_type(1), Some(ValType::I64));
    assert_eq!(func.local_type(2), None);
    assert_eq!(module.exports["bump"].func, "bump");
}

#[test]
fn test_duplicate_names_rejected() {
    let mut builder = counter_module();

    let err = builder
        .add_global("count", ValType::I32, true, Literal::I32(1))
        .unwrap_err();
    assert_eq!(
        err,
        IrError::Duplicate {
            kind: "global",
            name: "count".to_string()
        }
    );

    let func = FunctionBuilder::new("bump", Vec::new(), ValType::None).build();
    assert!(matches!(
        builder.add_function(func),
        Err(IrError::Duplicate { kind: "function", .. })
    ));
}

#[test]
fn test_global_init_type_must_match() {
    let mut builder = ModuleBuilder::new();
    assert!(matches!(
        builder.add_global("g", ValType::I64, true, Literal::I32(0)),
        Err(IrError::TypeError { .. })
    ));
}

#[test]
fn test_unknown_global() {
    let mut builder = ModuleBuilder::new();
    let mut func = FunctionBuilder::new("f", Vec::new(), ValType::None);
    func.push(Expression::global_set("missing", Expression::i32(1)));
    builder.add_function(func.build()).unwrap();

    assert_eq!(
        builder.validate(),
        Err(IrError::UnknownGlobal("missing".to_string()))
    );
}

#[test]
fn test_unknown_call_target() {
    let mut builder = ModuleBuilder::new();
    let mut func = FunctionBuilder::new("f", Vec::new(), ValType::None);
    func.push(Expression::drop(Expression::call(
        "nowhere",
        Vec::new(),
        ValType::I32,
    )));
    builder.add_function(func.build()).unwrap();

    assert_eq!(
        builder.validate(),
        Err(IrError::UnknownFunction("nowhere".to_string()))
    );
}

#[test]
fn test_local_index_out_of_range() {
    let mut builder = ModuleBuilder::new();
    let mut func = FunctionBuilder::new("f", vec![ValType::I32], ValType::None);
    func.push(Expression::local_set(3, Expression::i32(0)));
    builder.add_function(func.build()).unwrap();

    assert_eq!(
        builder.validate(),
        Err(IrError::LocalOutOfRange {
            func: "f".to_string(),
            index: 3,
            count: 1
        })
    );
}

#[test]
fn test_local_read_type_mismatch() {
    let mut builder = ModuleBuilder::new();
    let mut func = FunctionBuilder::new("f", vec![ValType::I64], ValType::I32);
    func.push(Expression::ret(Some(Expression::local_get(0, ValType::I32))));
    builder.add_function(func.build()).unwrap();

    assert!(matches!(builder.validate(), Err(IrError::TypeError { .. })));
}

#[test]
fn test_memory_access_requires_memory() {
    let mut builder = ModuleBuilder::new();
    let mut func = FunctionBuilder::new("f", Vec::new(), ValType::None);
    func.push(Expression::store(
        4,
        0,
        ValType::I32,
        Expression::i32(16),
        Expression::i32(7),
    ));
    builder.add_function(func.build()).unwrap();

    assert!(matches!(
        builder.validate(),
        Err(IrError::InvalidAccess { .. })
    ));

    builder.set_memory(1, None);
    builder.validate().unwrap();
}

#[test]
fn test_store_width_bounded_by_type() {
    let mut builder = ModuleBuilder::new();
    builder.set_memory(1, None);
    let mut func = FunctionBuilder::new("f", Vec::new(), ValType::None);
    func.push(Expression::store(
        8,
        0,
        ValType::I32,
        Expression::i32(0),
        Expression::i32(1),
    ));
    builder.add_function(func.build()).unwrap();

    assert!(matches!(
        builder.validate(),
        Err(IrError::InvalidAccess { .. })
    ));
}

#[test]
fn test_operator_type_check() {
    let mut builder = ModuleBuilder::new();
    let mut func = FunctionBuilder::new("f", Vec::new(), ValType::None);
    func.push(Expression::drop(Expression::binary(
        BinaryOp::DivS,
        ValType::F64,
        Expression::constant(Literal::F64(1.0)),
        Expression::constant(Literal::F64(2.0)),
    )));
    builder.add_function(func.build()).unwrap();

    assert!(matches!(builder.validate(), Err(IrError::TypeError { .. })));
}

#[test]
fn test_data_segment_bounds() {
    let mut builder = ModuleBuilder::new();
    builder.add_data_segment(0, b"abc".to_vec());
    assert!(matches!(builder.validate(), Err(IrError::MemoryError(_))));

    builder.set_memory(1, None);
    builder.validate().unwrap();

    builder.add_data_segment(65534, b"xyz".to_vec());
    assert!(matches!(builder.validate(), Err(IrError::MemoryError(_))));
}

#[test]
fn test_export_of_missing_function() {
    let mut builder = ModuleBuilder::new();
    builder.add_export("run", "run").unwrap();
    assert_eq!(
        builder.validate(),
        Err(IrError::UnknownFunction("run".to_string()))
    );
}

#[test]
fn test_result_types() {
    let cmp = Expression::binary(
        BinaryOp::LtS,
        ValType::I64,
        Expression::constant(Literal::I64(1)),
        Expression::constant(Literal::I64(2)),
    );
    assert_eq!(cmp.result_type(), ValType::I32);

    let neg = Expression::unary(UnaryOp::Neg, ValType::F32, Expression::constant(Literal::F32(1.0)));
    assert_eq!(neg.result_type(), ValType::F32);

    let sel = Expression::select(
        Expression::i32(1),
        Expression::constant(Literal::I64(3)),
        Expression::constant(Literal::I64(4)),
    );
    assert_eq!(sel.result_type(), ValType::I64);

    assert_eq!(Expression::ret(None).result_type(), ValType::None);
    assert_eq!(
        Expression::block(None, vec![Expression::i32(2)]).result_type(),
        ValType::I32
    );
}

#[test]
fn test_literal_from_bytes() {
    assert_eq!(
        Literal::from_le_bytes(ValType::I32, &5i32.to_le_bytes()),
        Some(Literal::I32(5))
    );
    assert_eq!(
        Literal::from_le_bytes(ValType::F64, &1.5f64.to_le_bytes()),
        Some(Literal::F64(1.5))
    );
    assert_eq!(Literal::from_le_bytes(ValType::I64, &[0; 4]), None);
}

#[test]
fn test_expression_display() {
    let store = Expression::store(
        1,
        8,
        ValType::I32,
        Expression::local_get(0, ValType::I32),
        Expression::i32(7),
    );
    assert_eq!(
        store.to_string(),
        "(i32.store8 offset=8 (local.get 0) (i32.const 7))"
    );

    let load = Expression::load(2, true, 0, ValType::I64, Expression::i32(4));
    assert_eq!(load.to_string(), "(i64.load16_s (i32.const 4))");
}
