use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;
use vibecol::context::ExecutionContext;
use vibecol::expression::{BinaryOperator, Operator, TypeChecker};
use vibecol::record::{Record, ValueRecord};
use vibecol::symbol::{
    PartitionBy, PartitionBySymbolTable, StaticSymbolTable, SymbolTable, VALUE_IS_NULL,
};
use vibecol::types::{PhysicalType, Value};

fn long_add() -> Operator {
    Operator::add(
        Operator::column(0, PhysicalType::Int64),
        Operator::column(1, PhysicalType::Int64),
    )
    .unwrap()
}

fn row(lhs: i64, rhs: i64) -> ValueRecord {
    ValueRecord::new(vec![Value::int64(lhs), Value::int64(rhs)])
}

#[test]
fn test_add_scenarios() {
    let expr = long_add();

    let record = row(10, 20);
    assert_eq!(expr.get_int64(&record), 30);
    assert_eq!(expr.get_float64(&record), 30.0);

    let record = row(i64::MIN, 5);
    assert_eq!(expr.get_int64(&record), i64::MIN);
    assert!(expr.get_float64(&record).is_nan());
}

#[test]
fn test_add_properties_hold_for_random_operands() {
    let expr = long_add();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..10_000 {
        let a: i64 = rng.gen();
        let b: i64 = rng.gen();
        let record = row(a, b);

        if a == i64::MIN || b == i64::MIN {
            assert_eq!(expr.get_int64(&record), i64::MIN);
            assert!(expr.get_float64(&record).is_nan());
        } else {
            assert_eq!(expr.get_int64(&record), a.wrapping_add(b));
            assert_eq!(expr.get_float64(&record), a.wrapping_add(b) as f64);
        }
    }

    // Random draws almost never hit the sentinel, so cover it directly
    for _ in 0..100 {
        let a: i64 = rng.gen();
        assert_eq!(expr.get_int64(&row(a, i64::MIN)), i64::MIN);
        assert!(expr.get_float64(&row(i64::MIN, a)).is_nan());
    }
}

#[test]
fn test_arithmetic_family_propagates_null() {
    let ops = [
        BinaryOperator::Add,
        BinaryOperator::Sub,
        BinaryOperator::Mul,
        BinaryOperator::Div,
    ];
    let mut rng = StdRng::seed_from_u64(42);

    for op in ops {
        let expr = Operator::try_binary(
            op,
            Operator::column(0, PhysicalType::Int64),
            Operator::column(1, PhysicalType::Int64),
        )
        .unwrap();

        for _ in 0..100 {
            let a: i64 = rng.gen_range(-1_000_000..1_000_000);
            assert_eq!(expr.get_int64(&row(a, i64::MIN)), i64::MIN, "{} rhs", op);
            assert_eq!(expr.get_int64(&row(i64::MIN, a)), i64::MIN, "{} lhs", op);
            assert!(expr.get_float64(&row(a, i64::MIN)).is_nan(), "{} float", op);
            assert_eq!(expr.evaluate(&row(i64::MIN, a)), Value::Null);
        }
    }
}

#[test]
fn test_symbol_table_round_trips() {
    let tickers = StaticSymbolTable::new((0..500).map(|i| format!("T{:03}", i))).unwrap();
    let tables: Vec<Box<dyn SymbolTable>> = vec![
        Box::new(PartitionBySymbolTable::new()),
        Box::new(tickers),
    ];

    for table in &tables {
        for key in 0..table.size() as i32 {
            let value = table.value(key).unwrap();
            assert_eq!(table.get_quick(value), key);
        }
        assert_eq!(table.value(VALUE_IS_NULL), None);
        assert_eq!(table.get_quick("not-in-domain"), VALUE_IS_NULL);
    }
}

#[test]
fn test_partition_scheme_table() {
    let context = ExecutionContext::new();
    let table = context.partition_by();

    assert_eq!(table.size(), 4);
    assert_eq!(table.get_quick("DAY"), 1);
    assert_eq!(table.value(1), Some("DAY"));
    assert_eq!(table.value(VALUE_IS_NULL), None);
    assert_eq!(table.get_quick("UNKNOWN_SCHEME"), VALUE_IS_NULL);
    assert_eq!(table.size(), 4);

    for scheme in PartitionBy::ALL {
        assert_eq!(table.get_quick(scheme.as_str()), scheme.code());
    }
}

#[test]
fn test_projection_over_rows() {
    const DAY: i64 = 86_400_000_000;

    // (ts, qty, price, side)
    let side = Arc::new(StaticSymbolTable::new(["buy", "sell"]).unwrap());
    let context = ExecutionContext::new().with_symbol_table(3, side);
    let schema = [
        PhysicalType::Date,
        PhysicalType::Int32,
        PhysicalType::Float64,
        PhysicalType::Symbol,
    ];
    let checker = TypeChecker::with_schema(&schema);

    let notional = Operator::mul(
        Operator::column(1, PhysicalType::Int32),
        Operator::column(2, PhysicalType::Float64),
    )
    .unwrap();
    let bucket = Operator::try_unary(
        vibecol::expression::UnaryOperator::Floor(PartitionBy::Day),
        Operator::column(0, PhysicalType::Date),
    )
    .unwrap();
    let is_sell = Operator::try_binary(
        BinaryOperator::Eq,
        context.symbol_column(3).unwrap(),
        Operator::string("sell"),
    )
    .unwrap();

    assert_eq!(checker.check(&notional).unwrap(), PhysicalType::Float64);
    assert_eq!(checker.check(&bucket).unwrap(), PhysicalType::Date);
    checker.check_filter_predicate(&is_sell).unwrap();

    let rows = vec![
        ValueRecord::new(vec![
            Value::Date(2 * DAY + 5),
            Value::Int32(3),
            Value::Float64(2.5),
            Value::Symbol(1),
        ]),
        ValueRecord::new(vec![
            Value::Date(DAY),
            Value::Null,
            Value::Float64(1.0),
            Value::Symbol(0),
        ]),
        ValueRecord::new(vec![Value::Null, Value::Int32(1), Value::Null, Value::Null]),
    ];

    let projected: Vec<(Value, Value, bool)> = rows
        .iter()
        .map(|rec| {
            (
                notional.evaluate(rec),
                bucket.evaluate(rec),
                is_sell.get_bool(rec),
            )
        })
        .collect();

    assert_eq!(
        projected,
        vec![
            (Value::Float64(7.5), Value::Date(2 * DAY), true),
            (Value::Null, Value::Date(DAY), false),
            (Value::Null, Value::Null, false),
        ]
    );
}

#[test]
fn test_concurrent_evaluation_of_shared_tree() {
    let expr = Arc::new(
        Operator::div(
            long_add(),
            Operator::column(2, PhysicalType::Int64),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..4i64)
        .map(|t| {
            let expr = Arc::clone(&expr);
            thread::spawn(move || {
                for i in 0..1_000i64 {
                    let divisor = i % 7;
                    let record = ValueRecord::new(vec![
                        Value::Int64(t * 1_000 + i),
                        Value::Int64(i),
                        Value::Int64(divisor),
                    ]);
                    let expected = if divisor == 0 {
                        i64::MIN
                    } else {
                        (t * 1_000 + 2 * i) / divisor
                    };
                    assert_eq!(expr.get_int64(&record), expected);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

/// A column-store style record: one slice per column, positioned on a row.
struct ColumnarRecord<'a> {
    longs: &'a [i64],
    doubles: &'a [f64],
    row: usize,
}

impl Record for ColumnarRecord<'_> {
    fn get_bool(&self, pos: usize) -> bool {
        panic!("no boolean column at {}", pos)
    }

    fn get_int32(&self, pos: usize) -> i32 {
        panic!("no int column at {}", pos)
    }

    fn get_int64(&self, pos: usize) -> i64 {
        assert_eq!(pos, 0);
        self.longs[self.row]
    }

    fn get_float64(&self, pos: usize) -> f64 {
        assert_eq!(pos, 1);
        self.doubles[self.row]
    }

    fn get_date(&self, pos: usize) -> i64 {
        self.get_int64(pos)
    }

    fn get_symbol_code(&self, pos: usize) -> i32 {
        panic!("no symbol column at {}", pos)
    }

    fn get_str(&self, pos: usize) -> Option<&str> {
        panic!("no string column at {}", pos)
    }
}

#[test]
fn test_custom_record_implementation() {
    let longs = [1, i64::MIN, 3, 4];
    let doubles = [0.5, 0.5, f64::NAN, -1.0];

    let expr = Operator::sub(
        Operator::column(1, PhysicalType::Float64),
        Operator::column(0, PhysicalType::Int64),
    )
    .unwrap();

    let results: Vec<Value> = (0..longs.len())
        .map(|row| {
            expr.evaluate(&ColumnarRecord {
                longs: &longs,
                doubles: &doubles,
                row,
            })
        })
        .collect();

    assert_eq!(
        results,
        vec![
            Value::Float64(-0.5),
            Value::Null,
            Value::Null,
            Value::Float64(-5.0),
        ]
    );
}
