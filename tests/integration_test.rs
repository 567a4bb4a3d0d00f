use bytes::{Buf, BytesMut};
use indexmap::{IndexMap, IndexSet};
use qexpr::codec::DecodeError;
use qexpr::expression::{
    BinaryExpression, BinaryOperator, ConstantOperand, DataType, Expression, ExpressionType,
    ExpressionVisitor, FunctionExpression, InExpression, IsNullExpression, LikeExpression,
    TimeSeriesOperand, UnaryExpression,
};
use qexpr::memory::{estimate, size_of_string};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;

const OPERATORS: [BinaryOperator; 13] = [
    BinaryOperator::Add,
    BinaryOperator::Sub,
    BinaryOperator::Mul,
    BinaryOperator::Div,
    BinaryOperator::Mod,
    BinaryOperator::Eq,
    BinaryOperator::Ne,
    BinaryOperator::Gt,
    BinaryOperator::Ge,
    BinaryOperator::Lt,
    BinaryOperator::Le,
    BinaryOperator::And,
    BinaryOperator::Or,
];

fn random_text(rng: &mut StdRng) -> String {
    const ALPHABET: [&str; 8] = ["a", "b", "c", "1", "2", "é", "中", " "];
    let len = rng.gen_range(0..5);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect()
}

fn random_leaf(rng: &mut StdRng) -> Expression {
    match rng.gen_range(0..5) {
        0 => Expression::constant_int32(rng.gen()),
        1 => Expression::Constant(ConstantOperand::new(DataType::Text, random_text(rng))),
        2 => {
            let (device, sensor) = (rng.gen_range(0..3), rng.gen_range(0..3));
            Expression::time_series(format!("root.sg.d{}.s{}", device, sensor))
        }
        3 => Expression::Timestamp,
        _ => Expression::Null,
    }
}

fn random_expression(rng: &mut StdRng, depth: u32) -> Expression {
    if depth == 0 {
        return random_leaf(rng);
    }
    match rng.gen_range(0..8) {
        0 => random_leaf(rng),
        1 => {
            let op = OPERATORS[rng.gen_range(0..OPERATORS.len())];
            Expression::binary_op(
                op,
                random_expression(rng, depth - 1),
                random_expression(rng, depth - 1),
            )
        }
        2 => Expression::not_expr(random_expression(rng, depth - 1)),
        3 => Expression::negation(random_expression(rng, depth - 1)),
        4 => Expression::IsNull(IsNullExpression::new(
            random_expression(rng, depth - 1),
            rng.gen(),
        )),
        5 => Expression::Like(LikeExpression::new(
            random_expression(rng, depth - 1),
            rng.gen(),
            random_text(rng),
        )),
        6 => {
            let values: Vec<String> = (0..rng.gen_range(0..6)).map(|_| random_text(rng)).collect();
            Expression::In(InExpression::from_values(
                random_expression(rng, depth - 1),
                rng.gen(),
                values,
            ))
        }
        _ => {
            let mut attributes = IndexMap::new();
            for _ in 0..rng.gen_range(0..3) {
                attributes.insert(random_text(rng), random_text(rng));
            }
            let args = (0..rng.gen_range(0..3))
                .map(|_| random_expression(rng, depth - 1))
                .collect();
            Expression::Function(FunctionExpression::with_attributes("f", attributes, args))
        }
    }
}

fn random_trees(seed: u64, count: usize) -> Vec<Expression> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| random_expression(&mut rng, 4)).collect()
}

#[test]
fn test_random_trees_round_trip() {
    for expr in random_trees(7, 200) {
        let bytes = expr.to_bytes();

        let mut stream = Vec::new();
        expr.serialize_to_stream(&mut stream).unwrap();
        assert_eq!(stream, bytes.to_vec(), "{}", expr);

        let decoded = Expression::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, expr);
        assert_eq!(decoded.expression_string(), expr.expression_string());
        assert_eq!(decoded.output_symbol(), expr.output_symbol());
        assert_eq!(decoded.ram_bytes_used(), expr.ram_bytes_used());

        let mut reader = stream.as_slice();
        assert_eq!(Expression::deserialize_from_stream(&mut reader).unwrap(), expr);
    }
}

#[test]
fn test_every_truncation_fails() {
    for expr in random_trees(11, 40) {
        let bytes = expr.to_bytes();
        for len in 0..bytes.len() {
            let prefix = &bytes[..len];
            assert!(Expression::from_bytes(prefix).is_err(), "prefix {} of {}", len, expr);

            let mut reader = prefix;
            assert!(Expression::deserialize_from_stream(&mut reader).is_err());
        }
    }
}

#[test]
fn test_in_round_trip_preserves_fields() {
    let child = Expression::add_expr(Expression::time_series("a"), Expression::time_series("b"));
    let expr = InExpression::from_values(child.clone(), true, ["x", "", "y", "x", "中文"]);
    let decoded = match Expression::from_bytes(&Expression::In(expr).to_bytes()).unwrap() {
        Expression::In(decoded) => decoded,
        other => panic!("Expected In expression, got {:?}", other),
    };

    assert!(decoded.is_not_in());
    assert_eq!(decoded.expression(), &child);
    let values: Vec<&str> = decoded.values().iter().map(String::as_str).collect();
    assert_eq!(values, vec!["x", "", "y", "中文"]);
}

#[test]
fn test_duplicates_encoded_once() {
    let expr = Expression::in_list(Expression::time_series("s"), ["a", "b", "a", "c"]);
    let mut cursor = expr.to_bytes();

    // tag, child (tag + path + alias flag), polarity
    cursor.advance(1 + 1 + 4 + 1 + 1 + 1);
    assert_eq!(cursor.get_i32(), 3);
    for expected in ["a", "b", "c"] {
        let len = cursor.get_i32() as usize;
        assert_eq!(&cursor[..len], expected.as_bytes());
        cursor.advance(len);
    }
    assert!(!cursor.has_remaining());
}

#[test]
fn test_duplicate_values_on_the_wire_collapse() {
    // Hand-built payload that repeats a value.
    let mut buf = BytesMut::new();
    Expression::in_set(Expression::Null, false, IndexSet::new()).serialize(&mut buf);
    let mut data = buf.to_vec();
    data.truncate(data.len() - 4);
    data.extend_from_slice(&[0, 0, 0, 2, 0, 0, 0, 1, b'v', 0, 0, 0, 1, b'v']);

    match Expression::from_bytes(&data).unwrap() {
        Expression::In(decoded) => assert_eq!(decoded.values().len(), 1),
        other => panic!("Expected In expression, got {:?}", other),
    }
}

#[test]
fn test_render_examples() {
    let temperature = || Expression::time_series("temperature");

    let expr = Expression::in_list(temperature(), ["10", "20"]);
    assert_eq!(expr.expression_string(), "temperature IN (10,20)");
    assert_eq!(expr.expression_string(), expr.expression_string());

    let expr = Expression::not_in_list(temperature(), ["10", "20"]);
    assert_eq!(expr.expression_string(), "temperature NOT IN (10,20)");

    let sum = Expression::add_expr(Expression::time_series("a"), Expression::time_series("b"));
    assert_eq!(sum.expression_string(), "a+b");
    let expr = Expression::in_list(sum, ["1"]);
    assert!(expr.expression_string().starts_with("(a+b) IN ("));

    let expr = Expression::in_list(temperature(), Vec::<String>::new());
    assert!(expr.expression_string().ends_with("()"));
    assert_eq!(Expression::from_bytes(&expr.to_bytes()).unwrap(), expr);
}

#[test]
fn test_rendering_asymmetry_is_pinned() {
    let cases = [
        (Expression::constant_int32(5), "5 IN (1)", "5 IN (1)"),
        (Expression::time_series("s1"), "s1 IN (1)", "s1 IN (1)"),
        (
            Expression::function("abs", vec![Expression::time_series("s1")]),
            "abs(s1) IN (1)",
            "abs(s1) IN (1)",
        ),
        (Expression::Timestamp, "Time IN (1)", "(Time) IN (1)"),
        (Expression::Null, "null IN (1)", "(null) IN (1)"),
        (
            Expression::negation(Expression::time_series("s1")),
            "(-s1) IN (1)",
            "(-s1) IN (1)",
        ),
    ];

    for (child, expression_string, output_symbol) in cases {
        let expr = Expression::in_list(child, ["1"]);
        assert_eq!(expr.expression_string(), expression_string);
        assert_eq!(expr.output_symbol(), output_symbol);
    }
}

#[test]
fn test_memory_grows_with_values() {
    let child = Expression::time_series("temperature");
    let mut values: IndexSet<String> = IndexSet::new();
    let mut previous = estimate(&Expression::in_set(child.clone(), false, values.clone()));

    for value in ["1", "22", "333", "a much longer value"] {
        values.insert(value.to_string());
        let current = estimate(&Expression::in_set(child.clone(), false, values.clone()));
        assert_eq!(current - previous, size_of_string(value));
        assert!(current > previous);
        previous = current;
    }
}

#[test]
fn test_memory_is_additive_over_children() {
    let left = Expression::in_list(Expression::time_series("a"), ["1", "2"]);
    let right = Expression::is_null(Expression::time_series("b"));
    let both = Expression::and(left.clone(), right.clone());
    assert!(estimate(&both) > estimate(&left) + estimate(&right));
}

#[test]
fn test_decode_errors_are_atomic() {
    let expr = Expression::in_list(Expression::time_series("s"), ["1", "2"]);
    let mut data = expr.to_bytes().to_vec();
    // Corrupt the polarity byte.
    data[1 + 1 + 4 + 1 + 1] = 7;
    assert!(matches!(
        Expression::from_bytes(&data),
        Err(DecodeError::InvalidBool(7))
    ));
}

/// Collects every referenced time series path, recursing through children.
struct PathCollector;

impl ExpressionVisitor<usize, Vec<String>> for PathCollector {
    fn visit_constant(&mut self, _: &ConstantOperand, _: &mut Vec<String>) -> usize {
        1
    }

    fn visit_time_series(&mut self, operand: &TimeSeriesOperand, paths: &mut Vec<String>) -> usize {
        paths.push(operand.path().to_string());
        1
    }

    fn visit_timestamp(&mut self, _: &mut Vec<String>) -> usize {
        1
    }

    fn visit_null(&mut self, _: &mut Vec<String>) -> usize {
        1
    }

    fn visit_binary(&mut self, expr: &BinaryExpression, paths: &mut Vec<String>) -> usize {
        1 + expr.left().accept(self, paths) + expr.right().accept(self, paths)
    }

    fn visit_logic_not(&mut self, expr: &UnaryExpression, paths: &mut Vec<String>) -> usize {
        1 + expr.expression().accept(self, paths)
    }

    fn visit_negation(&mut self, expr: &UnaryExpression, paths: &mut Vec<String>) -> usize {
        1 + expr.expression().accept(self, paths)
    }

    fn visit_is_null(&mut self, expr: &IsNullExpression, paths: &mut Vec<String>) -> usize {
        1 + expr.expression().accept(self, paths)
    }

    fn visit_like(&mut self, expr: &LikeExpression, paths: &mut Vec<String>) -> usize {
        1 + expr.expression().accept(self, paths)
    }

    fn visit_in(&mut self, expr: &InExpression, paths: &mut Vec<String>) -> usize {
        1 + expr.expression().accept(self, paths)
    }

    fn visit_function(&mut self, expr: &FunctionExpression, paths: &mut Vec<String>) -> usize {
        1 + expr
            .arguments()
            .iter()
            .map(|arg| arg.accept(self, paths))
            .sum::<usize>()
    }
}

#[test]
fn test_visitor_traversal() {
    let expr = Expression::or(
        Expression::in_list(Expression::time_series("root.a"), ["1", "2"]),
        Expression::function(
            "max",
            vec![Expression::time_series("root.b"), Expression::constant_int32(3)],
        ),
    );

    let mut paths = Vec::new();
    let nodes = expr.accept(&mut PathCollector, &mut paths);
    assert_eq!(nodes, 6);
    assert_eq!(paths, vec!["root.a".to_string(), "root.b".to_string()]);
}

#[test]
fn test_shared_tree_across_threads() {
    let expr = Arc::new(Expression::not_in_list(
        Expression::mul_expr(Expression::time_series("s1"), Expression::constant_int32(2)),
        ["4", "8", "16"],
    ));
    let expected = expr.expression_string();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let expr = Arc::clone(&expr);
            thread::spawn(move || (expr.expression_string(), expr.to_bytes()))
        })
        .collect();

    for handle in handles {
        let (text, bytes) = handle.join().unwrap();
        assert_eq!(text, expected);
        assert_eq!(Expression::from_bytes(&bytes).unwrap(), *expr);
    }
}

#[test]
fn test_concurrent_decoding() {
    let encoded: Vec<_> = random_trees(23, 32).iter().map(Expression::to_bytes).collect();
    let encoded = Arc::new(encoded);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let encoded = Arc::clone(&encoded);
            thread::spawn(move || {
                encoded
                    .iter()
                    .skip(worker)
                    .step_by(4)
                    .map(|bytes| Expression::from_bytes(bytes).map(|e| e.to_bytes() == *bytes))
                    .collect::<Result<Vec<bool>, _>>()
            })
        })
        .collect();

    for handle in handles {
        let matches = handle.join().unwrap().unwrap();
        assert!(matches.into_iter().all(|ok| ok));
    }
}

#[test]
fn test_expression_type_reported() {
    let expr = Expression::in_list(Expression::time_series("s"), ["1"]);
    assert_eq!(expr.expression_type(), ExpressionType::In);
    assert_eq!(expr.to_bytes()[0], ExpressionType::In as u8);
}
