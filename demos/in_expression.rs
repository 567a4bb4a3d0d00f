//! Example demonstrating IN / NOT IN expressions end to end

use qexpr::expression::{Expression, TimeSeriesOperand};
use qexpr::memory;

fn main() -> anyhow::Result<()> {
    println!("Set-Membership Expression Demo");
    println!("==============================");

    // Example 1: Rendering
    println!("\n1. Rendering");
    println!("------------");

    // temperature IN (10,20,10) -- the duplicate collapses
    let expr1 = Expression::in_list(Expression::time_series("temperature"), ["10", "20", "10"]);
    println!("expression string: {}", expr1.expression_string());
    println!("output symbol:     {}", expr1.output_symbol());

    // (a+b) NOT IN (1,2)
    let expr2 = Expression::not_in_list(
        Expression::add_expr(Expression::time_series("a"), Expression::time_series("b")),
        ["1", "2"],
    );
    println!("expression string: {}", expr2.expression_string());

    // Aliased column: the alias only shows up in the output symbol
    let expr3 = Expression::in_list(
        Expression::TimeSeries(TimeSeriesOperand::with_alias("root.sg.d1.s1", "temperature")),
        ["10"],
    );
    println!("expression string: {}", expr3.expression_string());
    println!("output symbol:     {}", expr3.output_symbol());

    // Example 2: Serialization
    println!("\n2. Serialization");
    println!("----------------");

    let bytes = expr1.to_bytes();
    println!("encoded {} bytes: {:02x?}", bytes.len(), &bytes[..]);

    let mut stream = Vec::new();
    expr1.serialize_to_stream(&mut stream)?;
    println!("stream encoding identical: {}", stream == bytes.to_vec());

    let decoded = Expression::from_bytes(&bytes)?;
    println!("decoded: {}", decoded);
    println!("round trip equal: {}", decoded == expr1);

    // Example 3: Memory accounting
    println!("\n3. Memory Accounting");
    println!("--------------------");

    for expr in [&expr1, &expr2, &expr3] {
        println!("{:<40} ~{} bytes", expr.to_string(), memory::estimate(expr));
    }

    Ok(())
}
