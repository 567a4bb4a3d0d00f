//! qexpr - inspect serialized expression trees

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use log::{debug, info};
use qexpr::expression::Expression;
use qexpr::memory;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Decode a serialized expression and print its renderings
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File holding the serialized expression (stdin if omitted)
    input: Option<PathBuf>,

    /// Input is hex text instead of raw bytes
    #[arg(short = 'x', long)]
    hex: bool,

    /// Decode through the stream reader instead of the buffer cursor
    #[arg(short, long)]
    stream: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let raw = read_input(args.input.as_deref())?;
    let data = if args.hex {
        parse_hex(&String::from_utf8(raw).context("Hex input is not UTF-8")?)?
    } else {
        raw
    };
    info!("Read {} bytes", data.len());

    let expression = decode(&data, args.stream).context("Failed to decode expression")?;
    print!("{}", describe(&expression));
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut data = Vec::new();
            std::io::stdin()
                .read_to_end(&mut data)
                .context("Failed to read stdin")?;
            Ok(data)
        }
    }
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        bail!("Hex input has an odd number of digits");
    }
    digits
        .chunks(2)
        .map(|pair| {
            let byte: String = pair.iter().collect();
            u8::from_str_radix(&byte, 16).with_context(|| format!("Invalid hex byte '{}'", byte))
        })
        .collect()
}

fn decode(data: &[u8], stream: bool) -> Result<Expression> {
    if stream {
        debug!("Decoding through stream reader");
        let mut reader = data;
        let expression = Expression::deserialize_from_stream(&mut reader)?;
        if !reader.is_empty() {
            bail!("{} trailing bytes after expression", reader.len());
        }
        Ok(expression)
    } else {
        debug!("Decoding through buffer cursor");
        Ok(Expression::from_bytes(data)?)
    }
}

fn describe(expression: &Expression) -> String {
    format!(
        concat!(
            "type:          {:?}\n",
            "expression:    {}\n",
            "output symbol: {}\n",
            "encoded bytes: {}\n",
            "retained est.: {}\n",
        ),
        expression.expression_type(),
        expression.expression_string(),
        expression.output_symbol(),
        expression.to_bytes().len(),
        memory::estimate(expression),
    )
}
