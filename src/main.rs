//! vibecol - inspect symbol domains and evaluate operator trees

use anyhow::{anyhow, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use vibecol::context::ExecutionContext;
use vibecol::expression::{BinaryOperator, Operator};
use vibecol::record::EmptyRecord;
use vibecol::symbol::{SymbolTable, VALUE_IS_NULL};
use vibecol::types::{PhysicalType, Value};

/// vibecol - typed expression evaluation for columnar data
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the partition scheme domain
    Partitions,

    /// Look up the code of a partition scheme
    Lookup {
        /// Scheme name, e.g. DAY
        name: String,
    },

    /// Evaluate a binary operator over two literals
    Eval {
        /// Operator name or symbol (add, sub, mul, div, lt, eq, ...)
        #[arg(short, long, default_value = "add")]
        op: String,

        /// Physical type of both operands (int, long, double, date, ...)
        #[arg(short = 't', long = "type", default_value = "long")]
        physical_type: String,

        /// Left operand, or `null`
        #[arg(allow_hyphen_values = true)]
        lhs: String,

        /// Right operand, or `null`
        #[arg(allow_hyphen_values = true)]
        rhs: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let context = ExecutionContext::new();

    match args.command {
        Command::Partitions => list_partitions(&context),
        Command::Lookup { name } => {
            let code = context.partition_by().get_quick(&name);
            if code == VALUE_IS_NULL {
                println!("{}: NULL ({})", name, code);
            } else {
                println!("{}: {}", name, code);
            }
        }
        Command::Eval {
            op,
            physical_type,
            lhs,
            rhs,
        } => evaluate(&op, &physical_type, &lhs, &rhs)?,
    }

    Ok(())
}

fn list_partitions(context: &ExecutionContext) {
    let table = context.partition_by();
    println!("code  name");
    for code in 0..table.size() as i32 {
        println!("{:>4}  {}", code, table.value(code).unwrap_or("NULL"));
    }
}

fn evaluate(op: &str, physical_type: &str, lhs: &str, rhs: &str) -> Result<()> {
    let physical_type = PhysicalType::from_name(physical_type)?;
    let op = BinaryOperator::from_name(op).ok_or_else(|| anyhow!("Unknown operator: {}", op))?;

    let left = Value::parse(physical_type, lhs).context("Failed to parse left operand")?;
    let right = Value::parse(physical_type, rhs).context("Failed to parse right operand")?;

    let expr = Operator::try_binary(
        op,
        Operator::try_constant(physical_type, left)?,
        Operator::try_constant(physical_type, right)?,
    )?;

    println!("{} :: {}", expr, expr.physical_type());
    println!("= {}", format_value(&expr.evaluate(&EmptyRecord)));

    // Integer results also have a floating view
    if matches!(
        expr.physical_type(),
        PhysicalType::Int32 | PhysicalType::Int64 | PhysicalType::Date
    ) {
        println!("= {:?} (as DOUBLE)", expr.get_float64(&EmptyRecord));
    }

    Ok(())
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int32(v) => v.to_string(),
        Value::Int64(v) | Value::Date(v) => v.to_string(),
        Value::Float64(v) => format!("{:?}", v),
        Value::Symbol(code) => format!("#{}", code),
        Value::String(s) => s.clone(),
    }
}
