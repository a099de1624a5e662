use ascii_table::{Align, AsciiTable};
use std::env;
use std::fmt::Display;
use strival::{Interval, IntervalError};
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

const DEFAULT_PRECS: [u32; 4] = [10, 24, 53, 113];

#[derive(Clone, Copy)]
enum Op {
    Add,
    Sub,
    Mul,
    Neg,
}

impl Op {
    fn parse(s: &str) -> Result<Op, String> {
        match s {
            "add" => Ok(Op::Add),
            "sub" => Ok(Op::Sub),
            "mul" => Ok(Op::Mul),
            "neg" => Ok(Op::Neg),
            other => Err(format!("unknown operation `{}`", other)),
        }
    }

    fn arity(self) -> usize {
        match self {
            Op::Neg => 1,
            _ => 2,
        }
    }

    fn apply(self, x: &Interval, y: Option<&Interval>) -> Interval {
        match (self, y) {
            (Op::Add, Some(y)) => x + y,
            (Op::Sub, Some(y)) => x - y,
            (Op::Mul, Some(y)) => x * y,
            _ => -x,
        }
    }
}

fn parse_precs(args: &[String]) -> Result<Vec<u32>, String> {
    if args.is_empty() {
        return Ok(DEFAULT_PRECS.to_vec());
    }
    args.iter()
        .map(|a| match a.parse::<u32>() {
            Ok(p) if p >= 1 => Ok(p),
            _ => Err(format!("invalid precision `{}`", a)),
        })
        .collect()
}

fn display_table(op_name: &str, rows: &[Vec<String>], arity: usize) {
    let mut table = AsciiTable::default();
    table.set_max_width(240);
    table.column(0).set_header("Precision").set_align(Align::Right);
    table.column(1).set_header("x").set_align(Align::Left);
    let mut col = 2;
    if arity == 2 {
        table.column(col).set_header("y").set_align(Align::Left);
        col += 1;
    }
    table.column(col).set_header(op_name).set_align(Align::Left);

    let display_data: Vec<Vec<&dyn Display>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| cell as &dyn Display).collect())
        .collect();
    table.print(display_data);
}

fn run(op: Op, operands: &[String], precs: &[u32]) -> Result<Vec<Vec<String>>, IntervalError> {
    let mut rows = Vec::with_capacity(precs.len());
    for &prec in precs {
        let x = Interval::from_str_radix(&operands[0], 10, prec)?;
        let y = match operands.get(1) {
            Some(s) => Some(Interval::from_str_radix(s, 10, prec)?),
            None => None,
        };
        let z = op.apply(&x, y.as_ref());
        debug!(prec, %x, result = %z, "evaluated");

        let mut row = vec![prec.to_string(), x.to_string()];
        if let Some(y) = &y {
            row.push(y.to_string());
        }
        row.push(z.to_string());
        rows.push(row);
    }
    Ok(rows)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <add|sub|mul|neg> <x> [y] [prec...]", args[0]);
        eprintln!("Example: {} mul -2.5 0.1 10 53", args[0]);
        std::process::exit(1);
    }

    let op = Op::parse(&args[1]).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let arity = op.arity();
    if args.len() < 2 + arity {
        eprintln!("Error: `{}` takes {} operand(s)", args[1], arity);
        std::process::exit(1);
    }
    let operands = &args[2..2 + arity];

    let precs = parse_precs(&args[2 + arity..]).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    match run(op, operands, &precs) {
        Ok(rows) => display_table(&args[1], &rows, arity),
        Err(e) => {
            eprintln!("Error parsing operand: {}", e);
            std::process::exit(1);
        }
    }
}
