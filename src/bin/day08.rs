use std::fs;
use std::io;
use std::io::prelude::*;

use sevenseg::{aggregate, FailurePolicy, Totals};
use tracing_subscriber::prelude::*;

fn report(prefix: &str, totals: &Totals) {
    println!("{}Day 8 part 1: {}", prefix, totals.unique_digits);
    println!("{}Day 8 part 2: {}", prefix, totals.readout_sum);
    if totals.skipped > 0 {
        println!("{}skipped {} malformed records", prefix, totals.skipped);
    }
}

fn run(paths: &[String], policy: FailurePolicy) -> Result<(), String> {
    if paths.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| format!("failed to read input: {}", e))?;
        let totals = aggregate(&input, policy).map_err(|e| e.to_string())?;
        report("", &totals);
    } else {
        for path in paths {
            let input =
                fs::read_to_string(path).map_err(|e| format!("{}: failed to read: {}", path, e))?;
            let totals = aggregate(&input, policy).map_err(|e| format!("{}: {}", path, e))?;
            report(&format!("{}: ", path), &totals);
        }
    }
    Ok(())
}

fn main() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let mut policy = FailurePolicy::Abort;
    let mut paths: Vec<String> = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--skip-malformed" => {
                policy = FailurePolicy::Skip;
            }
            _ => {
                paths.push(arg);
            }
        }
    }

    if let Err(e) = run(&paths, policy) {
        eprintln!("day08: {}", e);
        std::process::exit(1);
    }
}
