//! Word-count demo over `mapreduce-core`.
//!
//! Splits every input file on ASCII whitespace, emits `(token, "1")`,
//! and writes one `result-<partition>.txt` file per partition with
//! `<key>: <count>\n` lines in ascending key order.

use std::fs::File;
use std::io::Write;
use std::sync::Mutex;

use mapreduce_core::{run, MapContext, ReduceContext, RunConfig};

fn print_usage(program: &str) {
    eprintln!("usage: {program} [--workers N] [--partitions N] FILE...");
}

struct Args {
    files: Vec<String>,
    num_workers: usize,
    num_partitions: usize,
}

fn parse_args() -> Option<Args> {
    let mut argv = std::env::args();
    let program = argv.next().unwrap_or_else(|| "wordcount".to_string());

    let mut files = Vec::new();
    let mut num_workers = 8usize;
    let mut num_partitions = 16usize;

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--workers" | "-w" => {
                let value = argv.next()?;
                num_workers = value.parse().ok()?;
            }
            "--partitions" | "-p" => {
                let value = argv.next()?;
                num_partitions = value.parse().ok()?;
            }
            "--help" | "-h" => {
                print_usage(&program);
                return None;
            }
            other => files.push(other.to_string()),
        }
    }

    if files.is_empty() {
        print_usage(&program);
        return None;
    }

    Some(Args {
        files,
        num_workers,
        num_partitions,
    })
}

fn mapper(file_name: &str, ctx: &MapContext) {
    let contents = match std::fs::read_to_string(file_name) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("[wordcount] failed to read {file_name}: {e}");
            return;
        }
    };
    for token in contents.split_whitespace() {
        if let Err(e) = ctx.emit(token.as_bytes(), b"1") {
            eprintln!("[wordcount] emit failed for token {token:?}: {e}");
        }
    }
}

fn open_result_file(partition_index: usize) -> Mutex<File> {
    let path = format!("result-{partition_index}.txt");
    let file = File::create(&path).unwrap_or_else(|e| panic!("failed to create {path}: {e}"));
    Mutex::new(file)
}

fn reducer(key: &[u8], partition_index: usize, ctx: &ReduceContext, out: &Mutex<File>) {
    let mut count = 0u64;
    while ctx.get_next(key, partition_index).is_some() {
        count += 1;
    }
    let key = String::from_utf8_lossy(key);
    let mut out = out.lock().unwrap();
    writeln!(out, "{key}: {count}").expect("failed to write result file");
}

fn main() {
    let args = match parse_args() {
        Some(args) => args,
        None => std::process::exit(2),
    };

    let outputs: Vec<Mutex<File>> = (0..args.num_partitions).map(open_result_file).collect();

    let result = run(
        &args.files,
        mapper,
        move |key: &[u8], partition_index: usize, ctx: &ReduceContext| {
            reducer(key, partition_index, ctx, &outputs[partition_index]);
        },
        RunConfig::default()
            .num_workers(args.num_workers)
            .num_partitions(args.num_partitions),
    );

    if let Err(e) = result {
        eprintln!("[wordcount] run failed: {e}");
        std::process::exit(1);
    }
}
