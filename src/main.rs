use std::io::{self, Read};

use clap::Parser;
use grammar_kit::*;
use tracing_subscriber::EnvFilter;

/// 从标准输入读取字符类 (每行一个, 例如 `a-z A-Z _`), 输出细分之后的公共字母表.
#[derive(clap::Parser)]
struct AppArgs {
    /// 只输出解析得到的字符类, 不做细分.
    #[clap(long)]
    no_refine: bool,
    /// 输出 debug 级别的日志. 设置了 `RUST_LOG` 时以环境变量为准.
    #[clap(short, long)]
    verbose: bool,
}

#[derive(thiserror::Error, Debug)]
enum InputError {
    #[error("line {line}: invalid item {item:?}, expected `c` or `c1-c2`")]
    InvalidItem { line: usize, item: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn parse_class(line_num: usize, line: &str) -> Result<CharSet, InputError> {
    let mut cs = CharSet::new();
    for item in line.split_ascii_whitespace() {
        let chars: Vec<char> = item.chars().collect();
        match chars.as_slice() {
            [c] => cs.add(*c),
            [from, '-', to] => cs.add_range(*from, *to),
            _ => Err(InputError::InvalidItem {
                line: line_num,
                item: item.to_string(),
            })?,
        }
    }
    Ok(cs)
}

fn main() -> Result<(), InputError> {
    let args = AppArgs::parse();
    let default_level = if args.verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut inp = String::new();
    io::stdin().read_to_string(&mut inp)?;
    let mut classes = inp
        .lines()
        .enumerate()
        .filter(|(_, s)| s.chars().any(|c| !c.is_whitespace()))
        .map(|(line_num, line)| parse_class(line_num + 1, line))
        .collect::<Result<Vec<_>, _>>()?;

    if args.no_refine {
        for (i, cs) in classes.iter().enumerate() {
            println!("C_{i}: {cs}");
        }
        return Ok(());
    }

    let alphabet = Alphabet::refine(&mut classes);
    for (i, cs) in classes.iter().enumerate() {
        let blocks: Vec<String> = alphabet
            .blocks_of(cs)
            .iter()
            .map(|b| b.to_string())
            .collect();
        println!("C_{i}: {cs}");
        println!("     blocks: {}", blocks.join(" "));
    }
    println!();
    println!("--- Alphabet ({} blocks) ---", alphabet.len());
    println!("{alphabet}");
    Ok(())
}
