use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};

use strider::{Alphabet, longest_match, parse, parse_with_alphabet};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read tokens from FILE instead of standard input
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Permitted literal symbols (default: abc)
    #[arg(short, long, value_name = "CHARS")]
    alphabet: Option<String>,

    /// Print the reconstructed infix pattern before the result
    #[arg(short = 'p', long)]
    show_pattern: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

/// All tokens but the last, joined without separators, form the postfix
/// expression; the last token is the text to match.
fn run(args: &Args) -> Result<()> {
    let input = match &args.file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let tokens: Vec<&str> = input.split_whitespace().collect();
    let (text, expr_tokens) = match tokens.split_last() {
        Some((&last, rest)) => (Some(last), rest),
        None => (None, &tokens[..]),
    };
    let expr: String = expr_tokens.concat();

    let machine = match &args.alphabet {
        Some(chars) => parse_with_alphabet(&expr, &Alphabet::new(chars.chars()))?,
        None => parse(&expr)?,
    };
    if args.show_pattern {
        println!("{}", machine.pattern());
    }

    println!("{}", longest_match(&machine, text)?);
    Ok(())
}
