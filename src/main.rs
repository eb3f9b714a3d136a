use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};
use rstt::parser_io::StatementTree;
use rstt::{CharSet, OutputFilter, ParseError, ParsedStatement, RenderOptions, TruthTable};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(value_name = "STATEMENT")]
    /// The statement to tabulate, e.g. '(a & b) > !c' (read from stdin if not provided)
    statement: Option<String>,

    #[arg(short, long, value_name = "FILE", conflicts_with = "statement")]
    /// Read the statement from a file
    input: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE")]
    /// The output filename (or stdout if not provided)
    output: Option<PathBuf>,

    #[arg(long)]
    /// Do not colorize the table
    no_color: bool,

    #[arg(long)]
    /// Draw the table with ASCII characters only
    ascii: bool,

    #[arg(long, conflicts_with = "dot")]
    /// Output the table in CSV format
    csv: bool,

    #[arg(short, long)]
    /// Output the parse tree in dot (GraphViz) format instead of a table
    dot: bool,

    #[arg(short, long, value_name = "FILTER", default_value_t = OutputFilter::Any)]
    /// Only show rows with this output: true, false or any
    filter: OutputFilter,

    #[arg(short, long, conflicts_with_all = ["csv", "dot"])]
    /// Print whether the statement is a tautology, a contradiction or contingent
    summary: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let raw_args =
        argfile::expand_args_from(wild::args_os(), argfile::parse_fromfile, argfile::PREFIX)?;
    let args = Args::parse_from(raw_args);

    simplelog::TermLogger::init(
        log_level(args.verbose),
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let source = read_statement(&args)?;
    let parsed = ParsedStatement::new(&source).map_err(|e| diagnose(&source, &e))?;
    info!("parsed statement {parsed}");

    let colorize = !args.no_color && args.output.is_none() && io::stdout().is_terminal();

    let mut writer = if let Some(output_file) = &args.output {
        let file = File::create(output_file)
            .with_context(|| format!("cannot create {}", output_file.display()))?;
        Box::new(BufWriter::new(file)) as Box<dyn Write>
    } else {
        Box::new(BufWriter::new(io::stdout())) as Box<dyn Write>
    };

    if args.dot {
        StatementTree::new(&parsed.statement).render_dot(&mut writer)?;
    } else {
        let table = TruthTable::new(&parsed).context("cannot make a truth table")?;

        if args.csv {
            table.write_csv(&mut writer, args.filter)?;
        } else {
            let options = RenderOptions {
                charset: if args.ascii {
                    CharSet::ASCII
                } else {
                    CharSet::PRETTY
                },
                colorize,
                filter: args.filter,
            };
            table.render(&mut writer, &options)?;
        }

        if args.summary {
            writeln!(writer, "{}", table.classify())?;
        }
    }

    // flush the writer before dropping it
    writer.flush()?;

    Ok(())
}

const fn log_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn read_statement(args: &Args) -> anyhow::Result<String> {
    if let Some(statement) = &args.statement {
        return Ok(statement.clone());
    }

    if let Some(input_file) = &args.input {
        return fs::read_to_string(input_file)
            .with_context(|| format!("cannot read {}", input_file.display()));
    }

    let mut statement = String::new();
    io::stdin()
        .read_to_string(&mut statement)
        .context("cannot read statement from stdin")?;
    Ok(statement)
}

/// Points at the offending character when the statement fits on one line.
fn diagnose(source: &str, error: &ParseError) -> anyhow::Error {
    match error.position() {
        Some(position) if !source.contains('\n') => {
            anyhow::anyhow!("{error}\n  {source}\n  {:>width$}", "^", width = position + 1)
        }
        _ => anyhow::anyhow!("{error}"),
    }
}
