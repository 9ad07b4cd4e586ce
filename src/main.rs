use anyhow::*;
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::result::Result::Ok;

use svg_prefix::{prefix_ids, svg::write_svg, Element, Unit};

#[derive(Parser)]
#[command(name = "svg-prefix")]
#[command(about = "Namespace SVG ids for merging, and convert SVG lengths")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prefix every id and the references pointing at it
    Prefix {
        /// Input SVG file
        #[arg(short, long)]
        input: String,

        /// Prefix prepended to each id, e.g. doc1_
        #[arg(short, long)]
        prefix: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Convert a length such as 2.5cm to another unit
    Convert {
        /// Measurement; a bare number is read as px
        measure: String,

        /// Target unit: px, cm, mm or pt
        #[arg(long)]
        to: String,

        #[arg(long, default_value = "4")]
        precision: usize,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Prefix {
            input,
            prefix,
            output,
        } => prefix_pipeline(input, prefix, output.as_deref()),
        Command::Convert {
            measure,
            to,
            precision,
        } => {
            let unit = Unit::parse(measure)?;
            let converted = unit
                .to(to)
                .with_context(|| format!("convert {} to {}", unit, to))?;
            println!("{}", converted.fmt_precision(*precision));
            Ok(())
        }
    }
}

fn prefix_pipeline(input: &str, prefix: &str, output: Option<&str>) -> Result<()> {
    if prefix.is_empty() {
        bail!("--prefix must not be empty");
    }

    let input_svg = fs::read_to_string(input).with_context(|| format!("read {}", input))?;
    let root = Element::parse(&input_svg)?;
    info!("parsed {}", input);

    let svg = write_svg(&prefix_ids(&root, prefix));

    if let Some(output) = output {
        fs::write(output, &svg).with_context(|| format!("write {}", output))?;
        println!("wrote: {}", output);
    } else {
        println!("{}", svg);
    }

    Ok(())
}
