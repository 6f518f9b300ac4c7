//! Command-line front end of `its-conv`.

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use log::error;

use its_conv::conv::{self, Conf, Format};

/// Converts integer transition systems between the KoAT, ARI and SMT-LIB control-flow formats.
///
/// The input format is deduced from the extension of the input file: `.koat`, `.ari` or `.smt2`.
#[derive(Debug, Parser)]
#[command(name = "its-conv", version, about)]
struct Cli {
    /// Input file.
    input: PathBuf,
    /// Output format.
    #[arg(long, value_enum)]
    to: Format,
    /// Input format, overrides the extension of the input file.
    #[arg(long, value_enum)]
    from: Option<Format>,
    /// Indents s-expression outputs.
    #[arg(long)]
    indent: bool,
}

fn setup_logs() {
    let env = env_logger::Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

fn main() {
    setup_logs();
    let cli = Cli::parse();

    let from = match cli.from.or_else(|| Format::of_path(&cli.input)) {
        Some(from) => from,
        None => Cli::command()
            .error(
                clap::error::ErrorKind::InvalidValue,
                format!(
                    "unknown input format for `{}`, expected a `.koat`, `.ari` or `.smt2` file",
                    cli.input.display()
                ),
            )
            .exit(),
    };
    let conf = Conf::new(cli.to).from(from).indent(cli.indent);

    match conv::convert_file(&cli.input, &conf) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            for (idx, e) in e.iter().enumerate() {
                if idx == 0 {
                    error!("{}", e)
                } else {
                    error!("- {}", e)
                }
            }
            std::process::exit(1)
        }
    }
}
