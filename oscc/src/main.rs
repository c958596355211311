use clap::Parser;
use oscc::util::display;
use oscc::{Error, Options};
use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[clap(author, version, about)]
struct Args {
    /// Source file
    input: PathBuf,

    /// Keep intermediate artifacts (tokens, trees, scope tables)
    #[clap(short, long)]
    intermediate: bool,

    /// Output directory. Earlier artifacts of the same source are replaced
    #[clap(short, long, default_value = "output")]
    output: PathBuf,

    /// Print the generated assembly
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    let options = Options {
        input: args.input,
        output: args.output,
        intermediate: args.intermediate,
    };

    match oscc::compile(&options) {
        Ok(output) => {
            for warn in &output.warnings {
                display::warning(warn);
            }
            if args.verbose {
                display::listing(&output.assembly);
            }
            display::artifacts(&output.artifacts);
        }
        Err(err) => {
            if let Error::WithWarnings { warnings, .. } = &err {
                for warn in warnings {
                    display::warning(warn);
                }
            }
            display::error(&err);
            std::process::exit(1);
        }
    }
}
