use clap::Parser;

mod args;
mod survey;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    if let Err(e) = survey::run(&args) {
        eprintln!("An error occured: {}", e);
        std::process::exit(1);
    }
}
