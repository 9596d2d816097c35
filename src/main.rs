use rainbowsprite::*;
use std::process::ExitCode;

#[derive(clap::Parser)]
#[command(version, about = "Palette-shuffled random sprites for ALttP ROMs")]
struct Args {
    /// Show extra debugging info
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Patches a ROM with random sprite on event and recolored sprites
    Patch(patch::Args),
    /// Writes recolored copies of a sprite as ZSPR files
    Export(export::Args),
    /// Inspects a ZSPR file
    Inspect(inspect::Args),
}

fn main() -> ExitCode {
    let args: Args = clap::Parser::parse();

    let level = match args.verbose {
        true => log::LevelFilter::Debug,
        false => log::LevelFilter::Info,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .target(pretty_env_logger::env_logger::Target::Stdout)
        .init();

    let res = match args.command {
        Commands::Patch(args) => patch::patch(args),
        Commands::Export(args) => export::export(args),
        Commands::Inspect(args) => inspect::inspect(args),
    };
    match res {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
