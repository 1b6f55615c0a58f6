use clap::Parser;
use ext_icon_gen::{
    backend::{BackendChoice, MissingBackend},
    config::Style,
    icon_gen,
};
use std::{path::PathBuf, process::ExitCode};

#[derive(Debug, Parser)]
#[clap(
    name = "ext-icon-gen",
    about = "Generate the PNG icon set for a browser extension"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Icon sizes to generate. Overrides the sizes from the config file.
    #[clap(short, long, value_delimiter = ',', value_name = "SIZES")]
    png: Option<Vec<u32>>,

    /// JSON file with sizes, file names, palette and framing.
    #[clap(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Which strategy produces the PNG bytes
    #[clap(long, value_enum, default_value_t = BackendChoice::Auto)]
    backend: BackendChoice,

    /// Drawing style of the rendered icons
    #[clap(long, value_enum)]
    style: Option<Style>,

    /// Make the raw writer emit compressed scanlines and real checksums
    #[clap(long)]
    strict_png: bool,

    /// Also write icons.json for the extension manifest
    #[clap(long)]
    manifest: bool,

    /// More log output (-v info, -vv debug)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let verbosity = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(verbosity)
        .parse_default_env()
        .init();

    let result = icon_gen::generate_icons(icon_gen::Args {
        output: args.output,
        png: args.png,
        config: args.config,
        backend: args.backend,
        style: args.style,
        strict_png: args.strict_png,
        manifest: args.manifest,
    });

    match result {
        Ok(_) => {
            println!("\n✓ Icon generation complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Some(missing) = err.downcast_ref::<MissingBackend>() {
                eprintln!("error: {missing}");
                eprintln!("{}", missing.hint());
            } else {
                eprintln!("error: failed to generate icons: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
