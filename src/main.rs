use clap::Parser;
use rename_media_date::batch;
use rename_media_date::copy::{CopyOptions, Organiser};
use rename_media_date::metadata::MetadataExtractor;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rename-media-date")]
#[command(about = "Rename media files with date and time taken/created")]
struct Cli {
    /// Input file specification (e.g. "*.jpg" or "videos/*.mp4")
    file_spec: String,
    /// Destination directory for renamed copies (default: each file's own directory)
    destination_dir: Option<PathBuf>,
    /// Simulate or preview the renaming process
    #[arg(long, short)]
    simulate: bool,
    /// Adjust taken/created time by this many hours (negative numbers subtract)
    #[arg(long, short, default_value_t = 0, allow_negative_numbers = true)]
    adjust: i64,
    /// Copy even if the target exists or a file with the same name and a different timestamp does
    #[arg(long)]
    force: bool,
    /// Suppress per-file output (show only progress bar and summary)
    #[arg(long, short)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let options = CopyOptions {
        destination: cli.destination_dir,
        hour_offset: cli.adjust,
        simulate: cli.simulate,
        force: cli.force,
        quiet: cli.quiet,
    };
    log::debug!("running with {:?}", options);

    let mut organiser = Organiser::new(MetadataExtractor::new().quiet(cli.quiet), options);
    if let Some(summary) = batch::run(&cli.file_spec, &mut organiser)? {
        println!("\n{}", summary);
    }
    Ok(())
}
