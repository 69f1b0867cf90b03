use clap::Parser;
use log::{error, info};
use prune::{
    cli::commands::{version_lines, Cli},
    utils::reporting::Reporter,
    Reconciler, RunConfig, SqliteStore, SymphoniaTagReader, TagWriters,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.version {
        for line in version_lines() {
            println!("{}", line);
        }
        return;
    }

    let config = RunConfig::from(cli);
    if let Err(e) = run(&config) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &RunConfig) -> prune::Result<()> {
    info!("Opening library database {}", config.db_path.display());
    let store = SqliteStore::open(&config.db_path)?;

    if config.dry_run {
        info!("Dry run mode: no file will be modified");
    }

    let reader = SymphoniaTagReader;
    let writers = TagWriters::with_program(config.tagger.clone());
    let reconciler = Reconciler::new(config, &reader, &store, &writers);
    let report = reconciler.process_directory()?;

    if let Some(path) = &config.report_path {
        if let Err(e) = Reporter::new().generate_run_report(&report, path) {
            error!("Error generating report: {}", e);
        }
    }

    Ok(())
}
