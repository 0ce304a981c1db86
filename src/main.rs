use clap::Parser;
use finance_tracker::args::{Args, Command};
use finance_tracker::commands::{self, load_config};
use finance_tracker::Result;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with {} error: {e}", e.error_type());
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().finance_home().path();
    let format = args.common().format();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.data_file(), init_args.backup_copies())
                .await?
                .print(format)
        }

        Command::Add(add_args) => commands::add(load_config(home).await?, add_args)
            .await?
            .print(format),

        Command::Delete(delete_args) => commands::delete(load_config(home).await?, delete_args)
            .await?
            .print(format),

        Command::List(range) => commands::list(load_config(home).await?, range)
            .await?
            .print(format),

        Command::Summary(range) => commands::summary(load_config(home).await?, range)
            .await?
            .print(format),

        Command::Breakdown(breakdown_args) => {
            commands::breakdown(load_config(home).await?, breakdown_args)
                .await?
                .print(format)
        }

        Command::Monthly(range) => commands::monthly(load_config(home).await?, range)
            .await?
            .print(format),

        Command::Tags(range) => commands::tags(load_config(home).await?, range)
            .await?
            .print(format),

        Command::Insights(range) => commands::insights(load_config(home).await?, range)
            .await?
            .print(format),

        Command::Dashboard(range) => commands::dashboard(load_config(home).await?, range)
            .await?
            .print(format),

        Command::Export(export_args) => commands::export(load_config(home).await?, export_args)
            .await?
            .print(format),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and binary only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
