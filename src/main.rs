mod cli;
mod config;
mod context;
mod domain;
mod handlers;
mod infrastructure;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use config::Config;
use context::CommandContext;
use domain::DataBagError;
use handlers::{handle_create, handle_list, handle_show, ItemSource};
use infrastructure::AwsKmsClient;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command_name = cli.command.name();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err, command_name);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Show {
            bag,
            item,
            secrets,
            data_bag_path,
            format,
        } => {
            let ctx = CommandContext::new(secrets, data_bag_path, &config);
            let kms = AwsKmsClient::new()?;
            handle_show(bag, item, ctx, format, &kms)
        }
        Commands::Create {
            bag,
            item,
            secrets,
            data_bag_path,
            json_string,
            json_file,
        } => {
            let ctx = CommandContext::new(secrets, data_bag_path, &config);
            let kms = AwsKmsClient::new()?;
            let source = ItemSource {
                json_string,
                json_file,
            };
            handle_create(bag, item, source, ctx, &kms)
        }
        Commands::List {
            data_bag_path,
            format,
        } => {
            let ctx = CommandContext::new(Default::default(), data_bag_path, &config);
            handle_list(&ctx, format)
        }
    }
}

/// Usage errors get the subcommand's usage line first, every failure ends with a FATAL line.
fn report(err: &anyhow::Error, command_name: &str) {
    let is_usage = err
        .downcast_ref::<DataBagError>()
        .is_some_and(DataBagError::is_usage);

    if is_usage {
        let mut command = Cli::command();
        command.build();
        if let Some(subcommand) = command.find_subcommand_mut(command_name) {
            eprintln!("{}", subcommand.render_usage());
        }
    }

    ui::fatal(&format!("{:#}", err));
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
