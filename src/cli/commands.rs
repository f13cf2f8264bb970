use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "knife-solo-data-bag")]
#[command(about = "Manage Chef-Solo data bags on the local filesystem", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Path to the configuration file")]
    pub config: Option<PathBuf>,

    #[arg(short = 'V', long, global = true, action = clap::ArgAction::Count, help = "More verbose output, can be repeated")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show a data bag or one of its items")]
    Show {
        #[arg(help = "Data bag name")]
        bag: Option<String>,

        #[arg(help = "Data bag item name")]
        item: Option<String>,

        #[command(flatten)]
        secrets: SecretArgs,

        #[arg(long, help = "The path to data bags")]
        data_bag_path: Option<PathBuf>,

        #[arg(short = 'F', long, value_enum, default_value_t = OutputFormat::Json, help = "Output format")]
        format: OutputFormat,
    },

    #[command(about = "Create a data bag, or an item within it")]
    Create {
        #[arg(help = "Data bag name")]
        bag: Option<String>,

        #[arg(help = "Data bag item name")]
        item: Option<String>,

        #[command(flatten)]
        secrets: SecretArgs,

        #[arg(long, help = "The path to data bags")]
        data_bag_path: Option<PathBuf>,

        #[arg(long = "json", conflicts_with = "json_file", help = "The data bag item content as a JSON string")]
        json_string: Option<String>,

        #[arg(long, help = "A file containing the data bag item content")]
        json_file: Option<PathBuf>,
    },

    #[command(about = "List the data bags")]
    List {
        #[arg(long, help = "The path to data bags")]
        data_bag_path: Option<PathBuf>,

        #[arg(short = 'F', long, value_enum, default_value_t = OutputFormat::Json, help = "Output format")]
        format: OutputFormat,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Show { .. } => "show",
            Commands::Create { .. } => "create",
            Commands::List { .. } => "list",
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct SecretArgs {
    #[arg(short, long, help = "The secret key to use to encrypt data bag item values")]
    pub secret: Option<String>,

    #[arg(long, value_name = "SECRET_FILE", help = "A directory containing per-environment secret files")]
    pub secret_file_path: Option<PathBuf>,

    #[arg(long, help = "Decrypt the data bag secret using AWS KMS")]
    pub enable_aws_kms: bool,

    #[arg(short, long, value_name = "AWS_REGION", default_value = "us-east-1", help = "AWS region to be used for decryption via AWS KMS")]
    pub region: String,

    #[arg(short = 'E', long, help = "The chef environment whose secret file is used")]
    pub environment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
