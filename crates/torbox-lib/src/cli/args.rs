use crate::output::ListingFormat;
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

#[derive(Debug, Clone)]
pub enum Command {
    List {
        config_path: Option<String>,
        format: ListingFormat,
    },
    Download {
        config_path: Option<String>,
        hint: Option<String>,
        file_hint: Option<String>,
        output_dir: Option<String>,
        no_download: bool,
        nul_delimited: bool,
        max_attempts: Option<u32>,
    },
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "torbox",
    version,
    about = "List and download torrents fetched by the TorBox cloud service"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        global = true
    )]
    verbose: u8,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Sets a custom config file (default: ./torbox.{toml,yaml} if present)",
        global = true
    )]
    config: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// List torrents in the account
    List {
        #[arg(short = 'H', long = "human-readable", help = "Human-readable output")]
        human_readable: bool,

        #[arg(
            short = 'J',
            long = "json",
            help = "JSON output, exactly as returned by the API",
            conflicts_with = "human_readable"
        )]
        json: bool,
    },

    /// Download the files of one or more torrents, verifying their MD5
    Download {
        #[arg(
            value_name = "NAME",
            help = "Torrent id, exact name or glob pattern (default: all torrents)"
        )]
        hint: Option<String>,

        #[arg(
            short = 'f',
            long = "file",
            value_name = "PATTERN",
            help = "Only files whose short name matches this name or glob pattern"
        )]
        file: Option<String>,

        #[arg(
            short = 'o',
            long = "output-dir",
            value_name = "DIR",
            help = "Overrides the directory files are downloaded into"
        )]
        output_dir: Option<String>,

        #[arg(
            short = 'D',
            long = "no-download",
            help = "Print the equivalent download commands instead of downloading"
        )]
        no_download: bool,

        #[arg(
            short = '0',
            long = "null",
            help = "Terminate printed commands with NUL instead of newline; implies --no-download"
        )]
        null: bool,

        #[arg(
            long = "max-attempts",
            value_name = "N",
            help = "Maximum download attempts per file when the server answers with an error status"
        )]
        max_attempts: Option<u32>,
    },
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Standard output carries listings and commands; logs go to stderr.
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy()
                .add_directive("hyper_util=warn".parse().unwrap()),
        )
        .init();

    let command = match cli.command {
        CliCommand::List {
            human_readable,
            json,
        } => Command::List {
            config_path: cli.config,
            format: if json {
                ListingFormat::Json
            } else if human_readable {
                ListingFormat::Human
            } else {
                ListingFormat::Machine
            },
        },
        CliCommand::Download {
            hint,
            file,
            output_dir,
            no_download,
            null,
            max_attempts,
        } => Command::Download {
            config_path: cli.config,
            hint,
            file_hint: file,
            output_dir,
            no_download,
            nul_delimited: null,
            max_attempts,
        },
    };

    Args { command, log_level }
}
