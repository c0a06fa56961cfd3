use preflight::cli::commands::{CliArgs, Commands};
use preflight::cli::handlers::{handle_config, handle_probe, handle_socket};
use preflight::util::logging::{self, LoggingConfig};
use preflight::{PreflightConfig, VERSION};

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("preflight v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let config = PreflightConfig::default();

    let exit_code = match &args.command {
        Commands::Socket(socket_args) => handle_socket(socket_args, &config).await,
        Commands::Probe(probe_args) => handle_probe(probe_args, &config).await,
        Commands::Config(config_args) => handle_config(config_args, &config),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = logging::parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    logging::init_logging(config);
}
