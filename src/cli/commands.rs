use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Container-runtime socket discovery and LLM provider availability checks
#[derive(Parser, Debug)]
#[command(
    name = "preflight",
    about = "Container-runtime socket discovery and LLM provider availability checks",
    version,
    long_about = "preflight answers \"is my infrastructure reachable\" before real work starts: \
                  it locates the local container-runtime control socket and probes LLM \
                  provider endpoints with a minimal completion request."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Locate the container-runtime socket",
        long_about = "Resolves the container-runtime control socket from DOCKER_HOST, the \
                      platform's conventional locations, or a fallback default.\n\n\
                      Examples:\n  \
                      preflight socket\n  \
                      preflight socket --ping\n  \
                      preflight socket --format json"
    )]
    Socket(SocketArgs),

    #[command(
        about = "Check LLM provider availability",
        long_about = "Sends one minimal completion request per provider and reports whether \
                      the endpoint answered with a well-formed response.\n\n\
                      Examples:\n  \
                      preflight probe --base-url https://api.openai.com/v1 --api-key sk-...\n  \
                      preflight probe --base-url https://generativelanguage.googleapis.com --provider gemini\n  \
                      preflight probe --providers providers.yaml --format json"
    )]
    Probe(ProbeArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct SocketArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, help = "Also check that a daemon answers on the socket")]
    pub ping: bool,

    #[arg(
        long,
        requires = "ping",
        help = "Exit non-zero when the ping gets no answer"
    )]
    pub strict: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ProbeArgs {
    #[arg(long, value_name = "URL", help = "Provider base URL")]
    pub base_url: Option<String>,

    #[arg(long, value_name = "KEY", help = "API key (may be omitted for local servers)")]
    pub api_key: Option<String>,

    #[arg(short = 'm', long, value_name = "MODEL", help = "Model name")]
    pub model: Option<String>,

    #[arg(
        short = 'p',
        long,
        value_name = "NAME",
        help = "Provider name, used to pick the wire format (e.g. 'gemini')"
    )]
    pub provider: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        conflicts_with = "base_url",
        help = "YAML file listing providers to probe concurrently"
    )]
    pub providers: Option<PathBuf>,

    #[arg(
        long,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..=600),
        help = "Probe timeout in seconds, 1-600 (default: PREFLIGHT_PROBE_TIMEOUT or 8)"
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_socket_args() {
        let args = CliArgs::parse_from(["preflight", "socket"]);
        match args.command {
            Commands::Socket(socket_args) => {
                assert_eq!(socket_args.format, OutputFormatArg::Human);
                assert!(!socket_args.ping);
                assert!(!socket_args.strict);
            }
            _ => panic!("Expected Socket command"),
        }
    }

    #[test]
    fn test_strict_requires_ping() {
        assert!(CliArgs::try_parse_from(["preflight", "socket", "--strict"]).is_err());
        assert!(CliArgs::try_parse_from(["preflight", "socket", "--ping", "--strict"]).is_ok());
    }

    #[test]
    fn test_probe_with_options() {
        let args = CliArgs::parse_from([
            "preflight",
            "probe",
            "--base-url",
            "https://generativelanguage.googleapis.com",
            "--api-key",
            "AIza-test",
            "--model",
            "gemini-pro",
            "--provider",
            "gemini",
            "--timeout",
            "3",
            "--format",
            "json",
        ]);

        match args.command {
            Commands::Probe(probe_args) => {
                assert_eq!(
                    probe_args.base_url.as_deref(),
                    Some("https://generativelanguage.googleapis.com")
                );
                assert_eq!(probe_args.api_key.as_deref(), Some("AIza-test"));
                assert_eq!(probe_args.model.as_deref(), Some("gemini-pro"));
                assert_eq!(probe_args.provider.as_deref(), Some("gemini"));
                assert_eq!(probe_args.timeout, Some(3));
                assert_eq!(probe_args.format, OutputFormatArg::Json);
            }
            _ => panic!("Expected Probe command"),
        }
    }

    #[test]
    fn test_timeout_out_of_range_is_rejected() {
        for timeout in ["0", "601"] {
            let result = CliArgs::try_parse_from(["preflight", "probe", "--timeout", timeout]);
            assert!(result.is_err(), "--timeout {} was accepted", timeout);
        }
        assert!(CliArgs::try_parse_from(["preflight", "probe", "--timeout", "600"]).is_ok());
    }

    #[test]
    fn test_providers_conflicts_with_base_url() {
        let result = CliArgs::try_parse_from([
            "preflight",
            "probe",
            "--base-url",
            "http://localhost:8000/v1",
            "--providers",
            "providers.yaml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["preflight", "-v", "socket"]);
        assert!(args.verbose);
        assert!(!args.quiet);

        let args = CliArgs::parse_from(["preflight", "--log-level", "debug", "config"]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(matches!(args.command, Commands::Config(_)));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(CliArgs::try_parse_from(["preflight", "-q", "-v", "socket"]).is_err());
    }
}
