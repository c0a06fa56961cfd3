//! Command handlers. Each returns the process exit code.

use super::commands::{ConfigArgs, ProbeArgs, SocketArgs};
use super::output::{OutputFormat, OutputFormatter, SocketReport};
use crate::config::{PreflightConfig, ProvidersFile};
use crate::probe::{NamedProbe, ProbeRequest, Prober};
use crate::socket::{DockerOptions, HostEnv, SocketLocator};
use anyhow::Result;
use tracing::{debug, error};

pub async fn handle_socket(args: &SocketArgs, config: &PreflightConfig) -> i32 {
    match run_socket(args, config).await {
        Ok(code) => code,
        Err(e) => {
            error!("Socket lookup failed: {:#}", e);
            2
        }
    }
}

async fn run_socket(args: &SocketArgs, config: &PreflightConfig) -> Result<i32> {
    let env = HostEnv {
        docker_host: config.docker_host.clone(),
        ..HostEnv::from_process()
    };
    let located = SocketLocator::real().locate(&env);

    let daemon_reachable = if args.ping {
        Some(DockerOptions::from(&located).ping().await?)
    } else {
        None
    };

    let report = SocketReport {
        platform: env.platform,
        located,
        daemon_reachable,
    };
    println!(
        "{}",
        OutputFormatter::new(OutputFormat::from(args.format)).format_socket(&report)?
    );

    Ok(match report.daemon_reachable {
        Some(false) if args.strict => 1,
        _ => 0,
    })
}

pub async fn handle_probe(args: &ProbeArgs, config: &PreflightConfig) -> i32 {
    match run_probe(args, config).await {
        Ok(code) => code,
        Err(e) => {
            error!("Probe failed: {:#}", e);
            2
        }
    }
}

async fn run_probe(args: &ProbeArgs, config: &PreflightConfig) -> Result<i32> {
    let effective = PreflightConfig {
        probe_timeout_secs: args.timeout.unwrap_or(config.probe_timeout_secs),
        ..config.clone()
    };
    effective.validate()?;

    let timeout = effective.probe_timeout();
    let prober = Prober::with_timeout(timeout);
    let probes = collect_probes(args, &effective)?;

    debug!("Probing {} provider(s) with {:?} timeout", probes.len(), timeout);
    let reports = prober.probe_all(&probes).await;

    println!(
        "{}",
        OutputFormatter::new(OutputFormat::from(args.format)).format_probes(&reports)?
    );

    let all_ok = !reports.is_empty() && reports.iter().all(|r| r.result.status);
    Ok(if all_ok { 0 } else { 1 })
}

/// Command-line endpoint, else `--providers`, else the configured providers file.
/// With none of them the single probe has an empty base URL and fails locally.
fn collect_probes(args: &ProbeArgs, config: &PreflightConfig) -> Result<Vec<NamedProbe>> {
    if args.base_url.is_none() {
        if let Some(path) = args.providers.as_ref().or(config.providers_file.as_ref()) {
            return Ok(ProvidersFile::load(path)?.probes());
        }
    }

    let request = ProbeRequest {
        base_url: args.base_url.clone().unwrap_or_default(),
        api_key: args.api_key.clone().unwrap_or_default(),
        model: args.model.clone(),
        provider_hint: args.provider.clone(),
    };
    let name = args
        .provider
        .clone()
        .unwrap_or_else(|| request.base_url.clone());

    Ok(vec![NamedProbe { name, request }])
}

/// Prints the configuration even when it is invalid, then exits 2 if it is
pub fn handle_config(args: &ConfigArgs, config: &PreflightConfig) -> i32 {
    let validation = config.validate();

    match OutputFormatter::new(OutputFormat::from(args.format)).format_config(config) {
        Ok(output) => {
            println!("{}", output);
            match validation {
                Ok(()) => 0,
                Err(e) => {
                    error!("{}", e);
                    2
                }
            }
        }
        Err(e) => {
            error!("Failed to format configuration: {:#}", e);
            2
        }
    }
}
