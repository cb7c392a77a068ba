// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Narrative CLI entrypoint.
//!
//! By default this serves MCP over streamable HTTP at `http://127.0.0.1:<port>/mcp`.
//! Use `--mcp` to serve over stdio instead (intended for tool integrations).

use std::error::Error;
use std::sync::Arc;

use axum::Router;
use narrative::chat::ChatConfig;
use narrative::mcp::NarrativeMcp;
use narrative::navigator::{FlowMode, Navigator};
use narrative::source::{DataSource, TreeSource};
use narrative::store::{
    HandoffFolder, HandoffStore, MemoryHandoffStore, StartupPolicy, WriteDurability,
};
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_MCP_HTTP_PORT: u16 = 27436;
const LOG_ENV: &str = "NARRATIVE_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<data.json> | --data <data.json> | --demo-steps | --demo-tree] [--mode flow|builder] [--store <dir> [--fresh] [--durable-writes]] [--mcp-http-port <port>] [--log-json]\n  {program} [<data.json> | --data <data.json> | --demo-steps | --demo-tree] [--mode flow|builder] [--store <dir> [--fresh] [--durable-writes]] --mcp [--log-json]\n\nServes MCP over streamable HTTP at `http://127.0.0.1:<port>/mcp` by default.\n--mcp-http-port selects the port (0 = ephemeral; default {DEFAULT_MCP_HTTP_PORT}); --mcp serves over stdio instead.\n\nWithout a data source the built-in step table is used (--demo-steps).\n\n--store keeps the handoff record in <dir> across restarts; without it the record lives in memory.\n--fresh wipes a stored handoff record at startup even when the previous session is still marked active.\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n\nLogs go to stderr; filter with {LOG_ENV} (default `info`). --log-json switches to JSON lines."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    data: Option<String>,
    demo_steps: bool,
    demo_tree: bool,
    mode: Option<FlowMode>,
    store_dir: Option<String>,
    fresh: bool,
    durable_writes: bool,
    mcp: bool,
    mcp_http_port: Option<u16>,
    log_json: bool,
}

fn set_flag(flag: &mut bool) -> Result<(), ()> {
    if *flag {
        return Err(());
    }
    *flag = true;
    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mcp" => set_flag(&mut options.mcp)?,
            "--demo-steps" => set_flag(&mut options.demo_steps)?,
            "--demo-tree" => set_flag(&mut options.demo_tree)?,
            "--fresh" => set_flag(&mut options.fresh)?,
            "--durable-writes" => set_flag(&mut options.durable_writes)?,
            "--log-json" => set_flag(&mut options.log_json)?,
            "--data" => {
                if options.data.is_some() {
                    return Err(());
                }
                options.data = Some(args.next().ok_or(())?);
            }
            "--store" => {
                if options.store_dir.is_some() {
                    return Err(());
                }
                options.store_dir = Some(args.next().ok_or(())?);
            }
            "--mode" => {
                if options.mode.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.mode = Some(raw.parse().map_err(|_| ())?);
            }
            "--mcp-http-port" => {
                if options.mcp_http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.mcp_http_port = Some(port);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.data.is_some() {
                    return Err(());
                }
                options.data = Some(arg);
            }
        }
    }

    let sources = [options.data.is_some(), options.demo_steps, options.demo_tree]
        .into_iter()
        .filter(|selected| *selected)
        .count();
    if sources > 1 {
        return Err(());
    }

    if options.mcp && options.mcp_http_port.is_some() {
        return Err(());
    }

    if (options.fresh || options.durable_writes) && options.store_dir.is_none() {
        return Err(());
    }

    Ok(options)
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_source(options: &CliOptions) -> Result<DataSource, Box<dyn Error>> {
    let source = match (&options.data, options.demo_tree) {
        (Some(path), _) => DataSource::from_path(path)?,
        (None, true) => DataSource::demo_tree()?,
        (None, false) => DataSource::demo_steps()?,
    };
    tracing::info!(
        shape = %source.shape(),
        depths = source.depth_count(),
        nodes = source.len(),
        "data source loaded"
    );
    Ok(source)
}

fn open_store(
    options: &CliOptions,
) -> Result<(Arc<dyn HandoffStore>, Option<HandoffFolder>), Box<dyn Error>> {
    let Some(dir) = options.store_dir.as_deref() else {
        let store: Arc<dyn HandoffStore> = Arc::new(MemoryHandoffStore::new());
        return Ok((store, None));
    };

    let durability =
        if options.durable_writes { WriteDurability::Durable } else { WriteDurability::BestEffort };
    let folder = HandoffFolder::new(dir).with_durability(durability);
    let policy = if options.fresh { StartupPolicy::Wipe } else { StartupPolicy::Resume };
    let report = folder.start(policy)?;
    tracing::info!(
        root = %folder.root().display(),
        session_was_active = report.session_was_active,
        wiped = report.wiped,
        "handoff folder opened"
    );
    let store: Arc<dyn HandoffStore> = Arc::new(folder.clone());
    Ok((store, Some(folder)))
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "narrative".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging(options.log_json);

        let source = Arc::new(load_source(&options)?);
        let (store, folder) = open_store(&options)?;

        let mut navigator = Navigator::new(source).with_mode(options.mode.unwrap_or_default());
        match store.read_or_absent() {
            Some(record) => {
                let resumed_from = navigator.resume(&record, None);
                tracing::info!(
                    primary_id = %record.primary_id,
                    resumed_from = resumed_from.as_str(),
                    "resumed handoff"
                );
            }
            None => {
                navigator.seed_default();
            }
        }

        if ChatConfig::from_env().has_credentials() {
            tracing::debug!("chat credentials configured");
        }

        let mcp = NarrativeMcp::new(navigator, store);
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        if options.mcp {
            runtime.block_on(mcp.serve_stdio())?;
        } else {
            let port = options.mcp_http_port.unwrap_or(DEFAULT_MCP_HTTP_PORT);
            runtime.block_on(serve_http(mcp, port))?;
        }

        if let Some(folder) = folder {
            folder.end_session()?;
        }
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("narrative: {err}");
        std::process::exit(1);
    }
}

async fn serve_http(mcp: NarrativeMcp, port: u16) -> Result<(), Box<dyn Error>> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "serving MCP over streamable HTTP at /mcp");

    let config =
        StreamableHttpServerConfig { stateful_mode: true, ..StreamableHttpServerConfig::default() };
    let shutdown_token = config.cancellation_token.clone();

    let session_manager = Arc::new(LocalSessionManager::default());
    let mcp_service =
        StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config);

    let router = Router::new().nest_service("/mcp", mcp_service);
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "failed to listen for ctrl-c");
            }
            shutdown_token.cancel();
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};
    use narrative::navigator::FlowMode;

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_empty_args() {
        let options = parse(&[]).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_demo_tree_with_builder_mode() {
        let options = parse(&["--demo-tree", "--mode", "builder"]).expect("parse options");
        assert!(options.demo_tree);
        assert!(!options.demo_steps);
        assert_eq!(options.mode, Some(FlowMode::Builder));
        assert_eq!(options.mcp_http_port, None);
    }

    #[test]
    fn parses_data_flag_and_positional_data() {
        let options = parse(&["--data", "scenarios.json"]).expect("parse options");
        assert_eq!(options.data.as_deref(), Some("scenarios.json"));

        let options = parse(&["scenarios.json", "--mcp"]).expect("parse options");
        assert_eq!(options.data.as_deref(), Some("scenarios.json"));
        assert!(options.mcp);
    }

    #[test]
    fn parses_store_options() {
        let options =
            parse(&["--store", "state", "--fresh", "--durable-writes"]).expect("parse options");
        assert_eq!(options.store_dir.as_deref(), Some("state"));
        assert!(options.fresh);
        assert!(options.durable_writes);
    }

    #[test]
    fn parses_mcp_http_port_and_log_json() {
        let options = parse(&["--mcp-http-port", "1234", "--log-json"]).expect("parse options");
        assert_eq!(options.mcp_http_port, Some(1234));
        assert!(options.log_json);
        assert!(!options.mcp);
    }

    #[test]
    fn rejects_mcp_http_port_with_stdio_mcp_mode() {
        parse(&["--mcp", "--mcp-http-port", "0"]).unwrap_err();
    }

    #[test]
    fn rejects_multiple_sources() {
        parse(&["--demo-steps", "--demo-tree"]).unwrap_err();
        parse(&["data.json", "--demo-tree"]).unwrap_err();
        parse(&["one.json", "two.json"]).unwrap_err();
        parse(&["--data", "one.json", "two.json"]).unwrap_err();
    }

    #[test]
    fn rejects_store_modifiers_without_store() {
        parse(&["--fresh"]).unwrap_err();
        parse(&["--durable-writes"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_mode() {
        parse(&["--mode", "canvas"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_args_and_missing_values() {
        parse(&["--nope"]).unwrap_err();
        parse(&["--data"]).unwrap_err();
        parse(&["--store"]).unwrap_err();
        parse(&["--mcp-http-port", "not-a-port"]).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse(&["--mcp", "--mcp"]).unwrap_err();
        parse(&["--store", "a", "--store", "b"]).unwrap_err();
        parse(&["--mode", "flow", "--mode", "builder"]).unwrap_err();
    }
}
