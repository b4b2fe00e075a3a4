use crate::args::ExportArgs;
use crate::config::Config;
use crate::csv_sink::{CsvSink, DEFAULT_FIELDS};
use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use logstitch_client::{ControllerClient, ControllerConfig, HttpPageFetcher};
use logstitch_core::{
    ExportOptions, MAX_PAGE_SIZE, RecordSink, StopReason, TiePolicy, WindowAdvancer,
};
use logstitch_types::{TimeWindow, format_api_timestamp, parse_local_timestamp};
use owo_colors::OwoColorize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const DEFAULT_USER: &str = "admin";
const DEFAULT_TENANT: &str = "admin";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Command-line arguments merged over the config file.
#[derive(Debug, Clone)]
struct ExportSettings {
    controller: ControllerConfig,
    window: TimeWindow,
    output: Option<PathBuf>,
    fields: Vec<String>,
    options: ExportOptions,
}

pub fn handle(config: &Config, args: ExportArgs) -> Result<()> {
    let settings = resolve(config, args)?;
    log::debug!(
        "exporting {} with page size {} and {} filter(s)",
        settings.window,
        settings.options.page_size,
        settings.options.filters.len()
    );

    let page_size = settings.options.page_size;
    let mut client =
        ControllerClient::new(&settings.controller).context("Invalid controller settings")?;
    if client.api_version().is_none() {
        let version = client
            .discover_api_version()
            .context("Could not discover the controller version")?;
        println!("Discovered controller version {}.", version);
        client.set_api_version(version);
    }
    let mut fetcher = HttpPageFetcher::new(client);

    let output: Box<dyn Write> = match &settings.output {
        Some(path) => {
            println!(":: Writing to file {}...", path.display());
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::sink()),
    };
    let mut sink = CsvSink::new(output, settings.fields)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        log::warn!("could not install Ctrl-C handler: {}", e);
    }

    let mut advancer = WindowAdvancer::new(settings.window, settings.options);
    while advancer.is_running() {
        if cancel.load(Ordering::SeqCst) {
            advancer.cancel();
            break;
        }

        println!(
            ":: Retrieving up to {} logs from {}...",
            advancer.page_size(),
            advancer.window()
        );
        match advancer.step(&mut fetcher, &mut sink) {
            Ok(report) => {
                if report.emitted > 0 {
                    println!("  Got {} logs", report.emitted);
                }
                if report.stop == Some(StopReason::Exhausted) {
                    println!(":: No more logs available");
                }
            }
            Err(error) => {
                if let Err(flush) = sink.finish() {
                    log::warn!("could not flush output after failure: {}", flush);
                }
                let failure = advancer.fail(error);
                println!(":: Error retrieving logs: {}: giving up!", failure.error);
                println!(":: {} logs were retrieved", failure.emitted);
                return Err(failure.into());
            }
        }
    }

    let summary = advancer.finish(&mut sink)?;
    match summary.stop {
        StopReason::Saturated { timestamp } => warn(&format!(
            "Warning: at least {} logs share the timestamp {}; some of them may be missing",
            page_size,
            format_api_timestamp(&timestamp)
        )),
        StopReason::Cancelled => warn("Warning: export interrupted"),
        StopReason::Exhausted => {}
    }
    println!(":: {} logs were retrieved", summary.emitted);
    Ok(())
}

fn warn(message: &str) {
    if io::stderr().is_terminal() {
        eprintln!("{}", message.yellow());
    } else {
        eprintln!("{}", message);
    }
}

fn resolve(config: &Config, args: ExportArgs) -> Result<ExportSettings> {
    let section = &config.controller;

    let address = args
        .controller
        .or_else(|| section.address.clone())
        .context("No controller given: use --controller or set [controller].address in the config")?;
    let password = args
        .password
        .context("No password given: use --password or set LOGSTITCH_PASSWORD")?;

    let start = parse_local_timestamp(&args.start)
        .with_context(|| format!("Invalid start time '{}'", args.start))?;
    let end = parse_local_timestamp(&args.end)
        .with_context(|| format!("Invalid end time '{}'", args.end))?;
    let window = TimeWindow::new(start, end).context("Invalid export window")?;

    let page_size = args
        .page_size
        .or(config.export.page_size)
        .unwrap_or(MAX_PAGE_SIZE);
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        log::warn!(
            "page size {} out of range, clamping to 1..={}",
            page_size,
            MAX_PAGE_SIZE
        );
    }

    let fields = if !args.fields.is_empty() {
        args.fields
    } else if let Some(fields) = config.export.fields.clone().filter(|f| !f.is_empty()) {
        fields
    } else {
        DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()
    };

    let filters = if args.filters.is_empty() {
        config.export.filters.clone()
    } else {
        args.filters
    };

    let tie_policy = args
        .tie_policy
        .or(config.export.tie_policy)
        .map(TiePolicy::from)
        .unwrap_or_default();

    Ok(ExportSettings {
        controller: ControllerConfig {
            address,
            user: args
                .user
                .or_else(|| section.user.clone())
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
            password,
            tenant: args
                .tenant
                .or_else(|| section.tenant.clone())
                .unwrap_or_else(|| DEFAULT_TENANT.to_string()),
            api_version: args.api_version.or_else(|| section.api_version.clone()),
            insecure: args.insecure || section.insecure.unwrap_or(false),
            timeout: Duration::from_secs(section.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        },
        window,
        output: args.output,
        fields,
        options: ExportOptions {
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            filters,
            tie_policy,
        },
    })
}
