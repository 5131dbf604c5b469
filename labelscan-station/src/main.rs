//! labelscan-station - terminal scan-to-print workstation
//!
//! Scan (or type) a barcode, the matching label page is looked up on the
//! print-server and printed after a short cancellable countdown. Duplicate
//! prints require confirmation first.

mod config;
mod logger;
mod remote;

use anyhow::Context;
use config::Config;
use labelscan_client::ClientConfig;
use labelscan_workflow::{
    JsonFileSettings, ScanWorkflow, SettingsStore, WorkflowEvent, WorkflowState, keys,
};
use remote::PrintServer;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    logger::init_logger(&config.log_level, config.log_json)?;

    let settings = Arc::new(
        JsonFileSettings::open(&config.settings_path)
            .with_context(|| format!("failed to open settings at {}", config.settings_path))?,
    );

    let client = ClientConfig::new(&config.server_url)
        .with_timeout(config.request_timeout_secs)
        .build();

    match client.health().await {
        Ok(health) => tracing::info!(status = %health.status, "print-server reachable"),
        Err(e) => eprintln!(
            "warning: print-server unreachable at {}: {e}",
            config.server_url
        ),
    }

    // Adopt the server's default printer on first run
    if settings.printer_name().is_none()
        && let Ok(list) = client.printers().await
        && let Some(default_printer) = list.default_printer
    {
        tracing::info!(printer = %default_printer, "using server default printer");
        settings.set(keys::SELECTED_PRINTER, serde_json::json!(default_printer));
    }

    let server = Arc::new(PrintServer::new(client));
    let shutdown = CancellationToken::new();
    let (workflow, handle, mut events) = ScanWorkflow::new(
        server.clone(),
        server,
        settings.clone(),
        shutdown.clone(),
    );
    let worker = tokio::spawn(workflow.run());

    println!("Scan to Print - scan a barcode, the label prints automatically.");
    println!("Commands: /yes confirm duplicate, /print print now, /cancel abort, /quit exit");
    println!("Ready to scan");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,

            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        match line.trim() {
                            "" => {}
                            "/quit" | "/q" => break,
                            "/yes" | "/y" => handle.confirm().await,
                            "/cancel" | "/c" => handle.cancel().await,
                            "/print" | "/p" => handle.print().await,
                            code => handle.lookup(code).await,
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("stdin read failed: {e}");
                        break;
                    }
                }
            }

            Some(event) = events.recv() => render_event(&event, &config.server_url),
        }
    }

    shutdown.cancel();
    let _ = worker.await;
    Ok(())
}

/// Render a workflow event for the operator
fn render_event(event: &WorkflowEvent, server_url: &str) {
    match event {
        WorkflowEvent::StateChanged(WorkflowState::LookingUp) => println!("Searching..."),

        WorkflowEvent::MatchFound { mapping } => {
            println!("Found: {} - page {}", mapping.doc_name, mapping.page_num);
        }

        WorkflowEvent::DuplicateDetected {
            mapping,
            print_count,
            last_print,
        } => {
            println!(
                "Duplicate print detected: {} - page {}",
                mapping.doc_name, mapping.page_num
            );
            let times = if *print_count == 1 { "time" } else { "times" };
            println!("This barcode has been printed {print_count} {times} before.");
            if let Some(last) = last_print {
                println!(
                    "Last printed: {} on {}",
                    last.timestamp.format("%b %e, %H:%M"),
                    last.printer
                );
            }
            println!("Print anyway? /yes to confirm, /cancel to abort");
        }

        WorkflowEvent::CountdownTick(remaining) => {
            println!("Printing in {remaining}... (/cancel to abort, /print to print now)");
        }

        WorkflowEvent::StateChanged(WorkflowState::Printing) => println!("Sending to printer..."),

        WorkflowEvent::Printed { message } => {
            println!("{}", message.as_deref().unwrap_or("Sent to printer"));
        }

        WorkflowEvent::PreviewReady { preview_url } => {
            println!(
                "Preview ready: {}{preview_url}",
                server_url.trim_end_matches('/')
            );
        }

        WorkflowEvent::Failed(error) => println!("Error: {error}"),

        WorkflowEvent::StateChanged(WorkflowState::Idle) => println!("Ready to scan"),

        WorkflowEvent::StateChanged(_) => {}
    }
}
