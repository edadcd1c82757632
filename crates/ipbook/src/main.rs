//! `ipbook` - CLI for the flat-file IP address inventory
//!
//! This binary serves the browser-facing HTTP API and offers terminal
//! access to the same search, add, and edit operations, plus inventory
//! consistency checks.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use ipbook::cli::{
    AddCommand, CheckCommand, Cli, Command, ConfigCommand, EditCommand, SearchCommand, ServeCommand,
};
use ipbook::http::{build_router, AppState};
use ipbook::inventory::{AddForm, EditSession, Inventory};
use ipbook::record::IpRecord;
use ipbook::store::{FileStore, Store};
use ipbook::view::{search_view, SearchView};
use ipbook::{init_logging, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Serve(cmd) => handle_serve(&config, &cmd).await,
        Command::Search(cmd) => handle_search(&config, &cmd).await,
        Command::Add(cmd) => handle_add(&config, cmd).await,
        Command::Edit(cmd) => handle_edit(&config, cmd).await,
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Check(cmd) => handle_check(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<FileStore> {
    FileStore::open(config.data_path(), config.store.pretty).context("failed to open inventory")
}

async fn handle_serve(config: &Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let state = AppState {
        store: Arc::new(store),
        access: config.access.clone(),
        max_body_bytes: config.server.max_body_bytes,
    };
    let app = build_router(state);

    let bind = cmd
        .bind
        .clone()
        .unwrap_or_else(|| config.server.bind.clone());
    let addr: std::net::SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("ipbook listening on {bind}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("server failed")
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn handle_search(config: &Config, cmd: &SearchCommand) -> anyhow::Result<()> {
    if !config.access.can_view {
        anyhow::bail!("access denied: viewing the inventory is disabled");
    }

    let store = open_store(config)?;
    let records = store.load().await?;
    let view = search_view(&records, &cmd.query);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    match view {
        SearchView::Placeholder => println!("Enter a search term to see matching records."),
        SearchView::NoMatches => println!("No results found."),
        SearchView::Results(found) => {
            for record in &found {
                print_record(record);
            }
            println!("{} match(es).", found.len());
        }
    }
    Ok(())
}

fn print_record(record: &IpRecord) {
    println!("{}  [{}]", record.ip, record.status_label());
    println!("  Subnet:       {}", record.subnet);
    println!("  Gateway:      {}", record.gateway);
    if let Some(account) = &record.account_number {
        println!("  Account:      {account}");
    }
    if let Some(kind) = record.kind {
        println!("  Type:         {kind}");
    }
    if let Some(mac) = &record.mac {
        println!("  MAC:          {mac}");
    }
    if record.used {
        println!("  Bound:        {}", record.bound);
    }
    if let Some(date) = &record.date_used {
        println!("  Used since:   {date}");
    }
    if let Some(date) = &record.release_date {
        println!("  Released:     {date}");
    }
    if let Some(last) = &record.last_account {
        println!("  Last account: {last}");
    }
    println!();
}

async fn handle_add(config: &Config, cmd: AddCommand) -> anyhow::Result<()> {
    if !config.access.can_edit {
        anyhow::bail!("access denied: editing the inventory is disabled");
    }

    let store = open_store(config)?;
    let mut inventory = Inventory::from_records(store.load().await?);

    let form = AddForm {
        ip: cmd.ip,
        subnet: cmd.subnet,
        gateway: cmd.gateway,
        used: cmd.used,
        account_number: cmd.account,
        kind: cmd.kind.map(Into::into),
        mac: cmd.mac,
        bound: cmd.bound,
    };

    let ip = inventory.add(&form)?.ip.clone();
    let saved = store.save(inventory.into_records()).await?;
    println!("Added {ip} ({} record(s) total).", saved.len());
    Ok(())
}

async fn handle_edit(config: &Config, cmd: EditCommand) -> anyhow::Result<()> {
    if !config.access.can_edit {
        anyhow::bail!("access denied: editing the inventory is disabled");
    }

    let store = open_store(config)?;
    let mut inventory = Inventory::from_records(store.load().await?);
    let record = inventory
        .get(&cmd.ip)
        .ok_or_else(|| ipbook::Error::unknown_ip(&cmd.ip))?;

    // Pre-populate the draft from the record, then apply the flags that
    // were actually given.
    let mut session = EditSession::open(record);
    let draft = session.draft_mut();
    if cmd.used {
        draft.used = true;
    }
    if cmd.release {
        draft.used = false;
    }
    if let Some(account) = cmd.account {
        draft.account_number = account;
    }
    if let Some(kind) = cmd.kind {
        draft.kind = kind.into();
    }
    if let Some(mac) = cmd.mac {
        draft.mac = mac;
    }
    if cmd.bound {
        draft.bound = true;
    }

    let form = session.draft().clone();
    inventory.edit(&cmd.ip, &form)?;
    store.save(inventory.into_records()).await?;
    println!("Updated {}.", cmd.ip);
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let stats = store.stats()?;

    if json {
        let status = serde_json::json!({
            "data_path": store.path(),
            "total": stats.total,
            "used": stats.used,
            "free": stats.free,
            "file_size_bytes": stats.file_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("ipbook status");
        println!("-------------");
        println!("Inventory: {}", store.path().display());
        println!("Total:     {}", stats.total);
        println!("In use:    {}", stats.used);
        println!("Available: {}", stats.free);
        println!("File size: {} bytes", stats.file_size_bytes);
    }
    Ok(())
}

async fn handle_check(config: &Config, cmd: &CheckCommand) -> anyhow::Result<()> {
    let path = cmd.file.clone().unwrap_or_else(|| config.data_path());
    let store = FileStore::open(&path, config.store.pretty).context("failed to open inventory")?;
    let records = store.load().await?;

    let mut problems = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for record in &records {
        if !seen.insert(record.ip.as_str()) {
            problems.push(format!("{}: duplicate IP address", record.ip));
        }
        if let Some(violation) = record.invariant_violation() {
            problems.push(violation);
        }
    }

    if problems.is_empty() {
        println!(
            "{}: {} record(s), no problems found.",
            path.display(),
            records.len()
        );
        Ok(())
    } else {
        for problem in &problems {
            println!("  - {problem}");
        }
        anyhow::bail!("{} problem(s) found in {}", problems.len(), path.display())
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind address:   {}", config.server.bind);
                println!("  Max body bytes: {}", config.server.max_body_bytes);
                println!();
                println!("[Store]");
                println!("  Data path:      {}", config.data_path().display());
                println!("  Pretty output:  {}", config.store.pretty);
                println!();
                println!("[Access]");
                println!("  Can view:       {}", config.access.can_view);
                println!("  Can edit:       {}", config.access.can_edit);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
