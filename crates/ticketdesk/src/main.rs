//! `ticketdesk` - CLI and server for the incident tracker
//!
//! `ticketdesk serve` runs the API; every other command is a client that
//! fetches the incident list, changes it locally and uploads it whole.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use chrono::Utc;
use clap::Parser;

use ticketdesk::cli::{
    AddCommand, Cli, Command, ConfigCommand, EditCommand, ExportCommand, ListCommand,
    ServeCommand, ViewArgs,
};
use ticketdesk::export::{display_date, render_svg};
use ticketdesk::{init_logging, open_store, server, ApiClient, Config, Dashboard, Record};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    if let Some(url) = cli.server {
        config.client.base_url = url;
    }

    match cli.command {
        Command::Serve(cmd) => handle_serve(config, cmd).await,
        Command::List(cmd) => handle_list(&config, &cmd).await,
        Command::Devices => handle_devices(&config).await,
        Command::Add(cmd) => handle_add(&config, cmd).await,
        Command::Edit(cmd) => handle_edit(&config, &cmd).await,
        Command::Delete(cmd) => handle_delete(&config, cmd.id).await,
        Command::Export(cmd) => handle_export(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    if let Some(backend) = cmd.backend {
        config.store.backend = backend.into();
    }
    config.validate()?;

    let store = open_store(&config.store).context("opening record store")?;
    server::serve(&config, store).await?;
    Ok(())
}

/// Fetch both lists from the server into a fresh dashboard.
async fn load_dashboard(config: &Config) -> anyhow::Result<(ApiClient, Dashboard)> {
    let client = ApiClient::new(&config.client.base_url, config.client_timeout())?;
    let records = client
        .fetch_records()
        .await
        .with_context(|| format!("fetching incidents from {}", client.base_url()))?;
    let devices = client.fetch_devices().await.context("fetching devices")?;

    let mut dashboard = Dashboard::new(config.dashboard.page_size);
    dashboard.load(records, devices);
    Ok((client, dashboard))
}

fn apply_view(dashboard: &mut Dashboard, view: &ViewArgs) {
    dashboard.set_date_filter(view.date);
    dashboard.go_to_page(view.page);
}

fn ensure_known_device(dashboard: &Dashboard, device: &str) -> anyhow::Result<()> {
    if dashboard.devices().iter().any(|d| d.name == device) {
        return Ok(());
    }
    let known: Vec<&str> = dashboard.devices().iter().map(|d| d.name.as_str()).collect();
    anyhow::bail!("unknown device '{device}', expected one of: {}", known.join(", "))
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let (_, mut dashboard) = load_dashboard(config).await?;
    apply_view(&mut dashboard, &cmd.view);
    let page = dashboard.current_page_records();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    println!(
        "{:<5} {:<10} {:<16} {:<12} {:<28} {:<28} {:<12}",
        "ID", "Date", "Name", "Division", "Problem", "Solving", "Device"
    );
    for record in &page {
        print_row(record, &dashboard);
    }
    println!();
    println!(
        "Page {} of {} ({} incidents{})",
        dashboard.current_page(),
        dashboard.total_pages().max(1),
        dashboard.filtered().len(),
        dashboard
            .date_filter()
            .map(|d| format!(" on {d}"))
            .unwrap_or_default()
    );
    Ok(())
}

fn print_row(record: &Record, dashboard: &Dashboard) {
    println!(
        "{:<5} {:<10} {:<16} {:<12} {:<28} {:<28} {:<12}",
        record.id,
        display_date(record, dashboard.zone()),
        record.name,
        record.division,
        record.problem,
        record.solving,
        record.device
    );
}

async fn handle_devices(config: &Config) -> anyhow::Result<()> {
    let (_, dashboard) = load_dashboard(config).await?;
    for device in dashboard.devices() {
        println!("{:>3}  {}", device.id, device.name);
    }
    Ok(())
}

async fn handle_add(config: &Config, cmd: AddCommand) -> anyhow::Result<()> {
    let (client, mut dashboard) = load_dashboard(config).await?;
    ensure_known_device(&dashboard, &cmd.device)?;

    dashboard.set_field("name", cmd.name)?;
    dashboard.set_field("division", cmd.division)?;
    dashboard.set_field("problem", cmd.problem)?;
    dashboard.set_field("solving", cmd.solving)?;
    dashboard.set_field("device", cmd.device)?;
    dashboard.set_form_date(cmd.date.unwrap_or_else(Utc::now));

    let records = dashboard.add()?;
    let id = records[0].id;
    client.push_records(records).await.context("saving incidents")?;
    println!("Added incident {id}");
    Ok(())
}

async fn handle_edit(config: &Config, cmd: &EditCommand) -> anyhow::Result<()> {
    let (client, mut dashboard) = load_dashboard(config).await?;
    if let Some(device) = &cmd.device {
        ensure_known_device(&dashboard, device)?;
    }

    dashboard.begin_edit(cmd.id)?;
    for (field, value) in cmd.field_updates() {
        dashboard.set_field(field, value)?;
    }
    if let Some(date) = cmd.date {
        dashboard.set_form_date(date);
    }

    let records = dashboard.save()?;
    client.push_records(records).await.context("saving incidents")?;
    println!("Updated incident {}", cmd.id);
    Ok(())
}

async fn handle_delete(config: &Config, id: i64) -> anyhow::Result<()> {
    let (client, mut dashboard) = load_dashboard(config).await?;
    let records = dashboard.delete(id)?;
    client.push_records(records).await.context("saving incidents")?;
    println!("Deleted incident {id}");
    Ok(())
}

async fn handle_export(config: &Config, cmd: &ExportCommand) -> anyhow::Result<()> {
    let (_, mut dashboard) = load_dashboard(config).await?;
    apply_view(&mut dashboard, &cmd.view);

    let page = dashboard.current_page_records();
    let svg = render_svg(&page, dashboard.zone());
    std::fs::write(&cmd.output, svg)
        .with_context(|| format!("writing {}", cmd.output.display()))?;
    println!("Exported {} incidents to {}", page.len(), cmd.output.display());
    Ok(())
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
                println!("  Bind address:       {}", config.bind_address());
                println!("  Require fields:     {}", config.server.require_fields);
                println!();
                println!("[Store]");
                println!("  Backend:            {}", config.store.backend);
                println!("  Data file:          {}", config.store.data_path().display());
                println!(
                    "  Devices file:       {}",
                    config.store.devices_path().display()
                );
                println!(
                    "  Database path:      {}",
                    config.store.database_path().display()
                );
                println!("  Seed devices:       {}", config.store.seed_devices.len());
                println!();
                println!("[Dashboard]");
                println!("  Page size:          {}", config.dashboard.page_size);
                println!();
                println!("[Client]");
                println!("  Server URL:         {}", config.client.base_url);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path)).context("configuration is invalid")?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
