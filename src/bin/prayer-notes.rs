use anyhow::{Context, Result};
use clap::Parser;
use prayer_notes::cli::{Cli, Command, ConfigCommand, WatchArgs};
use prayer_notes::client::{AladhanClient, TimingsSource};
use prayer_notes::config::Config;
use prayer_notes::context::{AppContext, SharedContext, StandardContext};
use prayer_notes::controller::{SyncController, SyncOutcome, Trigger};
use prayer_notes::logging;
use prayer_notes::storage::{DocumentStore, VaultStore};
use prayer_notes::system::{DesktopNotifier, LogNotifier, Notifier};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx: SharedContext = Arc::new(StandardContext::new(cli.root.clone()));
    logging::init(ctx.as_ref(), cli.verbose)?;

    if let Command::Config(cmd) = cli.action() {
        return handle_config(ctx.as_ref(), cmd);
    }

    let config = Config::load_or_default(ctx.as_ref())?;
    let controller = build_controller(ctx.as_ref(), config)?;

    match cli.action() {
        Command::Sync => match controller.trigger(Trigger::Manual).await {
            SyncOutcome::Written(report) => {
                println!("Updated {}", report.path);
                Ok(())
            }
            SyncOutcome::Skipped { path } => {
                println!("A sync for {} is already running", path);
                Ok(())
            }
            SyncOutcome::Failed { phase, error } => {
                Err(anyhow::anyhow!("sync failed while {}: {}", phase, error))
            }
        },
        Command::Preview => {
            let rendered = controller.preview().await?;
            print!("{}", rendered);
            Ok(())
        }
        Command::Watch(args) => watch(ctx, controller, args).await,
        Command::Config(_) => Ok(()),
    }
}

fn build_controller(ctx: &dyn AppContext, config: Config) -> Result<SyncController> {
    let (source, store, notifier) = build_collaborators(ctx, &config)?;
    Ok(SyncController::new(config, source, store, notifier))
}

type Collaborators = (
    Arc<dyn TimingsSource>,
    Arc<dyn DocumentStore>,
    Arc<dyn Notifier>,
);

fn build_collaborators(ctx: &dyn AppContext, config: &Config) -> Result<Collaborators> {
    let store = VaultStore::new(config.vault_root(ctx)?);
    log::debug!("Using vault at {}", store.root().display());

    let source = AladhanClient::new(&config.api_url)?;
    let notifier: Arc<dyn Notifier> = if config.notifications {
        Arc::new(DesktopNotifier::default())
    } else {
        Arc::new(LogNotifier)
    };

    Ok((Arc::new(source), Arc::new(store), notifier))
}

async fn watch(ctx: SharedContext, mut controller: SyncController, args: &WatchArgs) -> Result<()> {
    let config = controller.config();
    let interval_mins = args.interval_mins.unwrap_or(config.refresh_interval_mins);

    if config.fetch_on_launch {
        let startup = controller.clone();
        tokio::spawn(async move {
            startup.trigger(Trigger::Startup).await;
        });
    }

    if interval_mins == 0 {
        log::info!("Refresh timer disabled; waiting for Ctrl-C");
        tokio::signal::ctrl_c().await?;
        return Ok(());
    }

    let period = Duration::from_secs(u64::from(interval_mins) * 60);
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    log::info!("Watching: syncing every {} minute(s)", interval_mins);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                reload_config(ctx.as_ref(), &mut controller);
                let timer = controller.clone();
                tokio::spawn(async move {
                    timer.trigger(Trigger::Timer).await;
                });
            }
            res = tokio::signal::ctrl_c() => {
                res?;
                log::info!("Stopping watch");
                return Ok(());
            }
        }
    }
}

/// Picks up edits made to the config file since the last cycle.
fn reload_config(ctx: &dyn AppContext, controller: &mut SyncController) {
    let config = match Config::load_or_default(ctx) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Keeping previous config: {:#}", e);
            return;
        }
    };
    let current = controller.config();
    if config == *current {
        return;
    }

    if !config.requires_rebuild(&current) {
        log::info!("Config changed on disk, using the new settings");
        controller.replace_config(config);
        return;
    }

    match build_collaborators(ctx, &config) {
        Ok((source, store, notifier)) => {
            log::info!("Vault, feed URL or notification setting changed, reconnecting");
            *controller = controller.rebuilt(config, source, store, notifier);
        }
        Err(e) => log::warn!("Keeping previous config: {:#}", e),
    }
}

fn handle_config(ctx: &dyn AppContext, cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => {
            println!("{}", ctx.get_config_file_path()?.display());
        }
        ConfigCommand::Show => {
            let config = Config::load_or_default(ctx)?;
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to serialize config")?
            );
        }
        ConfigCommand::Init { force } => {
            let path = ctx.get_config_file_path()?;
            if path.exists() && !force {
                println!("Config already exists at {}", path.display());
                return Ok(());
            }
            Config::default().save(ctx)?;
            println!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}
