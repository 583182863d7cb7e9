use std::path::PathBuf;

use anyhow::Context;

use stockwidget_infra::config::default_db_path;
use stockwidget_infra::{InventoryService, SqliteInventoryStore, StoreConfig};
use stockwidget_widget::prefs::PREFS_PATH_ENV;
use stockwidget_widget::{BalanceWidget, JsonFilePrefs, WidgetAction, WidgetOutcome};

const USAGE: &str = "usage: stockwidget-widget [toggle|manage]";

fn parse_action(arg: &str) -> anyhow::Result<WidgetAction> {
    match arg {
        "toggle" => Ok(WidgetAction::ToggleBalance),
        "manage" => Ok(WidgetAction::ManageInventory),
        other => other.parse().with_context(|| USAGE.to_string()),
    }
}

fn prefs_for(config: &StoreConfig) -> anyhow::Result<JsonFilePrefs> {
    if let Some(path) = std::env::var_os(PREFS_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(JsonFilePrefs::new(PathBuf::from(path)));
    }

    let dir = match config.data_dir() {
        Some(dir) => dir.to_path_buf(),
        None => default_db_path()?
            .parent()
            .map(|p| p.to_path_buf())
            .context("default database path has no parent directory")?,
    };
    Ok(JsonFilePrefs::beside(&dir))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    stockwidget_observability::init();

    let action = std::env::args().nth(1).map(|a| parse_action(&a)).transpose()?;

    let config = StoreConfig::from_env().context("invalid store configuration")?;
    let prefs = prefs_for(&config)?;
    let store = SqliteInventoryStore::open(&config)
        .await
        .context("failed to open inventory store")?;
    tracing::info!(location = ?config.location, prefs = %prefs.path().display(), "widget starting");

    let widget = BalanceWidget::new(InventoryService::new(store.clone()), prefs);

    let outcome = match action {
        Some(action) => widget.handle(action).await?,
        None => WidgetOutcome::Rendered(widget.render().await?),
    };

    match outcome {
        WidgetOutcome::Rendered(view) => println!("{view}"),
        WidgetOutcome::OpenManager => println!("open: inventory manager"),
    }

    store.close().await;
    Ok(())
}
