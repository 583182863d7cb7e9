//! Balance widget rendering and action handling.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::instrument;

use stockwidget_core::InventoryError;
use stockwidget_infra::{InventoryService, InventoryStore};

use crate::money::{MoneyError, format_currency};
use crate::prefs::{PrefsError, WidgetPrefs};

/// Text shown in place of the balance while it is masked.
pub const MASKED_BALANCE: &str = "$ ****";

/// Icon on the visibility button: it shows what pressing it will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyeIcon {
    /// Balance is masked; pressing reveals it.
    Open,
    /// Balance is shown; pressing masks it.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub balance_text: String,
    pub eye_icon: EyeIcon,
}

impl fmt::Display for WidgetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eye = match self.eye_icon {
            EyeIcon::Open => "show",
            EyeIcon::Closed => "hide",
        };
        write!(f, "{}  [{eye}]", self.balance_text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetAction {
    ToggleBalance,
    ManageInventory,
}

impl WidgetAction {
    pub fn broadcast_name(self) -> &'static str {
        match self {
            WidgetAction::ToggleBalance => "TOGGLE_BALANCE",
            WidgetAction::ManageInventory => "MANAGE_INVENTORY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown widget action {0:?}")]
pub struct ParseActionError(pub String);

impl FromStr for WidgetAction {
    type Err = ParseActionError;

    /// Accepts the bare broadcast name or one qualified with a package
    /// prefix (`com.example.TOGGLE_BALANCE`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().rsplit('.').next().unwrap_or_default();
        match name {
            "TOGGLE_BALANCE" => Ok(WidgetAction::ToggleBalance),
            "MANAGE_INVENTORY" => Ok(WidgetAction::ManageInventory),
            _ => Err(ParseActionError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetOutcome {
    /// Redraw the widget with this view.
    Rendered(WidgetView),
    /// The host should bring up the inventory management screen.
    OpenManager,
}

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Prefs(#[from] PrefsError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("cannot display balance: {0}")]
    Money(#[from] MoneyError),
}

/// The widget: a balance line plus a visibility toggle.
#[derive(Debug)]
pub struct BalanceWidget<S, P> {
    service: InventoryService<S>,
    prefs: P,
}

impl<S, P> BalanceWidget<S, P>
where
    S: InventoryStore,
    P: WidgetPrefs,
{
    pub fn new(service: InventoryService<S>, prefs: P) -> Self {
        Self { service, prefs }
    }

    pub fn service(&self) -> &InventoryService<S> {
        &self.service
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    /// Build the current view. The store is only read when the balance is
    /// visible.
    pub async fn render(&self) -> Result<WidgetView, WidgetError> {
        let state = self.prefs.load()?;
        if !state.balance_visible {
            return Ok(WidgetView {
                balance_text: MASKED_BALANCE.to_string(),
                eye_icon: EyeIcon::Open,
            });
        }

        let balance = self.service.balance().await?;
        Ok(WidgetView {
            balance_text: format_currency(balance)?,
            eye_icon: EyeIcon::Closed,
        })
    }

    #[instrument(skip(self), err)]
    pub async fn handle(&self, action: WidgetAction) -> Result<WidgetOutcome, WidgetError> {
        match action {
            WidgetAction::ToggleBalance => {
                let state = self.prefs.load()?.toggled();
                self.prefs.save(&state)?;
                tracing::debug!(
                    balance_visible = state.balance_visible,
                    "balance visibility toggled"
                );
                Ok(WidgetOutcome::Rendered(self.render().await?))
            }
            WidgetAction::ManageInventory => Ok(WidgetOutcome::OpenManager),
        }
    }
}
