//! Home-screen balance widget: renders the inventory balance, masks it on
//! demand, and routes the "manage inventory" action.

pub mod money;
pub mod prefs;
pub mod widget;

pub use money::{MoneyError, format_currency};
pub use prefs::{InMemoryPrefs, JsonFilePrefs, PrefsError, WidgetPrefs, WidgetState};
pub use widget::{
    BalanceWidget, EyeIcon, MASKED_BALANCE, ParseActionError, WidgetAction, WidgetError,
    WidgetOutcome, WidgetView,
};
