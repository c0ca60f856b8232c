pub mod analysis;
pub mod configuration;
pub mod questions;

use super::events::{Action, Notification};

/// Outcome of routing one input event to a view.
#[derive(Debug)]
pub enum InputResult {
    /// Not handled; falls through to global keybindings.
    Ignored,
    Consumed,
    /// Handled and produced an action for `AppState`.
    Action(Action),
    /// Handled but the user needs to be told something.
    Notify(Notification),
}
