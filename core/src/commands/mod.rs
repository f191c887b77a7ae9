/// Command definitions and parsing for the client REPL and one-shot mode.
mod execute;
mod help;
mod parse;

pub use help::help_text;

use crate::controller::{FormField, Snapshot};
use crate::display;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Request wallet authorization: connect
    Connect,
    /// Show the connected account
    Account,
    /// Set a form field: set <field> <value>
    Set { field: FormField, value: String },
    /// Show the current form
    Form,
    /// Submit the current form as a transfer + log record
    Send,
    /// Refresh and list all recorded transfers
    Transfers,
    /// Refresh the cached transfer count and show it
    Count,
    /// Print help
    Help { command: Option<String> },
    /// Exit the client
    Exit,
}

impl Command {
    /// Returns a confirmation prompt if this command should ask before
    /// executing. Needs the current snapshot to describe what will be sent.
    pub fn confirmation_prompt(&self, snapshot: &Snapshot) -> Option<String> {
        match self {
            Command::Send => Some(format!(
                "Send {} to {}?",
                if snapshot.form.amount.is_empty() {
                    "(no amount)".to_string()
                } else {
                    snapshot.form.amount.clone()
                },
                if snapshot.form.address_to.is_empty() {
                    "(no destination)".to_string()
                } else {
                    display::shorten_address(Some(&snapshot.form.address_to))
                },
            )),
            _ => None,
        }
    }
}
