use anyhow::Result;

use super::help::help_text;
use super::Command;
use crate::controller::TransferController;
use crate::display;

impl Command {
    /// Execute a command against the controller and return the output string.
    pub async fn execute(
        &self,
        controller: &TransferController,
        json_output: bool,
    ) -> Result<String> {
        match self {
            Command::Connect => {
                let account = controller.connect().await?;
                if json_output {
                    Ok(serde_json::json!({ "account": account }).to_string())
                } else {
                    Ok(format!("Connected. Account: {account}"))
                }
            }

            Command::Account => {
                let snapshot = controller.snapshot();
                if json_output {
                    Ok(serde_json::json!({ "account": snapshot.account }).to_string())
                } else {
                    match snapshot.account {
                        Some(account) => Ok(format!(
                            "{}  ({account})",
                            display::shorten_address(Some(&account))
                        )),
                        None => Ok("Not connected. Run 'connect' first.".to_string()),
                    }
                }
            }

            Command::Set { field, value } => {
                controller.handle_change(*field, value);
                if json_output {
                    Ok(serde_json::json!({ "field": field.to_string(), "value": value })
                        .to_string())
                } else {
                    Ok(format!("{field} = {value}"))
                }
            }

            Command::Form => {
                let form = controller.snapshot().form;
                if json_output {
                    Ok(serde_json::to_string(&form)?)
                } else {
                    Ok(format!(
                        "  to:      {}\n  amount:  {}\n  keyword: {}\n  message: {}",
                        form.address_to, form.amount, form.keyword, form.message
                    ))
                }
            }

            Command::Send => {
                let receipt = controller.submit().await?;
                let count = controller.snapshot().transfer_count;
                if json_output {
                    Ok(serde_json::json!({
                        "transfer_hash": receipt.transfer_hash,
                        "record_hash": receipt.record_hash,
                        "transfer_count": count,
                    })
                    .to_string())
                } else {
                    Ok(format!(
                        "Transfer recorded!\n  Value transfer: {}\n  Record:         {}\n  Total records:  {count}",
                        receipt.transfer_hash, receipt.record_hash
                    ))
                }
            }

            Command::Transfers => {
                controller.refresh_transfers().await?;
                let transfers = controller.snapshot().transfers;
                if json_output {
                    Ok(serde_json::to_string(&transfers)?)
                } else {
                    Ok(display::format_transfers(&transfers))
                }
            }

            Command::Count => {
                let count = controller.refresh_cached_count().await?;
                if json_output {
                    Ok(serde_json::json!({ "transfer_count": count }).to_string())
                } else {
                    Ok(format!("{count} transfers recorded."))
                }
            }

            Command::Help { command } => Ok(help_text(command.as_deref())),

            Command::Exit => Ok(String::new()),
        }
    }
}
