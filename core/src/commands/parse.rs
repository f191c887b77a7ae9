use anyhow::{bail, Result};

use super::Command;
use crate::controller::FormField;

impl Command {
    /// Parse a command from a raw input string.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("No command entered. Type 'help' for a list of commands.");
        }

        let mut parts = input.splitn(3, char::is_whitespace);
        let cmd = parts.next().unwrap_or_default().to_lowercase();
        let arg1 = parts.next().map(str::trim);
        let arg2 = parts.next().map(str::trim);

        match cmd.as_str() {
            "connect" => Ok(Command::Connect),

            "account" | "acc" | "addr" => Ok(Command::Account),

            "set" => {
                let field_str = arg1.ok_or_else(|| {
                    anyhow::anyhow!("Missing field. Usage: set <to|amount|keyword|message> <value>")
                })?;
                let field: FormField = field_str
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))?;
                let value = arg2.ok_or_else(|| {
                    anyhow::anyhow!("Missing value. Usage: set {field_str} <value>")
                })?;
                Ok(Command::Set {
                    field,
                    value: value.to_string(),
                })
            }

            "form" => Ok(Command::Form),

            "send" | "submit" => Ok(Command::Send),

            "transfers" | "txs" | "list" => Ok(Command::Transfers),

            "count" => Ok(Command::Count),

            "help" | "?" => Ok(Command::Help {
                command: arg1.map(str::to_string),
            }),

            "exit" | "quit" | "q" => Ok(Command::Exit),

            other => bail!("Unknown command: '{other}'. Type 'help' for a list of commands."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_connect() {
        assert_eq!(Command::parse("connect").unwrap(), Command::Connect);
        assert_eq!(Command::parse("  connect  ").unwrap(), Command::Connect);
    }

    #[test]
    fn parse_account() {
        assert_eq!(Command::parse("account").unwrap(), Command::Account);
        assert_eq!(Command::parse("acc").unwrap(), Command::Account);
        assert_eq!(Command::parse("addr").unwrap(), Command::Account);
    }

    #[test]
    fn parse_set_simple() {
        assert_eq!(
            Command::parse("set amount 1.5").unwrap(),
            Command::Set {
                field: FormField::Amount,
                value: "1.5".to_string(),
            }
        );
    }

    #[test]
    fn parse_set_keeps_spaces_in_value() {
        assert_eq!(
            Command::parse("set message rent for november").unwrap(),
            Command::Set {
                field: FormField::Message,
                value: "rent for november".to_string(),
            }
        );
    }

    #[test]
    fn parse_set_destination_aliases() {
        for alias in ["to", "address_to", "destination"] {
            let cmd = Command::parse(&format!("set {alias} 0xabc")).unwrap();
            assert_eq!(
                cmd,
                Command::Set {
                    field: FormField::AddressTo,
                    value: "0xabc".to_string(),
                }
            );
        }
    }

    #[test]
    fn parse_set_missing_value() {
        assert!(Command::parse("set amount").is_err());
    }

    #[test]
    fn parse_set_unknown_field() {
        let err = Command::parse("set gas 21000").unwrap_err();
        assert!(err.to_string().contains("gas"));
    }

    #[test]
    fn parse_send() {
        assert_eq!(Command::parse("send").unwrap(), Command::Send);
        assert_eq!(Command::parse("submit").unwrap(), Command::Send);
    }

    #[test]
    fn parse_transfers() {
        assert_eq!(Command::parse("transfers").unwrap(), Command::Transfers);
        assert_eq!(Command::parse("txs").unwrap(), Command::Transfers);
        assert_eq!(Command::parse("list").unwrap(), Command::Transfers);
    }

    #[test]
    fn parse_count() {
        assert_eq!(Command::parse("count").unwrap(), Command::Count);
    }

    #[test]
    fn parse_help() {
        assert_eq!(
            Command::parse("help").unwrap(),
            Command::Help { command: None }
        );
        assert_eq!(
            Command::parse("help send").unwrap(),
            Command::Help {
                command: Some("send".to_string())
            }
        );
    }

    #[test]
    fn parse_exit() {
        assert_eq!(Command::parse("exit").unwrap(), Command::Exit);
        assert_eq!(Command::parse("quit").unwrap(), Command::Exit);
        assert_eq!(Command::parse("q").unwrap(), Command::Exit);
    }

    #[test]
    fn parse_case_insensitive() {
        assert_eq!(Command::parse("CONNECT").unwrap(), Command::Connect);
        assert_eq!(Command::parse("Send").unwrap(), Command::Send);
    }

    #[test]
    fn parse_empty_input() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("   ").is_err());
    }

    #[test]
    fn parse_unknown_command() {
        let err = Command::parse("stake").unwrap_err();
        assert!(err.to_string().contains("stake"));
    }
}
