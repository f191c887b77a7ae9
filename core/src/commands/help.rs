/// Help text for the REPL and one-shot mode.
pub fn help_text(command: Option<&str>) -> String {
    match command {
        None => "\
Commands:
  connect                     Request wallet authorization
  account                     Show the connected account
  set <field> <value>         Set a form field (to, amount, keyword, message)
  form                        Show the current form
  send                        Submit the form: value transfer + log record
  transfers                   Refresh and list all recorded transfers
  count                       Refresh the cached transfer count
  help [command]              Show help
  exit                        Quit

Type 'help <command>' for details."
            .to_string(),

        Some("connect") => "\
connect
  Ask the wallet agent to authorize this client. The wallet may prompt its
  user; the first authorized account becomes the active one. Safe to repeat:
  an already-authorized wallet answers without prompting."
            .to_string(),

        Some("account" | "acc" | "addr") => "\
account
  Show the connected account, shortened and in full. Prints a notice when no
  account is connected."
            .to_string(),

        Some("set") => "\
set <field> <value>
  Set one transfer form field. Fields: to (destination address), amount
  (decimal units), keyword, message. The value runs to the end of the line.
  No validation happens until 'send'."
            .to_string(),

        Some("form") => "form\n  Show the four form fields as currently set.".to_string(),

        Some("send" | "submit") => "\
send
  Submit the current form. Two independent on-chain actions: a value transfer
  to the destination (fixed 21000 gas), then the contract's record append,
  awaited until the ledger confirms it. The transfer list and count refresh
  afterwards. The form keeps its values."
            .to_string(),

        Some("transfers" | "txs" | "list") => "\
transfers
  Fetch the full remote record set and list it. The local list is replaced
  wholesale on every refresh."
            .to_string(),

        Some("count") => "\
count
  Query the remote transfer count and cache it for the next cold start."
            .to_string(),

        Some("exit" | "quit" | "q") => "exit\n  Quit the client.".to_string(),

        Some(other) => format!("No help for '{other}'. Type 'help' for a list of commands."),
    }
}
