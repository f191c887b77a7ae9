/// REPL shell: Reedline-based interactive client session.
use anyhow::Result;
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use sendlog_core::commands::Command;
use sendlog_core::display::shorten_address;
use sendlog_core::TransferController;

use crate::Cli;

pub async fn run_repl(cli: &Cli, controller: &TransferController) -> Result<()> {
    println!("sendlog v{}", env!("CARGO_PKG_VERSION"));
    println!("Node:     {}", cli.node);
    println!("Contract: {:#x}", controller.contract_address());
    println!("Type 'help' for a list of commands.");
    println!();

    let commands: Vec<String> = vec![
        "connect".into(),
        "account".into(),
        "acc".into(),
        "addr".into(),
        "set".into(),
        "form".into(),
        "send".into(),
        "submit".into(),
        "transfers".into(),
        "txs".into(),
        "list".into(),
        "count".into(),
        "help".into(),
        "exit".into(),
        "quit".into(),
        "q".into(),
    ];
    let completer = Box::new(DefaultCompleter::new(commands));
    let mut line_editor = Reedline::create().with_completer(completer);
    let mut prompt = make_prompt(controller);

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let command = match Command::parse(line) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("Error: {e}");
                        continue;
                    }
                };

                if command == Command::Exit {
                    println!("Goodbye.");
                    break;
                }

                if let Some(text) = command.confirmation_prompt(&controller.snapshot()) {
                    if !confirm(&mut line_editor, &text)? {
                        println!("Cancelled.");
                        continue;
                    }
                }

                match command.execute(controller, cli.json).await {
                    Ok(output) => {
                        if !output.is_empty() {
                            println!("{output}");
                        }
                    }
                    Err(e) => eprintln!("Error: {e}"),
                }

                // The account may have changed; rebuild the prompt.
                if command == Command::Connect {
                    prompt = make_prompt(controller);
                }
            }
            Ok(Signal::CtrlC) | Ok(Signal::CtrlD) => {
                println!("Goodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Error: {e}");
                break;
            }
        }
    }

    Ok(())
}

fn make_prompt(controller: &TransferController) -> DefaultPrompt {
    let account = controller.snapshot().account;
    let label = match account {
        Some(account) => format!("[sendlog {}]", shorten_address(Some(&account))),
        None => "[sendlog]".to_string(),
    };
    DefaultPrompt::new(
        DefaultPromptSegment::Basic(label),
        DefaultPromptSegment::Empty,
    )
}

fn confirm(line_editor: &mut Reedline, text: &str) -> Result<bool> {
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(format!("{text} [y/N]")),
        DefaultPromptSegment::Empty,
    );
    match line_editor.read_line(&prompt) {
        Ok(Signal::Success(answer)) => {
            let answer = answer.trim().to_lowercase();
            Ok(answer == "y" || answer == "yes")
        }
        _ => Ok(false),
    }
}
