//! desk-runner: headless front end for the sales desk.
//!
//! Usage:
//!   desk-runner --data-dir ./data
//!   desk-runner --data-dir ./data --user Alice --password secret
//!   desk-runner --data-dir ./data --ipc-mode

use anyhow::Result;
use salesdesk_core::{
    config::{DeskConfig, CONFIG_FILE_NAME},
    customer::NewCustomer,
    desk::Desk,
    session::Identity,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Login { username: String, password: String },
    Customers,
    AddCustomer(NewCustomer),
    Flush,
    Reload,
    Marketers,
    Performance,
    Charts,
    Export { table: ExportTable },
    Quit,
}

#[derive(serde::Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
enum ExportTable {
    Marketers,
    Customers,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let user = arg_value(&args, "--user");
    let password = arg_value(&args, "--password").unwrap_or_default();

    let config = if Path::new(data_dir).join(CONFIG_FILE_NAME).exists() {
        DeskConfig::load(data_dir)?
    } else {
        log::info!("no {CONFIG_FILE_NAME} in {data_dir}, using defaults");
        DeskConfig::defaults_in(data_dir)
    };

    // Missing tables are the one fatal condition.
    let mut desk = Desk::open(config)?;

    if ipc_mode {
        run_ipc_loop(&mut desk)?;
    } else {
        let identity = match user {
            Some(name) => match desk.login(name, password) {
                Ok(id) => Some(id),
                Err(e) => {
                    println!("{}", e.user_message());
                    return Ok(());
                }
            },
            None => None,
        };
        print_summary(&desk, identity.as_ref());
    }

    Ok(())
}

fn run_ipc_loop(desk: &mut Desk) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut identity: Option<Identity> = None;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        if let IpcCommand::Quit = cmd {
            break;
        }

        let reply = match handle_command(desk, &mut identity, cmd) {
            Ok(value) => value,
            Err(message) => serde_json::json!({ "error": message }),
        };
        writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
        stdout.flush()?;
    }

    if desk.is_dirty() {
        log::warn!("exiting with {} unsaved rows", desk.ledger().pending().len());
    }
    Ok(())
}

/// Run one command. The error side is the user-facing message.
fn handle_command(
    desk: &mut Desk,
    identity: &mut Option<Identity>,
    cmd: IpcCommand,
) -> std::result::Result<serde_json::Value, String> {
    if let IpcCommand::Login { username, password } = &cmd {
        let id = desk.login(username, password).map_err(|e| e.user_message())?;
        let reply = serde_json::json!({ "logged_in": id.name() });
        *identity = Some(id);
        return Ok(reply);
    }

    let id = identity.as_ref().ok_or_else(|| "Not logged in".to_string())?;
    let json = |v: serde_json::Result<serde_json::Value>| v.map_err(|e| e.to_string());

    match cmd {
        IpcCommand::Customers => json(serde_json::to_value(desk.customers_for(id))),
        IpcCommand::AddCustomer(form) => {
            let record = desk.add_customer(id, form).map_err(|e| e.user_message())?;
            Ok(serde_json::json!({
                "added": record,
                "message": format!("Customer {} added successfully!", record.company_name),
            }))
        }
        IpcCommand::Flush => {
            desk.flush().map_err(|e| e.user_message())?;
            Ok(serde_json::json!({ "dirty": desk.is_dirty() }))
        }
        IpcCommand::Reload => {
            desk.reload().map_err(|e| e.user_message())?;
            Ok(serde_json::json!({ "rows": desk.ledger().len(), "dirty": desk.is_dirty() }))
        }
        IpcCommand::Marketers => json(serde_json::to_value(desk.marketers())),
        IpcCommand::Performance => json(serde_json::to_value(desk.performance())),
        IpcCommand::Charts => json(serde_json::to_value(desk.charts())),
        IpcCommand::Export { table } => {
            let export = match table {
                ExportTable::Marketers => desk.export_marketers(),
                ExportTable::Customers => desk.export_customers(),
            }
            .map_err(|e| e.user_message())?;
            Ok(serde_json::json!({
                "file_name": export.file_name,
                "mime_type": export.mime_type,
                "data": String::from_utf8_lossy(&export.bytes),
            }))
        }
        IpcCommand::Login { .. } | IpcCommand::Quit => unreachable!("handled above"),
    }
}

fn print_summary(desk: &Desk, identity: Option<&Identity>) {
    println!("Team Management System");
    println!("  ledger:     {}", desk.config.ledger_path);
    println!("  marketers:  {}", desk.marketers().len());
    println!("  customers:  {}", desk.ledger().len());
    println!("  backend:    {:?}", desk.config.backend);

    if let Some(id) = identity {
        println!();
        println!("=== CUSTOMERS MANAGED BY {} ===", id.name());
        let mine = desk.customers_for(id);
        if mine.is_empty() {
            println!("  (none)");
        }
        for c in mine {
            println!(
                "  {:<24} next {} | rating {} | {}",
                c.company_name,
                c.next_meeting,
                c.rating,
                if c.product_sold {
                    format!("sold {} x {}", c.product_quantity, c.product_name)
                } else {
                    "no sale".to_string()
                }
            );
        }
    }

    println!();
    println!("=== MARKETER PERFORMANCE ===");
    let performance = desk.performance();
    if performance.is_empty() {
        println!("  (No customers recorded yet)");
    }
    for p in &performance {
        println!(
            "  {:<16} customers: {:>4} | sales: {:>6} | avg rating: {:.2}",
            p.marketer, p.total_customers, p.total_sales, p.average_rating
        );
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
