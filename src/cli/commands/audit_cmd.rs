//! `playervaults audit`: display the access audit log.
//!
//! Usage:
//!   playervaults audit               # show last 50 entries
//!   playervaults audit --last 20     # show last 20
//!   playervaults audit --since 7d    # entries from last 7 days

use chrono::{DateTime, Duration, Utc};

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::output;
use crate::cli::Host;
use crate::errors::{Result, VaultError};

/// Execute the `audit` command.
pub fn execute(host: &Host, last: usize, since: Option<&str>) -> Result<()> {
    let audit = AuditLog::open(&host.data_dir())
        .ok_or_else(|| VaultError::Audit("failed to open audit database".into()))?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Parse a look-back like "2w", "7d", "24h", "30m" into a cutoff time.
fn parse_duration(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        VaultError::InvalidInput(format!(
            "invalid duration '{input}'; use a format like 2w, 7d, 24h, or 30m"
        ))
    };

    let unit = input.chars().last().ok_or_else(invalid)?;
    let amount: i64 = input[..input.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    if amount < 0 {
        return Err(invalid());
    }

    let span = match unit {
        'w' => Duration::try_weeks(amount),
        'd' => Duration::try_days(amount),
        'h' => Duration::try_hours(amount),
        'm' => Duration::try_minutes(amount),
        _ => return Err(invalid()),
    }
    .ok_or_else(invalid)?;

    Utc::now().checked_sub_signed(span).ok_or_else(invalid)
}

/// Print audit entries in a formatted table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Actor", "Vault of", "Page", "Details"]);

    for entry in entries {
        let time = entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        let op = colorize_operation(&entry.operation);
        let page = entry.page.map_or_else(|| "-".to_string(), |p| p.to_string());
        let details = entry.details.as_deref().unwrap_or("-");

        table.add_row(vec![
            time,
            op,
            entry.actor.clone(),
            entry.target.clone(),
            page,
            details.to_string(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op.strip_prefix("admin-").unwrap_or(op) {
        "open" if op.starts_with("admin-") => style(op).yellow().to_string(),
        "open" => style(op).green().to_string(),
        "save" => style(op).blue().to_string(),
        "denied" | "not-permitted" => style(op).red().to_string(),
        "invalid-page" | "usage" | "not-found" | "error" => style(op).magenta().to_string(),
        _ => op.to_string(),
    }
}
