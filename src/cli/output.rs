//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::SlotArray;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print the filled slots of a page (Slot, Item, Amount, Meta).
pub fn print_page(title: &str, slots: &SlotArray) {
    println!("{}", style(title).bold());

    let used = slots.filled().count();
    if used == 0 {
        info(&format!("This page is empty ({} slots free).", slots.len()));
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Slot", "Item", "Amount", "Meta"]);

    for (index, item) in slots.filled() {
        let meta = item
            .meta
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            index.to_string(),
            item.material.clone(),
            item.amount.to_string(),
            if meta.is_empty() { "-".to_string() } else { meta },
        ]);
    }

    println!("{table}");
    println!(
        "{}",
        style(format!("{used}/{} slots used", slots.len())).dim()
    );
}
