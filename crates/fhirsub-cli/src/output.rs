use anyhow::Result;
use colored::Colorize;
use serde_json::Value;

pub fn print_error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

pub fn print_success(message: &str) {
    println!("{} {}", "ok:".green().bold(), message);
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
