//! Startup banner for the terminal.
//! Used by: main.

use colored::Colorize;

use crate::config::Config;

pub fn print_banner() {
    println!();
    println!("{}", "╔═══════════════════════════════════════════════════════════╗".cyan());
    println!("{}", "║                                                           ║".cyan());
    println!("║     {}                                   ║", "auditlens v0.1.0".bold().white());
    println!("║     {}        ║", "Audit log list view with extra-data diffs".dimmed());
    println!("{}", "║                                                           ║".cyan());
    println!("{}", "╚═══════════════════════════════════════════════════════════╝".cyan());
    println!();
}

pub fn print_startup(config: &Config) {
    println!("{} {}", "✓".green().bold(), "Server ready".white().bold());
    println!("  {} {}", "→".dimmed(), format!("http://{}", config.bind_addr).cyan().underline());
    println!("  {} {}", "db:".dimmed(), config.db_path.white());
    if let Some(base) = &config.admin_base_url {
        println!("  {} {}", "links:".dimmed(), base.as_str().white());
    }
    println!();
    println!("{}", "Endpoints:".white().bold());
    println!("  {} {}                    {}", "GET ".green(), "/logs".white(), "List view rows".dimmed());
    println!("  {} {}                    {}", "POST".yellow(), "/logs".white(), "Append entry".dimmed());
    println!("  {} {}                {}", "GET ".green(), "/logs/:id".white(), "Single row".dimmed());
    println!("  {} {}   {}", "GET ".green(), "/logs/:id/extra-change".white(), "Narrated diff".dimmed());
    println!("  {} {}                 {}", "GET ".green(), "/metrics".white(), "Telemetry".dimmed());
    println!("  {} {}                  {}", "GET ".green(), "/health".white(), "Health check".dimmed());
    if config.view.hide_extra || config.view.hide_extra_changed {
        println!();
        println!(
            "{} {}",
            "Hidden columns:".white().bold(),
            hidden_columns(config).join(", ").yellow()
        );
    }
    println!();
}

fn hidden_columns(config: &Config) -> Vec<&'static str> {
    let mut hidden = Vec::new();
    if config.view.hide_extra {
        hidden.push("extra");
    }
    if config.view.hide_extra_changed {
        hidden.push("extra_changed");
    }
    hidden
}
