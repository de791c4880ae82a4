use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    let msg = err.to_string().to_lowercase();

    if msg.contains("no workspace for box") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Check the box name and the workspace root:");
        eprintln!("  {} boxmind --root <dir> stats <box>", "$".dimmed());
    }

    if msg.contains("invalid configuration") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Review ~/.config/boxmind/config.toml and BOXMIND_* variables.");
    }

    std::process::exit(1);
}
