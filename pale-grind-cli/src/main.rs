//src/main.rs
mod cli; // Keep cli module for parsing args

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::stdout;
use std::path::PathBuf;

use pale_grind_lib::{
    get_config_path_util, load_config_util, parse_color, store_api_key_util, AppService, Config,
    Difficulty, Section, TipState,
};

const VISIBLE_KEY_CHARS: usize = 4;

fn main() -> Result<()> {
    // --- Check for completion generation request FIRST ---
    let cli_args = cli::parse_args(); // Parse arguments once

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command(); // Get the command structure
        let bin_name = cmd.get_name().to_string(); // Get the binary name

        eprintln!("Generating completion script for {shell}..."); // Print to stderr
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout()); // Print script to stdout
        return Ok(());
    }

    // Config commands only touch the config file, so a broken catalog can still be repaired
    let command = match cli_args.command {
        cli::Commands::Config { action } => return run_config_action(action),
        cli::Commands::SetApiKey { key } => return set_api_key(&key),
        cli::Commands::ClearApiKey => return clear_api_key(),
        other => other,
    };

    // Initialize the application service (loads config and catalog)
    let service =
        AppService::initialize().context("Failed to initialize application service")?;

    match command {
        cli::Commands::GenerateCompletion { .. }
        | cli::Commands::Config { .. }
        | cli::Commands::SetApiKey { .. }
        | cli::Commands::ClearApiKey => {
            // Handled above
        }
        cli::Commands::Catalog { section } => {
            let header_color = theme_color(&service.config.theme.header_color);
            let sections: Vec<&Section> = match section.as_deref() {
                Some(id) => match service.catalog.section(id.trim()) {
                    Some(found) => vec![found],
                    None => bail!(
                        "No section with id '{}'. Known sections: {}",
                        id,
                        service
                            .catalog
                            .sections()
                            .iter()
                            .map(|s| s.id.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                },
                None => service.catalog.sections().iter().collect(),
            };
            for section in sections {
                print_section_table(section, header_color);
            }
            println!(
                "{} exercises across {} sections.",
                service.catalog.total_exercises(),
                service.catalog.sections().len()
            );
        }
        cli::Commands::Tip { exercise } => {
            let Some((key, found)) = service.catalog.find_exercise(&exercise) else {
                bail!("Unknown exercise '{exercise}'. Run `pg catalog` to list exercises.");
            };
            let name = found.name.clone();
            let mut session = service
                .new_session()
                .context("Invalid rest settings in configuration")?;

            eprintln!("Getting tips for {name} ({key})...");
            service.fetch_tip_blocking(&mut session, &name);

            match session.tip() {
                TipState::Loaded { content, .. } => println!("{content}"),
                TipState::Failed { failure, .. } => bail!("{failure}"),
                TipState::Idle | TipState::Loading { .. } => {
                    bail!("No tip was produced for '{name}'.")
                }
            }
        }
    }

    Ok(())
}

fn config_path() -> Result<PathBuf> {
    get_config_path_util().context("Failed to determine configuration file path")
}

fn run_config_action(action: cli::ConfigAction) -> Result<()> {
    let config_path = config_path()?;
    match action {
        cli::ConfigAction::Path => {
            println!("Config file is located at: {config_path:?}");
        }
        cli::ConfigAction::Show => {
            let config = load_config_util(&config_path)
                .with_context(|| format!("Failed to load config from {config_path:?}"))?;
            print_config_table(&config);
        }
    }
    Ok(())
}

fn set_api_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        bail!("API key cannot be empty. Use `pg clear-api-key` to remove it.");
    }
    let config_path = config_path()?;
    match store_api_key_util(&config_path, Some(key.to_string())) {
        Ok(_) => {
            println!("API key saved. Exercise tips are enabled on the next start.");
            println!("Config file updated: {config_path:?}");
            Ok(())
        }
        Err(e) => bail!("Error saving API key: {}", e),
    }
}

fn clear_api_key() -> Result<()> {
    let config_path = config_path()?;
    match store_api_key_util(&config_path, None) {
        Ok(config) => {
            println!("API key removed from the config file.");
            if config.resolved_api_key().is_some() {
                println!("Note: an API key is still set in the environment (API_KEY or GEMINI_API_KEY).");
            }
            Ok(())
        }
        Err(e) => bail!("Error clearing API key: {}", e),
    }
}

fn theme_color(name: &str) -> Color {
    parse_color(name).map_or(Color::Blue, Color::from)
}

const fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

/// Prints one catalog section as a table.
fn print_section_table(section: &Section, header_color: Color) {
    println!(
        "\n{} {} ({})",
        section.icon, section.title, section.id
    );
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new("Sets").fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("Weight").fg(header_color),
            Cell::new("Difficulty").fg(header_color),
        ]);

    for (index, exercise) in section.exercises.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index.to_string()),
            Cell::new(&exercise.name).add_attribute(Attribute::Bold),
            Cell::new(exercise.sets.to_string()),
            Cell::new(exercise.reps.to_string()),
            Cell::new(&exercise.weight),
            Cell::new(exercise.difficulty.to_string()).fg(difficulty_color(exercise.difficulty)),
        ]);
    }
    println!("{table}");
}

// Short keys would give away too much of themselves, so they are masked whole
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 2 * VISIBLE_KEY_CHARS {
        return "*".repeat(chars.len().max(VISIBLE_KEY_CHARS));
    }
    let visible: String = chars[chars.len() - VISIBLE_KEY_CHARS..].iter().collect();
    format!("****{visible}")
}

fn print_config_table(config: &Config) {
    let header_color = theme_color(&config.theme.header_color);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Setting").fg(header_color),
            Cell::new("Value").fg(header_color),
        ]);

    let api_key = config
        .resolved_api_key()
        .map_or_else(|| "not set (tips disabled)".to_string(), |key| mask_key(&key));
    let presets = config
        .rest_presets
        .iter()
        .map(|s| format!("{s}s"))
        .collect::<Vec<_>>()
        .join(", ");
    let rows = [
        ("API key", api_key),
        ("Model", config.model.clone()),
        ("API base URL", config.api_base_url.clone()),
        ("Request timeout", format!("{}s", config.request_timeout_secs)),
        ("Rest after completion", format!("{}s", config.completion_rest_seconds)),
        ("Default rest", format!("{}s", config.default_rest_seconds)),
        ("Rest presets", presets),
        ("Celebration", format!("{}ms", config.celebration_millis)),
        (
            "Catalog",
            config
                .catalog_path
                .as_ref()
                .map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
        ),
        ("Header color", config.theme.header_color.clone()),
        ("Accent color", config.theme.accent_color.clone()),
    ];
    for (setting, value) in rows {
        table.add_row(vec![Cell::new(setting), Cell::new(value)]);
    }
    println!("{table}");
}
