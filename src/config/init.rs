use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, validate_config, Config, DEFAULT_COUNTDOWN_TICK};
use crate::ranking::{
    PointsConfig, PointsMode, RuleConfig, SortKey, MEMBER_REVENUE_BONUS, MEMBER_REVENUE_THRESHOLD,
    TOP_REVENUE_BONUS,
};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep asking until the answer parses as a non-negative integer.
fn prompt_points(message: &str, default: u32) -> Result<u32> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<u32>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("  Invalid: must be a whole, non-negative number. Try again."),
        }
    }
}

fn prompt_threshold(default: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default("Member revenue threshold", &format!("{:.0}", default))?;
        match input.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => return Ok(v),
            _ => println!("  Invalid: must be a non-negative number. Try again."),
        }
    }
}

/// Ask for the points rules used in derive mode.
fn prompt_rules() -> Result<Vec<RuleConfig>> {
    println!();
    println!("Derived points come from achievement rules.");
    println!("  top_revenue     -- bonus for the team(s) with the highest total revenue");
    println!("  member_revenue  -- bonus per member whose revenue reaches a threshold");

    let mut rules = Vec::new();
    if prompt_yes_no("Use the top revenue rule?", true)? {
        let points = prompt_points("Top revenue bonus", TOP_REVENUE_BONUS)?;
        rules.push(RuleConfig::TopRevenue { points });
    }
    if prompt_yes_no("Use the member revenue rule?", true)? {
        let points = prompt_points("Bonus per qualifying member", MEMBER_REVENUE_BONUS)?;
        let threshold = prompt_threshold(MEMBER_REVENUE_THRESHOLD)?;
        rules.push(RuleConfig::MemberRevenue { points, threshold });
    }
    Ok(rules)
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Leaderboard Configuration Wizard");
    println!("================================");
    println!();

    // 1. Data source
    println!("The game data is a JSON document, either a local file or an http(s) URL.");
    let data = loop {
        let input = prompt_with_default("Data source", "./data.json")?;
        if !input.is_empty() {
            break input;
        }
        println!("  Data source is required.");
    };

    // 2. Points
    println!();
    println!("Points can be taken from the data file as published, or derived from rules.");
    let derive = prompt_yes_no("Derive points from rules? (n trusts the file)", false)?;
    let points = if derive {
        PointsConfig {
            mode: PointsMode::Derive,
            rules: prompt_rules()?,
        }
    } else {
        PointsConfig::default()
    };

    // 3. Display
    println!();
    let sort = loop {
        let input = prompt_with_default("Default leaderboard sort (points/revenue)", "points")?;
        match input.to_lowercase().as_str() {
            "points" => break SortKey::Points,
            "revenue" => break SortKey::Revenue,
            _ => println!("  Invalid: choose 'points' or 'revenue'."),
        }
    };
    let countdown_tick = loop {
        let input = prompt_with_default("Countdown refresh interval", DEFAULT_COUNTDOWN_TICK)?;
        match humantime::parse_duration(&input) {
            Ok(d) if !d.is_zero() => break input,
            Ok(_) => println!("  Invalid: must be greater than zero."),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    let config = Config {
        data: Some(data),
        sort,
        countdown_tick,
        points,
        ..Config::default()
    };

    if let Err(errors) = validate_config(&config) {
        anyhow::bail!("Generated config is invalid: {}", errors.join("; "));
    }

    // 4. Config path
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `leaderboard` to open the dashboard.");

    Ok(())
}

/// Serialize `config` to YAML and replace the file at `path` atomically.
pub fn write_config(path: &std::path::Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit().context("Failed to save config")?;

    tracing::info!(path = %path.display(), "config written");
    Ok(())
}
