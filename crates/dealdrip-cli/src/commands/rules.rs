//! Rules command - list the pattern rule table.

use clap::Args;
use console::style;

use super::config::load_config;

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    /// Also print each rule's regular expression
    #[arg(long)]
    show_patterns: bool,
}

pub fn run(args: RulesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let rules = config.rule_set()?;

    println!(
        "{} {} rules, in priority order:",
        style("ℹ").blue(),
        rules.len()
    );

    for (index, rule) in rules.iter().enumerate() {
        println!(
            "  {:>3}  {:<16} {}",
            index,
            rule.category().as_str(),
            style(rule.key()).cyan()
        );
        if args.show_patterns {
            println!("       {}", style(rule.regex().as_str()).dim());
        }
    }

    Ok(())
}
