//! fixture-gen: writes a complete fixture tree for one seed.
//!
//! Usage:
//!   fixture-gen --seed 7 --out ./data
//!   fixture-gen --config fixtures.json --seed 12345

use anyhow::{anyhow, Context, Result};
use fixture_core::{clock, FixtureEngine, GenConfig, RunSummary};
use std::env;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match find_arg(&args, "--config")? {
        Some(path) => GenConfig::load(Path::new(path))?,
        None => GenConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed)?;
    if let Some(out) = find_arg(&args, "--out")? {
        config.base_dir = PathBuf::from(out);
    }

    log::debug!("effective config: {config:?}");
    let engine = FixtureEngine::new(config)?;

    println!("fixture-gen");
    println!("  seed:      {}", engine.config.seed);
    println!("  anchor:    {}", clock::iso_utc(&engine.clock.anchor));
    println!("  base_dir:  {}", engine.config.base_dir.display());
    println!();

    let summary = engine.run()?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(s: &RunSummary) {
    println!("=== RUN SUMMARY ===");
    println!("  base_dir:       {}", s.base_dir.display());
    println!("  customers:      {}", s.customers);
    println!("  accounts:       {}", s.accounts);
    println!("  merchants:      {}", s.merchants);
    println!("  transactions:   {}", s.transactions);
    println!("  disputes:       {}", s.disputes);
    println!("  fx rates:       {}", s.fx_rates);
    println!();
    println!("=== OBSERVABILITY ===");
    println!("  bulletins:      {}", s.bulletins);
    println!("  provenance:     {}", s.provenance);
    println!("  kpis:           {}", s.kpis);
    println!("  alerts:         {}", s.alerts);
    println!("  contract files: {}", s.contract_files);
}

/// Value following `flag`. A flag given without a value is an error.
fn find_arg<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        None => Ok(None),
        Some(i) => args
            .get(i + 1)
            .map(|v| Some(v.as_str()))
            .ok_or_else(|| anyhow!("{flag} requires a value")),
    }
}

fn parse_arg<T>(args: &[String], flag: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match find_arg(args, flag)? {
        Some(v) => v
            .parse()
            .with_context(|| format!("invalid value '{v}' for {flag}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn seed_flag_overrides_default() {
        let a = args(&["fixture-gen", "--seed", "99"]);
        assert_eq!(parse_arg(&a, "--seed", 7u64).unwrap(), 99);
        assert_eq!(parse_arg(&args(&["fixture-gen"]), "--seed", 7u64).unwrap(), 7);
    }

    #[test]
    fn malformed_seed_is_an_error() {
        let a = args(&["fixture-gen", "--seed", "12abc"]);
        let err = parse_arg(&a, "--seed", 7u64).unwrap_err();
        assert!(err.to_string().contains("--seed"));
    }

    #[test]
    fn flag_without_value_is_an_error() {
        let a = args(&["fixture-gen", "--out"]);
        assert!(find_arg(&a, "--out").is_err());
    }
}
