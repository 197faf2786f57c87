//! Rules command - fetch and print the declared redirect list

use std::time::Duration;

use anyhow::Result;
use hoplint_config::Config;
use hoplint_core::Error;
use hoplint_sources::{DeclarationClient, RuleSource};
use url::Url;

pub async fn handle(config: &Config, base_url: String, json: bool) -> Result<()> {
    let base = Url::parse(&base_url)
        .map_err(|err| Error::InvalidBaseUrl(format!("{}: {}", base_url, err)))?;

    let declarations = DeclarationClient::new(
        config.declaration.well_known_path.clone(),
        Duration::from_secs(config.probe.timeout_secs),
        &config.probe.user_agent,
    )?;
    let rules = declarations.fetch_rules(&base).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    if rules.is_empty() {
        println!("No declared redirects found.");
        return Ok(());
    }

    println!("Declared redirects ({}):", rules.len());
    for rule in &rules {
        let mut flags = Vec::new();
        if rule.is_duplicate_source {
            flags.push(format!("duplicate #{}", rule.duplicate_ordinal));
        }
        if rule.is_over_qualified {
            flags.push("over-qualified".to_string());
        }
        if rule.has_identical_endpoints {
            flags.push("identical endpoints".to_string());
        }

        if flags.is_empty() {
            println!("  {} -> {}", rule.source_path, rule.destination_path);
        } else {
            println!(
                "  {} -> {}  [{}]",
                rule.source_path,
                rule.destination_path,
                flags.join(", ")
            );
        }
    }

    Ok(())
}
