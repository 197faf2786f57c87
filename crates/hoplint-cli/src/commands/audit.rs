//! Audit command - probe declared redirects and report issues

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use hoplint_config::Config;
use hoplint_core::Issue;
use hoplint_engine::{AuditOptions, JsonLinesSink, RedirectAudit, ResolveOptions, SuggestionSink};
use hoplint_sources::{DeclarationClient, HttpProber, HttpProberOptions};
use tracing::debug;

pub async fn handle(
    config: &Config,
    base_url: String,
    json: bool,
    budget_bytes: Option<usize>,
    concurrency: Option<usize>,
    output: Option<PathBuf>,
) -> Result<()> {
    let timeout = Duration::from_secs(config.probe.timeout_secs);
    let prober = HttpProber::new(&HttpProberOptions {
        timeout,
        retries: config.probe.retries,
        user_agent: config.probe.user_agent.clone(),
    })?;
    let declarations = DeclarationClient::new(
        config.declaration.well_known_path.clone(),
        timeout,
        &config.probe.user_agent,
    )?;

    let options = AuditOptions {
        resolve: ResolveOptions {
            concurrency: concurrency.unwrap_or(config.probe.concurrency),
        },
        budget_bytes: budget_bytes.unwrap_or(config.suggestions.budget_bytes),
    };
    debug!(
        "auditing with concurrency {} and a {} byte budget",
        options.resolve.concurrency, options.budget_bytes
    );

    let audit = RedirectAudit::new(Arc::new(prober), Arc::new(declarations), options);
    let report = audit.run(&base_url).await?;

    if let Some(path) = &output {
        let file = tokio::fs::File::create(path).await?;
        let sink = JsonLinesSink::new(file);
        sink.sync(&report.suggestions, &Issue::suggestion_key)
            .await?;
        println!(
            "✓ Wrote {} suggestions to {}",
            report.suggestions.issues.len(),
            path.display()
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Audited {} declared redirects for {}",
        report.rules_total, report.base_url
    );
    println!("({} ms)\n", report.elapsed_ms);

    if report.counts.is_empty() {
        println!("No declared redirects found.");
        return Ok(());
    }

    for (kind, count) in &report.counts {
        println!("  {:<22} {}", format!("{}:", kind), count);
    }

    let problems: usize = report
        .counts
        .iter()
        .filter(|(kind, _)| kind.is_problem())
        .map(|(_, count)| *count)
        .sum();

    if report.suggestions.was_reduced {
        println!(
            "\n⚠ {} of {} problem suggestions fit the byte budget.",
            report.suggestions.issues.len(),
            problems
        );
    } else if problems == 0 {
        println!("\n✓ All redirects healthy.");
    } else {
        println!("\n✓ {} suggestions ready.", report.suggestions.issues.len());
    }

    Ok(())
}
