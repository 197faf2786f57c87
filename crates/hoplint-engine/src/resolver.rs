//! Redirect resolution.
//!
//! For every declared rule, determine what the live site actually does:
//! whether the source redirects, where it lands, and how many hops it
//! takes. Failures never abort a batch; they are captured as data on the
//! result so classification can report them.

use futures_util::StreamExt;
use futures_util::stream;
use hoplint_core::{
    MAX_REDIRECT_HOPS, ProbeStatus, RedirectRule, ResolutionResult, urlnorm,
};
use hoplint_sources::{ProbeError, ProbeResponse, Prober};
use tracing::debug;
use url::Url;

/// Tunables for a resolution batch.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Upper bound on concurrently in-flight rule resolutions.
    pub concurrency: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { concurrency: 8 }
    }
}

/// Resolve every rule with bounded parallelism.
///
/// Output order equals input order, so results join back to their rules by
/// position. Rules flagged as duplicate declarations are answered without
/// probing: the first occurrence already covers the live behavior.
pub async fn resolve_all(
    prober: &dyn Prober,
    base: &Url,
    rules: &[RedirectRule],
    options: &ResolveOptions,
) -> Vec<ResolutionResult> {
    let concurrency = options.concurrency.max(1);
    debug!(
        "resolving {} rules with concurrency {}",
        rules.len(),
        concurrency
    );

    stream::iter(rules)
        .map(|rule| async move {
            if rule.is_duplicate_source {
                duplicate_result(base, rule)
            } else {
                resolve_rule(prober, base, rule).await
            }
        })
        .buffered(concurrency)
        .collect()
        .await
}

/// Resolve one rule against the live site. Never fails: every outcome,
/// including transport failures, becomes a [`ResolutionResult`].
pub async fn resolve_rule(
    prober: &dyn Prober,
    base: &Url,
    rule: &RedirectRule,
) -> ResolutionResult {
    let destination_url = match urlnorm::resolve_declared(base, &rule.destination_path) {
        Ok(url) => url.to_string(),
        Err(err) => {
            // An unresolvable destination still lets the source be probed;
            // keep the declared text for reporting.
            debug!(
                "could not resolve declared destination {:?}: {}",
                rule.destination_path, err
            );
            rule.destination_path.clone()
        }
    };

    let source = match urlnorm::resolve_declared(base, &rule.source_path) {
        Ok(url) => url,
        Err(err) => {
            return ResolutionResult::transport_failed(
                rule.source_path.clone(),
                destination_url,
                format!("invalid source URL {:?}: {}", rule.source_path, err),
            );
        }
    };

    let first = match prober.head(&source).await {
        Ok(response) => response,
        Err(ProbeError::Transport { message, .. }) => {
            return ResolutionResult::transport_failed(
                source.to_string(),
                destination_url,
                message,
            );
        }
    };

    match first.redirect_location() {
        Some(location) => match join_location(&source, location) {
            Ok(first_target) => {
                resolve_redirected(prober, &source, first_target, destination_url).await
            }
            Err(err) => {
                let message = format!("unresolvable Location {:?}: {}", location, err);
                ResolutionResult::transport_failed(source.to_string(), destination_url, message)
            }
        },
        None => finish_unredirected(&first, source.to_string(), destination_url),
    }
}

/// Terminal response straight at the source: no redirect happened.
fn finish_unredirected(
    first: &ProbeResponse,
    source_url: String,
    destination_url: String,
) -> ResolutionResult {
    let status = first.status;
    let matches_destination = urlnorm::equivalent(&source_url, &destination_url);
    let error = (status >= 400).then(|| format!("HTTP error {} for {}", status, source_url));

    ResolutionResult {
        final_url: source_url.clone(),
        chain: vec![source_url.clone()],
        source_url,
        destination_url,
        status: ProbeStatus::Http(status),
        was_redirected: false,
        hop_count: 0,
        matches_destination,
        error,
    }
}

/// The source redirected; find out where it lands and how many hops that
/// takes.
async fn resolve_redirected(
    prober: &dyn Prober,
    source: &Url,
    first_target: Url,
    destination_url: String,
) -> ResolutionResult {
    let source_url = source.to_string();

    // The client's own redirect-following answers "where does this land".
    let final_response = match prober.head_following(&first_target).await {
        Ok(response) => response,
        Err(ProbeError::Transport { message, .. }) => {
            let first_target = first_target.to_string();
            let was_redirected = !urlnorm::equivalent(&first_target, &source_url);
            let matches_destination = urlnorm::equivalent(&first_target, &destination_url);
            return ResolutionResult {
                chain: vec![source_url.clone(), first_target.clone()],
                final_url: first_target,
                source_url,
                destination_url,
                status: ProbeStatus::TransportFailed,
                was_redirected,
                hop_count: 1,
                matches_destination,
                error: Some(message),
            };
        }
    };

    // A second, independent pass re-walks the chain hop by hop for an
    // accurate count. The cap is a hard stop; nothing past it is fetched.
    let trace = trace_hops(prober, source.clone()).await;

    let status = final_response.status;
    let final_url = final_response.final_url;
    let was_redirected = !urlnorm::equivalent(&final_url, &source_url);
    let matches_destination = urlnorm::equivalent(&final_url, &destination_url);
    let error = (status >= 400).then(|| format!("HTTP error {} for {}", status, final_url));

    ResolutionResult {
        source_url,
        destination_url,
        final_url,
        status: ProbeStatus::Http(status),
        was_redirected,
        // One redirect was definitely observed, even when the trace pass
        // cannot reproduce it.
        hop_count: trace.hops.max(1),
        matches_destination,
        chain: trace.chain,
        error,
    }
}

struct ChainTrace {
    hops: u32,
    chain: Vec<String>,
}

/// Re-walk a redirect chain hop by hop, counting up to
/// [`MAX_REDIRECT_HOPS`]. A failure mid-chain ends the walk; the hops seen
/// so far stand.
async fn trace_hops(prober: &dyn Prober, start: Url) -> ChainTrace {
    let mut chain = vec![start.to_string()];
    let mut current = start;
    let mut hops = 0u32;

    while hops < MAX_REDIRECT_HOPS {
        let response = match prober.head(&current).await {
            Ok(response) => response,
            Err(ProbeError::Transport { message, .. }) => {
                debug!("chain trace stopped at {}: {}", current, message);
                break;
            }
        };

        let Some(location) = response.redirect_location() else {
            break;
        };
        let next = match join_location(&current, location) {
            Ok(next) => next,
            Err(err) => {
                debug!(
                    "chain trace stopped at {}: unresolvable Location {:?}: {}",
                    current, location, err
                );
                break;
            }
        };

        hops += 1;
        chain.push(next.to_string());
        current = next;
    }

    ChainTrace { hops, chain }
}

/// Answer for a duplicate declaration without touching the network.
fn duplicate_result(base: &Url, rule: &RedirectRule) -> ResolutionResult {
    let source_url = urlnorm::resolve_declared(base, &rule.source_path)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| rule.source_path.clone());
    let destination_url = urlnorm::resolve_declared(base, &rule.destination_path)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| rule.destination_path.clone());
    let matches_destination = urlnorm::equivalent(&source_url, &destination_url);

    ResolutionResult {
        final_url: source_url.clone(),
        chain: vec![source_url.clone()],
        source_url,
        destination_url,
        status: ProbeStatus::Http(200),
        was_redirected: false,
        hop_count: 0,
        matches_destination,
        error: None,
    }
}

/// Resolve a `Location` header, which may be absolute or relative to the
/// URL that served it.
fn join_location(current: &Url, location: &str) -> Result<Url, url::ParseError> {
    Url::parse(location).or_else(|_| current.join(location))
}
