//! Check command implementation

use crate::cli::output::{format_probes_json, format_probes_table, ProbeStatus, ProbeView};
use crate::cli::CheckArgs;
use crate::config::DashboardConfig;
use crate::poller::probe_channels;
use std::sync::Arc;

/// Handle `statusboard check`: fetch every channel once.
///
/// Returns the rendered report and whether every channel succeeded.
pub async fn handle_check(args: &CheckArgs) -> Result<(String, bool), Box<dyn std::error::Error>> {
    let config = DashboardConfig::load(Some(&args.config))?.with_env_overrides();
    let client = Arc::new(super::serve::build_http_client()?);

    let mut views: Vec<ProbeView> = probe_channels(&config, client)
        .await
        .iter()
        .map(ProbeView::from)
        .collect();
    views.sort_by(|a, b| a.channel.cmp(&b.channel));

    let all_ok = views.iter().all(|v| v.status != ProbeStatus::Error);

    let output = if args.json {
        format_probes_json(&views)?
    } else {
        format_probes_table(&views)
    };

    Ok((output, all_ok))
}
