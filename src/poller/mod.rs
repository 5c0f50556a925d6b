//! Pollers: one background task per channel.
//!
//! Each poller drives a single source adapter on a fixed interval, writes
//! successes into the latest-value store and publishes them through the hub.
//! Failures are absorbed: the last good snapshot stays, the error is
//! recorded, and the next tick retries.

mod state;

pub use state::{EdgeTrigger, FallbackOutcome, PollState, TickOutcome};

use crate::config::{ConfigError, DashboardConfig, SourceConfig};
use crate::hub::BroadcastHub;
use crate::source::{build_source, Snapshot, SourceAdapter, SourceError};
use crate::store::LatestValueStore;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Secondary channel published when the primary result turns empty.
struct Fallback {
    channel: String,
    source: Arc<dyn SourceAdapter>,
    trigger: EdgeTrigger,
    consecutive_failures: u32,
}

/// Background task driving one channel.
pub struct Poller {
    channel: String,
    source: Arc<dyn SourceAdapter>,
    interval: Duration,
    store: Arc<LatestValueStore>,
    hub: Arc<BroadcastHub>,
    fallback: Option<Fallback>,
    state: PollState,
}

impl Poller {
    pub fn new(
        channel: impl Into<String>,
        source: Arc<dyn SourceAdapter>,
        interval: Duration,
        store: Arc<LatestValueStore>,
        hub: Arc<BroadcastHub>,
    ) -> Self {
        let channel = channel.into();
        store.declare(&channel);
        Self {
            channel,
            source,
            interval,
            store,
            hub,
            fallback: None,
            state: PollState::default(),
        }
    }

    /// Publish `channel` from `source` whenever this poller's result goes
    /// from non-empty to empty.
    ///
    /// The trigger starts armed: if the very first result is already empty,
    /// the fallback is published once on that tick.
    pub fn with_fallback(
        mut self,
        channel: impl Into<String>,
        source: Arc<dyn SourceAdapter>,
    ) -> Self {
        let channel = channel.into();
        self.store.declare(&channel);
        self.fallback = Some(Fallback {
            channel,
            source,
            trigger: EdgeTrigger::default(),
            consecutive_failures: 0,
        });
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Fetch once, then store and publish or record the failure.
    pub async fn tick(&mut self) -> TickOutcome {
        let start = Instant::now();
        let result = self.source.fetch().await;
        metrics::histogram!("statusboard_poll_duration_seconds", "channel" => self.channel.clone())
            .record(start.elapsed().as_secs_f64());

        self.state.ticks += 1;

        match result {
            Ok(snapshot) => {
                let empty = snapshot.is_empty();
                let stored = self.store.put(&self.channel, snapshot);
                self.hub.publish(stored.clone());
                metrics::counter!("statusboard_polls_total",
                    "channel" => self.channel.clone(),
                    "outcome" => "success"
                )
                .increment(1);

                if self.state.consecutive_failures > 0 {
                    tracing::info!(
                        channel = %self.channel,
                        failures = self.state.consecutive_failures,
                        "Channel recovered"
                    );
                }
                self.state.consecutive_failures = 0;
                self.state.last_success = Some(stored.updated_at);

                tracing::debug!(
                    channel = %self.channel,
                    version = stored.version,
                    empty,
                    "Channel updated"
                );

                let fallback = self.run_fallback(empty).await;

                TickOutcome::Updated {
                    version: stored.version,
                    empty,
                    fallback,
                }
            }
            Err(error) => {
                self.state.consecutive_failures += 1;
                self.store.record_failure(
                    &self.channel,
                    &error.to_string(),
                    self.state.consecutive_failures,
                );
                metrics::counter!("statusboard_polls_total",
                    "channel" => self.channel.clone(),
                    "outcome" => error.label()
                )
                .increment(1);

                tracing::warn!(
                    channel = %self.channel,
                    error = %error,
                    consecutive_failures = self.state.consecutive_failures,
                    "Fetch failed, keeping last snapshot"
                );

                TickOutcome::Failed {
                    error,
                    consecutive_failures: self.state.consecutive_failures,
                }
            }
        }
    }

    async fn run_fallback(&mut self, primary_empty: bool) -> Option<FallbackOutcome> {
        let fallback = self.fallback.as_mut()?;
        if !fallback.trigger.observe(primary_empty) {
            return None;
        }

        match fallback.source.fetch().await {
            Ok(snapshot) => {
                let stored = self.store.put(&fallback.channel, snapshot);
                self.hub.publish(stored.clone());
                fallback.consecutive_failures = 0;
                tracing::debug!(
                    channel = %self.channel,
                    fallback = %fallback.channel,
                    version = stored.version,
                    "Primary went empty, published fallback"
                );
                Some(FallbackOutcome::Published {
                    version: stored.version,
                })
            }
            Err(error) => {
                fallback.trigger.rearm();
                fallback.consecutive_failures += 1;
                self.store.record_failure(
                    &fallback.channel,
                    &error.to_string(),
                    fallback.consecutive_failures,
                );
                tracing::warn!(
                    channel = %self.channel,
                    fallback = %fallback.channel,
                    error = %error,
                    consecutive_failures = fallback.consecutive_failures,
                    "Fallback fetch failed, will retry on next empty result"
                );
                Some(FallbackOutcome::Failed { error })
            }
        }
    }

    /// Start the poller background task.
    ///
    /// The first fetch happens immediately. Cancellation is honoured even in
    /// the middle of a fetch; the in-flight request is dropped.
    pub fn start(mut self, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                channel = %self.channel,
                source = self.source.kind(),
                interval_ms = self.interval.as_millis() as u64,
                "Poller started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    _ = interval.tick() => {
                        tokio::select! {
                            _ = cancel_token.cancelled() => break,
                            _ = self.tick() => {}
                        }
                    }
                }
            }

            tracing::info!(channel = %self.channel, ticks = self.state.ticks, "Poller stopped");
        })
    }
}

/// Build one poller per valid channel in `config`.
///
/// Channels with bad settings are returned as errors and skipped; they never
/// prevent the remaining channels from starting.
pub fn build_pollers(
    config: &DashboardConfig,
    store: &Arc<LatestValueStore>,
    hub: &Arc<BroadcastHub>,
    client: Arc<Client>,
) -> (Vec<Poller>, Vec<ConfigError>) {
    let (channels, mut errors) = config.partition_channels();
    let mut pollers = Vec::with_capacity(channels.len());

    for channel in channels {
        let source = match build_source(&channel.name, &channel.source, Arc::clone(&client)) {
            Ok(source) => source,
            Err(e) => {
                errors.push(e);
                continue;
            }
        };

        let fallback = match &channel.fallback {
            Some(fb) => match build_source(&channel.name, &fb.source, Arc::clone(&client)) {
                Ok(source) => Some((fb.channel.clone(), source)),
                Err(e) => {
                    errors.push(e);
                    continue;
                }
            },
            None => None,
        };

        let mut poller = Poller::new(
            channel.name.clone(),
            source,
            Duration::from_secs(channel.interval_seconds),
            Arc::clone(store),
            Arc::clone(hub),
        );
        if let Some((fallback_channel, fallback_source)) = fallback {
            poller = poller.with_fallback(fallback_channel, fallback_source);
        }
        pollers.push(poller);
    }

    (pollers, errors)
}

/// Outcome of fetching one channel outside the polling loop.
#[derive(Debug)]
pub struct ChannelProbe {
    pub channel: String,
    pub latency: Option<Duration>,
    pub result: Result<Snapshot, SourceError>,
}

/// Fetch every enabled channel once, without storing or publishing anything.
///
/// Used by the `check` command. Fallback sources are fetched too and reported
/// under the fallback channel's name. Misconfigured channels are reported as
/// `Configuration` errors alongside the fetched ones.
pub async fn probe_channels(config: &DashboardConfig, client: Arc<Client>) -> Vec<ChannelProbe> {
    let (channels, errors) = config.partition_channels();

    let mut probes: Vec<ChannelProbe> = errors
        .into_iter()
        .map(|error| ChannelProbe {
            channel: match &error {
                ConfigError::Channel { channel, .. } => channel.clone(),
                _ => "<config>".to_string(),
            },
            latency: None,
            result: Err(SourceError::Configuration(error.to_string())),
        })
        .collect();

    let targets = channels.into_iter().flat_map(|channel| {
        let primary = (channel.name.as_str(), &channel.source);
        let fallback = channel
            .fallback
            .as_ref()
            .map(|fb| (fb.channel.as_str(), &fb.source));
        std::iter::once(primary).chain(fallback)
    });

    let fetches =
        targets.map(|(name, source_config)| probe_one(name, source_config, Arc::clone(&client)));

    probes.extend(futures::future::join_all(fetches).await);
    probes
}

async fn probe_one(
    name: &str,
    source_config: &SourceConfig,
    client: Arc<Client>,
) -> ChannelProbe {
    let source = match build_source(name, source_config, client) {
        Ok(source) => source,
        Err(e) => {
            return ChannelProbe {
                channel: name.to_string(),
                latency: None,
                result: Err(SourceError::Configuration(e.to_string())),
            }
        }
    };
    let start = Instant::now();
    let result = source.fetch().await;
    ChannelProbe {
        channel: name.to_string(),
        latency: Some(start.elapsed()),
        result,
    }
}
