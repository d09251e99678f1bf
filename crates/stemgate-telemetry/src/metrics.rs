//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes the counters/gauges relevant to the separation pipeline.

use anyhow::{Context, Result};
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: std::sync::Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    separations_total: IntCounterVec,
    downloads_total: IntCounterVec,
    notifications_total: IntCounterVec,
    separations_in_flight: IntGauge,
    downloads_in_flight: IntGauge,
}

/// Snapshot of selected gauges and counters for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Number of separation runs currently holding a permit.
    pub separations_in_flight: i64,
    /// Number of media downloads currently holding a permit.
    pub downloads_in_flight: i64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )?;
        let separations_total = IntCounterVec::new(
            Opts::new("separations_total", "Source separation runs by outcome"),
            &["outcome"],
        )?;
        let downloads_total = IntCounterVec::new(
            Opts::new("downloads_total", "Media downloads by outcome"),
            &["outcome"],
        )?;
        let notifications_total = IntCounterVec::new(
            Opts::new("notifications_total", "Email notifications by outcome"),
            &["outcome"],
        )?;
        let separations_in_flight = IntGauge::with_opts(Opts::new(
            "separations_in_flight",
            "Separation runs currently executing",
        ))?;
        let downloads_in_flight = IntGauge::with_opts(Opts::new(
            "downloads_in_flight",
            "Media downloads currently executing",
        ))?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(separations_total.clone()))?;
        registry.register(Box::new(downloads_total.clone()))?;
        registry.register(Box::new(notifications_total.clone()))?;
        registry.register(Box::new(separations_in_flight.clone()))?;
        registry.register(Box::new(downloads_in_flight.clone()))?;

        Ok(Self {
            inner: std::sync::Arc::new(MetricsInner {
                registry,
                http_requests_total,
                separations_total,
                downloads_total,
                notifications_total,
                separations_in_flight,
                downloads_in_flight,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Increment the separation counter for the given outcome.
    pub fn inc_separation(&self, outcome: &str) {
        self.inner
            .separations_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Increment the download counter for the given outcome.
    pub fn inc_download(&self, outcome: &str) {
        self.inner
            .downloads_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Increment the notification counter for the given outcome.
    pub fn inc_notification(&self, outcome: &str) {
        self.inner
            .notifications_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Adjust the gauge tracking separation runs in flight.
    pub fn add_separations_in_flight(&self, delta: i64) {
        self.inner.separations_in_flight.add(delta);
    }

    /// Adjust the gauge tracking downloads in flight.
    pub fn add_downloads_in_flight(&self, delta: i64) {
        self.inner.downloads_in_flight.add(delta);
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("failed to encode Prometheus metrics")?;
        String::from_utf8(buffer).context("metrics output was not valid UTF-8")
    }

    /// Take a point-in-time snapshot of the in-flight gauges.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            separations_in_flight: self.inner.separations_in_flight.get(),
            downloads_in_flight: self.inner.downloads_in_flight.get(),
        }
    }
}
