//! Prometheus registry fed by statistics snapshots.
//!
//! Every upstream series lives in one `prometheus::Registry`. A read/write
//! lock orders `apply` against `render`: apply holds the write side for the
//! whole snapshot, so a scrape sees either the previous cycle or the new one,
//! never a family with some entries removed and others not yet set.
//!
//! The lock also guards the label index, the set of label tuples currently
//! published in each top-N family. Apply diffs the new tuples against it and
//! removes the stale ones, which keeps family cardinality equal to the size
//! of the latest top-N table.

use prometheus::{Gauge, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;
use unbound_exporter_application::ports::{ApplyOutcome, MetricStorePort};
use unbound_exporter_domain::{
    DomainError, FetchError, FieldError, StatsSnapshot, TopBlockedEntry, TopEntry,
};

const FETCH_ERROR_KINDS: [&str; 4] = ["auth", "http", "network", "decode"];

#[derive(Default)]
struct LabelIndex {
    top_queried: HashSet<String>,
    top_blocked: HashSet<(String, String)>,
}

struct BreakdownGauges {
    category: &'static str,
    total: Gauge,
    percent: Gauge,
}

impl BreakdownGauges {
    /// Sets each member that extracted cleanly and collects the rest.
    fn set(&self, snapshot: &StatsSnapshot, failed: &mut Vec<FieldError>) {
        let fields = match snapshot.breakdown_fields(self.category) {
            Ok(fields) => fields,
            Err(e) => {
                failed.push(e);
                return;
            }
        };
        for (gauge, value) in [(&self.total, fields.total), (&self.percent, fields.percent)] {
            match value {
                Ok(v) => gauge.set(v),
                Err(e) => failed.push(e),
            }
        }
    }
}

pub struct PrometheusMetricStore {
    registry: Registry,
    index: RwLock<LabelIndex>,

    queries_total: Gauge,
    queries_passed: Gauge,
    blocklist_size: Gauge,
    resolved: BreakdownGauges,
    blocked: BreakdownGauges,
    local: BreakdownGauges,

    top_queried_total: GaugeVec,
    top_queried_percent: GaugeVec,
    top_blocked_total: GaugeVec,
    top_blocked_percent: GaugeVec,

    fetch_errors: IntCounterVec,
}

impl PrometheusMetricStore {
    pub fn new() -> Result<Self, DomainError> {
        let registry = Registry::new();

        let queries_total = gauge(
            &registry,
            "unbound_queries_total",
            "Total number of Unbound queries",
        )?;
        let queries_passed = gauge(
            &registry,
            "unbound_queries_passed_total",
            "Total queries that were passed",
        )?;
        let blocklist_size = gauge(
            &registry,
            "unbound_blocklist_size",
            "Number of domains on the blocklist",
        )?;
        let resolved = breakdown_gauges(&registry, "resolved")?;
        let blocked = breakdown_gauges(&registry, "blocked")?;
        let local = breakdown_gauges(&registry, "local")?;

        let top_queried_total = gauge_vec(
            &registry,
            "unbound_top_domain_queries_total",
            "Queries per domain in the top queried table",
            &["domain"],
        )?;
        let top_queried_percent = gauge_vec(
            &registry,
            "unbound_top_domain_queries_percent",
            "Share of all queries per domain in the top queried table",
            &["domain"],
        )?;
        let top_blocked_total = gauge_vec(
            &registry,
            "unbound_top_blocked_domain_queries_total",
            "Blocked queries per domain in the top blocked table",
            &["domain", "blocklist"],
        )?;
        let top_blocked_percent = gauge_vec(
            &registry,
            "unbound_top_blocked_domain_queries_percent",
            "Share of all queries per domain in the top blocked table",
            &["domain", "blocklist"],
        )?;

        let fetch_errors = IntCounterVec::new(
            Opts::new(
                "unbound_exporter_fetch_errors_total",
                "Failed fetches from the statistics API by kind",
            ),
            &["kind"],
        )
        .map_err(registry_error)?;
        registry
            .register(Box::new(fetch_errors.clone()))
            .map_err(registry_error)?;
        for kind in FETCH_ERROR_KINDS {
            fetch_errors.with_label_values(&[kind]);
        }

        Ok(Self {
            registry,
            index: RwLock::new(LabelIndex::default()),
            queries_total,
            queries_passed,
            blocklist_size,
            resolved,
            blocked,
            local,
            top_queried_total,
            top_queried_percent,
            top_blocked_total,
            top_blocked_percent,
            fetch_errors,
        })
    }

    fn write_index(&self) -> RwLockWriteGuard<'_, LabelIndex> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_index(&self) -> RwLockReadGuard<'_, LabelIndex> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace_top_queried(&self, published: &mut HashSet<String>, entries: &[TopEntry]) {
        let fresh: HashSet<String> = entries.iter().map(|e| e.domain.clone()).collect();

        for stale in published.difference(&fresh) {
            let labels = [stale.as_str()];
            let _ = self.top_queried_total.remove_label_values(&labels);
            let _ = self.top_queried_percent.remove_label_values(&labels);
        }

        for entry in entries {
            let labels = [entry.domain.as_str()];
            self.top_queried_total
                .with_label_values(&labels)
                .set(entry.total);
            self.top_queried_percent
                .with_label_values(&labels)
                .set(entry.percent);
        }

        *published = fresh;
    }

    fn replace_top_blocked(
        &self,
        published: &mut HashSet<(String, String)>,
        entries: &[TopBlockedEntry],
    ) {
        let fresh: HashSet<(String, String)> = entries
            .iter()
            .map(|e| (e.domain.clone(), e.blocklist.clone()))
            .collect();

        for (domain, blocklist) in published.difference(&fresh) {
            let labels = [domain.as_str(), blocklist.as_str()];
            let _ = self.top_blocked_total.remove_label_values(&labels);
            let _ = self.top_blocked_percent.remove_label_values(&labels);
        }

        for entry in entries {
            let labels = [entry.domain.as_str(), entry.blocklist.as_str()];
            self.top_blocked_total
                .with_label_values(&labels)
                .set(entry.total);
            self.top_blocked_percent
                .with_label_values(&labels)
                .set(entry.percent);
        }

        *published = fresh;
    }
}

impl MetricStorePort for PrometheusMetricStore {
    fn apply(&self, snapshot: &StatsSnapshot) -> Result<ApplyOutcome, DomainError> {
        let mut failed: Vec<FieldError> = Vec::new();
        let mut index = self.write_index();

        for (gauge, value) in [
            (&self.queries_total, snapshot.total()),
            (&self.queries_passed, snapshot.passed()),
            (&self.blocklist_size, snapshot.blocklist_size()),
        ] {
            match value {
                Ok(v) => gauge.set(v),
                Err(e) => failed.push(e),
            }
        }

        for gauges in [&self.resolved, &self.blocked, &self.local] {
            gauges.set(snapshot, &mut failed);
        }

        match snapshot.top_queried() {
            Ok(entries) => self.replace_top_queried(&mut index.top_queried, &entries),
            Err(e) => failed.push(e),
        }

        match snapshot.top_blocked() {
            Ok(entries) => self.replace_top_blocked(&mut index.top_blocked, &entries),
            Err(e) => failed.push(e),
        }

        let outcome = ApplyOutcome {
            top_queried: index.top_queried.len(),
            top_blocked: index.top_blocked.len(),
        };
        drop(index);

        if failed.is_empty() {
            return Ok(outcome);
        }

        for e in &failed {
            warn!(field = %e.field, reason = %e.reason, "Skipping malformed field");
        }
        Err(DomainError::PartialApply {
            fields: failed.into_iter().map(|e| e.field).collect(),
        })
    }

    fn record_fetch_failure(&self, error: &FetchError) {
        self.fetch_errors.with_label_values(&[error.kind()]).inc();
    }

    fn render(&self) -> Result<String, DomainError> {
        let families = {
            let _index = self.read_index();
            self.registry.gather()
        };

        TextEncoder::new()
            .encode_to_string(&families)
            .map_err(|e| DomainError::Encode(e.to_string()))
    }

    fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<Gauge, DomainError> {
    let gauge = Gauge::with_opts(Opts::new(name, help)).map_err(registry_error)?;
    registry
        .register(Box::new(gauge.clone()))
        .map_err(registry_error)?;
    Ok(gauge)
}

fn gauge_vec(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> Result<GaugeVec, DomainError> {
    let vec = GaugeVec::new(Opts::new(name, help), labels).map_err(registry_error)?;
    registry
        .register(Box::new(vec.clone()))
        .map_err(registry_error)?;
    Ok(vec)
}

fn breakdown_gauges(
    registry: &Registry,
    category: &'static str,
) -> Result<BreakdownGauges, DomainError> {
    Ok(BreakdownGauges {
        category,
        total: gauge(
            registry,
            &format!("unbound_queries_{category}_total"),
            &format!("Total {category} queries"),
        )?,
        percent: gauge(
            registry,
            &format!("unbound_queries_{category}_percent"),
            &format!("Percentage of queries that were {category}"),
        )?,
    })
}

fn registry_error(e: prometheus::Error) -> DomainError {
    DomainError::Registry(e.to_string())
}
