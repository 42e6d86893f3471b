//! In-process metrics registry and the inference metrics adapter.
//!
//! Meters are keyed by name plus a sorted tag vector in a `DashMap`. Gauges
//! are bound once to a read function and sampled at render time; counters are
//! plain atomics. Output is the Prometheus text exposition format.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use senti_core::error::{Result, SentiError};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct MeterId {
    name: String,
    tags: Vec<(String, String)>,
}

impl MeterId {
    fn new(name: &str, tags: &[(&str, &str)]) -> Self {
        let mut tags: Vec<(String, String)> = tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        tags.sort();
        Self {
            name: name.to_string(),
            tags,
        }
    }

    fn label_str(&self) -> String {
        self.tags
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
            .collect::<Vec<_>>()
            .join(",")
    }
}

type GaugeFn = Arc<dyn Fn() -> f64 + Send + Sync>;

enum Meter {
    Gauge(GaugeFn),
    Counter(Arc<Counter>),
}

/// Monotonic counter.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
    description: Option<String>,
}

impl Counter {
    /// Increment by 1.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Registry that gauges and counters are bound to for the process lifetime.
#[derive(Default)]
pub struct MetricsRegistry {
    meters: DashMap<MeterId, Meter>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a gauge read function. Returns `false` if the id was already bound;
    /// the first binding is kept.
    pub fn gauge<F>(&self, name: &str, tags: &[(&str, &str)], read: F) -> bool
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        match self.meters.entry(MeterId::new(name, tags)) {
            Entry::Occupied(_) => {
                tracing::debug!(meter = %name, "gauge already registered");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(Meter::Gauge(Arc::new(read)));
                true
            }
        }
    }

    /// Get or register a counter. Fails if the id is already bound to a gauge.
    pub fn counter(
        &self,
        name: &str,
        tags: &[(&str, &str)],
        description: &str,
    ) -> Result<Arc<Counter>> {
        let id = MeterId::new(name, tags);
        let entry = self.meters.entry(id).or_insert_with(|| {
            Meter::Counter(Arc::new(Counter {
                value: AtomicU64::new(0),
                description: Some(description.to_string()).filter(|d| !d.is_empty()),
            }))
        });
        match entry.value() {
            Meter::Counter(c) => Ok(Arc::clone(c)),
            Meter::Gauge(_) => Err(SentiError::Internal(format!(
                "meter {name} is already registered as a gauge"
            ))),
        }
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut ids: Vec<MeterId> = self.meters.iter().map(|r| r.key().clone()).collect();
        ids.sort();

        let mut out = String::new();
        let mut last_name: Option<String> = None;
        for id in ids {
            let Some(meter) = self.meters.get(&id) else { continue };
            let first_of_family = last_name.as_deref() != Some(id.name.as_str());
            let labels = id.label_str();
            match meter.value() {
                Meter::Gauge(read) => {
                    if first_of_family {
                        let _ = writeln!(out, "# TYPE {} gauge", id.name);
                    }
                    let _ = writeln!(out, "{}{{{}}} {}", id.name, labels, read());
                }
                Meter::Counter(c) => {
                    if first_of_family {
                        if let Some(d) = &c.description {
                            let _ = writeln!(out, "# HELP {} {}", id.name, d);
                        }
                        let _ = writeln!(out, "# TYPE {} counter", id.name);
                    }
                    let _ = writeln!(out, "{}{{{}}} {}", id.name, labels, c.get());
                }
            }
            last_name = Some(id.name);
        }
        out
    }
}

/// `f64` stored as bits in an `AtomicU64`.
#[derive(Debug, Default)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }
}

/// Latest observed inference values plus the total request count.
///
/// Each field is independently atomic; an update of all six gauges is not
/// atomic as a whole, so a concurrent reader may see a mix of two updates.
#[derive(Debug)]
pub struct InferenceMetrics {
    latency: AtomicI64,
    feedback_score: AtomicF64,
    accuracy: AtomicF64,
    cpu_utilization: AtomicF64,
    ram_usage: AtomicF64,
    cpu_cycle: AtomicI64,
    request_count: Arc<Counter>,
}

impl InferenceMetrics {
    /// Build the adapter and bind its meters to `registry` under `env=<env>`.
    pub fn register(registry: &MetricsRegistry, env: &str) -> Result<Arc<Self>> {
        let tags = [("env", env)];
        let request_count = registry.counter("request_count", &tags, "Total count of requests")?;

        let metrics = Arc::new(Self {
            latency: AtomicI64::new(0),
            feedback_score: AtomicF64::default(),
            accuracy: AtomicF64::default(),
            cpu_utilization: AtomicF64::default(),
            ram_usage: AtomicF64::default(),
            cpu_cycle: AtomicI64::new(0),
            request_count,
        });

        let bind = |name: &str, read: fn(&InferenceMetrics) -> f64| {
            let m = Arc::clone(&metrics);
            registry.gauge(name, &tags, move || read(&m));
        };
        bind("latency", |m| m.latency() as f64);
        bind("feedback_score", Self::feedback_score);
        bind("accuracy", Self::accuracy);
        bind("cpu_utilization", Self::cpu_utilization);
        bind("ram_usage", Self::ram_usage);
        bind("cpu_cycle", |m| m.cpu_cycle() as f64);

        Ok(metrics)
    }

    /// Overwrite every gauge. No validation.
    pub fn update_metrics(
        &self,
        latency: i64,
        feedback_score: f64,
        accuracy: f64,
        cpu_utilization: f64,
        ram_usage: f64,
        cpu_cycle: i64,
    ) {
        self.latency.store(latency, Ordering::Relaxed);
        self.feedback_score.store(feedback_score);
        self.accuracy.store(accuracy);
        self.cpu_utilization.store(cpu_utilization);
        self.ram_usage.store(ram_usage);
        self.cpu_cycle.store(cpu_cycle, Ordering::Relaxed);
    }

    pub fn increment_request_count(&self) {
        self.request_count.inc();
    }

    pub fn latency(&self) -> i64 {
        self.latency.load(Ordering::Relaxed)
    }
    pub fn feedback_score(&self) -> f64 {
        self.feedback_score.load()
    }
    pub fn accuracy(&self) -> f64 {
        self.accuracy.load()
    }
    pub fn cpu_utilization(&self) -> f64 {
        self.cpu_utilization.load()
    }
    pub fn ram_usage(&self) -> f64 {
        self.ram_usage.load()
    }
    pub fn cpu_cycle(&self) -> i64 {
        self.cpu_cycle.load(Ordering::Relaxed)
    }
    pub fn request_count(&self) -> u64 {
        self.request_count.get()
    }
}
