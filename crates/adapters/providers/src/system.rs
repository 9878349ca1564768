//! System provider — host resource usage for a `card` widget.
//!
//! Bars: `cpu` (percent), `memory` and `disk` (bytes). Tables: `network`
//! (totals over all interfaces) and `system` (host facts). Bars whose total
//! is unknown are left out so the rest of the card still renders.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local};
use serde_json::{Map, Value, json};
use sysinfo::{Disks, Networks, System};

use dashdeck_app::ports::WidgetProvider;
use dashdeck_domain::error::ProviderError;
use dashdeck_domain::payload::{STACKED_BAR_CHART, TABLE};
use dashdeck_domain::widget::{WidgetConfig, WidgetKind};

/// Default refresh period, in milliseconds.
pub const REFRESH_INTERVAL_MS: u64 = 10_000;

struct Sampler {
    system: System,
    networks: Networks,
    disks: Disks,
}

impl Sampler {
    fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        system.refresh_memory();
        Self {
            system,
            networks: Networks::new_with_refreshed_list(),
            disks: Disks::new_with_refreshed_list(),
        }
    }

    fn sample(&mut self) -> Value {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();
        self.networks.refresh(true);
        self.disks.refresh(true);

        let mut data = Map::new();
        data.insert(
            "cpu".to_string(),
            json!({
                "type": STACKED_BAR_CHART,
                "total": 100,
                "used": f64::from(self.system.global_cpu_usage()),
            }),
        );
        if let Some(memory) = bar(self.system.total_memory(), self.system.used_memory()) {
            data.insert("memory".to_string(), memory);
        }
        let (disk_total, disk_available) = self
            .disks
            .list()
            .iter()
            .fold((0u64, 0u64), |(total, available), disk| {
                (total + disk.total_space(), available + disk.available_space())
            });
        if let Some(disk) = bar(disk_total, disk_total.saturating_sub(disk_available)) {
            data.insert("disk".to_string(), disk);
        }
        data.insert("network".to_string(), self.network());
        data.insert("system".to_string(), host());
        Value::Object(data)
    }

    fn network(&self) -> Value {
        let (mut sent, mut recv, mut packets_sent, mut packets_recv) = (0u64, 0u64, 0u64, 0u64);
        for (_, network) in &self.networks {
            sent += network.total_transmitted();
            recv += network.total_received();
            packets_sent += network.total_packets_transmitted();
            packets_recv += network.total_packets_received();
        }
        json!({
            "type": TABLE,
            "bytes_sent": sent,
            "bytes_recv": recv,
            "packets_sent": packets_sent,
            "packets_recv": packets_recv,
        })
    }
}

fn bar(total: u64, used: u64) -> Option<Value> {
    (total > 0).then(|| json!({ "type": STACKED_BAR_CHART, "total": total, "used": used }))
}

fn host() -> Value {
    let boot_time = i64::try_from(System::boot_time())
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|at| {
            at.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        });
    json!({
        "type": TABLE,
        "platform": System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
        "hostname": System::host_name().unwrap_or_default(),
        "uptime": format_uptime(System::uptime()),
        "boot_time": boot_time,
    })
}

/// `[D day(s), ]H:MM:SS`
fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = secs % 86_400 / 3_600;
    let minutes = secs % 3_600 / 60;
    let seconds = secs % 60;
    match days {
        0 => format!("{hours}:{minutes:02}:{seconds:02}"),
        1 => format!("1 day, {hours}:{minutes:02}:{seconds:02}"),
        _ => format!("{days} days, {hours}:{minutes:02}:{seconds:02}"),
    }
}

/// Samples the host on each fetch.
///
/// CPU usage is measured between consecutive fetches, so the first sample
/// may read low.
#[derive(Clone)]
pub struct SystemProvider {
    sampler: Arc<Mutex<Sampler>>,
}

impl Default for SystemProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sampler: Arc::new(Mutex::new(Sampler::new())),
        }
    }
}

impl WidgetProvider for SystemProvider {
    fn default_config(&self) -> WidgetConfig {
        WidgetConfig::new(WidgetKind::Card, REFRESH_INTERVAL_MS).with_title("System Status")
    }

    async fn fetch_data(&self) -> Result<Value, ProviderError> {
        let sampler = Arc::clone(&self.sampler);
        tokio::task::spawn_blocking(move || {
            sampler
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .sample()
        })
        .await
        .map_err(ProviderError::new)
    }
}
