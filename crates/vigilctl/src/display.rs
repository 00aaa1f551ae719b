//! Fleet report rendering
//!
//! Turns a FleetReport into the terminal dashboard: one section per host
//! with a status line, then a structured table when the probe output is
//! recognized (df or nvidia-smi csv), raw text otherwise.

use owo_colors::OwoColorize;
use std::collections::HashMap;
use std::time::Duration;
use vigil_common::diagnostics::{DiskUsage, GpuStat, ParsedProbe};
use vigil_common::report::{FleetReport, HostResult, ProbeStatus};
use vigil_common::HostDescriptor;

/// Disk usage thresholds for the use% column
const DISK_WARN_PERCENT: u8 = 70;
const DISK_CRITICAL_PERCENT: u8 = 90;

pub fn render_report(report: &FleetReport, hosts: &[HostDescriptor], use_color: bool) -> String {
    let by_id: HashMap<&str, &HostDescriptor> =
        hosts.iter().map(|h| (h.id.as_str(), h)).collect();

    let mut out = String::new();
    for result in report.sorted_results() {
        let descriptor = by_id.get(result.host_id.as_str()).copied();
        out.push_str(&render_host(result, descriptor, use_color));
        out.push('\n');
    }
    out.push_str(&render_summary(report, use_color));
    out.push('\n');
    out
}

pub fn render_summary(report: &FleetReport, use_color: bool) -> String {
    let healthy = report.healthy_count();
    let total = report.len();
    let counts = format!("{}/{} hosts healthy", healthy, total);
    let counts = if !use_color {
        counts
    } else if report.all_healthy() {
        counts.green().to_string()
    } else {
        counts.red().to_string()
    };
    format!("{} · run {}", counts, format_latency(report.elapsed()))
}

fn render_host(
    result: &HostResult,
    descriptor: Option<&HostDescriptor>,
    use_color: bool,
) -> String {
    let location = descriptor
        .map(|d| format!(" ({}@{})", d.username, d.address()))
        .unwrap_or_default();

    let mut out = format!(
        "{} {}{} - {} ({})\n",
        status_icon(result.status, use_color),
        bold(&result.host_id, use_color),
        location,
        status_label(result.status, use_color),
        format_latency(result.latency),
    );

    match result.status {
        ProbeStatus::Success => {
            if let Some(output) = &result.output {
                out.push_str(&render_probe_output(output, use_color));
            }
        }
        // Failures get their one-line detail, indented under the header
        _ => {
            if let Some(output) = &result.output {
                for line in output.lines().take(4) {
                    out.push_str("    ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
    }
    out
}

fn render_probe_output(output: &str, use_color: bool) -> String {
    match ParsedProbe::classify(output) {
        ParsedProbe::Disks(disks) => render_disk_table(&disks, use_color),
        ParsedProbe::Gpus(gpus) => render_gpu_table(&gpus),
        ParsedProbe::Raw(text) => {
            let mut out = String::new();
            for line in text.lines() {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
            out
        }
    }
}

pub fn render_disk_table(disks: &[DiskUsage], use_color: bool) -> String {
    let fs_width = disks
        .iter()
        .map(|d| d.filesystem.len())
        .chain(std::iter::once("Filesystem".len()))
        .max()
        .unwrap_or(10);

    let mut out = format!(
        "    {:<fs_width$}  {:>6}  {:>6}  {:>6}  {:>5}  {}\n",
        "Filesystem", "Size", "Used", "Avail", "Use%", "Mounted on"
    );
    for disk in disks {
        out.push_str(&format!(
            "    {:<fs_width$}  {:>6}  {:>6}  {:>6}  {:>5}  {}\n",
            disk.filesystem,
            disk.size,
            disk.used,
            disk.available,
            colored_percent(disk.use_percent, use_color),
            disk.mounted_on,
        ));
    }
    out
}

pub fn render_gpu_table(gpus: &[GpuStat]) -> String {
    let name_width = gpus
        .iter()
        .map(|g| g.name.len())
        .chain(std::iter::once("Name".len()))
        .max()
        .unwrap_or(4);

    let mut out = format!(
        "    {:<3}  {:<name_width$}  {:>20}  {:>6}\n",
        "GPU", "Name", "Memory", "Util"
    );
    for gpu in gpus {
        out.push_str(&format!(
            "    {:<3}  {:<name_width$}  {:>20}  {:>6}\n",
            gpu.index,
            gpu.name,
            format!("{} / {}", gpu.memory_used, gpu.memory_total),
            gpu.utilization,
        ));
    }
    out
}

fn colored_percent(percent: u8, use_color: bool) -> String {
    let text = format!("{}%", percent);
    if !use_color {
        return text;
    }
    if percent > DISK_CRITICAL_PERCENT {
        text.red().to_string()
    } else if percent > DISK_WARN_PERCENT {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}

fn status_icon(status: ProbeStatus, use_color: bool) -> String {
    if !use_color {
        return match status {
            ProbeStatus::Success => "[ok]".to_string(),
            ProbeStatus::Timeout => "[--]".to_string(),
            _ => "[!!]".to_string(),
        };
    }
    match status {
        ProbeStatus::Success => "●".green().to_string(),
        ProbeStatus::Timeout => "●".yellow().to_string(),
        _ => "●".red().to_string(),
    }
}

fn status_label(status: ProbeStatus, use_color: bool) -> String {
    let label = status.label();
    if !use_color {
        return label.to_string();
    }
    match status {
        ProbeStatus::Success => label.green().to_string(),
        ProbeStatus::Timeout => label.yellow().to_string(),
        _ => label.red().to_string(),
    }
}

fn bold(text: &str, use_color: bool) -> String {
    if use_color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn format_latency(latency: Duration) -> String {
    if latency >= Duration::from_secs(1) {
        format!("{:.1}s", latency.as_secs_f64())
    } else {
        format!("{}ms", latency.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap as StdHashMap;
    use uuid::Uuid;

    fn sample_report() -> FleetReport {
        let mut results = StdHashMap::new();
        results.insert(
            "gpu-box".to_string(),
            HostResult::new(
                "gpu-box",
                ProbeStatus::Success,
                Some(
                    "Filesystem      Size  Used Avail Use% Mounted on\n\
                     /dev/sda1       3.6T  3.3T  156G  96% /data\n"
                        .to_string(),
                ),
                Duration::from_millis(120),
            ),
        );
        results.insert(
            "dead-box".to_string(),
            HostResult::new(
                "dead-box",
                ProbeStatus::ConnectFailure,
                Some("cannot reach 10.0.0.9:22: connection refused".to_string()),
                Duration::from_millis(40),
            ),
        );
        let now = Utc::now();
        FleetReport {
            run_id: Uuid::new_v4(),
            started_at: now,
            completed_at: now,
            results,
        }
    }

    #[test]
    fn plain_render_names_every_host_and_status() {
        let hosts = vec![HostDescriptor::new("gpu-box", "10.0.0.2", 22, "ubuntu")];
        let text = render_report(&sample_report(), &hosts, false);

        assert!(text.contains("[ok] gpu-box (ubuntu@10.0.0.2:22) - OK"));
        assert!(text.contains("[!!] dead-box - UNREACHABLE"));
        assert!(text.contains("connection refused"));
        assert!(text.contains("1/2 hosts healthy"));
    }

    #[test]
    fn success_output_becomes_a_disk_table() {
        let text = render_report(&sample_report(), &[], false);
        assert!(text.contains("Filesystem"));
        assert!(text.contains("/dev/sda1"));
        assert!(text.contains("96%"));
        // Raw df text is re-rendered, not echoed
        assert!(!text.contains("3.3T  156G"));
    }

    #[test]
    fn gpu_table_pairs_memory_used_and_total() {
        let gpus = vec![GpuStat {
            index: "0".to_string(),
            name: "NVIDIA GeForce RTX 4090".to_string(),
            memory_used: "18432 MiB".to_string(),
            memory_total: "24564 MiB".to_string(),
            utilization: "87 %".to_string(),
        }];
        let table = render_gpu_table(&gpus);
        assert!(table.contains("18432 MiB / 24564 MiB"));
        assert!(table.contains("87 %"));
    }

    #[test]
    fn latency_formats_switch_at_one_second() {
        assert_eq!(format_latency(Duration::from_millis(87)), "87ms");
        assert_eq!(format_latency(Duration::from_millis(2300)), "2.3s");
    }
}
