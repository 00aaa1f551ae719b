//! Probe-output parsing
//!
//! Probe commands return plain text; the renderer wants structure when it
//! can get it. Two formats are recognized: `df -h` tables and the csv
//! query output of `nvidia-smi --query-gpu=index,name,memory.used,
//! memory.total,utilization.gpu --format=csv,noheader`. Anything else is
//! passed through untouched.

use serde::{Deserialize, Serialize};

/// One `df -h` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub filesystem: String,
    pub size: String,
    pub used: String,
    pub available: String,
    /// 0-100; the "%" suffix is stripped during parsing
    pub use_percent: u8,
    pub mounted_on: String,
}

/// One GPU line from the nvidia-smi csv query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuStat {
    pub index: String,
    pub name: String,
    pub memory_used: String,
    pub memory_total: String,
    pub utilization: String,
}

/// Structured view of one probe's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedProbe {
    Disks(Vec<DiskUsage>),
    Gpus(Vec<GpuStat>),
    Raw(String),
}

impl ParsedProbe {
    /// Try the known table formats, fall back to raw text.
    pub fn classify(output: &str) -> Self {
        let disks = parse_df(output);
        if !disks.is_empty() {
            return ParsedProbe::Disks(disks);
        }
        let gpus = parse_nvidia_smi_csv(output);
        if !gpus.is_empty() {
            return ParsedProbe::Gpus(gpus);
        }
        ParsedProbe::Raw(output.to_string())
    }
}

/// Parse `df -h` output: header line then whitespace-separated rows of
/// filesystem, size, used, available, use%, mount point. Rows that do not
/// fit (wrapped long device names, totals) are skipped.
pub fn parse_df(text: &str) -> Vec<DiskUsage> {
    let mut lines = text.lines();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    if !header.contains("Filesystem") {
        return Vec::new();
    }

    let mut disks = Vec::new();
    for line in lines {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            continue;
        }
        let Some(use_percent) = parts[4]
            .strip_suffix('%')
            .and_then(|p| p.parse::<u8>().ok())
        else {
            continue;
        };
        disks.push(DiskUsage {
            filesystem: parts[0].to_string(),
            size: parts[1].to_string(),
            used: parts[2].to_string(),
            available: parts[3].to_string(),
            use_percent,
            // Mount points with spaces come back joined
            mounted_on: parts[5..].join(" "),
        });
    }
    disks
}

/// Parse nvidia-smi csv-noheader lines: index, name, mem used, mem total,
/// utilization. Lines with the wrong field count are skipped.
pub fn parse_nvidia_smi_csv(text: &str) -> Vec<GpuStat> {
    let mut gpus = Vec::new();
    for line in text.lines() {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 5 {
            continue;
        }
        // First field must be a bare GPU index, otherwise this is not a
        // csv query line
        if fields[0].parse::<u32>().is_err() {
            continue;
        }
        gpus.push(GpuStat {
            index: fields[0].to_string(),
            name: fields[1].to_string(),
            memory_used: fields[2].to_string(),
            memory_total: fields[3].to_string(),
            utilization: fields[4].to_string(),
        });
    }
    gpus
}

#[cfg(test)]
mod tests {
    use super::*;

    const DF_OUTPUT: &str = "\
Filesystem      Size  Used Avail Use% Mounted on
/dev/nvme0n1p2  916G  412G  458G  48% /
/dev/sda1       3.6T  3.3T  156G  96% /data
tmpfs            32G     0   32G   0% /dev/shm
";

    const SMI_OUTPUT: &str = "\
0, NVIDIA GeForce RTX 4090, 18432 MiB, 24564 MiB, 87 %
1, NVIDIA GeForce RTX 4090, 2 MiB, 24564 MiB, 0 %
";

    #[test]
    fn parses_df_rows() {
        let disks = parse_df(DF_OUTPUT);
        assert_eq!(disks.len(), 3);
        assert_eq!(disks[0].filesystem, "/dev/nvme0n1p2");
        assert_eq!(disks[0].use_percent, 48);
        assert_eq!(disks[1].mounted_on, "/data");
        assert_eq!(disks[1].use_percent, 96);
    }

    #[test]
    fn df_requires_the_header() {
        assert!(parse_df("/dev/sda1 3.6T 3.3T 156G 96% /data").is_empty());
        assert!(parse_df("").is_empty());
    }

    #[test]
    fn df_skips_malformed_rows() {
        let text = "Filesystem Size Used Avail Use% Mounted on\ngarbage line\n";
        assert!(parse_df(text).is_empty());
    }

    #[test]
    fn parses_nvidia_smi_csv_lines() {
        let gpus = parse_nvidia_smi_csv(SMI_OUTPUT);
        assert_eq!(gpus.len(), 2);
        assert_eq!(gpus[0].index, "0");
        assert_eq!(gpus[0].name, "NVIDIA GeForce RTX 4090");
        assert_eq!(gpus[0].memory_used, "18432 MiB");
        assert_eq!(gpus[1].utilization, "0 %");
    }

    #[test]
    fn smi_rejects_prose() {
        assert!(parse_nvidia_smi_csv("NVIDIA-SMI has failed").is_empty());
    }

    #[test]
    fn classify_picks_the_right_table() {
        assert!(matches!(ParsedProbe::classify(DF_OUTPUT), ParsedProbe::Disks(_)));
        assert!(matches!(ParsedProbe::classify(SMI_OUTPUT), ParsedProbe::Gpus(_)));
        assert!(matches!(
            ParsedProbe::classify("load average: 0.52"),
            ParsedProbe::Raw(_)
        ));
    }
}
