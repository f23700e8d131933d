//! Summarizes criterion results for the bitvector and DFS benchmarks.
//!
//! Run after `cargo bench`; reads `target/criterion/**/new/estimates.json`
//! and prints one table per benchmark group, fastest first. Pass
//! `--json <path>` to also write the summary as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
struct Estimate {
    point_estimate: f64,
    standard_error: f64,
}

#[derive(Deserialize, Debug)]
struct Estimates {
    mean: Estimate,
}

#[derive(Serialize, Debug, Clone)]
struct Measurement {
    group: String,
    benchmark: String,
    time_ns: f64,
    std_err_ns: f64,
}

fn collect(dir: &Path, root: &Path, out: &mut Vec<Measurement>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            if path.file_name().and_then(|name| name.to_str()) == Some("report") {
                continue;
            }
            collect(&path, root, out)?;
            continue;
        }
        let is_new_estimate = path.file_name().and_then(|name| name.to_str()) == Some("estimates.json")
            && path.parent().and_then(Path::file_name).and_then(|name| name.to_str()) == Some("new");
        if !is_new_estimate {
            continue;
        }
        let Some(bench_dir) = path.parent().and_then(Path::parent) else {
            continue;
        };
        let relative = bench_dir.strip_prefix(root).unwrap_or(bench_dir);
        let mut parts = relative.iter().map(|part| part.to_string_lossy().into_owned());
        let group = parts.next().unwrap_or_default();
        let benchmark = parts.collect::<Vec<_>>().join("/");

        let content = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let estimates: Estimates =
            serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        out.push(Measurement {
            group,
            benchmark: if benchmark.is_empty() { "-".to_owned() } else { benchmark },
            time_ns: estimates.mean.point_estimate,
            std_err_ns: estimates.mean.standard_error,
        });
    }
    Ok(())
}

fn format_time(ns: f64) -> String {
    if ns >= 1e6 {
        format!("{:.2} ms", ns / 1e6)
    } else if ns >= 1e3 {
        format!("{:.2} µs", ns / 1e3)
    } else {
        format!("{ns:.1} ns")
    }
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut json_out: Option<PathBuf> = None;
    let mut criterion_dir = PathBuf::from("target/criterion");
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json_out = Some(args.next().context("--json needs a path")?.into()),
            "--dir" => criterion_dir = args.next().context("--dir needs a path")?.into(),
            other => bail!("unknown argument `{other}`"),
        }
    }

    if !criterion_dir.exists() {
        bail!(
            "no benchmark results at {}; run `cargo bench --bench bitvec_benchmark --bench dfs_benchmark` first",
            criterion_dir.display()
        );
    }

    let mut measurements = Vec::new();
    collect(&criterion_dir, &criterion_dir, &mut measurements)?;

    let mut groups: BTreeMap<&str, Vec<&Measurement>> = BTreeMap::new();
    for measurement in &measurements {
        groups.entry(measurement.group.as_str()).or_default().push(measurement);
    }

    println!("SPACEDFS PERFORMANCE REPORT");
    println!("===========================");
    println!("Benchmarks found: {}\n", measurements.len());

    for (group, mut results) in groups {
        results.sort_by(|a, b| a.time_ns.total_cmp(&b.time_ns));
        println!("{group}");
        for result in &results {
            println!(
                "  {:<32} {:>12} ± {}",
                result.benchmark,
                format_time(result.time_ns),
                format_time(result.std_err_ns)
            );
        }
        if let (Some(fastest), Some(slowest)) = (results.first(), results.last()) {
            if fastest.time_ns > 0.0 && results.len() > 1 {
                println!("  spread: {:.1}x", slowest.time_ns / fastest.time_ns);
            }
        }
        println!();
    }

    if let Some(path) = json_out {
        let body = serde_json::to_string_pretty(&measurements)?;
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        println!("Summary written to {}", path.display());
    }
    Ok(())
}
