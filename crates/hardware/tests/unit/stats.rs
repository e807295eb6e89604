//! Measurement snapshot tests.

use cachesim_core::cache::{CacheLevel, Geometry};
use cachesim_core::{CacheHierarchy, HierarchyStats, LevelStats};
use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;
use crate::common::mocks::prefetcher::SequentialPrefetcher;

/// Splits each report row into its label and value, dropping the column padding.
fn rows(report: &str) -> Vec<(String, String)> {
    report
        .lines()
        .skip(1)
        .map(|line| {
            let (label, value) = line.rsplit_once(' ').unwrap();
            (label.trim_end().to_owned(), value.to_owned())
        })
        .collect()
}

fn row(label: &str, value: &str) -> (String, String) {
    (label.to_owned(), value.to_owned())
}

#[test]
fn default_stats_all_zero() {
    let stats = LevelStats::default();
    assert_eq!(stats.accesses(), 0);
    assert_eq!(stats.misses(), 0);
    assert_eq!(stats.write_backs, 0);
    assert_eq!(stats.memory_traffic, 0);
    assert_eq!(stats.prefetches, 0);
}

#[test]
fn rates_with_no_accesses_are_zero() {
    let stats = LevelStats::default();
    assert!(stats.miss_rate().abs() < f64::EPSILON);
    assert!(stats.read_miss_rate().abs() < f64::EPSILON);
}

#[test]
fn derived_metrics() {
    let stats = LevelStats {
        reads: 6,
        read_hits: 4,
        read_misses: 2,
        writes: 2,
        write_hits: 0,
        write_misses: 2,
        ..LevelStats::default()
    };
    assert_eq!(stats.accesses(), 8);
    assert_eq!(stats.misses(), 4);
    assert!((stats.miss_rate() - 0.5).abs() < 1e-12);
    assert!((stats.read_miss_rate() - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn level_lookup_is_one_based() {
    let stats = HierarchyStats {
        levels: vec![
            LevelStats {
                reads: 1,
                ..LevelStats::default()
            },
            LevelStats {
                reads: 2,
                memory_traffic: 5,
                ..LevelStats::default()
            },
        ],
    };
    assert!(stats.level(0).is_none());
    assert_eq!(stats.level(1).unwrap().reads, 1);
    assert_eq!(stats.level(2).unwrap().reads, 2);
    assert!(stats.level(3).is_none());
    assert_eq!(stats.total_memory_traffic(), 5);
}

#[test]
fn single_level_report() {
    let mut ctx = TestContext::new(16, &[(64, 1)]);
    ctx.run("r 0x00\nr 0x10\nr 0x20\nr 0x30\nr 0x00\n");
    let report = ctx.hierarchy.stats().to_string();

    assert_eq!(report.lines().next(), Some("===== Measurements ====="));
    assert_eq!(
        rows(&report),
        vec![
            row("L1 reads:", "5"),
            row("L1 read misses:", "4"),
            row("L1 writes:", "0"),
            row("L1 write misses:", "0"),
            row("L1 miss rate:", "0.8000"),
            row("L1 writebacks:", "0"),
            row("L1 prefetches:", "0"),
            row("memory traffic:", "4"),
        ]
    );
}

#[test]
fn two_level_report_lists_every_level() {
    let mut ctx = TestContext::new(16, &[(16, 1), (64, 1)]);
    ctx.write(0x00).read(0x10);
    let report = ctx.hierarchy.stats().to_string();

    assert_eq!(
        rows(&report),
        vec![
            row("L1 reads:", "1"),
            row("L1 read misses:", "1"),
            row("L1 writes:", "1"),
            row("L1 write misses:", "1"),
            row("L1 miss rate:", "1.0000"),
            row("L1 writebacks:", "1"),
            row("L1 prefetches:", "0"),
            row("L2 reads:", "2"),
            row("L2 read misses:", "2"),
            row("L2 writes:", "1"),
            row("L2 write misses:", "0"),
            row("L2 miss rate:", "1.0000"),
            row("L2 writebacks:", "0"),
            row("L2 prefetches:", "0"),
            row("memory traffic:", "2"),
        ]
    );
}

#[test]
fn json_snapshot_carries_every_counter() {
    let mut ctx = TestContext::new(16, &[(64, 1)]);
    ctx.write(0x00).read(0x40);

    let json = ctx.hierarchy.stats().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let l1 = &value["levels"][0];
    assert_eq!(value["levels"].as_array().unwrap().len(), 1);
    assert_eq!(l1["reads"], 1);
    assert_eq!(l1["writes"], 1);
    assert_eq!(l1["write_misses"], 1);
    assert_eq!(l1["write_backs"], 1);
    assert_eq!(l1["memory_traffic"], 3);
    assert_eq!(l1["prefetches"], 0);
}

#[test]
fn prefetches_are_counted_as_reads_below() {
    let mut l1 = CacheLevel::new("L1", Geometry::from_size(1, 64, 16, 1).unwrap());
    l1.set_prefetcher(Box::new(SequentialPrefetcher {
        block_size: 16,
        degree: 1,
    }));
    let l2 = CacheLevel::new("L2", Geometry::from_size(2, 256, 16, 2).unwrap());
    let mut hierarchy = CacheHierarchy::from_levels(vec![l1, l2]).unwrap();
    hierarchy.read(0x00);

    let report = hierarchy.stats().to_string();
    assert!(!report.contains("demand"));
    let table = rows(&report);
    assert!(table.contains(&row("L1 prefetches:", "1")));
    // Refill of 0x00 plus the prefetch of 0x10.
    assert!(table.contains(&row("L2 reads:", "2")));
    assert!(table.contains(&row("L2 read misses:", "2")));
}
