use callgrind_spans::layout::{children_of, layout, IntervalKind, LayoutConfig, RootDuration};
use callgrind_spans::parser::{parse_file, parse_str, ParserConfig};
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::time::Duration;

fn start() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_build_fixture_layout() {
    let profile = parse_file(fixture("callgrind.out.build"), &ParserConfig::default()).unwrap();
    let root = profile.heaviest_root().unwrap();
    let config = LayoutConfig::new().with_root_duration(RootDuration::TotalCost);

    let intervals = layout(&profile, start(), root, &config);

    let labels: Vec<&str> = intervals.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "all",
            "build",
            "compile",
            "compile_body",
            "link",
            "link_body",
            "build_body",
            "clean",
            "clean_body",
        ]
    );

    assert_eq!(intervals[0].duration(), Duration::from_secs(9));
    assert_eq!(intervals[6].duration(), Duration::from_millis(400));
    assert_eq!(intervals[6].start, start() + chrono::Duration::milliseconds(7_600));
    assert_eq!(intervals[7].start, start() + chrono::Duration::seconds(8));
    assert_eq!(intervals[2].attributes.invocation_count, 5);
    assert_eq!(children_of(&intervals, 1), vec![2, 4, 6]);
}

#[test]
fn test_children_stay_within_parent_when_they_fit() {
    let profile = parse_file(fixture("callgrind.out.build"), &ParserConfig::default()).unwrap();
    let root = profile.function("all").unwrap();
    let config = LayoutConfig::new().with_root_duration(RootDuration::TotalCost);

    let intervals = layout(&profile, start(), root, &config);

    for interval in &intervals {
        if let Some(parent) = interval.parent {
            assert!(
                intervals[parent].contains(interval),
                "{} escapes {}",
                interval.label,
                intervals[parent].label
            );
            assert_eq!(interval.depth, intervals[parent].depth + 1);
        }
    }
}

#[test]
fn test_self_time_is_strictly_positive() {
    let input = "\
events: usec
fn=main
1 1
cfn=exact
calls=1 0
1 10
cfn=short
calls=1 0
1 10
fn=exact
cfn=leaf
calls=1 0
1 10
fn=short
cfn=leaf
calls=1 0
1 4
";
    let profile = parse_str(input).unwrap();
    let root = profile.function("main").unwrap();
    let intervals = layout(&profile, start(), root, &LayoutConfig::default());

    let self_times: Vec<&str> = intervals
        .iter()
        .filter(|i| i.kind == IntervalKind::SelfTime)
        .map(|i| i.label.as_str())
        .collect();
    assert_eq!(self_times, vec!["leaf_body", "leaf_body", "short_body"]);

    for interval in intervals.iter().filter(|i| i.kind == IntervalKind::SelfTime) {
        assert!(interval.duration() > Duration::ZERO);
    }
}

#[test]
fn test_build_scenario_layout() {
    let input = "\
positions: line
events: usec
fn=build
8 100
cfn=one.js
calls=1 0
10 3002300
";
    let profile = parse_str(input).unwrap();
    let root = profile.function("build").unwrap();
    let intervals = layout(&profile, start(), root, &LayoutConfig::default());

    assert_eq!(intervals.len(), 3);
    assert_eq!(intervals[0].duration(), Duration::from_micros(100));
    assert_eq!(intervals[1].label, "one.js");
    assert_eq!(intervals[1].duration(), Duration::from_micros(3_002_300));
    assert_eq!(intervals[1].attributes.invocation_count, 1);
    // the child outlasts the root; the root's span is left as declared
    assert!(!intervals[0].contains(&intervals[1]));
}

#[test]
fn test_recursive_profile_terminates() {
    let input = "\
events: usec
fn=main
cfn=walk
calls=1 0
1 100
fn=walk
1 10
cfn=walk
calls=4 0
1 60
";
    let profile = parse_str(input).unwrap();
    let root = profile.function("main").unwrap();
    let intervals = layout(&profile, start(), root, &LayoutConfig::default());

    let labels: Vec<&str> = intervals.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["main", "walk", "walk", "walk_body"]);
    assert_eq!(intervals[3].duration(), Duration::from_micros(40));
}
