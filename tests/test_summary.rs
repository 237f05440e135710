use emberlens::{SummaryMetrics, summarize};

mod common;
use common::det;

#[test]
fn empty_set_is_the_zero_record() {
    assert_eq!(summarize(&[]), SummaryMetrics::zero());
    assert_eq!(
        summarize(&[]),
        SummaryMetrics {
            n: 0,
            mean_conf: 0.0,
            smoke_n: 0,
            smoke_mean_conf: 0.0,
        }
    );
}

#[test]
fn n_matches_sequence_length() {
    let dets = vec![det("fire", 0.9), det("fire", 0.8), det("smoke", 0.7)];
    assert_eq!(summarize(&dets).n, 3);
}

#[test]
fn mean_is_order_independent() {
    // exactly representable scores, so permutations sum identically
    let a = [det("fire", 0.75), det("smoke", 0.25), det("fire", 0.5)];
    let b = [det("fire", 0.5), det("fire", 0.75), det("smoke", 0.25)];
    assert_eq!(summarize(&a), summarize(&b));
    assert!((summarize(&a).mean_conf - 0.5).abs() < 1e-6);
}

#[test]
fn smoke_matching_is_case_insensitive() {
    let upper = summarize(&[det("SMOKE", 0.9)]);
    let mixed = summarize(&[det("Smoke", 0.9)]);
    let lower = summarize(&[det("smoke", 0.9)]);
    assert_eq!(upper.smoke_n, 1);
    assert_eq!(upper.smoke_n, mixed.smoke_n);
    assert_eq!(upper.smoke_n, lower.smoke_n);
    assert_eq!(upper.smoke_mean_conf, lower.smoke_mean_conf);
}

#[test]
fn no_smoke_subset_yields_zero_smoke_mean() {
    let m = summarize(&[det("fire", 0.8), det("fire", 0.6)]);
    assert_eq!(m.n, 2);
    assert!((m.mean_conf - 0.7).abs() < 1e-6);
    assert_eq!(m.smoke_n, 0);
    assert_eq!(m.smoke_mean_conf, 0.0);
}

#[test]
fn mixed_smoke_and_fire() {
    let m = summarize(&[det("Smoke", 0.6), det("fire", 0.4)]);
    assert_eq!(m.n, 2);
    assert!((m.mean_conf - 0.5).abs() < 1e-6);
    assert_eq!(m.smoke_n, 1);
    assert!((m.smoke_mean_conf - 0.6).abs() < 1e-6);
}

#[test]
fn metrics_print_in_field_order() {
    let m = summarize(&[det("fire", 0.8)]);
    assert_eq!(
        m.to_string(),
        "n=1 mean_conf=0.800 smoke_n=0 smoke_mean_conf=0.000"
    );
}
