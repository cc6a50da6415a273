use {
    flexring::{Crc32Hasher, HashFunction, HashRing, Md5Hasher, RapidHasher},
    std::collections::HashMap,
};

const TARGETS: usize = 10;
const LOOKUPS: usize = 1000;

fn ring_with<H: HashFunction>(hasher: H) -> HashRing<H> {
    let mut ring = HashRing::with_hasher(hasher);
    ring.add_nodes((1..=TARGETS).map(|i| format!("target{i}")))
        .unwrap();
    ring
}

fn owners<H: HashFunction>(ring: &HashRing<H>) -> Vec<String> {
    (1..=LOOKUPS)
        .map(|i| ring.lookup(format!("t{i}")).unwrap().to_owned())
        .collect()
}

fn changed(before: &[String], after: &[String]) -> f64 {
    let moved = before.iter().zip(after).filter(|(b, a)| b != a).count();
    moved as f64 / before.len() as f64
}

/// Naive `hash % n` placement, for comparison.
fn modulo_owners(targets: usize) -> Vec<u64> {
    (1..=LOOKUPS)
        .map(|i| Crc32Hasher.hash(format!("t{i}").as_bytes()) % targets as u64)
        .collect()
}

fn check_adding_node<H: HashFunction>(hasher: H) {
    let mut ring = ring_with(hasher);
    let before = owners(&ring);

    ring.add_node("target-new").unwrap();
    let after = owners(&ring);

    // Every resource that moved, moved to the new node.
    for (b, a) in before.iter().zip(&after) {
        if b != a {
            assert_eq!(a, "target-new", "resource moved from {b} to {a}");
        }
    }

    let ratio = changed(&before, &after);
    assert!(
        ratio > 0.0 && ratio < 0.35,
        "unexpected share of resources moved after adding a node: {ratio:.2}"
    );
}

fn check_removing_node<H: HashFunction>(hasher: H) {
    let mut ring = ring_with(hasher);
    let before = owners(&ring);

    ring.remove_node("target1").unwrap();
    let after = owners(&ring);

    // Only resources of the removed node have moved.
    for (i, (b, a)) in before.iter().zip(&after).enumerate() {
        if b != "target1" {
            assert_eq!(b, a, "resource t{} was on {b}, but moved to {a}", i + 1);
        }
    }

    let ratio = changed(&before, &after);
    assert!(
        ratio > 0.0 && ratio < 0.35,
        "unexpected share of resources moved after removing a node: {ratio:.2}"
    );
}

#[test]
fn adding_node_moves_few_resources() {
    check_adding_node(Crc32Hasher);
    check_adding_node(Md5Hasher);
    check_adding_node(RapidHasher);
}

#[test]
fn removing_node_moves_few_resources() {
    check_removing_node(Crc32Hasher);
    check_removing_node(Md5Hasher);
    check_removing_node(RapidHasher);
}

#[test]
fn modulo_hashing_moves_most_resources() {
    let base = modulo_owners(TARGETS);

    let moved = |other: Vec<u64>| {
        base.iter().zip(&other).filter(|(b, a)| b != a).count() as f64 / LOOKUPS as f64
    };

    // Baseline the ring is measured against: most keys move either way.
    assert!(moved(modulo_owners(TARGETS + 1)) > 0.5);
    assert!(moved(modulo_owners(TARGETS - 1)) > 0.5);
}

#[test]
fn weighted_nodes_get_proportional_share() {
    let mut ring = HashRing::with_replicas(RapidHasher, 128).unwrap();
    ring.add_node("light")
        .unwrap()
        .add_node_with_weight("heavy", 2.0)
        .unwrap();

    let mut counts = HashMap::<&str, usize>::new();
    for i in 0..10_000 {
        *counts.entry(ring.lookup(format!("key{i}")).unwrap()).or_default() += 1;
    }

    let light = counts["light"] as f64;
    let heavy = counts["heavy"] as f64;
    let ratio = heavy / light;
    assert!(
        (1.3..=3.0).contains(&ratio),
        "weighted distribution off: light={light}, heavy={heavy} (ratio {ratio:.2})"
    );
}

#[test]
fn every_node_receives_resources() {
    let ring = ring_with(RapidHasher);

    let mut counts = HashMap::<&str, usize>::new();
    for i in 0..10_000 {
        *counts.entry(ring.lookup(format!("key{i}")).unwrap()).or_default() += 1;
    }

    assert_eq!(counts.len(), TARGETS);
    let min = *counts.values().min().unwrap();
    let max = *counts.values().max().unwrap();
    assert!(max < 4 * min, "distribution too skewed: min={min}, max={max}");
}
