//! Randomised operation sequences against the contact registry.
//!
//! A seeded generator issues thousands of add / move / remove / clear calls
//! with ids drawn from a small pool (so duplicates and unknown ids are common)
//! and checks the registry's bounds and identity rules after each one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use teamtap_core::{ContactId, ContactRegistry, LabelPolicy, Position, RenderLog, TeamError};

fn check(reg: &ContactRegistry, r: &RenderLog) {
    assert!(reg.len() <= reg.capacity(), "size {} > capacity {}", reg.len(), reg.capacity());
    assert_eq!(r.live_count(), reg.len(), "renderer out of step with registry");
    let mut ids = reg.ids();
    let n = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), n, "duplicate id in registry");
}

fn run(policy: LabelPolicy, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut r = RenderLog::new();
    let cap = 2 * rng.gen_range(1..=6);
    let mut reg = ContactRegistry::new(cap, policy);

    for _ in 0..5_000 {
        let id = ContactId::Contact(rng.gen_range(0..16));
        let pos = Position::new(rng.gen_range(0.0..500.0), rng.gen_range(0.0..500.0));
        match rng.gen_range(0..100) {
            0..=44 => {
                let before = reg.len();
                match reg.add(id, pos, &mut r) {
                    Ok(_) => assert_eq!(reg.len(), before + 1),
                    Err(TeamError::CapacityExceeded { capacity }) => {
                        assert_eq!(capacity, cap);
                        assert_eq!(reg.len(), cap);
                    }
                    Err(TeamError::DuplicateId(dup)) => {
                        assert_eq!(dup, id);
                        assert_eq!(reg.len(), before);
                    }
                    Err(e) => panic!("unexpected error {e}"),
                }
            }
            45..=69 => {
                let live = reg.contains(id);
                let res = reg.move_to(id, pos, &mut r);
                assert_eq!(res.is_ok(), live);
            }
            70..=97 => {
                let before = reg.len();
                match reg.remove(id, &mut r) {
                    Ok(rec) => {
                        assert_eq!(rec.id, id);
                        assert_eq!(reg.len(), before - 1);
                    }
                    Err(e) => {
                        assert_eq!(e, TeamError::UnknownId(id));
                        assert_eq!(reg.len(), before, "removing an absent id must be a no-op");
                    }
                }
            }
            _ => reg.clear(&mut r),
        }
        check(&reg, &r);
    }
}

#[test]
fn test_positional_sequences_respect_capacity() {
    for seed in 0..8 {
        run(LabelPolicy::Positional, seed);
    }
}

#[test]
fn test_sequential_sequences_respect_capacity() {
    for seed in 100..108 {
        run(LabelPolicy::Sequential, seed);
    }
}

/// Sequential labels are strictly increasing between clears.
#[test]
fn test_sequential_labels_monotonic() {
    let mut rng = StdRng::seed_from_u64(31);
    let mut r = RenderLog::new();
    let mut reg = ContactRegistry::new(6, LabelPolicy::Sequential);
    let mut last = 0;
    for _ in 0..500 {
        if reg.is_full() || (rng.gen_bool(0.4) && !reg.is_empty()) {
            let ids = reg.ids();
            let victim = ids[rng.gen_range(0..ids.len())];
            reg.remove(victim, &mut r).unwrap();
        } else {
            let label = reg.add_generated(Position::default(), &mut r).unwrap().label;
            assert!(label > last, "label {label} not above {last}");
            last = label;
        }
    }
}
