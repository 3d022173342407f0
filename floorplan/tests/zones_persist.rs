use floorplan::{Building, FaceId, ZoneId, ZoneUpdate};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

fn lcg(seed: &mut u64) -> u64 {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    *seed >> 33
}

/// `n` x `n` block of 4 m rooms.
fn grid_building(n: usize) -> Building {
    let mut b = Building::default();
    for j in 0..n {
        for i in 0..n {
            b.add_rectangle(i as f64 * 4.0, j as f64 * 4.0, 4.0, 4.0).expect("room");
        }
    }
    b
}

fn named_zones(b: &mut Building) -> HashMap<FaceId, ZoneId> {
    let faces: Vec<FaceId> = b.geometry().faces().iter().map(|f| f.id).collect();
    for f in &faces {
        let name = format!("room-{f}");
        b.update_zone(*f, ZoneUpdate { name: Some(name), ..Default::default() });
    }
    b.zones().iter().map(|z| (z.face_id, z.zone_id)).collect()
}

/// Removes random interior walls and checks that every room not touching the removed wall keeps
/// both its zone id and its user-entered name.
fn run_edits(n: usize, steps: usize, seed: u64) {
    let mut b = grid_building(n);
    let mut before = named_zones(&mut b);
    let mut seen: HashSet<ZoneId> = before.values().copied().collect();
    let mut seed = seed;
    let t0 = Instant::now();
    for _ in 0..steps {
        let interior: Vec<u32> = b
            .geometry()
            .edges()
            .filter(|(_, e)| !e.is_exterior)
            .map(|(id, _)| id)
            .collect();
        if interior.is_empty() {
            break;
        }
        let victim = interior[lcg(&mut seed) as usize % interior.len()];
        let touched: HashSet<FaceId> = b.geometry().edge(victim).map(|e| e.face_ids.iter().copied().collect()).unwrap_or_default();
        assert!(b.remove_edge(victim));

        for z in b.zones() {
            match before.get(&z.face_id) {
                Some(old) => {
                    assert_eq!(*old, z.zone_id);
                    assert_eq!(z.name, format!("room-{}", z.face_id));
                }
                None => assert!(seen.insert(z.zone_id), "zone id {} reissued", z.zone_id),
            }
        }
        for f in &touched {
            assert!(b.zone(*f).is_none(), "merged room {f} kept its zone");
        }
        assert!(b.geometry().check_invariants().is_ok());
        before = named_zones(&mut b);
    }
    if std::env::var("FLOORPLAN_PROGRESS").is_ok() {
        eprintln!("{n}x{n} grid, {steps} edits in {:.1} ms", t0.elapsed().as_secs_f64() * 1000.0);
    }
}

#[test]
fn quick_persistence_smoke() {
    run_edits(4, 10, 0x1234_5678_9ABC_DEF0);
}

// Long-running persistence test; enable with: cargo test --features long-persist
#[cfg_attr(not(feature = "long-persist"), ignore)]
#[test]
fn merge_persistence_large_grid() {
    run_edits(12, 200, 0xDEC0_DE12_34AB_CD);
}
