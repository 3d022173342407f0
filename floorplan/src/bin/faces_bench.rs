#[cfg(feature = "bench_faces")]
use floorplan::Geometry;
#[cfg(feature = "bench_faces")]
use std::time::Instant;

#[cfg(not(feature = "bench_faces"))]
fn main() {
    eprintln!("faces_bench requires --features bench_faces");
    std::process::exit(2);
}

#[cfg(feature = "bench_faces")]
fn build_grid(w: usize, h: usize) -> Geometry {
    let mut g = Geometry::new();
    for j in 0..=h {
        for i in 0..w {
            let (x, y) = (i as f64 * 4.0, j as f64 * 3.0);
            g.add_wall(x, y, x + 4.0, y, 3.0, 0.2, 0.01);
        }
    }
    for i in 0..=w {
        for j in 0..h {
            let (x, y) = (i as f64 * 4.0, j as f64 * 3.0);
            g.add_wall(x, y, x, y + 3.0, 3.0, 0.2, 0.01);
        }
    }
    g
}

#[cfg(feature = "bench_faces")]
fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut w = 20usize;
    let mut h = 20usize;
    let mut repeats = 20usize;
    for a in &args[1..] {
        if let Some(val) = a.strip_prefix("--w=") {
            if let Ok(v) = val.parse() {
                w = v;
            }
        } else if let Some(val) = a.strip_prefix("--h=") {
            if let Ok(v) = val.parse() {
                h = v;
            }
        } else if let Some(val) = a.strip_prefix("--repeats=") {
            if let Ok(v) = val.parse() {
                repeats = v;
            }
        }
    }

    let mut g = build_grid(w, h);
    let t0 = Instant::now();
    let faces = g.rebuild_faces();
    let first_ms = t0.elapsed().as_secs_f64() * 1000.0;

    // Typical edit cycle: drop one interior wall, rebuild, put it back, rebuild.
    let mut cycle_times: Vec<f64> = Vec::with_capacity(repeats);
    let (cx, cy) = ((w / 2) as f64 * 4.0, (h / 2) as f64 * 3.0);
    for _ in 0..repeats {
        let t = Instant::now();
        if let Some(hit) = g.find_nearest_edge(cx + 2.0, cy, 0.1) {
            g.remove_edge(hit.id);
            g.rebuild_faces();
        }
        g.add_wall(cx, cy, cx + 4.0, cy, 3.0, 0.2, 0.01);
        g.rebuild_faces();
        cycle_times.push(t.elapsed().as_secs_f64() * 1000.0);
    }
    let avg_cycle = if cycle_times.is_empty() {
        0.0
    } else {
        cycle_times.iter().sum::<f64>() / (cycle_times.len() as f64)
    };

    println!(
        "grid={}x{} edges={} faces={} first_rebuild_ms={:.3} avg_edit_cycle_ms={:.3}",
        w,
        h,
        g.edge_count(),
        faces,
        first_ms,
        avg_cycle
    );
}
