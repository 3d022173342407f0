use floorplan::{Building, Viewport};
use std::time::Instant;

fn build_grid(rooms: usize) -> Building {
    let mut b = Building::default();
    let side = (rooms as f64).sqrt().ceil() as usize;
    let mut made = 0usize;
    'outer: for j in 0..side {
        for i in 0..side {
            let _ = b.add_rectangle(i as f64 * 4.0, j as f64 * 3.0, 4.0, 3.0);
            made += 1;
            if made >= rooms {
                break 'outer;
            }
        }
    }
    b
}

/// Nearest-rank summary of per-pick latencies (ms).
struct Latency {
    samples: Vec<f64>,
}

impl Latency {
    fn new(mut samples: Vec<f64>) -> Self {
        samples.sort_by(f64::total_cmp);
        Latency { samples }
    }

    /// Smallest sample with at least `q` of all samples at or below it.
    fn quantile(&self, q: f64) -> f64 {
        let n = self.samples.len();
        let rank = (q * n as f64).ceil().max(1.0) as usize;
        self.samples.get(rank.min(n).wrapping_sub(1)).copied().unwrap_or(0.0)
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut rooms = 100usize;
    let mut picks = 10000usize;
    let mut zoom = 50.0f64;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val) = a.strip_prefix("--rooms=") { if let Ok(v) = val.parse() { rooms = v; } }
        else if let Some(val) = a.strip_prefix("--picks=") { if let Ok(v) = val.parse() { picks = v; } }
        else if let Some(val) = a.strip_prefix("--zoom=") { if let Ok(v) = val.parse() { zoom = v; } }
        else if let Some(val) = a.strip_prefix("--assert-ms=") { if let Ok(v) = val.parse() { assert_ms = Some(v); } }
    }

    let b = build_grid(rooms);
    let mut vp = Viewport::new(1280.0, 800.0);
    vp.zoom = zoom;

    let mut times_ms: Vec<f64> = Vec::with_capacity(picks);
    let start_all = Instant::now();
    let mut hits = 0usize;
    for k in 0..picks {
        let x = (k % 97) as f64 * 0.41 + 0.05;
        let y = ((k / 97) % 89) as f64 * 0.37 + 0.03;
        let t0 = Instant::now();
        if b.hit_test(x, y, &vp).is_some() { hits += 1; }
        let _ = b.constrain_orthogonal(0.0, 0.0, x, y);
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;
    let lat = Latency::new(times_ms);
    let (med, p90, p99) = (lat.quantile(0.5), lat.quantile(0.9), lat.quantile(0.99));
    println!(
        "rooms={} edges={} picks={} zoom={} hits={} total_ms={:.3} median_ms={:.4} p90_ms={:.4} p99_ms={:.4}",
        rooms, b.geometry().edge_count(), picks, zoom, hits, dur_all, med, p90, p99
    );
    if let Some(th) = assert_ms {
        if med > th {
            eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th);
            std::process::exit(1);
        }
    }
}
