//! Integration tests for the inkset crates.
//!
//! The library half holds the fixtures shared by the unit tests below, the
//! golden hash checks and the `tests/` suites: deterministic separation
//! textures, a demo catalog and a straight scalar rendition of the
//! reference overprint loop.

use inkset_core::{BitDepth, ColorantCatalog, RasterGeometry, Sample, SeparationBufferSet};

#[cfg(test)]
mod golden;

/// CMYK with three spot inks: Orange, Green and Violet.
pub fn demo_catalog() -> ColorantCatalog {
    let mut catalog = ColorantCatalog::cmyk();
    for (name, rep) in [
        ("Orange", [0.0, 0.5, 1.0, 0.0]),
        ("Green", [0.9, 0.0, 1.0, 0.1]),
        ("Violet", [0.6, 0.9, 0.0, 0.0]),
    ] {
        catalog.add_spot(name, rep.to_vec()).expect("demo spot");
    }
    catalog
}

/// Separation set whose plane `p` holds `texture(x, y, p)` at every pixel.
///
/// Values are masked to the depth's range.
pub fn textured_set<T, F>(
    catalog: &ColorantCatalog,
    width: u32,
    height: u32,
    depth: BitDepth,
    texture: F,
) -> SeparationBufferSet<T>
where
    T: Sample,
    F: Fn(u32, u32, usize) -> u32,
{
    let geometry = RasterGeometry::new(width, height, 72.0).expect("fixture geometry");
    let mut set = SeparationBufferSet::allocate(catalog, &geometry, depth).expect("fixture allocation");
    for p in 0..set.len() {
        let plane = set.get_mut(p).expect("plane in range");
        for y in 0..height {
            for x in 0..width {
                let v = texture(x, y, p) & depth.max_value();
                plane.set_sample(x, y, T::from_u32(v));
            }
        }
    }
    set
}

/// Texture used by the golden hashes.
///
/// 8-bit planes get a short-period pattern; wider depths spread over the
/// whole range.
pub fn golden_texture(depth: BitDepth) -> impl Fn(u32, u32, usize) -> u32 {
    move |x, y, p| {
        let p = p as u32;
        if depth == BitDepth::U8 {
            (x * 7 + y * 13 + p * 31 + (x * y) % 17) % 256
        } else {
            (x * 2311 + y * 977 + p * 4099 + (x * y * 31) % 257) % (depth.max_value() + 1)
        }
    }
}

/// Scalar per-pass overprint loop, one pixel at a time.
///
/// Rounds after every spot, the way proofing pipelines have always done
/// it. Returns the merged samples interleaved in process order.
pub fn reference_merge<T: Sample>(catalog: &ColorantCatalog, set: &SeparationBufferSet<T>) -> Vec<u32> {
    let n = catalog.num_process();
    let max = set.depth().max_value();
    let scale = max as f32;
    let inv = 1.0 / scale;
    let to_sample = |v: f32| (v * scale + 0.5).floor().clamp(0.0, scale) as u32;

    let mut out = Vec::with_capacity(set.width() as usize * set.height() as usize * n);
    for y in 0..set.height() {
        for x in 0..set.width() {
            let mut pixel: Vec<u32> = (0..n).map(|c| set.buffers()[c].sample(x, y).to_u32()).collect();
            for (i, spot) in catalog.spots().iter().enumerate() {
                let coverage = set.buffers()[n + i].sample(x, y).to_u32() as f32 * inv;
                for (c, s) in pixel.iter_mut().enumerate() {
                    let dst = *s as f32 * inv;
                    let src = spot.representation()[c] * coverage;
                    *s = to_sample(1.0 - (1.0 - src) * (1.0 - dst));
                }
            }
            out.extend(pixel);
        }
    }
    out
}

/// Installs a test-friendly `tracing` subscriber, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
