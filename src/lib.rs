pub mod cubemap;
pub mod params;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod sky;

use std::time::Instant;

use cubemap::FACES;
use params::SkyParams;
use sky::Model;

/// Face edge length of the generated cube texture, texels.
pub const DEFAULT_FACE_SIZE: usize = 160;

pub struct SkyCube {
    pub size: usize,
    /// RGBA8 faces in +X, -X, +Y, -Y, +Z, -Z order.
    pub faces: [Vec<u8>; 6],
    /// The parameter snapshot this cube was generated from.
    pub params: SkyParams,
}

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Generate the full sky cube for one parameter snapshot. Pure and
/// deterministic: the same snapshot and size always produce the same bytes.
pub fn generate(params: SkyParams, size: usize) -> (SkyCube, Vec<Timing>) {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    // 1. Fold the normalized sliders into model coefficients
    let t = Instant::now();
    let model = Model::new(params);
    timings.push(Timing {
        name: "sky_model",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 2. Rasterize the six faces
    let mut faces: [Vec<u8>; 6] = Default::default();
    for (i, face) in FACES.iter().enumerate() {
        let t = Instant::now();
        faces[i] = render::render_face(&model, *face, size);
        timings.push(Timing {
            name: face.name(),
            ms: t.elapsed().as_secs_f64() * 1000.0,
        });
    }

    let total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
    timings.push(Timing {
        name: "TOTAL",
        ms: total_ms,
    });

    let cube = SkyCube {
        size,
        faces,
        params,
    };

    (cube, timings)
}
