use std::path::PathBuf;

use skycube::cubemap::FACES;
use skycube::params::SkyParams;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let size: usize = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(skycube::DEFAULT_FACE_SIZE);

    let defaults = SkyParams::default();
    let turbidity = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(defaults.turbidity);
    let sun_elevation = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(defaults.sun_elevation);
    let upper_atmosphere_scattering = args
        .get(4)
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.upper_atmosphere_scattering);
    let ground_albedo = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(defaults.ground_albedo);
    let out_dir: PathBuf = args
        .get(6)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));

    std::fs::create_dir_all(&out_dir).expect("failed to create output directory");

    let params = SkyParams {
        turbidity,
        sun_elevation,
        upper_atmosphere_scattering,
        ground_albedo,
    };

    eprintln!(
        "Generating {}x{} sky cube: turbidity={}, sun={}, scattering={}, albedo={}",
        size,
        size,
        params.turbidity,
        params.sun_elevation,
        params.upper_atmosphere_scattering,
        params.ground_albedo
    );

    let (cube, timings) = skycube::generate(params, size);

    // Print timings
    eprintln!("\nTimings:");
    for t in &timings {
        eprintln!("  {:20} {:8.1} ms", t.name, t.ms);
    }

    // Save one PNG per cube face
    for (face, rgba) in FACES.iter().zip(&cube.faces) {
        let path = out_dir.join(format!("{}.png", face.name()));
        image::save_buffer(&path, rgba, size as u32, size as u32, image::ColorType::Rgba8)
            .expect("failed to save image");
        eprintln!("Saved {}", path.display());
    }

    eprintln!("\nDone.");
}
