use rayon::prelude::*;

use glam::Vec3;

use crate::cubemap::Face;
use crate::sky::Model;

// Exposure for the exponential tone map; picked so a default daytime sky
// lands in the upper half of the 8-bit range without clipping the dome.
const EXPOSURE: f32 = 0.10;
const INV_GAMMA: f32 = 1.0 / 2.2;

/// Map linear radiance to an RGBA8 texel: exponential exposure, then gamma.
#[inline]
fn tonemap(rgb: Vec3) -> [u8; 4] {
    let mapped = Vec3::ONE - (-rgb * EXPOSURE).exp();
    let gamma = mapped.powf(INV_GAMMA);
    [
        (gamma.x * 255.0).round() as u8,
        (gamma.y * 255.0).round() as u8,
        (gamma.z * 255.0).round() as u8,
        255,
    ]
}

/// Render one cube face to RGBA8, rows in parallel.
pub fn render_face(model: &Model, face: Face, size: usize) -> Vec<u8> {
    let mut rgba = vec![0u8; size * size * 4];

    rgba.par_chunks_mut(size * 4).enumerate().for_each(|(v, row)| {
        for u in 0..size {
            let dir = face.direction(u, v, size);
            let color = tonemap(model.radiance(dir));
            row[u * 4..u * 4 + 4].copy_from_slice(&color);
        }
    });

    rgba
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SkyParams;

    #[test]
    fn face_buffer_is_fully_opaque_rgba() {
        let model = Model::new(SkyParams::default());
        let rgba = render_face(&model, Face::PosZ, 8);
        assert_eq!(rgba.len(), 8 * 8 * 4);
        assert!(rgba.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn up_face_is_brighter_than_down_face_in_daylight() {
        let model = Model::new(SkyParams {
            sun_elevation: 1.0,
            ground_albedo: 0.1,
            ..SkyParams::default()
        });
        let lum = |rgba: &[u8]| -> u64 { rgba.iter().map(|&b| b as u64).sum() };
        let up = render_face(&model, Face::PosY, 8);
        let down = render_face(&model, Face::NegY, 8);
        assert!(lum(&up) > lum(&down));
    }

    #[test]
    fn rendering_is_deterministic() {
        let params = SkyParams::default();
        let a = render_face(&Model::new(params), Face::NegX, 16);
        let b = render_face(&Model::new(params), Face::NegX, 16);
        assert_eq!(a, b);
    }
}
