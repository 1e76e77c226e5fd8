use glam::Vec3;

use crate::params::SkyParams;

/// Solar zenith angle cap for the published fits; they misbehave past ~89°,
/// so sub-horizon suns evaluate at the cap and fade through the dusk band.
const THETA_SUN_MAX: f32 = 1.55;

// Physical turbidity range the slider maps onto. The luminance fit's zenith
// normalization (1 + A·e^B) changes sign below T ≈ 1.6, so the floor stays
// clear of it.
const TURBIDITY_MIN: f32 = 2.0;
const TURBIDITY_MAX: f32 = 10.0;

/// Width of the dusk band below the horizon (radians, ~12°).
const TWILIGHT_BAND: f32 = 0.21;

/// Sky color the dome fades onto once the sun is fully below the dusk band.
const NIGHT_SKY: Vec3 = Vec3::new(0.006, 0.009, 0.022);

const SUN_COLOR: Vec3 = Vec3::new(1.0, 0.965, 0.90);
// Sun disc edge: full inside ~0.9°, gone past ~1.3°.
const COS_SUN_INNER: f32 = 0.99988;
const COS_SUN_OUTER: f32 = 0.99974;

/// Smoothstep: 0 at edge0, 1 at edge1.
#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Perez distribution coefficients for one channel.
#[derive(Clone, Copy, Debug)]
struct Perez {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
}

impl Perez {
    /// F(θ, γ) = (1 + A·e^(B/cosθ))(1 + C·e^(Dγ) + E·cos²γ)
    fn value(&self, cos_theta: f32, gamma: f32) -> f32 {
        let cg = gamma.cos();
        (1.0 + self.a * (self.b / cos_theta).exp())
            * (1.0 + self.c * (self.d * gamma).exp() + self.e * cg * cg)
    }

    /// Channel value at the viewing angles relative to its zenith value.
    fn ratio(&self, cos_theta: f32, gamma: f32, theta_sun: f32) -> f32 {
        self.value(cos_theta, gamma) / self.value(1.0, theta_sun)
    }
}

// Perez coefficients are linear in turbidity (Preetham A.2).
fn perez_luminance(t: f32) -> Perez {
    Perez {
        a: 0.1787 * t - 1.4630,
        b: -0.3554 * t + 0.4275,
        c: -0.0227 * t + 5.3251,
        d: 0.1206 * t - 2.5771,
        e: -0.0670 * t + 0.3703,
    }
}

fn perez_chroma_x(t: f32) -> Perez {
    Perez {
        a: -0.0193 * t - 0.2592,
        b: -0.0665 * t + 0.0008,
        c: -0.0004 * t + 0.2125,
        d: -0.0641 * t - 0.8989,
        e: -0.0033 * t + 0.0452,
    }
}

fn perez_chroma_y(t: f32) -> Perez {
    Perez {
        a: -0.0167 * t - 0.2608,
        b: -0.0950 * t + 0.0092,
        c: -0.0079 * t + 0.2102,
        d: -0.0441 * t - 1.6537,
        e: -0.0109 * t + 0.0529,
    }
}

// Zenith chromaticity fits, rows weighted by [T², T, 1] and columns by
// [θs³, θs², θs, 1].
const ZENITH_X: [[f32; 4]; 3] = [
    [0.00166, -0.00375, 0.00209, 0.0],
    [-0.02903, 0.06377, -0.03202, 0.00394],
    [0.11693, -0.21196, 0.06052, 0.25886],
];

const ZENITH_Y: [[f32; 4]; 3] = [
    [0.00275, -0.00610, 0.00317, 0.0],
    [-0.04214, 0.08970, -0.04153, 0.00516],
    [0.15346, -0.26756, 0.06670, 0.26688],
];

fn zenith_chroma(m: &[[f32; 4]; 3], t: f32, theta_sun: f32) -> f32 {
    let tv = [t * t, t, 1.0];
    let sv = [theta_sun.powi(3), theta_sun * theta_sun, theta_sun, 1.0];
    let mut out = 0.0;
    for (row, tt) in m.iter().zip(tv) {
        for (c, ss) in row.iter().zip(sv) {
            out += tt * c * ss;
        }
    }
    out
}

/// CIE xyY → linear sRGB, clamped to non-negative.
fn xyy_to_rgb(x: f32, y: f32, lum: f32) -> Vec3 {
    let xx = x / y * lum;
    let zz = (1.0 - x - y) / y * lum;
    Vec3::new(
        3.2406 * xx - 1.5372 * lum - 0.4986 * zz,
        -0.9689 * xx + 1.8758 * lum + 0.0415 * zz,
        0.0557 * xx - 0.2040 * lum + 1.0570 * zz,
    )
    .max(Vec3::ZERO)
}

/// Preetham analytic daylight model built from one parameter snapshot.
///
/// The normalized sliders map to physical quantities here:
/// - turbidity [0,1] → T ∈ [2,10]
/// - sun_elevation: 0.5 = horizon, 1.0 = zenith, below 0.5 dips into night
/// - upper_atmosphere_scattering: thins the effective atmosphere (T pulled
///   toward the clear floor) and dims the whole dome
/// - ground_albedo: lower-hemisphere ground color plus bounce light in a
///   narrow band above the horizon
#[derive(Clone, Copy, Debug)]
pub struct Model {
    sun_dir: Vec3,
    theta_sun: f32,
    perez_y: Perez,
    perez_x: Perez,
    perez_yc: Perez,
    /// (Yz, xz, yz): zenith luminance and chromaticity.
    zenith: Vec3,
    /// 1 in daylight, 0 past the dusk band.
    daylight: f32,
    radiance_scale: f32,
    ground_albedo: f32,
}

impl Model {
    pub fn new(params: SkyParams) -> Self {
        // The UI sends raw slider values; validation happens here.
        let turbidity = params.turbidity.clamp(0.0, 1.0);
        let elevation = params.sun_elevation.clamp(0.0, 1.0);
        let scattering = params.upper_atmosphere_scattering.clamp(0.0, 1.0);
        let ground_albedo = params.ground_albedo.clamp(0.0, 1.0);

        // 0.5 puts the sun on the horizon, 1.0 at the zenith. Azimuth is
        // fixed toward +Z.
        let sun_angle = (elevation - 0.5) * std::f32::consts::PI;
        let sun_dir = Vec3::new(0.0, sun_angle.sin(), sun_angle.cos());

        // More upper-atmosphere scattering reads as thinner air: pull
        // turbidity toward the clear floor and dim the dome to 40% at full
        // effect.
        let t = TURBIDITY_MIN + turbidity * (TURBIDITY_MAX - TURBIDITY_MIN);
        let t = t + (TURBIDITY_MIN - t) * scattering;
        let radiance_scale = 1.0 - 0.6 * scattering;

        let theta_sun = (std::f32::consts::FRAC_PI_2 - sun_angle).clamp(0.0, THETA_SUN_MAX);

        // Zenith luminance, kcd/m² scale.
        let chi = (4.0 / 9.0 - t / 120.0) * (std::f32::consts::PI - 2.0 * theta_sun);
        let zenith_lum = ((4.0453 * t - 4.9710) * chi.tan() - 0.2155 * t + 2.4192).max(0.0);
        let zenith_x = zenith_chroma(&ZENITH_X, t, theta_sun);
        let zenith_yc = zenith_chroma(&ZENITH_Y, t, theta_sun);

        let daylight = smoothstep(-TWILIGHT_BAND, 0.0, sun_angle);

        Self {
            sun_dir,
            theta_sun,
            perez_y: perez_luminance(t),
            perez_x: perez_chroma_x(t),
            perez_yc: perez_chroma_y(t),
            zenith: Vec3::new(zenith_lum, zenith_x, zenith_yc),
            daylight,
            radiance_scale,
            ground_albedo,
        }
    }

    /// Linear-sRGB radiance arriving from `dir` (need not be normalized).
    pub fn radiance(&self, dir: Vec3) -> Vec3 {
        let dir = dir.normalize();
        let rgb = if dir.y < 0.0 {
            self.ground(dir)
        } else {
            self.sky(dir) + self.sun(dir)
        };
        rgb * self.radiance_scale
    }

    fn sky(&self, dir: Vec3) -> Vec3 {
        // Grazing rays hit the B/cosθ exponent; floor cosθ just off zero.
        let cos_theta = dir.y.max(0.01);
        let gamma = self.sun_dir.dot(dir).clamp(-1.0, 1.0).acos();

        let lum = (self.zenith.x * self.perez_y.ratio(cos_theta, gamma, self.theta_sun)).max(0.0);
        let x = self.zenith.y * self.perez_x.ratio(cos_theta, gamma, self.theta_sun);
        let y = (self.zenith.z * self.perez_yc.ratio(cos_theta, gamma, self.theta_sun)).max(1e-4);

        let mut day = xyy_to_rgb(x, y, lum);

        // Bounce off the ground warms a narrow band above the horizon.
        let bounce = self.zenith.x * 0.06 * self.ground_albedo * (-dir.y * 5.0).exp();
        day += Vec3::new(1.0, 0.96, 0.88) * bounce * self.daylight;

        NIGHT_SKY.lerp(day, self.daylight)
    }

    fn sun(&self, dir: Vec3) -> Vec3 {
        let cos_gamma = self.sun_dir.dot(dir).clamp(-1.0, 1.0);
        let disc = smoothstep(COS_SUN_OUTER, COS_SUN_INNER, cos_gamma);
        let halo = cos_gamma.max(0.0).powi(512) * 0.4 * self.zenith.x;
        SUN_COLOR * (disc * 16.0 + halo) * self.daylight
    }

    fn ground(&self, dir: Vec3) -> Vec3 {
        // Albedo-scaled soil lit by the sky; sampling the dome at a grazing
        // angle toward the same azimuth keeps the horizon line coherent.
        let grazing = Vec3::new(dir.x, 0.02, dir.z).normalize();
        let horizon = self.sky(grazing);
        let depth = (-dir.y).min(1.0);
        let soil = Vec3::new(0.96, 0.92, 0.85);
        horizon * soil * self.ground_albedo * (1.0 - 0.6 * depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(
        turbidity: f32,
        sun_elevation: f32,
        upper_atmosphere_scattering: f32,
        ground_albedo: f32,
    ) -> Model {
        Model::new(SkyParams {
            turbidity,
            sun_elevation,
            upper_atmosphere_scattering,
            ground_albedo,
        })
    }

    #[test]
    fn noon_zenith_is_blue_dominant() {
        let rgb = model(0.3, 1.0, 0.0, 0.2).radiance(Vec3::Y);
        assert!(rgb.z > rgb.x, "zenith at noon should lean blue, got {rgb}");
        assert!(rgb.y > 0.0);
    }

    #[test]
    fn night_is_darker_than_noon() {
        let noon = model(0.5, 1.0, 0.0, 0.5).radiance(Vec3::Y).length();
        let night = model(0.5, 0.0, 0.0, 0.5).radiance(Vec3::Y).length();
        assert!(night < noon * 0.05, "noon {noon}, night {night}");
    }

    #[test]
    fn albedo_brightens_the_ground() {
        let down = Vec3::new(0.3, -0.8, 0.5);
        let dark = model(0.5, 0.8, 0.0, 0.0).radiance(down).length();
        let bright = model(0.5, 0.8, 0.0, 1.0).radiance(down).length();
        assert!(bright > dark);
        assert_eq!(dark, 0.0);
    }

    #[test]
    fn scattering_dims_the_dome() {
        let clear = model(0.75, 0.75, 0.0, 0.5).radiance(Vec3::Y).length();
        let thin = model(0.75, 0.75, 1.0, 0.5).radiance(Vec3::Y).length();
        assert!(thin < clear);
    }

    #[test]
    fn out_of_range_params_clamp() {
        let wild = model(7.0, 3.0, -2.0, 9.0);
        let clamped = model(1.0, 1.0, 0.0, 1.0);
        let dir = Vec3::new(0.2, 0.4, 0.6);
        assert_eq!(wild.radiance(dir), clamped.radiance(dir));
    }

    #[test]
    fn radiance_is_deterministic() {
        let a = model(0.75, 0.5, 0.15, 0.85);
        let b = model(0.75, 0.5, 0.15, 0.85);
        let dir = Vec3::new(-0.4, 0.1, 0.9);
        assert_eq!(a.radiance(dir), b.radiance(dir));
    }

    #[test]
    fn sun_disc_outshines_the_surrounding_sky() {
        let m = model(0.3, 0.8, 0.0, 0.2);
        // Sun azimuth is fixed toward +Z; elevation 0.8 puts it at 54°.
        let sun_angle = 0.3 * std::f32::consts::PI;
        let at_sun = Vec3::new(0.0, sun_angle.sin(), sun_angle.cos());
        let off_sun = Vec3::new(0.4, sun_angle.sin(), -sun_angle.cos());
        assert!(m.radiance(at_sun).length() > m.radiance(off_sun).length() * 2.0);
    }
}
