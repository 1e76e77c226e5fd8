use glam::Vec3;

/// The six cube faces in the order cube-texture APIs expect them:
/// +X, -X, +Y, -Y, +Z, -Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

pub const FACES: [Face; 6] = [
    Face::PosX,
    Face::NegX,
    Face::PosY,
    Face::NegY,
    Face::PosZ,
    Face::NegZ,
];

impl Face {
    /// Short name used in API payloads and output filenames.
    pub fn name(self) -> &'static str {
        match self {
            Face::PosX => "px",
            Face::NegX => "nx",
            Face::PosY => "py",
            Face::NegY => "ny",
            Face::PosZ => "pz",
            Face::NegZ => "nz",
        }
    }

    /// World-space direction through texel (u, v) of a size×size face,
    /// sampled at the texel center. Not normalized. Row 0 is the top of the
    /// image, so v grows downward in world -Y on the side faces.
    pub fn direction(self, u: usize, v: usize, size: usize) -> Vec3 {
        let uc = 2.0 * (u as f32 + 0.5) / size as f32 - 1.0;
        let vc = 2.0 * (v as f32 + 0.5) / size as f32 - 1.0;
        match self {
            Face::PosX => Vec3::new(1.0, -vc, -uc),
            Face::NegX => Vec3::new(-1.0, -vc, uc),
            Face::PosY => Vec3::new(uc, 1.0, vc),
            Face::NegY => Vec3::new(uc, -1.0, -vc),
            Face::PosZ => Vec3::new(uc, -vc, 1.0),
            Face::NegZ => Vec3::new(-uc, -vc, -1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_centers_point_along_their_axis() {
        // Odd size puts the middle texel exactly on the axis.
        let axes = [
            Vec3::X,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::Z,
            Vec3::NEG_Z,
        ];
        for (face, axis) in FACES.iter().zip(axes) {
            assert_eq!(face.direction(1, 1, 3), axis, "{}", face.name());
        }
    }

    #[test]
    fn top_rows_of_side_faces_look_up() {
        for face in [Face::PosX, Face::NegX, Face::PosZ, Face::NegZ] {
            let top = face.direction(8, 0, 16);
            let bottom = face.direction(8, 15, 16);
            assert!(top.y > 0.0, "{} top row", face.name());
            assert!(bottom.y < 0.0, "{} bottom row", face.name());
        }
    }

    #[test]
    fn pos_z_scans_left_to_right_toward_pos_x() {
        let left = Face::PosZ.direction(0, 8, 16);
        let right = Face::PosZ.direction(15, 8, 16);
        assert!(left.x < 0.0 && right.x > 0.0);
    }

    #[test]
    fn face_names_follow_cube_texture_order() {
        let names: Vec<&str> = FACES.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["px", "nx", "py", "ny", "pz", "nz"]);
    }
}
