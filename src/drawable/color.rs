//! Baked vertex colours

/// sRGB palette used for baked per-vertex colours.
pub mod srgb {
    pub const BLACK: [f32; 3] = [0.0, 0.0, 0.0];
    pub const RED: [f32; 3] = [1.0, 0.0, 0.0];
    pub const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
    pub const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
    pub const YELLOW: [f32; 3] = [1.0, 0.96863, 0.0];
    pub const CYAN: [f32; 3] = [0.0, 1.0, 1.0];
    pub const MAGENTA: [f32; 3] = [1.0, 0.0, 0.56471];
    pub const PURPLE: [f32; 3] = [0.43529, 0.05098, 0.54118];
    pub const BROWN: [f32; 3] = [0.54118, 0.20392, 0.04706];
    pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
}
