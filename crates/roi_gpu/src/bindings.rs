//! Shader binding constants.
//!
//! These numbers must match the `@group`/`@binding` attributes in
//! `shaders/frame.wgsl`.

/// Binding constants for the frame blit pipeline.
pub mod frame {
    /// Group 0: the frame texture and its sampler
    pub const TEXTURE_GROUP: u32 = 0;
    /// Binding 0 in group 0: Texture 2D
    pub const TEXTURE_BINDING: u32 = 0;
    /// Binding 1 in group 0: Sampler
    pub const SAMPLER_BINDING: u32 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_bindings_match_shader() {
        let shader = include_str!("shaders/frame.wgsl");
        assert_eq!(frame::TEXTURE_GROUP, 0);
        assert!(shader.contains(&format!(
            "@group({}) @binding({})",
            frame::TEXTURE_GROUP,
            frame::TEXTURE_BINDING
        )));
        assert!(shader.contains(&format!(
            "@group({}) @binding({})",
            frame::TEXTURE_GROUP,
            frame::SAMPLER_BINDING
        )));
    }
}
