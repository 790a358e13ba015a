//! WGSL sources embedded at compile time, looked up by name.

use std::borrow::Cow;

use crate::error::{SetupError, SetupResult};
use crate::gpu::ResourceAllocator;

const SOURCES: &[(&str, &str)] = &[
    ("n_body", include_str!("n_body.wgsl")),
    ("n_body_render", include_str!("n_body_render.wgsl")),
    ("gerstner_waves", include_str!("gerstner_waves.wgsl")),
    ("image_filter", include_str!("image_filter.wgsl")),
    ("textured_quad", include_str!("textured_quad.wgsl")),
    ("overlay", include_str!("overlay.wgsl")),
];

/// Returns the WGSL source registered under `name`.
pub fn source(name: &str) -> SetupResult<&'static str> {
    SOURCES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, source)| *source)
        .ok_or_else(|| SetupError::Config(format!("unknown shader '{name}'")))
}

/// Prepends `const NAME: u32 = value;` for each define so sizes chosen on the
/// host, such as the workgroup size, reach the shader.
pub fn with_defines(source: &str, defines: &[(&str, u32)]) -> String {
    let mut out = String::with_capacity(source.len() + defines.len() * 32);
    for (name, value) in defines {
        out.push_str(&format!("const {name}: u32 = {value}u;\n"));
    }
    out.push_str(source);
    out
}

/// Compiles the named shader into a module.
pub fn load(
    allocator: &ResourceAllocator<'_>,
    name: &str,
    defines: &[(&str, u32)],
) -> SetupResult<wgpu::ShaderModule> {
    let source = source(name)?;
    let code: Cow<'static, str> = if defines.is_empty() {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(with_defines(source, defines))
    };
    allocator.shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(name),
        source: wgpu::ShaderSource::Wgsl(code),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shader_is_registered() {
        for name in [
            "n_body",
            "n_body_render",
            "gerstner_waves",
            "image_filter",
            "textured_quad",
            "overlay",
        ] {
            assert!(!source(name).unwrap().is_empty());
        }
    }

    #[test]
    fn unknown_shader_is_a_config_error() {
        assert!(matches!(source("missing"), Err(SetupError::Config(_))));
    }

    #[test]
    fn defines_are_prepended() {
        let code = with_defines("fn main() {}", &[("WORKGROUP_SIZE", 64)]);
        assert!(code.starts_with("const WORKGROUP_SIZE: u32 = 64u;\n"));
        assert!(code.ends_with("fn main() {}"));
    }

    #[test]
    fn n_body_shader_expects_workgroup_define() {
        let code = source("n_body").unwrap();
        assert!(code.contains("@workgroup_size(WORKGROUP_SIZE)"));
        assert!(!code.contains("const WORKGROUP_SIZE"));
    }
}
