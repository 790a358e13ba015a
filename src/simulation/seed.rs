use rand::Rng;

use crate::simulation::types::BodyVec4;

/// Places `count` points uniformly on the surface of a sphere of `radius`.
///
/// Longitude is uniform in [0, 2π) and latitude is `acos(2u - 1)`; sampling
/// latitude directly would cluster points at the poles.
pub fn sphere_surface<R: Rng>(count: u32, radius: f32, rng: &mut R) -> Vec<BodyVec4> {
    (0..count)
        .map(|_| {
            let longitude = std::f32::consts::TAU * rng.gen_range(0.0f32..1.0);
            let latitude = (2.0 * rng.gen_range(0.0f32..1.0) - 1.0).acos();
            BodyVec4([
                radius * latitude.sin() * longitude.cos(),
                radius * latitude.sin() * longitude.sin(),
                radius * latitude.cos(),
                1.0,
            ])
        })
        .collect()
}
