use std::f32::consts::TAU;

use bevy::prelude::{Vec2, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::TerrainError;

/// How vertex heights are disturbed after the flat grid is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Perturbation {
    /// Heights stay at zero.
    None,
    /// Every vertex independently moves up or down by `step` on each iteration.
    RandomWalk { iterations: usize, step: f32 },
    /// Each iteration splits the grid with a random line; one side rises by
    /// `step` and the other sinks by `step`.
    FaultPlane { iterations: usize, step: f32 },
}

impl Default for Perturbation {
    fn default() -> Self {
        Self::RandomWalk {
            iterations: 100,
            step: 5e-3,
        }
    }
}

impl Perturbation {
    fn step(&self) -> Option<f32> {
        match *self {
            Self::None => None,
            Self::RandomWalk { step, .. } | Self::FaultPlane { step, .. } => Some(step),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TerrainSettings {
    /// Number of cells along each axis; the grid has `(div + 1)^2` vertices.
    pub div: usize,
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub seed: u64,
    pub perturbation: Perturbation,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            div: 64,
            min_x: -1.,
            max_x: 1.,
            min_y: -1.,
            max_y: 1.,
            seed: 0,
            perturbation: Perturbation::default(),
        }
    }
}

impl TerrainSettings {
    pub fn new(div: usize, min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            div,
            min_x,
            max_x,
            min_y,
            max_y,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_perturbation(mut self, perturbation: Perturbation) -> Self {
        self.perturbation = perturbation;
        self
    }

    pub fn flat(self) -> Self {
        self.with_perturbation(Perturbation::None)
    }

    /// Checks the grid parameters before anything is allocated.
    ///
    /// The vertex limit only guarantees that indices fit in `u32`. Near that
    /// limit the buffers need tens of gigabytes, so in practice `div` should
    /// stay in the low thousands.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.div < 1 {
            return Err(TerrainError::InvalidDivisions(self.div));
        }

        let extents = [self.min_x, self.max_x, self.min_y, self.max_y];
        if extents.iter().any(|v| !v.is_finite())
            || self.max_x <= self.min_x
            || self.max_y <= self.min_y
        {
            return Err(TerrainError::DegenerateExtents {
                min_x: self.min_x,
                max_x: self.max_x,
                min_y: self.min_y,
                max_y: self.max_y,
            });
        }

        match self.num_vertices() {
            Some(n) if n as u64 <= u32::MAX as u64 + 1 => {}
            Some(n) => return Err(TerrainError::TooManyVertices(n)),
            None => return Err(TerrainError::TooManyVertices(usize::MAX)),
        }

        if let Some(step) = self.perturbation.step() {
            if !step.is_finite() {
                return Err(TerrainError::InvalidStep(step));
            }
        }

        Ok(())
    }

    /// Vertex count of the grid, or `None` if it overflows `usize`.
    pub fn num_vertices(&self) -> Option<usize> {
        let side = self.div.checked_add(1)?;
        side.checked_mul(side)
    }

    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(
            (self.max_x - self.min_x) / self.div as f32,
            (self.max_y - self.min_y) / self.div as f32,
        )
    }
}

/// Applies the configured perturbation to the z coordinate of every vertex.
///
/// Usable on its own over any vertex slice, so the settings are validated
/// here too; the fault line is drawn from the extents.
pub fn perturb_heights(vertices: &mut [Vec3], settings: &TerrainSettings) -> Result<(), TerrainError> {
    settings.validate()?;
    let mut rng = StdRng::seed_from_u64(settings.seed);

    match settings.perturbation {
        Perturbation::None => {}
        Perturbation::RandomWalk { iterations, step } => {
            random_walk(vertices, iterations, step, &mut rng)
        }
        Perturbation::FaultPlane { iterations, step } => {
            fault_plane(vertices, settings, iterations, step, &mut rng)
        }
    }

    Ok(())
}

fn random_walk(vertices: &mut [Vec3], iterations: usize, step: f32, rng: &mut impl Rng) {
    for _ in 0..iterations {
        for v in vertices.iter_mut() {
            if rng.gen_bool(0.5) {
                v.z += step;
            } else {
                v.z -= step;
            }
        }
    }
}

fn fault_plane(
    vertices: &mut [Vec3],
    settings: &TerrainSettings,
    iterations: usize,
    step: f32,
    rng: &mut impl Rng,
) {
    for _ in 0..iterations {
        let p = Vec2::new(
            rng.gen_range(settings.min_x..settings.max_x),
            rng.gen_range(settings.min_y..settings.max_y),
        );
        let angle = rng.gen_range(0.0..TAU);
        let n = Vec2::new(angle.cos(), angle.sin());

        fault_step(vertices, p, n, step);
    }
}

/// Raises the vertices in front of the line through `p` with normal `n`, sinks the rest.
fn fault_step(vertices: &mut [Vec3], p: Vec2, n: Vec2, step: f32) {
    for v in vertices.iter_mut() {
        if (v.truncate() - p).dot(n) > 0. {
            v.z += step;
        } else {
            v.z -= step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_vertices(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32 * 0.1, 0., 0.)).collect()
    }

    #[test]
    fn rejects_zero_divisions() {
        let settings = TerrainSettings::new(0, -1., 1., -1., 1.);
        assert_eq!(settings.validate(), Err(TerrainError::InvalidDivisions(0)));
    }

    #[test]
    fn rejects_degenerate_extents() {
        let settings = TerrainSettings::new(4, 1., 1., -1., 1.);
        assert!(matches!(
            settings.validate(),
            Err(TerrainError::DegenerateExtents { .. })
        ));

        let settings = TerrainSettings::new(4, -1., 1., 2., f32::NAN);
        assert!(matches!(
            settings.validate(),
            Err(TerrainError::DegenerateExtents { .. })
        ));
    }

    #[test]
    fn rejects_grids_past_u32_indices() {
        let settings = TerrainSettings::new(70_000, -1., 1., -1., 1.);
        assert!(matches!(
            settings.validate(),
            Err(TerrainError::TooManyVertices(_))
        ));
    }

    #[test]
    fn rejects_non_finite_step() {
        let settings = TerrainSettings::default().with_perturbation(Perturbation::FaultPlane {
            iterations: 10,
            step: f32::INFINITY,
        });
        assert!(matches!(
            settings.validate(),
            Err(TerrainError::InvalidStep(_))
        ));
    }

    #[test]
    fn no_perturbation_keeps_heights_at_zero() {
        let mut vertices = flat_vertices(16);
        perturb_heights(&mut vertices, &TerrainSettings::default().flat()).unwrap();
        assert!(vertices.iter().all(|v| v.z == 0.));
    }

    #[test]
    fn random_walk_stays_within_step_budget() {
        let settings = TerrainSettings::default().with_seed(7);
        let mut vertices = flat_vertices(25);
        perturb_heights(&mut vertices, &settings).unwrap();

        assert!(vertices.iter().all(|v| (-0.5..=0.5).contains(&v.z)));
        assert!(vertices.iter().any(|v| v.z != 0.));
    }

    #[test]
    fn fault_step_splits_along_the_line() {
        let mut vertices: Vec<Vec3> = (0..5)
            .flat_map(|row| (0..5).map(move |col| Vec3::new(col as f32, row as f32, 0.)))
            .collect();
        let original = vertices.clone();
        let p = Vec2::new(1.5, 2.5);
        let n = Vec2::new(1., -1.).normalize();

        fault_step(&mut vertices, p, n, 0.25);

        for (v, b) in vertices.iter().zip(&original) {
            let in_front = (b.truncate() - p).dot(n) > 0.;
            assert_eq!(v.z > 0., in_front, "{b:?}");
            assert_eq!(v.z.abs(), 0.25);
        }
    }

    #[test]
    fn fault_plane_raises_one_side_of_a_row() {
        for seed in 0..20 {
            let settings = TerrainSettings::default()
                .with_seed(seed)
                .with_perturbation(Perturbation::FaultPlane {
                    iterations: 1,
                    step: 0.25,
                });
            let mut vertices = flat_vertices(9);
            perturb_heights(&mut vertices, &settings).unwrap();

            assert!(vertices.iter().all(|v| v.z == 0.25 || v.z == -0.25));

            // Collinear vertices change side at most once
            let flips = vertices
                .windows(2)
                .filter(|pair| pair[0].z != pair[1].z)
                .count();
            assert!(flips <= 1, "seed {seed}: {vertices:?}");
        }
    }

    #[test]
    fn perturbing_alone_rejects_bad_settings() {
        let mut vertices = flat_vertices(4);
        let settings = TerrainSettings::new(4, 1., -1., -1., 1.);

        assert!(matches!(
            perturb_heights(&mut vertices, &settings),
            Err(TerrainError::DegenerateExtents { .. })
        ));
        assert!(vertices.iter().all(|v| v.z == 0.));
    }

    #[test]
    fn same_seed_same_heights() {
        let settings = TerrainSettings::default().with_seed(42);
        let mut a = flat_vertices(25);
        let mut b = flat_vertices(25);
        perturb_heights(&mut a, &settings).unwrap();
        perturb_heights(&mut b, &settings).unwrap();
        assert_eq!(a, b);
    }
}
