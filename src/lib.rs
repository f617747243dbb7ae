//! partsim — a 2D population of circular particles in a bounded world.
//!
//! The engine advances particles with explicit Euler integration under
//! per-component velocity clamping, applies a selectable boundary policy
//! (reflect off the edges or wrap across them), and resolves pairwise
//! collisions with an equal-mass elastic exchange. Collision detection is
//! deliberately all-pairs; the intended scale is small populations driven
//! once per display tick.
//!
//! A driver holds one [`ParticleSet`], calls
//! [`advance_all`](core::ParticleSet::advance_all) once per tick, then
//! [`resolve_all_collisions`](core::ParticleSet::resolve_all_collisions),
//! and reads particles back for display.
//!
//! The `python` feature adds a pyo3/numpy binding layer exposing the same
//! surface to Python drivers.

pub mod core;
pub mod error;

pub use crate::core::{BoundaryMode, Particle, ParticleSet, Vec2};
pub use crate::error::{Error, Result};

#[cfg(feature = "python")]
mod bindings {
    use numpy::ndarray::Array2;
    use numpy::{IntoPyArray, PyArray1, PyArray2};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::core::{BoundaryMode, Particle, ParticleSet, Vec2};

    fn py_err<E: ToString>(e: E) -> PyErr {
        PyValueError::new_err(e.to_string())
    }

    /// Python-facing wrapper around the Rust particle container.
    ///
    /// API:
    /// - `__new__(n=0, seed=None)` — a set pre-populated with `n` randomized
    ///   particles
    /// - `advance(mode)` / `resolve_collisions()` — one tick of simulation
    /// - `get_positions()` / `get_velocities()` / `get_accelerations()` —
    ///   `(N, 2)` float32 arrays
    /// - `get_radii()` / `get_kinds()` — length-N arrays
    /// - element access: `get`, `insert`, `insert_random`, `remove`,
    ///   `replace`
    #[pyclass]
    pub struct ParticleSim {
        set: ParticleSet,
    }

    type ParticleState = ((f32, f32), (f32, f32), (f32, f32), f32, i32);

    #[pymethods]
    impl ParticleSim {
        /// Create a simulation holding `n` randomized particles.
        ///
        /// Parameters
        /// - n: initial population size
        /// - seed: RNG seed (int) for reproducibility; None for
        ///   nondeterministic
        #[new]
        #[pyo3(signature = (n=0, seed=None))]
        fn new(n: usize, seed: Option<u64>) -> Self {
            Self {
                set: ParticleSet::populated(n, seed),
            }
        }

        /// Number of live particles.
        fn count(&self) -> usize {
            self.set.len()
        }

        /// Total allocated slots.
        fn capacity(&self) -> usize {
            self.set.capacity()
        }

        /// Advance every particle one tick under the given boundary mode
        /// (`0` = none, `1` = bounce, `2` = wrap; other codes move only).
        fn advance(&mut self, py: Python<'_>, mode: u8) {
            py.detach(|| self.set.advance_all(BoundaryMode::from_code(mode)));
        }

        /// Resolve all pairwise collisions in ascending index order.
        fn resolve_collisions(&mut self, py: Python<'_>) {
            py.detach(|| self.set.resolve_all_collisions());
        }

        /// Append a particle with fully explicit state.
        #[pyo3(signature = (x, y, vx, vy, ax, ay, radius, kind=0))]
        #[allow(clippy::too_many_arguments)]
        fn insert(&mut self, x: f32, y: f32, vx: f32, vy: f32, ax: f32, ay: f32, radius: f32, kind: i32) {
            self.set.insert(Particle::new(
                Vec2::new(x, y),
                Vec2::new(ax, ay),
                Vec2::new(vx, vy),
                radius,
                kind,
            ));
        }

        /// Append a freshly randomized dynamic particle.
        fn insert_random(&mut self) {
            self.set.insert_random();
        }

        /// Remove the particle at `index` (no-op when out of range).
        fn remove(&mut self, index: usize) {
            self.set.remove_at(index);
        }

        /// Return `(position, velocity, acceleration, radius, kind)` for the
        /// particle at `index`.
        ///
        /// Errors: raises ValueError when `index` is out of range.
        fn get(&self, index: usize) -> PyResult<ParticleState> {
            let p = self.set.get(index).map_err(py_err)?;
            Ok((
                (p.position.x, p.position.y),
                (p.velocity.x, p.velocity.y),
                (p.acceleration.x, p.acceleration.y),
                p.radius,
                p.kind,
            ))
        }

        /// Overwrite the particle at `index` with fully explicit state.
        ///
        /// Errors: raises ValueError when `index` is out of range.
        #[pyo3(signature = (index, x, y, vx, vy, ax, ay, radius, kind=0))]
        #[allow(clippy::too_many_arguments)]
        fn replace(
            &mut self,
            index: usize,
            x: f32,
            y: f32,
            vx: f32,
            vy: f32,
            ax: f32,
            ay: f32,
            radius: f32,
            kind: i32,
        ) -> PyResult<()> {
            self.set
                .replace_at(
                    index,
                    Particle::new(
                        Vec2::new(x, y),
                        Vec2::new(ax, ay),
                        Vec2::new(vx, vy),
                        radius,
                        kind,
                    ),
                )
                .map_err(py_err)
        }

        /// Positions as a NumPy array of shape (N, 2), dtype=float32.
        fn get_positions<'py>(&self, py: Python<'py>) -> Py<PyArray2<f32>> {
            component_array(py, self.set.particles(), |p| p.position)
        }

        /// Velocities as a NumPy array of shape (N, 2), dtype=float32.
        fn get_velocities<'py>(&self, py: Python<'py>) -> Py<PyArray2<f32>> {
            component_array(py, self.set.particles(), |p| p.velocity)
        }

        /// Accelerations as a NumPy array of shape (N, 2), dtype=float32.
        fn get_accelerations<'py>(&self, py: Python<'py>) -> Py<PyArray2<f32>> {
            component_array(py, self.set.particles(), |p| p.acceleration)
        }

        /// Radii as a NumPy array of shape (N,), dtype=float32.
        fn get_radii<'py>(&self, py: Python<'py>) -> Py<PyArray1<f32>> {
            let radii: Vec<f32> = self.set.particles().iter().map(|p| p.radius).collect();
            radii.into_pyarray(py).unbind()
        }

        /// Kind tags as a NumPy array of shape (N,), dtype=int32.
        fn get_kinds<'py>(&self, py: Python<'py>) -> Py<PyArray1<i32>> {
            let kinds: Vec<i32> = self.set.particles().iter().map(|p| p.kind).collect();
            kinds.into_pyarray(py).unbind()
        }

        /// Total kinetic energy of the population (unit mass).
        fn kinetic_energy(&self) -> f32 {
            self.set.kinetic_energy()
        }

        /// Human-readable dump: capacity, live count, and every particle.
        fn describe(&self) -> String {
            self.set.to_string()
        }
    }

    fn component_array<'py>(
        py: Python<'py>,
        particles: &[Particle],
        component: impl Fn(&Particle) -> Vec2,
    ) -> Py<PyArray2<f32>> {
        let mut arr = Array2::<f32>::zeros((particles.len(), 2));
        for (i, p) in particles.iter().enumerate() {
            let v = component(p);
            arr[[i, 0]] = v.x;
            arr[[i, 1]] = v.y;
        }
        arr.into_pyarray(py).unbind()
    }

    /// The partsim Python module entry point.
    #[pymodule]
    fn partsim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<ParticleSim>()?;
        Ok(())
    }
}
