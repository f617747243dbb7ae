use crate::core::params::BLOCK_SIZE;
use crate::core::particle::Particle;
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Boundary policy applied to each particle after its integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryMode {
    /// Integrate only; out-of-bounds positions are left for the caller.
    #[default]
    Hold,
    /// Reflect off the world edges.
    Bounce,
    /// Reappear on the opposite side of the world.
    Wrap,
}

impl BoundaryMode {
    /// Map a numeric mode code (`0` hold, `1` bounce, `2` wrap). Unknown
    /// codes fall back to `Hold`, the same permissive dispatch the numeric
    /// driver surface has always had.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => BoundaryMode::Bounce,
            2 => BoundaryMode::Wrap,
            _ => BoundaryMode::Hold,
        }
    }
}

/// A resizable collection of particles with block-amortized storage.
///
/// Slots `[0, len)` hold live particles in no guaranteed order; deletion
/// swaps the last live particle into the vacated slot. Storage grows by
/// `BLOCK_SIZE` slots when an insertion finds the set full, and shrinks to
/// exactly the live count once the slack after a deletion exceeds one block.
///
/// The set owns an explicitly seeded generator used for randomized
/// construction and bounce perturbation, so two sets built from the same seed
/// evolve identically.
#[derive(Debug)]
pub struct ParticleSet {
    storage: Vec<Particle>,
    capacity: usize,
    rng: StdRng,
}

impl ParticleSet {
    /// Create an empty set. `None` seeds the generator from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rand::rng().random()),
        };
        Self {
            storage: Vec::new(),
            capacity: 0,
            rng,
        }
    }

    /// Create a set pre-populated with `n` randomized dynamic particles.
    ///
    /// Storage is sized to exactly `n` up front rather than grown block by
    /// block.
    pub fn populated(n: usize, seed: Option<u64>) -> Self {
        let mut set = Self::new(seed);
        if n > 0 {
            set.resize_storage(n);
            for _ in 0..n {
                let p = Particle::random(&mut set.rng);
                set.storage.push(p);
            }
        }
        set
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Whether the set holds no live particles.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Total allocated slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The live particles as a slice, in storage order.
    pub fn particles(&self) -> &[Particle] {
        &self.storage
    }

    /// Append a particle, growing storage by one block if the set is full.
    pub fn insert(&mut self, particle: Particle) {
        if self.storage.len() == self.capacity {
            self.resize_storage(self.capacity + BLOCK_SIZE);
        }
        self.storage.push(particle);
    }

    /// Insert a freshly randomized dynamic particle drawn from the set's
    /// generator.
    pub fn insert_random(&mut self) {
        let p = Particle::random(&mut self.rng);
        self.insert(p);
    }

    /// Remove the particle at `index` by swapping the last live particle into
    /// its slot (O(1), order-destroying). Out-of-range indices are a no-op;
    /// callers that need stricter behavior validate first via [`get`].
    ///
    /// After a removal, storage shrinks to exactly the live count once the
    /// slack exceeds one block.
    ///
    /// [`get`]: ParticleSet::get
    pub fn remove_at(&mut self, index: usize) {
        if index >= self.storage.len() {
            return;
        }
        self.storage.swap_remove(index);
        if self.capacity - self.storage.len() > BLOCK_SIZE {
            self.resize_storage(self.storage.len());
        }
    }

    /// Borrow the particle at `index`.
    ///
    /// Errors: [`Error::IndexOutOfRange`] when `index >= len`.
    pub fn get(&self, index: usize) -> Result<&Particle> {
        self.storage.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.storage.len(),
        })
    }

    /// Mutably borrow the particle at `index`.
    ///
    /// Errors: [`Error::IndexOutOfRange`] when `index >= len`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut Particle> {
        let len = self.storage.len();
        self.storage
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Overwrite the particle at `index`.
    ///
    /// Errors: [`Error::IndexOutOfRange`] when `index >= len`.
    pub fn replace_at(&mut self, index: usize, particle: Particle) -> Result<()> {
        let slot = self.get_mut(index)?;
        *slot = particle;
        Ok(())
    }

    /// Advance every live particle one tick, then apply the boundary policy.
    ///
    /// Iteration is in index order; particle states are mutually independent
    /// during this pass, so the order is not observable.
    pub fn advance_all(&mut self, mode: BoundaryMode) {
        let Self { storage, rng, .. } = self;
        for p in storage.iter_mut() {
            p.step();
            match mode {
                BoundaryMode::Hold => {}
                BoundaryMode::Bounce => p.bounce(rng),
                BoundaryMode::Wrap => p.wrap(),
            }
        }
    }

    /// Resolve every colliding pair `(i, j)` with `i < j`, in ascending index
    /// order.
    ///
    /// Resolution is greedy: when three or more particles mutually overlap, a
    /// particle's later collision in the pass sees its state as left by the
    /// earlier one. That ordering is part of the observable contract, not an
    /// artifact.
    pub fn resolve_all_collisions(&mut self) {
        let n = self.storage.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.storage.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];
                if a.collides_with(b) {
                    a.resolve_collision(b);
                }
            }
        }
    }

    /// Total kinetic energy of the live particles (unit mass).
    pub fn kinetic_energy(&self) -> f32 {
        self.storage.iter().map(Particle::kinetic_energy).sum()
    }

    /// Reallocate backing storage to exactly `new_capacity` slots, keeping
    /// the first `min(new_capacity, len)` live particles. A request equal to
    /// the current capacity is ignored; zero releases the storage outright.
    fn resize_storage(&mut self, new_capacity: usize) {
        if new_capacity == self.capacity {
            return;
        }
        if new_capacity == 0 {
            self.storage = Vec::new();
            self.capacity = 0;
            return;
        }
        let keep = new_capacity.min(self.storage.len());
        let mut next = Vec::with_capacity(new_capacity);
        next.extend(self.storage.drain(..keep));
        self.storage = next;
        self.capacity = new_capacity;
    }
}

impl Clone for ParticleSet {
    /// Deep-copy the live region only; unused slots are re-allocated, never
    /// read. The clone keeps the same logical capacity and generator state.
    fn clone(&self) -> Self {
        let mut storage = Vec::with_capacity(self.capacity);
        storage.extend(self.storage.iter().cloned());
        Self {
            storage,
            capacity: self.capacity,
            rng: self.rng.clone(),
        }
    }
}

impl fmt::Display for ParticleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ParticleSet [capacity: {}, live: {}]",
            self.capacity,
            self.storage.len()
        )?;
        for (i, p) in self.storage.iter().enumerate() {
            writeln!(f, "  {i}: {p}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec::Vec2;

    fn tagged(kind: i32) -> Particle {
        Particle::fixed(kind)
    }

    #[test]
    fn new_set_is_empty() {
        let set = ParticleSet::new(Some(1));
        assert_eq!(set.len(), 0);
        assert_eq!(set.capacity(), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn populated_sizes_storage_exactly() {
        let set = ParticleSet::populated(5, Some(1));
        assert_eq!(set.len(), 5);
        assert_eq!(set.capacity(), 5);
        for p in set.particles() {
            assert_eq!(p.kind, 0);
        }
    }

    #[test]
    fn insert_random_draws_from_own_generator() {
        let mut a = ParticleSet::new(Some(21));
        let mut b = ParticleSet::new(Some(21));
        a.insert_random();
        b.insert_random();
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn same_seed_same_population() {
        let a = ParticleSet::populated(8, Some(99));
        let b = ParticleSet::populated(8, Some(99));
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn insert_grows_in_blocks() {
        let mut set = ParticleSet::new(Some(1));
        set.insert(tagged(1));
        assert_eq!(set.capacity(), BLOCK_SIZE);
        for k in 2..=BLOCK_SIZE as i32 {
            set.insert(tagged(k));
        }
        assert_eq!(set.capacity(), BLOCK_SIZE);
        set.insert(tagged(10));
        assert_eq!(set.capacity(), 2 * BLOCK_SIZE);
        assert_eq!(set.len(), BLOCK_SIZE + 1);
    }

    #[test]
    fn remove_swaps_last_into_slot() {
        let mut set = ParticleSet::new(Some(1));
        set.insert(tagged(10));
        set.insert(tagged(20));
        set.insert(tagged(30));
        set.remove_at(1);
        assert_eq!(set.len(), 2);
        let kinds: Vec<i32> = set.particles().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![10, 30]);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut set = ParticleSet::new(Some(1));
        set.insert(tagged(10));
        set.remove_at(7);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().kind, 10);
    }

    #[test]
    fn growth_shrink_round_trip() {
        let mut set = ParticleSet::new(Some(5));
        for k in 0..(BLOCK_SIZE + 1) as i32 {
            set.insert(tagged(k + 1));
        }
        assert_eq!(set.capacity(), 2 * BLOCK_SIZE);
        while set.len() > 1 {
            set.remove_at(0);
            assert!(set.capacity() >= set.len());
        }
        // Slack first exceeds one block at two live particles; the set is
        // trimmed to fit there and stays put afterwards.
        assert_eq!(set.capacity(), 2);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn resize_to_zero_releases_storage() {
        let mut set = ParticleSet::new(Some(1));
        set.insert(tagged(1));
        set.insert(tagged(2));
        set.resize_storage(0);
        assert_eq!(set.capacity(), 0);
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn resize_truncates_to_requested_capacity() {
        let mut set = ParticleSet::new(Some(1));
        for k in 1..=4 {
            set.insert(tagged(k));
        }
        set.resize_storage(2);
        assert_eq!(set.capacity(), 2);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().kind, 1);
        assert_eq!(set.get(1).unwrap().kind, 2);
    }

    #[test]
    fn get_out_of_range_is_an_error() {
        let set = ParticleSet::new(Some(1));
        match set.get(0) {
            Err(Error::IndexOutOfRange { index, len }) => {
                assert_eq!(index, 0);
                assert_eq!(len, 0);
            }
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn replace_at_overwrites_live_slot() -> Result<()> {
        let mut set = ParticleSet::new(Some(1));
        set.insert(tagged(10));
        set.replace_at(0, tagged(42))?;
        assert_eq!(set.get(0)?.kind, 42);
        assert!(set.replace_at(3, tagged(1)).is_err());
        Ok(())
    }

    #[test]
    fn clone_is_a_deep_copy() -> Result<()> {
        let original = ParticleSet::populated(4, Some(11));
        let mut copy = original.clone();
        assert_eq!(copy.capacity(), original.capacity());
        assert_eq!(copy.particles(), original.particles());

        copy.get_mut(0)?.position = Vec2::new(-1.0, -1.0);
        assert_ne!(
            original.get(0)?.position,
            copy.get(0)?.position
        );
        Ok(())
    }

    #[test]
    fn advance_hold_moves_without_boundary_handling() -> Result<()> {
        let mut set = ParticleSet::new(Some(1));
        set.insert(Particle::new(
            Vec2::new(100.0, 100.0),
            Vec2::zero(),
            Vec2::new(2.0, -1.0),
            3.0,
            0,
        ));
        set.advance_all(BoundaryMode::Hold);
        assert_eq!(set.get(0)?.position, Vec2::new(102.0, 99.0));
        Ok(())
    }

    #[test]
    fn advance_bounce_keeps_particles_inside() {
        let mut set = ParticleSet::populated(12, Some(3));
        for _ in 0..200 {
            set.advance_all(BoundaryMode::Bounce);
        }
        for p in set.particles() {
            assert!(p.position.x >= p.radius && p.position.x <= crate::core::params::MAX_X - p.radius);
            assert!(p.position.y >= p.radius && p.position.y <= crate::core::params::MAX_Y - p.radius);
        }
    }

    #[test]
    fn mode_codes_map_permissively() {
        assert_eq!(BoundaryMode::from_code(0), BoundaryMode::Hold);
        assert_eq!(BoundaryMode::from_code(1), BoundaryMode::Bounce);
        assert_eq!(BoundaryMode::from_code(2), BoundaryMode::Wrap);
        assert_eq!(BoundaryMode::from_code(9), BoundaryMode::Hold);
    }

    #[test]
    fn collisions_resolved_pairwise() {
        let mut set = ParticleSet::new(Some(1));
        set.insert(Particle::new(
            Vec2::new(100.0, 100.0),
            Vec2::zero(),
            Vec2::new(3.0, 0.0),
            4.0,
            0,
        ));
        set.insert(Particle::new(
            Vec2::new(105.0, 100.0),
            Vec2::zero(),
            Vec2::new(-2.0, 0.0),
            4.0,
            0,
        ));
        set.resolve_all_collisions();
        assert_eq!(set.get(0).unwrap().velocity, Vec2::new(-2.0, 0.0));
        assert_eq!(set.get(1).unwrap().velocity, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn display_dumps_capacity_count_and_particles() {
        let mut set = ParticleSet::new(Some(1));
        set.insert(tagged(1));
        let dump = set.to_string();
        assert!(dump.starts_with("ParticleSet [capacity: 3, live: 1]"));
        assert!(dump.contains("0: {(0,0), (0,0), (0,0), 3, 1}"));
    }
}
