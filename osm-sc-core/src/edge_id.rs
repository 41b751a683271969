//! Synthetic edge identifiers.
//!
//! Edges have no identity in OSM, so each consecutive node pair receives a
//! generated identifier: [`EDGE_ID_LENGTH`] characters drawn uniformly from
//! the 62 ASCII alphanumerics. [`RandomEdgeIds`] performs no uniqueness
//! check; collisions are possible though improbable across the 62^10 space.
//! Wrap a generator in [`UniqueEdgeIds`] when duplicates must be ruled out.

use std::collections::HashSet;

use log::debug;
use rand::{Rng, SeedableRng, distributions::Alphanumeric};
use rand_chacha::ChaCha8Rng;

/// Length of every generated edge identifier.
pub const EDGE_ID_LENGTH: usize = 10;

/// Symbols edge identifiers are drawn from.
pub const EDGE_ID_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Source of synthetic edge identifiers.
pub trait EdgeIdGenerator {
    /// Produce the identifier for the next edge.
    fn next_id(&mut self) -> String;
}

impl<G: EdgeIdGenerator + ?Sized> EdgeIdGenerator for &mut G {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

/// Return whether `id` has the shape of a generated edge identifier.
///
/// # Examples
/// ```
/// use osm_sc_core::is_edge_id;
///
/// assert!(is_edge_id("a1B2c3D4e5"));
/// assert!(!is_edge_id("a1B2c3D4e"));
/// assert!(!is_edge_id("a1B2c3D4e_"));
/// ```
#[must_use]
pub fn is_edge_id(id: &str) -> bool {
    id.len() == EDGE_ID_LENGTH && id.bytes().all(|byte| EDGE_ID_ALPHABET.contains(&byte))
}

/// Uniformly random identifiers from an injected RNG.
///
/// # Examples
/// ```
/// use osm_sc_core::{EdgeIdGenerator, RandomEdgeIds, is_edge_id};
///
/// let mut first = RandomEdgeIds::from_seed(7);
/// let mut second = RandomEdgeIds::from_seed(7);
/// let id = first.next_id();
/// assert!(is_edge_id(&id));
/// assert_eq!(id, second.next_id());
/// ```
#[derive(Debug, Clone)]
pub struct RandomEdgeIds<R = ChaCha8Rng> {
    rng: R,
}

impl RandomEdgeIds<ChaCha8Rng> {
    /// Deterministic identifiers from a seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Identifiers seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> RandomEdgeIds<R> {
    /// Draw identifiers from `rng`.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> EdgeIdGenerator for RandomEdgeIds<R> {
    fn next_id(&mut self) -> String {
        (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(EDGE_ID_LENGTH)
            .map(char::from)
            .collect()
    }
}

/// Redraws from the wrapped generator until an identifier is new.
///
/// Only identifiers issued through this wrapper are tracked.
#[derive(Debug, Clone)]
pub struct UniqueEdgeIds<G> {
    inner: G,
    issued: HashSet<String>,
}

impl<G: EdgeIdGenerator> UniqueEdgeIds<G> {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            issued: HashSet::new(),
        }
    }

    /// Number of distinct identifiers issued so far.
    #[must_use]
    pub fn issued(&self) -> usize {
        self.issued.len()
    }

    /// Return the wrapped generator.
    #[must_use]
    pub fn into_inner(self) -> G {
        self.inner
    }
}

impl<G: EdgeIdGenerator> EdgeIdGenerator for UniqueEdgeIds<G> {
    fn next_id(&mut self) -> String {
        loop {
            let candidate = self.inner.next_id();
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
            debug!("Edge identifier {candidate} already issued; drawing again");
        }
    }
}
