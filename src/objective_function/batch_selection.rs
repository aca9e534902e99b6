use std::fmt;
use std::sync::{Arc, Mutex};

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::{FitError, Result};


/// Decides which batches of the dataset an evaluation visits.
///
/// The error function normalizes by the mass of the visited batches,
/// so both strategies return errors of the same magnitude.
///
/// Clones of a minibatch strategy share one random source,
/// so they draw from a single stream instead of repeating each other.
#[derive(Clone)]
pub enum BatchSelection {
    /// Every evaluation visits all batches.
    FullBatch,
    /// Every evaluation visits one batch drawn uniformly at random.
    /// The random source is bound by `bind_rng`.
    MiniBatch(Arc<Mutex<Option<StdRng>>>),
}


impl BatchSelection {
    /// A minibatch strategy without a random source.
    pub fn minibatch() -> Self {
        Self::MiniBatch(Arc::new(Mutex::new(None)))
    }


    /// Returns `true` for the minibatch strategy.
    pub fn is_minibatch(&self) -> bool {
        matches!(self, Self::MiniBatch(_))
    }


    /// Binds `rng` as the random source.
    /// The receiver stops sharing its previous source with its clones.
    /// The full-batch strategy ignores it.
    pub fn bind_rng(&mut self, rng: StdRng) {
        if let Self::MiniBatch(slot) = self {
            *slot = Arc::new(Mutex::new(Some(rng)));
        }
    }


    /// Returns the indices of the batches to visit
    /// out of `n_batches` batches.
    pub fn select(&self, n_batches: usize) -> Result<Vec<usize>> {
        match self {
            Self::FullBatch => Ok((0..n_batches).collect()),
            Self::MiniBatch(slot) => {
                let mut guard = slot.lock()
                    .unwrap_or_else(|e| e.into_inner());
                let rng = guard.as_mut()
                    .ok_or(FitError::RngNotInitialized)?;
                let i = rng.gen_range(0..n_batches);
                Ok(vec![i])
            },
        }
    }
}


impl fmt::Debug for BatchSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string())
    }
}


impl fmt::Display for BatchSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FullBatch => "Full batch",
            Self::MiniBatch(_) => "Minibatch",
        };

        write!(f, "{name}")
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_batch_visits_everything() {
        let selection = BatchSelection::FullBatch;
        assert_eq!(selection.select(4).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_minibatch_requires_rng() {
        let selection = BatchSelection::minibatch();
        assert_eq!(
            selection.select(4).unwrap_err(),
            FitError::RngNotInitialized
        );
    }

    #[test]
    fn test_minibatch_is_reproducible() {
        let mut s1 = BatchSelection::minibatch();
        let mut s2 = BatchSelection::minibatch();
        s1.bind_rng(StdRng::seed_from_u64(7));
        s2.bind_rng(StdRng::seed_from_u64(7));

        let draws1 = (0..20)
            .map(|_| s1.select(5).unwrap()[0])
            .collect::<Vec<_>>();
        let draws2 = (0..20)
            .map(|_| s2.select(5).unwrap()[0])
            .collect::<Vec<_>>();
        assert_eq!(draws1, draws2);
        assert!(draws1.iter().all(|&i| i < 5));
    }

    #[test]
    fn test_clones_share_one_stream() {
        let mut reference = BatchSelection::minibatch();
        reference.bind_rng(StdRng::seed_from_u64(42));
        let expected = (0..20)
            .map(|_| reference.select(10).unwrap()[0])
            .collect::<Vec<_>>();

        let mut s1 = BatchSelection::minibatch();
        s1.bind_rng(StdRng::seed_from_u64(42));
        let s2 = s1.clone();
        let draws = (0..20)
            .map(|i| {
                let s = if i % 2 == 0 { &s1 } else { &s2 };
                s.select(10).unwrap()[0]
            })
            .collect::<Vec<_>>();
        assert_eq!(draws, expected);
    }

    #[test]
    fn test_rebinding_detaches_a_clone() {
        let mut s1 = BatchSelection::minibatch();
        s1.bind_rng(StdRng::seed_from_u64(3));
        let mut s2 = s1.clone();
        s2.bind_rng(StdRng::seed_from_u64(3));

        let draws1 = (0..20)
            .map(|_| s1.select(10).unwrap()[0])
            .collect::<Vec<_>>();
        let draws2 = (0..20)
            .map(|_| s2.select(10).unwrap()[0])
            .collect::<Vec<_>>();
        assert_eq!(draws1, draws2);
    }
}
