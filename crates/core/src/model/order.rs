use rand::Rng;
use rand::seq::SliceRandom;

/// Random sequence in which a bank's questions are shown for one session.
///
/// Always a permutation of `0..len`; generated once per load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationOrder {
    indices: Vec<usize>,
}

impl PresentationOrder {
    /// Shuffle `0..len` with the given random source (Fisher–Yates).
    pub fn shuffled<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(rng);
        Self { indices }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Bank index of the question shown at `position`.
    #[must_use]
    pub fn question_index(&self, position: usize) -> Option<usize> {
        self.indices.get(position).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn every_index_appears_exactly_once() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in [0, 1, 2, 5, 50] {
            let order = PresentationOrder::shuffled(len, &mut rng);
            let mut sorted = order.as_slice().to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..len).collect::<Vec<_>>());
        }
    }

    #[test]
    fn same_seed_gives_same_order() {
        let a = PresentationOrder::shuffled(10, &mut StdRng::seed_from_u64(99));
        let b = PresentationOrder::shuffled(10, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn all_permutations_of_three_are_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.insert(PresentationOrder::shuffled(3, &mut rng).as_slice().to_vec());
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn question_index_is_none_past_the_end() {
        let order = PresentationOrder::shuffled(2, &mut StdRng::seed_from_u64(3));
        assert!(order.question_index(1).is_some());
        assert_eq!(order.question_index(2), None);
    }
}
