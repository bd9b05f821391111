use super::base_pair::BasePair;
use super::error::ValidationError;
use super::location::{Block, Location};
use super::molecule::Molecule;
use std::collections::HashSet;
use std::sync::Arc;

/// A maximal run of stacked canonical pairs `(i, j), (i+1, j-1), ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Helix {
    start: usize,
    end: usize,
    length: usize,
}

impl Helix {
    /// `start` is the first residue of the 5' strand, `end` the last residue
    /// of the 3' strand and `length` the number of base pairs.
    pub fn new(start: usize, end: usize, length: usize) -> Self {
        Self { start, end, length }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// The paired positions, outermost pair first.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.length).map(|k| (self.start + k, self.end - k))
    }

    /// The two strands as a two-block location.
    pub fn location(&self) -> Location {
        Location::from_sorted_blocks(vec![
            Block::new(self.start, self.start + self.length - 1),
            Block::new(self.end + 1 - self.length, self.end),
        ])
    }
}

/// The base-pairing topology of an RNA molecule.
///
/// Pairs are kept sorted by `(position_i, position_j)`, so two structures
/// with the same pairs compare equal regardless of declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryStructure {
    rna: Arc<Molecule>,
    base_pairs: Vec<BasePair>,
}

impl SecondaryStructure {
    /// Validates `base_pairs` against `rna`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NotRna`] if `rna` is a generic molecule.
    /// - [`ValidationError::SelfPair`] for a pair `(i, i)`.
    /// - [`ValidationError::OutOfRange`] if a position is `>= rna.len()`.
    /// - [`ValidationError::DuplicatePair`] if an unordered pair repeats.
    /// - [`ValidationError::ConflictingPair`] if a position takes part in
    ///   two canonical pairs.
    pub fn new(rna: Arc<Molecule>, mut base_pairs: Vec<BasePair>) -> Result<Self, ValidationError> {
        if !rna.is_rna() {
            return Err(ValidationError::NotRna {
                name: rna.name().to_string(),
            });
        }

        let length = rna.len();
        let mut seen_pairs = HashSet::with_capacity(base_pairs.len());
        let mut canonical_positions = HashSet::new();

        for pair in &base_pairs {
            let (i, j) = pair.positions();
            if i == j {
                return Err(ValidationError::SelfPair { i, j });
            }
            if j >= length {
                return Err(ValidationError::OutOfRange {
                    position: j,
                    length,
                });
            }
            if !seen_pairs.insert((i, j)) {
                return Err(ValidationError::DuplicatePair { i, j });
            }
            if pair.is_canonical() {
                for position in [i, j] {
                    if !canonical_positions.insert(position) {
                        return Err(ValidationError::ConflictingPair { position });
                    }
                }
            }
        }

        base_pairs.sort_by_key(BasePair::positions);
        Ok(Self { rna, base_pairs })
    }

    pub fn rna(&self) -> &Arc<Molecule> {
        &self.rna
    }

    pub fn base_pairs(&self) -> &[BasePair] {
        &self.base_pairs
    }

    /// The pairing partner of `position`, preferring its canonical pair.
    pub fn partner(&self, position: usize) -> Option<usize> {
        let mut involved = self.base_pairs.iter().filter(|p| p.involves(position));
        let first = involved.clone().next()?;
        involved
            .find(|p| p.is_canonical())
            .unwrap_or(first)
            .partner(position)
    }

    /// Groups canonical pairs into maximal helices.
    ///
    /// Canonical pairs are visited by increasing `position_i`; a helix is
    /// extended while `position_i` grows by one and `position_j` shrinks by
    /// one, and a new helix starts at the first pair breaking that run.
    pub fn helices(&self) -> Vec<Helix> {
        let mut helices = Vec::new();
        let mut current: Option<(Helix, (usize, usize))> = None;

        for pair in self.base_pairs.iter().filter(|p| p.is_canonical()) {
            let (i, j) = pair.positions();
            current = match current {
                Some((mut helix, (last_i, last_j))) if i == last_i + 1 && j + 1 == last_j => {
                    helix.length += 1;
                    Some((helix, (i, j)))
                }
                previous => {
                    if let Some((helix, _)) = previous {
                        helices.push(helix);
                    }
                    Some((Helix::new(i, j, 1), (i, j)))
                }
            };
        }
        if let Some((helix, _)) = current {
            helices.push(helix);
        }
        helices
    }

    /// A witness pair of crossing interactions, if any.
    pub fn crossing_pairs(&self) -> Option<(BasePair, BasePair)> {
        for (idx, outer) in self.base_pairs.iter().enumerate() {
            for inner in &self.base_pairs[idx + 1..] {
                if inner.position_i() >= outer.position_j() {
                    break;
                }
                if outer.crosses(inner) {
                    return Some((*outer, *inner));
                }
            }
        }
        None
    }

    /// `true` iff two pairs `(i, j)` and `(k, l)` satisfy `i < k < j < l`.
    pub fn is_pseudoknotted(&self) -> bool {
        self.crossing_pairs().is_some()
    }

    /// Positions that take part in no base pair.
    pub fn single_strands(&self) -> Location {
        let paired: HashSet<usize> = self
            .base_pairs
            .iter()
            .flat_map(|p| [p.position_i(), p.position_j()])
            .collect();
        Location::from_positions((0..self.rna.len()).filter(|p| !paired.contains(p)))
    }
}

/// Collects base pairs and validates them once, at [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct SecondaryStructureBuilder {
    rna: Arc<Molecule>,
    base_pairs: Vec<BasePair>,
}

impl SecondaryStructureBuilder {
    pub fn new(rna: Arc<Molecule>) -> Self {
        Self {
            rna,
            base_pairs: Vec::new(),
        }
    }

    pub fn add_pair(&mut self, pair: BasePair) -> &mut Self {
        self.base_pairs.push(pair);
        self
    }

    pub fn add_canonical(&mut self, i: usize, j: usize) -> &mut Self {
        self.add_pair(BasePair::canonical(i, j))
    }

    pub fn build(self) -> Result<SecondaryStructure, ValidationError> {
        SecondaryStructure::new(self.rna, self.base_pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::base_pair::{Edge, Orientation};
    use std::collections::BTreeMap;

    fn rna(seq: &str) -> Arc<Molecule> {
        Arc::new(Molecule::rna("test", "", seq, BTreeMap::new()).unwrap())
    }

    fn canonical(pairs: &[(usize, usize)]) -> Vec<BasePair> {
        pairs.iter().map(|&(i, j)| BasePair::canonical(i, j)).collect()
    }

    #[test]
    fn new_sorts_pairs_and_exposes_partners() {
        let ss = SecondaryStructure::new(rna("GGGAAACCC"), canonical(&[(2, 6), (0, 8), (1, 7)]))
            .unwrap();
        let positions: Vec<_> = ss.base_pairs().iter().map(BasePair::positions).collect();
        assert_eq!(positions, vec![(0, 8), (1, 7), (2, 6)]);
        assert_eq!(ss.partner(7), Some(1));
        assert_eq!(ss.partner(4), None);
    }

    #[test]
    fn duplicate_unordered_pairs_are_rejected() {
        let err = SecondaryStructure::new(rna("GGGAAACCC"), canonical(&[(0, 8), (8, 0)])).unwrap_err();
        assert_eq!(err, ValidationError::DuplicatePair { i: 0, j: 8 });
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let err = SecondaryStructure::new(rna("GGAC"), canonical(&[(0, 4)])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                position: 4,
                length: 4
            }
        );
    }

    #[test]
    fn self_pairs_and_generic_molecules_are_rejected() {
        assert!(matches!(
            SecondaryStructure::new(rna("GGAC"), canonical(&[(2, 2)])),
            Err(ValidationError::SelfPair { i: 2, j: 2 })
        ));
        let protein = Arc::new(Molecule::new("p", "", "MKV", BTreeMap::new()).unwrap());
        assert!(matches!(
            SecondaryStructure::new(protein, Vec::new()),
            Err(ValidationError::NotRna { .. })
        ));
    }

    #[test]
    fn a_position_takes_part_in_one_canonical_pair_only() {
        let err = SecondaryStructure::new(rna("GGAACC"), canonical(&[(0, 5), (0, 4)])).unwrap_err();
        assert_eq!(err, ValidationError::ConflictingPair { position: 0 });

        let tertiary = BasePair::new(0, 3, Edge::Hoogsteen, Edge::Sugar, Orientation::Trans);
        let mut pairs = canonical(&[(0, 5)]);
        pairs.push(tertiary);
        assert!(SecondaryStructure::new(rna("GGAACC"), pairs).is_ok());
    }

    #[test]
    fn pseudoknot_detection() {
        let crossing = SecondaryStructure::new(rna("GGAACC"), canonical(&[(0, 4), (1, 5)])).unwrap();
        assert!(crossing.is_pseudoknotted());
        assert_eq!(
            crossing.crossing_pairs(),
            Some((BasePair::canonical(0, 4), BasePair::canonical(1, 5)))
        );

        let nested = SecondaryStructure::new(rna("GGAACC"), canonical(&[(0, 5), (1, 4)])).unwrap();
        assert!(!nested.is_pseudoknotted());
        assert_eq!(nested.crossing_pairs(), None);
    }

    #[test]
    fn helices_are_maximal_stacked_runs() {
        // Two stems: (0,20)..(2,18) and (5,15),(6,14), plus an isolated pair.
        let ss = SecondaryStructure::new(
            rna(&"A".repeat(30)),
            canonical(&[(0, 20), (1, 19), (2, 18), (5, 15), (6, 14), (22, 28)]),
        )
        .unwrap();
        let helices = ss.helices();
        assert_eq!(
            helices,
            vec![Helix::new(0, 20, 3), Helix::new(5, 15, 2), Helix::new(22, 28, 1)]
        );
        let pairs: Vec<_> = helices[0].pairs().collect();
        assert_eq!(pairs, vec![(0, 20), (1, 19), (2, 18)]);
        assert_eq!(
            helices[0].location().blocks(),
            &[Block::new(0, 2), Block::new(18, 20)]
        );
    }

    #[test]
    fn bulges_split_helices_and_non_canonical_pairs_are_ignored() {
        let mut pairs = canonical(&[(0, 12), (1, 11), (2, 9)]);
        pairs.push(BasePair::new(3, 8, Edge::Sugar, Edge::Sugar, Orientation::Cis));
        let ss = SecondaryStructure::new(rna(&"G".repeat(13)), pairs).unwrap();
        assert_eq!(ss.helices(), vec![Helix::new(0, 12, 2), Helix::new(2, 9, 1)]);
    }

    #[test]
    fn single_strands_cover_unpaired_positions() {
        let ss = SecondaryStructure::new(rna("GGGAAACCC"), canonical(&[(0, 8), (1, 7), (2, 6)]))
            .unwrap();
        assert_eq!(ss.single_strands(), Location::from_range(3, 5));
    }

    #[test]
    fn builder_validates_on_build() {
        let mut builder = SecondaryStructureBuilder::new(rna("GGAACC"));
        builder.add_canonical(0, 5).add_canonical(1, 4);
        let ss = builder.build().unwrap();
        assert_eq!(ss.base_pairs().len(), 2);

        let mut builder = SecondaryStructureBuilder::new(rna("GGAACC"));
        builder.add_canonical(0, 9);
        assert!(builder.build().is_err());
    }
}
