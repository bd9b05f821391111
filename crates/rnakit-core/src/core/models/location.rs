use super::error::ValidationError;
use std::fmt;

/// A closed interval of 0-based sequence positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Block {
    start: usize,
    end: usize,
}

impl Block {
    /// Creates a block covering `start..=end`.
    ///
    /// Reversed bounds are swapped, so `Block::new(9, 3)` covers `3..=9`.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// A block holding a single position.
    pub fn single(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn length(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }

    pub fn overlaps(&self, other: &Block) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns `true` if the blocks touch without sharing a position.
    pub fn is_adjacent(&self, other: &Block) -> bool {
        self.end + 1 == other.start || other.end + 1 == self.start
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// An ordered set of non-overlapping [`Block`]s.
///
/// Describes possibly discontiguous residue ranges, e.g. the two strands of a
/// helix or a domain with an insertion cut out. Blocks are kept sorted by
/// their start position, which makes membership queries logarithmic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    blocks: Vec<Block>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    /// A location made of one contiguous block.
    pub fn from_range(start: usize, end: usize) -> Self {
        Self {
            blocks: vec![Block::new(start, end)],
        }
    }

    /// Wraps blocks the caller already knows to be sorted and disjoint.
    pub(crate) fn from_sorted_blocks(blocks: Vec<Block>) -> Self {
        debug_assert!(blocks.windows(2).all(|w| w[0].end < w[1].start));
        Self { blocks }
    }

    /// Builds a location from single positions, in any order and with
    /// repetitions allowed. Runs of consecutive positions become one block.
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut sorted: Vec<usize> = positions.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();

        let mut blocks: Vec<Block> = Vec::new();
        for position in sorted {
            match blocks.last_mut() {
                Some(last) if last.end + 1 == position => last.end = position,
                _ => blocks.push(Block::single(position)),
            }
        }
        Self { blocks }
    }

    /// Inserts `block`, keeping the blocks sorted.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Overlap`] if `block` shares a position with
    /// a block already present; the location is left unchanged.
    pub fn add(&mut self, block: Block) -> Result<(), ValidationError> {
        let idx = self.blocks.partition_point(|b| b.start < block.start);

        let neighbours = [idx.checked_sub(1), Some(idx)];
        let conflict = neighbours
            .into_iter()
            .flatten()
            .filter_map(|i| self.blocks.get(i))
            .find(|existing| existing.overlaps(&block));
        if let Some(existing) = conflict {
            return Err(ValidationError::Overlap {
                existing: *existing,
                new: block,
            });
        }

        self.blocks.insert(idx, block);
        Ok(())
    }

    pub fn contains(&self, position: usize) -> bool {
        let idx = self.blocks.partition_point(|b| b.start <= position);
        idx > 0 && self.blocks[idx - 1].end >= position
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// First covered position.
    pub fn start(&self) -> Option<usize> {
        self.blocks.first().map(Block::start)
    }

    /// Last covered position.
    pub fn end(&self) -> Option<usize> {
        self.blocks.last().map(Block::end)
    }

    /// Number of covered positions.
    pub fn len(&self) -> usize {
        self.blocks.iter().map(Block::length).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over every covered position in increasing order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.blocks.iter().flat_map(|b| b.start..=b.end)
    }

    /// Positions of `self` that are not covered by `other`.
    pub fn difference(&self, other: &Location) -> Location {
        Location::from_positions(self.positions().filter(|p| !other.contains(*p)))
    }

    /// Positions of `self` covered by none of `others`.
    pub fn difference_all(&self, others: &[Location]) -> Location {
        Location::from_positions(
            self.positions()
                .filter(|p| others.iter().all(|other| !other.contains(*p))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_new_orders_reversed_bounds() {
        let block = Block::new(9, 3);
        assert_eq!(block.start(), 3);
        assert_eq!(block.end(), 9);
        assert_eq!(block.length(), 7);
    }

    #[test]
    fn block_overlap_and_adjacency() {
        let a = Block::new(0, 5);
        assert!(a.overlaps(&Block::new(5, 8)));
        assert!(a.overlaps(&Block::new(3, 4)));
        assert!(!a.overlaps(&Block::new(6, 10)));
        assert!(a.is_adjacent(&Block::new(6, 10)));
        assert!(!a.is_adjacent(&Block::new(7, 10)));
    }

    #[test]
    fn add_rejects_overlapping_block_and_accepts_disjoint_one() {
        let mut location = Location::new();
        location.add(Block::new(0, 5)).unwrap();

        let err = location.add(Block::new(3, 8)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Overlap {
                existing: Block::new(0, 5),
                new: Block::new(3, 8),
            }
        );
        assert_eq!(location.blocks(), &[Block::new(0, 5)]);

        location.add(Block::new(6, 10)).unwrap();
        assert_eq!(location.blocks(), &[Block::new(0, 5), Block::new(6, 10)]);
    }

    #[test]
    fn add_keeps_blocks_sorted() {
        let mut location = Location::new();
        location.add(Block::new(20, 25)).unwrap();
        location.add(Block::new(0, 2)).unwrap();
        location.add(Block::new(10, 12)).unwrap();
        let starts: Vec<usize> = location.blocks().iter().map(Block::start).collect();
        assert_eq!(starts, vec![0, 10, 20]);
    }

    #[test]
    fn add_detects_block_spanning_an_existing_one() {
        let mut location = Location::from_range(4, 6);
        assert!(location.add(Block::new(0, 10)).is_err());
        assert!(location.add(Block::new(6, 6)).is_err());
    }

    #[test]
    fn contains_checks_every_block() {
        let location = Location::from_positions([12, 13, 14, 30, 31, 45]);
        assert_eq!(
            location.blocks(),
            &[Block::new(12, 14), Block::new(30, 31), Block::single(45)]
        );
        assert!(location.contains(12));
        assert!(location.contains(31));
        assert!(location.contains(45));
        assert!(!location.contains(11));
        assert!(!location.contains(15));
        assert!(!location.contains(46));
        assert!(!Location::new().contains(0));
    }

    #[test]
    fn from_positions_ignores_order_and_duplicates() {
        let location = Location::from_positions([5, 3, 4, 4, 9]);
        assert_eq!(location.blocks(), &[Block::new(3, 5), Block::single(9)]);
        assert_eq!(location.len(), 4);
        assert_eq!(location.start(), Some(3));
        assert_eq!(location.end(), Some(9));
    }

    #[test]
    fn difference_removes_covered_positions() {
        let domain = Location::from_range(0, 20);
        let insertion = Location::from_range(5, 9);
        let tail = Location::from_range(18, 25);

        let remaining = domain.difference(&insertion);
        assert_eq!(remaining.blocks(), &[Block::new(0, 4), Block::new(10, 20)]);

        let remaining = domain.difference_all(&[insertion, tail]);
        assert_eq!(remaining.blocks(), &[Block::new(0, 4), Block::new(10, 17)]);
        assert_eq!(remaining.positions().count(), 13);
    }
}
