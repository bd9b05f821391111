use std::fmt;
use std::str::FromStr;

/// The interacting edge of a nucleotide (Leontis-Westhof classification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Edge {
    #[default]
    WatsonCrick,
    Hoogsteen,
    Sugar,
}

/// Relative orientation of the glycosidic bonds of a base pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Orientation {
    #[default]
    Cis,
    Trans,
}

impl FromStr for Edge {
    type Err = ();

    /// Parses the short or long edge codes (`W`/`WC`, `H`, `S`/`SE`),
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w" | "wc" | "watson-crick" | "watsoncrick" => Ok(Edge::WatsonCrick),
            "h" | "hoogsteen" => Ok(Edge::Hoogsteen),
            "s" | "se" | "sugar" | "sugar-edge" => Ok(Edge::Sugar),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Edge::WatsonCrick => "W",
            Edge::Hoogsteen => "H",
            Edge::Sugar => "S",
        };
        f.write_str(code)
    }
}

impl FromStr for Orientation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "cis" => Ok(Orientation::Cis),
            "t" | "trans" => Ok(Orientation::Trans),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Cis => f.write_str("c"),
            Orientation::Trans => f.write_str("t"),
        }
    }
}

/// An interaction between two residues of the same molecule.
///
/// Pairs are stored with `position_i < position_j`; constructing a pair with
/// reversed positions swaps the edges along with them, so the stored pair
/// describes the same interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasePair {
    position_i: usize,
    position_j: usize,
    orientation: Orientation,
    edge_i: Edge,
    edge_j: Edge,
}

impl BasePair {
    pub fn new(
        position_i: usize,
        position_j: usize,
        edge_i: Edge,
        edge_j: Edge,
        orientation: Orientation,
    ) -> Self {
        if position_i <= position_j {
            Self {
                position_i,
                position_j,
                orientation,
                edge_i,
                edge_j,
            }
        } else {
            Self {
                position_i: position_j,
                position_j: position_i,
                orientation,
                edge_i: edge_j,
                edge_j: edge_i,
            }
        }
    }

    /// A cis Watson-Crick/Watson-Crick pair.
    pub fn canonical(position_i: usize, position_j: usize) -> Self {
        Self::new(
            position_i,
            position_j,
            Edge::WatsonCrick,
            Edge::WatsonCrick,
            Orientation::Cis,
        )
    }

    pub fn position_i(&self) -> usize {
        self.position_i
    }

    pub fn position_j(&self) -> usize {
        self.position_j
    }

    pub fn positions(&self) -> (usize, usize) {
        (self.position_i, self.position_j)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn edge_i(&self) -> Edge {
        self.edge_i
    }

    pub fn edge_j(&self) -> Edge {
        self.edge_j
    }

    pub fn is_canonical(&self) -> bool {
        self.orientation == Orientation::Cis
            && self.edge_i == Edge::WatsonCrick
            && self.edge_j == Edge::WatsonCrick
    }

    pub fn involves(&self, position: usize) -> bool {
        self.position_i == position || self.position_j == position
    }

    /// The other residue of the pair, if `position` takes part in it.
    pub fn partner(&self, position: usize) -> Option<usize> {
        if position == self.position_i {
            Some(self.position_j)
        } else if position == self.position_j {
            Some(self.position_i)
        } else {
            None
        }
    }

    /// `true` if the pairs interleave as `i < k < j < l` (in either order).
    pub fn crosses(&self, other: &BasePair) -> bool {
        let (i, j) = self.positions();
        let (k, l) = other.positions();
        (i < k && k < j && j < l) || (k < i && i < l && l < j)
    }
}
