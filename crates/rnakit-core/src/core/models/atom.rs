use nalgebra::Point3;

/// A named atom with Cartesian coordinates in Angstroms.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom name as written in the source file (e.g. "P", "C1'", "N7").
    pub name: String,
    /// The 3D coordinates of the atom.
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(name: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            position,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }
}
