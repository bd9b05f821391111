use super::atom::Atom;
use super::error::ValidationError;
use std::collections::HashSet;

/// The atoms of one modeled residue.
///
/// `position` is the 0-based index into the owning molecule's sequence.
/// `number` and `insertion_code` keep the numbering used by the source file,
/// which rarely starts at 1 and may skip or repeat numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue3D {
    position: usize,
    number: i32,
    insertion_code: Option<char>,
    atoms: Vec<Atom>,
}

impl Residue3D {
    /// Creates a residue numbered `position + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateAtom`] if two atoms share a name
    /// and [`ValidationError::NonFiniteCoordinate`] for NaN or infinite
    /// coordinates.
    pub fn new(position: usize, atoms: Vec<Atom>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(atoms.len());
        for atom in &atoms {
            if !seen.insert(atom.name.as_str()) {
                return Err(ValidationError::DuplicateAtom {
                    position,
                    atom: atom.name.clone(),
                });
            }
            if !atom.is_finite() {
                return Err(ValidationError::NonFiniteCoordinate {
                    position,
                    atom: atom.name.clone(),
                });
            }
        }
        Ok(Self {
            position,
            number: i32::try_from(position).map_or(i32::MAX, |p| p.saturating_add(1)),
            insertion_code: None,
            atoms,
        })
    }

    /// Overrides the source-file numbering.
    pub fn with_numbering(mut self, number: i32, insertion_code: Option<char>) -> Self {
        self.number = number;
        self.insertion_code = insertion_code;
        self
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn insertion_code(&self) -> Option<char> {
        self.insertion_code
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn atom(name: &str) -> Atom {
        Atom::new(name, Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn new_residue_defaults_to_one_based_numbering() {
        let residue = Residue3D::new(4, vec![atom("P"), atom("C4'")]).unwrap();
        assert_eq!(residue.position(), 4);
        assert_eq!(residue.number(), 5);
        assert_eq!(residue.insertion_code(), None);
        assert_eq!(residue.atoms().len(), 2);
        assert!(residue.atom("C4'").is_some());
        assert!(residue.atom("N9").is_none());
    }

    #[test]
    fn with_numbering_overrides_source_numbering() {
        let residue = Residue3D::new(0, vec![atom("P")])
            .unwrap()
            .with_numbering(-3, Some('A'));
        assert_eq!(residue.number(), -3);
        assert_eq!(residue.insertion_code(), Some('A'));
        assert_eq!(residue.position(), 0);
    }

    #[test]
    fn duplicate_atom_names_are_rejected() {
        let err = Residue3D::new(2, vec![atom("P"), atom("OP1"), atom("P")]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateAtom {
                position: 2,
                atom: "P".into()
            }
        );
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let bad = Atom::new("N1", Point3::new(f64::NAN, 0.0, 0.0));
        assert!(matches!(
            Residue3D::new(0, vec![bad]),
            Err(ValidationError::NonFiniteCoordinate { position: 0, .. })
        ));
    }
}
