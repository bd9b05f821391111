use super::atom::Atom;
use super::error::ValidationError;
use super::location::Location;
use super::molecule::Molecule;
use super::residue::Residue3D;
use nalgebra::Point3;
use std::sync::Arc;

/// Atomic coordinates for the modeled residues of one molecule (one chain).
///
/// Residues are ordered by strictly increasing position; unmodeled
/// positions (gaps, disordered residues) are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct TertiaryStructure {
    molecule: Arc<Molecule>,
    chain_id: char,
    title: Option<String>,
    residues: Vec<Residue3D>,
}

impl TertiaryStructure {
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownResidue`] if a residue position is
    /// not an index into the molecule's sequence, and
    /// [`ValidationError::PositionOrder`] if positions are not strictly
    /// increasing.
    pub fn new(molecule: Arc<Molecule>, residues: Vec<Residue3D>) -> Result<Self, ValidationError> {
        let length = molecule.len();
        let mut previous: Option<usize> = None;
        for residue in &residues {
            let position = residue.position();
            if position >= length {
                return Err(ValidationError::UnknownResidue { position, length });
            }
            match previous {
                Some(previous) if previous >= position => {
                    return Err(ValidationError::PositionOrder { previous, position });
                }
                _ => {}
            }
            previous = Some(position);
        }

        let chain_id = molecule
            .name()
            .chars()
            .next()
            .filter(char::is_ascii_alphanumeric)
            .unwrap_or('A');
        Ok(Self {
            molecule,
            chain_id,
            title: None,
            residues,
        })
    }

    /// Sets the chain identifier written to and read from PDB records.
    pub fn with_chain_id(mut self, chain_id: char) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Sets the descriptive title. Whitespace runs collapse to one space and a
    /// blank title clears it.
    pub fn with_title(mut self, title: &str) -> Self {
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
        self.title = (!title.is_empty()).then_some(title);
        self
    }

    pub fn molecule(&self) -> &Arc<Molecule> {
        &self.molecule
    }

    pub fn chain_id(&self) -> char {
        self.chain_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn residues(&self) -> &[Residue3D] {
        &self.residues
    }

    pub fn residue(&self, position: usize) -> Option<&Residue3D> {
        self.residues
            .binary_search_by_key(&position, Residue3D::position)
            .ok()
            .map(|idx| &self.residues[idx])
    }

    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|r| r.atoms().len()).sum()
    }

    /// Positions that carry coordinates.
    pub fn modeled_positions(&self) -> Location {
        Location::from_positions(self.residues.iter().map(Residue3D::position))
    }

    /// Euclidean distance between two named atoms.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ResidueNotModeled`] if a position has no
    /// coordinates and [`ValidationError::AtomNotFound`] if the residue
    /// lacks the requested atom.
    pub fn distance(
        &self,
        pos_a: usize,
        atom_name_a: &str,
        pos_b: usize,
        atom_name_b: &str,
    ) -> Result<f64, ValidationError> {
        let a = self.find_atom(pos_a, atom_name_a)?;
        let b = self.find_atom(pos_b, atom_name_b)?;
        Ok(a.distance_to(b))
    }

    /// A copy holding only the residues whose position lies in `location`.
    pub fn restrict(&self, location: &Location) -> TertiaryStructure {
        Self {
            molecule: Arc::clone(&self.molecule),
            chain_id: self.chain_id,
            title: self.title.clone(),
            residues: self
                .residues
                .iter()
                .filter(|r| location.contains(r.position()))
                .cloned()
                .collect(),
        }
    }

    fn find_atom(&self, position: usize, atom_name: &str) -> Result<&Atom, ValidationError> {
        let residue = self
            .residue(position)
            .ok_or(ValidationError::ResidueNotModeled { position })?;
        residue
            .atom(atom_name)
            .ok_or_else(|| ValidationError::AtomNotFound {
                position,
                atom: atom_name.to_string(),
            })
    }
}

struct PendingResidue {
    position: usize,
    number: Option<(i32, Option<char>)>,
    atoms: Vec<Atom>,
}

/// Incremental construction of a [`TertiaryStructure`].
///
/// Residues are opened with [`start_residue`](Self::start_residue) and filled
/// with [`add_atom`](Self::add_atom); nothing is validated until
/// [`build`](Self::build).
pub struct TertiaryStructureBuilder {
    molecule: Arc<Molecule>,
    chain_id: Option<char>,
    residues: Vec<PendingResidue>,
    orphan_atom: Option<String>,
}

impl TertiaryStructureBuilder {
    pub fn new(molecule: Arc<Molecule>) -> Self {
        Self {
            molecule,
            chain_id: None,
            residues: Vec::new(),
            orphan_atom: None,
        }
    }

    pub fn chain_id(&mut self, chain_id: char) -> &mut Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn start_residue(&mut self, position: usize) -> &mut Self {
        self.residues.push(PendingResidue {
            position,
            number: None,
            atoms: Vec::new(),
        });
        self
    }

    pub fn start_numbered_residue(
        &mut self,
        position: usize,
        number: i32,
        insertion_code: Option<char>,
    ) -> &mut Self {
        self.residues.push(PendingResidue {
            position,
            number: Some((number, insertion_code)),
            atoms: Vec::new(),
        });
        self
    }

    /// Adds an atom to the most recently started residue.
    pub fn add_atom(&mut self, name: &str, position: Point3<f64>) -> &mut Self {
        match self.residues.last_mut() {
            Some(residue) => residue.atoms.push(Atom::new(name, position)),
            None => {
                self.orphan_atom.get_or_insert_with(|| name.to_string());
            }
        }
        self
    }

    pub fn build(self) -> Result<TertiaryStructure, ValidationError> {
        if let Some(atom) = self.orphan_atom {
            return Err(ValidationError::NoCurrentResidue { atom });
        }
        let residues = self
            .residues
            .into_iter()
            .map(|pending| {
                let residue = Residue3D::new(pending.position, pending.atoms)?;
                Ok(match pending.number {
                    Some((number, insertion_code)) => residue.with_numbering(number, insertion_code),
                    None => residue,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let structure = TertiaryStructure::new(self.molecule, residues)?;
        Ok(match self.chain_id {
            Some(chain_id) => structure.with_chain_id(chain_id),
            None => structure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn rna(seq: &str) -> Arc<Molecule> {
        Arc::new(Molecule::rna("A", "", seq, BTreeMap::new()).unwrap())
    }

    fn residue(position: usize, atoms: &[(&str, [f64; 3])]) -> Residue3D {
        let atoms = atoms
            .iter()
            .map(|(name, [x, y, z])| Atom::new(name, Point3::new(*x, *y, *z)))
            .collect();
        Residue3D::new(position, atoms).unwrap()
    }

    #[test]
    fn residues_must_be_strictly_increasing() {
        let residues = vec![
            residue(0, &[("P", [0.0; 3])]),
            residue(2, &[("P", [0.0; 3])]),
            residue(1, &[("P", [0.0; 3])]),
        ];
        let err = TertiaryStructure::new(rna("GAC"), residues).unwrap_err();
        assert_eq!(
            err,
            ValidationError::PositionOrder {
                previous: 2,
                position: 1
            }
        );

        let repeated = vec![residue(1, &[("P", [0.0; 3])]), residue(1, &[("C1'", [0.0; 3])])];
        assert!(matches!(
            TertiaryStructure::new(rna("GAC"), repeated),
            Err(ValidationError::PositionOrder { .. })
        ));
    }

    #[test]
    fn positions_must_index_the_molecule() {
        let err = TertiaryStructure::new(rna("GA"), vec![residue(2, &[("P", [0.0; 3])])]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownResidue {
                position: 2,
                length: 2
            }
        );
    }

    #[test]
    fn gaps_in_modeled_residues_are_allowed() {
        let ts = TertiaryStructure::new(
            rna("GAUCC"),
            vec![residue(0, &[("P", [0.0; 3])]), residue(3, &[("P", [1.0; 3])])],
        )
        .unwrap();
        assert_eq!(ts.chain_id(), 'A');
        assert!(ts.residue(3).is_some());
        assert!(ts.residue(1).is_none());
        assert_eq!(ts.modeled_positions().blocks().len(), 2);
        assert_eq!(ts.atom_count(), 2);
    }

    #[test]
    fn distance_between_named_atoms() {
        let ts = TertiaryStructure::new(
            rna("GC"),
            vec![
                residue(0, &[("N1", [0.0, 0.0, 0.0])]),
                residue(1, &[("N3", [0.0, 3.0, 4.0])]),
            ],
        )
        .unwrap();
        let d = ts.distance(0, "N1", 1, "N3").unwrap();
        assert!((d - 5.0).abs() < 1e-12);

        assert_eq!(
            ts.distance(0, "N1", 1, "O6").unwrap_err(),
            ValidationError::AtomNotFound {
                position: 1,
                atom: "O6".into()
            }
        );
        assert_eq!(
            ts.distance(0, "N1", 5, "N3").unwrap_err(),
            ValidationError::ResidueNotModeled { position: 5 }
        );
    }

    #[test]
    fn restrict_keeps_residues_inside_the_location() {
        let ts = TertiaryStructure::new(
            rna("GAUCC"),
            (0..5).map(|p| residue(p, &[("P", [p as f64; 3])])).collect(),
        )
        .unwrap()
        .with_title("Yeast  tRNA\n phenylalanine");
        assert_eq!(ts.title(), Some("Yeast tRNA phenylalanine"));
        let subset = ts.restrict(&Location::from_positions([1, 2, 4]));
        let positions: Vec<_> = subset.residues().iter().map(Residue3D::position).collect();
        assert_eq!(positions, vec![1, 2, 4]);
        assert_eq!(subset.molecule(), ts.molecule());
        assert_eq!(subset.title(), ts.title());
        assert_eq!(ts.with_title("  ").title(), None);
    }

    #[test]
    fn builder_groups_atoms_by_started_residue() {
        let mut builder = TertiaryStructureBuilder::new(rna("GAC"));
        builder
            .chain_id('B')
            .start_numbered_residue(0, 10, None)
            .add_atom("P", Point3::new(1.0, 2.0, 3.0))
            .add_atom("C1'", Point3::new(2.0, 2.0, 3.0))
            .start_residue(2)
            .add_atom("P", Point3::new(4.0, 2.0, 3.0));
        let ts = builder.build().unwrap();
        assert_eq!(ts.chain_id(), 'B');
        assert_eq!(ts.residues().len(), 2);
        assert_eq!(ts.residues()[0].number(), 10);
        assert_eq!(ts.residues()[0].atoms().len(), 2);
        assert_eq!(ts.residues()[1].number(), 3);
    }

    #[test]
    fn builder_reports_atoms_without_residue() {
        let mut builder = TertiaryStructureBuilder::new(rna("GAC"));
        builder.add_atom("P", Point3::origin());
        assert_eq!(
            builder.build().unwrap_err(),
            ValidationError::NoCurrentResidue { atom: "P".into() }
        );
    }
}
