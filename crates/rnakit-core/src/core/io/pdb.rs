use super::config::PdbConfig;
use super::error::{CapabilityError, FormatError};
use super::traits::StructureFormat;
use crate::core::models::modified::canonical_base;
use crate::core::models::molecule::Molecule;
use crate::core::models::tertiary::{TertiaryStructure, TertiaryStructureBuilder};
use nalgebra::Point3;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

const UNKNOWN_RESIDUE: char = '_';
const GAP: char = '-';
const UNKNOWN_RESIDUE_NAME: &str = "UNK";
const MAX_SERIAL: usize = 100_000;
/// Text columns 11-80 of a `TITLE` record, less the leading space of
/// continuation lines.
const TITLE_WIDTH: usize = 69;
const MAX_TITLE_RECORDS: usize = 99;

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end)
        .or_else(|| line.get(start..))
        .unwrap_or("")
        .trim()
}

fn column(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

fn parse_field<T: std::str::FromStr>(
    line: &str,
    line_num: usize,
    (start, end): (usize, usize),
    field: &'static str,
    columns: &'static str,
) -> Result<T, FormatError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| FormatError::RecordFormat {
        line: line_num,
        field,
        columns,
        value: value.to_string(),
    })
}

/// Word-wraps `title` into `TITLE` records, numbering continuation lines
/// from 2.
fn title_records(title: &str) -> Result<Vec<String>, CapabilityError> {
    let overflow = |details: String| CapabilityError::TitleOverflow {
        format: PdbFormat::NAME,
        details,
    };
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in title.split_whitespace() {
        if word.len() > TITLE_WIDTH {
            return Err(overflow(format!(
                "word '{word}' is longer than {TITLE_WIDTH} columns"
            )));
        }
        if !current.is_empty() && current.len() + 1 + word.len() > TITLE_WIDTH {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.len() > MAX_TITLE_RECORDS {
        return Err(overflow(format!(
            "{} records needed, at most {MAX_TITLE_RECORDS} allowed",
            lines.len()
        )));
    }

    Ok(lines
        .iter()
        .enumerate()
        .map(|(idx, text)| match idx {
            0 => format!("TITLE     {text}\n"),
            _ => format!("TITLE   {:>2} {text}\n", idx + 1),
        })
        .collect())
}

struct AtomRecord {
    hetero: bool,
    name: String,
    residue_name: String,
    chain_id: char,
    number: i32,
    insertion_code: Option<char>,
    position: Point3<f64>,
}

fn parse_atom_record(line: &str, line_num: usize, config: &PdbConfig) -> Result<AtomRecord, FormatError> {
    let mut name = slice_and_trim(line, 12, 16).to_string();
    if name.is_empty() {
        return Err(FormatError::RecordFormat {
            line: line_num,
            field: "atom name",
            columns: "13-16",
            value: name,
        });
    }
    if config.legacy_atom_names {
        name = name.replace('*', "'");
    }

    let number = parse_field(line, line_num, (22, 26), "residue number", "23-26")?;
    let x = parse_field(line, line_num, (30, 38), "x coordinate", "31-38")?;
    let y = parse_field(line, line_num, (38, 46), "y coordinate", "39-46")?;
    let z = parse_field(line, line_num, (46, 54), "z coordinate", "47-54")?;

    Ok(AtomRecord {
        hetero: slice_and_trim(line, 0, 6) == "HETATM",
        name,
        residue_name: slice_and_trim(line, 17, 20).to_string(),
        chain_id: column(line, 21).unwrap_or(' '),
        number,
        insertion_code: column(line, 26),
        position: Point3::new(x, y, z),
    })
}

struct ResidueRecords {
    number: i32,
    insertion_code: Option<char>,
    hetero: bool,
    name: String,
    atoms: Vec<(String, Point3<f64>)>,
}

struct ChainRecords {
    model: usize,
    chain_id: char,
    line: usize,
    closed: bool,
    residues: Vec<ResidueRecords>,
}

impl ChainRecords {
    fn add_atom(&mut self, record: AtomRecord, line_num: usize) {
        let starts_residue = self.residues.last().is_none_or(|last| {
            (last.number, last.insertion_code) != (record.number, record.insertion_code)
        });
        if starts_residue {
            self.residues.push(ResidueRecords {
                number: record.number,
                insertion_code: record.insertion_code,
                hetero: record.hetero,
                name: record.residue_name,
                atoms: Vec::new(),
            });
        }
        let Some(residue) = self.residues.last_mut() else {
            return;
        };
        if residue.atoms.iter().any(|(name, _)| *name == record.name) {
            // Alternate locations: the first conformer wins.
            debug!(
                line = line_num,
                atom = %record.name,
                residue = residue.number,
                "Skipping repeated atom record."
            );
            return;
        }
        residue.atoms.push((record.name, record.position));
    }

    fn finish(self) -> Result<TertiaryStructure, FormatError> {
        let mut sequence = String::with_capacity(self.residues.len());
        let mut modified_residues = BTreeMap::new();
        for (position, residue) in self.residues.iter().enumerate() {
            match canonical_base(&residue.name) {
                Some((base, false)) => sequence.push(base),
                Some((base, true)) => {
                    sequence.push(base);
                    modified_residues.insert(position, residue.name.clone());
                }
                // Plain ATOM records named UNK are unlabelled unknown residues.
                None if !residue.hetero && residue.name.eq_ignore_ascii_case(UNKNOWN_RESIDUE_NAME) => {
                    sequence.push(UNKNOWN_RESIDUE);
                }
                None => {
                    debug!(
                        residue = %residue.name,
                        number = residue.number,
                        "Unrecognized residue stored as unknown."
                    );
                    sequence.push(UNKNOWN_RESIDUE);
                    modified_residues.insert(position, residue.name.clone());
                }
            }
        }

        let line = self.line;
        let model_error = move |source| FormatError::Model { line, source };
        let name = self.chain_id.to_string();
        let molecule = Molecule::rna(name.trim(), "", &sequence, modified_residues).map_err(model_error)?;

        let mut builder = TertiaryStructureBuilder::new(Arc::new(molecule));
        builder.chain_id(self.chain_id);
        for (position, residue) in self.residues.into_iter().enumerate() {
            builder.start_numbered_residue(position, residue.number, residue.insertion_code);
            for (name, point) in residue.atoms {
                builder.add_atom(&name, point);
            }
        }
        builder.build().map_err(model_error)
    }
}

/// Fixed-column PDB codec for `ATOM`/`HETATM` records.
///
/// Each chain becomes one [`TertiaryStructure`] whose sequence is derived from
/// the residue names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdbFormat {
    config: PdbConfig,
}

impl PdbFormat {
    pub fn new(config: PdbConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PdbConfig {
        &self.config
    }

    fn write_chain(
        &self,
        out: &mut String,
        structure: &TertiaryStructure,
        serial: &mut usize,
    ) -> Result<(), CapabilityError> {
        let molecule = structure.molecule();
        let chain_id = structure.chain_id();
        let mut last = None;

        for residue in structure.residues() {
            let position = residue.position();
            let modification = molecule.modification(position);
            let residue_name = match (modification, molecule.residue(position)) {
                (Some(label), _) => label.to_string(),
                (None, Some(GAP)) => {
                    return Err(CapabilityError::GapResidue {
                        format: Self::NAME,
                        position,
                    });
                }
                (None, Some(base)) if base != UNKNOWN_RESIDUE => base.to_string(),
                _ => UNKNOWN_RESIDUE_NAME.to_string(),
            };
            let record = if modification.is_some() { "HETATM" } else { "ATOM" };

            let overflow = |field: &'static str, value: String, width: usize| CapabilityError::FieldOverflow {
                format: Self::NAME,
                field,
                value,
                width,
                position,
            };
            if residue_name.len() > 3 {
                return Err(overflow("residue name", residue_name, 3));
            }
            let number = residue.number();
            if !(-999..=9999).contains(&number) {
                return Err(overflow("residue number", number.to_string(), 4));
            }
            let icode = residue.insertion_code().unwrap_or(' ');

            for atom in residue.atoms() {
                if atom.name.len() > 4 {
                    return Err(overflow("atom name", atom.name.clone(), 4));
                }
                let coordinates = [atom.position.x, atom.position.y, atom.position.z]
                    .map(|value| format!("{value:8.3}"));
                if let Some(value) = coordinates.iter().find(|value| value.len() > 8) {
                    return Err(overflow("coordinate", value.trim().to_string(), 8));
                }

                let atom_name = if atom.name.len() >= 4 {
                    atom.name.clone()
                } else {
                    format!(" {:<3}", atom.name)
                };
                let element = atom
                    .name
                    .chars()
                    .find(char::is_ascii_alphabetic)
                    .unwrap_or(' ');

                *serial = (*serial + 1) % MAX_SERIAL;
                out.push_str(&format!(
                    "{:<6}{:>5} {:<4} {:>3} {}{:>4}{}   {}{}{}{:>6.2}{:>6.2}          {:>2}\n",
                    record,
                    serial,
                    atom_name,
                    residue_name,
                    chain_id,
                    number,
                    icode,
                    coordinates[0],
                    coordinates[1],
                    coordinates[2],
                    1.0,
                    0.0,
                    element
                ));
            }
            last = Some((residue_name, number, icode));
        }

        if let Some((residue_name, number, icode)) = last {
            *serial = (*serial + 1) % MAX_SERIAL;
            out.push_str(&format!(
                "{:<6}{:>5}      {:>3} {}{:>4}{}\n",
                "TER", serial, residue_name, chain_id, number, icode
            ));
        }
        Ok(())
    }
}

impl StructureFormat for PdbFormat {
    type Model = Vec<TertiaryStructure>;
    const NAME: &'static str = "PDB";

    /// Reads every chain of the document.
    ///
    /// `TER` closes a chain; records for a closed chain are ignored until the
    /// next `MODEL`. With `first_model_only`, reading stops at the first
    /// `ENDMDL`. Residue names listed in `ignored_residues` are skipped and a
    /// repeated atom name within a residue keeps its first occurrence.
    #[instrument(skip_all, name = "pdb_parse")]
    fn parse(&self, text: &str) -> Result<Self::Model, FormatError> {
        let mut chains: Vec<ChainRecords> = Vec::new();
        let mut title = String::new();
        let mut model = 0;

        for (idx, line) in text.lines().enumerate() {
            let line_num = idx + 1;
            match slice_and_trim(line, 0, 6) {
                "ATOM" | "HETATM" => {
                    let record = parse_atom_record(line, line_num, &self.config)?;
                    if self.config.is_ignored(&record.residue_name) {
                        trace!(line = line_num, residue = %record.residue_name, "Ignoring residue.");
                        continue;
                    }
                    let existing = chains
                        .iter()
                        .position(|c| c.model == model && c.chain_id == record.chain_id);
                    let chain = match existing {
                        Some(idx) => &mut chains[idx],
                        None => {
                            chains.push(ChainRecords {
                                model,
                                chain_id: record.chain_id,
                                line: line_num,
                                closed: false,
                                residues: Vec::new(),
                            });
                            let last = chains.len() - 1;
                            &mut chains[last]
                        }
                    };
                    if chain.closed {
                        trace!(line = line_num, chain = %chain.chain_id, "Skipping record after TER.");
                        continue;
                    }
                    chain.add_atom(record, line_num);
                }
                "TER" => {
                    let chain_id = column(line, 21);
                    let open = chains.iter_mut().rev().find(|c| {
                        c.model == model && !c.closed && chain_id.is_none_or(|id| id == c.chain_id)
                    });
                    if let Some(chain) = open {
                        chain.closed = true;
                    }
                }
                "TITLE" => {
                    title.push(' ');
                    title.push_str(line.get(10..).unwrap_or(""));
                }
                "MODEL" => model += 1,
                "ENDMDL" if self.config.first_model_only => {
                    debug!(line = line_num, "Ignoring records after the first model.");
                    break;
                }
                "END" => break,
                _ => {}
            }
        }

        let structures = chains
            .into_iter()
            .filter(|chain| !chain.residues.is_empty())
            .map(|chain| chain.finish().map(|structure| structure.with_title(&title)))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(chains = structures.len(), "Parsed PDB data.");
        Ok(structures)
    }

    /// Writes the shared `TITLE`, one `ATOM`/`HETATM` record per atom, a `TER`
    /// record after each chain and a final `END`.
    ///
    /// Modified residues are written as `HETATM` under their recorded name.
    ///
    /// # Errors
    ///
    /// Besides [`CapabilityError::FieldOverflow`], fails with
    /// [`CapabilityError::DuplicateChain`] when two structures share a chain
    /// id and [`CapabilityError::ConflictingTitles`] when their titles differ.
    #[instrument(skip_all, name = "pdb_serialize")]
    fn serialize(&self, model: &Self::Model) -> Result<String, CapabilityError> {
        let title = model.first().and_then(TertiaryStructure::title);
        if let Some(other) = model.iter().find(|structure| structure.title() != title) {
            return Err(CapabilityError::ConflictingTitles {
                format: Self::NAME,
                first: title.unwrap_or_default().to_string(),
                second: other.title().unwrap_or_default().to_string(),
            });
        }
        let mut chain_ids = BTreeSet::new();
        if let Some(duplicate) = model
            .iter()
            .map(TertiaryStructure::chain_id)
            .find(|&chain_id| !chain_ids.insert(chain_id))
        {
            return Err(CapabilityError::DuplicateChain {
                format: Self::NAME,
                chain_id: duplicate,
            });
        }

        let mut out = String::new();
        if let Some(title) = title {
            for record in title_records(title)? {
                out.push_str(&record);
            }
        }
        let mut serial = 0;
        for structure in model {
            if structure.residues().is_empty() {
                warn!(chain = %structure.chain_id(), "Chain has no modeled residues.");
            }
            self.write_chain(&mut out, structure, &mut serial)?;
        }
        out.push_str("END\n");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::residue::Residue3D;

    const TWO_CHAINS: &str = "\
HEADER    RNA                                     01-JAN-00   1ABC
ATOM      1  P     G A   1      10.000  20.000  30.000  1.00  0.00           P
ATOM      2  C1*   G A   1      11.500  -2.250   0.125  1.00  0.00           C
HETATM    3  N1  PSU A   2       1.000   2.000   3.000  1.00  0.00           N
ATOM      4  P  A  C A   3       4.000   5.000   6.000  1.00  0.00           P
ATOM      5  P  B  C A   3       4.500   5.500   6.500  1.00  0.00           P
ATOM      6  P     A A   3A      7.000   8.000   9.000  1.00  0.00           P
TER       7        A A   3A
HETATM    8  O   HOH A 101       0.000   0.000   0.000  1.00  0.00           O
ATOM      9  P     U B   5      -1.000  -2.000  -3.000  1.00  0.00           P
ATOM     10  CA  GLY B   6       1.000   1.000   1.000  1.00  0.00           C
END
";

    fn structure(seq: &str, mods: BTreeMap<usize, String>, residues: Vec<Residue3D>) -> TertiaryStructure {
        let molecule = Arc::new(Molecule::rna("A", "", seq, mods).unwrap());
        TertiaryStructure::new(molecule, residues).unwrap()
    }

    fn atom(name: &str, x: f64, y: f64, z: f64) -> Atom {
        Atom::new(name, Point3::new(x, y, z))
    }

    #[test]
    fn parse_splits_chains_and_resolves_residue_names() {
        let structures = PdbFormat::default().parse(TWO_CHAINS).unwrap();
        assert_eq!(structures.len(), 2);

        let a = &structures[0];
        assert_eq!(a.chain_id(), 'A');
        assert_eq!(a.molecule().name(), "A");
        assert_eq!(a.molecule().sequence(), "GUCA");
        assert_eq!(a.molecule().modification(1), Some("PSU"));
        assert_eq!(a.residues().len(), 4);
        assert_eq!(a.residues()[3].number(), 3);
        assert_eq!(a.residues()[3].insertion_code(), Some('A'));

        let b = &structures[1];
        assert_eq!(b.chain_id(), 'B');
        assert_eq!(b.molecule().sequence(), "U_");
        assert_eq!(b.molecule().modification(1), Some("GLY"));
        assert_eq!(b.residues()[0].number(), 5);
    }

    #[test]
    fn parse_reads_fixed_columns_and_legacy_names() {
        let structures = PdbFormat::default().parse(TWO_CHAINS).unwrap();
        let residue = &structures[0].residues()[0];
        let c1 = residue.atom("C1'").unwrap();
        assert_eq!(c1.position, Point3::new(11.5, -2.25, 0.125));
        assert!(residue.atom("C1*").is_none());

        let config = PdbConfig {
            legacy_atom_names: false,
            ..PdbConfig::default()
        };
        let structures = PdbFormat::new(config).parse(TWO_CHAINS).unwrap();
        assert!(structures[0].residues()[0].atom("C1*").is_some());
    }

    #[test]
    fn alternate_locations_keep_the_first_atom() {
        let structures = PdbFormat::default().parse(TWO_CHAINS).unwrap();
        let residue = &structures[0].residues()[2];
        assert_eq!(residue.atoms().len(), 1);
        assert_eq!(residue.atom("P").unwrap().position, Point3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn ignored_residues_and_records_after_ter_are_skipped() {
        let config = PdbConfig {
            ignored_residues: Vec::new(),
            ..PdbConfig::default()
        };
        let structures = PdbFormat::new(config).parse(TWO_CHAINS).unwrap();
        // HOH follows the TER of chain A, so it is still dropped.
        assert_eq!(structures[0].residues().len(), 4);
    }

    #[test]
    fn malformed_coordinate_reports_columns() {
        let text = "ATOM      1  P     G A   1      1O.000  20.000  30.000  1.00  0.00           P\n";
        let err = PdbFormat::default().parse(text).unwrap_err();
        assert_eq!(
            err,
            FormatError::RecordFormat {
                line: 1,
                field: "x coordinate",
                columns: "31-38",
                value: "1O.000".into()
            }
        );

        let truncated = "ATOM      1  P     G A   1      10.000  20.000\n";
        assert!(matches!(
            PdbFormat::default().parse(truncated),
            Err(FormatError::RecordFormat {
                field: "z coordinate",
                ..
            })
        ));
    }

    #[test]
    fn only_the_first_model_is_read_by_default() {
        let text = "\
MODEL        1
ATOM      1  P     G A   1       1.000   1.000   1.000  1.00  0.00           P
ENDMDL
MODEL        2
ATOM      1  P     G A   1       2.000   2.000   2.000  1.00  0.00           P
ENDMDL
";
        assert_eq!(PdbFormat::default().parse(text).unwrap().len(), 1);

        let config = PdbConfig {
            first_model_only: false,
            ..PdbConfig::default()
        };
        let structures = PdbFormat::new(config).parse(text).unwrap();
        assert_eq!(structures.len(), 2);
        assert_eq!(
            structures[1].residues()[0].atom("P").unwrap().position,
            Point3::new(2.0, 2.0, 2.0)
        );
    }

    #[test]
    fn serialize_writes_fixed_columns() {
        let residues = vec![
            Residue3D::new(0, vec![atom("P", 10.0, 20.0, 30.0), atom("C1'", 11.5, -2.25, 0.125)]).unwrap(),
            Residue3D::new(1, vec![atom("N1", 1.0, 2.0, 3.0)]).unwrap(),
        ];
        let mods = BTreeMap::from([(1, "PSU".to_string())]);
        let text = PdbFormat::default()
            .serialize(&vec![structure("GU", mods, residues)])
            .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "ATOM      1  P     G A   1      10.000  20.000  30.000  1.00  0.00           P"
        );
        assert_eq!(
            lines[1],
            "ATOM      2  C1'   G A   1      11.500  -2.250   0.125  1.00  0.00           C"
        );
        assert_eq!(
            lines[2],
            "HETATM    3  N1  PSU A   2       1.000   2.000   3.000  1.00  0.00           N"
        );
        assert_eq!(lines[3], "TER       4      PSU A   2 ");
        assert_eq!(lines[4], "END");
    }

    #[test]
    fn serialize_then_parse_preserves_coordinates_to_three_decimals() {
        let residues = vec![
            Residue3D::new(0, vec![atom("P", 1.23456, -7.891011, 100.0004)]).unwrap(),
            Residue3D::new(2, vec![atom("O5'", -0.0004, 2.5, 3.14159)]).unwrap(),
        ];
        let original = structure("GAC", BTreeMap::new(), residues);
        let format = PdbFormat::default();
        let parsed = format.parse(&format.serialize(&vec![original.clone()]).unwrap()).unwrap();

        assert_eq!(parsed.len(), 1);
        let parsed = &parsed[0];
        assert_eq!(parsed.residues().len(), 2);
        for (before, after) in original.residues().iter().zip(parsed.residues()) {
            assert_eq!(before.number(), after.number());
            for (a, b) in before.atoms().iter().zip(after.atoms()) {
                assert_eq!(a.name, b.name);
                assert!((a.position - b.position).norm() < 1e-3);
            }
        }
    }

    fn chain(name: &str, seq: &str, mods: BTreeMap<usize, String>) -> TertiaryStructure {
        let residues = (0..seq.len())
            .map(|p| Residue3D::new(p, vec![atom("P", p as f64 + 0.5, -1.25, 2.0)]).unwrap())
            .collect();
        let molecule = Arc::new(Molecule::rna(name, "", seq, mods).unwrap());
        TertiaryStructure::new(molecule, residues).unwrap()
    }

    #[test]
    fn unknown_residues_survive_serialize_then_parse() {
        let format = PdbFormat::default();
        let original = vec![chain("A", "G_C", BTreeMap::new())];
        let text = format.serialize(&original).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("ATOM      2  P   UNK A   2"));
        assert_eq!(format.parse(&text).unwrap(), original);

        let labelled = vec![chain("A", "G_C", BTreeMap::from([(1, "UNK".to_string())]))];
        let text = format.serialize(&labelled).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("HETATM"));
        assert_eq!(format.parse(&text).unwrap(), labelled);
    }

    #[test]
    fn gap_positions_cannot_carry_coordinates() {
        let err = PdbFormat::default()
            .serialize(&vec![chain("A", "G-C", BTreeMap::new())])
            .unwrap_err();
        assert_eq!(err, CapabilityError::GapResidue { format: "PDB", position: 1 });
    }

    #[test]
    fn several_chains_survive_serialize_then_parse() {
        let format = PdbFormat::default();
        let original = vec![
            chain("A", "GGC", BTreeMap::new()),
            chain("B", "GCC", BTreeMap::from([(0, "7MG".to_string())])),
        ];
        let parsed = format.parse(&format.serialize(&original).unwrap()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn chains_sharing_an_id_are_refused() {
        let unnamed = vec![chain("", "GC", BTreeMap::new()), chain("", "AU", BTreeMap::new())];
        let err = PdbFormat::default().serialize(&unnamed).unwrap_err();
        assert_eq!(
            err,
            CapabilityError::DuplicateChain {
                format: "PDB",
                chain_id: 'A'
            }
        );

        let [first, second]: [TertiaryStructure; 2] = unnamed.try_into().unwrap();
        let renamed = vec![first, second.with_chain_id('B')];
        let parsed = PdbFormat::default()
            .parse(&PdbFormat::default().serialize(&renamed).unwrap())
            .unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].chain_id(), 'B');
        assert_eq!(parsed[1].molecule().sequence(), "AU");
    }

    #[test]
    fn title_records_are_joined_and_shared_by_every_chain() {
        let text = "\
TITLE     CRYSTAL STRUCTURE OF YEAST
TITLE    2 PHENYLALANINE  TRNA
ATOM      1  P     G A   1       1.000   1.000   1.000  1.00  0.00           P
ATOM      2  P     C B   1       2.000   2.000   2.000  1.00  0.00           P
END
";
        let structures = PdbFormat::default().parse(text).unwrap();
        assert_eq!(structures.len(), 2);
        for structure in &structures {
            assert_eq!(
                structure.title(),
                Some("CRYSTAL STRUCTURE OF YEAST PHENYLALANINE TRNA")
            );
        }
        assert_eq!(PdbFormat::default().parse(TWO_CHAINS).unwrap()[0].title(), None);
    }

    #[test]
    fn long_titles_wrap_into_continuation_records() {
        let title = "word ".repeat(30);
        let original = vec![chain("A", "GC", BTreeMap::new()).with_title(&title)];
        let format = PdbFormat::default();
        let text = format.serialize(&original).unwrap();

        let records: Vec<&str> = text.lines().filter(|l| l.starts_with("TITLE")).collect();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|record| record.len() <= 80));
        assert!(records[0].starts_with("TITLE     word word"));
        assert!(records[1].starts_with("TITLE    2 word"));
        assert_eq!(format.parse(&text).unwrap(), original);
    }

    #[test]
    fn titles_must_agree_and_fit() {
        let format = PdbFormat::default();
        let mixed = vec![
            chain("A", "GC", BTreeMap::new()).with_title("first"),
            chain("B", "GC", BTreeMap::new()),
        ];
        assert_eq!(
            format.serialize(&mixed).unwrap_err(),
            CapabilityError::ConflictingTitles {
                format: "PDB",
                first: "first".into(),
                second: String::new()
            }
        );

        let long_word = vec![chain("A", "GC", BTreeMap::new()).with_title(&"x".repeat(70))];
        assert!(matches!(
            format.serialize(&long_word),
            Err(CapabilityError::TitleOverflow { .. })
        ));
    }

    #[test]
    fn values_wider_than_their_columns_overflow() {
        let residues = vec![Residue3D::new(0, vec![atom("P", 123456.0, 0.0, 0.0)]).unwrap()];
        let err = PdbFormat::default()
            .serialize(&vec![structure("G", BTreeMap::new(), residues)])
            .unwrap_err();
        assert!(matches!(
            err,
            CapabilityError::FieldOverflow {
                field: "coordinate",
                width: 8,
                position: 0,
                ..
            }
        ));

        let residues = vec![Residue3D::new(0, vec![atom("P", 0.0, 0.0, 0.0)])
            .unwrap()
            .with_numbering(12345, None)];
        let err = PdbFormat::default()
            .serialize(&vec![structure("G", BTreeMap::new(), residues)])
            .unwrap_err();
        assert!(matches!(
            err,
            CapabilityError::FieldOverflow {
                field: "residue number",
                ..
            }
        ));
    }
}
