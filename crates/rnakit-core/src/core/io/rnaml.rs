use super::error::{CapabilityError, FormatError};
use super::traits::StructureFormat;
use super::xml::{self, Element};
use crate::core::models::base_pair::{BasePair, Edge, Orientation};
use crate::core::models::error::ValidationError;
use crate::core::models::molecule::Molecule;
use crate::core::models::secondary::SecondaryStructure;
use crate::core::models::tertiary::{TertiaryStructure, TertiaryStructureBuilder};
use nalgebra::Point3;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

const RNAML_VERSION: &str = "1.1";
const DOCTYPE: &str = "<!DOCTYPE rnaml SYSTEM \"rnaml.dtd\">";

/// One `<molecule>` of an RNAML document: the RNA plus whatever structure
/// levels the document annotates for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RnamlEntry {
    pub molecule: Arc<Molecule>,
    pub secondary: Option<SecondaryStructure>,
    pub tertiary: Option<TertiaryStructure>,
}

impl RnamlEntry {
    pub fn new(molecule: Arc<Molecule>) -> Self {
        Self {
            molecule,
            secondary: None,
            tertiary: None,
        }
    }

    pub fn from_secondary(secondary: SecondaryStructure) -> Self {
        Self {
            molecule: Arc::clone(secondary.rna()),
            secondary: Some(secondary),
            tertiary: None,
        }
    }

    pub fn from_tertiary(tertiary: TertiaryStructure) -> Self {
        Self {
            molecule: Arc::clone(tertiary.molecule()),
            secondary: None,
            tertiary: Some(tertiary),
        }
    }
}

fn schema_error(element: &Element, details: impl Into<String>) -> FormatError {
    FormatError::Schema {
        line: element.line,
        element: element.name.clone(),
        details: details.into(),
    }
}

fn required<'a>(parent: &'a Element, name: &str) -> Result<&'a Element, FormatError> {
    parent
        .child(name)
        .ok_or_else(|| schema_error(parent, format!("missing required element <{name}>")))
}

/// Reads the 0-based position of `<base-id>/<position>` (stored 1-based).
fn base_position(base_id: &Element) -> Result<usize, FormatError> {
    let position = required(base_id, "position")?;
    let text = position.text();
    match text.trim().parse::<usize>() {
        Ok(value) if value >= 1 => Ok(value - 1),
        _ => Err(schema_error(
            position,
            format!("'{}' is not a 1-based position", text.trim()),
        )),
    }
}

fn parse_edge(parent: &Element, name: &str) -> Result<Edge, FormatError> {
    match parent.child(name) {
        None => Ok(Edge::WatsonCrick),
        Some(element) => element
            .text()
            .parse()
            .map_err(|_| schema_error(element, format!("unknown edge '{}'", element.text().trim()))),
    }
}

fn parse_base_pair(element: &Element) -> Result<BasePair, FormatError> {
    let i = base_position(required(required(element, "base-id-5p")?, "base-id")?)?;
    let j = base_position(required(required(element, "base-id-3p")?, "base-id")?)?;
    let edge_i = parse_edge(element, "edge-5p")?;
    let edge_j = parse_edge(element, "edge-3p")?;
    let orientation = match element.child("bond-orientation") {
        None => Orientation::Cis,
        Some(child) => child.text().parse().map_err(|_| {
            schema_error(child, format!("unknown orientation '{}'", child.text().trim()))
        })?,
    };
    Ok(BasePair::new(i, j, edge_i, edge_j, orientation))
}

fn parse_coordinates(element: &Element) -> Result<Point3<f64>, FormatError> {
    let text = element.text();
    let values: Vec<f64> = text
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| schema_error(element, format!("invalid coordinates '{}'", text.trim())))?;
    match values.as_slice() {
        &[x, y, z] => Ok(Point3::new(x, y, z)),
        _ => Err(schema_error(
            element,
            format!("expected three coordinates, found {}", values.len()),
        )),
    }
}

fn model_error(element: &Element) -> impl Fn(ValidationError) -> FormatError + use<> {
    let line = element.line;
    move |source| FormatError::Model { line, source }
}

fn parse_molecule(element: &Element) -> Result<RnamlEntry, FormatError> {
    let id = element
        .attr("id")
        .ok_or_else(|| schema_error(element, "missing required attribute 'id'"))?;
    let identity = element.child("identity");
    let name = identity
        .and_then(|identity| identity.child("name"))
        .map(|name| name.text().trim().to_string())
        .unwrap_or_else(|| id.to_string());
    let organism = identity
        .and_then(|identity| identity.child("taxonomy"))
        .and_then(|taxonomy| taxonomy.child("scientific-name"))
        .map(|name| name.text().trim().to_string())
        .unwrap_or_default();

    let sequence_element = required(element, "sequence")?;
    let sequence: String = required(sequence_element, "seq-data")?
        .text()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if let Some(length) = sequence_element.attr("length") {
        let declared = sequence.chars().count();
        if length.trim().parse::<usize>() != Ok(declared) {
            return Err(schema_error(
                sequence_element,
                format!("length '{length}' does not match the {declared} residues of <seq-data>"),
            ));
        }
    }

    let molecule = Arc::new(
        Molecule::rna(name, organism, &sequence, BTreeMap::new()).map_err(model_error(element))?,
    );
    let mut entry = RnamlEntry::new(Arc::clone(&molecule));

    let Some(model) = element.child("structure").and_then(|s| s.child("model")) else {
        return Ok(entry);
    };

    let annotations: Vec<&Element> = model.children_named("str-annotation").collect();
    if let Some(first) = annotations.first() {
        let pairs = annotations
            .iter()
            .copied()
            .flat_map(|annotation| annotation.children_named("base-pair"))
            .map(parse_base_pair)
            .collect::<Result<Vec<_>, _>>()?;
        let secondary =
            SecondaryStructure::new(Arc::clone(&molecule), pairs).map_err(model_error(first))?;
        entry.secondary = Some(secondary);
    }

    let bases: Vec<&Element> = model.children_named("base").collect();
    if !bases.is_empty() {
        let mut builder = TertiaryStructureBuilder::new(Arc::clone(&molecule));
        for base in &bases {
            builder.start_residue(base_position(base)?);
            for atom in base.children_named("atom") {
                let atom_type = required(atom, "atom-type")?.text();
                let coordinates = parse_coordinates(required(atom, "coordinates")?)?;
                builder.add_atom(atom_type.trim(), coordinates);
            }
        }
        entry.tertiary = Some(builder.build().map_err(model_error(model))?);
    }

    Ok(entry)
}

fn position_element(position: usize) -> Element {
    Element::text_element("position", position + 1)
}

fn base_id(name: &str, position: usize) -> Element {
    Element::new(name).with_child(Element::new("base-id").with_child(position_element(position)))
}

fn molecule_element(index: usize, entry: &RnamlEntry) -> Element {
    let molecule = &entry.molecule;
    let id = if molecule.name().is_empty() || molecule.name().contains(char::is_whitespace) {
        format!("m{}", index + 1)
    } else {
        molecule.name().to_string()
    };

    let mut identity = Element::new("identity").with_child(Element::text_element("name", molecule.name()));
    if !molecule.organism().is_empty() {
        identity = identity.with_child(
            Element::new("taxonomy")
                .with_child(Element::text_element("scientific-name", molecule.organism())),
        );
    }

    let mut element = Element::new("molecule")
        .with_attr("id", id)
        .with_child(identity)
        .with_child(
            Element::new("sequence")
                .with_attr("length", molecule.len())
                .with_child(Element::text_element("seq-data", molecule.sequence())),
        );

    if entry.secondary.is_none() && entry.tertiary.is_none() {
        return element;
    }

    let mut model = Element::new("model").with_attr("id", 1);
    if let Some(secondary) = &entry.secondary {
        let annotation = secondary
            .base_pairs()
            .iter()
            .fold(Element::new("str-annotation"), |annotation, pair| {
                annotation.with_child(
                    Element::new("base-pair")
                        .with_child(base_id("base-id-5p", pair.position_i()))
                        .with_child(base_id("base-id-3p", pair.position_j()))
                        .with_child(Element::text_element("edge-5p", pair.edge_i()))
                        .with_child(Element::text_element("edge-3p", pair.edge_j()))
                        .with_child(Element::text_element("bond-orientation", pair.orientation())),
                )
            });
        model = model.with_child(annotation);
    }
    if let Some(tertiary) = &entry.tertiary {
        for residue in tertiary.residues() {
            let mut base = Element::new("base").with_child(position_element(residue.position()));
            if let Some(base_type) = molecule.residue(residue.position()) {
                base = base.with_child(Element::text_element("base-type", base_type));
            }
            for atom in residue.atoms() {
                let p = atom.position;
                base = base.with_child(
                    Element::new("atom")
                        .with_child(Element::text_element("atom-type", &atom.name))
                        .with_child(Element::text_element(
                            "coordinates",
                            format!("{} {} {}", p.x, p.y, p.z),
                        )),
                );
            }
            model = model.with_child(base);
        }
    }

    element.with_child(Element::new("structure").with_child(model))
}

/// RNAML codec (XML).
///
/// Reads `<rnaml>/<molecule>` elements: identity and taxonomy, the sequence,
/// base pairs from `<str-annotation>` and atomic coordinates from `<base>`,
/// both taken from the first `<structure>/<model>`.
///
/// Bases are identified by sequence position only: PDB chain ids, author
/// residue numbering and titles are not written, and read back as their
/// defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RnamlFormat;

impl RnamlFormat {
    pub fn new() -> Self {
        Self
    }
}

impl StructureFormat for RnamlFormat {
    type Model = Vec<RnamlEntry>;
    const NAME: &'static str = "RNAML";

    #[instrument(skip_all, name = "rnaml_parse")]
    fn parse(&self, text: &str) -> Result<Self::Model, FormatError> {
        let root = xml::parse(text)?;
        if root.name != "rnaml" {
            return Err(schema_error(&root, "root element must be <rnaml>"));
        }
        let entries = root
            .children_named("molecule")
            .map(parse_molecule)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(molecules = entries.len(), "Parsed RNAML document.");
        Ok(entries)
    }

    #[instrument(skip_all, name = "rnaml_serialize")]
    fn serialize(&self, model: &Self::Model) -> Result<String, CapabilityError> {
        let root = model
            .iter()
            .enumerate()
            .fold(Element::new("rnaml").with_attr("version", RNAML_VERSION), |root, (index, entry)| {
                root.with_child(molecule_element(index, entry))
            });
        Ok(xml::write_document(&root, Some(DOCTYPE)))
    }
}
