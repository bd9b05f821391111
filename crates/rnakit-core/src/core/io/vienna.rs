use super::error::{CapabilityError, FormatError};
use super::fasta::{header_for, split_header};
use super::traits::StructureFormat;
use crate::core::models::base_pair::BasePair;
use crate::core::models::molecule::Molecule;
use crate::core::models::secondary::SecondaryStructure;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Bracket kinds in nesting-preference order: `()` for the main structure,
/// the others for pseudoknotted helices.
const BRACKET_KINDS: [(char, char); 4] = [('(', ')'), ('[', ']'), ('{', '}'), ('<', '>')];
const UNPAIRED: char = '.';

fn is_bracket_token(token: &str) -> bool {
    token.chars().all(|c| {
        c == UNPAIRED
            || BRACKET_KINDS
                .iter()
                .any(|&(open, close)| c == open || c == close)
    })
}

#[derive(Default)]
struct Record {
    line: usize,
    header: Option<String>,
    sequence: String,
    brackets: String,
    brackets_line: Option<usize>,
}

impl Record {
    fn finish(self) -> Result<SecondaryStructure, FormatError> {
        let (name, organism) = self.header.as_deref().map(split_header).unwrap_or(("", ""));
        if self.sequence.is_empty() {
            return Err(FormatError::EmptyRecord {
                format: ViennaFormat::NAME,
                line: self.line,
                name: name.to_string(),
            });
        }

        let bracket_line = self.brackets_line.unwrap_or(self.line);
        let sequence_length = self.sequence.chars().count();
        let bracket_length = self.brackets.chars().count();
        if sequence_length != bracket_length {
            return Err(FormatError::LengthMismatch {
                line: bracket_line,
                sequence: sequence_length,
                brackets: bracket_length,
            });
        }

        let pairs = match_brackets(&self.brackets, bracket_line)?;
        let line = self.line;
        let model_error = move |source| FormatError::Model { line, source };
        let rna = Molecule::rna(name, organism, &self.sequence, BTreeMap::new()).map_err(model_error)?;
        SecondaryStructure::new(Arc::new(rna), pairs).map_err(model_error)
    }
}

/// Pairs every closing bracket with the latest unmatched opening bracket of
/// the same kind.
fn match_brackets(brackets: &str, line: usize) -> Result<Vec<BasePair>, FormatError> {
    let mut stacks: [Vec<usize>; BRACKET_KINDS.len()] = Default::default();
    let mut pairs = Vec::new();

    for (position, c) in brackets.chars().enumerate() {
        if c == UNPAIRED {
            continue;
        }
        if let Some(kind) = BRACKET_KINDS.iter().position(|&(open, _)| open == c) {
            stacks[kind].push(position);
            continue;
        }
        let kind = BRACKET_KINDS
            .iter()
            .position(|&(_, close)| close == c)
            .ok_or(FormatError::UnexpectedCharacter {
                line,
                column: position + 1,
                character: c,
            })?;
        let open = stacks[kind].pop().ok_or(FormatError::UnbalancedBrackets {
            line,
            position,
            bracket: c,
        })?;
        pairs.push(BasePair::canonical(open, position));
    }

    let unmatched = stacks
        .iter()
        .zip(BRACKET_KINDS)
        .filter_map(|(stack, (open, _))| stack.first().map(|&position| (position, open)))
        .min();
    match unmatched {
        Some((position, bracket)) => Err(FormatError::UnbalancedBrackets {
            line,
            position,
            bracket,
        }),
        None => Ok(pairs),
    }
}

/// Vienna dot-bracket codec.
///
/// A record is an optional `>name organism` header, the sequence and the
/// bracket notation; both may be wrapped over several lines. Anything after
/// the first token of a bracket line (such as an RNAfold energy) is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViennaFormat;

impl ViennaFormat {
    pub fn new() -> Self {
        Self
    }
}

impl StructureFormat for ViennaFormat {
    type Model = Vec<SecondaryStructure>;
    const NAME: &'static str = "Vienna";

    #[instrument(skip_all, name = "vienna_parse")]
    fn parse(&self, text: &str) -> Result<Self::Model, FormatError> {
        let mut structures = Vec::new();
        let mut current: Option<Record> = None;

        for (idx, line) in text.lines().enumerate() {
            let line_num = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let first_token = trimmed.split_whitespace().next().unwrap_or_default();
            let is_brackets = is_bracket_token(first_token);
            // Wrapped bracket lines may start with '>' when `<>` pairs are used.
            let continues_brackets = is_brackets
                && current
                    .as_ref()
                    .is_some_and(|r| r.brackets.len() < r.sequence.chars().count());

            if !continues_brackets {
                if let Some(header) = trimmed.strip_prefix('>') {
                    if let Some(record) = current.take() {
                        structures.push(record.finish()?);
                    }
                    current = Some(Record {
                        line: line_num,
                        header: Some(header.to_string()),
                        ..Record::default()
                    });
                    continue;
                }
            }

            if is_brackets {
                let record = current.get_or_insert_with(|| Record {
                    line: line_num,
                    ..Record::default()
                });
                record.brackets_line.get_or_insert(line_num);
                record.brackets.push_str(first_token);
                continue;
            }

            // A sequence line after the bracket notation opens a headerless record.
            let starts_record = current
                .as_ref()
                .is_none_or(|record| !record.brackets.is_empty());
            if starts_record {
                if let Some(record) = current.take() {
                    structures.push(record.finish()?);
                }
                trace!(line = line_num, "Starting headerless Vienna record.");
            }
            let record = current.get_or_insert_with(|| Record {
                line: line_num,
                ..Record::default()
            });
            record
                .sequence
                .extend(trimmed.chars().filter(|c| !c.is_whitespace()));
        }
        if let Some(record) = current {
            structures.push(record.finish()?);
        }

        debug!(records = structures.len(), "Parsed Vienna data.");
        Ok(structures)
    }

    /// Writes each structure as header, sequence and bracket line.
    ///
    /// # Errors
    ///
    /// Only nested canonical structures are representable: crossing pairs
    /// fail with [`CapabilityError::NonNestedStructure`] and non-canonical
    /// pairs with [`CapabilityError::NonCanonicalPair`].
    #[instrument(skip_all, name = "vienna_serialize")]
    fn serialize(&self, model: &Self::Model) -> Result<String, CapabilityError> {
        let mut out = String::new();
        for structure in model {
            if let Some((first, second)) = structure.crossing_pairs() {
                return Err(CapabilityError::NonNestedStructure {
                    first: first.positions(),
                    second: second.positions(),
                });
            }
            if let Some(pair) = structure.base_pairs().iter().find(|p| !p.is_canonical()) {
                return Err(CapabilityError::NonCanonicalPair {
                    i: pair.position_i(),
                    j: pair.position_j(),
                });
            }

            let rna = structure.rna();
            if rna.is_empty() {
                return Err(CapabilityError::EmptySequence {
                    format: Self::NAME,
                    name: rna.name().to_string(),
                });
            }

            let mut brackets = vec![UNPAIRED; rna.len()];
            for pair in structure.base_pairs() {
                brackets[pair.position_i()] = '(';
                brackets[pair.position_j()] = ')';
            }

            let header = header_for(Self::NAME, rna)?;
            if !header.is_empty() {
                out.push('>');
                out.push_str(&header);
                out.push('\n');
            }
            out.push_str(rna.sequence());
            out.push('\n');
            out.extend(brackets);
            out.push('\n');
        }
        Ok(out)
    }
}
