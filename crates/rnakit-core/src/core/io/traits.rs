use super::error::{CapabilityError, FormatError};
use crate::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Defines the interface shared by every structure file format.
///
/// `parse` and `serialize` are pure functions of their input; the remaining
/// methods add stream and file plumbing on top of them.
pub trait StructureFormat {
    /// The model a document of this format decodes to.
    type Model;

    /// Human-readable format name used in diagnostics.
    const NAME: &'static str;

    /// Decodes a complete document.
    ///
    /// # Errors
    ///
    /// Fails fast with a [`FormatError`] on the first violation.
    fn parse(&self, text: &str) -> Result<Self::Model, FormatError>;

    /// Encodes `model` as a complete document.
    ///
    /// # Errors
    ///
    /// Returns a [`CapabilityError`] if the format cannot express `model`.
    fn serialize(&self, model: &Self::Model) -> Result<String, CapabilityError>;

    /// Reads a whole document from a buffered reader.
    fn read_from(&self, reader: &mut impl BufRead) -> Result<Self::Model, Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(self.parse(&text)?)
    }

    /// Writes `model` to a writer.
    fn write_to(&self, model: &Self::Model, writer: &mut impl Write) -> Result<(), Error> {
        let text = self.serialize(model)?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Reads a document from a file path.
    fn read_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Self::Model, Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.read_from(&mut reader)
    }

    /// Writes `model` to a file path, creating or truncating the file.
    fn write_to_path<P: AsRef<Path>>(&self, model: &Self::Model, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(model, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
