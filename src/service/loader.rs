// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading and dumping constructs through a byte codec.
//!
//! Decoding turns bytes into a plain tree with the codec and assigns every
//! top-level entry into a new construct, so keys are normalized and nested
//! mappings are promoted. Encoding walks the construct's schema and data with
//! [`Construct::to_tree`] and hands the tree to the codec.

use crate::domain::{Construct, ConstructError, Result, Value};
use crate::ports::TreeCodec;
use crate::service::builder::ConstructBuilder;
use crate::service::registry::{Kind, KindRegistry};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// Reads and writes constructs with a [`TreeCodec`].
///
/// # Examples
///
/// ```rust
/// use construct::adapters::YamlCodec;
/// use construct::domain::Value;
/// use construct::service::Loader;
///
/// # fn main() -> construct::domain::Result<()> {
/// let loader = Loader::new(YamlCodec::new());
/// let mut c = loader.decode(b"foo: hi\nbar:\n  baz: 2\n")?;
///
/// let bar = c.section_mut("bar")?.unwrap();
/// assert_eq!(bar.get("baz")?, Some(&Value::from(2)));
/// # Ok(())
/// # }
/// ```
pub struct Loader<'r, C> {
    codec: C,
    registry: &'r KindRegistry,
    kind: Option<String>,
}

impl<C: TreeCodec> Loader<'static, C> {
    /// Creates a loader backed by the process-wide kind registry.
    pub fn new(codec: C) -> Self {
        Self::with_registry(codec, KindRegistry::global())
    }
}

impl<'r, C: TreeCodec> Loader<'r, C> {
    /// Creates a loader backed by a specific kind registry.
    pub fn with_registry(codec: C, registry: &'r KindRegistry) -> Self {
        Self {
            codec,
            registry,
            kind: None,
        }
    }

    /// Loads constructs of the named kind instead of plain constructs.
    pub fn kind(mut self, name: impl Into<String>) -> Self {
        self.kind = Some(name.into());
        self
    }

    /// Loads constructs of a statically declared [`Kind`].
    pub fn kind_of<K: Kind>(self) -> Self {
        self.kind(K::NAME)
    }

    /// Returns the codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Decodes bytes into a new construct.
    pub fn decode(&self, bytes: &[u8]) -> Result<Construct> {
        let tree = self.codec.decode(bytes)?;
        let mut builder = ConstructBuilder::with_registry(self.registry).tree(tree);
        if let Some(kind) = &self.kind {
            builder = builder.kind(kind.as_str());
        }
        builder.build()
    }

    /// Reads everything from `reader`, then decodes it.
    pub fn decode_from_reader<R: Read>(&self, mut reader: R) -> Result<Construct> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.decode(&bytes)
    }

    /// Returns `true` if the codec reads files with this path's extension.
    ///
    /// Paths without an extension are accepted. Extensions match without
    /// regard to case.
    pub fn supports_path(&self, path: &Path) -> bool {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => self
                .codec
                .supported_extensions()
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext)),
            None => true,
        }
    }

    /// Reads a whole file, then decodes it.
    ///
    /// A file whose extension the codec does not read is rejected with a
    /// `Decode` error before it is opened. I/O errors are returned unchanged.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Construct> {
        let path = path.as_ref();
        if !self.supports_path(path) {
            return Err(ConstructError::decode(format!(
                "unsupported file extension for {}, expected one of: {}",
                path.display(),
                self.codec.supported_extensions().join(", ")
            )));
        }
        tracing::debug!(path = %path.display(), "loading construct");
        let bytes = fs::read(path)?;
        self.decode(&bytes)
    }

    /// Decodes bytes and assigns every top-level entry into `construct`.
    ///
    /// Nothing is assigned if decoding fails or any key is rejected.
    pub fn merge_into(&self, construct: &mut Construct, bytes: &[u8]) -> Result<()> {
        let tree = self.codec.decode(bytes)?;
        construct.merge_tree(tree)
    }

    /// Encodes a construct into bytes.
    pub fn encode(&self, construct: &Construct) -> Result<Vec<u8>> {
        self.codec.encode(&Value::Mapping(construct.to_tree()))
    }

    /// Encodes a construct and writes it to `writer`.
    pub fn encode_to_writer<W: Write>(&self, construct: &Construct, mut writer: W) -> Result<()> {
        let bytes = self.encode(construct)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Encodes a construct and writes it to a file, replacing its contents.
    pub fn write_file<P: AsRef<Path>>(&self, construct: &Construct, path: P) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "writing construct");
        let bytes = self.encode(construct)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}
