//! Reading and writing structured documents in JSON or YAML.

use std::path::Path;

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};

use crate::error::{Error, Result};

/// Serialization format of a document, picked by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` and `.yml` files are YAML, everything else is JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }

    /// Parses text into a generic document. Object key order is preserved.
    pub fn parse(self, text: &str) -> Result<Value> {
        match self {
            DocumentFormat::Json => serde_json::from_str(text).map_err(Error::JsonSyntax),
            DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(Error::YamlSyntax),
        }
    }

    /// Renders a value. JSON is indented with four spaces and ends with no trailing newline.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        match self {
            DocumentFormat::Json => {
                let mut buf = Vec::new();
                let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
                value.serialize(&mut ser).map_err(Error::JsonSerialize)?;
                String::from_utf8(buf).map_err(Error::Encoding)
            }
            DocumentFormat::Yaml => serde_yaml::to_string(value).map_err(Error::YamlSerialize),
        }
    }
}

/// Renders `value` in the format implied by `path` and writes it there.
///
/// The whole document is rendered before the file is created, so a serialization failure leaves nothing behind.
pub fn write_document<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let text = DocumentFormat::from_path(path).render(value)?;
    std::fs::write(path, text).map_err(|source| Error::WriteDocument {
        path: path.to_path_buf(),
        source,
    })
}
