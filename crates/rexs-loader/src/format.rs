//! Wire format detection

use crate::{Error, Result};
use std::fmt;
use std::path::Path;

/// The two REXS wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Xml,
    Json,
}

impl Format {
    /// Detect the format from a file extension.
    ///
    /// `.rexs` and `.xml` are XML, `.rexsj` and `.json` are JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "rexs" | "xml" => Some(Format::Xml),
            "rexsj" | "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Like [`Format::from_path`] but fails for an unknown extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] naming the path.
    pub fn detect(path: &Path) -> Result<Self> {
        Self::from_path(path).ok_or_else(|| {
            Error::UnsupportedFormat(format!(
                "cannot tell the format of {} from its extension",
                path.display()
            ))
        })
    }

    /// Default file extension
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Format::Xml => "rexs",
            Format::Json => "rexsj",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Xml => f.write_str("XML"),
            Format::Json => f.write_str("JSON"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(Format::from_path(Path::new("model.rexs")), Some(Format::Xml));
        assert_eq!(Format::from_path(Path::new("model.XML")), Some(Format::Xml));
        assert_eq!(Format::from_path(Path::new("a/b/model.rexsj")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("model.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("model.rexsz")), None);
        assert_eq!(Format::from_path(Path::new("model")), None);
    }

    #[test]
    fn test_detect_unknown_extension() {
        assert!(matches!(
            Format::detect(Path::new("model.txt")),
            Err(Error::UnsupportedFormat(message)) if message.contains("model.txt")
        ));
        assert_eq!(Format::detect(Path::new("model.rexsj")).unwrap(), Format::Json);
    }
}
