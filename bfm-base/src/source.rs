//! Program text providers.

use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use tracing::debug;

use crate::error::{Error, Result};

/// Where program text comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// The identifier is the program itself.
    #[default]
    Text,
    /// The identifier is a path to a file with the program.
    File,
}

impl SourceKind {
    /// Selector value for [`SourceKind::Text`].
    pub const TEXT: &'static str = "T";
    /// Selector value for [`SourceKind::File`].
    pub const FILE: &'static str = "F";

    pub const fn as_str(self) -> &'static str {
        match self {
            SourceKind::Text => Self::TEXT,
            SourceKind::File => Self::FILE,
        }
    }
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            Self::TEXT => Ok(SourceKind::Text),
            Self::FILE => Ok(SourceKind::File),
            _ => Err(Error::InvalidSourceKind(s.to_owned())),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves an identifier to program text.
pub fn load(identifier: &str, kind: SourceKind) -> Result<String> {
    match kind {
        SourceKind::Text => Ok(identifier.to_owned()),
        SourceKind::File => read_program_file(identifier),
    }
}

/// Reads a whole file, joining its lines with the `\n`/`\r\n` terminators
/// removed.
///
/// Bytes that are not UTF-8 become `U+FFFD`, a no-op like any other comment
/// character.
///
/// ```no_run
/// # use bfm_base::source::read_program_file;
/// let program = read_program_file("hello.b")?;
/// assert!(!program.contains('\n'));
/// # Ok::<(), bfm_base::Error>(())
/// ```
pub fn read_program_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let file_load = |source| Error::FileLoad {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = BufReader::new(File::open(path).map_err(file_load)?);
    let mut bytes = Vec::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).map_err(file_load)? == 0 {
            break;
        }
        if line.ends_with(b"\n") {
            line.pop();
            if line.ends_with(b"\r") {
                line.pop();
            }
        }
        bytes.extend_from_slice(&line);
    }
    let text = String::from_utf8_lossy(&bytes).into_owned();

    debug!(path = %path.display(), len = text.len(), "program file read");

    Ok(text)
}
