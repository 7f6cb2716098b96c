//! Readable mesh sources. Each loading pass opens its own reader.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Cursor},
    path::{Path, PathBuf},
};

use crate::error::{ObjError, ObjResult};

/// Something that can be opened (repeatedly) as a stream of lines.
pub trait ObjSource {
    type Reader: BufRead;

    /// Human readable name used in logs and errors.
    fn name(&self) -> String;

    fn open(&self) -> io::Result<Self::Reader>;
}

/// OBJ file on disk.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ObjSource for FileSource {
    type Reader = BufReader<File>;

    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> io::Result<Self::Reader> {
        File::open(&self.path).map(BufReader::new)
    }
}

/// OBJ text held in memory.
#[derive(Clone, Copy, Debug)]
pub struct StrSource<'a> {
    name: &'a str,
    contents: &'a str,
}

impl<'a> StrSource<'a> {
    pub fn new(contents: &'a str) -> Self {
        Self {
            name: "<memory>",
            contents,
        }
    }

    pub fn named(name: &'a str, contents: &'a str) -> Self {
        Self { name, contents }
    }
}

impl<'a> ObjSource for StrSource<'a> {
    type Reader = Cursor<&'a [u8]>;

    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn open(&self) -> io::Result<Self::Reader> {
        Ok(Cursor::new(self.contents.as_bytes()))
    }
}

/// Walk every line of `source`, handing `(1-based line number, text)` to `visit`.
/// Lines are read as raw bytes and decoded lossily, so stray non-UTF-8 bytes
/// only matter inside the fields of a recognized directive.
/// Open and read failures become [`ObjError::SourceUnavailable`]; the first
/// error returned by `visit` stops the walk.
pub(crate) fn for_each_line<S, F>(source: &S, mut visit: F) -> ObjResult<()>
where
    S: ObjSource,
    F: FnMut(usize, &str) -> ObjResult<()>,
{
    let mut reader = source.open().map_err(|e| ObjError::SourceUnavailable {
        name: source.name(),
        line: None,
        source: e,
    })?;

    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| ObjError::SourceUnavailable {
                name: source.name(),
                line: Some(line_no + 1),
                source: e,
            })?;
        if read == 0 {
            return Ok(());
        }
        line_no += 1;

        let mut bytes = buf.as_slice();
        if let Some(rest) = bytes.strip_suffix(b"\n") {
            bytes = rest;
        }
        if let Some(rest) = bytes.strip_suffix(b"\r") {
            bytes = rest;
        }
        visit(line_no, &String::from_utf8_lossy(bytes))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObjErrorKind;

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = FileSource::new(dir.path().join("nope.obj"));
        let err = for_each_line(&src, |_, _| Ok(())).unwrap_err();
        assert_eq!(err.kind(), ObjErrorKind::SourceUnavailable);
        assert_eq!(err.line(), None);
    }

    #[test]
    fn non_utf8_bytes_do_not_stop_the_walk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("latin1.obj");
        std::fs::write(&path, b"# W\xfcrfel\r\nv 0 0 0\r\nlast").expect("write");
        let mut seen = Vec::new();
        for_each_line(&FileSource::new(&path), |n, l| {
            seen.push((n, l.to_owned()));
            Ok(())
        })
        .unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], (1, "# W\u{fffd}rfel".to_owned()));
        assert_eq!(seen[1], (2, "v 0 0 0".to_owned()));
        assert_eq!(seen[2], (3, "last".to_owned()));
    }

    #[test]
    fn named_source_reports_its_name() {
        let src = StrSource::named("cube.obj", "v 0 0 0\n");
        assert_eq!(src.name(), "cube.obj");
        assert_eq!(StrSource::new("").name(), "<memory>");
    }

    #[test]
    fn str_source_reopens_from_start() {
        let src = StrSource::new("a\nb\n");
        let mut first = Vec::new();
        for_each_line(&src, |n, l| {
            first.push((n, l.to_owned()));
            Ok(())
        })
        .unwrap();
        let mut second = Vec::new();
        for_each_line(&src, |n, l| {
            second.push((n, l.to_owned()));
            Ok(())
        })
        .unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec![(1, "a".to_owned()), (2, "b".to_owned())]);
    }
}
