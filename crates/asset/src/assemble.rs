//! Second pass over an OBJ source: fill exactly-sized vertex and index buffers.
//!
//! Positions, texture coordinates and normals are indexed independently in OBJ,
//! but the GPU draws with a single index. A position may therefore only ever be
//! paired with one texture coordinate (and, when normals are taken from the
//! file, one normal). The first face corner touching a position fixes its
//! pairing; a later corner pairing it differently rejects the whole mesh.

use crate::{
    error::{Attribute, ObjError, ObjResult},
    mesh::{MeshData, MeshVertex},
    scan::{Directive, ObjCounts, classify_line},
    source::{ObjSource, for_each_line},
};

/// Where the normal slots of each vertex come from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NormalMode {
    /// `vn` lines are only counted; normal slots stay zero.
    #[default]
    Reserved,
    /// `vn` lines are parsed and bound to positions like texture coordinates.
    FromFile,
}

/// Knobs for a single load.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoadOptions {
    pub normals: NormalMode,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AssemblyState {
    Scanning,
    Resolving,
    Done,
    Failed,
}

/// One face corner, indices as written in the file (1-based).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Corner {
    position: u32,
    texcoord: u32,
    normal: u32,
}

/// Builds a [`MeshData`] line by line from buffers sized by a prior [`ObjCounts`].
#[derive(Debug)]
pub struct VertexAssembler {
    counts: ObjCounts,
    options: LoadOptions,
    state: AssemblyState,

    vertices: Vec<MeshVertex>,
    positions_filled: usize,
    /// 1-based while scanning, rebased to 0 on resolve.
    indices: Vec<u32>,

    texcoords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    normals_seen: usize,

    // 0-based attribute index bound to each position.
    texcoord_of: Vec<Option<u32>>,
    normal_of: Vec<Option<u32>>,
}

impl VertexAssembler {
    pub fn new(counts: ObjCounts, options: LoadOptions) -> Self {
        let with_normals = options.normals == NormalMode::FromFile;
        Self {
            counts,
            options,
            state: AssemblyState::Scanning,
            vertices: vec![MeshVertex::default(); counts.positions],
            positions_filled: 0,
            indices: Vec::with_capacity(counts.index_count()),
            texcoords: Vec::with_capacity(counts.texcoords),
            normals: Vec::with_capacity(if with_normals { counts.normals } else { 0 }),
            normals_seen: 0,
            texcoord_of: vec![None; counts.positions],
            normal_of: vec![None; if with_normals { counts.positions } else { 0 }],
        }
    }

    #[inline]
    pub fn state(&self) -> AssemblyState {
        self.state
    }

    /// Consume one source line. Any error is terminal for this assembler.
    pub fn feed_line(&mut self, line_no: usize, line: &str) -> ObjResult<()> {
        if self.state != AssemblyState::Scanning {
            return Err(ObjError::AssemblyFailed);
        }
        let result = self.scan_line(line_no, line);
        if result.is_err() {
            self.state = AssemblyState::Failed;
        }
        result
    }

    /// Resolve attribute pairings and hand out the finished buffers.
    pub fn finish(&mut self) -> ObjResult<MeshData> {
        if self.state != AssemblyState::Scanning {
            return Err(ObjError::AssemblyFailed);
        }
        if let Err(e) = self.check_complete() {
            self.state = AssemblyState::Failed;
            return Err(e);
        }

        self.state = AssemblyState::Resolving;
        for (vertex, slot) in self.vertices.iter_mut().zip(&self.texcoord_of) {
            if let Some(t) = slot {
                vertex.uv = self.texcoords[*t as usize];
            }
        }
        for (vertex, slot) in self.vertices.iter_mut().zip(&self.normal_of) {
            if let Some(n) = slot {
                vertex.normal = self.normals[*n as usize];
            }
        }
        for index in &mut self.indices {
            *index -= 1;
        }

        let mesh = MeshData::new(
            std::mem::take(&mut self.vertices),
            std::mem::take(&mut self.indices),
        );
        self.texcoords = Vec::new();
        self.normals = Vec::new();
        self.texcoord_of = Vec::new();
        self.normal_of = Vec::new();
        self.state = AssemblyState::Done;

        log::debug!(
            "Assembled {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.index_count()
        );
        Ok(mesh)
    }

    fn scan_line(&mut self, line_no: usize, line: &str) -> ObjResult<()> {
        let Some((directive, rest)) = classify_line(line) else {
            return Ok(());
        };

        match directive {
            Directive::Position => {
                let xyz = parse_floats::<3>(rest).map_err(|parsed| {
                    ObjError::MalformedPositionLine {
                        line: line_no,
                        parsed,
                    }
                })?;
                if self.positions_filled >= self.counts.positions {
                    return Err(self.overflow(Attribute::Position, self.positions_filled));
                }
                self.vertices[self.positions_filled].position = xyz;
                self.positions_filled += 1;
            }
            Directive::TexCoord => {
                let uv = parse_floats::<2>(rest).map_err(|parsed| {
                    ObjError::MalformedTexCoordLine {
                        line: line_no,
                        parsed,
                    }
                })?;
                if self.texcoords.len() >= self.counts.texcoords {
                    return Err(self.overflow(Attribute::TexCoord, self.texcoords.len()));
                }
                self.texcoords.push(uv);
            }
            Directive::Normal => {
                if self.normals_seen >= self.counts.normals {
                    return Err(self.overflow(Attribute::Normal, self.normals_seen));
                }
                if self.options.normals == NormalMode::FromFile {
                    let n = parse_floats::<3>(rest).map_err(|parsed| {
                        ObjError::MalformedNormalLine {
                            line: line_no,
                            parsed,
                        }
                    })?;
                    self.normals.push(n);
                }
                self.normals_seen += 1;
            }
            Directive::Face => self.face(line_no, rest)?,
        }
        Ok(())
    }

    fn face(&mut self, line_no: usize, rest: &str) -> ObjResult<()> {
        let corners = parse_face(rest).map_err(|parsed| ObjError::MalformedFaceLine {
            line: line_no,
            parsed,
        })?;

        let with_normals = self.options.normals == NormalMode::FromFile;
        if corners
            .iter()
            .any(|c| c.position == 0 || c.texcoord == 0 || (with_normals && c.normal == 0))
        {
            return Err(ObjError::ZeroIndex { line: line_no });
        }

        for c in &corners {
            check_range(line_no, Attribute::Position, c.position, self.counts.positions)?;
            check_range(line_no, Attribute::TexCoord, c.texcoord, self.counts.texcoords)?;
            if with_normals {
                check_range(line_no, Attribute::Normal, c.normal, self.counts.normals)?;
            }
        }

        if self.indices.len() >= self.counts.index_count() {
            return Err(self.overflow(Attribute::Face, self.indices.len() / 3));
        }

        for c in &corners {
            let slot = (c.position - 1) as usize;
            bind(&mut self.texcoord_of[slot], c.texcoord - 1).map_err(|previous| {
                ObjError::TexCoordConflict {
                    line: line_no,
                    position: c.position,
                    previous: previous + 1,
                    found: c.texcoord,
                }
            })?;
            if with_normals {
                bind(&mut self.normal_of[slot], c.normal - 1).map_err(|previous| {
                    ObjError::NormalConflict {
                        line: line_no,
                        position: c.position,
                        previous: previous + 1,
                        found: c.normal,
                    }
                })?;
            }
        }

        self.indices.extend(corners.iter().map(|c| c.position));
        Ok(())
    }

    fn overflow(&self, attribute: Attribute, filled: usize) -> ObjError {
        let counted = match attribute {
            Attribute::Position => self.counts.positions,
            Attribute::TexCoord => self.counts.texcoords,
            Attribute::Normal => self.counts.normals,
            Attribute::Face => self.counts.faces,
        };
        ObjError::CountMismatch {
            attribute,
            counted,
            found: filled + 1,
        }
    }

    fn check_complete(&self) -> ObjResult<()> {
        let seen = [
            (Attribute::Position, self.counts.positions, self.positions_filled),
            (Attribute::TexCoord, self.counts.texcoords, self.texcoords.len()),
            (Attribute::Normal, self.counts.normals, self.normals_seen),
            (Attribute::Face, self.counts.faces, self.indices.len() / 3),
        ];
        match seen.into_iter().find(|(_, counted, found)| counted != found) {
            Some((attribute, counted, found)) => Err(ObjError::CountMismatch {
                attribute,
                counted,
                found,
            }),
            None => Ok(()),
        }
    }
}

/// Second pass over `source`, using counts from the first pass.
pub fn assemble_obj<S: ObjSource>(
    source: &S,
    counts: ObjCounts,
    options: LoadOptions,
) -> ObjResult<MeshData> {
    let mut assembler = VertexAssembler::new(counts, options);
    for_each_line(source, |line_no, line| assembler.feed_line(line_no, line))?;
    assembler.finish()
}

/// Set an unset slot, or confirm it already holds `value`.
/// Returns the previously bound value on conflict.
fn bind(slot: &mut Option<u32>, value: u32) -> Result<(), u32> {
    match *slot {
        None => {
            *slot = Some(value);
            Ok(())
        }
        Some(prev) if prev == value => Ok(()),
        Some(prev) => Err(prev),
    }
}

fn check_range(line: usize, attribute: Attribute, index: u32, len: usize) -> ObjResult<()> {
    if index as usize > len {
        return Err(ObjError::IndexOutOfRange {
            line,
            attribute,
            index,
            len,
        });
    }
    Ok(())
}

/// Parse the first `N` whitespace separated floats; extra fields are ignored.
/// On failure, returns how many values parsed.
fn parse_floats<const N: usize>(rest: &str) -> Result<[f32; N], usize> {
    let mut out = [0.0; N];
    let mut tokens = rest.split_whitespace();
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = tokens
            .next()
            .and_then(|t| t.parse::<f32>().ok())
            .ok_or(i)?;
    }
    Ok(out)
}

/// Parse exactly three `pos/tex/norm` corners. On failure, returns how many
/// integer sub-fields parsed before the shape broke.
fn parse_face(rest: &str) -> Result<[Corner; 3], usize> {
    let mut fields = [[0u32; 3]; 3];
    let mut parsed = 0;

    let mut tokens = rest.split_whitespace();
    for corner in &mut fields {
        let token = tokens.next().ok_or(parsed)?;
        let mut parts = token.split('/');
        for field in corner.iter_mut() {
            *field = parts
                .next()
                .and_then(|p| p.parse::<u32>().ok())
                .ok_or(parsed)?;
            parsed += 1;
        }
        if parts.next().is_some() {
            return Err(parsed);
        }
    }
    if tokens.next().is_some() {
        return Err(parsed);
    }

    Ok(fields.map(|[position, texcoord, normal]| Corner {
        position,
        texcoord,
        normal,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObjErrorKind;

    fn counts(positions: usize, texcoords: usize, normals: usize, faces: usize) -> ObjCounts {
        ObjCounts {
            positions,
            texcoords,
            normals,
            faces,
        }
    }

    #[test]
    fn parse_floats_reports_parsed_count() {
        assert_eq!(parse_floats::<3>(" 1 2 3"), Ok([1.0, 2.0, 3.0]));
        assert_eq!(parse_floats::<3>("1 2 3 1.0"), Ok([1.0, 2.0, 3.0]));
        assert_eq!(parse_floats::<3>("1 2"), Err(2));
        assert_eq!(parse_floats::<2>("x 1"), Err(0));
    }

    #[test]
    fn parse_face_shapes() {
        let ok = parse_face("1/2/3 4/5/6 7/8/9").unwrap();
        assert_eq!(
            ok[2],
            Corner {
                position: 7,
                texcoord: 8,
                normal: 9
            }
        );
        assert_eq!(parse_face("1/1/1 2/2/1 3/3"), Err(8));
        assert_eq!(parse_face("1//1 2//1 3//1"), Err(1));
        assert_eq!(parse_face("1/1/1 2/2/2"), Err(6));
        assert_eq!(parse_face("1/1/1 2/2/2 3/3/3 4/4/4"), Err(9));
        assert_eq!(parse_face("1/1/1/1 2/2/2 3/3/3"), Err(3));
        assert_eq!(parse_face("-1/1/1 2/2/2 3/3/3"), Err(0));
    }

    #[test]
    fn unset_slot_is_distinct_from_first_texcoord() {
        // Texture coordinate 1 rebases to 0; it must not read as "unset".
        let mut slot = None;
        assert_eq!(bind(&mut slot, 0), Ok(()));
        assert_eq!(bind(&mut slot, 0), Ok(()));
        assert_eq!(bind(&mut slot, 1), Err(0));
    }

    #[test]
    fn state_walks_scanning_to_done() {
        let mut asm = VertexAssembler::new(counts(3, 1, 0, 1), LoadOptions::default());
        assert_eq!(asm.state(), AssemblyState::Scanning);
        for (n, l) in ["v 0 0 0", "v 1 0 0", "v 0 1 0", "vt 0.5 0.5", "f 1/1/1 2/1/1 3/1/1"]
            .iter()
            .enumerate()
        {
            asm.feed_line(n + 1, l).unwrap();
        }
        let mesh = asm.finish().unwrap();
        assert_eq!(asm.state(), AssemblyState::Done);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert!(mesh.vertices.iter().all(|v| v.uv == [0.5, 0.5]));

        assert_eq!(
            asm.feed_line(6, "v 0 0 0").unwrap_err().kind(),
            ObjErrorKind::AssemblyFailed
        );
    }

    #[test]
    fn failure_is_terminal() {
        let mut asm = VertexAssembler::new(counts(1, 0, 0, 0), LoadOptions::default());
        let err = asm.feed_line(1, "v 0 0").unwrap_err();
        assert_eq!(err.kind(), ObjErrorKind::MalformedPositionLine);
        assert_eq!(asm.state(), AssemblyState::Failed);
        assert_eq!(
            asm.feed_line(2, "v 0 0 0").unwrap_err().kind(),
            ObjErrorKind::AssemblyFailed
        );
        assert_eq!(asm.finish().unwrap_err().kind(), ObjErrorKind::AssemblyFailed);
    }

    #[test]
    fn extra_records_beyond_counts_are_rejected() {
        let mut asm = VertexAssembler::new(counts(1, 0, 0, 0), LoadOptions::default());
        asm.feed_line(1, "v 0 0 0").unwrap();
        match asm.feed_line(2, "v 1 1 1").unwrap_err() {
            ObjError::CountMismatch {
                attribute,
                counted,
                found,
            } => {
                assert_eq!(attribute, Attribute::Position);
                assert_eq!((counted, found), (1, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_records_are_rejected_on_finish() {
        let mut asm = VertexAssembler::new(counts(2, 0, 0, 0), LoadOptions::default());
        asm.feed_line(1, "v 0 0 0").unwrap();
        assert_eq!(asm.finish().unwrap_err().kind(), ObjErrorKind::CountMismatch);
        assert_eq!(asm.state(), AssemblyState::Failed);
    }

    #[test]
    fn reserved_normals_are_not_parsed() {
        let mut asm = VertexAssembler::new(counts(0, 0, 1, 0), LoadOptions::default());
        asm.feed_line(1, "vn garbage").unwrap();
        assert!(asm.finish().is_ok());
    }

    #[test]
    fn file_normals_require_three_values() {
        let opts = LoadOptions {
            normals: NormalMode::FromFile,
        };
        let mut asm = VertexAssembler::new(counts(0, 0, 1, 0), opts);
        assert_eq!(
            asm.feed_line(1, "vn 0 1").unwrap_err().kind(),
            ObjErrorKind::MalformedNormalLine
        );
    }
}
