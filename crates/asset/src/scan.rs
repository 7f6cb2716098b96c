//! First pass over an OBJ source: count records per category so the second
//! pass can allocate exactly once.

use crate::{
    error::ObjResult,
    source::{ObjSource, for_each_line},
};

/// Line directives the loader understands. Everything else is ignored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Directive {
    Position,
    TexCoord,
    Normal,
    Face,
}

/// Classify a line by its leading marker. Returns the directive and the text
/// following the marker. Both passes go through here so they always agree.
pub fn classify_line(line: &str) -> Option<(Directive, &str)> {
    let trimmed = line.trim_start();
    let (tag, rest) = trimmed.split_once([' ', '\t'])?;
    let directive = match tag {
        "v" => Directive::Position,
        "vt" => Directive::TexCoord,
        "vn" => Directive::Normal,
        "f" => Directive::Face,
        _ => return None,
    };
    Some((directive, rest))
}

/// Record counts produced by [`scan_obj`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ObjCounts {
    pub positions: usize,
    pub texcoords: usize,
    pub normals: usize,
    pub faces: usize,
}

impl ObjCounts {
    fn tally(&mut self, directive: Directive) {
        match directive {
            Directive::Position => self.positions += 1,
            Directive::TexCoord => self.texcoords += 1,
            Directive::Normal => self.normals += 1,
            Directive::Face => self.faces += 1,
        }
    }

    /// Number of entries in the index buffer (3 per triangle).
    #[inline]
    pub fn index_count(&self) -> usize {
        self.faces * 3
    }
}

/// Count position, texture coordinate, normal and face lines.
/// Field contents are not validated here.
pub fn scan_obj<S: ObjSource>(source: &S) -> ObjResult<ObjCounts> {
    let mut counts = ObjCounts::default();
    for_each_line(source, |_, line| {
        if let Some((directive, _)) = classify_line(line) {
            counts.tally(directive);
        }
        Ok(())
    })?;

    log::debug!("Scanned '{}': {:?}", source.name(), counts);
    Ok(counts)
}
