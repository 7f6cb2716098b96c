use approx::assert_relative_eq;
use asset::{
    Attribute, LoadOptions, NormalMode, ObjError, ObjErrorKind, StrSource,
    assemble::assemble_obj,
    obj::{load_obj, load_obj_from_path, load_obj_from_str},
    scan::scan_obj,
};

const TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
f 1/1/1 2/2/1 3/3/1
";

const QUAD: &str = "\
# two triangles sharing an edge
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

fn kind_of(src: &str) -> ObjErrorKind {
    load_obj_from_str(src).unwrap_err().kind()
}

#[test]
fn single_triangle() {
    let mesh = load_obj_from_str(TRIANGLE).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
    assert_eq!(mesh.vertices[2].uv, [0.0, 1.0]);
    assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
    // Normal slots stay reserved.
    assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 3]));
}

#[test]
fn position_reused_with_other_texcoord_conflicts() {
    let src = TRIANGLE.replace("f 1/1/1 2/2/1 3/3/1", "f 1/1/1 2/2/1 1/2/1");
    match load_obj_from_str(&src).unwrap_err() {
        ObjError::TexCoordConflict {
            line,
            position,
            previous,
            found,
        } => {
            assert_eq!(line, 7);
            assert_eq!(position, 1);
            assert_eq!(previous, 1);
            assert_eq!(found, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn conflict_across_faces() {
    let src = format!("{QUAD}f 2/3/1 3/3/1 4/4/1\n");
    assert_eq!(kind_of(&src), ObjErrorKind::TexCoordConflict);
}

#[test]
fn zero_index_is_rejected() {
    let pos = TRIANGLE.replace("f 1/1/1", "f 0/1/1");
    assert_eq!(kind_of(&pos), ObjErrorKind::ZeroIndex);
    let tex = TRIANGLE.replace("f 1/1/1", "f 1/0/1");
    assert_eq!(kind_of(&tex), ObjErrorKind::ZeroIndex);
}

#[test]
fn zero_normal_index_is_fine_unless_normals_are_used() {
    let src = TRIANGLE.replace("f 1/1/1", "f 1/1/0");
    assert!(load_obj_from_str(&src).is_ok());

    let with_normal = src.replace("f ", "vn 0 0 1\nf ");
    let opts = LoadOptions {
        normals: NormalMode::FromFile,
    };
    let err = load_obj(&StrSource::new(&with_normal), opts).unwrap_err();
    assert_eq!(err.kind(), ObjErrorKind::ZeroIndex);
}

#[test]
fn short_position_line() {
    let src = "v 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1/1 2/1/1 3/1/1\n";
    match load_obj_from_str(src).unwrap_err() {
        ObjError::MalformedPositionLine { line, parsed } => {
            assert_eq!(line, 1);
            assert_eq!(parsed, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn short_texcoord_line() {
    let src = TRIANGLE.replace("vt 1 0", "vt 1");
    assert_eq!(kind_of(&src), ObjErrorKind::MalformedTexCoordLine);
}

#[test]
fn face_with_eight_subfields() {
    let src = TRIANGLE.replace("3/3/1", "3/3");
    match load_obj_from_str(&src).unwrap_err() {
        ObjError::MalformedFaceLine { parsed, .. } => assert_eq!(parsed, 8),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn quads_are_not_supported() {
    let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvt 0 0\nf 1/1/1 2/1/1 3/1/1 4/1/1\n";
    assert_eq!(kind_of(src), ObjErrorKind::MalformedFaceLine);
}

#[test]
fn missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_obj_from_path(dir.path().join("missing.obj")).unwrap_err();
    assert_eq!(err.kind(), ObjErrorKind::SourceUnavailable);
    assert!(err.to_string().contains("missing.obj"));
}

#[test]
fn quad_shares_positions() {
    let mesh = load_obj_from_str(QUAD).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.index_count(), 6);
    assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    assert_eq!(mesh.vertices[3].uv, [0.0, 1.0]);
}

#[test]
fn counts_match_buffers() {
    for src in [TRIANGLE, QUAD] {
        let source = StrSource::new(src);
        let counts = scan_obj(&source).unwrap();
        let mesh = assemble_obj(&source, counts, LoadOptions::default()).unwrap();
        assert_eq!(counts.positions, mesh.vertex_count());
        assert_eq!(counts.faces, mesh.index_count() / 3);
        assert!(
            mesh.indices
                .iter()
                .all(|&i| (i as usize) < mesh.vertex_count())
        );
    }
}

#[test]
fn loading_twice_is_bit_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quad.obj");
    std::fs::write(&path, QUAD).unwrap();

    let a = load_obj_from_path(&path).unwrap();
    let b = load_obj_from_path(&path).unwrap();
    let bits = |m: &asset::MeshData| m.as_floats().iter().map(|f| f.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a), bits(&b));
    assert_eq!(a.indices, b.indices);
}

#[test]
fn faces_may_reference_later_records() {
    let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1/1/1 2/2/1 3/3/1
vt 0.25 0.75
vt 0.5 0.5
vt 0.75 0.25
";
    let mesh = load_obj_from_str(src).unwrap();
    assert_relative_eq!(mesh.vertices[0].uv[1], 0.75);
    assert_relative_eq!(mesh.vertices[2].uv[0], 0.75);
}

#[test]
fn unreferenced_position_gets_origin_uv() {
    let src = format!("{TRIANGLE}v 5 5 5\n");
    let mesh = load_obj_from_str(&src).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.vertices[3].position, [5.0, 5.0, 5.0]);
    assert_eq!(mesh.vertices[3].uv, [0.0, 0.0]);
}

#[test]
fn out_of_range_index() {
    let src = TRIANGLE.replace("3/3/1", "4/3/1");
    match load_obj_from_str(&src).unwrap_err() {
        ObjError::IndexOutOfRange {
            attribute,
            index,
            len,
            ..
        } => {
            assert_eq!(attribute, Attribute::Position);
            assert_eq!(index, 4);
            assert_eq!(len, 3);
        }
        other => panic!("unexpected error: {other}"),
    }

    let tex = TRIANGLE.replace("3/3/1", "3/9/1");
    assert_eq!(kind_of(&tex), ObjErrorKind::IndexOutOfRange);
}

#[test]
fn normals_from_file() {
    let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vn 0 0 1
vn 0 1 0
f 1/1/1 2/1/1 3/1/2
";
    let opts = LoadOptions {
        normals: NormalMode::FromFile,
    };
    let mesh = load_obj(&StrSource::new(src), opts).unwrap();
    assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    assert_eq!(mesh.vertices[2].normal, [0.0, 1.0, 0.0]);
    assert_eq!(mesh.vertices[0].as_array()[3..6], [0.0, 0.0, 1.0]);

    let conflicting = format!("{src}f 1/1/2 2/1/1 3/1/2\n");
    let err = load_obj(&StrSource::new(&conflicting), opts).unwrap_err();
    assert_eq!(err.kind(), ObjErrorKind::NormalConflict);
}

#[test]
fn ignores_unknown_directives_and_trailing_fields() {
    let src = "\
mtllib cube.mtl
o Triangle
v 0 0 0 1.0
v 1 0 0
v 0 1 0
vt 0 0 0
vt 1 0
vt 0 1
usemtl Material
s off
f 1/1/1 2/2/1 3/3/1
";
    let mesh = load_obj_from_str(src).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 0.0]);
}

#[test]
fn first_error_stops_the_load() {
    // Line 1 is malformed and so is line 2; only the first is reported.
    let src = "v 0\nvt 0\n";
    let err = load_obj_from_str(src).unwrap_err();
    assert_eq!(err.kind(), ObjErrorKind::MalformedPositionLine);
    assert_eq!(err.line(), Some(1));
}

#[test]
fn empty_source_yields_empty_mesh() {
    let mesh = load_obj_from_str("# nothing here\n").unwrap();
    assert_eq!(mesh.vertex_count(), 0);
    assert!(!mesh.is_valid());
}

fn bundled(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../res/models")
        .join(name)
}

#[test]
fn bundled_cube_loads_with_file_normals() {
    let source = asset::FileSource::new(bundled("cube.obj"));
    let counts = scan_obj(&source).unwrap();
    assert_eq!(
        (counts.positions, counts.texcoords, counts.normals, counts.faces),
        (24, 24, 6, 12)
    );

    let opts = LoadOptions {
        normals: NormalMode::FromFile,
    };
    let mesh = load_obj(&source, opts).unwrap();
    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.triangle_count(), 12);
    assert!(mesh.is_valid());
    // First side faces +Z.
    assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    assert_eq!(mesh.vertices[2].uv, [1.0, 1.0]);
}

#[test]
fn bundled_triangle_loads() {
    let mesh = load_obj_from_path(bundled("triangle.obj")).unwrap();
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_relative_eq!(mesh.vertices[2].uv[0], 0.5);
}

#[test]
fn latin1_comment_does_not_block_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tri.obj");
    let mut bytes = b"# exported by W\xfcrfel-Tool\n".to_vec();
    bytes.extend_from_slice(TRIANGLE.as_bytes());
    std::fs::write(&path, bytes).unwrap();

    let mesh = load_obj_from_path(&path).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
}

#[test]
fn bad_byte_inside_position_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tri.obj");
    let raw = TRIANGLE.replacen("v 1 0 0", "v 1 @0 0", 1);
    let raw: Vec<u8> = raw.bytes().map(|b| if b == b'@' { 0xff } else { b }).collect();
    std::fs::write(&path, raw).unwrap();

    match load_obj_from_path(&path).unwrap_err() {
        ObjError::MalformedPositionLine { line, parsed } => {
            assert_eq!(line, 2);
            assert_eq!(parsed, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn indented_directives_are_parsed() {
    // Leading whitespace before a marker is skipped, so indented records count.
    let indented = TRIANGLE
        .lines()
        .map(|l| format!("  {l}\n"))
        .collect::<String>();
    let mesh = load_obj_from_str(&indented).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.vertices[2].uv, [0.0, 1.0]);

    // An indented short position line is therefore a malformed record.
    let src = format!("{TRIANGLE}  v 9 9\n");
    match load_obj_from_str(&src).unwrap_err() {
        ObjError::MalformedPositionLine { line, parsed } => {
            assert_eq!(line, 8);
            assert_eq!(parsed, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}
