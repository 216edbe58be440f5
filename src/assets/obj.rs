//! Wavefront OBJ parsing.
//!
//! Produces a single indexed [`MeshData`] from `v`/`vt`/`vn`/`f` statements.
//! Faces with more than three corners are fan-triangulated. A face corner may
//! omit its UV or normal reference (`v`, `v//vn`, `v/vt` forms); if any
//! corner of a triangle lacks an attribute, the whole triangle falls back to
//! the default for that attribute, so a triangle never mixes real and
//! placeholder values across its corners.
//!
//! Vertices are deduplicated on the full (position, uv, normal) reference
//! triple: two corners share an output vertex only when all three references
//! match.
//!
//! Malformed statements (bad numbers, out-of-range face indices, too few
//! fields) are logged and skipped; the parse always runs to the end of the
//! text and returns whatever geometry was usable. Asset problems degrade the
//! rendered result, they do not abort it.

use std::collections::HashMap;

use log::{debug, warn};

use crate::foundation::math::{Vec2, Vec3};
use crate::render::mesh::MeshData;

/// Sentinel for an absent uv/normal reference.
const NO_INDEX: i64 = -1;

/// A parsed OBJ document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjModel {
    /// The merged mesh. Tangents are not generated here.
    pub mesh: MeshData,
    /// `mtllib` references, in order of appearance.
    pub material_libs: Vec<String>,
    /// Number of source lines that were skipped as malformed.
    pub skipped_lines: usize,
}

/// One face corner: indices into the position/uv/normal pools, 0-based, with
/// [`NO_INDEX`] marking absent references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CornerRef {
    position: i64,
    uv: i64,
    normal: i64,
}

/// Parse OBJ text into a single mesh.
pub fn parse(source: &str) -> ObjModel {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();

    let mut model = ObjModel::default();
    let mut dedup: HashMap<CornerRef, u32> = HashMap::new();

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        // Everything after '#' is a comment.
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let keyword = fields.next().unwrap_or("");
        let rest: Vec<&str> = fields.collect();

        let ok = match keyword {
            "v" => parse_floats::<3>(&rest).map(|v| positions.push(Vec3::from(v))),
            "vt" => parse_floats::<2>(&rest).map(|v| uvs.push(Vec2::from(v))),
            "vn" => parse_floats::<3>(&rest).map(|v| normals.push(Vec3::from(v))),
            "f" => parse_face(&rest, &positions, &uvs, &normals).map(|corners| {
                // Fan triangulation around corner 0.
                for t in 1..corners.len() - 1 {
                    let triangle = [corners[0], corners[t], corners[t + 1]];
                    emit_triangle(
                        triangle,
                        &positions,
                        &uvs,
                        &normals,
                        &mut dedup,
                        &mut model.mesh,
                    );
                }
            }),
            "mtllib" => {
                if let Some(name) = rest.first() {
                    model.material_libs.push((*name).to_string());
                }
                Some(())
            }
            // Grouping, smoothing, and material assignment are accepted and
            // ignored; the output is one merged mesh.
            _ => Some(()),
        };
        if ok.is_none() {
            warn!("obj line {line_no}: skipping malformed statement '{line}'");
            model.skipped_lines += 1;
        }
    }

    debug!(
        "parsed obj: {} vertices, {} triangles, {} lines skipped",
        model.mesh.vertex_count(),
        model.mesh.triangle_count(),
        model.skipped_lines
    );
    model
}

fn parse_floats<const N: usize>(fields: &[&str]) -> Option<[f32; N]> {
    if fields.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.parse().ok()?;
    }
    Some(out)
}

/// Parse a whole face statement; any bad corner rejects the face.
fn parse_face(
    fields: &[&str],
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
) -> Option<Vec<CornerRef>> {
    if fields.len() < 3 {
        return None;
    }
    fields
        .iter()
        .map(|field| parse_corner(field, positions, uvs, normals))
        .collect()
}

/// Parse one `f` field (`i`, `i/j`, `i//k`, or `i/j/k`) into 0-based refs.
fn parse_corner(
    field: &str,
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
) -> Option<CornerRef> {
    let mut parts = field.split('/');
    let position = parse_ref(parts.next().unwrap_or(""), positions.len(), false)?;
    let uv = parse_ref(parts.next().unwrap_or(""), uvs.len(), true)?;
    let normal = parse_ref(parts.next().unwrap_or(""), normals.len(), true)?;
    Some(CornerRef {
        position,
        uv,
        normal,
    })
}

/// Convert a 1-based OBJ reference to 0-based, bounds-checked. Empty fields
/// are only legal for optional references.
fn parse_ref(field: &str, count: usize, optional: bool) -> Option<i64> {
    if field.is_empty() {
        return optional.then_some(NO_INDEX);
    }
    let index: i64 = field.parse().ok()?;
    if index < 1 || index as usize > count {
        return None;
    }
    Some(index - 1)
}

fn emit_triangle(
    mut triangle: [CornerRef; 3],
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
    dedup: &mut HashMap<CornerRef, u32>,
    mesh: &mut MeshData,
) {
    // If any corner lacks an attribute, drop it for the whole triangle.
    if triangle.iter().any(|c| c.uv == NO_INDEX) {
        for corner in &mut triangle {
            corner.uv = NO_INDEX;
        }
    }
    if triangle.iter().any(|c| c.normal == NO_INDEX) {
        for corner in &mut triangle {
            corner.normal = NO_INDEX;
        }
    }

    for corner in triangle {
        let next = mesh.positions.len() as u32;
        let index = *dedup.entry(corner).or_insert_with(|| {
            mesh.positions.push(positions[corner.position as usize]);
            mesh.uvs.push(if corner.uv == NO_INDEX {
                Vec2::zeros()
            } else {
                uvs[corner.uv as usize]
            });
            mesh.normals.push(if corner.normal == NO_INDEX {
                Vec3::zeros()
            } else {
                normals[corner.normal as usize]
            });
            next
        });
        mesh.indices.push(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const QUAD_OBJ: &str = "\
# a textured quad
mtllib quad.mtl
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn quad_fan_triangulates_and_dedups() {
        let model = parse(QUAD_OBJ);
        let mesh = &model.mesh;

        assert_eq!(mesh.triangle_count(), 2);
        // Corners 1 and 3 are shared between the two fan triangles.
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(model.material_libs, vec!["quad.mtl".to_string()]);
        assert_eq!(model.skipped_lines, 0);
        assert_relative_eq!(mesh.positions[2], Vec3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(mesh.uvs[3], Vec2::new(0.0, 1.0));
        assert_relative_eq!(mesh.normals[0], Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn corners_dedup_only_on_full_triples() {
        // Same position used with two different normals stays two vertices.
        let source = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vn 0.0 1.0 0.0
f 1//1 2//1 3//1
f 1//2 2//1 3//1
";
        let mesh = parse(source).mesh;
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn missing_uv_on_one_corner_poisons_the_triangle() {
        // Corner 3 has no uv reference, so the whole triangle falls back to
        // the default uv and shares no vertices with a fully-mapped one.
        let source = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.5 0.5
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3//1
";
        let mesh = parse(source).mesh;
        assert_eq!(mesh.vertex_count(), 3);
        for uv in &mesh.uvs {
            assert_eq!(*uv, Vec2::zeros());
        }
    }

    #[test]
    fn position_only_faces_get_default_attributes() {
        let source = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";
        let mesh = parse(source).mesh;
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.uvs[0], Vec2::zeros());
        assert_eq!(mesh.normals[0], Vec3::zeros());
    }

    #[test]
    fn bad_faces_are_skipped_not_fatal() {
        // Out-of-range index, short face, malformed index: all skipped, the
        // valid face still parses.
        let source = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 9
f 1 2
f 1 two 3
f 1 2 3
";
        let model = parse(source);
        assert_eq!(model.skipped_lines, 3);
        assert_eq!(model.mesh.triangle_count(), 1);
        assert_eq!(model.mesh.vertex_count(), 3);
    }

    #[test]
    fn malformed_vertex_lines_are_skipped() {
        // The bad 'v' is dropped, shifting nothing: later statements still
        // index into the declared-so-far pools.
        let source = "\
v 0.0 zero 0.0
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";
        let model = parse(source);
        assert_eq!(model.skipped_lines, 1);
        assert_eq!(model.mesh.triangle_count(), 1);
        assert_relative_eq!(model.mesh.positions[0], Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn empty_input_yields_an_empty_model() {
        let model = parse("# nothing here\n");
        assert_eq!(model.mesh.vertex_count(), 0);
        assert_eq!(model.mesh.triangle_count(), 0);
    }
}
