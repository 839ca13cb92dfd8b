//! Mesh data, OBJ parsing and the placeholder fallback policy.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use log::warn;
use thiserror::Error;

/// Largest bounding-box dimension of a normalized mesh.
const TARGET_SIZE: f32 = 2.0;

#[derive(Error, Debug)]
pub enum MeshError {
    #[error("asset is not valid UTF-8")]
    NotText,
    #[error("invalid OBJ at line {line}: {reason}")]
    InvalidObj { line: usize, reason: String },
    #[error("OBJ contains no faces")]
    NoFaces,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f32 {
        let s = self.size();
        s.x.max(s.y).max(s.z)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Fixed-size stand-in shown when the real asset cannot be used.
    /// Unit cube, same uniform material as a parsed mesh.
    pub fn placeholder_cube() -> Self {
        let faces: [([f32; 3], [Vec3; 4]); 6] = [
            // +X
            ([1.0, 0.0, 0.0], [
                Vec3::new(0.5, -0.5, -0.5),
                Vec3::new(0.5, 0.5, -0.5),
                Vec3::new(0.5, 0.5, 0.5),
                Vec3::new(0.5, -0.5, 0.5),
            ]),
            // -X
            ([-1.0, 0.0, 0.0], [
                Vec3::new(-0.5, -0.5, 0.5),
                Vec3::new(-0.5, 0.5, 0.5),
                Vec3::new(-0.5, 0.5, -0.5),
                Vec3::new(-0.5, -0.5, -0.5),
            ]),
            // +Y
            ([0.0, 1.0, 0.0], [
                Vec3::new(-0.5, 0.5, -0.5),
                Vec3::new(-0.5, 0.5, 0.5),
                Vec3::new(0.5, 0.5, 0.5),
                Vec3::new(0.5, 0.5, -0.5),
            ]),
            // -Y
            ([0.0, -1.0, 0.0], [
                Vec3::new(-0.5, -0.5, 0.5),
                Vec3::new(-0.5, -0.5, -0.5),
                Vec3::new(0.5, -0.5, -0.5),
                Vec3::new(0.5, -0.5, 0.5),
            ]),
            // +Z
            ([0.0, 0.0, 1.0], [
                Vec3::new(-0.5, -0.5, 0.5),
                Vec3::new(0.5, -0.5, 0.5),
                Vec3::new(0.5, 0.5, 0.5),
                Vec3::new(-0.5, 0.5, 0.5),
            ]),
            // -Z
            ([0.0, 0.0, -1.0], [
                Vec3::new(0.5, -0.5, -0.5),
                Vec3::new(-0.5, -0.5, -0.5),
                Vec3::new(-0.5, 0.5, -0.5),
                Vec3::new(0.5, 0.5, -0.5),
            ]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners) in faces {
            let base = vertices.len() as u32;
            for c in corners {
                vertices.push(Vertex {
                    position: c.to_array(),
                    normal,
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    pub fn bounds(&self) -> Bounds {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for v in &self.vertices {
            let p = Vec3::from_array(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        Bounds { min, max }
    }

    /// Recentre at the origin and uniformly scale so the largest
    /// bounding-box dimension equals [`TARGET_SIZE`].
    pub fn normalize(&mut self) {
        if self.vertices.is_empty() {
            return;
        }
        let bounds = self.bounds();
        let center = bounds.center();
        let max_dim = bounds.max_dimension();
        let scale = if max_dim > 0.0 { TARGET_SIZE / max_dim } else { 1.0 };

        for v in &mut self.vertices {
            let p = (Vec3::from_array(v.position) - center) * scale;
            v.position = p.to_array();
        }
    }
}

/// Mesh formats the viewer can actually parse. The capability query:
/// anything else falls back to the placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
}

impl MeshFormat {
    pub fn from_name(filename: &str) -> Option<Self> {
        let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }
}

/// Why the loaded mesh is (or is not) the real asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Parsed,
    UnrecognizedFormat,
    ParseFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAsset {
    pub mesh: Mesh,
    pub outcome: LoadOutcome,
}

impl LoadedAsset {
    pub fn substituted(&self) -> bool {
        self.outcome != LoadOutcome::Parsed
    }
}

/// Asset load policy. Recognized formats are parsed and normalized;
/// any problem substitutes the placeholder cube so the viewer never
/// shows a blank scene. Total - this cannot fail.
pub fn load_asset(filename: &str, bytes: &[u8]) -> LoadedAsset {
    match MeshFormat::from_name(filename) {
        Some(MeshFormat::Obj) => match parse_obj(bytes) {
            Ok(mut mesh) => {
                mesh.normalize();
                LoadedAsset {
                    mesh,
                    outcome: LoadOutcome::Parsed,
                }
            }
            Err(e) => {
                warn!("Failed to parse {filename}, showing placeholder: {e}");
                LoadedAsset {
                    mesh: Mesh::placeholder_cube(),
                    outcome: LoadOutcome::ParseFailed,
                }
            }
        },
        None => {
            warn!("No parser for {filename}, showing placeholder");
            LoadedAsset {
                mesh: Mesh::placeholder_cube(),
                outcome: LoadOutcome::UnrecognizedFormat,
            }
        }
    }
}

/// Minimal Wavefront OBJ parser: `v` and `vn` records, `f` faces in
/// the `i`, `i/j`, `i//k` and `i/j/k` forms with 1-based or negative
/// indices. Polygons are fan-triangulated. Vertices are emitted per
/// face corner; when a corner has no `vn` reference the face normal
/// is used.
pub fn parse_obj(bytes: &[u8]) -> Result<Mesh, MeshError> {
    let text = std::str::from_utf8(bytes).map_err(|_| MeshError::NotText)?;

    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                positions.push(parse_vec3(parts, line_no)?);
            }
            Some("vn") => {
                normals.push(parse_vec3(parts, line_no)?);
            }
            Some("f") => {
                let corners: Vec<(Vec3, Option<Vec3>)> = parts
                    .map(|c| parse_corner(c, &positions, &normals, line_no))
                    .collect::<Result<_, _>>()?;
                if corners.len() < 3 {
                    return Err(MeshError::InvalidObj {
                        line: line_no + 1,
                        reason: format!("face with {} corners", corners.len()),
                    });
                }

                for i in 1..corners.len() - 1 {
                    let tri = [corners[0], corners[i], corners[i + 1]];
                    let face_normal = (tri[1].0 - tri[0].0)
                        .cross(tri[2].0 - tri[0].0)
                        .normalize_or_zero();
                    for (pos, vn) in tri {
                        vertices.push(Vertex {
                            position: pos.to_array(),
                            normal: vn.unwrap_or(face_normal).to_array(),
                        });
                        indices.push((vertices.len() - 1) as u32);
                    }
                }
            }
            // Ignore vt, o, g, s, usemtl, mtllib, comments and blanks.
            _ => {}
        }
    }

    if indices.is_empty() {
        return Err(MeshError::NoFaces);
    }

    Ok(Mesh { vertices, indices })
}

fn parse_vec3<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<Vec3, MeshError> {
    let mut next = |axis: &str| {
        parts
            .next()
            .and_then(|s| s.parse::<f32>().ok())
            .ok_or_else(|| MeshError::InvalidObj {
                line: line_no + 1,
                reason: format!("missing or bad {axis} component"),
            })
    };
    Ok(Vec3::new(next("x")?, next("y")?, next("z")?))
}

fn parse_corner(
    corner: &str,
    positions: &[Vec3],
    normals: &[Vec3],
    line_no: usize,
) -> Result<(Vec3, Option<Vec3>), MeshError> {
    let bad = |reason: String| MeshError::InvalidObj {
        line: line_no + 1,
        reason,
    };

    let mut it = corner.split('/');
    let pos_idx = it
        .next()
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| bad(format!("bad vertex reference '{corner}'")))?;
    let _tex = it.next();
    let normal_idx = it.next().filter(|s| !s.is_empty());

    let pos = *resolve_index(pos_idx, positions)
        .ok_or_else(|| bad(format!("vertex index {pos_idx} out of range")))?;

    let normal = match normal_idx {
        Some(s) => {
            let idx = s
                .parse::<i64>()
                .map_err(|_| bad(format!("bad normal reference '{corner}'")))?;
            Some(
                *resolve_index(idx, normals)
                    .ok_or_else(|| bad(format!("normal index {idx} out of range")))?,
            )
        }
        None => None,
    };

    Ok((pos, normal))
}

/// OBJ indices are 1-based; negative values count back from the end.
fn resolve_index<T>(idx: i64, items: &[T]) -> Option<&T> {
    if idx > 0 {
        items.get(idx as usize - 1)
    } else if idx < 0 {
        let back = (-idx) as usize;
        items.len().checked_sub(back).map(|i| &items[i])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
v 0 0 0
v 4 0 0
v 0 4 0
f 1 2 3
";

    #[test]
    fn parses_a_triangle() {
        let mesh = parse_obj(TRIANGLE.as_bytes()).unwrap();
        assert_eq!(mesh.indices.len(), 3);
        assert_eq!(mesh.vertices.len(), 3);
        // Face normal computed for +Z winding.
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn parses_quads_and_normals() {
        let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
";
        let mesh = parse_obj(obj.as_bytes()).unwrap();
        // Quad fan-triangulated into two triangles.
        assert_eq!(mesh.indices.len(), 6);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn negative_indices_resolve_from_end() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
";
        let mesh = parse_obj(obj.as_bytes()).unwrap();
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_obj(&[0xff, 0xfe, 0x00]).is_err());
        assert!(matches!(
            parse_obj(b"v 0 0 0\nv 1 0 0\n"),
            Err(MeshError::NoFaces)
        ));
        assert!(parse_obj(b"v 0 0\nf 1 2 3\n").is_err());
        assert!(parse_obj(b"v 0 0 0\nf 1 2 9\n").is_err());
    }

    #[test]
    fn normalize_recentres_and_scales() {
        let mut mesh = parse_obj(TRIANGLE.as_bytes()).unwrap();
        mesh.normalize();
        let bounds = mesh.bounds();
        assert!((bounds.max_dimension() - 2.0).abs() < 1e-5);
        let center = bounds.center();
        assert!(center.length() < 1e-5);
    }

    #[test]
    fn placeholder_cube_shape() {
        let cube = Mesh::placeholder_cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert!((cube.bounds().max_dimension() - 1.0).abs() < 1e-6);
        assert_eq!(cube.bounds().center(), Vec3::ZERO);
    }

    #[test]
    fn load_policy_parses_recognized_format() {
        let asset = load_asset("model.obj", TRIANGLE.as_bytes());
        assert_eq!(asset.outcome, LoadOutcome::Parsed);
        assert!(!asset.substituted());
        assert!((asset.mesh.bounds().max_dimension() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn load_policy_substitutes_on_unknown_extension() {
        let asset = load_asset("model.glb", b"binary stuff");
        assert_eq!(asset.outcome, LoadOutcome::UnrecognizedFormat);
        assert!(asset.substituted());
        assert_eq!(asset.mesh, Mesh::placeholder_cube());
    }

    #[test]
    fn load_policy_substitutes_on_parse_failure() {
        let asset = load_asset("model.obj", b"not an obj at all");
        assert_eq!(asset.outcome, LoadOutcome::ParseFailed);
        assert!(asset.substituted());
    }

    #[test]
    fn format_detection_is_case_insensitive() {
        assert_eq!(MeshFormat::from_name("A.OBJ"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_name("a.ply"), None);
        assert_eq!(MeshFormat::from_name("noext"), None);
    }
}
