use crate::mesh::face_normals;
use crate::{MeshData, ObjError};

/// Meshes of an OBJ document split by `g` statement, in order of first
/// appearance. Faces before any `g` belong to the group named `""`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjGroups {
    groups: Vec<(String, MeshData)>,
}

impl ObjGroups {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MeshData> {
        self.groups.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MeshData)> + '_ {
        self.groups.iter().map(|(n, m)| (n.as_str(), m))
    }

    /// Concatenate every group whose name passes `keep`, in document order.
    pub fn merged(&self, keep: impl Fn(&str) -> bool) -> MeshData {
        let mut out = MeshData::default();
        for (name, mesh) in &self.groups {
            if keep(name) {
                out.extend(mesh);
            }
        }
        out
    }

    fn group_mut(&mut self, name: &str) -> &mut MeshData {
        let index = match self.groups.iter().position(|(n, _)| n == name) {
            Some(i) => i,
            None => {
                self.groups.push((name.to_string(), MeshData::default()));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index].1
    }
}

/// Read every face of an OBJ document into one mesh.
pub fn read_obj(text: &str) -> Result<MeshData, ObjError> {
    Ok(read_obj_by_group(text)?.merged(|_| true))
}

/// Read an OBJ document keeping each group's faces apart.
///
/// Supports `v`, `vt`, `vn`, `g` and `f`. Face corners may be `v`, `v/vt`,
/// `v//vn` or `v/vt/vn`; a bare index also selects the texture coordinate and
/// normal with the same number when the document has any. Negative indices
/// count back from the most recent element. Polygons are split into a
/// triangle fan around their first corner. Triangles without normals get
/// their face normal.
pub fn read_obj_by_group(text: &str) -> Result<ObjGroups, ObjError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();
    let mut group = String::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let content = raw.split('#').next().unwrap_or_default();
        let mut tokens = content
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty());
        let Some(keyword) = tokens.next() else {
            continue;
        };
        match keyword {
            "v" => positions.push(numbers(line, tokens, 3)?),
            "vn" => normals.push(numbers(line, tokens, 3)?),
            "vt" => {
                let [u, v] = numbers(line, tokens, 1)?;
                texcoords.push([u, v]);
            }
            "g" => group = tokens.next().unwrap_or_default().to_string(),
            "f" => {
                let corners = tokens
                    .map(|t| RawCorner::parse(line, t))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(ObjError::ShortFace {
                        line,
                        found: corners.len(),
                    });
                }
                faces.push(Face {
                    line,
                    group: group.clone(),
                    corners,
                    seen: (positions.len(), texcoords.len(), normals.len()),
                });
            }
            _ => {}
        }
    }

    let tables = Tables {
        positions: &positions,
        texcoords: &texcoords,
        normals: &normals,
    };
    let mut out = ObjGroups::default();
    let mut partial_uv: Vec<String> = Vec::new();
    for face in &faces {
        let corners = face
            .corners
            .iter()
            .map(|c| tables.resolve(face, c))
            .collect::<Result<Vec<_>, _>>()?;
        let mesh = out.group_mut(&face.group);
        for k in 1..corners.len() - 1 {
            let tri = [corners[0], corners[k], corners[k + 1]];
            emit_triangle(mesh, &tables, &tri);
            if tri.iter().any(|c| c.vt.is_none()) && !partial_uv.contains(&face.group) {
                partial_uv.push(face.group.clone());
            }
        }
    }
    for name in partial_uv {
        out.group_mut(&name).texcoords.clear();
    }

    tracing::debug!(
        groups = out.len(),
        positions = positions.len(),
        faces = faces.len(),
        "obj parsed"
    );
    Ok(out)
}

struct Face {
    line: usize,
    group: String,
    corners: Vec<RawCorner>,
    /// Table sizes when the face was read; relative indices count back from here.
    seen: (usize, usize, usize),
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Given(i64),
    /// Bare `f 1 2 3` corner: reuse the position index if the table has entries.
    Implied,
    Absent,
}

struct RawCorner {
    v: i64,
    vt: Slot,
    vn: Slot,
}

impl RawCorner {
    fn parse(line: usize, token: &str) -> Result<Self, ObjError> {
        let index = |s: &str| {
            s.parse::<i64>().map_err(|_| ObjError::Number {
                line,
                token: s.to_string(),
            })
        };
        let slot = |s: Option<&str>| match s {
            None | Some("") => Ok(Slot::Absent),
            Some(s) => index(s).map(Slot::Given),
        };

        if !token.contains('/') {
            return Ok(Self {
                v: index(token)?,
                vt: Slot::Implied,
                vn: Slot::Implied,
            });
        }
        let mut parts = token.split('/');
        let v = match parts.next() {
            Some(s) if !s.is_empty() => index(s)?,
            _ => {
                return Err(ObjError::MissingPosition {
                    line,
                    token: token.to_string(),
                });
            }
        };
        Ok(Self {
            v,
            vt: slot(parts.next())?,
            vn: slot(parts.next())?,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Corner {
    v: usize,
    vt: Option<usize>,
    vn: Option<usize>,
}

struct Tables<'a> {
    positions: &'a [[f32; 3]],
    texcoords: &'a [[f32; 2]],
    normals: &'a [[f32; 3]],
}

impl Tables<'_> {
    fn resolve(&self, face: &Face, raw: &RawCorner) -> Result<Corner, ObjError> {
        let (seen_v, seen_vt, seen_vn) = face.seen;
        let v = lookup(face.line, "position", raw.v, seen_v, self.positions.len())?;
        let optional = |slot: Slot, kind, seen, len| match slot {
            Slot::Given(i) => lookup(face.line, kind, i, seen, len).map(Some),
            Slot::Implied if len > 0 => lookup(face.line, kind, raw.v, seen, len).map(Some),
            _ => Ok(None),
        };
        Ok(Corner {
            v,
            vt: optional(raw.vt, "texture", seen_vt, self.texcoords.len())?,
            vn: optional(raw.vn, "normal", seen_vn, self.normals.len())?,
        })
    }
}

/// One-based index, or negative index relative to the `seen` elements read so far.
fn lookup(line: usize, kind: &'static str, index: i64, seen: usize, len: usize) -> Result<usize, ObjError> {
    let resolved = match index {
        i if i > 0 => Some(i as usize - 1),
        i if i < 0 => seen.checked_sub(i.unsigned_abs() as usize),
        _ => None,
    };
    resolved.filter(|&r| r < len).ok_or(ObjError::Index {
        line,
        kind,
        index,
        available: len,
    })
}

fn numbers<'a, const N: usize>(
    line: usize,
    tokens: impl Iterator<Item = &'a str>,
    required: usize,
) -> Result<[f32; N], ObjError> {
    let mut out = [0.0; N];
    let mut tokens = tokens;
    for (k, slot) in out.iter_mut().enumerate() {
        match tokens.next() {
            Some(t) => {
                *slot = t.parse().map_err(|_| ObjError::Number {
                    line,
                    token: t.to_string(),
                })?;
            }
            None if k < required => {
                return Err(ObjError::Number {
                    line,
                    token: String::new(),
                });
            }
            None => break,
        }
    }
    Ok(out)
}

fn emit_triangle(mesh: &mut MeshData, tables: &Tables<'_>, tri: &[Corner; 3]) {
    let start = mesh.positions.len();
    for c in tri {
        mesh.positions.extend_from_slice(&tables.positions[c.v]);
        if let Some(t) = c.vt {
            mesh.texcoords.extend_from_slice(&tables.texcoords[t]);
        }
    }
    if tri.iter().all(|c| c.vn.is_some()) {
        for c in tri.iter().filter_map(|c| c.vn) {
            mesh.normals.extend_from_slice(&tables.normals[c]);
        }
    } else {
        let face = face_normals(&mesh.positions[start..]);
        mesh.normals.extend_from_slice(&face);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "\
# unit square
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn quad_is_fan_triangulated() {
        let mesh = read_obj(SQUARE).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(
            mesh.positions,
            vec![
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
            ]
        );
        assert_eq!(mesh.normals.len(), 18);
        assert!(mesh.normals.chunks(3).all(|n| n == [0.0, 0.0, 1.0]));
        assert_eq!(mesh.texcoords.len(), 12);
    }

    #[test]
    fn bare_indices_reuse_normal_table() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 1 0 0\nvn 0 1 0\nvn 0 0 1\nf 1 2 3\n";
        let mesh = read_obj(text).unwrap();
        assert_eq!(mesh.normals, vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert!(mesh.texcoords.is_empty());
    }

    #[test]
    fn missing_normals_use_face_normal() {
        let text = "v 0 0 0\nv 0 0 1\nv 1 0 0\nf 1 2 3\n";
        let mesh = read_obj(text).unwrap();
        assert!(mesh.normals.chunks(3).all(|n| n == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn negative_indices_count_back() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\nv 5 5 5\nf -4 -3 -1\n";
        let mesh = read_obj(text).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(&mesh.positions[15..18], &[5.0, 5.0, 5.0]);
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let err = read_obj("v 0 0 0\nv 1 0 0\nf 1 2 3\n").unwrap_err();
        assert_eq!(
            err,
            ObjError::Index {
                line: 3,
                kind: "position",
                index: 3,
                available: 2
            }
        );
        assert!(read_obj("v 0 0 0\nf 0 1 1\n").is_err());
    }

    #[test]
    fn malformed_input_is_reported_with_line() {
        assert_eq!(
            read_obj("v 0 zero 0\n").unwrap_err(),
            ObjError::Number {
                line: 1,
                token: "zero".into()
            }
        );
        assert_eq!(
            read_obj("v 0 0 0\nf 1 1\n").unwrap_err(),
            ObjError::ShortFace { line: 2, found: 2 }
        );
        assert!(matches!(
            read_obj("v 0 0 0\nf /1 1 1\n").unwrap_err(),
            ObjError::MissingPosition { line: 2, .. }
        ));
    }

    #[test]
    fn groups_keep_document_order() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
g Body
f 1 2 3
g Propeller
f 3 2 1
g Body
f 1 3 2
";
        let groups = read_obj_by_group(text).unwrap();
        assert_eq!(groups.names().collect::<Vec<_>>(), vec!["Body", "Propeller"]);
        assert_eq!(groups.get("Body").map(MeshData::vertex_count), Some(6));
        assert_eq!(groups.get("Propeller").map(MeshData::vertex_count), Some(3));

        let body_only = groups.merged(|name| name != "Propeller");
        assert_eq!(body_only.vertex_count(), 6);
        assert_eq!(read_obj(text).unwrap().vertex_count(), 9);
    }

    #[test]
    fn comma_separated_tokens_are_accepted() {
        let mesh = read_obj("v 0,0,0\nv 1,0,0\nv 0,1,0\nf 1,2,3\n").unwrap();
        assert_eq!(mesh.vertex_count(), 3);
    }
}
