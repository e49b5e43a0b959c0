/// Wavefront OBJ parser for wireframe geometry
use nom::{
    bytes::complete::take_till,
    character::complete::{char, digit1, space0, space1},
    combinator::{map_res, opt, recognize},
    multi::separated_list1,
    number::complete::float,
    sequence::{pair, preceded},
    IResult,
};

use nalgebra::Point3;
use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::scene::Edge;

/// Mesh loading failure. All variants are recoverable; the caller keeps
/// its previous scene.
#[derive(Debug)]
pub enum MeshError {
    Io(io::Error),
    /// A `v`, `f` or `l` record whose payload did not parse.
    Syntax { line: usize, message: String },
    /// A face or line record referencing a vertex that does not exist.
    IndexOutOfRange { line: usize, index: isize, vertex_count: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::Io(err) => write!(f, "failed to read mesh file: {err}"),
            MeshError::Syntax { line, message } => {
                write!(f, "malformed record on line {line}: {message}")
            }
            MeshError::IndexOutOfRange { line, index, vertex_count } => write!(
                f,
                "vertex index {index} on line {line} is out of range ({vertex_count} vertices defined)"
            ),
        }
    }
}

impl Error for MeshError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MeshError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for MeshError {
    fn from(err: io::Error) -> Self {
        MeshError::Io(err)
    }
}

/// Parsed wireframe geometry: vertex positions plus deduplicated
/// undirected edges.
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    pub vertices: Vec<Point3<f32>>,
    pub edges: Vec<Edge>,
}

/// Read and parse an OBJ file from disk.
pub fn load_obj(path: &Path) -> Result<ObjMesh, MeshError> {
    let text = fs::read_to_string(path)?;
    parse_obj(&text)
}

/// Parse OBJ text into wireframe geometry.
///
/// Recognized records are `v` (position, extra components ignored), `f`
/// (face, texture/normal suffixes accepted and ignored) and `l`
/// (polyline). Faces contribute their boundary edges, polylines their
/// consecutive edges; shared edges are deduplicated. Comments and other
/// record types (`vn`, `vt`, `o`, `g`, `s`, `usemtl`, ...) are skipped.
///
/// Indices are 1-based; negative indices are relative to the vertices
/// defined so far, per the format. Any index outside the defined range
/// is rejected here so the scene never has to bounds-check per frame.
pub fn parse_obj(input: &str) -> Result<ObjMesh, MeshError> {
    let mut mesh = ObjMesh::default();
    let mut seen = HashSet::new();

    for (number, raw) in input.lines().enumerate() {
        let line = number + 1;
        let trimmed = raw.trim_start();

        if let Some(payload) = record_payload(trimmed, "v") {
            let (_, position) = parse_position(payload).map_err(|e| MeshError::Syntax {
                line,
                message: format!("vertex position: {e}"),
            })?;
            mesh.vertices.push(position);
        } else if let Some(payload) = record_payload(trimmed, "f") {
            let indices = parse_indices(payload, line, mesh.vertices.len())?;
            if indices.len() < 3 {
                return Err(MeshError::Syntax {
                    line,
                    message: format!("face with {} vertices", indices.len()),
                });
            }
            for i in 0..indices.len() {
                let next = (i + 1) % indices.len();
                push_edge(&mut mesh.edges, &mut seen, indices[i], indices[next]);
            }
        } else if let Some(payload) = record_payload(trimmed, "l") {
            let indices = parse_indices(payload, line, mesh.vertices.len())?;
            if indices.len() < 2 {
                return Err(MeshError::Syntax {
                    line,
                    message: "polyline with fewer than 2 vertices".to_string(),
                });
            }
            for window in indices.windows(2) {
                push_edge(&mut mesh.edges, &mut seen, window[0], window[1]);
            }
        }
    }

    Ok(mesh)
}

/// Strip a record keyword and return its payload, or `None` if the line
/// is a different record type.
fn record_payload<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

fn push_edge(edges: &mut Vec<Edge>, seen: &mut HashSet<(usize, usize)>, a: usize, b: usize) {
    if a == b {
        return;
    }
    let key = (a.min(b), a.max(b));
    if seen.insert(key) {
        edges.push(Edge { a, b });
    }
}

fn parse_position(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, x) = preceded(space0, float)(input)?;
    let (input, y) = preceded(space1, float)(input)?;
    let (input, z) = preceded(space1, float)(input)?;
    // Optional w component and anything after it are ignored.
    Ok((input, Point3::new(x, y, z)))
}

/// One face/polyline index: an integer, optionally followed by
/// `/texture/normal` references which this wireframe pipeline discards.
fn parse_index(input: &str) -> IResult<&str, isize> {
    let (input, index) =
        map_res(recognize(pair(opt(char('-')), digit1)), str::parse::<isize>)(input)?;
    let (input, _) = opt(preceded(char('/'), take_till(|c: char| c.is_whitespace())))(input)?;
    Ok((input, index))
}

fn parse_index_list(input: &str) -> IResult<&str, Vec<isize>> {
    let (input, _) = space0(input)?;
    let (input, indices) = separated_list1(space1, parse_index)(input)?;
    let (input, _) = space0(input)?;
    Ok((input, indices))
}

fn parse_indices(payload: &str, line: usize, vertex_count: usize) -> Result<Vec<usize>, MeshError> {
    let (rest, raw) = parse_index_list(payload).map_err(|e| MeshError::Syntax {
        line,
        message: format!("index list: {e}"),
    })?;
    if !rest.trim().is_empty() {
        return Err(MeshError::Syntax {
            line,
            message: format!("trailing content {:?}", rest.trim()),
        });
    }

    raw.into_iter()
        .map(|index| {
            let resolved = if index > 0 {
                index as usize - 1
            } else if index < 0 {
                let back = (-index) as usize;
                if back > vertex_count {
                    return Err(MeshError::IndexOutOfRange { line, index, vertex_count });
                }
                vertex_count - back
            } else {
                return Err(MeshError::IndexOutOfRange { line, index, vertex_count });
            };
            if resolved >= vertex_count {
                return Err(MeshError::IndexOutOfRange { line, index, vertex_count });
            }
            Ok(resolved)
        })
        .collect()
}

/// A unit cube centered on the origin: 8 vertices, 6 quad faces.
/// Used as the default scene when no mesh file is supplied.
pub const UNIT_CUBE_OBJ: &str = "\
v -0.5 -0.5 -0.5
v 0.5 -0.5 -0.5
v 0.5 0.5 -0.5
v -0.5 0.5 -0.5
v -0.5 -0.5 0.5
v 0.5 -0.5 0.5
v 0.5 0.5 0.5
v -0.5 0.5 0.5
f 1 2 3 4
f 5 6 7 8
f 1 2 6 5
f 4 3 7 8
f 1 4 8 5
f 2 3 7 6
";
