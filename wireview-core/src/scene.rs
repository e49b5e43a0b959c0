/// Scene model: vertices, edges and the active camera
use nalgebra::Point3;
use std::path::Path;

use crate::camera::{Camera, ScreenPoint};
use crate::obj::{self, MeshError, ObjMesh};

/// An undirected edge between two vertex indices. Validity of the
/// indices is an invariant established at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

/// The scene owns the vertex arena, the edge list indexing into it, the
/// active camera, and the per-frame projected-point array.
///
/// The projected array is parallel to the vertex list (`None` marks a
/// vertex behind the camera), lives for a single frame and is
/// overwritten in place by every [`Scene::project_points`] call.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    vertices: Vec<Point3<f32>>,
    edges: Vec<Edge>,
    pub camera: Camera,
    projected: Vec<Option<ScreenPoint>>,
}

impl Scene {
    /// Empty scene with a default camera.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn projected_points(&self) -> &[Option<ScreenPoint>] {
        &self.projected
    }

    /// Replace the active camera wholesale.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Load a mesh file, replacing the current geometry.
    ///
    /// The file is parsed completely before anything is swapped in, so a
    /// failed load leaves the previous scene intact (last-good policy)
    /// and a concurrent reader can never observe a half-loaded mesh.
    /// The camera is unaffected.
    pub fn load_obj(&mut self, path: &Path) -> Result<(), MeshError> {
        let mesh = obj::load_obj(path)?;
        self.replace_geometry(mesh);
        Ok(())
    }

    /// Parse OBJ text, replacing the current geometry. Same swap
    /// semantics as [`Scene::load_obj`].
    pub fn load_obj_str(&mut self, source: &str) -> Result<(), MeshError> {
        let mesh = obj::parse_obj(source)?;
        self.replace_geometry(mesh);
        Ok(())
    }

    fn replace_geometry(&mut self, mesh: ObjMesh) {
        log::debug!(
            "scene geometry replaced: {} vertices, {} edges",
            mesh.vertices.len(),
            mesh.edges.len()
        );
        self.vertices = mesh.vertices;
        self.edges = mesh.edges;
        self.projected.clear();
    }

    /// Empty the vertex and edge lists and release projected-point
    /// storage. The camera is unaffected.
    pub fn erase(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.projected = Vec::new();
    }

    /// Maximum distance from the world origin to any vertex, 0.0 for an
    /// empty scene. Movement speed and the idle orbit scale by this so
    /// the controls feel the same regardless of mesh size.
    pub fn radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.coords.norm())
            .fold(0.0, f32::max)
    }

    /// Project every vertex through the camera into the parallel
    /// projected-point array. Called once per frame before drawing;
    /// idempotent for a fixed camera state.
    pub fn project_points(&mut self) {
        self.projected.clear();
        self.projected
            .extend(self.vertices.iter().map(|v| self.camera.project(v)));
    }

    /// Edges whose endpoints both projected to valid screen positions,
    /// as drawable segment endpoints. Relies on the last
    /// [`Scene::project_points`] call.
    pub fn visible_edges(&self) -> impl Iterator<Item = (ScreenPoint, ScreenPoint)> + '_ {
        self.edges.iter().filter_map(|edge| {
            let a = self.projected.get(edge.a).copied().flatten()?;
            let b = self.projected.get(edge.b).copied().flatten()?;
            Some((a, b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn cube_scene() -> Scene {
        let mut scene = Scene::new();
        scene.load_obj_str(crate::obj::UNIT_CUBE_OBJ).unwrap();
        scene
    }

    #[test]
    fn test_radius_empty_scene_is_zero() {
        assert_eq!(Scene::new().radius(), 0.0);
    }

    #[test]
    fn test_radius_single_vertex() {
        let mut scene = Scene::new();
        scene.load_obj_str("v 3 0 4\n").unwrap();
        assert_relative_eq!(scene.radius(), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_radius_takes_maximum() {
        let mut scene = Scene::new();
        scene.load_obj_str("v 1 0 0\nv 0 -9 0\nv 0 0 2\n").unwrap();
        assert_relative_eq!(scene.radius(), 9.0, epsilon = 1e-6);
    }

    #[test]
    fn test_project_points_parallel_to_vertices() {
        let mut scene = cube_scene();
        scene.camera.position = Point3::new(0.0, 0.0, 5.0);
        scene.camera.set_look_direction(-Vector3::z());
        scene.project_points();
        assert_eq!(scene.projected_points().len(), scene.vertices().len());
        assert!(scene.projected_points().iter().all(|p| p.is_some()));
    }

    #[test]
    fn test_project_points_is_idempotent() {
        let mut scene = cube_scene();
        scene.camera.position = Point3::new(0.0, 0.0, 5.0);
        scene.project_points();
        let first = scene.projected_points().to_vec();
        scene.project_points();
        assert_eq!(scene.projected_points(), &first[..]);
    }

    #[test]
    fn test_all_cube_edges_visible_when_facing_it() {
        let mut scene = cube_scene();
        scene.camera.position = Point3::new(0.0, 0.0, 5.0);
        scene.camera.set_look_direction(-Vector3::z());
        scene.project_points();
        assert_eq!(scene.visible_edges().count(), 12);
    }

    #[test]
    fn test_no_edges_visible_when_facing_away() {
        let mut scene = cube_scene();
        scene.camera.position = Point3::new(0.0, 0.0, 5.0);
        scene.camera.set_look_direction(Vector3::z());
        scene.project_points();
        assert_eq!(scene.visible_edges().count(), 0);
    }

    #[test]
    fn test_edge_skipped_when_one_endpoint_behind() {
        let mut scene = Scene::new();
        // One vertex ahead of the camera, one behind
        scene.load_obj_str("v 0 0 -5\nv 0 0 5\nv 1 0 -5\nl 1 2\nl 1 3\n").unwrap();
        scene.project_points();
        assert_eq!(scene.visible_edges().count(), 1);
    }

    #[test]
    fn test_failed_load_keeps_previous_geometry() {
        let mut scene = cube_scene();
        let err = scene.load_obj_str("v 1 2\n");
        assert!(err.is_err());
        assert_eq!(scene.vertices().len(), 8);
        assert_eq!(scene.edges().len(), 12);
    }

    #[test]
    fn test_erase_clears_geometry_but_not_camera() {
        let mut scene = cube_scene();
        scene.camera.position = Point3::new(1.0, 2.0, 3.0);
        scene.project_points();
        scene.erase();
        assert!(scene.vertices().is_empty());
        assert!(scene.edges().is_empty());
        assert!(scene.projected_points().is_empty());
        assert_eq!(scene.camera.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_projected_storage_resizes_on_reload() {
        let mut scene = cube_scene();
        scene.project_points();
        assert_eq!(scene.projected_points().len(), 8);
        scene.load_obj_str("v 0 0 -1\nv 1 0 -1\nl 1 2\n").unwrap();
        scene.project_points();
        assert_eq!(scene.projected_points().len(), 2);
    }
}
