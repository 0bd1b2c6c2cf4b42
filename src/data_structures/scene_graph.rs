//! The retained scene.
//!
//! A [`Scene`] is a flat list of [`Mesh`]es. Meshes reference geometries by
//! [`GeometryId`], so all decorative shapes of one kind share one geometry. The
//! scene tracks whether anything changed since the renderer last looked at it.

use std::collections::HashMap;

use crate::{data_structures::instance::Instance, geometry::Geometry, theme::Theme};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(u32);

/// A matcap material. Every construction gets a new id, even for the same theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Material {
    pub id: MaterialId,
    pub matcap: Theme,
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: Option<String>,
    pub geometry: GeometryId,
    pub material: Material,
    pub transform: Instance,
}

#[derive(Debug, Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
    geometries: HashMap<GeometryId, Geometry>,
    next_geometry: u32,
    next_material: u32,
    dirty: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        let id = GeometryId(self.next_geometry);
        self.next_geometry += 1;
        self.geometries.insert(id, geometry);
        self.dirty = true;
        id
    }

    pub fn new_material(&mut self, matcap: Theme) -> Material {
        let id = MaterialId(self.next_material);
        self.next_material += 1;
        Material { id, matcap }
    }

    /// Add a mesh. A named mesh replaces any mesh that already carries its name.
    pub fn add(&mut self, mesh: Mesh) {
        if !self.geometries.contains_key(&mesh.geometry) {
            log::warn!(
                "mesh {:?} references unknown geometry {:?}",
                mesh.name,
                mesh.geometry
            );
        }
        let replaced = mesh
            .name
            .as_deref()
            .and_then(|name| self.position_named(name))
            .map(|idx| self.meshes.remove(idx));
        self.meshes.push(mesh);
        if let Some(replaced) = replaced {
            self.prune(replaced.geometry);
        }
        self.dirty = true;
    }

    /// Remove the mesh called `name`. Geometries no longer referenced are dropped.
    pub fn remove_named(&mut self, name: &str) -> Option<Mesh> {
        let idx = self.position_named(name)?;
        let removed = self.meshes.remove(idx);
        self.prune(removed.geometry);
        self.dirty = true;
        Some(removed)
    }

    fn position_named(&self, name: &str) -> Option<usize> {
        self.meshes
            .iter()
            .position(|mesh| mesh.name.as_deref() == Some(name))
    }

    fn prune(&mut self, geometry: GeometryId) {
        if !self.meshes.iter().any(|m| m.geometry == geometry) {
            self.geometries.remove(&geometry);
        }
    }

    pub fn find_named(&self, name: &str) -> Option<&Mesh> {
        self.meshes
            .iter()
            .find(|mesh| mesh.name.as_deref() == Some(name))
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(&id)
    }

    pub fn geometry_ids(&self) -> impl Iterator<Item = GeometryId> + '_ {
        self.geometries.keys().copied()
    }

    /// Give every mesh its own freshly constructed material for `theme`.
    pub fn set_material_all(&mut self, theme: Theme) {
        for idx in 0..self.meshes.len() {
            let material = self.new_material(theme);
            self.meshes[idx].material = material;
        }
        self.dirty = true;
    }

    /// Returns whether the scene changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
