//! Renderable resource handles.
//!
//! Meshes, shaders, textures and materials are created and owned outside the
//! scene graph (by the renderer and asset loaders). Scene nodes only hold
//! shared `Arc` references to them. The types here carry the CPU-side data
//! the scene needs; GPU objects live with the renderer.

use std::collections::HashMap;
use std::sync::Arc;

use cgj_math::Vector4;
use serde::{Deserialize, Serialize};

/// Geometry handle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Mesh name (usually the source file stem)
    pub name: String,

    /// Flat color passed to the shader's `Color` uniform
    #[serde(default = "default_color")]
    pub color: [f32; 4],

    /// Number of vertices, if known
    #[serde(default)]
    pub vertex_count: usize,
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

impl Mesh {
    /// Empty mesh drawn in opaque white.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: default_color(),
            vertex_count: 0,
        }
    }

    /// Replace the base color.
    pub fn with_color(mut self, color: Vector4) -> Self {
        self.color = color.to_array();
        self
    }

    /// Base RGBA color.
    pub fn color(&self) -> Vector4 {
        Vector4::from(self.color)
    }
}

/// Shader program handle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderProgram {
    pub name: String,
}

impl ShaderProgram {
    /// Handle for the program called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Texture handle bound to a texture unit when drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Texture {
    pub name: String,

    #[serde(default = "default_unit")]
    pub unit: u32,
}

fn default_unit() -> u32 {
    1
}

impl Texture {
    /// Texture on the default unit 1.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: default_unit(),
        }
    }
}

/// Phong-style surface parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub name: String,
    pub ambient_strength: f32,
    pub specular_strength: f32,
    pub shininess: f32,

    /// 1.0 is fully opaque
    pub transparency: f32,

    /// Shader-side material model selector
    pub material_type: u32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient_strength: 1.0,
            specular_strength: 1.0,
            shininess: 1.0,
            transparency: 1.0,
            material_type: 0,
        }
    }
}

impl Material {
    /// Opaque material with unit strengths.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Translucent materials are skipped by the shadow pass.
    pub fn is_translucent(&self) -> bool {
        self.transparency < 1.0
    }
}

/// Interns resources by name so nodes that name the same resource share one
/// `Arc`.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    meshes: HashMap<String, Arc<Mesh>>,
    shaders: HashMap<String, Arc<ShaderProgram>>,
    textures: HashMap<String, Arc<Texture>>,
    materials: HashMap<String, Arc<Material>>,
}

impl ResourceRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh, replacing any previous one with the same name.
    pub fn insert_mesh(&mut self, mesh: Mesh) -> Arc<Mesh> {
        let mesh = Arc::new(mesh);
        self.meshes.insert(mesh.name.clone(), Arc::clone(&mesh));
        mesh
    }

    /// Register a material, replacing any previous one with the same name.
    pub fn insert_material(&mut self, material: Material) -> Arc<Material> {
        let material = Arc::new(material);
        self.materials
            .insert(material.name.clone(), Arc::clone(&material));
        material
    }

    /// Look up a mesh, creating a plain handle on first use.
    pub fn mesh(&mut self, name: &str) -> Arc<Mesh> {
        Arc::clone(
            self.meshes
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Mesh::new(name))),
        )
    }

    /// Look up a shader program by name, creating it on first use.
    pub fn shader(&mut self, name: &str) -> Arc<ShaderProgram> {
        Arc::clone(
            self.shaders
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(ShaderProgram::new(name))),
        )
    }

    /// Look up a texture by name, creating it on first use.
    pub fn texture(&mut self, name: &str) -> Arc<Texture> {
        Arc::clone(
            self.textures
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Texture::new(name))),
        )
    }

    /// Look up a material. Unknown names get default parameters.
    pub fn material(&mut self, name: &str) -> Arc<Material> {
        Arc::clone(
            self.materials
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Material::new(name))),
        )
    }

    /// Number of distinct meshes registered.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Number of distinct shader programs registered.
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Number of distinct materials registered.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_interns_by_name() {
        let mut registry = ResourceRegistry::new();
        let a = registry.mesh("cube");
        let b = registry.mesh("cube");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.mesh_count(), 1);

        registry.shader("basic");
        registry.shader("basic");
        assert_eq!(registry.shader_count(), 1);
    }

    #[test]
    fn test_inserted_resources_are_returned() {
        let mut registry = ResourceRegistry::new();
        let glass = Material {
            transparency: 0.4,
            ..Material::new("glass")
        };
        let inserted = registry.insert_material(glass);
        assert!(Arc::ptr_eq(&inserted, &registry.material("glass")));
        assert!(inserted.is_translucent());
        assert!(!Material::default().is_translucent());

        let red = registry.insert_mesh(Mesh::new("ball").with_color(Vector4::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(registry.mesh("ball").color(), red.color());
    }

    #[test]
    fn test_new_handles_use_documented_defaults() {
        assert_eq!(Mesh::new("cube").color(), Vector4::ONE);
        assert_eq!(Texture::new("wood").unit, 1);
        assert!(!Material::new("paint").is_translucent());

        let mut registry = ResourceRegistry::new();
        assert_eq!(*registry.material("unknown"), Material::new("unknown"));
        assert_eq!(registry.texture("wood").unit, 1);
        assert_eq!(registry.material_count(), 1);
    }
}
