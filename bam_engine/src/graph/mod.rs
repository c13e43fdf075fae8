//! The caller-owned arena of serializable objects.
//!
//! Objects refer to each other by [`ObjectId`]; two pointer fields refer to the same object iff they
//! hold the same id. The mutation API in [`mutation`] keeps the structural invariants of the
//! schema, so a graph built through it can always be written.

use crate::reader::PointerResolver;
use crate::scene::*;
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use anyhow::{anyhow, Result};
use bam_types::error::BamError;
use derive_more::{Display, From, Into};
use std::collections::HashMap;

pub mod mutation;

#[derive(From, Into, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
#[display(fmt = "#{}", _0)]
pub struct ObjectId(u32);

/// What a pointer field may point at.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum ObjectKind {
    Node,
    RenderState,
    TransformState,
    RenderEffects,
    RenderAttrib,
    TextureStage,
    Texture,
    InternalName,
    VertexArrayFormat,
    VertexFormat,
    VertexArrayData,
    VertexData,
    Geom,
    Primitive,
    PtaInt32,
    PtaFloat32,
}

#[derive(From, Clone, PartialEq, Debug)]
pub enum BamObject {
    PandaNode(PandaNode),
    ModelNode(ModelNode),
    ModelRoot(ModelRoot),
    LodNode(LodNode),
    GeomNode(GeomNode),

    RenderState(RenderState),
    TransformState(TransformState),
    RenderEffects(RenderEffects),

    TransparencyAttrib(TransparencyAttrib),
    TextureAttrib(TextureAttrib),
    TextureStage(TextureStage),
    Texture(Texture),

    InternalName(InternalName),
    GeomVertexArrayFormat(GeomVertexArrayFormat),
    GeomVertexFormat(GeomVertexFormat),
    GeomVertexArrayData(GeomVertexArrayData),
    GeomVertexData(GeomVertexData),
    Geom(Geom),
    Primitive(GeomPrimitive),
    Patches(GeomPatches),

    PtaInt32(PtaInt32),
    PtaFloat32(PtaFloat32),
}

impl BamObject {
    fn as_writable(&self) -> &dyn Writable {
        match self {
            Self::PandaNode(x) => x,
            Self::ModelNode(x) => x,
            Self::ModelRoot(x) => x,
            Self::LodNode(x) => x,
            Self::GeomNode(x) => x,
            Self::RenderState(x) => x,
            Self::TransformState(x) => x,
            Self::RenderEffects(x) => x,
            Self::TransparencyAttrib(x) => x,
            Self::TextureAttrib(x) => x,
            Self::TextureStage(x) => x,
            Self::Texture(x) => x,
            Self::InternalName(x) => x,
            Self::GeomVertexArrayFormat(x) => x,
            Self::GeomVertexFormat(x) => x,
            Self::GeomVertexArrayData(x) => x,
            Self::GeomVertexData(x) => x,
            Self::Geom(x) => x,
            Self::Primitive(x) => x,
            Self::Patches(x) => x,
            Self::PtaInt32(x) => x,
            Self::PtaFloat32(x) => x,
        }
    }
    fn as_writable_mut(&mut self) -> &mut dyn Writable {
        match self {
            Self::PandaNode(x) => x,
            Self::ModelNode(x) => x,
            Self::ModelRoot(x) => x,
            Self::LodNode(x) => x,
            Self::GeomNode(x) => x,
            Self::RenderState(x) => x,
            Self::TransformState(x) => x,
            Self::RenderEffects(x) => x,
            Self::TransparencyAttrib(x) => x,
            Self::TextureAttrib(x) => x,
            Self::TextureStage(x) => x,
            Self::Texture(x) => x,
            Self::InternalName(x) => x,
            Self::GeomVertexArrayFormat(x) => x,
            Self::GeomVertexFormat(x) => x,
            Self::GeomVertexArrayData(x) => x,
            Self::GeomVertexData(x) => x,
            Self::Geom(x) => x,
            Self::Primitive(x) => x,
            Self::Patches(x) => x,
            Self::PtaInt32(x) => x,
            Self::PtaFloat32(x) => x,
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        self.as_writable().type_tag()
    }

    pub fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        self.as_writable_mut().complete_pointers(resolver)
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::PandaNode(_)
            | Self::ModelNode(_)
            | Self::ModelRoot(_)
            | Self::LodNode(_)
            | Self::GeomNode(_) => ObjectKind::Node,
            Self::RenderState(_) => ObjectKind::RenderState,
            Self::TransformState(_) => ObjectKind::TransformState,
            Self::RenderEffects(_) => ObjectKind::RenderEffects,
            Self::TransparencyAttrib(_) | Self::TextureAttrib(_) => ObjectKind::RenderAttrib,
            Self::TextureStage(_) => ObjectKind::TextureStage,
            Self::Texture(_) => ObjectKind::Texture,
            Self::InternalName(_) => ObjectKind::InternalName,
            Self::GeomVertexArrayFormat(_) => ObjectKind::VertexArrayFormat,
            Self::GeomVertexFormat(_) => ObjectKind::VertexFormat,
            Self::GeomVertexArrayData(_) => ObjectKind::VertexArrayData,
            Self::GeomVertexData(_) => ObjectKind::VertexData,
            Self::Geom(_) => ObjectKind::Geom,
            Self::Primitive(_) | Self::Patches(_) => ObjectKind::Primitive,
            Self::PtaInt32(_) => ObjectKind::PtaInt32,
            Self::PtaFloat32(_) => ObjectKind::PtaFloat32,
        }
    }

    /// The [`PandaNode`] fields embedded in every node variant.
    pub fn as_node(&self) -> Option<&PandaNode> {
        match self {
            Self::PandaNode(node) => Some(node),
            Self::ModelNode(model) => Some(&model.node),
            Self::ModelRoot(root) => Some(&root.model.node),
            Self::LodNode(lod) => Some(&lod.node),
            Self::GeomNode(geom_node) => Some(&geom_node.node),
            _ => None,
        }
    }
    pub fn as_node_mut(&mut self) -> Option<&mut PandaNode> {
        match self {
            Self::PandaNode(node) => Some(node),
            Self::ModelNode(model) => Some(&mut model.node),
            Self::ModelRoot(root) => Some(&mut root.model.node),
            Self::LodNode(lod) => Some(&mut lod.node),
            Self::GeomNode(geom_node) => Some(&mut geom_node.node),
            _ => None,
        }
    }

    /// The fields shared by [`GeomPrimitive`] and [`GeomPatches`].
    pub fn as_primitive(&self) -> Option<&PrimitiveData> {
        match self {
            Self::Primitive(prim) => Some(&prim.data),
            Self::Patches(patches) => Some(&patches.data),
            _ => None,
        }
    }
    pub fn as_primitive_mut(&mut self) -> Option<&mut PrimitiveData> {
        match self {
            Self::Primitive(prim) => Some(&mut prim.data),
            Self::Patches(patches) => Some(&mut patches.data),
            _ => None,
        }
    }
}

/// Owns every object of one scene. Ids are positions in the arena and are never reused.
#[derive(Default, Clone, Debug)]
pub struct SceneGraph {
    objects: Vec<BamObject>,

    empty_state: Option<ObjectId>,
    identity_transform: Option<ObjectId>,
    empty_effects: Option<ObjectId>,
    internal_names: HashMap<String, ObjectId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts decoded objects. The object at position `i` gets `ObjectId(i)`.
    ///
    /// The first decoded empty state, identity transform and empty effects become the shared
    /// empties, as do the first object of each internal name.
    pub(crate) fn from_objects(objects: Vec<BamObject>) -> Self {
        let mut graph = Self::default();
        for (obj_i, obj) in objects.iter().enumerate() {
            let id = ObjectId(obj_i as u32);
            match obj {
                BamObject::InternalName(name) => {
                    graph.internal_names.entry(name.name.clone()).or_insert(id);
                }
                BamObject::RenderState(state) if state.attribs().is_empty() => {
                    graph.empty_state.get_or_insert(id);
                }
                BamObject::TransformState(TransformState::Identity) => {
                    graph.identity_transform.get_or_insert(id);
                }
                BamObject::RenderEffects(effects) if effects.effects.is_empty() => {
                    graph.empty_effects.get_or_insert(id);
                }
                _ => {}
            }
        }
        graph.objects = objects;
        graph
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        (id.0 as usize) < self.objects.len()
    }

    pub fn get(&self, id: ObjectId) -> Option<&BamObject> {
        self.objects.get(id.0 as usize)
    }
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut BamObject> {
        self.objects.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &BamObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(obj_i, obj)| (ObjectId(obj_i as u32), obj))
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> {
        (0..self.objects.len() as u32).map(ObjectId)
    }

    pub fn add(&mut self, obj: impl Into<BamObject>) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(obj.into());
        id
    }

    pub fn object(&self, id: ObjectId) -> Result<&BamObject> {
        self.get(id)
            .ok_or_else(|| anyhow!(BamError::structural(format!("No object {}", id))))
    }
    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut BamObject> {
        self.get_mut(id)
            .ok_or_else(|| anyhow!(BamError::structural(format!("No object {}", id))))
    }

    pub fn kind_of(&self, id: ObjectId) -> Result<ObjectKind> {
        Ok(self.object(id)?.kind())
    }

    /// Fails unless `id` exists and is a `kind`.
    pub fn expect_kind(&self, id: ObjectId, kind: ObjectKind) -> Result<()> {
        let actual = self.kind_of(id)?;
        if actual != kind {
            return Err(anyhow!(BamError::structural(format!(
                "{} is a {:?}, not a {:?}",
                id, actual, kind
            ))));
        }
        Ok(())
    }

    /// The object `id` as the concrete type `T`.
    pub fn typed<T: BamType>(&self, id: ObjectId) -> Result<&T> {
        let obj = self.object(id)?;
        T::from_object(obj).ok_or_else(|| {
            anyhow!(BamError::structural(format!(
                "{} is a {}, not a {}",
                id,
                obj.type_tag(),
                std::any::type_name::<T>()
            )))
        })
    }

    pub fn node(&self, id: ObjectId) -> Result<&PandaNode> {
        self.object(id)?
            .as_node()
            .ok_or_else(|| anyhow!(BamError::structural(format!("{} is not a node", id))))
    }
    pub(crate) fn node_mut(&mut self, id: ObjectId) -> Result<&mut PandaNode> {
        self.object_mut(id)?
            .as_node_mut()
            .ok_or_else(|| anyhow!(BamError::structural(format!("{} is not a node", id))))
    }
}
