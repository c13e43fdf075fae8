//! Building and editing a [`SceneGraph`].
//!
//! Every operation checks its invariants before it changes anything; on error the graph is left
//! as it was.

use crate::graph::{BamObject, ObjectId, ObjectKind, SceneGraph};
use crate::scene::*;
use anyhow::{anyhow, Result};
use bam_types::error::BamError;
use std::collections::HashSet;

fn structural(msg: String) -> anyhow::Error {
    anyhow!(BamError::structural(msg))
}

/* shared empties */

impl SceneGraph {
    /// The one state without attributes that new nodes point at.
    pub fn empty_state(&mut self) -> ObjectId {
        if let Some(id) = self.empty_state {
            return id;
        }
        let id = self.add(RenderState::default());
        self.empty_state = Some(id);
        id
    }

    pub fn identity_transform(&mut self) -> ObjectId {
        if let Some(id) = self.identity_transform {
            return id;
        }
        let id = self.add(TransformState::Identity);
        self.identity_transform = Some(id);
        id
    }

    pub fn empty_effects(&mut self) -> ObjectId {
        if let Some(id) = self.empty_effects {
            return id;
        }
        let id = self.add(RenderEffects::default());
        self.empty_effects = Some(id);
        id
    }

    /// The one [`InternalName`] object of `name`.
    pub fn internal_name(&mut self, name: &str) -> ObjectId {
        if let Some(id) = self.internal_names.get(name) {
            return *id;
        }
        let id = self.add(InternalName {
            name: name.to_string(),
        });
        self.internal_names.insert(name.to_string(), id);
        id
    }
}

/* nodes */

impl SceneGraph {
    fn new_panda_node(&mut self, name: &str) -> PandaNode {
        let state = self.empty_state();
        let transform = self.identity_transform();
        let effects = self.empty_effects();
        PandaNode::new(name, state, transform, effects)
    }

    pub fn add_panda_node(&mut self, name: &str) -> ObjectId {
        let node = self.new_panda_node(name);
        self.add(node)
    }

    pub fn add_model_node(&mut self, name: &str) -> ObjectId {
        let node = self.new_panda_node(name);
        self.add(ModelNode::new(node))
    }

    pub fn add_model_root(&mut self, name: &str) -> ObjectId {
        let node = self.new_panda_node(name);
        self.add(ModelRoot {
            model: ModelNode::new(node),
        })
    }

    pub fn add_lod_node(&mut self, name: &str, center: [f32; 3]) -> ObjectId {
        let node = self.new_panda_node(name);
        self.add(LodNode::new(node, center))
    }

    pub fn add_geom_node(&mut self, name: &str) -> ObjectId {
        let node = self.new_panda_node(name);
        self.add(GeomNode::new(node))
    }

    /// Whether `ancestor` is `node` or can be reached from `node` through parent links.
    pub fn is_ancestor_or_self(&self, ancestor: ObjectId, node: ObjectId) -> Result<bool> {
        let mut visited = HashSet::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if id == ancestor {
                return Ok(true);
            }
            if visited.insert(id) {
                stack.extend_from_slice(self.node(id)?.parents());
            }
        }
        Ok(false)
    }

    fn check_new_link(&self, parent: ObjectId, child: ObjectId) -> Result<()> {
        self.node(parent)?;
        let child_node = self.node(child)?;
        if parent == child {
            return Err(structural(format!("Node {} cannot be its own child", parent)));
        }
        // A node lists a parent once per link, so this covers children and stashed children.
        if child_node.parents().contains(&parent) {
            return Err(structural(format!(
                "{} is already a child of {}",
                child, parent
            )));
        }
        if self.is_ancestor_or_self(child, parent)? {
            return Err(structural(format!(
                "Linking {} under {} would form a cycle",
                child, parent
            )));
        }
        Ok(())
    }

    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<()> {
        self.add_child_with_sort(parent, child, 0)
    }

    pub fn add_child_with_sort(
        &mut self,
        parent: ObjectId,
        child: ObjectId,
        sort: i32,
    ) -> Result<()> {
        if let BamObject::LodNode(_) = self.object(parent)? {
            return Err(structural(format!(
                "{} is an LOD node; its children need switch distances",
                parent
            )));
        }
        self.check_new_link(parent, child)?;
        self.node_mut(parent)?
            .children
            .push(DownConnection { child, sort });
        self.node_mut(child)?.parents.push(parent);
        Ok(())
    }

    /// Links `child` under `parent` as a stashed (hidden) child.
    pub fn add_stashed(&mut self, parent: ObjectId, child: ObjectId) -> Result<()> {
        self.check_new_link(parent, child)?;
        self.node_mut(parent)?
            .stashed
            .push(DownConnection { child, sort: 0 });
        self.node_mut(child)?.parents.push(parent);
        Ok(())
    }

    /// Unlinks `child` from `parent`, whether it is a child or a stashed child.
    ///
    /// Removing a child of an LOD node also removes its switch.
    pub fn remove_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<()> {
        let parent_node = self.node(parent)?;
        let child_i = parent_node.children.iter().position(|c| c.child == child);
        let stashed_i = parent_node.stashed.iter().position(|c| c.child == child);
        match (child_i, stashed_i) {
            (Some(child_i), _) => {
                if let BamObject::LodNode(lod) = self.object_mut(parent)? {
                    lod.switches.remove(child_i);
                }
                self.node_mut(parent)?.children.remove(child_i);
            }
            (None, Some(stashed_i)) => {
                self.node_mut(parent)?.stashed.remove(stashed_i);
            }
            (None, None) => {
                return Err(structural(format!(
                    "{} is not a child of {}",
                    child, parent
                )));
            }
        }
        let child_node = self.node_mut(child)?;
        if let Some(parent_i) = child_node.parents.iter().position(|p| *p == parent) {
            child_node.parents.remove(parent_i);
        }
        Ok(())
    }

    /// Adds `child` to an LOD node, shown while the camera distance is in `out_dist..in_dist`.
    pub fn add_lod_child(
        &mut self,
        lod: ObjectId,
        child: ObjectId,
        in_dist: f32,
        out_dist: f32,
    ) -> Result<()> {
        let switch = LodSwitch::new(in_dist, out_dist)?;
        if !matches!(self.object(lod)?, BamObject::LodNode(_)) {
            return Err(structural(format!("{} is not an LOD node", lod)));
        }
        self.check_new_link(lod, child)?;
        if let BamObject::LodNode(lod_node) = self.object_mut(lod)? {
            lod_node.node.children.push(DownConnection { child, sort: 0 });
            lod_node.switches.push(switch);
        }
        self.node_mut(child)?.parents.push(lod);
        Ok(())
    }

    pub fn set_tag(&mut self, node: ObjectId, key: &str, value: &str) -> Result<()> {
        self.node_mut(node)?
            .tags
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    pub fn set_state(&mut self, node: ObjectId, state: ObjectId) -> Result<()> {
        self.expect_kind(state, ObjectKind::RenderState)?;
        self.node_mut(node)?.state = state;
        Ok(())
    }

    pub fn set_transform(&mut self, node: ObjectId, transform: ObjectId) -> Result<()> {
        self.expect_kind(transform, ObjectKind::TransformState)?;
        self.node_mut(node)?.transform = transform;
        Ok(())
    }

    pub fn set_effects(&mut self, node: ObjectId, effects: ObjectId) -> Result<()> {
        self.expect_kind(effects, ObjectKind::RenderEffects)?;
        self.node_mut(node)?.effects = effects;
        Ok(())
    }

    pub fn add_geom_to_node(
        &mut self,
        geom_node: ObjectId,
        geom: ObjectId,
        state: ObjectId,
    ) -> Result<()> {
        self.expect_kind(geom, ObjectKind::Geom)?;
        self.expect_kind(state, ObjectKind::RenderState)?;
        match self.object_mut(geom_node)? {
            BamObject::GeomNode(moi) => {
                moi.geoms.push(GeomEntry { geom, state });
                Ok(())
            }
            _ => Err(structural(format!("{} is not a geom node", geom_node))),
        }
    }
}

/* render state */

impl SceneGraph {
    /// A state of the given attributes, at most one of each attribute type.
    pub fn add_render_state(&mut self, attribs: Vec<AttribEntry>) -> Result<ObjectId> {
        let mut tags = HashSet::new();
        for entry in attribs.iter() {
            self.expect_kind(entry.attrib, ObjectKind::RenderAttrib)?;
            let tag = self.object(entry.attrib)?.type_tag();
            if !tags.insert(tag) {
                return Err(structural(format!("Render state has two {} attributes", tag)));
            }
        }
        Ok(self.add(RenderState { attribs }))
    }

    pub fn add_transform(&mut self, transform: TransformState) -> ObjectId {
        self.add(transform)
    }

    pub fn add_render_effects(&mut self, effects: Vec<ObjectId>) -> Result<ObjectId> {
        for effect in effects.iter() {
            self.object(*effect)?;
        }
        Ok(self.add(RenderEffects { effects }))
    }

    /// Adds a render attribute, checking the objects it points at.
    pub fn add_attrib(&mut self, attrib: impl Into<BamObject>) -> Result<ObjectId> {
        let attrib = attrib.into();
        match &attrib {
            BamObject::TransparencyAttrib(_) => {}
            BamObject::TextureAttrib(tex_attrib) => {
                for stage in tex_attrib.off_stages.iter() {
                    self.expect_kind(*stage, ObjectKind::TextureStage)?;
                }
                for stage_node in tex_attrib.on_stages.iter() {
                    self.expect_kind(stage_node.stage, ObjectKind::TextureStage)?;
                    self.expect_kind(stage_node.texture, ObjectKind::Texture)?;
                }
            }
            other => {
                return Err(structural(format!(
                    "A {} is not a render attribute",
                    other.type_tag()
                )))
            }
        }
        Ok(self.add(attrib))
    }

    pub fn add_texture_stage(&mut self, stage: TextureStage) -> ObjectId {
        self.add(stage)
    }

    pub fn add_texture(&mut self, name: &str, filename: &str) -> ObjectId {
        self.add(Texture {
            name: name.to_string(),
            filename: filename.to_string(),
        })
    }
}

/* vertices */

impl SceneGraph {
    pub fn add_array_format(&mut self, stride: u16) -> ObjectId {
        self.add(GeomVertexArrayFormat::new(stride))
    }

    /// Adds a column named `name` to an array format.
    ///
    /// The column must fit within the stride and must not overlap another column or share its name.
    pub fn add_column(
        &mut self,
        format: ObjectId,
        name: &str,
        num_components: u8,
        numeric_type: NumericType,
        contents: Contents,
        start: u16,
    ) -> Result<()> {
        if num_components == 0 {
            return Err(structural(format!("Column {:?} has no components", name)));
        }
        array_format(self, format)?;
        let name = self.internal_name(name);
        let col = GeomVertexColumn {
            name,
            num_components,
            numeric_type,
            contents,
            start,
            column_alignment: numeric_type.component_bytes() as u8,
        };
        let format_obj = array_format(self, format)?;
        format_obj.check_new_column(&col)?;
        let total_bytes = format_obj.total_bytes.max(col.end() as u16);

        if let BamObject::GeomVertexArrayFormat(moi) = self.object_mut(format)? {
            moi.columns.push(col);
            moi.total_bytes = total_bytes;
        }
        Ok(())
    }

    pub fn add_vertex_format(&mut self, array_formats: Vec<ObjectId>) -> Result<ObjectId> {
        for array in array_formats.iter() {
            self.expect_kind(*array, ObjectKind::VertexArrayFormat)?;
        }
        Ok(self.add(GeomVertexFormat::new(array_formats)))
    }

    /// Adds the rows of one array. `bytes` must hold a whole number of rows.
    pub fn add_vertex_array(
        &mut self,
        format: ObjectId,
        usage_hint: UsageHint,
        bytes: Vec<u8>,
    ) -> Result<ObjectId> {
        GeomVertexArrayData::check_buffer(&bytes, array_format(self, format)?)?;
        Ok(self.add(GeomVertexArrayData {
            array_format: format,
            usage_hint,
            buffer: bytes,
        }))
    }

    /// Adds vertex data of `format`. `arrays[i]` must be laid out per the format's `i`th array.
    pub fn add_vertex_data(
        &mut self,
        name: &str,
        format: ObjectId,
        arrays: Vec<ObjectId>,
    ) -> Result<ObjectId> {
        let format_arrays = match self.object(format)? {
            BamObject::GeomVertexFormat(moi) => moi.arrays(),
            obj => {
                return Err(structural(format!(
                    "{} is a {:?}, not a vertex format",
                    format,
                    obj.kind()
                )))
            }
        };
        if format_arrays.len() != arrays.len() {
            return Err(structural(format!(
                "Vertex format {} has {} arrays; {} given",
                format,
                format_arrays.len(),
                arrays.len()
            )));
        }
        for (array_i, (array, expected_format)) in arrays.iter().zip(format_arrays).enumerate() {
            match self.object(*array)? {
                BamObject::GeomVertexArrayData(moi) if moi.array_format == *expected_format => {}
                BamObject::GeomVertexArrayData(moi) => {
                    return Err(structural(format!(
                        "Array {} has format {}; the vertex format expects {}",
                        array_i, moi.array_format, expected_format
                    )))
                }
                obj => {
                    return Err(structural(format!(
                        "{} is a {:?}, not a vertex array",
                        array,
                        obj.kind()
                    )))
                }
            }
        }
        Ok(self.add(GeomVertexData::new(
            name,
            format,
            UsageHint::Static,
            arrays,
        )))
    }
}

/* geoms and primitives */

impl SceneGraph {
    pub fn add_geom(&mut self, data: ObjectId, primitive_type: PrimitiveType) -> Result<ObjectId> {
        self.expect_kind(data, ObjectKind::VertexData)?;
        Ok(self.add(Geom::new(data, primitive_type)))
    }

    pub fn add_primitive(
        &mut self,
        kind: PrimitiveKind,
        index_type: NumericType,
        usage_hint: UsageHint,
    ) -> Result<ObjectId> {
        PrimitiveData::check_index_type(index_type)?;
        Ok(self.add(GeomPrimitive {
            kind,
            data: PrimitiveData::new(index_type, usage_hint),
        }))
    }

    /// Adds patches indexed by u16.
    pub fn add_patches(&mut self, per_patch: u16, usage_hint: UsageHint) -> Result<ObjectId> {
        if per_patch == 0 {
            return Err(structural("Patches need at least one vertex".to_string()));
        }
        Ok(self.add(GeomPatches {
            data: PrimitiveData::new(NumericType::Uint16, usage_hint),
            num_vertices_per_patch: per_patch,
        }))
    }

    fn primitive_type_of(&self, prim: ObjectId) -> Result<PrimitiveType> {
        match self.object(prim)? {
            BamObject::Primitive(moi) => Ok(moi.kind.primitive_type()),
            BamObject::Patches(_) => Ok(PrimitiveType::Patches),
            obj => Err(structural(format!(
                "{} is a {:?}, not a primitive",
                prim,
                obj.kind()
            ))),
        }
    }

    pub fn add_primitive_to_geom(&mut self, geom: ObjectId, prim: ObjectId) -> Result<()> {
        let prim_type = self.primitive_type_of(prim)?;
        match self.object_mut(geom)? {
            BamObject::Geom(moi) => {
                if moi.primitive_type != prim_type {
                    return Err(structural(format!(
                        "A {:?} primitive cannot join a {:?} geom",
                        prim_type, moi.primitive_type
                    )));
                }
                if moi.primitives.contains(&prim) {
                    return Err(structural(format!("{} is already in {}", prim, geom)));
                }
                moi.primitives.push(prim);
                Ok(())
            }
            obj => Err(structural(format!(
                "{} is a {:?}, not a geom",
                geom,
                obj.kind()
            ))),
        }
    }

    fn primitive_data(&self, prim: ObjectId) -> Result<&PrimitiveData> {
        self.object(prim)?
            .as_primitive()
            .ok_or_else(|| structural(format!("{} is not a primitive", prim)))
    }
    fn primitive_data_mut(&mut self, prim: ObjectId) -> Result<&mut PrimitiveData> {
        self.object_mut(prim)?
            .as_primitive_mut()
            .ok_or_else(|| structural(format!("{} is not a primitive", prim)))
    }

    /// Makes `prim` indexed by the rows of `array`.
    ///
    /// The array's format must have exactly one column, of the primitive's index type.
    pub fn set_primitive_vertices(&mut self, prim: ObjectId, array: ObjectId) -> Result<()> {
        let index_type = self.primitive_data(prim)?.index_type;
        PrimitiveData::check_index_array(self, array, index_type)?;

        let data = self.primitive_data_mut(prim)?;
        data.vertices = Some(array);
        data.first_vertex = 0;
        data.num_vertices = -1;
        Ok(())
    }

    /// Makes `prim` draw the consecutive vertices `first..first + num` without an index array.
    pub fn set_primitive_range(&mut self, prim: ObjectId, first: i32, num: i32) -> Result<()> {
        if first < 0 || num < 0 {
            return Err(structural(format!(
                "Vertex range {} + {} is negative",
                first, num
            )));
        }
        let data = self.primitive_data_mut(prim)?;
        data.vertices = None;
        data.first_vertex = first;
        data.num_vertices = num;
        Ok(())
    }

    pub fn set_primitive_ends(&mut self, prim: ObjectId, pta: ObjectId) -> Result<()> {
        self.expect_kind(pta, ObjectKind::PtaInt32)?;
        self.primitive_data_mut(prim)?.ends = Some(pta);
        Ok(())
    }

    pub fn add_pta_int32(&mut self, values: Vec<i32>) -> ObjectId {
        self.add(PtaInt32(values))
    }

    pub fn add_pta_float32(&mut self, values: Vec<f32>) -> ObjectId {
        self.add(PtaFloat32(values))
    }
}
