use crate::graph::{BamObject, ObjectId, ObjectKind};
use crate::reader::{BamReader, PointerResolver};
use crate::scene::enums::{get_u8_enum, BoundsType};
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::Result;
use bam_types::datagram::{Datagram, DatagramIterator};
use bam_types::version::Feature;
use std::collections::BTreeMap;

/// A link from a node to one of its children.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct DownConnection {
    pub child: ObjectId,
    pub sort: i32,
}

/// The fields every node has.
///
/// Parent and child links are kept symmetric by [`crate::SceneGraph`]: a node lists `p` as a
/// parent iff `p` lists the node as a child or a stashed child.
#[derive(Clone, PartialEq, Debug)]
pub struct PandaNode {
    pub name: String,

    pub state: ObjectId,
    pub transform: ObjectId,
    pub effects: ObjectId,

    pub draw_control_mask: u32,
    pub draw_show_mask: u32,
    pub into_collide_mask: u32,
    pub bounds_type: BoundsType,
    pub tags: BTreeMap<String, String>,

    pub(crate) parents: Vec<ObjectId>,
    pub(crate) children: Vec<DownConnection>,
    pub(crate) stashed: Vec<DownConnection>,
}

impl PandaNode {
    pub(crate) fn new(
        name: impl Into<String>,
        state: ObjectId,
        transform: ObjectId,
        effects: ObjectId,
    ) -> Self {
        Self {
            name: name.into(),
            state,
            transform,
            effects,
            draw_control_mask: 0,
            draw_show_mask: 0xffffffff,
            into_collide_mask: 0,
            bounds_type: BoundsType::Default,
            tags: BTreeMap::new(),
            parents: vec![],
            children: vec![],
            stashed: vec![],
        }
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }
    pub fn children(&self) -> &[DownConnection] {
        &self.children
    }
    pub fn stashed(&self) -> &[DownConnection] {
        &self.stashed
    }

    pub fn child_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.children.iter().map(|conn| conn.child)
    }

    fn write_connections(
        manager: &mut BamWriter<'_>,
        dg: &mut Datagram,
        field: &'static str,
        conns: &[DownConnection],
    ) -> Result<()> {
        dg.add_count_u16(field, conns.len())?;
        for conn in conns {
            manager.write_object(dg, conn.child, ObjectKind::Node)?;
            dg.add_i32(conn.sort);
        }
        Ok(())
    }

    fn read_connections(
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
        field: &'static str,
    ) -> Result<Vec<DownConnection>> {
        let ct = scan.get_u16()?;
        let mut conns = Vec::with_capacity(ct as usize);
        for _ in 0..ct {
            let child = manager.read_object(scan, field)?;
            let sort = scan.get_i32()?;
            conns.push(DownConnection { child, sort });
        }
        Ok(conns)
    }
}

impl Writable for PandaNode {
    fn type_tag(&self) -> TypeTag {
        TypeTag::PandaNode
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        dg.add_string(&self.name)?;

        manager.write_object(dg, self.state, ObjectKind::RenderState)?;
        manager.write_object(dg, self.transform, ObjectKind::TransformState)?;
        manager.write_object(dg, self.effects, ObjectKind::RenderEffects)?;

        dg.add_u32(self.draw_control_mask);
        dg.add_u32(self.draw_show_mask);
        dg.add_u32(self.into_collide_mask);

        if manager.is_enabled(Feature::NodeBoundsType) {
            dg.add_u8(self.bounds_type as u8);
        }

        dg.add_count_u32("tags", self.tags.len())?;
        for (key, value) in self.tags.iter() {
            dg.add_string(key)?;
            dg.add_string(value)?;
        }

        dg.add_count_u16("parents", self.parents.len())?;
        for parent in self.parents.iter() {
            manager.write_object(dg, *parent, ObjectKind::Node)?;
        }

        Self::write_connections(manager, dg, "children", &self.children)?;
        Self::write_connections(manager, dg, "stashed", &self.stashed)?;

        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        self.state = resolver.resolve(self.state, ObjectKind::RenderState)?;
        self.transform = resolver.resolve(self.transform, ObjectKind::TransformState)?;
        self.effects = resolver.resolve(self.effects, ObjectKind::RenderEffects)?;
        resolver.resolve_all(&mut self.parents, ObjectKind::Node)?;
        for conn in self.children.iter_mut().chain(self.stashed.iter_mut()) {
            conn.child = resolver.resolve(conn.child, ObjectKind::Node)?;
        }
        Ok(())
    }
}

impl BamType for PandaNode {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let name = scan.get_string()?;

        let state = manager.read_object(scan, "state")?;
        let transform = manager.read_object(scan, "transform")?;
        let effects = manager.read_object(scan, "effects")?;

        let draw_control_mask = scan.get_u32()?;
        let draw_show_mask = scan.get_u32()?;
        let into_collide_mask = scan.get_u32()?;

        let bounds_type = if manager.is_enabled(Feature::NodeBoundsType) {
            get_u8_enum(scan)?
        } else {
            BoundsType::Default
        };

        let tags_ct = scan.get_u32()?;
        let mut tags = BTreeMap::new();
        for _ in 0..tags_ct {
            let key = scan.get_string()?;
            let value = scan.get_string()?;
            tags.insert(key, value);
        }

        let parents_ct = scan.get_u16()?;
        let mut parents = Vec::with_capacity(parents_ct as usize);
        for _ in 0..parents_ct {
            parents.push(manager.read_object(scan, "parents")?);
        }

        let children = Self::read_connections(scan, manager, "children")?;
        let stashed = Self::read_connections(scan, manager, "stashed")?;

        Ok(Self {
            name,
            state,
            transform,
            effects,
            draw_control_mask,
            draw_show_mask,
            into_collide_mask,
            bounds_type,
            tags,
            parents,
            children,
            stashed,
        })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::PandaNode(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::PandaNode(self)
    }
}
