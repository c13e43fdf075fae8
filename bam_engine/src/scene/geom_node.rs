use crate::graph::{BamObject, ObjectId, ObjectKind};
use crate::reader::{BamReader, PointerResolver};
use crate::scene::node::PandaNode;
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::Result;
use bam_types::datagram::{Datagram, DatagramIterator};

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct GeomEntry {
    pub geom: ObjectId,
    pub state: ObjectId,
}

/// A node that carries renderable geometry, each [`crate::scene::Geom`] with its own state.
#[derive(Clone, PartialEq, Debug)]
pub struct GeomNode {
    pub node: PandaNode,
    pub(crate) geoms: Vec<GeomEntry>,
}

impl GeomNode {
    pub(crate) fn new(node: PandaNode) -> Self {
        Self {
            node,
            geoms: vec![],
        }
    }

    pub fn geoms(&self) -> &[GeomEntry] {
        &self.geoms
    }
}

impl Writable for GeomNode {
    fn type_tag(&self) -> TypeTag {
        TypeTag::GeomNode
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        self.node.write_datagram(manager, dg)?;

        dg.add_count_u16("geoms", self.geoms.len())?;
        for entry in self.geoms.iter() {
            manager.write_object(dg, entry.geom, ObjectKind::Geom)?;
            manager.write_object(dg, entry.state, ObjectKind::RenderState)?;
        }
        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        self.node.complete_pointers(resolver)?;
        for entry in self.geoms.iter_mut() {
            entry.geom = resolver.resolve(entry.geom, ObjectKind::Geom)?;
            entry.state = resolver.resolve(entry.state, ObjectKind::RenderState)?;
        }
        Ok(())
    }
}

impl BamType for GeomNode {
    fn read_datagram(
        tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let node = PandaNode::read_datagram(tag, scan, manager)?;

        let geoms_ct = scan.get_u16()?;
        let mut geoms = Vec::with_capacity(geoms_ct as usize);
        for _ in 0..geoms_ct {
            let geom = manager.read_object(scan, "geom")?;
            let state = manager.read_object(scan, "geom state")?;
            geoms.push(GeomEntry { geom, state });
        }

        Ok(Self { node, geoms })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::GeomNode(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::GeomNode(self)
    }
}
