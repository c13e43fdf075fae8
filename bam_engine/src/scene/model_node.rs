use crate::graph::BamObject;
use crate::reader::{BamReader, PointerResolver};
use crate::scene::enums::{get_u8_enum, PreserveTransform};
use crate::scene::node::PandaNode;
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::Result;
use bam_types::datagram::{Datagram, DatagramIterator};

/// A node that scene-graph flattening must not remove.
#[derive(Clone, PartialEq, Debug)]
pub struct ModelNode {
    pub node: PandaNode,
    pub preserve_transform: PreserveTransform,
    /// Bitmask of attribute types flattening must leave on this node.
    pub preserve_attributes: u16,
}

impl ModelNode {
    pub(crate) fn new(node: PandaNode) -> Self {
        Self {
            node,
            preserve_transform: PreserveTransform::None,
            preserve_attributes: 0,
        }
    }
}

impl Writable for ModelNode {
    fn type_tag(&self) -> TypeTag {
        TypeTag::ModelNode
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        self.node.write_datagram(manager, dg)?;
        dg.add_u8(self.preserve_transform as u8);
        dg.add_u16(self.preserve_attributes);
        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        self.node.complete_pointers(resolver)
    }
}

impl BamType for ModelNode {
    fn read_datagram(
        tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let node = PandaNode::read_datagram(tag, scan, manager)?;
        let preserve_transform = get_u8_enum(scan)?;
        let preserve_attributes = scan.get_u16()?;
        Ok(Self {
            node,
            preserve_transform,
            preserve_attributes,
        })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::ModelNode(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::ModelNode(self)
    }
}

/// The top node of a loaded model. Same body as [`ModelNode`].
#[derive(Clone, PartialEq, Debug)]
pub struct ModelRoot {
    pub model: ModelNode,
}

impl Writable for ModelRoot {
    fn type_tag(&self) -> TypeTag {
        TypeTag::ModelRoot
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        self.model.write_datagram(manager, dg)
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        self.model.complete_pointers(resolver)
    }
}

impl BamType for ModelRoot {
    fn read_datagram(
        tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let model = ModelNode::read_datagram(tag, scan, manager)?;
        Ok(Self { model })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::ModelRoot(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::ModelRoot(self)
    }
}
