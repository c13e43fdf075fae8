use crate::graph::BamObject;
use crate::reader::{BamReader, PointerResolver};
use crate::scene::node::PandaNode;
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::{anyhow, Result};
use bam_types::datagram::{Datagram, DatagramIterator};
use bam_types::error::BamError;

/// The distances between which one child of a [`LodNode`] is shown.
///
/// Think of the object as coming towards the camera from far away: it switches in at the far
/// distance and out at the near one, so `in_distance >= out_distance`.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct LodSwitch {
    pub in_distance: f32,
    pub out_distance: f32,
}

impl LodSwitch {
    pub fn new(in_distance: f32, out_distance: f32) -> Result<Self> {
        if !(in_distance >= out_distance) {
            return Err(anyhow!(BamError::structural(format!(
                "LOD switch in distance {} is less than out distance {}",
                in_distance, out_distance
            ))));
        }
        Ok(Self {
            in_distance,
            out_distance,
        })
    }
}

/// A level-of-detail node. Switch `i` belongs to child `i`.
#[derive(Clone, PartialEq, Debug)]
pub struct LodNode {
    pub node: PandaNode,
    pub center: [f32; 3],
    pub(crate) switches: Vec<LodSwitch>,
}

impl LodNode {
    pub(crate) fn new(node: PandaNode, center: [f32; 3]) -> Self {
        Self {
            node,
            center,
            switches: vec![],
        }
    }

    pub fn switches(&self) -> &[LodSwitch] {
        &self.switches
    }

    fn check_switches(&self) -> Result<(), BamError> {
        if self.switches.len() != self.node.children.len() {
            return Err(BamError::structural(format!(
                "LOD node {:?} has {} switches and {} children",
                self.node.name,
                self.switches.len(),
                self.node.children.len()
            )));
        }
        Ok(())
    }
}

impl Writable for LodNode {
    fn type_tag(&self) -> TypeTag {
        TypeTag::LodNode
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        self.check_switches()?;

        self.node.write_datagram(manager, dg)?;

        dg.add_vec3(self.center);
        dg.add_count_u16("switches", self.switches.len())?;
        for switch in self.switches.iter() {
            dg.add_stdfloat(switch.in_distance);
            dg.add_stdfloat(switch.out_distance);
        }
        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        self.node.complete_pointers(resolver)
    }
}

impl BamType for LodNode {
    fn read_datagram(
        tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let node = PandaNode::read_datagram(tag, scan, manager)?;
        let center = scan.get_vec3()?;

        let switches_ct = scan.get_u16()?;
        let mut switches = Vec::with_capacity(switches_ct as usize);
        for _ in 0..switches_ct {
            let in_distance = scan.get_stdfloat()?;
            let out_distance = scan.get_stdfloat()?;
            let switch = LodSwitch::new(in_distance, out_distance)
                .map_err(|e| anyhow!(BamError::malformed(e.to_string())))?;
            switches.push(switch);
        }

        let moi = Self {
            node,
            center,
            switches,
        };
        moi.check_switches()
            .map_err(|e| anyhow!(BamError::malformed(e.to_string())))?;
        Ok(moi)
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::LodNode(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::LodNode(self)
    }
}
