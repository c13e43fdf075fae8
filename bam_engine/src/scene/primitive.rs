use crate::graph::{BamObject, ObjectId, ObjectKind, SceneGraph};
use crate::reader::{BamReader, PointerResolver};
use crate::scene::enums::{get_u8_enum, NumericType, PrimitiveType, ShadeModel, UsageHint};
use crate::scene::vertex_data::{array_format, GeomVertexArrayData};
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::{anyhow, Result};
use bam_types::datagram::{Datagram, DatagramIterator};
use bam_types::error::BamError;

/// The concrete primitive variants that share the plain [`PrimitiveData`] body.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum PrimitiveKind {
    Points,
    Lines,
    Linestrips,
    Triangles,
    Tristrips,
    Trifans,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 6] = [
        Self::Points,
        Self::Lines,
        Self::Linestrips,
        Self::Triangles,
        Self::Tristrips,
        Self::Trifans,
    ];

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Points => TypeTag::GeomPoints,
            Self::Lines => TypeTag::GeomLines,
            Self::Linestrips => TypeTag::GeomLinestrips,
            Self::Triangles => TypeTag::GeomTriangles,
            Self::Tristrips => TypeTag::GeomTristrips,
            Self::Trifans => TypeTag::GeomTrifans,
        }
    }

    pub fn from_type_tag(tag: TypeTag) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_tag() == tag)
    }

    /// The [`PrimitiveType`] a [`crate::scene::Geom`] must have to hold this kind.
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            Self::Points => PrimitiveType::Points,
            Self::Lines | Self::Linestrips => PrimitiveType::Lines,
            Self::Triangles | Self::Tristrips | Self::Trifans => PrimitiveType::Polygons,
        }
    }

    /// Whether this kind needs an `ends` array to split its vertices into strips or fans.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Linestrips | Self::Tristrips | Self::Trifans)
    }
}

/// The body shared by every primitive.
///
/// ```text
/// shade_model:    u8,
/// first_vertex:   i32,
/// num_vertices:   i32,    // -1 iff the primitive is indexed
/// index_type:     u8,
/// usage_hint:     u8,
/// vertices:       ptr,    // a GeomVertexArrayData of indices, or null
/// ends:           ptr,    // a PtaInt32, or null
/// ```
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct PrimitiveData {
    pub shade_model: ShadeModel,
    pub first_vertex: i32,
    pub num_vertices: i32,
    pub(crate) index_type: NumericType,
    pub usage_hint: UsageHint,
    pub(crate) vertices: Option<ObjectId>,
    pub(crate) ends: Option<ObjectId>,
}

impl PrimitiveData {
    pub(crate) fn new(index_type: NumericType, usage_hint: UsageHint) -> Self {
        Self {
            shade_model: ShadeModel::Smooth,
            first_vertex: 0,
            num_vertices: 0,
            index_type,
            usage_hint,
            vertices: None,
            ends: None,
        }
    }

    pub fn index_type(&self) -> NumericType {
        self.index_type
    }
    pub fn vertices(&self) -> Option<ObjectId> {
        self.vertices
    }
    pub fn ends(&self) -> Option<ObjectId> {
        self.ends
    }
    pub fn is_indexed(&self) -> bool {
        self.vertices.is_some()
    }

    pub(crate) fn check_index_type(index_type: NumericType) -> Result<(), BamError> {
        if !index_type.is_index_type() {
            return Err(BamError::structural(format!(
                "{:?} cannot hold vertex indices",
                index_type
            )));
        }
        Ok(())
    }

    /// An index array has exactly one column, of the primitive's index type.
    pub(crate) fn check_index_array(
        graph: &SceneGraph,
        array: ObjectId,
        index_type: NumericType,
    ) -> Result<()> {
        let array_obj = graph.typed::<GeomVertexArrayData>(array)?;
        let format = array_format(graph, array_obj.array_format)?;
        match format.columns() {
            [col] if col.numeric_type == index_type => Ok(()),
            [col] => Err(anyhow!(BamError::structural(format!(
                "Index column is {:?}; the primitive indexes by {:?}",
                col.numeric_type, index_type
            )))),
            cols => Err(anyhow!(BamError::structural(format!(
                "An index array needs exactly one column; {} has {}",
                array_obj.array_format,
                cols.len()
            )))),
        }
    }

    fn write_body(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        if let Some(array) = self.vertices {
            Self::check_index_array(manager.graph(), array, self.index_type)?;
        }

        dg.add_u8(self.shade_model as u8);
        dg.add_i32(self.first_vertex);
        dg.add_i32(self.num_vertices);
        dg.add_u8(self.index_type as u8);
        dg.add_u8(self.usage_hint as u8);
        manager.write_pointer(dg, self.vertices, ObjectKind::VertexArrayData)?;
        manager.write_pointer(dg, self.ends, ObjectKind::PtaInt32)?;
        Ok(())
    }

    fn read_body(scan: &mut DatagramIterator<'_>, manager: &BamReader<'_>) -> Result<Self> {
        let shade_model = get_u8_enum(scan)?;
        let first_vertex = scan.get_i32()?;
        let num_vertices = scan.get_i32()?;
        let index_type = get_u8_enum(scan)?;
        Self::check_index_type(index_type)
            .map_err(|e| anyhow!(BamError::malformed(e.to_string())))?;
        let usage_hint = get_u8_enum(scan)?;
        let vertices = manager.read_pointer(scan)?;
        let ends = manager.read_pointer(scan)?;
        Ok(Self {
            shade_model,
            first_vertex,
            num_vertices,
            index_type,
            usage_hint,
            vertices,
            ends,
        })
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        self.vertices = resolver.resolve_opt(self.vertices, ObjectKind::VertexArrayData)?;
        self.ends = resolver.resolve_opt(self.ends, ObjectKind::PtaInt32)?;
        Ok(())
    }
}

/// Points, lines, or triangles, possibly in strips or fans.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct GeomPrimitive {
    pub kind: PrimitiveKind,
    pub data: PrimitiveData,
}

impl Writable for GeomPrimitive {
    fn type_tag(&self) -> TypeTag {
        self.kind.type_tag()
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        self.data.write_body(manager, dg)
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        self.data.complete_pointers(resolver)
    }
}

impl BamType for GeomPrimitive {
    fn read_datagram(
        tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let kind = PrimitiveKind::from_type_tag(tag).ok_or_else(|| {
            anyhow!(BamError::structural(format!(
                "{} is registered as a primitive but is not one",
                tag
            )))
        })?;
        let data = PrimitiveData::read_body(scan, manager)?;
        Ok(Self { kind, data })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::Primitive(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::Primitive(self)
    }
}

/// Tessellation patches of a fixed vertex count.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct GeomPatches {
    pub data: PrimitiveData,
    pub num_vertices_per_patch: u16,
}

impl Writable for GeomPatches {
    fn type_tag(&self) -> TypeTag {
        TypeTag::GeomPatches
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        self.data.write_body(manager, dg)?;
        dg.add_u16(self.num_vertices_per_patch);
        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        self.data.complete_pointers(resolver)
    }
}

impl BamType for GeomPatches {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let data = PrimitiveData::read_body(scan, manager)?;
        let num_vertices_per_patch = scan.get_u16()?;
        Ok(Self {
            data,
            num_vertices_per_patch,
        })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::Patches(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::Patches(self)
    }
}
