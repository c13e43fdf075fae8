use crate::graph::{BamObject, ObjectId, ObjectKind, SceneGraph};
use crate::reader::{BamReader, PointerResolver};
use crate::scene::enums::{get_u8_enum, UsageHint};
use crate::scene::vertex_format::GeomVertexArrayFormat;
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::{anyhow, Result};
use bam_types::datagram::{Datagram, DatagramIterator};
use bam_types::error::BamError;

pub(crate) fn array_format(graph: &SceneGraph, id: ObjectId) -> Result<&GeomVertexArrayFormat> {
    match graph.object(id)? {
        BamObject::GeomVertexArrayFormat(format) => Ok(format),
        obj => Err(anyhow!(BamError::structural(format!(
            "{} is a {:?}, not a vertex array format",
            id,
            obj.kind()
        )))),
    }
}

/// The rows of one vertex array, laid out per its [`GeomVertexArrayFormat`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GeomVertexArrayData {
    pub(crate) array_format: ObjectId,
    pub usage_hint: UsageHint,
    pub(crate) buffer: Vec<u8>,
}

impl GeomVertexArrayData {
    pub fn array_format(&self) -> ObjectId {
        self.array_format
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn num_rows(&self, format: &GeomVertexArrayFormat) -> usize {
        match format.stride {
            0 => 0,
            stride => self.buffer.len() / stride as usize,
        }
    }

    pub(crate) fn check_buffer(
        buffer: &[u8],
        format: &GeomVertexArrayFormat,
    ) -> Result<(), BamError> {
        let stride = format.stride as usize;
        let fits = match stride {
            0 => buffer.is_empty(),
            stride => buffer.len() % stride == 0,
        };
        if !fits {
            return Err(BamError::structural(format!(
                "Vertex buffer of {} bytes is not a whole number of rows of stride {}",
                buffer.len(),
                stride
            )));
        }
        Ok(())
    }
}

impl Writable for GeomVertexArrayData {
    fn type_tag(&self) -> TypeTag {
        TypeTag::GeomVertexArrayData
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        let format = array_format(manager.graph(), self.array_format)?;
        Self::check_buffer(&self.buffer, format)?;

        manager.write_object(dg, self.array_format, ObjectKind::VertexArrayFormat)?;
        dg.add_u8(self.usage_hint as u8);
        dg.add_blob(&self.buffer)?;
        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        self.array_format = resolver.resolve(self.array_format, ObjectKind::VertexArrayFormat)?;
        Ok(())
    }
}

impl BamType for GeomVertexArrayData {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let array_format = manager.read_object(scan, "array format")?;
        let usage_hint = get_u8_enum(scan)?;
        let buffer = scan.get_blob()?;
        Ok(Self {
            array_format,
            usage_hint,
            buffer,
        })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::GeomVertexArrayData(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::GeomVertexArrayData(self)
    }
}

/// All vertex arrays of one mesh. `arrays[i]` follows `format.arrays[i]`.
///
/// Animation tables are carried as opaque pointers; no table types are modelled.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GeomVertexData {
    pub name: String,
    pub(crate) format: ObjectId,
    pub usage_hint: UsageHint,
    pub(crate) arrays: Vec<ObjectId>,
    pub transform_table: Option<ObjectId>,
    pub transform_blend_table: Option<ObjectId>,
    pub slider_table: Option<ObjectId>,
}

impl GeomVertexData {
    pub(crate) fn new(
        name: impl Into<String>,
        format: ObjectId,
        usage_hint: UsageHint,
        arrays: Vec<ObjectId>,
    ) -> Self {
        Self {
            name: name.into(),
            format,
            usage_hint,
            arrays,
            transform_table: None,
            transform_blend_table: None,
            slider_table: None,
        }
    }

    pub fn format(&self) -> ObjectId {
        self.format
    }

    pub fn arrays(&self) -> &[ObjectId] {
        &self.arrays
    }
}

impl Writable for GeomVertexData {
    fn type_tag(&self) -> TypeTag {
        TypeTag::GeomVertexData
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        dg.add_string(&self.name)?;
        manager.write_object(dg, self.format, ObjectKind::VertexFormat)?;
        dg.add_u8(self.usage_hint as u8);

        dg.add_count_u16("arrays", self.arrays.len())?;
        for array in self.arrays.iter() {
            manager.write_object(dg, *array, ObjectKind::VertexArrayData)?;
        }

        manager.write_pointer_any(dg, self.transform_table)?;
        manager.write_pointer_any(dg, self.transform_blend_table)?;
        manager.write_pointer_any(dg, self.slider_table)?;
        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        self.format = resolver.resolve(self.format, ObjectKind::VertexFormat)?;
        resolver.resolve_all(&mut self.arrays, ObjectKind::VertexArrayData)?;
        self.transform_table = resolver.resolve_opt_any(self.transform_table)?;
        self.transform_blend_table = resolver.resolve_opt_any(self.transform_blend_table)?;
        self.slider_table = resolver.resolve_opt_any(self.slider_table)?;
        Ok(())
    }
}

impl BamType for GeomVertexData {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let name = scan.get_string()?;
        let format = manager.read_object(scan, "vertex format")?;
        let usage_hint = get_u8_enum(scan)?;

        let arrays_ct = scan.get_u16()?;
        let mut arrays = Vec::with_capacity(arrays_ct as usize);
        for _ in 0..arrays_ct {
            arrays.push(manager.read_object(scan, "vertex array")?);
        }

        let transform_table = manager.read_pointer(scan)?;
        let transform_blend_table = manager.read_pointer(scan)?;
        let slider_table = manager.read_pointer(scan)?;

        Ok(Self {
            name,
            format,
            usage_hint,
            arrays,
            transform_table,
            transform_blend_table,
            slider_table,
        })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::GeomVertexData(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::GeomVertexData(self)
    }
}
