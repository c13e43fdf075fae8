use crate::graph::{BamObject, ObjectId, ObjectKind};
use crate::reader::{BamReader, PointerResolver};
use crate::scene::enums::{get_u8_enum, AnimationType, Contents, NumericType};
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::{anyhow, Result};
use bam_types::datagram::{Datagram, DatagramIterator};
use bam_types::error::BamError;
use bam_types::version::Feature;
use itertools::Itertools;

/// One column of a vertex array: a named attribute at a fixed offset within each row.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct GeomVertexColumn {
    /// An [`crate::scene::InternalName`].
    pub name: ObjectId,
    pub num_components: u8,
    pub numeric_type: NumericType,
    pub contents: Contents,
    /// Byte offset within a row.
    pub start: u16,
    pub column_alignment: u8,
}

impl GeomVertexColumn {
    /// Bytes this column takes in each row.
    pub fn total_bytes(&self) -> u32 {
        self.num_components as u32 * self.numeric_type.component_bytes() as u32
    }

    /// One past the last byte of this column within a row.
    pub fn end(&self) -> u32 {
        self.start as u32 + self.total_bytes()
    }
}

/// The row layout of one vertex array.
///
/// Every column lies within `stride`, and no two columns overlap.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GeomVertexArrayFormat {
    pub stride: u16,
    pub(crate) total_bytes: u16,
    pub pad_to: u8,
    pub divisor: u16,
    pub(crate) columns: Vec<GeomVertexColumn>,
}

impl GeomVertexArrayFormat {
    pub(crate) fn new(stride: u16) -> Self {
        Self {
            stride,
            total_bytes: 0,
            pad_to: 1,
            divisor: 0,
            columns: vec![],
        }
    }

    pub fn total_bytes(&self) -> u16 {
        self.total_bytes
    }

    pub fn columns(&self) -> &[GeomVertexColumn] {
        &self.columns
    }

    pub fn column_by_name(&self, name: ObjectId) -> Option<&GeomVertexColumn> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Checks that `col` fits within the stride and overlaps no existing column.
    pub(crate) fn check_new_column(&self, col: &GeomVertexColumn) -> Result<(), BamError> {
        self.check_fits(col)?;
        for other in self.columns.iter() {
            if other.name == col.name {
                return Err(BamError::structural(format!(
                    "Column name {} appears twice in one array format",
                    col.name
                )));
            }
            if (col.start as u32) < other.end() && (other.start as u32) < col.end() {
                return Err(BamError::structural(format!(
                    "Column at bytes {}..{} overlaps column at bytes {}..{}",
                    col.start,
                    col.end(),
                    other.start,
                    other.end()
                )));
            }
        }
        Ok(())
    }

    fn check_fits(&self, col: &GeomVertexColumn) -> Result<(), BamError> {
        if col.end() > self.stride as u32 {
            return Err(BamError::structural(format!(
                "Column at bytes {}..{} does not fit in stride {}",
                col.start,
                col.end(),
                self.stride
            )));
        }
        Ok(())
    }

    fn check_columns(&self) -> Result<(), BamError> {
        for col in self.columns.iter() {
            self.check_fits(col)?;
        }
        for (col_a, col_b) in self.columns.iter().tuple_combinations() {
            let overlap = (col_a.start as u32) < col_b.end() && (col_b.start as u32) < col_a.end();
            if col_a.name == col_b.name || overlap {
                return Err(BamError::structural(format!(
                    "Columns {} and {} collide",
                    col_a.name, col_b.name
                )));
            }
        }
        Ok(())
    }
}

impl Writable for GeomVertexArrayFormat {
    fn type_tag(&self) -> TypeTag {
        TypeTag::GeomVertexArrayFormat
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        self.check_columns()?;

        dg.add_u16(self.stride);
        dg.add_u16(self.total_bytes);
        dg.add_u8(self.pad_to);
        dg.add_u16(self.divisor);

        dg.add_count_u16("columns", self.columns.len())?;
        for col in self.columns.iter() {
            manager.write_object(dg, col.name, ObjectKind::InternalName)?;
            dg.add_u8(col.num_components);
            dg.add_u8(col.numeric_type as u8);
            dg.add_u8(col.contents as u8);
            dg.add_u16(col.start);
            if manager.is_enabled(Feature::VertexColumnAlignment) {
                dg.add_u8(col.column_alignment);
            }
        }
        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        for col in self.columns.iter_mut() {
            col.name = resolver.resolve(col.name, ObjectKind::InternalName)?;
        }
        Ok(())
    }
}

impl BamType for GeomVertexArrayFormat {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let stride = scan.get_u16()?;
        let total_bytes = scan.get_u16()?;
        let pad_to = scan.get_u8()?;
        let divisor = scan.get_u16()?;

        let cols_ct = scan.get_u16()?;
        let mut columns = Vec::with_capacity(cols_ct as usize);
        for _ in 0..cols_ct {
            let name = manager.read_object(scan, "column name")?;
            let num_components = scan.get_u8()?;
            let numeric_type: NumericType = get_u8_enum(scan)?;
            let contents = get_u8_enum(scan)?;
            let start = scan.get_u16()?;
            let column_alignment = if manager.is_enabled(Feature::VertexColumnAlignment) {
                scan.get_u8()?
            } else {
                numeric_type.component_bytes() as u8
            };
            columns.push(GeomVertexColumn {
                name,
                num_components,
                numeric_type,
                contents,
                start,
                column_alignment,
            });
        }

        // Names are raw file indices here; equal indices name the same object.
        let moi = Self {
            stride,
            total_bytes,
            pad_to,
            divisor,
            columns,
        };
        moi.check_columns()
            .map_err(|e| anyhow!(BamError::malformed(e.to_string())))?;
        Ok(moi)
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::GeomVertexArrayFormat(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::GeomVertexArrayFormat(self)
    }
}

/// The complete vertex layout: one [`GeomVertexArrayFormat`] per array.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GeomVertexFormat {
    pub animation_type: AnimationType,
    pub num_transforms: u16,
    pub indexed_transforms: bool,
    pub(crate) arrays: Vec<ObjectId>,
}

impl GeomVertexFormat {
    pub(crate) fn new(arrays: Vec<ObjectId>) -> Self {
        Self {
            animation_type: AnimationType::None,
            num_transforms: 0,
            indexed_transforms: false,
            arrays,
        }
    }

    pub fn arrays(&self) -> &[ObjectId] {
        &self.arrays
    }
}

impl Writable for GeomVertexFormat {
    fn type_tag(&self) -> TypeTag {
        TypeTag::GeomVertexFormat
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        dg.add_u8(self.animation_type as u8);
        dg.add_u16(self.num_transforms);
        dg.add_bool(self.indexed_transforms);

        dg.add_count_u16("arrays", self.arrays.len())?;
        for array in self.arrays.iter() {
            manager.write_object(dg, *array, ObjectKind::VertexArrayFormat)?;
        }
        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        resolver.resolve_all(&mut self.arrays, ObjectKind::VertexArrayFormat)
    }
}

impl BamType for GeomVertexFormat {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let animation_type = get_u8_enum(scan)?;
        let num_transforms = scan.get_u16()?;
        let indexed_transforms = scan.get_bool()?;

        let arrays_ct = scan.get_u16()?;
        let mut arrays = Vec::with_capacity(arrays_ct as usize);
        for _ in 0..arrays_ct {
            arrays.push(manager.read_object(scan, "array format")?);
        }

        Ok(Self {
            animation_type,
            num_transforms,
            indexed_transforms,
            arrays,
        })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::GeomVertexFormat(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::GeomVertexFormat(self)
    }
}
