use crate::graph::BamObject;
use crate::reader::BamReader;
use crate::scene;
use crate::type_tag::{TypeTag, TypeTagInt};
use crate::writable::BamType;
use crate::writer::BamWriter;
use anyhow::{anyhow, Context, Result};
use bam_types::datagram::{Datagram, DatagramIterator};
use bam_types::error::BamError;
use std::any;
use std::collections::HashMap;
use std::sync::OnceLock;


pub type EncodeFn = fn(&BamObject, &mut BamWriter<'_>, &mut Datagram) -> Result<()>;
pub type DecodeFn = fn(TypeTag, &mut DatagramIterator<'_>, &BamReader<'_>) -> Result<BamObject>;

#[derive(Clone, Copy)]
struct TypeEntry {
    name: &'static str,
    encode: EncodeFn,
    decode: DecodeFn,
}

fn encode_as<T: BamType>(
    obj: &BamObject,
    manager: &mut BamWriter<'_>,
    dg: &mut Datagram,
) -> Result<()> {
    let moi = T::from_object(obj).ok_or_else(|| {
        anyhow!(BamError::structural(format!(
            "Tag {} is registered for a different variant than {:?}",
            obj.type_tag(),
            obj.kind()
        )))
    })?;
    moi.write_datagram(manager, dg)
}

fn decode_as<T: BamType>(
    tag: TypeTag,
    scan: &mut DatagramIterator<'_>,
    manager: &BamReader<'_>,
) -> Result<BamObject> {
    let moi = T::read_datagram(tag, scan, manager)?;
    Ok(moi.into_object())
}

/// Maps every [`TypeTag`] to the encoder and decoder of its variant.
///
/// The table is immutable once built. [`TypeRegistry::global`] holds every type of the
/// [`crate::scene`] schema.
///
/// A record is framed as
///
/// ```text
/// struct Record {
///     type_tag:   u16,
///     body_len:   u32,
///     body:       [u8; body_len],
/// }
/// ```
pub struct TypeRegistry {
    entries: HashMap<TypeTag, TypeEntry>,
}

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder { entries: vec![] }
    }

    pub fn global() -> Result<&'static TypeRegistry> {
        if let Some(registry) = GLOBAL.get() {
            return Ok(registry);
        }
        let registry = scene::register_all(Self::builder()).build()?;
        Ok(GLOBAL.get_or_init(|| registry))
    }

    pub fn is_registered(&self, tag: TypeTag) -> bool {
        self.entries.contains_key(&tag)
    }

    /// The name of the type registered under `tag`.
    pub fn name_of(&self, tag: TypeTag) -> Option<&'static str> {
        self.entries.get(&tag).map(|entry| entry.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, tag: TypeTag) -> Result<&TypeEntry> {
        self.entries
            .get(&tag)
            .ok_or_else(|| anyhow!(BamError::UnknownTypeTag(*TypeTagInt::from(tag))))
    }

    /// Appends one whole record for `obj`.
    pub fn encode(
        &self,
        obj: &BamObject,
        manager: &mut BamWriter<'_>,
        dg: &mut Datagram,
    ) -> Result<()> {
        let tag = obj.type_tag();
        let entry = self.entry(tag)?;

        let mut body = Datagram::new();
        (entry.encode)(obj, manager, &mut body).with_context(|| format!("Encoding {}", tag))?;

        /* type_tag */
        dg.add_u16(*TypeTagInt::from(tag));

        /* body_len and body */
        dg.add_blob(&body)?;

        Ok(())
    }

    /// Reads one whole record. Pointer fields of the result still hold file indices.
    pub fn decode(
        &self,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<BamObject> {
        /* type_tag */
        let tag = TypeTag::try_from(TypeTagInt::from(scan.get_u16()?))?;
        let entry = self.entry(tag)?;

        /* body_len and body */
        let body_len = scan.get_u32()? as usize;
        let body = scan.get_bytes(body_len)?;

        let mut body_scan = DatagramIterator::new(body);
        let obj = (entry.decode)(tag, &mut body_scan, manager)
            .with_context(|| format!("Decoding {}", tag))?;
        body_scan.expect_end(&format!("{} body", tag))?;

        Ok(obj)
    }
}

pub struct TypeRegistryBuilder {
    entries: Vec<(TypeTag, TypeEntry)>,
}

impl TypeRegistryBuilder {
    pub fn register<T: BamType>(self, tag: TypeTag) -> Self {
        let name = any::type_name::<T>();
        let name = name.rsplit("::").next().unwrap_or(name);
        self.register_fns(tag, name, encode_as::<T>, decode_as::<T>)
    }

    pub fn register_fns(
        mut self,
        tag: TypeTag,
        name: &'static str,
        encode: EncodeFn,
        decode: DecodeFn,
    ) -> Self {
        self.entries.push((
            tag,
            TypeEntry {
                name,
                encode,
                decode,
            },
        ));
        self
    }

    pub fn build(self) -> Result<TypeRegistry> {
        let mut entries = HashMap::with_capacity(self.entries.len());
        for (tag, entry) in self.entries {
            if entries.insert(tag, entry).is_some() {
                return Err(anyhow!(BamError::structural(format!(
                    "Tag {} is registered twice",
                    tag
                ))));
            }
        }
        Ok(TypeRegistry { entries })
    }
}
