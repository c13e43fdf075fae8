use crate::graph::{BamObject, ObjectId, ObjectKind, SceneGraph};
use crate::registry::TypeRegistry;
use crate::stream;
use anyhow::{anyhow, Context, Result};
use bam_types::datagram::DatagramIterator;
use bam_types::error::BamError;
use bam_types::version::{self, BamVersion, Feature};
use tracing::{debug, trace};


/// Smallest possible record: type_tag and body_len.
const MIN_RECORD_LEN: usize = 6;

/// The decoded content of one stream.
#[derive(Debug)]
pub struct BamReadResult {
    pub version: BamVersion,
    /// The object of file index `i` has `ObjectId(i - 1)`.
    pub graph: SceneGraph,
    pub root_indices: Vec<u32>,
    pub roots: Vec<ObjectId>,
}

impl BamReadResult {
    /// The object that had file index `idx`.
    pub fn object_at(&self, idx: u32) -> Option<ObjectId> {
        let id = ObjectId::from(idx.checked_sub(1)?);
        self.graph.contains(id).then_some(id)
    }
}

/// One read session.
///
/// Reading happens in two passes. The first pass decodes every record in order, allocating one
/// object per file index; pointer fields keep the raw file index. The second pass resolves every
/// pointer field against the allocated objects. No decode ever needs an object that does not exist
/// yet, so cycles need no special handling.
pub struct BamReader<'r> {
    registry: &'r TypeRegistry,
    file_version: BamVersion,
}

impl BamReader<'static> {
    pub fn read_session(bytes: &[u8]) -> Result<BamReadResult> {
        let registry = TypeRegistry::global()?;
        BamReader::read_with_registry(bytes, registry)
    }
}

impl<'r> BamReader<'r> {
    pub fn read_with_registry(bytes: &[u8], registry: &'r TypeRegistry) -> Result<BamReadResult> {
        let mut scan = DatagramIterator::new(bytes);

        let file_version = stream::read_header(&mut scan)?;
        let reader = BamReader {
            registry,
            file_version,
        };
        debug!(
            "Beginning bam read session at version {} over {} bytes",
            file_version,
            bytes.len()
        );

        /* roots */
        let roots_ct = scan.get_u16()?;
        let mut root_indices = Vec::with_capacity(roots_ct as usize);
        for _ in 0..roots_ct {
            root_indices.push(scan.get_u32()?);
        }

        /* objects, pass 1 */
        let objs_ct = scan.get_u32()? as usize;
        let mut objects = Vec::with_capacity(objs_ct.min(scan.remaining() / MIN_RECORD_LEN));
        for obj_i in 0..objs_ct {
            let obj = reader
                .registry
                .decode(&mut scan, &reader)
                .with_context(|| format!("Reading record of index {}", obj_i + 1))?;
            trace!("Read record {} ({})", obj_i + 1, obj.type_tag());
            objects.push(obj);
        }
        scan.expect_end("the last record")?;

        /* objects, pass 2 */
        let resolver = PointerResolver::new(&objects);
        for (obj_i, obj) in objects.iter_mut().enumerate() {
            obj.complete_pointers(&resolver)
                .with_context(|| format!("Resolving pointers of index {}", obj_i + 1))?;
        }
        let mut roots = Vec::with_capacity(root_indices.len());
        for root_idx in root_indices.iter() {
            let raw = ObjectId::from(*root_idx);
            roots.push(resolver.resolve_any(raw)?);
        }

        debug!(
            "Finished bam read session: {} roots, {} records",
            roots.len(),
            objects.len()
        );
        Ok(BamReadResult {
            version: file_version,
            graph: SceneGraph::from_objects(objects),
            root_indices,
            roots,
        })
    }

    pub fn file_version(&self) -> BamVersion {
        self.file_version
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        version::is_enabled(feature, self.file_version)
    }

    /// Reads a pointer field. The id holds the raw file index until it is resolved.
    pub fn read_pointer(&self, scan: &mut DatagramIterator<'_>) -> Result<Option<ObjectId>> {
        let idx = scan.get_u32()?;
        if idx == 0 {
            Ok(None)
        } else {
            Ok(Some(ObjectId::from(idx)))
        }
    }

    /// Reads a pointer field that must not be null.
    pub fn read_object(
        &self,
        scan: &mut DatagramIterator<'_>,
        field: &'static str,
    ) -> Result<ObjectId> {
        self.read_pointer(scan)?
            .ok_or_else(|| anyhow!(BamError::malformed(format!("Null pointer in {}", field))))
    }
}

/// Maps raw file indices to the objects allocated for them, checking what they point at.
pub struct PointerResolver {
    kinds: Vec<ObjectKind>,
}

impl PointerResolver {
    fn new(objects: &[BamObject]) -> Self {
        Self {
            kinds: objects.iter().map(BamObject::kind).collect(),
        }
    }

    fn resolve_(&self, raw: ObjectId, expected: Option<ObjectKind>) -> Result<ObjectId> {
        let idx: u32 = raw.into();
        let obj_i = match idx.checked_sub(1) {
            Some(obj_i) if (obj_i as usize) < self.kinds.len() => obj_i,
            _ => {
                return Err(anyhow!(BamError::malformed(format!(
                    "Pointer index {} outside 1..={}",
                    idx,
                    self.kinds.len()
                ))))
            }
        };
        if let Some(expected) = expected {
            let actual = self.kinds[obj_i as usize];
            if actual != expected {
                return Err(anyhow!(BamError::malformed(format!(
                    "Pointer index {} is a {:?} where a {:?} is expected",
                    idx, actual, expected
                ))));
            }
        }
        Ok(ObjectId::from(obj_i))
    }

    pub fn resolve(&self, raw: ObjectId, expected: ObjectKind) -> Result<ObjectId> {
        self.resolve_(raw, Some(expected))
    }

    pub fn resolve_opt(
        &self,
        raw: Option<ObjectId>,
        expected: ObjectKind,
    ) -> Result<Option<ObjectId>> {
        raw.map(|raw| self.resolve(raw, expected)).transpose()
    }

    pub fn resolve_any(&self, raw: ObjectId) -> Result<ObjectId> {
        self.resolve_(raw, None)
    }

    pub fn resolve_opt_any(&self, raw: Option<ObjectId>) -> Result<Option<ObjectId>> {
        raw.map(|raw| self.resolve_any(raw)).transpose()
    }

    pub fn resolve_all(&self, raws: &mut [ObjectId], expected: ObjectKind) -> Result<()> {
        for raw in raws.iter_mut() {
            *raw = self.resolve(*raw, expected)?;
        }
        Ok(())
    }
}
