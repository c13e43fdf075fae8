use crate::graph::{ObjectId, ObjectKind, SceneGraph};
use crate::registry::TypeRegistry;
use crate::stream;
use anyhow::{anyhow, Result};
use bam_types::datagram::Datagram;
use bam_types::error::BamError;
use bam_types::version::{self, BamVersion, Feature};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, trace};


/// One write session: the pointer table.
///
/// Every distinct object reachable from the roots gets an index on first encounter, 1-based in
/// encounter order. Its record is written once, when it leaves the FIFO queue, so records come out
/// in index order. Any later reference, including a back-reference that closes a cycle, writes the
/// index only.
///
/// The session borrows the graph immutably; the graph cannot change while it is being written.
pub struct BamWriter<'g> {
    graph: &'g SceneGraph,
    registry: &'g TypeRegistry,
    target_version: BamVersion,

    obj_idxs: HashMap<ObjectId, u32>,
    pending: VecDeque<ObjectId>,
    next_idx: u32,
    root_idxs: Vec<u32>,
}

impl<'g> BamWriter<'g> {
    pub fn begin_session(graph: &'g SceneGraph, target_version: BamVersion) -> Result<Self> {
        let registry = TypeRegistry::global()?;
        Self::with_registry(graph, target_version, registry)
    }

    pub fn with_registry(
        graph: &'g SceneGraph,
        target_version: BamVersion,
        registry: &'g TypeRegistry,
    ) -> Result<Self> {
        target_version.check_supported()?;
        debug!(
            "Beginning bam write session at version {} over {} objects",
            target_version,
            graph.len()
        );
        Ok(Self {
            graph,
            registry,
            target_version,
            obj_idxs: HashMap::new(),
            pending: VecDeque::new(),
            next_idx: 1,
            root_idxs: vec![],
        })
    }

    pub fn target_version(&self) -> BamVersion {
        self.target_version
    }

    pub fn graph(&self) -> &'g SceneGraph {
        self.graph
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        version::is_enabled(feature, self.target_version)
    }

    /// The index assigned to `id`, if it has been encountered.
    pub fn object_index(&self, id: ObjectId) -> Option<u32> {
        self.obj_idxs.get(&id).copied()
    }

    fn assign_index(&mut self, id: ObjectId) -> Result<u32> {
        if let Some(idx) = self.obj_idxs.get(&id) {
            return Ok(*idx);
        }
        if !self.graph.contains(id) {
            return Err(anyhow!(BamError::structural(format!(
                "Pointer to {}, which is not in the graph",
                id
            ))));
        }
        let idx = self.next_idx;
        self.next_idx = idx
            .checked_add(1)
            .ok_or(anyhow!(BamError::Range {
                field: "object index",
                value: idx as u64 + 1,
                max: u32::MAX as u64,
            }))?;
        self.obj_idxs.insert(id, idx);
        self.pending.push_back(id);
        Ok(idx)
    }

    fn write_pointer_(
        &mut self,
        dg: &mut Datagram,
        ptr: Option<ObjectId>,
        expected: Option<ObjectKind>,
    ) -> Result<()> {
        let idx = match ptr {
            None => 0,
            Some(id) => {
                if let Some(expected) = expected {
                    let actual = self.graph.kind_of(id)?;
                    if actual != expected {
                        return Err(anyhow!(BamError::structural(format!(
                            "Pointer to {}, a {:?} where a {:?} is expected",
                            id, actual, expected
                        ))));
                    }
                }
                self.assign_index(id)?
            }
        };
        dg.add_u32(idx);
        Ok(())
    }

    /// Writes the index of `ptr`, 0 for null. Enqueues `ptr` if it has not been seen before.
    ///
    /// A non-null `ptr` must be an `expected`, as the reader requires when it resolves the index.
    pub fn write_pointer(
        &mut self,
        dg: &mut Datagram,
        ptr: Option<ObjectId>,
        expected: ObjectKind,
    ) -> Result<()> {
        self.write_pointer_(dg, ptr, Some(expected))
    }

    /// Writes a pointer that may refer to any kind of object.
    pub fn write_pointer_any(&mut self, dg: &mut Datagram, ptr: Option<ObjectId>) -> Result<()> {
        self.write_pointer_(dg, ptr, None)
    }

    pub fn write_object(
        &mut self,
        dg: &mut Datagram,
        id: ObjectId,
        expected: ObjectKind,
    ) -> Result<()> {
        self.write_pointer_(dg, Some(id), Some(expected))
    }

    pub fn write_object_any(&mut self, dg: &mut Datagram, id: ObjectId) -> Result<()> {
        self.write_pointer_(dg, Some(id), None)
    }

    pub fn write_root(&mut self, id: ObjectId) -> Result<u32> {
        let idx = self.assign_index(id)?;
        if !self.root_idxs.contains(&idx) {
            self.root_idxs.push(idx);
        }
        Ok(idx)
    }

    /// Writes every pending record and returns the whole stream.
    ///
    /// On error nothing is returned; a session that failed produced no output.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let graph = self.graph;
        let registry = self.registry;

        let mut records = Datagram::new();
        let mut records_ct = 0usize;
        while let Some(id) = self.pending.pop_front() {
            let obj = graph.object(id)?;
            trace!("Writing record {} for {} ({})", records_ct + 1, id, obj.type_tag());
            registry.encode(obj, &mut self, &mut records)?;
            records_ct += 1;
        }

        let mut dg = Datagram::new();
        stream::write_header(&mut dg, self.target_version);

        /* roots */
        dg.add_count_u16("roots", self.root_idxs.len())?;
        for root_idx in self.root_idxs.iter() {
            dg.add_u32(*root_idx);
        }

        /* objects */
        dg.add_count_u32("objects", records_ct)?;
        dg.append_data(&records);

        debug!(
            "Finished bam write session: {} roots, {} records, {} bytes",
            self.root_idxs.len(),
            records_ct,
            dg.len()
        );
        Ok(dg.into_vec())
    }
}

/// Writes `roots` of `graph` in one session.
pub fn write_session(
    graph: &SceneGraph,
    target_version: BamVersion,
    roots: &[ObjectId],
) -> Result<Vec<u8>> {
    let mut writer = BamWriter::begin_session(graph, target_version)?;
    for root in roots {
        writer.write_root(*root)?;
    }
    writer.finish()
}
