use anyhow::Result;
use bam_engine::writer::write_session;
use bam_engine::{BamReadResult, BamReader, ObjectId, SceneGraph, TypeTag};
use bam_types::version::BamVersion;

/// Writes, reads, and writes again, asserting that the second stream equals the first.
///
/// The writer assigns indices in discovery order and writes every field, so equal streams mean the
/// decoded graph is isomorphic to the original over everything reachable from `roots`.
pub fn round_trip(
    graph: &SceneGraph,
    roots: &[ObjectId],
    version: BamVersion,
) -> Result<BamReadResult> {
    let bytes = write_session(graph, version, roots)?;
    let res = BamReader::read_session(&bytes)?;

    assert_eq!(version, res.version);
    assert_eq!(roots.len(), res.roots.len());
    for (root_i, root_idx) in res.root_indices.iter().enumerate() {
        assert_eq!(res.object_at(*root_idx), Some(res.roots[root_i]));
    }

    let rewritten = write_session(&res.graph, version, &res.roots)?;
    assert!(bytes == rewritten, "Round trip at {} changed the stream", version);

    verify_links(&res.graph)?;
    Ok(res)
}

/// Asserts that parent and child links agree in both directions.
pub fn verify_links(graph: &SceneGraph) -> Result<()> {
    for (id, obj) in graph.iter() {
        let node = match obj.as_node() {
            None => continue,
            Some(node) => node,
        };
        for conn in node.children().iter().chain(node.stashed()) {
            let child = graph.node(conn.child)?;
            assert!(child.parents().contains(&id), "{} -> {}", id, conn.child);
        }
        for parent_id in node.parents() {
            let parent = graph.node(*parent_id)?;
            let links = parent
                .children()
                .iter()
                .chain(parent.stashed())
                .filter(|conn| conn.child == id)
                .count();
            assert_eq!(1, links, "{} <- {}", id, parent_id);
        }
    }
    Ok(())
}

pub fn sorted_tags(graph: &SceneGraph) -> Vec<TypeTag> {
    let mut tags = graph
        .iter()
        .map(|(_, obj)| obj.type_tag())
        .collect::<Vec<_>>();
    tags.sort();
    tags
}

/// The first node named `name`.
pub fn find_node(graph: &SceneGraph, name: &str) -> Option<ObjectId> {
    graph
        .iter()
        .find(|(_, obj)| obj.as_node().map(|node| node.name == name) == Some(true))
        .map(|(id, _)| id)
}

/// Every supported version, in order.
pub fn supported_versions() -> Vec<BamVersion> {
    let min = BamVersion::MIN_SUPPORTED;
    let max = BamVersion::CURRENT;
    (min.minor..=max.minor)
        .map(|minor| BamVersion::new(min.major, minor))
        .collect()
}
