use crate::scene::helpers::{fixtures, verify};
use anyhow::Result;
use bam_engine::scene::*;
use bam_engine::writer::write_session;
use bam_engine::{BamReader, ObjectId, SceneGraph};
use bam_types::version::{self, BamVersion, Feature};
use itertools::Itertools;

fn stream_len(graph: &SceneGraph, root: ObjectId, version: BamVersion) -> Result<usize> {
    Ok(write_session(graph, version, &[root])?.len())
}

/// Bytes added by moving from the version just below `gate` to `gate`.
fn gate_delta(graph: &SceneGraph, root: ObjectId, gate: BamVersion) -> Result<usize> {
    let below = BamVersion::new(gate.major, gate.minor - 1);
    Ok(stream_len(graph, root, gate)? - stream_len(graph, root, below)?)
}

pub fn gated_fields_at_each_gate() -> Result<()> {
    let (graph, node) = fixtures::lone_node_scene();
    assert_eq!(1, gate_delta(&graph, node, version::gate(Feature::NodeBoundsType))?);
    for feature in [
        Feature::TextureStageImplicitSort,
        Feature::TextureStageOverride,
        Feature::VertexColumnAlignment,
        Feature::TextureStageSampler,
    ] {
        assert_eq!(0, gate_delta(&graph, node, version::gate(feature))?, "{:?}", feature);
    }

    let (graph, geom) = fixtures::lone_geom_scene()?;
    // The geom's bounds type, and nothing else at that gate.
    assert_eq!(1, gate_delta(&graph, geom, version::gate(Feature::GeomBoundsType))?);

    let (graph, tex) = fixtures::texture_attrib_scene()?;
    // One u16 sort per on stage.
    assert_eq!(4, gate_delta(&graph, tex, version::gate(Feature::TextureStageImplicitSort))?);
    // One i32 priority per on stage.
    assert_eq!(8, gate_delta(&graph, tex, version::gate(Feature::TextureStageOverride))?);
    // A presence flag per on stage, and one inline sampler.
    assert_eq!(37, gate_delta(&graph, tex, version::gate(Feature::TextureStageSampler))?);
    assert_eq!(0, gate_delta(&graph, tex, version::gate(Feature::NodeBoundsType))?);

    let (graph, format) = fixtures::array_format_scene()?;
    // One alignment byte per column.
    assert_eq!(2, gate_delta(&graph, format, version::gate(Feature::VertexColumnAlignment))?);
    Ok(())
}

/// Below the node bounds gate, the stream is the gated stream without the bounds byte.
pub fn gated_field_is_the_only_difference() -> Result<()> {
    const MINOR_POS: usize = 8;
    const FIRST_LEN_POS: usize = 22;
    const FIRST_BODY_POS: usize = 26;

    let (graph, node) = fixtures::lone_node_scene();
    let name_len = graph.node(node)?.name.len();
    // Name, then the state, transform and effects pointers, then the three masks.
    let bounds_pos = FIRST_BODY_POS + 2 + name_len + 3 * 4 + 3 * 4;

    let gate = version::gate(Feature::NodeBoundsType);
    let below = BamVersion::new(gate.major, gate.minor - 1);
    let with_bounds = write_session(&graph, gate, &[node])?;
    let without_bounds = write_session(&graph, below, &[node])?;
    assert_eq!(BoundsType::Fastest as u8, with_bounds[bounds_pos]);

    let mut stripped = with_bounds.clone();
    stripped.remove(bounds_pos);
    stripped[MINOR_POS..MINOR_POS + 2].copy_from_slice(&below.minor.to_le_bytes());
    let body_len = u32::from_le_bytes(stripped[FIRST_LEN_POS..FIRST_LEN_POS + 4].try_into()?);
    stripped[FIRST_LEN_POS..FIRST_LEN_POS + 4].copy_from_slice(&(body_len - 1).to_le_bytes());
    assert_eq!(without_bounds, stripped);
    Ok(())
}

pub fn older_streams_get_defaults() -> Result<()> {
    let (graph, tex) = fixtures::texture_attrib_scene()?;
    let decode = |version| -> Result<TextureAttrib> {
        let res = verify::round_trip(&graph, &[tex], version)?;
        Ok(res.graph.typed::<TextureAttrib>(res.roots[0])?.clone())
    };

    // Implicit sorts fall back to stage positions.
    let oldest = decode(BamVersion::MIN_SUPPORTED)?;
    let sorts = oldest
        .on_stages
        .iter()
        .map(|stage_node| stage_node.implicit_sort)
        .collect::<Vec<_>>();
    assert_eq!(vec![0, 1], sorts);
    assert_eq!(0, oldest.on_stages[0].override_priority);
    assert_eq!(None, oldest.on_stages[0].sampler);

    let with_sort = decode(version::gate(Feature::TextureStageImplicitSort))?;
    assert_eq!(7, with_sort.on_stages[0].implicit_sort);
    assert_eq!(0, with_sort.on_stages[0].override_priority);

    let with_override = decode(version::gate(Feature::TextureStageOverride))?;
    assert_eq!(-3, with_override.on_stages[0].override_priority);
    assert_eq!(None, with_override.on_stages[0].sampler);

    let with_sampler = decode(version::gate(Feature::TextureStageSampler))?;
    assert_eq!(Some(SamplerState::default()), with_sampler.on_stages[0].sampler);
    assert_eq!(None, with_sampler.on_stages[1].sampler);

    // Bounds types fall back to the default.
    let (graph, node) = fixtures::lone_node_scene();
    let node_gate = version::gate(Feature::NodeBoundsType);
    let res = verify::round_trip(&graph, &[node], BamVersion::new(6, node_gate.minor - 1))?;
    assert_eq!(BoundsType::Default, res.graph.node(res.roots[0])?.bounds_type);
    let res = verify::round_trip(&graph, &[node], node_gate)?;
    assert_eq!(BoundsType::Fastest, res.graph.node(res.roots[0])?.bounds_type);

    let (graph, geom) = fixtures::lone_geom_scene()?;
    let res = verify::round_trip(&graph, &[geom], BamVersion::MIN_SUPPORTED)?;
    assert_eq!(BoundsType::Default, res.graph.typed::<Geom>(res.roots[0])?.bounds_type);
    let res = verify::round_trip(&graph, &[geom], BamVersion::CURRENT)?;
    assert_eq!(BoundsType::Box, res.graph.typed::<Geom>(res.roots[0])?.bounds_type);

    // Column alignments fall back to the component width.
    let (graph, format) = fixtures::array_format_scene()?;
    let bytes = write_session(&graph, BamVersion::MIN_SUPPORTED, &[format])?;
    let res = BamReader::read_session(&bytes)?;
    let format = res.graph.typed::<GeomVertexArrayFormat>(res.roots[0])?;
    let alignments = format
        .columns()
        .iter()
        .map(|col| col.column_alignment)
        .collect::<Vec<_>>();
    assert_eq!(vec![4, 1], alignments);
    Ok(())
}

pub fn stream_never_shrinks_with_version() -> Result<()> {
    let scene = fixtures::full_scene()?;
    let lens = verify::supported_versions()
        .into_iter()
        .map(|version| -> Result<(BamVersion, usize)> {
            Ok((version, stream_len(&scene.graph, scene.root, version)?))
        })
        .collect::<Result<Vec<_>>>()?;

    for ((_, len_0), (version_1, len_1)) in lens.iter().tuple_windows() {
        assert!(len_0 <= len_1, "The stream shrank at {}", version_1);
    }

    // The full scene has a field behind every gate, so each gate grows the stream.
    for (feature, gate) in version::GATES {
        let delta = gate_delta(&scene.graph, scene.root, gate)?;
        assert!(delta > 0, "{:?} added nothing at {}", feature, gate);
    }
    Ok(())
}
