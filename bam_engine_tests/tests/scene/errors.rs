use crate::scene::helpers::{fixtures, verify};
use anyhow::Result;
use bam_engine::scene::*;
use bam_engine::writer::write_session;
use bam_engine::{BamObject, BamReader, SceneGraph};
use bam_types::error::BamError;
use bam_types::version::BamVersion;
use std::fmt::Debug;

const MINOR_POS: usize = 8;
const FIRST_ROOT_POS: usize = 12;
const FIRST_TAG_POS: usize = 20;
const FIRST_LEN_POS: usize = 22;

fn bam_error<T: Debug>(res: Result<T>) -> BamError {
    let err = res.unwrap_err();
    err.downcast_ref::<BamError>()
        .cloned()
        .unwrap_or_else(|| panic!("Not a bam error: {:?}", err))
}

fn assert_structural<T: Debug>(res: Result<T>) {
    let err = bam_error(res);
    assert!(matches!(err, BamError::Structural(_)), "{:?}", err);
}

fn patched(bytes: &[u8], pos: usize, patch: &[u8]) -> Vec<u8> {
    let mut bytes = bytes.to_vec();
    bytes[pos..pos + patch.len()].copy_from_slice(patch);
    bytes
}

pub fn corrupted_streams() -> Result<()> {
    let (graph, node) = fixtures::lone_node_scene();
    let good = write_session(&graph, BamVersion::CURRENT, &[node])?;
    BamReader::read_session(&good)?;

    let bad = patched(&good, FIRST_TAG_POS, &999u16.to_le_bytes());
    assert_eq!(BamError::UnknownTypeTag(999), bam_error(BamReader::read_session(&bad)));

    let bad = patched(&good, MINOR_POS, &46u16.to_le_bytes());
    assert_eq!(
        BamError::UnsupportedVersion(BamVersion::new(6, 46)),
        bam_error(BamReader::read_session(&bad))
    );

    for root_idx in [0u32, 5, 99] {
        let bad = patched(&good, FIRST_ROOT_POS, &root_idx.to_le_bytes());
        let err = bam_error(BamReader::read_session(&bad));
        assert!(matches!(err, BamError::Malformed(_)), "{:?}", err);
    }

    // The first record claims one byte more than its body.
    let body_len = u32::from_le_bytes(good[FIRST_LEN_POS..FIRST_LEN_POS + 4].try_into()?);
    let bad = patched(&good, FIRST_LEN_POS, &(body_len + 1).to_le_bytes());
    assert!(BamReader::read_session(&bad).is_err());

    // Any object may be a root, here the node's render state.
    let bad = patched(&good, FIRST_ROOT_POS, &2u32.to_le_bytes());
    let res = BamReader::read_session(&bad)?;
    assert!(res.graph.typed::<RenderState>(res.roots[0]).is_ok());

    let err = bam_error(BamReader::read_session(&good[..good.len() - 1]));
    assert!(matches!(err, BamError::TruncatedStream { .. }), "{:?}", err);

    let mut long = good.clone();
    long.push(0);
    let err = bam_error(BamReader::read_session(&long));
    assert!(matches!(err, BamError::Malformed(_)), "{:?}", err);

    // Every prefix of a real scene fails cleanly.
    let scene = fixtures::full_scene()?;
    let bytes = write_session(&scene.graph, BamVersion::CURRENT, &[scene.root])?;
    for len in (0..bytes.len()).step_by(7) {
        let err = bam_error(BamReader::read_session(&bytes[..len]));
        assert!(matches!(err, BamError::TruncatedStream { .. }), "{}: {:?}", len, err);
    }
    Ok(())
}

pub fn oversized_fields() -> Result<()> {
    let mut graph = SceneGraph::new();
    let fits = graph.add_panda_node(&"n".repeat(u16::MAX as usize));
    let res = verify::round_trip(&graph, &[fits], BamVersion::CURRENT)?;
    assert_eq!(u16::MAX as usize, res.graph.node(res.roots[0])?.name.len());

    let too_long = graph.add_panda_node(&"n".repeat(u16::MAX as usize + 1));
    assert_eq!(
        BamError::Range {
            field: "string length",
            value: 65536,
            max: 65535
        },
        bam_error(write_session(&graph, BamVersion::CURRENT, &[too_long]))
    );
    graph.set_tag(fits, "key", &"v".repeat(70000))?;
    assert!(matches!(
        bam_error(write_session(&graph, BamVersion::CURRENT, &[fits])),
        BamError::Range { field: "string length", value: 70000, .. }
    ));

    let stage = graph.add_texture_stage(TextureStage::new("off"));
    let tex = graph.add_attrib(TextureAttrib {
        off_all_stages: false,
        off_stages: vec![stage; u16::MAX as usize + 1],
        on_stages: vec![],
    })?;
    assert_eq!(
        BamError::Range {
            field: "off_stages",
            value: 65536,
            max: 65535
        },
        bam_error(write_session(&graph, BamVersion::CURRENT, &[tex]))
    );
    Ok(())
}

/// Each rejected mutation leaves the reachable graph as it was, so it writes the same bytes.
pub fn rejected_mutations_leave_graph_writable() -> Result<()> {
    let mut scene = fixtures::full_scene()?;
    let before = write_session(&scene.graph, BamVersion::CURRENT, &[scene.root])?;
    let graph = &mut scene.graph;
    let (root, model, lod, mesh) = (scene.root, scene.model, scene.lod, scene.mesh);

    /* links */
    assert_structural(graph.add_child(root, root));
    assert_structural(graph.add_child(root, model));
    assert_structural(graph.add_child(mesh, root));
    assert_structural(graph.add_stashed(lod, model));
    assert_structural(graph.add_child(lod, scene.shared));
    assert_structural(graph.add_lod_child(lod, scene.shared, 1.0, 2.0));
    assert_structural(graph.remove_child(mesh, root));
    let state = graph.node(root)?.state;
    assert_structural(graph.add_child(root, state));

    /* render state */
    let transp_0 = graph.add_attrib(TransparencyAttrib {
        mode: TransparencyMode::Alpha,
    })?;
    let transp_1 = graph.add_attrib(TransparencyAttrib {
        mode: TransparencyMode::Dual,
    })?;
    let entries = [transp_0, transp_1]
        .iter()
        .map(|attrib| AttribEntry {
            attrib: *attrib,
            override_priority: 0,
        })
        .collect();
    assert_structural(graph.add_render_state(entries));
    assert_structural(graph.set_state(root, transp_0));
    assert_structural(graph.add_attrib(TextureAttrib {
        off_all_stages: true,
        off_stages: vec![root],
        on_stages: vec![],
    }));

    /* vertices */
    let format = graph.add_array_format(8);
    graph.add_column(format, "vertex", 2, NumericType::Float32, Contents::Point, 0)?;
    assert_structural(graph.add_column(format, "normal", 1, NumericType::Float32, Contents::Normal, 4));
    assert_structural(graph.add_column(format, "normal", 2, NumericType::Float32, Contents::Normal, 4));
    assert_structural(graph.add_column(format, "vertex", 0, NumericType::Float32, Contents::Point, 0));
    assert_structural(graph.add_vertex_array(format, UsageHint::Static, vec![0; 12]));
    let vertex_format = graph.add_vertex_format(vec![format])?;
    assert_structural(graph.add_vertex_data("v", vertex_format, vec![]));
    assert_structural(graph.add_vertex_format(vec![root]));

    /* primitives */
    assert_structural(graph.add_primitive(PrimitiveKind::Lines, NumericType::Float32, UsageHint::Static));
    assert_structural(graph.add_patches(0, UsageHint::Static));
    let lines = graph.add_primitive(PrimitiveKind::Lines, NumericType::Uint16, UsageHint::Static)?;
    let geoms = match graph.object(mesh)? {
        BamObject::GeomNode(moi) => moi.geoms().iter().map(|entry| entry.geom).collect::<Vec<_>>(),
        obj => panic!("Mesh is a {:?}", obj.kind()),
    };
    assert_structural(graph.add_primitive_to_geom(geoms[0], lines));
    let points = graph.typed::<Geom>(geoms[1])?.primitives()[0];
    assert_structural(graph.add_primitive_to_geom(geoms[1], points));
    let vertex_array = graph.add_vertex_array(format, UsageHint::Static, vec![0; 16])?;
    assert_structural(graph.set_primitive_vertices(lines, vertex_array));
    assert_structural(graph.set_primitive_range(lines, -1, 3));
    assert_structural(graph.set_primitive_ends(lines, vertex_array));

    let after = write_session(graph, BamVersion::CURRENT, &[root])?;
    assert!(before == after);
    verify::verify_links(graph)?;
    Ok(())
}
