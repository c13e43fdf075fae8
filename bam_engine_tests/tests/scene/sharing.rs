use crate::scene::helpers::{fixtures, verify};
use anyhow::Result;
use bam_engine::scene::*;
use bam_engine::stream;
use bam_engine::{BamObject, ObjectKind, SceneGraph};
use bam_types::datagram::DatagramIterator;
use bam_types::version::BamVersion;
use itertools::Itertools;

/// R has children A and B, and both have child C. C must be written once and decoded once.
pub fn instanced_child() -> Result<()> {
    let mut graph = SceneGraph::new();
    let r = graph.add_panda_node("R");
    let a = graph.add_panda_node("A");
    let b = graph.add_panda_node("B");
    let c = graph.add_panda_node("C");
    graph.add_child(r, a)?;
    graph.add_child(r, b)?;
    graph.add_child(a, c)?;
    graph.add_child(b, c)?;

    let bytes = bam_engine::writer::write_session(&graph, BamVersion::CURRENT, &[r])?;
    let mut scan = DatagramIterator::new(&bytes);
    stream::read_header(&mut scan)?;
    assert_eq!(1, scan.get_u16()?);
    assert_eq!(1, scan.get_u32()?);
    // Four nodes and the three empties they share.
    assert_eq!(7, scan.get_u32()?);

    let res = verify::round_trip(&graph, &[r], BamVersion::CURRENT)?;
    assert_eq!(7, res.graph.len());

    let r = res.roots[0];
    let (a, b) = res
        .graph
        .node(r)?
        .child_ids()
        .collect_tuple()
        .unwrap();
    let c_via_a = res.graph.node(a)?.children()[0].child;
    let c_via_b = res.graph.node(b)?.children()[0].child;
    assert_eq!(c_via_a, c_via_b);

    let c = res.graph.node(c_via_a)?;
    assert_eq!("C", c.name);
    assert_eq!(&[a, b], c.parents());

    let c_ct = res
        .graph
        .iter()
        .filter(|(_, obj)| obj.as_node().map(|node| node.name == "C") == Some(true))
        .count();
    assert_eq!(1, c_ct);
    Ok(())
}

/// Pointers to one state, one vertex data, and one index array decode to one object each.
pub fn shared_states_and_arrays() -> Result<()> {
    let scene = fixtures::full_scene()?;
    let res = verify::round_trip(&scene.graph, &[scene.root], BamVersion::CURRENT)?;

    let mesh = match res.graph.object(verify::find_node(&res.graph, "mesh").unwrap())? {
        BamObject::GeomNode(moi) => moi,
        obj => panic!("Mesh decoded as {:?}", obj.kind()),
    };
    let far = match res.graph.object(verify::find_node(&res.graph, "far").unwrap())? {
        BamObject::GeomNode(moi) => moi,
        obj => panic!("Far decoded as {:?}", obj.kind()),
    };

    // The tris and patches geoms share a state, and the points geom is shared by both nodes.
    assert_eq!(mesh.geoms()[0].state, mesh.geoms()[2].state);
    assert_ne!(mesh.geoms()[0].state, mesh.geoms()[1].state);
    assert_eq!(mesh.geoms()[1].geom, far.geoms()[0].geom);
    assert_eq!(mesh.geoms()[1].state, far.geoms()[0].state);

    let root_state = res.graph.node(res.roots[0])?.state;
    assert_eq!(root_state, mesh.geoms()[0].state);

    let vdatas = mesh
        .geoms()
        .iter()
        .map(|entry| -> Result<_> { Ok(res.graph.typed::<Geom>(entry.geom)?.data()) })
        .collect::<Result<Vec<_>>>()?;
    assert!(vdatas.iter().all_equal());

    let count_kind = |kind: ObjectKind| {
        res.graph
            .iter()
            .filter(|(_, obj)| obj.kind() == kind)
            .count()
    };
    assert_eq!(1, count_kind(ObjectKind::VertexData));
    assert_eq!(1, count_kind(ObjectKind::VertexFormat));
    assert_eq!(3, count_kind(ObjectKind::VertexArrayData));
    assert_eq!(3, count_kind(ObjectKind::VertexArrayFormat));
    assert_eq!(2, count_kind(ObjectKind::RenderState));
    assert_eq!(2, count_kind(ObjectKind::TransformState));
    assert_eq!(2, count_kind(ObjectKind::RenderEffects));

    // Column names are interned: one object per distinct name.
    let mut names = res
        .graph
        .iter()
        .filter_map(|(_, obj)| match obj {
            BamObject::InternalName(name) => Some(name.name.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>();
    names.sort();
    assert_eq!(vec!["color", "index", "texcoord", "vertex"], names);
    Ok(())
}

/// Parent pointers close cycles between a node and its children, and pull in ancestors of the
/// written root.
pub fn back_references() -> Result<()> {
    let mut graph = SceneGraph::new();
    let r = graph.add_model_root("R");
    let a = graph.add_panda_node("A");
    let leaf = graph.add_panda_node("leaf");
    graph.add_child(r, a)?;
    graph.add_child(a, leaf)?;

    let res = verify::round_trip(&graph, &[r], BamVersion::CURRENT)?;
    let r_dec = res.roots[0];
    let a_dec = res.graph.node(r_dec)?.children()[0].child;
    assert_eq!(&[r_dec], res.graph.node(a_dec)?.parents());
    let leaf_dec = res.graph.node(a_dec)?.children()[0].child;
    assert_eq!(&[a_dec], res.graph.node(leaf_dec)?.parents());

    // Writing only the leaf still writes every ancestor, so the links stay symmetric.
    let res = verify::round_trip(&graph, &[leaf], BamVersion::CURRENT)?;
    assert_eq!(graph.len(), res.graph.len());
    let leaf_dec = res.roots[0];
    assert_eq!("leaf", res.graph.node(leaf_dec)?.name);
    let a_dec = res.graph.node(leaf_dec)?.parents()[0];
    let r_dec = res.graph.node(a_dec)?.parents()[0];
    assert!(matches!(res.graph.object(r_dec)?, BamObject::ModelRoot(_)));
    assert!(res.graph.is_ancestor_or_self(r_dec, leaf_dec)?);

    // Stashed children carry a parent pointer too.
    let hidden = graph.add_panda_node("hidden");
    graph.add_stashed(leaf, hidden)?;
    let res = verify::round_trip(&graph, &[hidden], BamVersion::CURRENT)?;
    let hidden_dec = res.roots[0];
    let leaf_dec = res.graph.node(hidden_dec)?.parents()[0];
    assert_eq!(hidden_dec, res.graph.node(leaf_dec)?.stashed()[0].child);
    assert!(res.graph.node(leaf_dec)?.children().is_empty());
    Ok(())
}

pub fn multiple_roots() -> Result<()> {
    let mut graph = SceneGraph::new();
    let tree_0 = graph.add_model_root("tree_0");
    let tree_1 = graph.add_model_root("tree_1");
    let child = graph.add_panda_node("child");
    graph.add_child(tree_1, child)?;
    let stage = graph.add_texture_stage(TextureStage::new("loose"));

    let res = verify::round_trip(&graph, &[tree_0, tree_1, stage], BamVersion::CURRENT)?;
    assert_eq!(graph.len(), res.graph.len());
    let names = res.roots[..2]
        .iter()
        .map(|root| -> Result<String> { Ok(res.graph.node(*root)?.name.clone()) })
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(vec!["tree_0", "tree_1"], names);
    assert_eq!("loose", res.graph.typed::<TextureStage>(res.roots[2])?.name);
    assert_eq!(1, res.root_indices[0]);
    assert!(res.root_indices.iter().tuple_windows().all(|(x, y)| x < y));

    // A root may also be reachable from an earlier root.
    let res = verify::round_trip(&graph, &[tree_1, child], BamVersion::CURRENT)?;
    assert_eq!(res.roots[1], res.graph.node(res.roots[0])?.children()[0].child);

    // Root order decides index order.
    let res_rev = verify::round_trip(&graph, &[tree_1, tree_0], BamVersion::CURRENT)?;
    assert_eq!("tree_1", res_rev.graph.node(res_rev.roots[0])?.name);
    assert_eq!(vec![1, 2], res_rev.root_indices);
    Ok(())
}
