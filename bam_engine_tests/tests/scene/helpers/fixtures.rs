use anyhow::Result;
use bam_engine::scene::*;
use bam_engine::{BamObject, ObjectId, SceneGraph};

pub struct FullScene {
    pub graph: SceneGraph,
    pub root: ObjectId,
    pub model: ObjectId,
    pub shared: ObjectId,
    pub lod: ObjectId,
    pub mesh: ObjectId,
}

/// A scene that uses every schema type and every version-gated field.
///
/// Every object in the graph is reachable from `root`.
pub fn full_scene() -> Result<FullScene> {
    let mut graph = SceneGraph::new();

    let root = graph.add_model_root("scene");
    graph.set_tag(root, "author", "bam_engine_tests")?;
    graph.set_tag(root, "units", "m")?;
    if let Some(BamObject::ModelRoot(moi)) = graph.get_mut(root) {
        moi.model.preserve_transform = PreserveTransform::Net;
        moi.model.preserve_attributes = 0x3;
        moi.model.node.bounds_type = BoundsType::Box;
    }

    /* render state */

    let transp = graph.add_attrib(TransparencyAttrib {
        mode: TransparencyMode::Alpha,
    })?;

    let color_stage = graph.add_texture_stage(TextureStage::new("color"));
    let glow_stage = graph.add_texture_stage(TextureStage {
        name: "glow".into(),
        sort: 10,
        priority: -1,
        mode: TextureStageMode::ModulateGlow,
    });
    let detail_stage = graph.add_texture_stage(TextureStage::new("detail"));
    let grass = graph.add_texture("grass", "maps/grass.png");
    let glow = graph.add_texture("glow", "maps/glow.png");

    let mut tex_attrib = TextureAttrib::default();
    tex_attrib.off_stages.push(detail_stage);
    {
        let stage_node = tex_attrib.add_on_stage(color_stage, grass)?;
        stage_node.override_priority = 2;
        stage_node.sampler = Some(SamplerState {
            wrap_u: WrapMode::Clamp,
            min_filter: FilterType::LinearMipmapLinear,
            anisotropic_degree: 4,
            border_color: [1.0, 0.0, 0.0, 1.0],
            ..SamplerState::default()
        });
    }
    tex_attrib.add_on_stage(glow_stage, glow)?;
    let tex = graph.add_attrib(tex_attrib)?;

    let state = graph.add_render_state(vec![
        AttribEntry {
            attrib: transp,
            override_priority: 0,
        },
        AttribEntry {
            attrib: tex,
            override_priority: 1,
        },
    ])?;
    let empty_state = graph.empty_state();

    /* vertices */

    let vertex_af = graph.add_array_format(20);
    graph.add_column(vertex_af, "vertex", 3, NumericType::Float32, Contents::Point, 0)?;
    graph.add_column(vertex_af, "texcoord", 2, NumericType::Float32, Contents::Texcoord, 12)?;
    let color_af = graph.add_array_format(4);
    graph.add_column(color_af, "color", 4, NumericType::Uint8, Contents::Color, 0)?;
    let format = graph.add_vertex_format(vec![vertex_af, color_af])?;

    let vertex_bytes = (0..80).map(|b| b as u8).collect();
    let vertex_arr = graph.add_vertex_array(vertex_af, UsageHint::Static, vertex_bytes)?;
    let color_arr = graph.add_vertex_array(color_af, UsageHint::Dynamic, vec![0xff; 16])?;
    let vdata = graph.add_vertex_data("quad", format, vec![vertex_arr, color_arr])?;

    let index_af = graph.add_array_format(2);
    graph.add_column(index_af, "index", 1, NumericType::Uint16, Contents::Index, 0)?;
    let index_bytes = [0u16, 1, 2, 2, 1, 3]
        .iter()
        .flat_map(|idx| idx.to_le_bytes())
        .collect();
    let indices = graph.add_vertex_array(index_af, UsageHint::Static, index_bytes)?;

    /* primitives and geoms */

    let tris_geom = graph.add_geom(vdata, PrimitiveType::Polygons)?;
    let tris = graph.add_primitive(PrimitiveKind::Triangles, NumericType::Uint16, UsageHint::Static)?;
    graph.set_primitive_vertices(tris, indices)?;
    graph.add_primitive_to_geom(tris_geom, tris)?;
    let strip = graph.add_primitive(PrimitiveKind::Tristrips, NumericType::Uint16, UsageHint::Static)?;
    graph.set_primitive_vertices(strip, indices)?;
    let ends = graph.add_pta_int32(vec![4, 6]);
    graph.set_primitive_ends(strip, ends)?;
    graph.add_primitive_to_geom(tris_geom, strip)?;
    if let Some(BamObject::Geom(moi)) = graph.get_mut(tris_geom) {
        moi.bounds_type = BoundsType::Sphere;
        moi.shade_model = ShadeModel::FlatFirstVertex;
    }

    let points_geom = graph.add_geom(vdata, PrimitiveType::Points)?;
    let points = graph.add_primitive(PrimitiveKind::Points, NumericType::Uint32, UsageHint::Stream)?;
    graph.set_primitive_range(points, 0, 4)?;
    graph.add_primitive_to_geom(points_geom, points)?;

    let patches_geom = graph.add_geom(vdata, PrimitiveType::Patches)?;
    let patches = graph.add_patches(3, UsageHint::Static)?;
    graph.set_primitive_vertices(patches, indices)?;
    graph.add_primitive_to_geom(patches_geom, patches)?;

    let mesh = graph.add_geom_node("mesh");
    graph.add_geom_to_node(mesh, tris_geom, state)?;
    graph.add_geom_to_node(mesh, points_geom, empty_state)?;
    graph.add_geom_to_node(mesh, patches_geom, state)?;

    let far = graph.add_geom_node("far");
    graph.add_geom_to_node(far, points_geom, empty_state)?;

    /* nodes */

    let lod = graph.add_lod_node("lod", [0.0, 5.0, 0.0]);
    graph.add_lod_child(lod, mesh, 50.0, 0.0)?;
    graph.add_lod_child(lod, far, 500.0, 50.0)?;
    let moved = graph.add_transform(TransformState::Components(TransformComponents {
        pos: [1.0, 2.0, 3.0],
        hpr: [90.0, 0.0, 0.0],
        scale: [2.0; 3],
        shear: [0.0; 3],
    }));
    graph.set_transform(lod, moved)?;

    let weights = graph.add_pta_float32(vec![0.25, 0.75]);
    let effects = graph.add_render_effects(vec![weights])?;
    graph.set_effects(root, effects)?;
    graph.set_state(root, state)?;

    let model = graph.add_model_node("model");
    graph.add_child(root, model)?;
    graph.add_child_with_sort(model, lod, 5)?;

    let shared = graph.add_panda_node("shared");
    graph.add_child(root, shared)?;
    graph.add_child(model, shared)?;
    if let Some(node) = graph.get_mut(shared).and_then(BamObject::as_node_mut) {
        node.bounds_type = BoundsType::Best;
        node.draw_control_mask = 0x1;
        node.into_collide_mask = 0x10;
    }

    let hidden = graph.add_panda_node("hidden");
    graph.add_stashed(root, hidden)?;

    Ok(FullScene {
        graph,
        root,
        model,
        shared,
        lod,
        mesh,
    })
}

/// A texture attribute of two stages, the first with a sampler, as the only root.
pub fn texture_attrib_scene() -> Result<(SceneGraph, ObjectId)> {
    let mut graph = SceneGraph::new();
    let stage_0 = graph.add_texture_stage(TextureStage::new("s0"));
    let stage_1 = graph.add_texture_stage(TextureStage::new("s1"));
    let texture = graph.add_texture("t", "t.png");

    let mut tex_attrib = TextureAttrib::default();
    {
        let stage_node = tex_attrib.add_on_stage(stage_0, texture)?;
        stage_node.implicit_sort = 7;
        stage_node.override_priority = -3;
        stage_node.sampler = Some(SamplerState::default());
    }
    tex_attrib.add_on_stage(stage_1, texture)?;
    let tex = graph.add_attrib(tex_attrib)?;
    Ok((graph, tex))
}

/// An array format of two columns as the only root.
pub fn array_format_scene() -> Result<(SceneGraph, ObjectId)> {
    let mut graph = SceneGraph::new();
    let format = graph.add_array_format(16);
    graph.add_column(format, "vertex", 3, NumericType::Float32, Contents::Point, 0)?;
    graph.add_column(format, "color", 4, NumericType::Uint8, Contents::Color, 12)?;
    Ok((graph, format))
}

/// One node, with no children, as the only root.
pub fn lone_node_scene() -> (SceneGraph, ObjectId) {
    let mut graph = SceneGraph::new();
    let node = graph.add_panda_node("lone");
    if let Some(node) = graph.get_mut(node).and_then(BamObject::as_node_mut) {
        node.bounds_type = BoundsType::Fastest;
    }
    (graph, node)
}

/// One geom without primitives as the only root.
pub fn lone_geom_scene() -> Result<(SceneGraph, ObjectId)> {
    let mut graph = SceneGraph::new();
    let array_format = graph.add_array_format(12);
    graph.add_column(array_format, "vertex", 3, NumericType::Float32, Contents::Point, 0)?;
    let format = graph.add_vertex_format(vec![array_format])?;
    let array = graph.add_vertex_array(array_format, UsageHint::Static, vec![])?;
    let data = graph.add_vertex_data("empty", format, vec![array])?;
    let geom = graph.add_geom(data, PrimitiveType::Polygons)?;
    if let Some(BamObject::Geom(moi)) = graph.get_mut(geom) {
        moi.bounds_type = BoundsType::Box;
    }
    Ok((graph, geom))
}
