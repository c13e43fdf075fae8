//! The schema: every concrete type that can appear in a bam stream.
//!
//! Each type writes its body in a fixed field order. Fields introduced after
//! [`bam_types::version::BamVersion::MIN_SUPPORTED`] are written and read only when the session
//! version enables their [`bam_types::version::Feature`].

mod attribs;
pub mod enums;
mod geom;
mod geom_node;
mod internal_name;
mod lod_node;
mod model_node;
mod node;
mod primitive;
mod pta;
mod render_state;
mod texture;
mod vertex_data;
mod vertex_format;

pub use attribs::*;
pub use enums::*;
pub use geom::*;
pub use geom_node::*;
pub use internal_name::*;
pub use lod_node::*;
pub use model_node::*;
pub use node::*;
pub use primitive::*;
pub use pta::*;
pub use render_state::*;
pub use texture::*;
pub use vertex_data::GeomVertexArrayData;
pub use vertex_data::GeomVertexData;
pub use vertex_format::*;

pub(crate) use vertex_data::array_format;

use crate::registry::TypeRegistryBuilder;
use crate::type_tag::TypeTag;

/// Registers every schema type under its tag.
pub fn register_all(builder: TypeRegistryBuilder) -> TypeRegistryBuilder {
    let mut builder = builder
        .register::<PandaNode>(TypeTag::PandaNode)
        .register::<ModelNode>(TypeTag::ModelNode)
        .register::<ModelRoot>(TypeTag::ModelRoot)
        .register::<LodNode>(TypeTag::LodNode)
        .register::<GeomNode>(TypeTag::GeomNode)
        .register::<RenderState>(TypeTag::RenderState)
        .register::<TransformState>(TypeTag::TransformState)
        .register::<RenderEffects>(TypeTag::RenderEffects)
        .register::<TransparencyAttrib>(TypeTag::TransparencyAttrib)
        .register::<TextureAttrib>(TypeTag::TextureAttrib)
        .register::<TextureStage>(TypeTag::TextureStage)
        .register::<Texture>(TypeTag::Texture)
        .register::<InternalName>(TypeTag::InternalName)
        .register::<GeomVertexArrayFormat>(TypeTag::GeomVertexArrayFormat)
        .register::<GeomVertexFormat>(TypeTag::GeomVertexFormat)
        .register::<GeomVertexArrayData>(TypeTag::GeomVertexArrayData)
        .register::<GeomVertexData>(TypeTag::GeomVertexData)
        .register::<Geom>(TypeTag::Geom)
        .register::<GeomPatches>(TypeTag::GeomPatches)
        .register::<PtaInt32>(TypeTag::PtaInt32)
        .register::<PtaFloat32>(TypeTag::PtaFloat32);
    for kind in PrimitiveKind::ALL {
        builder = builder.register::<GeomPrimitive>(kind.type_tag());
    }
    builder
}
