//! Havok collision objects, rigid bodies, shapes and constraints.
//!
//! Havok data appears in Bethesda files only. Vectors are stored padded to
//! four components and rotations as `x, y, z, w` quaternions, so both are
//! kept as [`Vector4`].

use nifheim_common::math::{Matrix4, Triangle, Vector3, Vector4};
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::link::{
    AvObject, BhkEntity, BhkSerializable, BhkShape, BhkWorldObject, RecordLink,
};
use crate::record::ReadRecord;
use crate::records::NiTriStripsData;
use crate::resolve::PostContext;
use crate::version::beth;
use crate::{DecodeResult, NifStream};

/// Collision layer and group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct HavokFilter {
    pub layer: u8,
    pub flags: u8,
    pub group: u16,
}

fn read_material(nif: &mut NifStream<'_>) -> DecodeResult<u32> {
    if nif.until(10, 0, 1, 2) {
        nif.skip(4)?;
    }
    nif.read_u32()
}

fn read_filters(nif: &mut NifStream<'_>) -> DecodeResult<Vec<HavokFilter>> {
    let count = nif.read_u32()? as usize;
    nif.read_array(count)
}

/// A Havok array property: data pointer, size and capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct CInfoProperty {
    pub data: u32,
    pub size: u32,
    pub capacity_and_flags: u32,
}

/// Links a scene graph object to its physics representation.
#[derive(Debug, Clone, Default)]
pub struct NiCollisionObject {
    pub target: RecordLink<AvObject>,
}

impl ReadRecord for NiCollisionObject {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.target = nif.read_link()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.target)?;
        Ok(())
    }
}

/// A collision object backed by a Havok body.
#[derive(Debug, Clone, Default)]
pub struct BhkCollisionObject {
    pub base: NiCollisionObject,
    pub flags: u16,
    pub body: RecordLink<BhkWorldObject>,
}

/// Phantom and simple-phantom collision objects decode identically.
pub type BhkPCollisionObject = BhkCollisionObject;
pub type BhkSPCollisionObject = BhkCollisionObject;

impl_as_ref!(BhkCollisionObject { NiCollisionObject => base; });

impl ReadRecord for BhkCollisionObject {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.flags = nif.read_u16()?;
        self.body = nif.read_link()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.body)?;
        Ok(())
    }
}

/// Shape, filter and broadphase settings of anything placed in the physics world.
#[derive(Debug, Clone, Default)]
pub struct HavokWorldObject {
    pub shape: RecordLink<BhkShape>,
    pub filter: HavokFilter,
    pub phase_type: u8,
    pub property: CInfoProperty,
}

impl ReadRecord for HavokWorldObject {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.shape = nif.read_link()?;
        if nif.until(10, 0, 1, 2) {
            nif.skip(4)?;
        }
        self.filter = nif.read()?;
        nif.skip(4)?;
        self.phase_type = nif.read_u8()?;
        nif.skip(3)?;
        self.property = nif.read()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.shape)?;
        Ok(())
    }
}

/// A world object that takes part in collision response.
#[derive(Debug, Clone, Default)]
pub struct HavokEntity {
    pub base: HavokWorldObject,
    pub response_type: u8,
    pub process_contact_delay: u16,
}

impl_as_ref!(HavokEntity { HavokWorldObject => base; });

impl ReadRecord for HavokEntity {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.response_type = nif.read_u8()?;
        nif.skip(1)?;
        self.process_contact_delay = nif.read_u16()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// Construction parameters of a rigid body.
#[derive(Debug, Clone, Default)]
pub struct RigidBodyInfo {
    pub filter: HavokFilter,
    pub response_type: u8,
    pub process_contact_delay: u16,
    pub translation: Vector4,
    pub rotation: Vector4,
    pub linear_velocity: Vector4,
    pub angular_velocity: Vector4,
    /// Rows of the inertia tensor, each padded to four floats.
    pub inertia_tensor: [Vector4; 3],
    pub center: Vector4,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub time_factor: f32,
    pub gravity_factor: f32,
    pub friction: f32,
    pub rolling_friction_multiplier: f32,
    pub restitution: f32,
    pub max_linear_velocity: f32,
    pub max_angular_velocity: f32,
    pub penetration_depth: f32,
    pub motion_type: u8,
    pub deactivator_type: u8,
    pub enable_deactivation: bool,
    pub solver_deactivation: u8,
    pub quality_type: u8,
    pub auto_remove_level: u8,
    pub response_modifier_flags: u8,
    pub contact_point_shape_keys: u8,
    pub force_collided_onto_ppu: bool,
}

impl RigidBodyInfo {
    fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        let mut info = Self::default();
        let skyrim = nif.beth_version() >= beth::SKY;
        let fallout4 = nif.beth_version() == beth::FO4;
        if nif.since(10, 1, 0, 0) {
            nif.skip(4)?;
            info.filter = nif.read()?;
            if skyrim {
                nif.skip(4)?;
                info.response_type = nif.read_u8()?;
                nif.skip(1)?;
                info.process_contact_delay = nif.read_u16()?;
                nif.skip(4)?;
            } else {
                nif.skip(16)?;
            }
        }
        info.translation = nif.read()?;
        info.rotation = nif.read()?;
        info.linear_velocity = nif.read()?;
        info.angular_velocity = nif.read()?;
        info.inertia_tensor = nif.read()?;
        info.center = nif.read()?;
        info.mass = nif.read_f32()?;
        info.linear_damping = nif.read_f32()?;
        info.angular_damping = nif.read_f32()?;
        if skyrim {
            if !fallout4 {
                info.time_factor = nif.read_f32()?;
            }
            info.gravity_factor = nif.read_f32()?;
        }
        info.friction = nif.read_f32()?;
        if skyrim {
            info.rolling_friction_multiplier = nif.read_f32()?;
        }
        info.restitution = nif.read_f32()?;
        if nif.since(10, 1, 0, 0) {
            info.max_linear_velocity = nif.read_f32()?;
            info.max_angular_velocity = nif.read_f32()?;
            if !fallout4 {
                info.penetration_depth = nif.read_f32()?;
            }
        }
        info.motion_type = nif.read_u8()?;
        if skyrim {
            info.enable_deactivation = nif.read_byte_bool()?;
        } else {
            info.deactivator_type = nif.read_u8()?;
        }
        info.solver_deactivation = nif.read_u8()?;
        if fallout4 {
            nif.skip(1)?;
            info.penetration_depth = nif.read_f32()?;
            info.time_factor = nif.read_f32()?;
            nif.skip(4)?;
            info.response_type = nif.read_u8()?;
            nif.skip(1)?;
            info.process_contact_delay = nif.read_u16()?;
        }
        info.quality_type = nif.read_u8()?;
        if skyrim {
            info.auto_remove_level = nif.read_u8()?;
            info.response_modifier_flags = nif.read_u8()?;
            info.contact_point_shape_keys = nif.read_u8()?;
            info.force_collided_onto_ppu = nif.read_byte_bool()?;
        }
        nif.skip(if fallout4 { 3 } else { 12 })?;
        Ok(info)
    }
}

/// A dynamic or static rigid body.
#[derive(Debug, Clone, Default)]
pub struct BhkRigidBody {
    pub base: HavokEntity,
    pub info: RigidBodyInfo,
    pub constraints: Vec<RecordLink<BhkSerializable>>,
    pub body_flags: u32,
}

/// The transformed variant stores the same data.
pub type BhkRigidBodyT = BhkRigidBody;

impl_as_ref!(BhkRigidBody {
    HavokEntity => base;
    HavokWorldObject => base.base;
});

impl ReadRecord for BhkRigidBody {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.info = RigidBodyInfo::read(nif)?;
        self.constraints = nif.read_link_list()?;
        self.body_flags = if nif.beth_version() < 76 {
            nif.read_u32()?
        } else {
            u32::from(nif.read_u16()?)
        };
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.links(&self.constraints)?;
        Ok(())
    }
}

/// A shape placed in the world without collision response.
#[derive(Debug, Clone, Default)]
pub struct BhkSimpleShapePhantom {
    pub base: HavokWorldObject,
    pub transform: Matrix4,
}

impl_as_ref!(BhkSimpleShapePhantom { HavokWorldObject => base; });

impl ReadRecord for BhkSimpleShapePhantom {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        nif.skip(8)?;
        self.transform = nif.read()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// A convex shape with a material and a convex radius.
#[derive(Debug, Clone, Default)]
pub struct BhkConvexShape {
    pub material: u32,
    pub radius: f32,
}

/// Spheres are fully described by the convex radius.
pub type BhkSphereShape = BhkConvexShape;

impl ReadRecord for BhkConvexShape {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.material = read_material(nif)?;
        self.radius = nif.read_f32()?;
        Ok(())
    }
}

/// An axis-aligned box around the origin.
#[derive(Debug, Clone, Default)]
pub struct BhkBoxShape {
    pub base: BhkConvexShape,
    pub extents: Vector3,
}

impl_as_ref!(BhkBoxShape { BhkConvexShape => base; });

impl ReadRecord for BhkBoxShape {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        nif.skip(8)?;
        self.extents = nif.read()?;
        nif.skip(4)?;
        Ok(())
    }
}

/// A capsule between two points.
#[derive(Debug, Clone, Default)]
pub struct BhkCapsuleShape {
    pub base: BhkConvexShape,
    pub point1: Vector3,
    pub radius1: f32,
    pub point2: Vector3,
    pub radius2: f32,
}

impl_as_ref!(BhkCapsuleShape { BhkConvexShape => base; });

impl ReadRecord for BhkCapsuleShape {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        nif.skip(8)?;
        self.point1 = nif.read()?;
        self.radius1 = nif.read_f32()?;
        self.point2 = nif.read()?;
        self.radius2 = nif.read_f32()?;
        Ok(())
    }
}

/// A convex hull given by its vertices and face planes.
#[derive(Debug, Clone, Default)]
pub struct BhkConvexVerticesShape {
    pub base: BhkConvexShape,
    pub vertices_property: CInfoProperty,
    pub normals_property: CInfoProperty,
    pub vertices: Vec<Vector4>,
    pub normals: Vec<Vector4>,
}

impl_as_ref!(BhkConvexVerticesShape { BhkConvexShape => base; });

impl ReadRecord for BhkConvexVerticesShape {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.vertices_property = nif.read()?;
        self.normals_property = nif.read()?;
        let count = nif.read_u32()? as usize;
        self.vertices = nif.read_array(count)?;
        let count = nif.read_u32()? as usize;
        self.normals = nif.read_array(count)?;
        Ok(())
    }
}

/// A convex shape under a transform.
#[derive(Debug, Clone, Default)]
pub struct BhkConvexTransformShape {
    pub shape: RecordLink<BhkShape>,
    pub material: u32,
    pub radius: f32,
    pub transform: Matrix4,
}

/// Non-convex transform shapes decode identically.
pub type BhkTransformShape = BhkConvexTransformShape;

impl ReadRecord for BhkConvexTransformShape {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.shape = nif.read_link()?;
        self.material = read_material(nif)?;
        self.radius = nif.read_f32()?;
        nif.skip(8)?;
        self.transform = nif.read()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.shape)?;
        Ok(())
    }
}

/// A list of child shapes.
#[derive(Debug, Clone, Default)]
pub struct BhkListShape {
    pub shapes: Vec<RecordLink<BhkShape>>,
    pub material: u32,
    pub child_shape_property: CInfoProperty,
    pub child_filter_property: CInfoProperty,
    pub filters: Vec<HavokFilter>,
}

impl ReadRecord for BhkListShape {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.shapes = nif.read_link_list()?;
        self.material = read_material(nif)?;
        self.child_shape_property = nif.read()?;
        self.child_filter_property = nif.read()?;
        self.filters = read_filters(nif)?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.links(&self.shapes)?;
        Ok(())
    }
}

/// Precomputed collision acceleration data.
#[derive(Debug, Clone, Default)]
pub struct MoppCode {
    pub offset: Vector4,
    pub build_type: u8,
    pub data: Vec<u8>,
}

/// A shape wrapped in a MOPP bounding volume tree.
#[derive(Debug, Clone, Default)]
pub struct BhkMoppBvTreeShape {
    pub shape: RecordLink<BhkShape>,
    pub scale: f32,
    pub mopp: MoppCode,
}

impl ReadRecord for BhkMoppBvTreeShape {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.shape = nif.read_link()?;
        nif.skip(12)?;
        self.scale = nif.read_f32()?;
        let size = nif.read_u32()? as usize;
        if nif.since(10, 1, 0, 0) {
            self.mopp.offset = nif.read()?;
        }
        if nif.beth_version() > beth::FO3 {
            self.mopp.build_type = nif.read_u8()?;
        }
        self.mopp.data = nif.read_bytes(size)?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.shape)?;
        Ok(())
    }
}

/// Collision built from triangle strip data.
#[derive(Debug, Clone, Default)]
pub struct BhkNiTriStripsShape {
    pub material: u32,
    pub radius: f32,
    pub grow_by: u32,
    pub scale: Vector4,
    pub data: Vec<RecordLink<NiTriStripsData>>,
    pub filters: Vec<HavokFilter>,
}

impl ReadRecord for BhkNiTriStripsShape {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.material = read_material(nif)?;
        self.radius = nif.read_f32()?;
        nif.skip(20)?;
        self.grow_by = nif.read_u32()?;
        self.scale = Vector4 {
            x: 1.0,
            y: 1.0,
            z: 1.0,
            w: 0.0,
        };
        if nif.since(10, 1, 0, 0) {
            self.scale = nif.read()?;
        }
        self.data = nif.read_link_list()?;
        self.filters = read_filters(nif)?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.links(&self.data)?;
        Ok(())
    }
}

/// A run of vertices sharing one filter and material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubPart {
    pub filter: HavokFilter,
    pub vertex_count: u32,
    pub material: u32,
}

impl SubPart {
    fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        Ok(Self {
            filter: nif.read()?,
            vertex_count: nif.read_u32()?,
            material: read_material(nif)?,
        })
    }
}

fn read_sub_parts(nif: &mut NifStream<'_>) -> DecodeResult<Vec<SubPart>> {
    let count = nif.read_u16()?;
    let mut parts = Vec::new();
    for _ in 0..count {
        parts.push(SubPart::read(nif)?);
    }
    Ok(parts)
}

/// Collision built from packed triangle data.
#[derive(Debug, Clone, Default)]
pub struct BhkPackedNiTriStripsShape {
    pub sub_parts: Vec<SubPart>,
    pub user_data: u32,
    pub radius: f32,
    pub scale: Vector4,
    pub data: RecordLink<HkPackedNiTriStripsData>,
}

impl ReadRecord for BhkPackedNiTriStripsShape {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        if nif.until(20, 0, 0, 5) {
            self.sub_parts = read_sub_parts(nif)?;
        }
        self.user_data = nif.read_u32()?;
        nif.skip(4)?;
        self.radius = nif.read_f32()?;
        nif.skip(4)?;
        self.scale = nif.read()?;
        nif.skip(20)?;
        self.data = nif.read_link()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.data)?;
        Ok(())
    }
}

/// One packed collision triangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PackedTriangle {
    pub triangle: Triangle,
    pub welding_info: u16,
    pub normal: Vector3,
}

/// Triangles and vertices for packed collision shapes.
#[derive(Debug, Clone, Default)]
pub struct HkPackedNiTriStripsData {
    pub triangles: Vec<PackedTriangle>,
    pub compressed: bool,
    pub vertices: Vec<Vector3>,
    pub sub_parts: Vec<SubPart>,
}

impl ReadRecord for HkPackedNiTriStripsData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        let count = nif.read_u32()?;
        for _ in 0..count {
            let mut triangle = PackedTriangle {
                triangle: nif.read()?,
                welding_info: nif.read_u16()?,
                ..PackedTriangle::default()
            };
            if nif.until(20, 0, 0, 5) {
                triangle.normal = nif.read()?;
            }
            self.triangles.push(triangle);
        }
        let vertex_count = nif.read_u32()? as usize;
        if nif.since(20, 2, 0, 7) {
            self.compressed = nif.read_byte_bool()?;
        }
        if self.compressed {
            // Half-float vertices are not decoded.
            nif.skip(vertex_count.saturating_mul(6))?;
        } else {
            self.vertices = nif.read_array(vertex_count)?;
        }
        if nif.since(20, 2, 0, 7) {
            self.sub_parts = read_sub_parts(nif)?;
        }
        Ok(())
    }
}

/// Collision for large static meshes, compressed into chunks.
#[derive(Debug, Clone, Default)]
pub struct BhkCompressedMeshShape {
    pub target: RecordLink<AvObject>,
    pub user_data: u32,
    pub radius: f32,
    pub scale: Vector4,
    pub data: RecordLink<BhkCompressedMeshShapeData>,
}

impl ReadRecord for BhkCompressedMeshShape {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.target = nif.read_link()?;
        self.user_data = nif.read_u32()?;
        self.radius = nif.read_f32()?;
        nif.skip(4)?;
        self.scale = nif.read()?;
        // Copies of the radius and scale.
        nif.skip(4)?;
        nif.skip(16)?;
        self.data = nif.read_link()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.target)?;
        ctx.link(&self.data)?;
        Ok(())
    }
}

/// Material and filter of a compressed mesh chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct MeshMaterial {
    pub material: u32,
    pub filter: HavokFilter,
}

/// Translation and rotation of a compressed mesh chunk.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct QsTransform {
    pub translation: Vector4,
    pub rotation: Vector4,
}

/// A triangle too large to be stored in a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct BigTriangle {
    pub triangle: Triangle,
    pub material: u32,
    pub welding_info: u16,
}

/// A block of quantized geometry.
#[derive(Debug, Clone, Default)]
pub struct MeshChunk {
    pub translation: Vector4,
    pub material_index: u32,
    pub reference: u16,
    pub transform_index: u16,
    pub vertices: Vec<u16>,
    pub indices: Vec<u16>,
    pub strips: Vec<u16>,
    pub welding_info: Vec<u16>,
}

impl MeshChunk {
    fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        let mut chunk = Self {
            translation: nif.read()?,
            material_index: nif.read_u32()?,
            reference: nif.read_u16()?,
            transform_index: nif.read_u16()?,
            ..Self::default()
        };
        for list in [
            &mut chunk.vertices,
            &mut chunk.indices,
            &mut chunk.strips,
            &mut chunk.welding_info,
        ] {
            let count = nif.read_u32()? as usize;
            *list = nif.read_array(count)?;
        }
        Ok(chunk)
    }
}

fn skip_u32_array(nif: &mut NifStream<'_>) -> DecodeResult<()> {
    let count = nif.read_u32()? as usize;
    nif.skip(count.saturating_mul(4))
}

/// Compressed mesh payload.
#[derive(Debug, Clone, Default)]
pub struct BhkCompressedMeshShapeData {
    pub bits_per_index: u32,
    pub bits_per_w_index: u32,
    pub mask_w_index: u32,
    pub mask_index: u32,
    pub error: f32,
    pub aabb_min: Vector4,
    pub aabb_max: Vector4,
    pub welding_type: u8,
    pub material_type: u8,
    pub materials: Vec<MeshMaterial>,
    pub chunk_transforms: Vec<QsTransform>,
    pub big_vertices: Vec<Vector4>,
    pub big_triangles: Vec<BigTriangle>,
    pub chunks: Vec<MeshChunk>,
}

impl ReadRecord for BhkCompressedMeshShapeData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.bits_per_index = nif.read_u32()?;
        self.bits_per_w_index = nif.read_u32()?;
        self.mask_w_index = nif.read_u32()?;
        self.mask_index = nif.read_u32()?;
        self.error = nif.read_f32()?;
        self.aabb_min = nif.read()?;
        self.aabb_max = nif.read()?;
        self.welding_type = nif.read_u8()?;
        self.material_type = nif.read_u8()?;
        for _ in 0..3 {
            skip_u32_array(nif)?;
        }
        let count = nif.read_u32()? as usize;
        self.materials = nif.read_array(count)?;
        // Named materials.
        skip_u32_array(nif)?;
        let count = nif.read_u32()? as usize;
        self.chunk_transforms = nif.read_array(count)?;
        let count = nif.read_u32()? as usize;
        self.big_vertices = nif.read_array(count)?;
        let count = nif.read_u32()? as usize;
        self.big_triangles = nif.read_array(count)?;
        let count = nif.read_u32()?;
        for _ in 0..count {
            self.chunks.push(MeshChunk::read(nif)?);
        }
        skip_u32_array(nif)?;
        Ok(())
    }
}

/// The two bodies a constraint joins.
#[derive(Debug, Clone, Default)]
pub struct ConstraintInfo {
    pub entity_a: RecordLink<BhkEntity>,
    pub entity_b: RecordLink<BhkEntity>,
    pub priority: u32,
}

impl ReadRecord for ConstraintInfo {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        // Entity count, always two.
        nif.skip(4)?;
        self.entity_a = nif.read_link()?;
        self.entity_b = nif.read_link()?;
        self.priority = nif.read_u32()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.entity_a)?;
        ctx.link(&self.entity_b)?;
        Ok(())
    }
}

/// A motor driving a constraint towards a target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ConstraintMotor {
    #[default]
    None,
    Position {
        min_force: f32,
        max_force: f32,
        tau: f32,
        damping: f32,
        proportional_recovery_velocity: f32,
        constant_recovery_velocity: f32,
        enabled: bool,
    },
    Velocity {
        min_force: f32,
        max_force: f32,
        tau: f32,
        target_velocity: f32,
        use_velocity_target: bool,
        enabled: bool,
    },
    SpringDamper {
        min_force: f32,
        max_force: f32,
        spring_constant: f32,
        spring_damping: f32,
        enabled: bool,
    },
}

impl ConstraintMotor {
    fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        Ok(match nif.read_u8()? {
            0 => Self::None,
            1 => Self::Position {
                min_force: nif.read_f32()?,
                max_force: nif.read_f32()?,
                tau: nif.read_f32()?,
                damping: nif.read_f32()?,
                proportional_recovery_velocity: nif.read_f32()?,
                constant_recovery_velocity: nif.read_f32()?,
                enabled: nif.read_byte_bool()?,
            },
            2 => Self::Velocity {
                min_force: nif.read_f32()?,
                max_force: nif.read_f32()?,
                tau: nif.read_f32()?,
                target_velocity: nif.read_f32()?,
                use_velocity_target: nif.read_byte_bool()?,
                enabled: nif.read_byte_bool()?,
            },
            3 => Self::SpringDamper {
                min_force: nif.read_f32()?,
                max_force: nif.read_f32()?,
                spring_constant: nif.read_f32()?,
                spring_damping: nif.read_f32()?,
                enabled: nif.read_byte_bool()?,
            },
            other => return Err(nif.invalid(format!("unknown constraint motor type {}", other))),
        })
    }
}

/// Pivots and axes of a hinge, in the frames of both bodies.
#[derive(Debug, Clone, Default)]
pub struct HingeFrame {
    pub pivot_a: Vector4,
    pub axis_a: Vector4,
    pub perp_axis_a1: Vector4,
    pub perp_axis_a2: Vector4,
    pub pivot_b: Vector4,
    pub axis_b: Vector4,
    pub perp_axis_b1: Vector4,
    pub perp_axis_b2: Vector4,
}

impl HingeFrame {
    fn read(nif: &mut NifStream<'_>, limited: bool) -> DecodeResult<Self> {
        let mut frame = Self::default();
        if nif.until(20, 0, 0, 5) {
            frame.pivot_a = nif.read()?;
            if limited {
                frame.axis_a = nif.read()?;
            }
            frame.perp_axis_a1 = nif.read()?;
            frame.perp_axis_a2 = nif.read()?;
            frame.pivot_b = nif.read()?;
            frame.axis_b = nif.read()?;
            if limited {
                frame.perp_axis_b2 = nif.read()?;
            }
        } else {
            frame.axis_a = nif.read()?;
            frame.perp_axis_a1 = nif.read()?;
            frame.perp_axis_a2 = nif.read()?;
            frame.pivot_a = nif.read()?;
            frame.axis_b = nif.read()?;
            frame.perp_axis_b1 = nif.read()?;
            frame.perp_axis_b2 = nif.read()?;
            frame.pivot_b = nif.read()?;
        }
        Ok(frame)
    }
}

/// A free hinge.
#[derive(Debug, Clone, Default)]
pub struct BhkHingeConstraint {
    pub info: ConstraintInfo,
    pub frame: HingeFrame,
}

impl ReadRecord for BhkHingeConstraint {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.info.read(nif)?;
        self.frame = HingeFrame::read(nif, false)?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.info.post(ctx)
    }
}

/// A hinge with angle limits.
#[derive(Debug, Clone, Default)]
pub struct BhkLimitedHingeConstraint {
    pub info: ConstraintInfo,
    pub frame: HingeFrame,
    pub min_angle: f32,
    pub max_angle: f32,
    pub max_friction: f32,
    pub motor: ConstraintMotor,
}

impl ReadRecord for BhkLimitedHingeConstraint {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.info.read(nif)?;
        self.frame = HingeFrame::read(nif, true)?;
        self.min_angle = nif.read_f32()?;
        self.max_angle = nif.read_f32()?;
        self.max_friction = nif.read_f32()?;
        if nif.since(20, 2, 0, 7) {
            self.motor = ConstraintMotor::read(nif)?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.info.post(ctx)
    }
}

/// A ball-and-socket joint with cone and twist limits.
#[derive(Debug, Clone, Default)]
pub struct BhkRagdollConstraint {
    pub info: ConstraintInfo,
    pub pivot_a: Vector4,
    pub plane_a: Vector4,
    pub twist_a: Vector4,
    pub motor_a: Vector4,
    pub pivot_b: Vector4,
    pub plane_b: Vector4,
    pub twist_b: Vector4,
    pub motor_b: Vector4,
    pub cone_max_angle: f32,
    pub plane_min_angle: f32,
    pub plane_max_angle: f32,
    pub twist_min_angle: f32,
    pub twist_max_angle: f32,
    pub max_friction: f32,
    pub motor: ConstraintMotor,
}

impl ReadRecord for BhkRagdollConstraint {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.info.read(nif)?;
        if nif.until(20, 0, 0, 5) {
            self.pivot_a = nif.read()?;
            self.plane_a = nif.read()?;
            self.twist_a = nif.read()?;
            self.pivot_b = nif.read()?;
            self.plane_b = nif.read()?;
            self.twist_b = nif.read()?;
        } else {
            self.twist_a = nif.read()?;
            self.plane_a = nif.read()?;
            self.motor_a = nif.read()?;
            self.pivot_a = nif.read()?;
            self.twist_b = nif.read()?;
            self.plane_b = nif.read()?;
            self.motor_b = nif.read()?;
            self.pivot_b = nif.read()?;
        }
        self.cone_max_angle = nif.read_f32()?;
        self.plane_min_angle = nif.read_f32()?;
        self.plane_max_angle = nif.read_f32()?;
        self.twist_min_angle = nif.read_f32()?;
        self.twist_max_angle = nif.read_f32()?;
        self.max_friction = nif.read_f32()?;
        if nif.since(20, 2, 0, 7) {
            self.motor = ConstraintMotor::read(nif)?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.info.post(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stream_with, ByteWriter};
    use crate::NifVersion;

    #[test]
    fn test_collision_object() {
        let bytes = ByteWriter::new().i32(0).u16(1).i32(2).finish();
        let mut source = &bytes[..];
        let mut nif = stream_with(&mut source, NifVersion::BETHESDA, 12, beth::SKY, Vec::new());
        let mut object = BhkCollisionObject::default();
        object.read(&mut nif).unwrap();
        assert_eq!(object.base.target.get(), Some(0));
        assert_eq!(object.body.get(), Some(2));
    }

    #[test]
    fn test_box_shape() {
        let bytes = ByteWriter::new()
            .u32(7)
            .f32(0.05)
            .u32(0)
            .u32(0)
            .f32(1.0)
            .f32(2.0)
            .f32(3.0)
            .f32(0.0)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream_with(&mut source, NifVersion::OBLIVION, 11, 11, Vec::new());
        let mut shape = BhkBoxShape::default();
        shape.read(&mut nif).unwrap();
        assert_eq!(shape.base.material, 7);
        assert_eq!(shape.extents, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(nif.position(), bytes.len() as u64);
    }

    #[test]
    fn test_unknown_motor_is_rejected() {
        let bytes = ByteWriter::new().u8(9).finish();
        let mut source = &bytes[..];
        let mut nif = stream_with(&mut source, NifVersion::BETHESDA, 12, beth::SKY, Vec::new());
        assert!(ConstraintMotor::read(&mut nif).is_err());
    }
}
