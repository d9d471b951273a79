//! The record model: kinds, decoded data, and the per-record read/post hooks.

use std::fmt;

use crate::link::LinkTarget;
use crate::records::*;
use crate::resolve::PostContext;
use crate::{DecodeResult, NifStream};

/// Decoding hooks implemented by every record struct and by the shared
/// base structs they embed.
pub trait ReadRecord {
    /// Read this record's body from the stream.
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()>;

    /// Validate links and publish cross-record facts once all records exist.
    fn post(&self, _ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        Ok(())
    }
}

/// Typed access to a concrete record struct inside [`RecordData`].
pub trait RecordCast: Sized {
    /// Borrow the struct if `data` holds one.
    fn cast(data: &RecordData) -> Option<&Self>;
}

macro_rules! kind_name {
    ($variant:ident) => {
        stringify!($variant)
    };
    ($variant:ident, $name:literal) => {
        $name
    };
}

macro_rules! record_kinds {
    ($($variant:ident $(= $name:literal)?,)*) => {
        /// Closed set of record kinds.
        ///
        /// Several type names can share one kind; aliases resolve to the kind
        /// of the struct they decode into.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RecordKind {
            $($variant,)*
        }

        impl RecordKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [RecordKind] = &[$(RecordKind::$variant,)*];

            /// The canonical type name for this kind.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => kind_name!($variant $(, $name)?),)*
                }
            }
        }
    };
}

record_kinds! {
    NiNode,
    AvoidNode,
    NiBillboardNode,
    NiBSAnimationNode,
    NiBSParticleNode,
    NiCollisionSwitch,
    NiSortAdjustNode,
    RootCollisionNode,
    NiSwitchNode,
    NiFltAnimationNode,
    NiLODNode,
    NiSequenceStreamHelper,
    NiSequence,
    NiControllerSequence,
    NiCamera,
    NiAlphaAccumulator,
    NiClusterAccumulator,
    NiAlphaController,
    NiBSPArrayController,
    NiFlipController,
    NiGeomMorpherController,
    NiKeyframeController,
    NiLookAtController,
    NiMaterialColorController,
    NiParticleSystemController,
    NiPathController,
    NiRollController,
    NiUVController,
    NiVisController,
    NiControllerManager,
    NiTextureTransformController,
    NiMultiTargetTransformController,
    BSMaterialEmittanceMultController,
    BSRefractionFirePeriodController,
    BSRefractionStrengthController,
    BSEffectShaderPropertyColorController,
    BSEffectShaderPropertyFloatController,
    BSLightingShaderPropertyColorController,
    BSLightingShaderPropertyFloatController,
    BhkBlendController = "bhkBlendController",
    NiBlendBoolInterpolator,
    NiBlendFloatInterpolator,
    NiBlendPoint3Interpolator,
    NiBlendTransformInterpolator,
    NiBoolInterpolator,
    NiBoolTimelineInterpolator,
    NiColorInterpolator,
    NiFloatInterpolator,
    NiPoint3Interpolator,
    NiTransformInterpolator,
    NiColorData,
    NiFloatData,
    NiKeyframeData,
    NiMorphData,
    NiPalette,
    NiPixelData,
    NiPosData,
    NiSourceTexture,
    NiUVData,
    NiVisData,
    NiBoolData,
    NiDefaultAVObjectPalette,
    BSShaderTextureSet,
    NiLight,
    NiTextureEffect,
    NiExtraData,
    NiStringExtraData,
    NiTextKeyExtraData,
    NiVertWeightsExtraData,
    NiBinaryExtraData,
    NiBooleanExtraData,
    NiColorExtraData,
    NiFloatExtraData,
    NiFloatsExtraData,
    NiIntegerExtraData,
    NiIntegersExtraData,
    NiVectorExtraData,
    NiStringPalette,
    BSBound,
    BSMultiBound,
    BSMultiBoundOBB,
    BSMultiBoundSphere,
    BSFurnitureMarker,
    BSInvMarker,
    BSBehaviorGraphExtraData,
    BSXFlags,
    NiParticles,
    NiParticlesData,
    NiLines,
    NiLinesData,
    NiSkinData,
    NiSkinInstance,
    NiSkinPartition,
    NiTriShape,
    NiTriShapeData,
    NiTriStrips,
    NiTriStripsData,
    BSDismemberSkinInstance,
    BSTriShape,
    BSLODTriShape,
    NiGravity,
    NiParticleColorModifier,
    NiParticleGrowFade,
    NiParticleRotation,
    NiPlanarCollider,
    NiSphericalCollider,
    NiCollisionObject,
    BhkCollisionObject = "bhkCollisionObject",
    BhkHingeConstraint = "bhkHingeConstraint",
    BhkLimitedHingeConstraint = "bhkLimitedHingeConstraint",
    BhkRagdollConstraint = "bhkRagdollConstraint",
    BhkRigidBody = "bhkRigidBody",
    BhkRigidBodyT = "bhkRigidBodyT",
    BhkBoxShape = "bhkBoxShape",
    BhkCapsuleShape = "bhkCapsuleShape",
    BhkCompressedMeshShape = "bhkCompressedMeshShape",
    BhkCompressedMeshShapeData = "bhkCompressedMeshShapeData",
    BhkConvexTransformShape = "bhkConvexTransformShape",
    BhkConvexVerticesShape = "bhkConvexVerticesShape",
    BhkListShape = "bhkListShape",
    BhkMoppBvTreeShape = "bhkMoppBvTreeShape",
    BhkNiTriStripsShape = "bhkNiTriStripsShape",
    BhkPackedNiTriStripsShape = "bhkPackedNiTriStripsShape",
    HkPackedNiTriStripsData = "hkPackedNiTriStripsData",
    BhkSimpleShapePhantom = "bhkSimpleShapePhantom",
    BhkSphereShape = "bhkSphereShape",
    NiAlphaProperty,
    NiDitherProperty,
    NiFogProperty,
    NiMaterialProperty,
    NiShadeProperty,
    NiSpecularProperty,
    NiStencilProperty,
    NiTexturingProperty,
    NiVertexColorProperty,
    NiWireframeProperty,
    NiZBufferProperty,
    BSShaderProperty,
    BSShaderPPLightingProperty,
    BSShaderNoLightingProperty,
    BSLightingShaderProperty,
    BSEffectShaderProperty,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! record_data {
    ($($name:ident,)*) => {
        /// Decoded contents of a record, one variant per record struct.
        #[derive(Debug, Clone)]
        #[allow(clippy::large_enum_variant)]
        pub enum RecordData {
            $($name($name),)*
        }

        impl RecordData {
            pub(crate) fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
                match self {
                    $(Self::$name(record) => record.read(nif),)*
                }
            }

            pub(crate) fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
                match self {
                    $(Self::$name(record) => record.post(ctx),)*
                }
            }

            /// Name of the struct holding the data.
            pub fn struct_name(&self) -> &'static str {
                match self {
                    $(Self::$name(_) => stringify!($name),)*
                }
            }
        }

        $(
            impl From<$name> for RecordData {
                fn from(record: $name) -> Self {
                    Self::$name(record)
                }
            }

            impl RecordCast for $name {
                fn cast(data: &RecordData) -> Option<&Self> {
                    match data {
                        RecordData::$name(record) => Some(record),
                        _ => None,
                    }
                }
            }

            impl LinkTarget for $name {
                const NAME: &'static str = stringify!($name);

                fn accepts(data: &RecordData) -> bool {
                    matches!(data, RecordData::$name(_))
                }
            }
        )*
    };
}

record_data! {
    // Nodes
    NiNode,
    NiBillboardNode,
    NiSortAdjustNode,
    BSRangeNode,
    BSMultiBoundNode,
    BSOrderedNode,
    BSTreeNode,
    BSValueNode,
    NiSwitchNode,
    NiFltAnimationNode,
    NiLODNode,
    NiSequenceStreamHelper,
    NiCamera,
    NiAccumulator,
    // Controllers
    NiSingleInterpController,
    NiFloatInterpController,
    NiVisController,
    NiMaterialColorController,
    NiFlipController,
    NiGeomMorpherController,
    NiKeyframeController,
    NiLookAtController,
    NiParticleSystemController,
    NiPathController,
    NiUVController,
    NiControllerManager,
    NiTextureTransformController,
    NiMultiTargetTransformController,
    BSEffectShaderPropertyColorController,
    BSEffectShaderPropertyFloatController,
    BhkBlendController,
    NiSequence,
    NiControllerSequence,
    // Interpolators
    NiBlendBoolInterpolator,
    NiBlendFloatInterpolator,
    NiBlendPoint3Interpolator,
    NiBlendTransformInterpolator,
    NiBoolInterpolator,
    NiColorInterpolator,
    NiFloatInterpolator,
    NiPoint3Interpolator,
    NiTransformInterpolator,
    // Animation data
    NiColorData,
    NiFloatData,
    NiKeyframeData,
    NiMorphData,
    NiPosData,
    NiUVData,
    NiVisData,
    NiBoolData,
    NiDefaultAVObjectPalette,
    // Textures
    NiSourceTexture,
    NiPixelData,
    NiPalette,
    BSShaderTextureSet,
    // Effects
    NiLight,
    NiPointLight,
    NiSpotLight,
    NiTextureEffect,
    // Extra data
    NiExtraData,
    NiStringExtraData,
    NiTextKeyExtraData,
    NiVertWeightsExtraData,
    NiBinaryExtraData,
    NiBooleanExtraData,
    NiVectorExtraData,
    NiFloatExtraData,
    NiFloatsExtraData,
    NiIntegerExtraData,
    NiIntegersExtraData,
    NiStringPalette,
    BSBound,
    BSMultiBound,
    BSMultiBoundOBB,
    BSMultiBoundSphere,
    BSFurnitureMarker,
    BSInvMarker,
    BSBehaviorGraphExtraData,
    // Geometry
    NiGeometry,
    BSLODTriShape,
    BSTriShape,
    NiTriShapeData,
    NiTriStripsData,
    NiLinesData,
    NiParticlesData,
    NiRotatingParticlesData,
    NiSkinInstance,
    BSDismemberSkinInstance,
    NiSkinData,
    NiSkinPartition,
    // Particle modifiers
    NiGravity,
    NiParticleColorModifier,
    NiParticleGrowFade,
    NiParticleRotation,
    NiPlanarCollider,
    NiSphericalCollider,
    // Physics
    NiCollisionObject,
    BhkCollisionObject,
    BhkHingeConstraint,
    BhkLimitedHingeConstraint,
    BhkRagdollConstraint,
    BhkRigidBody,
    BhkBoxShape,
    BhkCapsuleShape,
    BhkCompressedMeshShape,
    BhkCompressedMeshShapeData,
    BhkConvexTransformShape,
    BhkConvexVerticesShape,
    BhkListShape,
    BhkMoppBvTreeShape,
    BhkNiTriStripsShape,
    BhkPackedNiTriStripsShape,
    HkPackedNiTriStripsData,
    BhkSimpleShapePhantom,
    BhkConvexShape,
    // Properties
    NiAlphaProperty,
    NiFlagProperty,
    NiShadeProperty,
    NiFogProperty,
    NiMaterialProperty,
    NiStencilProperty,
    NiTexturingProperty,
    NiVertexColorProperty,
    NiZBufferProperty,
    BSShaderProperty,
    BSShaderPPLightingProperty,
    BSShaderNoLightingProperty,
    BSLightingShaderProperty,
    BSEffectShaderProperty,
}

impl RecordData {
    /// Borrow the node part of any node record.
    pub fn node(&self) -> Option<&NiNode> {
        match self {
            Self::NiNode(r) => Some(r),
            Self::NiBillboardNode(r) => Some(r.as_ref()),
            Self::NiSortAdjustNode(r) => Some(r.as_ref()),
            Self::BSRangeNode(r) => Some(r.as_ref()),
            Self::BSMultiBoundNode(r) => Some(r.as_ref()),
            Self::BSOrderedNode(r) => Some(r.as_ref()),
            Self::BSTreeNode(r) => Some(r.as_ref()),
            Self::BSValueNode(r) => Some(r.as_ref()),
            Self::NiSwitchNode(r) => Some(r.as_ref()),
            Self::NiFltAnimationNode(r) => Some(r.as_ref()),
            Self::NiLODNode(r) => Some(r.as_ref()),
            _ => None,
        }
    }

    /// Borrow the scene graph object part of any record that has one.
    pub fn av_object(&self) -> Option<&NiAVObject> {
        if let Some(node) = self.node() {
            return Some(node.as_ref());
        }
        match self {
            Self::NiCamera(r) => Some(r.as_ref()),
            Self::NiGeometry(r) => Some(r.as_ref()),
            Self::BSLODTriShape(r) => Some(r.as_ref()),
            Self::BSTriShape(r) => Some(r.as_ref()),
            Self::NiLight(r) => Some(r.as_ref()),
            Self::NiPointLight(r) => Some(r.as_ref()),
            Self::NiSpotLight(r) => Some(r.as_ref()),
            Self::NiTextureEffect(r) => Some(r.as_ref()),
            _ => None,
        }
    }

    /// Borrow the named-object part of any record that has one.
    pub fn object_net(&self) -> Option<&NiObjectNET> {
        if let Some(av) = self.av_object() {
            return Some(av.as_ref());
        }
        match self {
            Self::NiSequenceStreamHelper(r) => Some(r.as_ref()),
            Self::NiSourceTexture(r) => Some(r.as_ref()),
            Self::NiAlphaProperty(r) => Some(r.as_ref()),
            Self::NiFlagProperty(r) => Some(r.as_ref()),
            Self::NiShadeProperty(r) => Some(r.as_ref()),
            Self::NiFogProperty(r) => Some(r.as_ref()),
            Self::NiMaterialProperty(r) => Some(r.as_ref()),
            Self::NiStencilProperty(r) => Some(r.as_ref()),
            Self::NiTexturingProperty(r) => Some(r.as_ref()),
            Self::NiVertexColorProperty(r) => Some(r.as_ref()),
            Self::NiZBufferProperty(r) => Some(r.as_ref()),
            Self::BSShaderProperty(r) => Some(r.as_ref()),
            Self::BSShaderPPLightingProperty(r) => Some(r.as_ref()),
            Self::BSShaderNoLightingProperty(r) => Some(r.as_ref()),
            Self::BSLightingShaderProperty(r) => Some(r.as_ref()),
            Self::BSEffectShaderProperty(r) => Some(r.as_ref()),
            _ => None,
        }
    }

    /// Borrow the time controller part of any controller record.
    pub fn controller(&self) -> Option<&NiTimeController> {
        match self {
            Self::NiSingleInterpController(r) => Some(r.as_ref()),
            Self::NiFloatInterpController(r) => Some(r.as_ref()),
            Self::NiVisController(r) => Some(r.as_ref()),
            Self::NiMaterialColorController(r) => Some(r.as_ref()),
            Self::NiFlipController(r) => Some(r.as_ref()),
            Self::NiGeomMorpherController(r) => Some(r.as_ref()),
            Self::NiKeyframeController(r) => Some(r.as_ref()),
            Self::NiLookAtController(r) => Some(r.as_ref()),
            Self::NiParticleSystemController(r) => Some(r.as_ref()),
            Self::NiPathController(r) => Some(r.as_ref()),
            Self::NiUVController(r) => Some(r.as_ref()),
            Self::NiControllerManager(r) => Some(r.as_ref()),
            Self::NiTextureTransformController(r) => Some(r.as_ref()),
            Self::NiMultiTargetTransformController(r) => Some(r.as_ref()),
            Self::BSEffectShaderPropertyColorController(r) => Some(r.as_ref()),
            Self::BSEffectShaderPropertyFloatController(r) => Some(r.as_ref()),
            Self::BhkBlendController(r) => Some(r.as_ref()),
            _ => None,
        }
    }

    /// Mutably borrow the shared geometry part of shapes linking vertex data.
    pub(crate) fn geometry_mut(&mut self) -> Option<&mut NiGeometry> {
        match self {
            Self::NiGeometry(r) => Some(r),
            Self::BSLODTriShape(r) => Some(&mut r.base),
            _ => None,
        }
    }

    /// Borrow the geometry data part of any vertex data record.
    pub fn geometry_data(&self) -> Option<&NiGeometryData> {
        match self {
            Self::NiTriShapeData(r) => Some(r.as_ref()),
            Self::NiTriStripsData(r) => Some(r.as_ref()),
            Self::NiLinesData(r) => Some(r.as_ref()),
            Self::NiParticlesData(r) => Some(r.as_ref()),
            Self::NiRotatingParticlesData(r) => Some(r.as_ref()),
            _ => None,
        }
    }

    /// Borrow the skin instance part of any skinning record.
    pub fn skin_instance(&self) -> Option<&NiSkinInstance> {
        match self {
            Self::NiSkinInstance(r) => Some(r),
            Self::BSDismemberSkinInstance(r) => Some(r.as_ref()),
            _ => None,
        }
    }

    /// Check whether this is a render property.
    pub fn is_property(&self) -> bool {
        matches!(
            self,
            Self::NiAlphaProperty(_)
                | Self::NiFlagProperty(_)
                | Self::NiShadeProperty(_)
                | Self::NiFogProperty(_)
                | Self::NiMaterialProperty(_)
                | Self::NiStencilProperty(_)
                | Self::NiTexturingProperty(_)
                | Self::NiVertexColorProperty(_)
                | Self::NiZBufferProperty(_)
                | Self::BSShaderProperty(_)
                | Self::BSShaderPPLightingProperty(_)
                | Self::BSShaderNoLightingProperty(_)
                | Self::BSLightingShaderProperty(_)
                | Self::BSEffectShaderProperty(_)
        )
    }

    /// Check whether this is an extra data block.
    pub fn is_extra_data(&self) -> bool {
        matches!(
            self,
            Self::NiExtraData(_)
                | Self::NiStringExtraData(_)
                | Self::NiTextKeyExtraData(_)
                | Self::NiVertWeightsExtraData(_)
                | Self::NiBinaryExtraData(_)
                | Self::NiBooleanExtraData(_)
                | Self::NiVectorExtraData(_)
                | Self::NiFloatExtraData(_)
                | Self::NiFloatsExtraData(_)
                | Self::NiIntegerExtraData(_)
                | Self::NiIntegersExtraData(_)
                | Self::BSBound(_)
                | Self::BSFurnitureMarker(_)
                | Self::BSInvMarker(_)
                | Self::BSBehaviorGraphExtraData(_)
        )
    }

    /// Check whether this is an interpolator.
    pub fn is_interpolator(&self) -> bool {
        self.is_blend_interpolator()
            || matches!(
                self,
                Self::NiBoolInterpolator(_)
                    | Self::NiColorInterpolator(_)
                    | Self::NiFloatInterpolator(_)
                    | Self::NiPoint3Interpolator(_)
                    | Self::NiTransformInterpolator(_)
            )
    }

    /// Check whether this is a blend interpolator.
    pub fn is_blend_interpolator(&self) -> bool {
        matches!(
            self,
            Self::NiBlendBoolInterpolator(_)
                | Self::NiBlendFloatInterpolator(_)
                | Self::NiBlendPoint3Interpolator(_)
                | Self::NiBlendTransformInterpolator(_)
        )
    }

    /// Check whether this is a light or texture effect.
    pub fn is_dynamic_effect(&self) -> bool {
        matches!(
            self,
            Self::NiLight(_) | Self::NiPointLight(_) | Self::NiSpotLight(_) | Self::NiTextureEffect(_)
        )
    }

    /// Check whether this is a particle modifier.
    pub fn is_particle_modifier(&self) -> bool {
        self.is_particle_collider()
            || matches!(
                self,
                Self::NiGravity(_)
                    | Self::NiParticleColorModifier(_)
                    | Self::NiParticleGrowFade(_)
                    | Self::NiParticleRotation(_)
            )
    }

    /// Check whether this is a particle collider.
    pub fn is_particle_collider(&self) -> bool {
        matches!(self, Self::NiPlanarCollider(_) | Self::NiSphericalCollider(_))
    }

    /// Check whether this is a collision object.
    pub fn is_collision_object(&self) -> bool {
        matches!(self, Self::NiCollisionObject(_) | Self::BhkCollisionObject(_))
    }

    /// Check whether this is a Havok shape.
    pub fn is_bhk_shape(&self) -> bool {
        matches!(
            self,
            Self::BhkBoxShape(_)
                | Self::BhkCapsuleShape(_)
                | Self::BhkCompressedMeshShape(_)
                | Self::BhkConvexTransformShape(_)
                | Self::BhkConvexVerticesShape(_)
                | Self::BhkListShape(_)
                | Self::BhkMoppBvTreeShape(_)
                | Self::BhkNiTriStripsShape(_)
                | Self::BhkPackedNiTriStripsShape(_)
                | Self::BhkConvexShape(_)
        )
    }

    /// Check whether this is a Havok world object.
    pub fn is_bhk_world_object(&self) -> bool {
        matches!(self, Self::BhkRigidBody(_) | Self::BhkSimpleShapePhantom(_))
    }

    /// Check whether this is a Havok entity.
    pub fn is_bhk_entity(&self) -> bool {
        matches!(self, Self::BhkRigidBody(_))
    }

    /// Check whether this is any serializable Havok object.
    pub fn is_bhk_serializable(&self) -> bool {
        self.is_bhk_shape()
            || self.is_bhk_world_object()
            || matches!(
                self,
                Self::BhkHingeConstraint(_)
                    | Self::BhkLimitedHingeConstraint(_)
                    | Self::BhkRagdollConstraint(_)
            )
    }

    /// Check whether this is a multi-bound volume.
    pub fn is_multi_bound_data(&self) -> bool {
        matches!(self, Self::BSMultiBoundOBB(_) | Self::BSMultiBoundSphere(_))
    }
}

/// One decoded record.
#[derive(Debug, Clone)]
pub struct Record {
    kind: RecordKind,
    index: usize,
    type_name: String,
    data: RecordData,
}

impl Record {
    pub(crate) fn new(kind: RecordKind, index: usize, type_name: String, data: RecordData) -> Self {
        Self {
            kind,
            index,
            type_name,
            data,
        }
    }

    /// The record's kind.
    #[inline]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Position in the file's record list.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The type name as written in the file.
    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The decoded contents.
    #[inline]
    pub fn data(&self) -> &RecordData {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut RecordData {
        &mut self.data
    }

    /// Borrow the contents as a concrete struct.
    pub fn get<T: RecordCast>(&self) -> Option<&T> {
        T::cast(&self.data)
    }

    /// The object name, for records that carry one.
    pub fn object_name(&self) -> Option<&str> {
        self.data.object_net().map(|net| net.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(RecordKind::NiNode.name(), "NiNode");
        assert_eq!(RecordKind::BhkRigidBody.name(), "bhkRigidBody");
        assert_eq!(RecordKind::HkPackedNiTriStripsData.name(), "hkPackedNiTriStripsData");
        assert_eq!(RecordKind::NiLODNode.to_string(), "NiLODNode");
    }

    #[test]
    fn test_kind_names_are_unique() {
        let mut names: Vec<_> = RecordKind::ALL.iter().map(|kind| kind.name()).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn test_record_downcast() {
        let mut node = NiNode::default();
        node.base.base.name = "Scene Root".into();
        let record = Record::new(RecordKind::NiNode, 0, "BSFadeNode".into(), node.into());

        assert_eq!(record.type_name(), "BSFadeNode");
        assert_eq!(record.kind(), RecordKind::NiNode);
        assert!(record.get::<NiNode>().is_some());
        assert!(record.get::<NiSkinData>().is_none());
        assert_eq!(record.object_name(), Some("Scene Root"));
        assert_eq!(record.data().struct_name(), "NiNode");
    }

    #[test]
    fn test_nested_nodes_expose_their_base() {
        let data = RecordData::from(NiFltAnimationNode::default());
        assert!(data.node().is_some());
        assert!(data.av_object().is_some());
        assert!(data.controller().is_none());

        let data = RecordData::from(NiAlphaProperty::default());
        assert!(data.is_property());
        assert!(data.object_net().is_some());
        assert!(data.av_object().is_none());
    }
}
