//! Type name to record constructor table.
//!
//! Names are matched case-sensitively. Several names may build the same
//! struct; each entry also fixes the [`RecordKind`] the record is tagged
//! with, which is not always the kind named after the struct.

use std::sync::LazyLock;

use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;

use crate::record::{RecordData, RecordKind};
use crate::records::*;

/// Builds an empty record ready to be read.
pub type Factory = fn() -> RecordData;

fn construct<T: Default + Into<RecordData>>() -> RecordData {
    T::default().into()
}

macro_rules! entries {
    ($($name:literal => $ty:ty as $kind:ident,)*) => {
        &[$(($name, RecordKind::$kind, construct::<$ty> as Factory),)*]
    };
}

/// Every known type name.
static ENTRIES: &[(&str, RecordKind, Factory)] = entries! {
    // Nodes
    "NiNode" => NiNode as NiNode,
    "AvoidNode" => NiNode as AvoidNode,
    "NiBillboardNode" => NiBillboardNode as NiBillboardNode,
    "NiBSAnimationNode" => NiNode as NiBSAnimationNode,
    "NiBSParticleNode" => NiNode as NiBSParticleNode,
    "NiCollisionSwitch" => NiNode as NiCollisionSwitch,
    "NiSortAdjustNode" => NiSortAdjustNode as NiSortAdjustNode,
    "RootCollisionNode" => NiNode as RootCollisionNode,
    "BSBlastNode" => BSRangeNode as NiNode,
    "BSDamageStage" => BSRangeNode as NiNode,
    "BSFadeNode" => NiNode as NiNode,
    "BSLeafAnimNode" => NiNode as NiNode,
    "BSMultiBoundNode" => BSMultiBoundNode as NiNode,
    "BSOrderedNode" => BSOrderedNode as NiNode,
    "BSRangeNode" => BSRangeNode as NiNode,
    "BSTreeNode" => BSTreeNode as NiNode,
    "BSValueNode" => BSValueNode as NiNode,
    "NiSwitchNode" => NiSwitchNode as NiSwitchNode,
    "NiFltAnimationNode" => NiFltAnimationNode as NiFltAnimationNode,
    "NiLODNode" => NiLODNode as NiLODNode,
    "NiSequenceStreamHelper" => NiSequenceStreamHelper as NiSequenceStreamHelper,
    "NiSequence" => NiSequence as NiSequence,
    "NiControllerSequence" => NiControllerSequence as NiControllerSequence,
    "NiCamera" => NiCamera as NiCamera,
    "NiAlphaAccumulator" => NiAlphaAccumulator as NiAlphaAccumulator,
    "NiClusterAccumulator" => NiClusterAccumulator as NiClusterAccumulator,
    // Controllers
    "NiAlphaController" => NiAlphaController as NiAlphaController,
    "NiBSPArrayController" => NiBSPArrayController as NiBSPArrayController,
    "NiFlipController" => NiFlipController as NiFlipController,
    "NiGeomMorpherController" => NiGeomMorpherController as NiGeomMorpherController,
    "NiKeyframeController" => NiKeyframeController as NiKeyframeController,
    "NiLookAtController" => NiLookAtController as NiLookAtController,
    "NiMaterialColorController" => NiMaterialColorController as NiMaterialColorController,
    "NiParticleSystemController" => NiParticleSystemController as NiParticleSystemController,
    "NiPathController" => NiPathController as NiPathController,
    "NiRollController" => NiRollController as NiRollController,
    "NiUVController" => NiUVController as NiUVController,
    "NiVisController" => NiVisController as NiVisController,
    "NiControllerManager" => NiControllerManager as NiControllerManager,
    "NiTransformController" => NiTransformController as NiKeyframeController,
    "NiTextureTransformController" => NiTextureTransformController as NiTextureTransformController,
    "NiMultiTargetTransformController" => NiMultiTargetTransformController as NiMultiTargetTransformController,
    "BSMaterialEmittanceMultController" => NiFloatInterpController as BSMaterialEmittanceMultController,
    "BSRefractionFirePeriodController" => NiSingleInterpController as BSRefractionFirePeriodController,
    "BSRefractionStrengthController" => NiFloatInterpController as BSRefractionStrengthController,
    "BSEffectShaderPropertyColorController" => BSEffectShaderPropertyColorController as BSEffectShaderPropertyColorController,
    "BSEffectShaderPropertyFloatController" => BSEffectShaderPropertyFloatController as BSEffectShaderPropertyFloatController,
    "BSLightingShaderPropertyColorController" => BSLightingShaderPropertyColorController as BSLightingShaderPropertyColorController,
    "BSLightingShaderPropertyFloatController" => BSLightingShaderPropertyFloatController as BSLightingShaderPropertyFloatController,
    "bhkBlendController" => BhkBlendController as BhkBlendController,
    // Interpolators
    "NiBlendBoolInterpolator" => NiBlendBoolInterpolator as NiBlendBoolInterpolator,
    "NiBlendFloatInterpolator" => NiBlendFloatInterpolator as NiBlendFloatInterpolator,
    "NiBlendPoint3Interpolator" => NiBlendPoint3Interpolator as NiBlendPoint3Interpolator,
    "NiBlendTransformInterpolator" => NiBlendTransformInterpolator as NiBlendTransformInterpolator,
    "NiBoolInterpolator" => NiBoolInterpolator as NiBoolInterpolator,
    "NiBoolTimelineInterpolator" => NiBoolTimelineInterpolator as NiBoolTimelineInterpolator,
    "NiColorInterpolator" => NiColorInterpolator as NiColorInterpolator,
    "NiFloatInterpolator" => NiFloatInterpolator as NiFloatInterpolator,
    "NiPoint3Interpolator" => NiPoint3Interpolator as NiPoint3Interpolator,
    "NiTransformInterpolator" => NiTransformInterpolator as NiTransformInterpolator,
    // Animation data and textures
    "NiColorData" => NiColorData as NiColorData,
    "NiFloatData" => NiFloatData as NiFloatData,
    "NiKeyframeData" => NiKeyframeData as NiKeyframeData,
    "NiMorphData" => NiMorphData as NiMorphData,
    "NiPalette" => NiPalette as NiPalette,
    "NiPixelData" => NiPixelData as NiPixelData,
    "NiPosData" => NiPosData as NiPosData,
    "NiSourceTexture" => NiSourceTexture as NiSourceTexture,
    "NiUVData" => NiUVData as NiUVData,
    "NiVisData" => NiVisData as NiVisData,
    "NiBoolData" => NiBoolData as NiBoolData,
    "NiDefaultAVObjectPalette" => NiDefaultAVObjectPalette as NiDefaultAVObjectPalette,
    "NiTransformData" => NiTransformData as NiKeyframeData,
    "BSShaderTextureSet" => BSShaderTextureSet as BSShaderTextureSet,
    // Effects
    "NiAmbientLight" => NiAmbientLight as NiLight,
    "NiDirectionalLight" => NiDirectionalLight as NiLight,
    "NiPointLight" => NiPointLight as NiLight,
    "NiSpotLight" => NiSpotLight as NiLight,
    "NiTextureEffect" => NiTextureEffect as NiTextureEffect,
    // Extra data
    "NiExtraData" => NiExtraData as NiExtraData,
    "NiStringExtraData" => NiStringExtraData as NiStringExtraData,
    "NiTextKeyExtraData" => NiTextKeyExtraData as NiTextKeyExtraData,
    "NiVertWeightsExtraData" => NiVertWeightsExtraData as NiVertWeightsExtraData,
    "NiBinaryExtraData" => NiBinaryExtraData as NiBinaryExtraData,
    "NiBooleanExtraData" => NiBooleanExtraData as NiBooleanExtraData,
    "NiColorExtraData" => NiColorExtraData as NiColorExtraData,
    "NiFloatExtraData" => NiFloatExtraData as NiFloatExtraData,
    "NiFloatsExtraData" => NiFloatsExtraData as NiFloatsExtraData,
    "NiIntegerExtraData" => NiIntegerExtraData as NiIntegerExtraData,
    "NiIntegersExtraData" => NiIntegersExtraData as NiIntegersExtraData,
    "NiVectorExtraData" => NiVectorExtraData as NiVectorExtraData,
    "NiStringPalette" => NiStringPalette as NiStringPalette,
    "BSBound" => BSBound as BSBound,
    "BSMultiBound" => BSMultiBound as BSMultiBound,
    "BSMultiBoundOBB" => BSMultiBoundOBB as BSMultiBoundOBB,
    "BSMultiBoundSphere" => BSMultiBoundSphere as BSMultiBoundSphere,
    "BSFurnitureMarker" => BSFurnitureMarker as BSFurnitureMarker,
    "BSFurnitureMarkerNode" => BSFurnitureMarkerNode as BSFurnitureMarker,
    "BSInvMarker" => BSInvMarker as BSInvMarker,
    "BSBehaviorGraphExtraData" => BSBehaviorGraphExtraData as BSBehaviorGraphExtraData,
    "BSXFlags" => BSXFlags as BSXFlags,
    // Geometry
    "NiAutoNormalParticles" => NiGeometry as NiParticles,
    "NiAutoNormalParticlesData" => NiAutoNormalParticlesData as NiParticlesData,
    "NiLines" => NiGeometry as NiLines,
    "NiLinesData" => NiLinesData as NiLinesData,
    "NiParticles" => NiGeometry as NiParticles,
    "NiParticlesData" => NiParticlesData as NiParticlesData,
    "NiRotatingParticles" => NiGeometry as NiParticles,
    "NiRotatingParticlesData" => NiRotatingParticlesData as NiParticlesData,
    "NiSkinData" => NiSkinData as NiSkinData,
    "NiSkinInstance" => NiSkinInstance as NiSkinInstance,
    "NiSkinPartition" => NiSkinPartition as NiSkinPartition,
    "NiTriShape" => NiGeometry as NiTriShape,
    "NiTriShapeData" => NiTriShapeData as NiTriShapeData,
    "NiTriStrips" => NiGeometry as NiTriStrips,
    "NiTriStripsData" => NiTriStripsData as NiTriStripsData,
    "BSDismemberSkinInstance" => BSDismemberSkinInstance as BSDismemberSkinInstance,
    "BSTriShape" => BSTriShape as BSTriShape,
    "BSLODTriShape" => BSLODTriShape as BSLODTriShape,
    // Particle modifiers
    "NiGravity" => NiGravity as NiGravity,
    "NiParticleColorModifier" => NiParticleColorModifier as NiParticleColorModifier,
    "NiParticleGrowFade" => NiParticleGrowFade as NiParticleGrowFade,
    "NiParticleRotation" => NiParticleRotation as NiParticleRotation,
    "NiPlanarCollider" => NiPlanarCollider as NiPlanarCollider,
    "NiSphericalCollider" => NiSphericalCollider as NiSphericalCollider,
    // Physics
    "NiCollisionObject" => NiCollisionObject as NiCollisionObject,
    "bhkCollisionObject" => BhkCollisionObject as BhkCollisionObject,
    "bhkPCollisionObject" => BhkPCollisionObject as BhkCollisionObject,
    "bhkSPCollisionObject" => BhkSPCollisionObject as BhkCollisionObject,
    "bhkHingeConstraint" => BhkHingeConstraint as BhkHingeConstraint,
    "bhkLimitedHingeConstraint" => BhkLimitedHingeConstraint as BhkLimitedHingeConstraint,
    "bhkRagdollConstraint" => BhkRagdollConstraint as BhkRagdollConstraint,
    "bhkRigidBody" => BhkRigidBody as BhkRigidBody,
    "bhkRigidBodyT" => BhkRigidBodyT as BhkRigidBodyT,
    "bhkBoxShape" => BhkBoxShape as BhkBoxShape,
    "bhkCapsuleShape" => BhkCapsuleShape as BhkCapsuleShape,
    "bhkCompressedMeshShape" => BhkCompressedMeshShape as BhkCompressedMeshShape,
    "bhkCompressedMeshShapeData" => BhkCompressedMeshShapeData as BhkCompressedMeshShapeData,
    "bhkConvexTransformShape" => BhkConvexTransformShape as BhkConvexTransformShape,
    "bhkConvexVerticesShape" => BhkConvexVerticesShape as BhkConvexVerticesShape,
    "bhkListShape" => BhkListShape as BhkListShape,
    "bhkMoppBvTreeShape" => BhkMoppBvTreeShape as BhkMoppBvTreeShape,
    "bhkNiTriStripsShape" => BhkNiTriStripsShape as BhkNiTriStripsShape,
    "bhkPackedNiTriStripsShape" => BhkPackedNiTriStripsShape as BhkPackedNiTriStripsShape,
    "hkPackedNiTriStripsData" => HkPackedNiTriStripsData as HkPackedNiTriStripsData,
    "bhkSimpleShapePhantom" => BhkSimpleShapePhantom as BhkSimpleShapePhantom,
    "bhkSphereShape" => BhkSphereShape as BhkSphereShape,
    "bhkTransformShape" => BhkTransformShape as BhkConvexTransformShape,
    // Properties
    "NiAlphaProperty" => NiAlphaProperty as NiAlphaProperty,
    "NiDitherProperty" => NiDitherProperty as NiDitherProperty,
    "NiFogProperty" => NiFogProperty as NiFogProperty,
    "NiMaterialProperty" => NiMaterialProperty as NiMaterialProperty,
    "NiShadeProperty" => NiShadeProperty as NiShadeProperty,
    "NiSpecularProperty" => NiSpecularProperty as NiSpecularProperty,
    "NiStencilProperty" => NiStencilProperty as NiStencilProperty,
    "NiTexturingProperty" => NiTexturingProperty as NiTexturingProperty,
    "NiVertexColorProperty" => NiVertexColorProperty as NiVertexColorProperty,
    "NiWireframeProperty" => NiWireframeProperty as NiWireframeProperty,
    "NiZBufferProperty" => NiZBufferProperty as NiZBufferProperty,
    "BSShaderProperty" => BSShaderProperty as BSShaderProperty,
    "BSShaderPPLightingProperty" => BSShaderPPLightingProperty as BSShaderPPLightingProperty,
    "BSShaderNoLightingProperty" => BSShaderNoLightingProperty as BSShaderNoLightingProperty,
    "BSLightingShaderProperty" => BSLightingShaderProperty as BSLightingShaderProperty,
    "BSEffectShaderProperty" => BSEffectShaderProperty as BSEffectShaderProperty,
};

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::build);

/// Lookup table from type name to kind and constructor.
pub struct Registry {
    map: HashMap<&'static str, (RecordKind, Factory), FxBuildHasher>,
}

impl Registry {
    fn build() -> Self {
        let mut map = HashMap::with_capacity_and_hasher(ENTRIES.len(), FxBuildHasher);
        for &(name, kind, factory) in ENTRIES {
            map.insert(name, (kind, factory));
        }
        Self { map }
    }

    /// The process-wide registry, built on first use.
    pub fn global() -> &'static Registry {
        &REGISTRY
    }

    /// Look up a type name.
    pub fn get(&self, name: &str) -> Option<(RecordKind, Factory)> {
        self.map.get(name).copied()
    }

    /// The kind a type name decodes as, without building a record.
    pub fn kind_of(&self, name: &str) -> Option<RecordKind> {
        self.map.get(name).map(|&(kind, _)| kind)
    }

    /// Build a default record for a type name.
    pub fn create(&self, name: &str) -> Option<(RecordKind, RecordData)> {
        self.get(name).map(|(kind, factory)| (kind, factory()))
    }

    /// Registered names with their kinds, in a stable order.
    pub fn names(&self) -> impl Iterator<Item = (&'static str, RecordKind)> {
        ENTRIES.iter().map(|&(name, kind, _)| (name, kind))
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check whether no names are registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("names", &self.map.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_is_registered_once() {
        let registry = Registry::global();
        assert_eq!(registry.len(), ENTRIES.len());
        assert_eq!(registry.len(), 164);
    }

    #[test]
    fn test_fade_node_builds_plain_node() {
        let (kind, data) = Registry::global().create("BSFadeNode").unwrap();
        assert_eq!(kind, RecordKind::NiNode);
        assert_eq!(data.struct_name(), "NiNode");
    }

    #[test]
    fn test_aliases_keep_their_kind() {
        let registry = Registry::global();
        assert_eq!(registry.kind_of("NiTransformData"), Some(RecordKind::NiKeyframeData));
        assert_eq!(registry.kind_of("NiRotatingParticles"), Some(RecordKind::NiParticles));
        assert_eq!(registry.kind_of("BSXFlags"), Some(RecordKind::BSXFlags));
        assert_eq!(registry.kind_of("bhkTransformShape"), Some(RecordKind::BhkConvexTransformShape));

        let (kind, data) = registry.create("NiColorExtraData").unwrap();
        assert_eq!(kind, RecordKind::NiColorExtraData);
        assert_eq!(data.struct_name(), "NiVectorExtraData");

        let (_, data) = registry.create("NiTriStrips").unwrap();
        assert_eq!(data.struct_name(), "NiGeometry");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = Registry::global();
        assert!(registry.get("NiNode").is_some());
        assert!(registry.get("ninode").is_none());
        assert!(registry.get("BhkRigidBody").is_none());
        assert!(registry.create("NotARealRecordType").is_none());
    }

    #[test]
    fn test_every_kind_is_reachable() {
        let registry = Registry::global();
        for kind in RecordKind::ALL {
            assert!(
                registry.names().any(|(_, registered)| registered == *kind),
                "{} has no type name",
                kind
            );
        }
    }
}
