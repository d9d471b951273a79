//! Typed index links between records.
//!
//! Records refer to each other by position in the file's record list. A
//! [`RecordLink`] keeps that raw index together with the kind of record it
//! is expected to point at; the resolver checks both once every record has
//! been read.

use std::fmt;
use std::marker::PhantomData;

use crate::record::RecordData;

/// Something a link can point at: a concrete record struct or a category.
pub trait LinkTarget {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Check whether a record's data satisfies this target.
    fn accepts(data: &RecordData) -> bool;
}

/// A link to another record, stored as its index.
///
/// Negative indices mean "no link".
pub struct RecordLink<T> {
    index: i32,
    _target: PhantomData<fn() -> T>,
}

impl<T> RecordLink<T> {
    /// The empty link.
    pub const EMPTY: Self = Self::new(-1);

    /// Wrap a raw index.
    #[inline]
    pub const fn new(index: i32) -> Self {
        Self {
            index,
            _target: PhantomData,
        }
    }

    /// The raw index as stored in the file.
    #[inline]
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Check whether the link is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index < 0
    }

    /// The target index, if the link is not empty.
    #[inline]
    pub fn get(&self) -> Option<usize> {
        usize::try_from(self.index).ok()
    }
}

impl<T> Clone for RecordLink<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RecordLink<T> {}

impl<T> Default for RecordLink<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> PartialEq for RecordLink<T> {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<T> Eq for RecordLink<T> {}

impl<T: LinkTarget> fmt::Debug for RecordLink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(index) => write!(f, "{}@{}", T::NAME, index),
            None => write!(f, "{}@none", T::NAME),
        }
    }
}

macro_rules! categories {
    ($($(#[$doc:meta])* $name:ident => |$data:ident| $accepts:expr;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub enum $name {}

            impl LinkTarget for $name {
                const NAME: &'static str = stringify!($name);

                fn accepts($data: &RecordData) -> bool {
                    $accepts
                }
            }
        )*
    };
}

categories! {
    /// Any record at all.
    AnyRecord => |_data| true;
    /// Anything that carries a name, extra data and controllers.
    ObjectNet => |data| data.object_net().is_some();
    /// Scene graph objects with a transform.
    AvObject => |data| data.av_object().is_some();
    /// Scene graph nodes with children.
    Node => |data| data.node().is_some();
    /// Render state attached to scene graph objects.
    Property => |data| data.is_property();
    /// Time controllers.
    Controller => |data| data.controller().is_some();
    /// Extra data blocks.
    ExtraData => |data| data.is_extra_data();
    /// Animation interpolators.
    Interpolator => |data| data.is_interpolator();
    /// Interpolators that blend several others.
    BlendInterpolator => |data| data.is_blend_interpolator();
    /// Vertex data for geometry.
    GeometryData => |data| data.geometry_data().is_some();
    /// Skinning instances.
    SkinInstance => |data| data.skin_instance().is_some();
    /// Lights and texture effects.
    DynamicEffect => |data| data.is_dynamic_effect();
    /// Particle system modifiers, colliders included.
    ParticleModifier => |data| data.is_particle_modifier();
    /// Particle colliders.
    ParticleCollider => |data| data.is_particle_collider();
    /// Collision objects attached to scene graph objects.
    CollisionObject => |data| data.is_collision_object();
    /// Havok collision shapes.
    BhkShape => |data| data.is_bhk_shape();
    /// Havok objects placed in the physics world.
    BhkWorldObject => |data| data.is_bhk_world_object();
    /// Havok rigid bodies.
    BhkEntity => |data| data.is_bhk_entity();
    /// Havok objects that can be serialized into a body, constraints included.
    BhkSerializable => |data| data.is_bhk_serializable();
    /// Bound volumes referenced by multi-bound records.
    MultiBoundData => |data| data.is_multi_bound_data();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{NiNode, NiSkinData};

    #[test]
    fn test_negative_index_is_empty() {
        let link = RecordLink::<NiNode>::new(-1);
        assert!(link.is_empty());
        assert_eq!(link.get(), None);
        assert_eq!(RecordLink::<NiNode>::default(), link);
        assert_eq!(RecordLink::<NiNode>::new(-7), link);
    }

    #[test]
    fn test_index_is_kept() {
        let link = RecordLink::<NiSkinData>::new(3);
        assert_eq!(link.get(), Some(3));
        assert_eq!(link.index(), 3);
        assert_eq!(format!("{:?}", link), "NiSkinData@3");
    }

    #[test]
    fn test_categories_accept_matching_data() {
        let node = RecordData::from(NiNode::default());
        assert!(AnyRecord::accepts(&node));
        assert!(Node::accepts(&node));
        assert!(AvObject::accepts(&node));
        assert!(ObjectNet::accepts(&node));
        assert!(!Property::accepts(&node));
        assert!(!NiSkinData::accepts(&node));
        assert!(NiNode::accepts(&node));
    }
}
