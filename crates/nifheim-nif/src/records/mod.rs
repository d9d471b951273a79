//! The record catalog.
//!
//! Every struct here embeds its parent layout in a `base` field and
//! exposes it through `AsRef`, so callers can treat a `BSFadeNode` as a
//! plain node or an animated texture as a named object.

macro_rules! impl_as_ref {
    ($ty:ty { $($base:ty => $($field:ident).+;)+ }) => {
        $(
            impl AsRef<$base> for $ty {
                #[inline]
                fn as_ref(&self) -> &$base {
                    &self.$($field).+
                }
            }
        )+
    };
}

mod base;
mod controller;
mod data;
mod effect;
mod extra;
mod geometry;
mod interpolator;
mod keys;
mod node;
mod particle;
mod physics;
mod property;
mod texture;

pub use base::*;
pub use controller::*;
pub use data::*;
pub use effect::*;
pub use extra::*;
pub use geometry::*;
pub use interpolator::*;
pub use keys::*;
pub use node::*;
pub use particle::*;
pub use physics::*;
pub use property::*;
pub use texture::*;
