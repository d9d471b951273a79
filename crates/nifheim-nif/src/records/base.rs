//! Layouts shared by most records: named objects and scene graph objects.

use nifheim_common::math::{BoundingSphere, Transform, Vector3};

use crate::link::{CollisionObject, Controller, ExtraData, Property, RecordLink};
use crate::record::ReadRecord;
use crate::resolve::PostContext;
use crate::version::beth;
use crate::{DecodeResult, NifStream};

/// A named object that can carry extra data and controllers.
#[derive(Debug, Clone, Default)]
pub struct NiObjectNET {
    pub name: String,
    /// Head of the extra data chain, before 10.0.1.0.
    pub extra: RecordLink<ExtraData>,
    /// Extra data list, from 10.0.1.0 on.
    pub extra_list: Vec<RecordLink<ExtraData>>,
    pub controller: RecordLink<Controller>,
}

impl ReadRecord for NiObjectNET {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.name = nif.read_string()?;
        if nif.since(10, 0, 1, 0) {
            self.extra_list = nif.read_link_list()?;
        } else {
            self.extra = nif.read_link()?;
        }
        self.controller = nif.read_link()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.extra)?;
        ctx.links(&self.extra_list)?;
        ctx.link(&self.controller)?;
        Ok(())
    }
}

/// A bounding volume attached to old scene graph objects.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundingVolume {
    Base,
    Sphere(BoundingSphere),
    Box {
        center: Vector3,
        axes: [Vector3; 3],
        extents: Vector3,
    },
    Capsule {
        center: Vector3,
        axis: Vector3,
        extent: f32,
        radius: f32,
    },
    Lozenge {
        radius: f32,
        extent0: f32,
        extent1: f32,
        center: Vector3,
        axis0: Vector3,
        axis1: Vector3,
    },
    Union(Vec<BoundingVolume>),
    HalfSpace {
        normal: Vector3,
        constant: f32,
        center: Vector3,
    },
}

impl BoundingVolume {
    pub(crate) fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        let kind = nif.read_u32()?;
        Ok(match kind {
            u32::MAX => Self::Base,
            0 => Self::Sphere(nif.read()?),
            1 => Self::Box {
                center: nif.read()?,
                axes: nif.read()?,
                extents: nif.read()?,
            },
            2 => Self::Capsule {
                center: nif.read()?,
                axis: nif.read()?,
                extent: nif.read_f32()?,
                radius: nif.read_f32()?,
            },
            3 => Self::Lozenge {
                radius: nif.read_f32()?,
                extent0: nif.read_f32()?,
                extent1: nif.read_f32()?,
                center: nif.read()?,
                axis0: nif.read()?,
                axis1: nif.read()?,
            },
            4 => {
                let count = nif.read_u32()?;
                let mut volumes = Vec::new();
                for _ in 0..count {
                    volumes.push(Self::read(nif)?);
                }
                Self::Union(volumes)
            }
            5 => {
                let normal = nif.read()?;
                let constant = nif.read_f32()?;
                let center = if nif.since(4, 2, 1, 0) {
                    nif.read()?
                } else {
                    Vector3::default()
                };
                Self::HalfSpace {
                    normal,
                    constant,
                    center,
                }
            }
            other => return Err(nif.invalid(format!("unknown bounding volume type {}", other))),
        })
    }
}

/// A scene graph object with a transform, properties and collision.
#[derive(Debug, Clone, Default)]
pub struct NiAVObject {
    pub base: NiObjectNET,
    pub flags: u32,
    pub transform: Transform,
    pub velocity: Vector3,
    pub properties: Vec<RecordLink<Property>>,
    pub bounds: Option<BoundingVolume>,
    pub collision: RecordLink<CollisionObject>,
}

impl_as_ref!(NiAVObject { NiObjectNET => base; });

impl NiAVObject {
    /// Check whether the "hidden" flag is set.
    pub fn is_hidden(&self) -> bool {
        self.flags & 0x1 != 0
    }
}

impl ReadRecord for NiAVObject {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.flags = if nif.beth_version() <= 26 {
            u32::from(nif.read_u16()?)
        } else {
            nif.read_u32()?
        };
        self.transform = nif.read()?;
        if nif.until(4, 2, 2, 0) {
            self.velocity = nif.read()?;
        }
        if nif.beth_version() <= beth::FO3 {
            self.properties = nif.read_link_list()?;
        }
        if nif.until(4, 2, 2, 0) && nif.read_bool()? {
            self.bounds = Some(BoundingVolume::read(nif)?);
        }
        if nif.since(10, 0, 1, 0) {
            self.collision = nif.read_link()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.links(&self.properties)?;
        ctx.link(&self.collision)?;
        Ok(())
    }
}
