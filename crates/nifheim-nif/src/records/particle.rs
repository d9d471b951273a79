//! Modifiers and colliders for the old particle system controller.

use nifheim_common::math::{Vector2, Vector3};

use crate::link::{Controller, ParticleModifier, RecordLink};
use crate::record::ReadRecord;
use crate::records::NiColorData;
use crate::resolve::PostContext;
use crate::{DecodeResult, NifStream};

/// Links every modifier carries: the next modifier and the owning controller.
#[derive(Debug, Clone, Default)]
pub struct NiParticleModifier {
    pub next: RecordLink<ParticleModifier>,
    pub controller: RecordLink<Controller>,
}

impl ReadRecord for NiParticleModifier {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.next = nif.read_link()?;
        if nif.since(3, 3, 0, 13) {
            self.controller = nif.read_link()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.next)?;
        ctx.link(&self.controller)?;
        Ok(())
    }
}

/// Direction of a gravity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceType {
    #[default]
    Wind,
    Point,
    Unknown(u32),
}

impl From<u32> for ForceType {
    fn from(raw: u32) -> Self {
        match raw {
            0 => Self::Wind,
            1 => Self::Point,
            other => Self::Unknown(other),
        }
    }
}

/// Pulls particles along a direction or towards a point.
#[derive(Debug, Clone, Default)]
pub struct NiGravity {
    pub base: NiParticleModifier,
    pub decay: f32,
    pub force: f32,
    pub force_type: ForceType,
    pub position: Vector3,
    pub direction: Vector3,
}

impl_as_ref!(NiGravity { NiParticleModifier => base; });

impl ReadRecord for NiGravity {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.since(3, 3, 0, 13) {
            self.decay = nif.read_f32()?;
        }
        self.force = nif.read_f32()?;
        self.force_type = ForceType::from(nif.read_u32()?);
        self.position = nif.read()?;
        self.direction = nif.read()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// Grows new particles in and fades old ones out.
#[derive(Debug, Clone, Default)]
pub struct NiParticleGrowFade {
    pub base: NiParticleModifier,
    pub grow_time: f32,
    pub fade_time: f32,
}

impl_as_ref!(NiParticleGrowFade { NiParticleModifier => base; });

impl ReadRecord for NiParticleGrowFade {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.grow_time = nif.read_f32()?;
        self.fade_time = nif.read_f32()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// Colors particles over their lifetime.
#[derive(Debug, Clone, Default)]
pub struct NiParticleColorModifier {
    pub base: NiParticleModifier,
    pub data: RecordLink<NiColorData>,
}

impl_as_ref!(NiParticleColorModifier { NiParticleModifier => base; });

impl ReadRecord for NiParticleColorModifier {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.data = nif.read_link()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.data)?;
        Ok(())
    }
}

/// Spins particles.
#[derive(Debug, Clone, Default)]
pub struct NiParticleRotation {
    pub base: NiParticleModifier,
    pub random_initial_axis: bool,
    pub initial_axis: Vector3,
    pub rotation_speed: f32,
}

impl_as_ref!(NiParticleRotation { NiParticleModifier => base; });

impl ReadRecord for NiParticleRotation {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.random_initial_axis = nif.read_u8()? != 0;
        self.initial_axis = nif.read()?;
        self.rotation_speed = nif.read_f32()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// Bounce behavior shared by colliders.
#[derive(Debug, Clone, Default)]
pub struct NiParticleCollider {
    pub base: NiParticleModifier,
    pub bounce_factor: f32,
    pub spawn_on_collide: bool,
    pub die_on_collide: bool,
}

impl_as_ref!(NiParticleCollider { NiParticleModifier => base; });

impl ReadRecord for NiParticleCollider {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.bounce_factor = nif.read_f32()?;
        if nif.since(4, 2, 0, 2) {
            self.spawn_on_collide = nif.read_byte_bool()?;
            self.die_on_collide = nif.read_byte_bool()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// Bounces particles off a plane.
#[derive(Debug, Clone, Default)]
pub struct NiPlanarCollider {
    pub base: NiParticleCollider,
    pub extents: Vector2,
    pub position: Vector3,
    pub x_vector: Vector3,
    pub y_vector: Vector3,
    pub normal: Vector3,
    pub distance: f32,
}

impl_as_ref!(NiPlanarCollider {
    NiParticleCollider => base;
    NiParticleModifier => base.base;
});

impl ReadRecord for NiPlanarCollider {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.extents = nif.read()?;
        self.position = nif.read()?;
        self.x_vector = nif.read()?;
        self.y_vector = nif.read()?;
        self.normal = nif.read()?;
        self.distance = nif.read_f32()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// Bounces particles off a sphere.
#[derive(Debug, Clone, Default)]
pub struct NiSphericalCollider {
    pub base: NiParticleCollider,
    pub radius: f32,
    pub center: Vector3,
}

impl_as_ref!(NiSphericalCollider {
    NiParticleCollider => base;
    NiParticleModifier => base.base;
});

impl ReadRecord for NiSphericalCollider {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.radius = nif.read_f32()?;
        self.center = nif.read()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stream, ByteWriter};
    use crate::NifVersion;

    #[test]
    fn test_gravity() {
        let bytes = ByteWriter::new()
            .i32(-1)
            .i32(2)
            .f32(0.0)
            .f32(9.8)
            .u32(1)
            .f32(0.0)
            .f32(0.0)
            .f32(10.0)
            .f32(0.0)
            .f32(0.0)
            .f32(-1.0)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let mut gravity = NiGravity::default();
        gravity.read(&mut nif).unwrap();
        assert_eq!(gravity.base.controller.get(), Some(2));
        assert_eq!(gravity.force_type, ForceType::Point);
        assert_eq!(gravity.direction, Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(nif.position(), bytes.len() as u64);
    }
}
