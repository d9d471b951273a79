//! Link resolution and cross-record fix-ups.
//!
//! Once every record is decoded, each one gets a single `post` call in file
//! order. Hooks only see an immutable slice of records; anything that
//! touches another record is queued as a [`PostEffect`] and applied after
//! the hook returns.

use tracing::warn;

use crate::error::Warning;
use crate::link::{LinkTarget, RecordLink};
use crate::record::{Record, RecordCast};
use crate::{DecodeResult, ErrorKind};

/// A fact a record publishes about another record, or about the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostEffect {
    /// `parent` lists `child` among its children.
    AddParent { child: usize, parent: usize },
    /// The record is a bone of some skin instance.
    MarkBone(usize),
    /// Some geometry is skinned.
    UseSkinning,
    /// The geometry record's data link points at the wrong kind of data
    /// and is dropped.
    ClearGeometryData(usize),
}

/// What a record's `post` hook can see and do.
pub struct PostContext<'a> {
    records: &'a [Record],
    current: usize,
    effects: Vec<PostEffect>,
    warnings: Vec<Warning>,
}

impl<'a> PostContext<'a> {
    fn new(records: &'a [Record], current: usize) -> Self {
        Self {
            records,
            current,
            effects: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// The record being post-processed.
    #[inline]
    pub fn current(&self) -> &'a Record {
        &self.records[self.current]
    }

    /// Resolve a link.
    ///
    /// Empty links give `None`. Links past the record list are fatal. A
    /// target of the wrong category is reported as a warning and gives
    /// `None`.
    pub fn link<T: LinkTarget>(&mut self, link: &RecordLink<T>) -> DecodeResult<Option<&'a Record>> {
        if link.index() < 0 {
            return Ok(None);
        }
        let Some(target) = link.get().and_then(|index| self.records.get(index)) else {
            return Err(ErrorKind::InvalidLink {
                from: self.current,
                index: link.index(),
                count: self.records.len(),
            });
        };
        if !T::accepts(target.data()) {
            self.warn(Warning::LinkTypeMismatch {
                from: self.current,
                index: target.index(),
                expected: T::NAME,
                found: target.type_name().to_string(),
            });
            return Ok(None);
        }
        Ok(Some(target))
    }

    /// Resolve every link of a list, discarding the targets.
    pub fn links<T: LinkTarget>(&mut self, links: &[RecordLink<T>]) -> DecodeResult<()> {
        for link in links {
            self.link(link)?;
        }
        Ok(())
    }

    /// Resolve a link to a concrete record struct.
    pub fn cast<T: RecordCast + LinkTarget>(&mut self, link: &RecordLink<T>) -> DecodeResult<Option<&'a T>> {
        Ok(self.link(link)?.and_then(|record| record.get::<T>()))
    }

    /// Register the current record as a parent of `child`.
    pub fn add_parent(&mut self, child: usize) {
        self.effects.push(PostEffect::AddParent {
            child,
            parent: self.current,
        });
    }

    /// Mark a record as a skeleton bone.
    pub fn mark_bone(&mut self, index: usize) {
        self.effects.push(PostEffect::MarkBone(index));
    }

    /// Flag the file as containing skinned geometry.
    pub fn use_skinning(&mut self) {
        self.effects.push(PostEffect::UseSkinning);
    }

    /// Drop the current geometry record's data link once resolution ends.
    pub fn clear_geometry_data(&mut self) {
        self.effects.push(PostEffect::ClearGeometryData(self.current));
    }

    /// Log and keep a warning.
    pub fn warn(&mut self, warning: Warning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Build an `InvalidRecord` error for the current record.
    pub fn invalid(&self, reason: impl Into<String>) -> ErrorKind {
        let record = self.current();
        ErrorKind::InvalidRecord {
            index: record.index(),
            name: record.type_name().to_string(),
            reason: reason.into(),
        }
    }
}

/// Cross-record facts gathered by post-processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// For each record, the nodes that list it as a child.
    pub parents: Vec<Vec<usize>>,
    /// For each record, whether a skin instance uses it as a bone.
    pub bones: Vec<bool>,
    pub uses_skinning: bool,
    /// Geometry records whose data link must be emptied, in file order.
    pub cleared_geometry_data: Vec<usize>,
    pub warnings: Vec<Warning>,
}

impl Resolution {
    fn apply(&mut self, effect: PostEffect) {
        match effect {
            // A node listing the same child twice is still one parent.
            PostEffect::AddParent { child, parent } => {
                if let Some(parents) = self.parents.get_mut(child) {
                    if !parents.contains(&parent) {
                        parents.push(parent);
                    }
                }
            }
            PostEffect::MarkBone(index) => {
                if let Some(bone) = self.bones.get_mut(index) {
                    *bone = true;
                }
            }
            PostEffect::UseSkinning => self.uses_skinning = true,
            PostEffect::ClearGeometryData(index) => {
                if !self.cleared_geometry_data.contains(&index) {
                    self.cleared_geometry_data.push(index);
                }
            }
        }
    }
}

/// Run every record's `post` hook once, in file order.
///
/// Records are never added, removed or reordered, and nothing here mutates
/// them: link clearing is only recorded in the [`Resolution`] for the caller
/// to apply. Running this twice on the same records gives the same result.
pub fn resolve(records: &[Record]) -> DecodeResult<Resolution> {
    let mut resolution = Resolution {
        parents: vec![Vec::new(); records.len()],
        bones: vec![false; records.len()],
        ..Resolution::default()
    };
    for (index, record) in records.iter().enumerate() {
        let mut ctx = PostContext::new(records, index);
        record.data().post(&mut ctx)?;
        for effect in ctx.effects {
            resolution.apply(effect);
        }
        resolution.warnings.append(&mut ctx.warnings);
    }
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RecordData, RecordKind};
    use crate::records::{NiGeometry, NiNode, NiSkinData, NiSkinInstance, NiTriShapeData, NiTriStripsData};

    fn node(index: usize, children: &[i32]) -> Record {
        let mut node = NiNode::default();
        node.children = children.iter().copied().map(RecordLink::new).collect();
        Record::new(RecordKind::NiNode, index, "NiNode".into(), node.into())
    }

    fn record(index: usize, kind: RecordKind, data: impl Into<RecordData>) -> Record {
        Record::new(kind, index, kind.name().into(), data.into())
    }

    #[test]
    fn test_parents_are_registered() {
        let records = vec![node(0, &[1, 2]), node(1, &[2]), node(2, &[-1])];
        let resolution = resolve(&records).unwrap();
        assert_eq!(resolution.parents[0], Vec::<usize>::new());
        assert_eq!(resolution.parents[1], vec![0]);
        assert_eq!(resolution.parents[2], vec![0, 1]);
        assert!(resolution.warnings.is_empty());
        assert!(!resolution.uses_skinning);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let records = vec![node(0, &[1, 1]), node(1, &[])];
        let first = resolve(&records).unwrap();
        let second = resolve(&records).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.parents[1], vec![0]);
    }

    #[test]
    fn test_duplicate_child_slots_register_one_parent() {
        let records = vec![node(0, &[1, 2, 1]), node(1, &[]), node(2, &[1])];
        let resolution = resolve(&records).unwrap();
        assert_eq!(resolution.parents[1], vec![0, 2]);
        assert_eq!(resolution.parents[2], vec![0]);
    }

    #[test]
    fn test_mismatched_geometry_data_is_cleared() {
        let shape = NiGeometry {
            data: RecordLink::new(1),
            ..Default::default()
        };
        let records = vec![
            record(0, RecordKind::NiTriShape, shape.clone()),
            record(1, RecordKind::NiTriStripsData, NiTriStripsData::default()),
            record(2, RecordKind::NiTriStrips, shape),
        ];
        let resolution = resolve(&records).unwrap();
        assert_eq!(resolution.cleared_geometry_data, vec![0]);
        assert_eq!(
            resolution.warnings,
            vec![Warning::LinkTypeMismatch {
                from: 0,
                index: 1,
                expected: "NiTriShapeData",
                found: "NiTriStripsData".into(),
            }]
        );
    }

    #[test]
    fn test_out_of_range_link_is_fatal() {
        let records = vec![node(0, &[5])];
        let err = resolve(&records).unwrap_err();
        assert!(matches!(
            err,
            ErrorKind::InvalidLink {
                from: 0,
                index: 5,
                count: 1
            }
        ));
    }

    #[test]
    fn test_category_mismatch_warns() {
        let records = vec![
            node(0, &[1]),
            record(1, RecordKind::NiTriShapeData, NiTriShapeData::default()),
        ];
        let resolution = resolve(&records).unwrap();
        assert!(resolution.parents[1].is_empty());
        assert_eq!(
            resolution.warnings,
            vec![Warning::LinkTypeMismatch {
                from: 0,
                index: 1,
                expected: "AvObject",
                found: "NiTriShapeData".into(),
            }]
        );
    }

    #[test]
    fn test_skin_instance_marks_bones() {
        let mut data = NiSkinData::default();
        data.bones.resize_with(1, Default::default);
        let skin = NiSkinInstance {
            data: RecordLink::new(1),
            root: RecordLink::new(0),
            bones: vec![RecordLink::new(0)],
            ..Default::default()
        };
        let records = vec![
            node(0, &[]),
            record(1, RecordKind::NiSkinData, data),
            record(2, RecordKind::NiSkinInstance, skin),
        ];
        let resolution = resolve(&records).unwrap();
        assert_eq!(resolution.bones, vec![true, false, false]);
    }

    #[test]
    fn test_skin_instance_without_data_is_invalid() {
        let skin = NiSkinInstance {
            root: RecordLink::new(0),
            ..Default::default()
        };
        let records = vec![node(0, &[]), record(1, RecordKind::NiSkinInstance, skin)];
        let err = resolve(&records).unwrap_err();
        assert!(matches!(err, ErrorKind::InvalidRecord { index: 1, .. }));
    }
}
