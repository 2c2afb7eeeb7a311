/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use crate::edit::repository::pick_matches;
use crate::edit::{EditCommand, Feature, FeatureType, ObjectId, Repository, UndoStack};
use crate::structures::BoundingBox;
use crate::vector::{DataSourcePtr, FieldData, VectorDataset, VectorGeometry};
use std::collections::BTreeMap;
use std::io::{Error, ErrorKind};

const DEFAULT_UNDO_DEPTH: usize = 64;

/// An editing context: staged edits grouped by source dataset, plus the
/// undo history of the session. Every session owns its own state, so two
/// sessions over the same data source never see each other's staged edits.
#[derive(Debug, Default, Clone)]
pub struct EditSession {
    repositories: BTreeMap<String, Repository>,
    undo_stack: UndoStack,
}

impl EditSession {
    pub fn new() -> EditSession {
        EditSession::with_undo_depth(DEFAULT_UNDO_DEPTH)
    }

    pub fn with_undo_depth(depth: usize) -> EditSession {
        EditSession {
            repositories: BTreeMap::new(),
            undo_stack: UndoStack::new(depth),
        }
    }

    pub fn get_repository(&self, source: &str) -> Option<&Repository> {
        self.repositories.get(source)
    }

    pub fn sources(&self) -> Vec<String> {
        self.repositories.keys().cloned().collect()
    }

    fn repository_mut(&mut self, source: &str) -> &mut Repository {
        self.repositories
            .entry(source.to_string())
            .or_insert_with(|| Repository::new(source))
    }

    /// Stages a feature for the given source, recording an undo step for
    /// the staged entry it changes.
    pub fn add_feature(&mut self, source: &str, feature: Feature) {
        let id = feature.id.clone();
        let repo = self.repository_mut(source);
        let before = repo.get_feature(&id).cloned();
        repo.add_feature(feature);
        let after = repo.get_feature(&id).cloned();
        self.undo_stack.push(EditCommand {
            source: source.to_string(),
            id,
            before,
            after,
        });
    }

    /// Stages a bare geometry edit, wrapping it in a feature of the given
    /// type.
    pub fn add_geometry(
        &mut self,
        source: &str,
        id: ObjectId,
        geometry: VectorGeometry,
        feature_type: FeatureType,
    ) {
        self.add_feature(source, Feature::new(id, geometry, feature_type));
    }

    /// All staged features of the source whose extent overlaps the box.
    pub fn get_geometries(&self, source: &str, env: &BoundingBox) -> Vec<&Feature> {
        match self.repositories.get(source) {
            Some(repo) => repo.get_features(env),
            None => vec![],
        }
    }

    /// The first staged feature of the source matching the refined pick
    /// test.
    pub fn get_geometry(&self, source: &str, env: &BoundingBox) -> Option<&Feature> {
        self.repositories
            .get(source)
            .and_then(|repo| repo.get_geometry(env))
    }

    /// Picks the feature under the query box: staged edits win over layer
    /// data, and a dataset record hit is wrapped in an `Update` feature keyed
    /// by its record index, ready for editing.
    pub fn pick_geometry(
        &self,
        source: &str,
        dataset: &VectorDataset,
        env: &BoundingBox,
    ) -> Option<Feature> {
        if let Some(staged) = self.get_geometry(source, env) {
            return Some(staged.clone());
        }
        for i in 0..dataset.num_records() {
            let record = dataset.get_record(i);
            if pick_matches(record, env) {
                return Some(Feature::new(
                    ObjectId::new(&i.to_string()),
                    record.clone(),
                    FeatureType::Update,
                ));
            }
        }
        None
    }

    pub fn clear_all(&mut self) {
        self.repositories.clear();
        self.undo_stack.clear();
    }

    /// Drops staged edits of persisted features for the source, keeping
    /// pending `Add`s.
    pub fn clear_edited(&mut self, source: &str) {
        if let Some(repo) = self.repositories.get_mut(source) {
            repo.clear_edited();
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo_stack.can_redo()
    }

    /// Rolls the last staged edit back to its before-state. Returns false
    /// when the history is exhausted.
    pub fn undo(&mut self) -> bool {
        let command = match self.undo_stack.undo() {
            Some(c) => c.clone(),
            None => return false,
        };
        self.apply_snapshot(&command.source, &command.id, command.before);
        true
    }

    /// Re-applies the last undone edit.
    pub fn redo(&mut self) -> bool {
        let command = match self.undo_stack.redo() {
            Some(c) => c.clone(),
            None => return false,
        };
        self.apply_snapshot(&command.source, &command.id, command.after);
        true
    }

    fn apply_snapshot(&mut self, source: &str, id: &ObjectId, snapshot: Option<Feature>) {
        let repo = self.repository_mut(source);
        match snapshot {
            Some(feature) => repo.set_feature(feature),
            None => {
                repo.remove_feature(id);
            }
        }
    }

    /// Commits the staged edits of one source dataset back to its data
    /// source as a batch. The dataset is modified on a working copy and
    /// swapped in only if every staged edit applies cleanly, so a failed
    /// commit changes nothing. On success the committed edits are dropped
    /// from the repository; features still being digitized (`BlockEdit`)
    /// stay staged. The undo history refers to staged state that no longer
    /// exists after a commit, so it is cleared.
    pub fn commit(&mut self, source: &str, data_source: &DataSourcePtr) -> Result<(), Error> {
        let repo = match self.repositories.get(source) {
            Some(repo) if !repo.is_empty() => repo,
            _ => return Ok(()),
        };

        let mut guard = data_source
            .lock()
            .map_err(|_| Error::new(ErrorKind::Other, "The data source mutex was poisoned."))?;
        let mut working = guard.get_dataset(source)?;

        let mut deletions: Vec<usize> = vec![];
        for feature in repo.features() {
            match feature.feature_type {
                FeatureType::BlockEdit => continue,
                FeatureType::Add => {
                    working.add_record(feature.geometry.clone())?;
                    let mut rec = vec![FieldData::Null; working.attributes.num_fields()];
                    for (&field, value) in &feature.data {
                        if field < rec.len() {
                            rec[field] = value.clone();
                        }
                    }
                    working.attributes.add_record(rec);
                }
                FeatureType::Update => {
                    let index = record_index(&feature.id, working.num_records())?;
                    working.records[index] = feature.geometry.clone();
                    for (&field, value) in &feature.data {
                        working.attributes.set_value(index, field, value.clone());
                    }
                }
                FeatureType::Delete => {
                    deletions.push(record_index(&feature.id, working.num_records())?);
                }
            }
        }
        deletions.sort_unstable();
        deletions.dedup();
        for &index in deletions.iter().rev() {
            working.records.remove(index);
            working.attributes.remove_record(index);
        }

        guard.put_dataset(working)?;
        drop(guard);

        let repo = self.repository_mut(source);
        let pending: Vec<Feature> = repo
            .features()
            .iter()
            .filter(|f| f.feature_type == FeatureType::BlockEdit)
            .cloned()
            .collect();
        repo.clear();
        for feature in pending {
            repo.set_feature(feature);
        }
        self.undo_stack.clear();
        Ok(())
    }
}

// Staged features addressing stored records carry the record index as
// their object id.
fn record_index(id: &ObjectId, num_records: usize) -> Result<usize, Error> {
    let index: usize = id.as_str().parse().map_err(|_| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("'{}' is not a valid record identifier.", id),
        )
    })?;
    if index >= num_records {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "Record identifier {} is out of range for a dataset of {} records.",
                index, num_records
            ),
        ));
    }
    Ok(index)
}

#[cfg(test)]
mod test {
    use super::EditSession;
    use crate::edit::{Feature, FeatureType, ObjectId};
    use crate::structures::{BoundingBox, Point2D};
    use crate::vector::{
        AttributeField, AttributeTable, DataSource, FieldData, MemoryDataSource, ShapeType,
        VectorDataset, VectorGeometry,
    };

    fn point_geometry(x: f64, y: f64) -> VectorGeometry {
        let mut geometry = VectorGeometry::new(ShapeType::Point);
        geometry.add_point(Point2D::new(x, y));
        geometry
    }

    fn seeded_source() -> crate::vector::DataSourcePtr {
        let mut ds = VectorDataset::new("towns", ShapeType::Point, 4326);
        ds.attributes = AttributeTable::new(vec![AttributeField::new("NAME", 'C', 32u8, 0u8)]);
        ds.add_record(point_geometry(1.0, 1.0)).unwrap();
        ds.attributes
            .add_record(vec![FieldData::Text("alpha".to_string())]);
        ds.add_record(point_geometry(2.0, 2.0)).unwrap();
        ds.attributes
            .add_record(vec![FieldData::Text("beta".to_string())]);
        let mut source = MemoryDataSource::new();
        source.put_dataset(ds).unwrap();
        source.into_ptr()
    }

    #[test]
    fn test_commit_applies_add_update_delete() {
        let source = seeded_source();
        let mut session = EditSession::new();

        let mut added = Feature::new(
            ObjectId::new("new-1"),
            point_geometry(9.0, 9.0),
            FeatureType::Add,
        );
        added.set_value(0, FieldData::Text("gamma".to_string()));
        session.add_feature("towns", added);

        let mut updated = Feature::new(ObjectId::new("0"), point_geometry(-1.0, -1.0), FeatureType::Update);
        updated.set_value(0, FieldData::Text("alpha2".to_string()));
        session.add_feature("towns", updated);

        session.add_feature(
            "towns",
            Feature::new(ObjectId::new("1"), point_geometry(2.0, 2.0), FeatureType::Delete),
        );

        session.commit("towns", &source).unwrap();
        assert!(session.get_repository("towns").unwrap().is_empty());

        let committed = source.lock().unwrap().get_dataset("towns").unwrap();
        assert_eq!(committed.num_records(), 2);
        assert_eq!(committed.records[0].points[0], Point2D::new(-1.0, -1.0));
        assert_eq!(
            committed.attributes.get_value(0, 0),
            FieldData::Text("alpha2".to_string())
        );
        assert_eq!(committed.records[1].points[0], Point2D::new(9.0, 9.0));
        assert_eq!(
            committed.attributes.get_value(1, 0),
            FieldData::Text("gamma".to_string())
        );
    }

    #[test]
    fn test_failed_commit_leaves_dataset_untouched() {
        let source = seeded_source();
        let mut session = EditSession::new();
        session.add_feature(
            "towns",
            Feature::new(ObjectId::new("new-1"), point_geometry(9.0, 9.0), FeatureType::Add),
        );
        // an update keyed by a non-numeric id cannot be applied
        session.add_feature(
            "towns",
            Feature::new(ObjectId::new("bogus"), point_geometry(0.0, 0.0), FeatureType::Update),
        );
        assert!(session.commit("towns", &source).is_err());
        let dataset = source.lock().unwrap().get_dataset("towns").unwrap();
        assert_eq!(dataset.num_records(), 2);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut session = EditSession::new();
        session.add_feature(
            "towns",
            Feature::new(ObjectId::new("0"), point_geometry(5.0, 5.0), FeatureType::Update),
        );
        assert!(session.can_undo());
        assert!(session.undo());
        assert!(session
            .get_repository("towns")
            .map(|r| r.is_empty())
            .unwrap_or(true));
        assert!(session.redo());
        let staged = session
            .get_repository("towns")
            .unwrap()
            .get_feature(&ObjectId::new("0"))
            .unwrap();
        assert_eq!(staged.geometry.points[0], Point2D::new(5.0, 5.0));
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut session1 = EditSession::new();
        let session2 = EditSession::new();
        session1.add_feature(
            "towns",
            Feature::new(ObjectId::new("0"), point_geometry(5.0, 5.0), FeatureType::Update),
        );
        assert!(session1.get_repository("towns").is_some());
        assert!(session2.get_repository("towns").is_none());
    }

    #[test]
    fn test_pick_geometry_prefers_staged() {
        let source = seeded_source();
        let dataset = source.lock().unwrap().get_dataset("towns").unwrap();
        let mut session = EditSession::new();

        // nothing staged: the stored record under the box is wrapped for
        // editing
        let picked = session
            .pick_geometry("towns", &dataset, &BoundingBox::around_point(Point2D::new(1.0, 1.0), 0.5))
            .unwrap();
        assert_eq!(picked.id, ObjectId::new("0"));
        assert_eq!(picked.feature_type, FeatureType::Update);

        session.add_feature(
            "towns",
            Feature::new(ObjectId::new("0"), point_geometry(1.0, 1.0), FeatureType::Delete),
        );
        let picked = session
            .pick_geometry("towns", &dataset, &BoundingBox::around_point(Point2D::new(1.0, 1.0), 0.5))
            .unwrap();
        assert_eq!(picked.feature_type, FeatureType::Delete);
    }
}
