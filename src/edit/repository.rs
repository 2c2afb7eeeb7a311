/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use crate::edit::{Feature, FeatureType, ObjectId};
use crate::structures::BoundingBox;
use crate::vector::{ShapeType, VectorGeometry};

/// Staged edits for one source dataset. Holds at most one feature per
/// object id; staging a second edit for the same id folds the two together
/// rather than queuing both.
#[derive(Debug, Default, Clone)]
pub struct Repository {
    pub source: String,
    features: Vec<Feature>,
}

impl Repository {
    pub fn new(source: &str) -> Repository {
        Repository {
            source: source.to_string(),
            features: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    fn position_of(&self, id: &ObjectId) -> Option<usize> {
        self.features.iter().position(|f| &f.id == id)
    }

    pub fn get_feature(&self, id: &ObjectId) -> Option<&Feature> {
        self.position_of(id).map(|i| &self.features[i])
    }

    pub fn has_identifier(&self, id: &ObjectId) -> bool {
        self.position_of(id).is_some()
    }

    /// Stages a feature, folding it with any edit already staged for the
    /// same id:
    /// - a `Delete` staged over a pending `Add` removes the pending feature
    ///   entirely, since the stored dataset never saw it;
    /// - a `Delete` staged over a pending `Delete` flips the entry back to
    ///   `Update`, so marking twice un-marks;
    /// - anything else replaces the staged feature with the incoming one.
    pub fn add_feature(&mut self, feature: Feature) {
        match self.position_of(&feature.id) {
            None => self.features.push(feature),
            Some(i) => {
                let staged_type = self.features[i].feature_type;
                match (staged_type, feature.feature_type) {
                    (FeatureType::Add, FeatureType::Delete) => {
                        self.features.remove(i);
                    }
                    (FeatureType::Delete, FeatureType::Delete) => {
                        self.features[i].feature_type = FeatureType::Update;
                    }
                    (FeatureType::Add, _) => {
                        // the dataset never saw this feature, so whatever
                        // happens to it stays an Add
                        self.features[i] = feature;
                        self.features[i].feature_type = FeatureType::Add;
                    }
                    _ => {
                        self.features[i] = feature;
                    }
                }
            }
        }
    }

    /// Inserts or replaces the staged entry for the feature's id without
    /// applying the fold rules. Used when replaying undo snapshots, which
    /// must restore staged state verbatim.
    pub fn set_feature(&mut self, feature: Feature) {
        match self.position_of(&feature.id) {
            Some(i) => self.features[i] = feature,
            None => self.features.push(feature),
        }
    }

    pub fn remove_feature(&mut self, id: &ObjectId) -> Option<Feature> {
        self.position_of(id).map(|i| self.features.remove(i))
    }

    pub fn clear(&mut self) {
        self.features.clear();
    }

    /// Drops staged edits of persisted features, keeping pending `Add`s,
    /// which have no stored counterpart to fall back to.
    pub fn clear_edited(&mut self) {
        self.features
            .retain(|f| f.feature_type == FeatureType::Add);
    }

    /// All staged features whose extent overlaps the query box.
    pub fn get_features(&self, env: &BoundingBox) -> Vec<&Feature> {
        self.features
            .iter()
            .filter(|f| f.geometry.get_bounding_box().overlaps(*env))
            .collect()
    }

    /// The first staged feature satisfying the refined pick test for the
    /// query box.
    pub fn get_geometry(&self, env: &BoundingBox) -> Option<&Feature> {
        self.features
            .iter()
            .find(|f| pick_matches(&f.geometry, env))
    }
}

/// The pick refinement applied after a bbox hit: the geometry contains the
/// query centre, an edge of it crosses the query region, or it lies
/// entirely within the region. Coarser than exact point picking, but cheap
/// and shape-type independent.
pub fn pick_matches(geometry: &VectorGeometry, env: &BoundingBox) -> bool {
    if !geometry.get_bounding_box().overlaps(*env) {
        return false;
    }
    if geometry.shape_type.base_shape_type() == ShapeType::Polygon
        && geometry.contains_point(&env.get_centre())
    {
        return true;
    }
    if geometry.intersects_box(env) {
        return true;
    }
    env.contains(geometry.get_bounding_box())
}

#[cfg(test)]
mod test {
    use super::Repository;
    use crate::edit::{Feature, FeatureType, ObjectId};
    use crate::structures::{BoundingBox, Point2D};
    use crate::vector::{ShapeType, VectorGeometry};

    fn point_feature(id: &str, x: f64, y: f64, feature_type: FeatureType) -> Feature {
        let mut geometry = VectorGeometry::new(ShapeType::Point);
        geometry.add_point(Point2D::new(x, y));
        Feature::new(ObjectId::new(id), geometry, feature_type)
    }

    #[test]
    fn test_delete_over_add_drops_feature() {
        let mut repo = Repository::new("layer");
        repo.add_feature(point_feature("1", 0.0, 0.0, FeatureType::Add));
        repo.add_feature(point_feature("1", 0.0, 0.0, FeatureType::Delete));
        assert!(repo.is_empty());
    }

    #[test]
    fn test_delete_twice_toggles_to_update() {
        let mut repo = Repository::new("layer");
        repo.add_feature(point_feature("1", 0.0, 0.0, FeatureType::Update));
        repo.add_feature(point_feature("1", 0.0, 0.0, FeatureType::Delete));
        repo.add_feature(point_feature("1", 0.0, 0.0, FeatureType::Delete));
        let staged = repo.get_feature(&ObjectId::new("1")).unwrap();
        assert_eq!(staged.feature_type, FeatureType::Update);
    }

    #[test]
    fn test_update_over_add_stays_add() {
        let mut repo = Repository::new("layer");
        repo.add_feature(point_feature("1", 0.0, 0.0, FeatureType::Add));
        repo.add_feature(point_feature("1", 5.0, 5.0, FeatureType::Update));
        let staged = repo.get_feature(&ObjectId::new("1")).unwrap();
        assert_eq!(staged.feature_type, FeatureType::Add);
        assert_eq!(staged.geometry.points[0], Point2D::new(5.0, 5.0));
    }

    #[test]
    fn test_clear_edited_keeps_adds() {
        let mut repo = Repository::new("layer");
        repo.add_feature(point_feature("1", 0.0, 0.0, FeatureType::Add));
        repo.add_feature(point_feature("2", 1.0, 1.0, FeatureType::Update));
        repo.add_feature(point_feature("3", 2.0, 2.0, FeatureType::Delete));
        repo.clear_edited();
        assert_eq!(repo.len(), 1);
        assert!(repo.has_identifier(&ObjectId::new("1")));
    }

    #[test]
    fn test_get_features_bbox_filter() {
        let mut repo = Repository::new("layer");
        repo.add_feature(point_feature("1", 0.0, 0.0, FeatureType::Add));
        repo.add_feature(point_feature("2", 100.0, 100.0, FeatureType::Add));
        let hits = repo.get_features(&BoundingBox::new(-1.0, 1.0, -1.0, 1.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ObjectId::new("1"));
    }
}
