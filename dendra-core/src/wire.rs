//! Serde records exchanged with the clustering service.
//!
//! The service receives the points of one dataset and returns a merge tree,
//! the ordered merge-step log and the final flat clusters. Field names are
//! camelCase on the wire. The conversions into [`MergeNode`] and
//! [`MergeStep`] reject values the engines cannot work with and normalise the
//! rest: a node with a single child collapses into that child, and internal
//! member sets are recomputed from the children.

use serde::{Deserialize, Serialize};

use crate::{
    error::WireError,
    partition::ClusterPartition,
    point::{Attributes, PointRecord},
    replay::{MergeStep, StepAction},
    tree::MergeNode,
};

/// Request body asking the service to cluster a dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteringRequest {
    /// Dataset identifier.
    pub dataset: String,
    /// Linkage algorithm identifier.
    pub algorithm: String,
    /// Points in dataset order.
    pub data_points: Vec<WirePoint>,
}

impl ClusteringRequest {
    /// Builds a request for `points`.
    #[must_use]
    pub fn new(
        dataset: impl Into<String>,
        algorithm: impl Into<String>,
        points: &[PointRecord],
    ) -> Self {
        Self {
            dataset: dataset.into(),
            algorithm: algorithm.into(),
            data_points: points.iter().map(WirePoint::from).collect(),
        }
    }
}

/// A point as sent to the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WirePoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Opaque attributes.
    #[serde(default)]
    pub data: Attributes,
}

impl From<&PointRecord> for WirePoint {
    fn from(record: &PointRecord) -> Self {
        Self {
            x: record.x,
            y: record.y,
            data: record.attributes.clone(),
        }
    }
}

/// Response body of the clustering service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteringResponse {
    /// Merge tree; absent when the service could not build one.
    #[serde(default)]
    pub dendrogram: Option<WireNode>,
    /// Merge-step log ending in the completion marker.
    #[serde(default)]
    pub steps: Vec<WireStep>,
    /// Flat clusters of the final state.
    #[serde(default)]
    pub final_clusters: Vec<Vec<usize>>,
}

impl ClusteringResponse {
    /// Converts the dendrogram, if any.
    ///
    /// # Errors
    /// Propagates the errors of the [`MergeNode`] conversion.
    pub fn tree(&self) -> Result<Option<MergeNode>, WireError> {
        self.dendrogram.as_ref().map(MergeNode::try_from).transpose()
    }

    /// Converts the step log.
    ///
    /// # Errors
    /// Returns [`WireError::NonFiniteDistance`] for the first step whose
    /// distance is NaN or infinite.
    pub fn merge_steps(&self) -> Result<Vec<MergeStep>, WireError> {
        self.steps
            .iter()
            .enumerate()
            .map(|(position, step)| step.to_step(position))
            .collect()
    }

    /// Final clusters as reported, without validation.
    #[must_use]
    pub fn final_partition(&self) -> ClusterPartition {
        ClusterPartition::from_clusters(self.final_clusters.clone())
    }
}

/// A merge tree node as serialised by the service.
///
/// Leaves carry a label and their point index as the first entry of
/// `indices`; internal nodes carry both children and a height.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireNode {
    /// First child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<WireNode>>,
    /// Second child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<WireNode>>,
    /// Merge height; zero for leaves.
    #[serde(default)]
    pub height: f64,
    /// Leaf label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Point indices below this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<usize>>,
}

impl From<&MergeNode> for WireNode {
    fn from(node: &MergeNode) -> Self {
        match node {
            MergeNode::Leaf { index, label } => Self {
                label: Some(label.clone()),
                indices: Some(vec![*index]),
                ..Self::default()
            },
            MergeNode::Internal {
                height,
                left,
                right,
                members,
            } => Self {
                left: Some(Box::new(Self::from(left.as_ref()))),
                right: Some(Box::new(Self::from(right.as_ref()))),
                height: *height,
                label: None,
                indices: Some(members.clone()),
            },
        }
    }
}

impl TryFrom<&WireNode> for MergeNode {
    type Error = WireError;

    fn try_from(node: &WireNode) -> Result<Self, Self::Error> {
        match (node.left.as_deref(), node.right.as_deref()) {
            (Some(left), Some(right)) => {
                if !node.height.is_finite() {
                    return Err(WireError::NonFiniteHeight {
                        height: node.height,
                    });
                }
                Ok(Self::merge(
                    node.height,
                    Self::try_from(left)?,
                    Self::try_from(right)?,
                ))
            }
            (Some(only), None) | (None, Some(only)) => Self::try_from(only),
            (None, None) => {
                let index = node
                    .indices
                    .as_ref()
                    .and_then(|indices| indices.first().copied())
                    .ok_or_else(|| WireError::LeafWithoutIndex {
                        label: node.label.clone().unwrap_or_default(),
                    })?;
                let label = node.label.clone().unwrap_or_else(|| index.to_string());
                Ok(Self::leaf(index, label))
            }
        }
    }
}

/// A merge-step log entry as serialised by the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStep {
    /// Members of the first merged cluster.
    #[serde(default)]
    pub cluster1: Vec<usize>,
    /// Members of the second merged cluster.
    #[serde(default)]
    pub cluster2: Vec<usize>,
    /// Members of the resulting cluster.
    #[serde(default)]
    pub merged_cluster: Vec<usize>,
    /// Merge distance.
    pub distance: f64,
    /// Step kind; `"connect"` is accepted for merges.
    pub action: StepAction,
}

impl WireStep {
    fn to_step(&self, position: usize) -> Result<MergeStep, WireError> {
        if !self.distance.is_finite() {
            return Err(WireError::NonFiniteDistance {
                position,
                distance: self.distance,
            });
        }
        Ok(MergeStep::from_parts(
            self.cluster1.clone(),
            self.cluster2.clone(),
            self.merged_cluster.clone(),
            self.distance,
            self.action,
        ))
    }
}

impl From<&MergeStep> for WireStep {
    fn from(step: &MergeStep) -> Self {
        Self {
            cluster1: step.side_a().to_vec(),
            cluster2: step.side_b().to_vec(),
            merged_cluster: step.merged().to_vec(),
            distance: step.distance(),
            action: step.action(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{scenario_steps, scenario_tree};

    #[test]
    fn parses_service_response() {
        let response: ClusteringResponse = serde_json::from_value(json!({
            "dendrogram": {
                "height": 2.0,
                "left": { "label": "a", "indices": [0], "height": 0 },
                "right": { "label": "b", "indices": [1] },
                "indices": [0, 1]
            },
            "steps": [
                { "cluster1": [0], "cluster2": [1], "mergedCluster": [0, 1], "distance": 2.0, "action": "connect" },
                { "mergedCluster": [0, 1], "distance": 2.0, "action": "complete" }
            ],
            "finalClusters": [[0, 1]]
        }))
        .expect("valid payload");

        let tree = response.tree().expect("valid tree").expect("tree present");
        assert_eq!(tree.height(), 2.0);
        assert_eq!(tree.leaf_labels_in_order(), vec!["a", "b"]);

        let steps = response.merge_steps().expect("valid steps");
        assert_eq!(steps[0].action(), StepAction::Merge);
        assert_eq!(steps[1].action(), StepAction::Complete);
        assert_eq!(response.final_partition().clusters(), &[vec![0, 1]]);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let response: ClusteringResponse = serde_json::from_str("{}").expect("empty object");
        assert_eq!(response.tree(), Ok(None));
        assert_eq!(response.merge_steps(), Ok(Vec::new()));
        assert!(response.final_partition().is_empty());
    }

    #[test]
    fn single_child_collapses() {
        let node = WireNode {
            height: 9.0,
            right: Some(Box::new(WireNode {
                label: Some("x".to_owned()),
                indices: Some(vec![4]),
                ..WireNode::default()
            })),
            ..WireNode::default()
        };
        assert_eq!(MergeNode::try_from(&node), Ok(MergeNode::leaf(4, "x")));
    }

    #[test]
    fn unlabeled_leaf_uses_its_index() {
        let node = WireNode {
            indices: Some(vec![7, 8]),
            ..WireNode::default()
        };
        assert_eq!(MergeNode::try_from(&node), Ok(MergeNode::leaf(7, "7")));
    }

    #[rstest]
    #[case::no_indices(None)]
    #[case::empty_indices(Some(Vec::new()))]
    fn leaf_without_index_is_rejected(#[case] indices: Option<Vec<usize>>) {
        let node = WireNode {
            label: Some("ghost".to_owned()),
            indices,
            ..WireNode::default()
        };
        assert_eq!(
            MergeNode::try_from(&node),
            Err(WireError::LeafWithoutIndex {
                label: "ghost".to_owned()
            })
        );
    }

    #[test]
    fn non_finite_height_is_rejected() {
        let leaf = |index: usize| {
            Some(Box::new(WireNode {
                indices: Some(vec![index]),
                ..WireNode::default()
            }))
        };
        let node = WireNode {
            left: leaf(0),
            right: leaf(1),
            height: f64::INFINITY,
            ..WireNode::default()
        };
        let err = MergeNode::try_from(&node).expect_err("infinite height");
        assert_eq!(err.code().as_str(), "WIRE_NON_FINITE_HEIGHT");
    }

    #[test]
    fn non_finite_distance_names_the_step() {
        let response = ClusteringResponse {
            steps: vec![
                WireStep::from(&MergeStep::merge(vec![0], vec![1], 1.0)),
                WireStep::from(&MergeStep::merge(vec![0, 1], vec![2], f64::NAN)),
            ],
            ..ClusteringResponse::default()
        };
        let err = response.merge_steps().expect_err("NaN distance");
        assert!(matches!(err, WireError::NonFiniteDistance { position: 1, .. }));
    }

    #[test]
    fn core_model_survives_the_wire() {
        let response = ClusteringResponse {
            dendrogram: Some(WireNode::from(&scenario_tree())),
            steps: scenario_steps().iter().map(WireStep::from).collect(),
            final_clusters: vec![vec![0, 1, 2, 3]],
        };
        let text = serde_json::to_string(&response).expect("serialisable");
        assert!(text.contains("\"mergedCluster\""));
        assert!(text.contains("\"finalClusters\""));
        let back: ClusteringResponse = serde_json::from_str(&text).expect("parsable");
        assert_eq!(back.tree(), Ok(Some(scenario_tree())));
        assert_eq!(back.merge_steps(), Ok(scenario_steps()));
    }

    #[test]
    fn request_uses_camel_case() {
        let points = [PointRecord::new("a", 1.0, 2.0).with_number("age", 3.0)];
        let value = serde_json::to_value(ClusteringRequest::new("medical", "single", &points))
            .expect("serialisable");
        assert_eq!(
            value,
            json!({
                "dataset": "medical",
                "algorithm": "single",
                "dataPoints": [{ "x": 1.0, "y": 2.0, "data": { "age": 3.0 } }]
            })
        );
    }
}
