// Repository trait for the external lab data service
use crate::domain::graph::{Collection, NewGraph, RegressionResult, Row, SavedGraph};
use async_trait::async_trait;
use serde_json::Value;

/// Parameters of a row fetch
#[derive(Debug, Clone, PartialEq)]
pub struct DataQuery {
    pub collection: Collection,
    pub attributes: [String; 2],
    pub dates: Vec<String>,
    pub analysis: bool,
}

/// Rows plus the backend's regression analysis, when one was asked for and succeeded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredData {
    pub rows: Vec<Row>,
    pub analysis: Option<RegressionResult>,
}

#[async_trait]
pub trait LabRepository: Send + Sync {
    /// Raw attribute names of a collection, exclusions not applied
    async fn collection_attrs(&self, collection: Collection) -> anyhow::Result<Vec<String>>;

    /// Distinct values of an attribute, with their JSON types kept
    async fn attr_values(&self, attribute: &str, collection: Collection) -> anyhow::Result<Vec<Value>>;

    /// Experiment dates matching an optional attribute/value filter
    async fn filter_dates(
        &self,
        collection: Collection,
        attribute: Option<&str>,
        value: Option<&Value>,
    ) -> anyhow::Result<Vec<String>>;

    async fn filter_collection_data(&self, query: &DataQuery) -> anyhow::Result<FilteredData>;

    async fn add_generated_graph(&self, graph: &NewGraph) -> anyhow::Result<()>;

    /// Most recent saved graphs; `0` means all of them
    async fn latest_graphs(&self, latest: u32) -> anyhow::Result<Vec<SavedGraph>>;

    async fn remove_graph(&self, id: i64) -> anyhow::Result<()>;
}
