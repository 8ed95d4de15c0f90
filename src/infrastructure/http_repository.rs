// HTTP repository implementation against the lab data service
use crate::application::lab_repository::{DataQuery, FilteredData, LabRepository};
use crate::domain::graph::{Collection, GraphProperties, GraphType, NewGraph, RegressionResult, Row, SavedGraph};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpLabRepository {
    client: reqwest::Client,
    base_url: String,
}

/// `{status, data?, message?}` reply shape shared by most endpoints
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    data: Option<T>,
    message: Option<String>,
    #[serde(rename = "analysisRes")]
    analysis: Option<Value>,
}

impl<T> Envelope<T> {
    fn into_data(self, what: &str) -> Result<T> {
        if self.status != "success" {
            anyhow::bail!(
                "{} failed: {}",
                what,
                self.message.unwrap_or_else(|| self.status.clone())
            );
        }
        self.data.with_context(|| format!("{} returned no data", what))
    }
}

#[derive(Serialize)]
struct CollectionBody<'a> {
    collection: &'a str,
}

#[derive(Serialize)]
struct AttrValuesBody<'a> {
    attribute: &'a str,
    collection: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DatesBody<'a> {
    collection: &'a str,
    attribute: &'a str,
    /// Matched by type: `7` and `"7"` select different cells
    filter_value: &'a Value,
}

#[derive(Serialize)]
struct DataBody<'a> {
    attributes: &'a [String; 2],
    collection: &'a str,
    dates: &'a [String],
    analysis: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveBody<'a> {
    graph_type: &'a str,
    data: &'a [Row],
    properties: [&'a GraphProperties; 1],
    attributes: &'a [String; 2],
}

#[derive(Serialize)]
struct LatestBody {
    latest: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveBody {
    graph_id: i64,
}

/// Stored graph record; properties are kept as a one-element list
#[derive(Debug, Deserialize)]
struct GraphRecord {
    #[serde(rename = "_id")]
    id: i64,
    graphtype: GraphType,
    #[serde(default)]
    data: Vec<Row>,
    #[serde(default)]
    properties: Vec<GraphProperties>,
    #[serde(default)]
    attributes: Vec<String>,
}

impl GraphRecord {
    fn into_saved(self) -> SavedGraph {
        let mut attributes = self.attributes.into_iter();
        let x = attributes.next().unwrap_or_default();
        let y = attributes.next().unwrap_or_default();
        SavedGraph {
            id: self.id,
            graph_type: self.graphtype,
            data: self.data,
            properties: self.properties.into_iter().next().unwrap_or_default(),
            attributes: [x, y],
        }
    }
}

/// First analysis entry, if it is a usable coefficient set
fn parse_analysis(raw: Option<Value>) -> Option<RegressionResult> {
    let raw = raw?;
    let first = match raw {
        Value::Array(items) => items.into_iter().next()?,
        Value::String(reason) => {
            tracing::warn!("Data service could not run the analysis: {}", reason);
            return None;
        }
        other => other,
    };
    match serde_json::from_value::<RegressionResult>(first) {
        Ok(result) => Some(result),
        Err(e) => {
            tracing::warn!("Ignoring malformed analysis result: {}", e);
            None
        }
    }
}

impl HttpLabRepository {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn call<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "Calling data service");

        let response = self
            .client
            .request(method, &url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} failed with status {}: {}", path, status, body);
        }

        response
            .json::<R>()
            .await
            .with_context(|| format!("Failed to parse response from {}", path))
    }
}

#[async_trait]
impl LabRepository for HttpLabRepository {
    async fn collection_attrs(&self, collection: Collection) -> Result<Vec<String>> {
        let body = CollectionBody {
            collection: collection.as_str(),
        };
        let envelope: Envelope<Vec<String>> = self.call(Method::POST, "/getAttrs", &body).await?;
        envelope.into_data("getAttrs")
    }

    async fn attr_values(&self, attribute: &str, collection: Collection) -> Result<Vec<Value>> {
        let body = AttrValuesBody {
            attribute,
            collection: collection.as_str(),
        };
        let envelope: Envelope<Vec<Value>> = self
            .call(Method::POST, "/filterCollectionData/attrValues", &body)
            .await?;
        envelope.into_data("attrValues")
    }

    async fn filter_dates(
        &self,
        collection: Collection,
        attribute: Option<&str>,
        value: Option<&Value>,
    ) -> Result<Vec<String>> {
        // an empty string asks for every date
        let unfiltered = Value::String(String::new());
        let body = DatesBody {
            collection: collection.as_str(),
            attribute: attribute.unwrap_or_default(),
            filter_value: value.unwrap_or(&unfiltered),
        };
        let envelope: Envelope<Vec<String>> = self
            .call(Method::POST, "/getFilterCollectionDates", &body)
            .await?;
        envelope.into_data("getFilterCollectionDates")
    }

    async fn filter_collection_data(&self, query: &DataQuery) -> Result<FilteredData> {
        let body = DataBody {
            attributes: &query.attributes,
            collection: query.collection.as_str(),
            dates: &query.dates,
            analysis: query.analysis,
        };
        let mut envelope: Envelope<Vec<Row>> = self
            .call(Method::POST, "/filterCollectionData", &body)
            .await?;
        let analysis = parse_analysis(envelope.analysis.take());
        Ok(FilteredData {
            rows: envelope.into_data("filterCollectionData")?,
            analysis,
        })
    }

    async fn add_generated_graph(&self, graph: &NewGraph) -> Result<()> {
        let body = SaveBody {
            graph_type: graph.graph_type.as_str(),
            data: &graph.data,
            properties: [&graph.properties],
            attributes: &graph.attributes,
        };
        let envelope: Envelope<Value> = self.call(Method::PUT, "/generatedGraphs", &body).await?;
        if envelope.status != "success" {
            anyhow::bail!(
                "generatedGraphs failed: {}",
                envelope.message.unwrap_or(envelope.status)
            );
        }
        Ok(())
    }

    async fn latest_graphs(&self, latest: u32) -> Result<Vec<SavedGraph>> {
        let records: Vec<GraphRecord> = self
            .call(Method::POST, "/generatedGraphs/latest", &LatestBody { latest })
            .await?;
        Ok(records.into_iter().map(GraphRecord::into_saved).collect())
    }

    async fn remove_graph(&self, id: i64) -> Result<()> {
        let envelope: Envelope<Value> = self
            .call(
                Method::DELETE,
                "/generatedGraphs/remove-graph",
                &RemoveBody { graph_id: id },
            )
            .await?;
        if envelope.status != "success" {
            anyhow::bail!("remove-graph failed: {}", envelope.message.unwrap_or(envelope.status));
        }
        Ok(())
    }
}
