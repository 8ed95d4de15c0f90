// Graph service - Fetch, transform, persist and preview graphs
use crate::application::lab_repository::{DataQuery, FilteredData, LabRepository};
use crate::chart::scene::Scene;
use crate::chart::{draw, Plot, Size};
use crate::domain::display::DisplayProperties;
use crate::domain::graph::{DataPoint, GraphProperties, GraphRequest, GraphType, NewGraph, Row, SavedGraph};
use crate::domain::transform::{regression_line, to_points, RegressionSummary};
use serde::Serialize;
use std::sync::Arc;

/// Result of one submit: transformed points ready to draw, plus the raw rows for saving
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedGraph {
    pub plot: Plot,
    pub rows: Vec<Row>,
    pub attributes: [String; 2],
    pub properties: GraphProperties,
    pub points: Vec<DataPoint>,
    pub summary: Option<RegressionSummary>,
}

/// What the client sees about the current graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub graph_type: GraphType,
    pub attributes: [String; 2],
    pub display: DisplayProperties,
    pub points: usize,
    pub regression: Option<RegressionSummary>,
}

impl GeneratedGraph {
    pub fn build(request: &GraphRequest, data: FilteredData) -> Self {
        let rows = data.rows;
        let points = to_points(&rows, &request.param_x, &request.param_y);

        let analysis = data.analysis.filter(|_| request.graph_type.wants_analysis());
        let regression = analysis.as_ref().and_then(|a| regression_line(&points, a));

        Self {
            plot: Plot::new(request.graph_type, regression),
            rows,
            attributes: request.attributes(),
            properties: request.properties(),
            points,
            summary: analysis.as_ref().map(RegressionSummary::describe),
        }
    }

    pub fn summary(&self) -> GraphSummary {
        let graph_type = self.plot.graph_type();
        GraphSummary {
            graph_type,
            attributes: self.attributes.clone(),
            display: DisplayProperties::resolve(graph_type, &self.properties),
            points: self.points.len(),
            regression: self.summary.clone(),
        }
    }
}

/// Saved graph with the text it will be shown under
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphListing {
    #[serde(flatten)]
    pub graph: SavedGraph,
    pub display: DisplayProperties,
}

#[derive(Clone)]
pub struct GraphService {
    repository: Arc<dyn LabRepository>,
}

impl GraphService {
    pub fn new(repository: Arc<dyn LabRepository>) -> Self {
        Self { repository }
    }

    /// Experiment dates to fetch: the chosen dates narrowed by every axis filter.
    /// `None` when the filters leave no date at all.
    async fn resolve_dates(&self, request: &GraphRequest) -> anyhow::Result<Option<Vec<String>>> {
        let mut dates = (!request.dates.is_empty()).then(|| request.dates.clone());
        for (attribute, value) in request.filters() {
            let matching = self
                .repository
                .filter_dates(request.collection, Some(attribute), Some(value))
                .await?;
            let narrowed: Vec<String> = match dates {
                Some(current) => current.into_iter().filter(|d| matching.contains(d)).collect(),
                None => matching,
            };
            if narrowed.is_empty() {
                return Ok(None);
            }
            dates = Some(narrowed);
        }
        Ok(Some(dates.unwrap_or_default()))
    }

    /// Resolve filters, fetch and transform. A failed fetch yields a graph with no points.
    pub async fn generate(&self, request: &GraphRequest) -> GeneratedGraph {
        let dates = match self.resolve_dates(request).await {
            Ok(Some(dates)) => dates,
            Ok(None) => {
                tracing::info!(
                    collection = request.collection.as_str(),
                    "No experiment dates match the selected filters"
                );
                return GeneratedGraph::build(request, FilteredData::default());
            }
            Err(e) => {
                tracing::error!(
                    collection = request.collection.as_str(),
                    "Error resolving filter dates: {:#}",
                    e
                );
                return GeneratedGraph::build(request, FilteredData::default());
            }
        };

        let query = DataQuery {
            collection: request.collection,
            attributes: request.attributes(),
            dates,
            analysis: request.graph_type.wants_analysis(),
        };

        let data = match self.repository.filter_collection_data(&query).await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(
                    collection = request.collection.as_str(),
                    x = %request.param_x,
                    y = %request.param_y,
                    "Error fetching graph data: {:#}",
                    e
                );
                FilteredData::default()
            }
        };

        GeneratedGraph::build(request, data)
    }

    /// Persist the graph; the regression overlay is never stored.
    pub async fn save(&self, graph: &GeneratedGraph) -> bool {
        let new_graph = NewGraph {
            graph_type: graph.plot.graph_type(),
            data: graph.rows.clone(),
            properties: graph.properties.clone(),
            attributes: graph.attributes.clone(),
        };
        match self.repository.add_generated_graph(&new_graph).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error saving graph: {:#}", e);
                false
            }
        }
    }

    pub async fn list(&self, latest: u32) -> Vec<GraphListing> {
        match self.repository.latest_graphs(latest).await {
            Ok(graphs) => graphs
                .into_iter()
                .map(|graph| GraphListing {
                    display: DisplayProperties::resolve(graph.graph_type, &graph.properties),
                    graph,
                })
                .collect(),
            Err(e) => {
                tracing::error!(latest, "Error listing saved graphs: {:#}", e);
                Vec::new()
            }
        }
    }

    pub async fn find(&self, id: i64) -> Option<SavedGraph> {
        match self.repository.latest_graphs(0).await {
            Ok(graphs) => graphs.into_iter().find(|g| g.id == id),
            Err(e) => {
                tracing::error!(id, "Error looking up saved graph: {:#}", e);
                None
            }
        }
    }

    pub async fn delete(&self, id: i64) -> bool {
        match self.repository.remove_graph(id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(id, "Error removing graph: {:#}", e);
                false
            }
        }
    }
}

/// Redraw a saved graph from its stored rows.
pub fn preview(graph: &SavedGraph, size: Size) -> Scene {
    let [x, y] = &graph.attributes;
    let points = to_points(&graph.data, x, y);
    draw(&Plot::new(graph.graph_type, None), &points, &graph.properties, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::lab_repository::fake::FakeRepository;
    use crate::chart::scene::Role;
    use crate::domain::graph::{AxisRange, Collection, RegressionResult};
    use serde_json::{json, Value};

    fn rows(values: Value) -> Vec<Row> {
        match values {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn request(graph_type: GraphType) -> GraphRequest {
        GraphRequest {
            graph_type,
            collection: Collection::Data,
            param_x: "Time".to_string(),
            param_y: "U Cmm".to_string(),
            filter_x: None,
            filter_y: None,
            dates: Vec::new(),
            x_range: AxisRange::Unset,
            y_range: AxisRange::Unset,
            title: None,
            x_label: None,
            y_label: None,
        }
    }

    fn sample() -> FilteredData {
        FilteredData {
            rows: rows(json!([
                {"Time": "00:00:10", "U Cmm": 3, "Site": "A"},
                {"Time": "00:00:05", "U Cmm": "2.5", "Site": "B"},
                {"Time": "00:00:20", "U Cmm": 4, "Site": "A"},
            ])),
            analysis: Some(RegressionResult {
                slope: 0.1,
                intercept: 2.0,
                r_squared: 0.8,
            }),
        }
    }

    #[tokio::test]
    async fn test_generate_sends_request_attributes() {
        let repository = Arc::new(FakeRepository {
            data: sample(),
            ..FakeRepository::default()
        });
        let service = GraphService::new(repository.clone());
        let graph = service.generate(&request(GraphType::Bar)).await;

        let queries = repository.queries.lock().unwrap().clone();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].attributes, ["Time".to_string(), "U Cmm".to_string()]);
        assert_eq!(queries[0].collection, Collection::Data);
        assert!(!queries[0].analysis);

        assert_eq!(graph.plot, Plot::Bar);
        assert_eq!(graph.points.len(), 3);
        assert_eq!(graph.points[0], DataPoint::new("Point 1", 10.0, 3.0));
        // bar graphs ignore any analysis that comes back
        assert_eq!(graph.summary, None);
    }

    #[tokio::test]
    async fn test_scatter_gets_regression_overlay() {
        let repository = Arc::new(FakeRepository {
            data: sample(),
            ..FakeRepository::default()
        });
        let graph = GraphService::new(repository.clone())
            .generate(&request(GraphType::Scatter))
            .await;

        assert!(repository.queries.lock().unwrap()[0].analysis);
        let Plot::Scatter {
            regression: Some([start, end]),
        } = &graph.plot
        else {
            panic!("scatter graph should carry a regression line");
        };
        assert_eq!((start.x, end.x), (5.0, 20.0));
        assert_eq!(end.y, 0.1 * 20.0 + 2.0);

        let summary = graph.summary.as_ref().map(|s| (s.equation.as_str(), s.fit));
        assert_eq!(summary, Some(("y = 0.10x + 2.00", "moderate to strong")));
    }

    fn ph_rows() -> FilteredData {
        FilteredData {
            rows: rows(json!([
                {"pH": 7, "Temp": 15},
                {"pH": 8, "Temp": 17},
                {"pH": 7, "Temp": 16},
                {"pH": 9, "Temp": 19},
            ])),
            analysis: Some(RegressionResult {
                slope: 2.0,
                intercept: 1.0,
                r_squared: 0.9,
            }),
        }
    }

    fn ph_request() -> GraphRequest {
        GraphRequest {
            param_x: "pH".to_string(),
            param_y: "Temp".to_string(),
            ..request(GraphType::Scatter)
        }
    }

    #[tokio::test]
    async fn test_filter_selects_dates_not_rows() {
        let repository = Arc::new(FakeRepository {
            data: ph_rows(),
            dates_by_value: vec![(json!(7), vec!["2025-01-01".to_string(), "2025-01-03".to_string()])],
            ..FakeRepository::default()
        });
        let mut req = ph_request();
        req.filter_x = Some(json!(7));
        let graph = GraphService::new(repository.clone()).generate(&req).await;

        assert_eq!(
            *repository.date_filters.lock().unwrap(),
            vec![("pH".to_string(), json!(7))]
        );
        assert_eq!(
            repository.queries.lock().unwrap()[0].dates,
            vec!["2025-01-01", "2025-01-03"]
        );
        // every row of the matching experiments is plotted
        assert_eq!(graph.points.len(), 4);
        let Plot::Scatter {
            regression: Some([start, end]),
        } = &graph.plot
        else {
            panic!("scatter graph should carry a regression line");
        };
        assert_eq!((start.x, end.x), (7.0, 9.0));
        assert_eq!((start.y, end.y), (15.0, 19.0));
        assert_eq!(graph.summary().display.title, "Data for 7");
    }

    #[tokio::test]
    async fn test_filters_narrow_chosen_dates() {
        let repository = Arc::new(FakeRepository {
            data: ph_rows(),
            dates_by_value: vec![
                (json!(7), vec!["2025-01-01".to_string(), "2025-01-03".to_string()]),
                (json!(16), vec!["2025-01-03".to_string()]),
            ],
            ..FakeRepository::default()
        });
        let mut req = ph_request();
        req.dates = vec!["2025-01-02".to_string(), "2025-01-03".to_string()];
        req.filter_x = Some(json!(7));
        req.filter_y = Some(json!(16));
        GraphService::new(repository.clone()).generate(&req).await;

        assert_eq!(repository.date_filters.lock().unwrap().len(), 2);
        assert_eq!(repository.queries.lock().unwrap()[0].dates, vec!["2025-01-03"]);
    }

    #[tokio::test]
    async fn test_unmatched_filter_skips_fetch() {
        let repository = Arc::new(FakeRepository {
            data: ph_rows(),
            dates_by_value: vec![(json!(7), Vec::new())],
            ..FakeRepository::default()
        });
        let mut req = ph_request();
        req.filter_x = Some(json!(7));
        let graph = GraphService::new(repository.clone()).generate(&req).await;

        assert!(repository.queries.lock().unwrap().is_empty());
        assert!(graph.points.is_empty());
        assert_eq!(graph.plot, Plot::Scatter { regression: None });
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty_graph() {
        let repository = FakeRepository {
            fail: true,
            ..FakeRepository::default()
        };
        let graph = GraphService::new(Arc::new(repository))
            .generate(&request(GraphType::Line))
            .await;
        assert!(graph.points.is_empty());
        assert_eq!(graph.summary().display.title, "Line Graph");
    }

    #[tokio::test]
    async fn test_save_list_and_delete() {
        let repository = Arc::new(FakeRepository::default());
        let service = GraphService::new(repository.clone());
        let graph = GeneratedGraph::build(&request(GraphType::Scatter), sample());

        assert!(service.save(&graph).await);
        let stored = repository.saved.lock().unwrap()[0].clone();
        assert_eq!(stored.graph_type, GraphType::Scatter);
        assert_eq!(stored.data.len(), 3);

        let listed = service.list(0).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].display.x_label, "Time");
        assert_eq!(listed[0].display.y_label, "Y Axis");
        assert_eq!(listed[0].display.title, "Scatter Graph");

        let found = service.find(listed[0].graph.id).await;
        let scene = found.map(|g| preview(&g, Size::new(800.0, 600.0)));
        assert_eq!(
            scene.as_ref().and_then(|s| s.text(Role::Title)),
            Some("Scatter Graph")
        );
        // stored graphs never carry the overlay
        assert_eq!(scene.map(|s| s.with_role(Role::Regression).count()), Some(0));

        assert!(service.delete(7).await);
        assert_eq!(*repository.removed.lock().unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_persistence_failures_are_false() {
        let repository = FakeRepository {
            fail: true,
            ..FakeRepository::default()
        };
        let service = GraphService::new(Arc::new(repository));
        let graph = GeneratedGraph::build(&request(GraphType::Bar), sample());
        assert!(!service.save(&graph).await);
        assert!(!service.delete(1).await);
        assert!(service.list(5).await.is_empty());
    }
}
