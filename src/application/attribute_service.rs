// Attribute service - What the wizard can offer for each collection
use crate::application::lab_repository::LabRepository;
use crate::domain::graph::Collection;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct AttributeService {
    repository: Arc<dyn LabRepository>,
}

impl AttributeService {
    pub fn new(repository: Arc<dyn LabRepository>) -> Self {
        Self { repository }
    }

    /// Plottable attributes, bookkeeping columns removed. Errors yield an empty list.
    pub async fn collection_attrs(&self, collection: Collection) -> Vec<String> {
        match self.repository.collection_attrs(collection).await {
            Ok(attrs) => {
                let excluded = collection.excluded_attributes();
                attrs
                    .into_iter()
                    .filter(|a| !excluded.contains(&a.as_str()))
                    .collect()
            }
            Err(e) => {
                tracing::error!(collection = collection.as_str(), "Error fetching attributes: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Filter dropdown options. Numbers stay numbers so a chosen value matches its cells.
    pub async fn attr_values(&self, attribute: &str, collection: Collection) -> Vec<Value> {
        match self.repository.attr_values(attribute, collection).await {
            Ok(values) => values,
            Err(e) => {
                tracing::error!(
                    collection = collection.as_str(),
                    attribute,
                    "Error fetching attribute values: {:#}",
                    e
                );
                Vec::new()
            }
        }
    }

    pub async fn filter_dates(
        &self,
        collection: Collection,
        attribute: Option<&str>,
        value: Option<&Value>,
    ) -> Vec<String> {
        match self.repository.filter_dates(collection, attribute, value).await {
            Ok(dates) => dates,
            Err(e) => {
                tracing::error!(collection = collection.as_str(), "Error fetching dates: {:#}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::lab_repository::fake::FakeRepository;
    use serde_json::json;

    fn attrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_data_exclusions() {
        let repository = FakeRepository {
            attrs: attrs(&["_id", "experimentId", "#", "dataSheetId", "Time", "Flow", "Notes"]),
            ..FakeRepository::default()
        };
        let service = AttributeService::new(Arc::new(repository));
        assert_eq!(
            service.collection_attrs(Collection::Data).await,
            attrs(&["Time", "Flow", "Notes"])
        );
    }

    #[tokio::test]
    async fn test_experiment_exclusions() {
        let repository = FakeRepository {
            attrs: attrs(&["_id", "#", "Notes", "dataSheetId", "Temperature"]),
            ..FakeRepository::default()
        };
        let service = AttributeService::new(Arc::new(repository));
        assert_eq!(
            service.collection_attrs(Collection::Experiments).await,
            attrs(&["dataSheetId", "Temperature"])
        );
    }

    #[tokio::test]
    async fn test_attr_values_keep_json_types() {
        let repository = FakeRepository {
            values: vec![json!(7), json!(7.5), json!("n/a")],
            ..FakeRepository::default()
        };
        let service = AttributeService::new(Arc::new(repository));
        assert_eq!(
            service.attr_values("pH", Collection::Data).await,
            vec![json!(7), json!(7.5), json!("n/a")]
        );
    }

    #[tokio::test]
    async fn test_errors_become_empty_lists() {
        let repository = FakeRepository {
            attrs: attrs(&["Time"]),
            fail: true,
            ..FakeRepository::default()
        };
        let service = AttributeService::new(Arc::new(repository));
        assert!(service.collection_attrs(Collection::Data).await.is_empty());
        assert!(service.attr_values("Time", Collection::Data).await.is_empty());
        assert!(service.filter_dates(Collection::Experiments, None, None).await.is_empty());
    }
}
