use crate::client::ControllerClient;
use logstitch_core::{PageFetcher, PageRequest};
use logstitch_types::{DEFAULT_TIMESTAMP_FIELD, Record};

/// [`PageFetcher`] backed by the controller's analytics logs endpoint.
pub struct HttpPageFetcher {
    client: ControllerClient,
    timestamp_field: String,
}

impl HttpPageFetcher {
    pub fn new(client: ControllerClient) -> Self {
        Self {
            client,
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
        }
    }

    pub fn with_timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.timestamp_field = field.into();
        self
    }

    pub fn client(&self) -> &ControllerClient {
        &self.client
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch(&mut self, request: &PageRequest<'_>) -> logstitch_core::Result<Vec<Record>> {
        let response = self.client.fetch_logs(request)?;
        log::debug!(
            "received {} of {} available records",
            response.results.len(),
            response
                .count
                .map_or_else(|| "?".to_string(), |count| count.to_string())
        );
        response
            .results
            .into_iter()
            .map(|value| Record::from_json(value, &self.timestamp_field).map_err(Into::into))
            .collect()
    }
}
