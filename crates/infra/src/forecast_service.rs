//! Forecast generation: history -> daily series -> model -> store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use shelterflow_core::PairKey;
use shelterflow_forecasting::{Forecast, ForecastError, ForecastModel, ForecastRequest, preprocess_daily};

use crate::error::PortError;
use crate::history::UsageHistory;
use crate::store::ForecastStore;

#[derive(Debug, Error)]
pub enum ForecastServiceError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("storage error: {0}")]
    Port(#[from] PortError),
}

/// Produces and persists forecasts for (location, item) pairs.
#[derive(Clone)]
pub struct ForecastService {
    history: Arc<dyn UsageHistory>,
    store: Arc<dyn ForecastStore>,
    model: Arc<dyn ForecastModel>,
}

impl ForecastService {
    pub fn new(
        history: Arc<dyn UsageHistory>,
        store: Arc<dyn ForecastStore>,
        model: Arc<dyn ForecastModel>,
    ) -> Self {
        Self {
            history,
            store,
            model,
        }
    }

    /// Validate the request, forecast the requested range and store the result
    /// as the latest forecast for the pair.
    pub async fn generate(
        &self,
        request: &ForecastRequest,
        now: DateTime<Utc>,
    ) -> Result<Forecast, ForecastServiceError> {
        let request = request.validate()?;
        let pair = request.pair.clone();

        let samples = self.history.samples(&pair).await?;
        let daily = preprocess_daily(&samples);
        if daily.is_empty() {
            warn!(pair = %pair, samples = samples.len(), "no usable usage history");
            return Err(ForecastError::InsufficientHistory(pair.to_string()).into());
        }

        let horizon = request.horizon_days();
        let output = self.model.predict(&daily, horizon)?;
        let forecast = Forecast::new(pair.clone(), output.predictions, output.confidence_intervals, now)?;

        self.store.put(&forecast).await?;

        info!(
            pair = %pair,
            model = self.model.name(),
            history_days = daily.len(),
            horizon,
            "forecast generated"
        );

        Ok(forecast)
    }

    pub async fn latest(&self, pair: &PairKey) -> Result<Option<Forecast>, PortError> {
        self.store.latest(pair).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use shelterflow_forecasting::{MovingAverageModel, UsageSample};

    use crate::history::InMemoryUsageHistory;
    use crate::store::InMemoryForecastStore;

    fn request(shelter: &str, item: &str, start: &str, end: &str) -> ForecastRequest {
        ForecastRequest {
            shelter_id: shelter.to_string(),
            item_id: item.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    fn service(history: Arc<InMemoryUsageHistory>, store: Arc<InMemoryForecastStore>) -> ForecastService {
        ForecastService::new(history, store, Arc::new(MovingAverageModel::new()))
    }

    #[tokio::test]
    async fn generates_and_persists_forecast() {
        let history = Arc::new(InMemoryUsageHistory::new());
        let store = Arc::new(InMemoryForecastStore::new());
        let pair = PairKey::parse("shelter-1", "blankets").unwrap();

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        history.record(
            pair.clone(),
            (0..30).map(|d| UsageSample::new(start + Duration::days(d), 100.0)),
        );

        let svc = service(history, store.clone());
        let forecast = svc
            .generate(&request("shelter-1", "blankets", "2024-02-01", "2024-02-07"), Utc::now())
            .await
            .unwrap();

        assert_eq!(forecast.predictions(), &[100.0; 7]);
        assert_eq!(forecast.confidence_intervals().len(), 7);
        assert_eq!(store.latest(&pair).await.unwrap(), Some(forecast.clone()));
        assert_eq!(svc.latest(&pair).await.unwrap(), Some(forecast));
    }

    #[tokio::test]
    async fn missing_history_is_reported() {
        let svc = service(Arc::new(InMemoryUsageHistory::new()), Arc::new(InMemoryForecastStore::new()));
        let err = svc
            .generate(&request("shelter-1", "food", "2024-01-01", "2024-01-07"), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ForecastServiceError::Forecast(ForecastError::InsufficientHistory(_))
        ));
    }

    #[tokio::test]
    async fn invalid_request_never_touches_storage() {
        let store = Arc::new(InMemoryForecastStore::new());
        let svc = service(Arc::new(InMemoryUsageHistory::new()), store.clone());
        let err = svc
            .generate(&request("shelter-1", "food", "invalid-date", "2024-01-14"), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastServiceError::Forecast(ForecastError::InvalidRequest(_))));
    }
}
