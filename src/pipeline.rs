//! Per-click orchestration and the displayed-result slot
//!
//! Each map click runs one independent pipeline:
//! validate → weather → build request → predict → classify.
//! Outcomes are values tagged with the sequence number taken when the click
//! was submitted. The [`ResultBoard`] keeps only the outcome of the most
//! recently submitted click; anything older is dropped when it arrives.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::api::{ApiClient, PredictionClient, WeatherFetchAdapter};
use crate::classify::RiskAssessment;
use crate::config::ServiceConfig;
use crate::models::{Coordinate, PredictionRequest, WeatherObservation};
use crate::numeric::NumericInput;
use crate::{Result, RiskMapError};

/// Everything one click produced once its coordinate was valid
#[derive(Debug, Clone)]
pub struct RiskReport {
    pub coordinate: Coordinate,
    /// Always present; fallback-filled when the weather service failed
    pub weather: WeatherObservation,
    /// The classified prediction, or why it could not be made
    pub assessment: std::result::Result<RiskAssessment, RiskMapError>,
}

/// A finished pipeline run, tagged for staleness checks
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub sequence: u64,
    /// `Err` only when the coordinate itself was rejected
    pub report: Result<RiskReport>,
}

/// The chain of stages for one coordinate
#[derive(Debug, Clone)]
pub struct RiskPipeline {
    weather: WeatherFetchAdapter,
    predictor: PredictionClient,
}

impl RiskPipeline {
    pub fn new(weather: WeatherFetchAdapter, predictor: PredictionClient) -> Self {
        Self { weather, predictor }
    }

    /// Build both stages on one shared HTTP client
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let api = ApiClient::new(config)?;
        Ok(Self::new(
            WeatherFetchAdapter::new(api.clone()),
            PredictionClient::new(api),
        ))
    }

    /// Run every stage for one raw coordinate.
    ///
    /// An invalid coordinate fails before any request is sent. After that the
    /// report always carries a weather observation; prediction failures are
    /// kept in `assessment` rather than discarding the weather.
    #[instrument(skip_all)]
    pub async fn run(
        &self,
        latitude: impl NumericInput,
        longitude: impl NumericInput,
    ) -> Result<RiskReport> {
        let coordinate = Coordinate::validate(latitude, longitude)?;
        info!("Assessing risk at {}", coordinate.format_coordinates());

        let weather = self.weather.fetch(&coordinate).await;
        let assessment = self.assess(&coordinate, &weather).await;

        Ok(RiskReport {
            coordinate,
            weather,
            assessment,
        })
    }

    /// Prediction and classification for an already observed coordinate
    pub async fn assess(
        &self,
        coordinate: &Coordinate,
        weather: &WeatherObservation,
    ) -> Result<RiskAssessment> {
        let request = PredictionRequest::build(coordinate, weather)?;
        let result = self.predictor.predict(&request).await?;
        Ok(RiskAssessment::from(result))
    }

    /// Prediction for a details link, whose query string carries all six
    /// request parameters. No weather lookup is made.
    #[instrument(skip_all)]
    pub async fn assess_query(&self, params: &HashMap<String, String>) -> Result<RiskAssessment> {
        let request = PredictionRequest::from_query(params)?;
        let result = self.predictor.predict(&request).await?;
        Ok(RiskAssessment::from(result))
    }

    /// Submit a click: take a ticket, run the pipeline, offer the outcome to
    /// the board. Returns whether the outcome was displayed.
    pub async fn submit(
        &self,
        board: &ResultBoard,
        latitude: impl NumericInput,
        longitude: impl NumericInput,
    ) -> bool {
        let sequence = board.issue();
        let report = self.run(latitude, longitude).await;
        board.publish(PipelineOutcome { sequence, report })
    }
}

/// The single "currently displayed result", written only by the most
/// recently submitted pipeline. Presentation code subscribes to it.
#[derive(Debug)]
pub struct ResultBoard {
    issued: AtomicU64,
    current: watch::Sender<Option<Arc<PipelineOutcome>>>,
}

impl Default for ResultBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultBoard {
    #[must_use]
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            issued: AtomicU64::new(0),
            current,
        }
    }

    /// Take the next sequence number; call before starting a pipeline
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Most recently issued sequence number (0 before any submission)
    #[must_use]
    pub fn latest_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Offer a finished outcome for display.
    ///
    /// Accepted only when its sequence is still the latest issued and newer
    /// than what is shown; otherwise it is stale and dropped.
    pub fn publish(&self, outcome: PipelineOutcome) -> bool {
        let sequence = outcome.sequence;
        let outcome = Arc::new(outcome);

        let accepted = self.current.send_if_modified(|shown| {
            let latest = self.latest_issued();
            let newer_than_shown = shown
                .as_ref()
                .is_none_or(|displayed| displayed.sequence < sequence);
            if sequence != latest || !newer_than_shown {
                return false;
            }
            *shown = Some(outcome);
            true
        });

        if !accepted {
            debug!(
                sequence,
                latest = self.latest_issued(),
                "Dropping stale pipeline outcome"
            );
        }
        accepted
    }

    /// Receive every accepted outcome
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<PipelineOutcome>>> {
        self.current.subscribe()
    }

    /// The outcome currently on display
    #[must_use]
    pub fn current(&self) -> Option<Arc<PipelineOutcome>> {
        self.current.borrow().clone()
    }
}
