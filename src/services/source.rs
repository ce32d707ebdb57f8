use crate::models::{DayKey, Pharmacy, PharmacyId, TimeWindow, WeeklySchedule};
use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading the pharmacy data set
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(StatusCode),

    #[error("Invalid pharmacy data: {0}")]
    InvalidData(#[from] serde_json::Error),

    #[error("Data set is empty")]
    Empty,
}

/// Where the pharmacy data set lives
#[derive(Debug, Clone, PartialEq)]
pub enum PharmacySource {
    /// JSON array on disk
    File(PathBuf),
    /// JSON array served over HTTP
    Http(String),
}

/// Loads the pharmacy data set, falling back to built-in data on failure
pub struct PharmacyLoader {
    source: PharmacySource,
    client: Client,
}

impl PharmacyLoader {
    /// Create a new loader for a source
    pub fn new(source: PharmacySource) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to configure HTTP client ({}), using defaults", e);
                Client::new()
            });

        Self { source, client }
    }

    pub fn source(&self) -> &PharmacySource {
        &self.source
    }

    /// Load the data set, reporting any failure
    pub async fn try_load(&self) -> Result<Vec<Pharmacy>, SourceError> {
        let records: Vec<serde_json::Value> = match &self.source {
            PharmacySource::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_slice(&bytes)?
            }
            PharmacySource::Http(url) => {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SourceError::Status(status));
                }
                let bytes = response.bytes().await?;
                serde_json::from_slice(&bytes)?
            }
        };

        let pharmacies = parse_records(records);
        if pharmacies.is_empty() {
            return Err(SourceError::Empty);
        }

        Ok(pharmacies)
    }

    /// Load the data set; never fails
    ///
    /// Any error is logged and the built-in [`fallback_pharmacies`] are
    /// returned instead, so callers always get a usable, non-empty set.
    pub async fn load(&self) -> Vec<Pharmacy> {
        match self.try_load().await {
            Ok(pharmacies) => {
                tracing::info!("{} pharmacies loaded from {:?}", pharmacies.len(), self.source);
                pharmacies
            }
            Err(e) => {
                tracing::error!("Failed to load pharmacies from {:?}: {}", self.source, e);
                tracing::warn!("Using fallback pharmacy data");
                fallback_pharmacies()
            }
        }
    }
}

/// Convert raw records, skipping the ones that do not describe a pharmacy
fn parse_records(records: Vec<serde_json::Value>) -> Vec<Pharmacy> {
    let total = records.len();
    let pharmacies: Vec<Pharmacy> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Pharmacy>(record) {
            Ok(pharmacy) => Some(pharmacy),
            Err(e) => {
                tracing::warn!("Skipping pharmacy record #{}: {}", index, e);
                None
            }
        })
        .collect();

    if pharmacies.len() < total {
        tracing::warn!("{} of {} pharmacy records skipped", total - pharmacies.len(), total);
    }

    pharmacies
}

/// Built-in data set used when the configured source cannot be loaded
pub fn fallback_pharmacies() -> Vec<Pharmacy> {
    let weekday = vec![TimeWindow::from_hm(8, 30, 19, 30)];

    vec![Pharmacy {
        id: PharmacyId::from(1),
        name: "Pharmacie de l'Hôtel de Ville".to_string(),
        address: "25 Place de l'Hôtel de Ville".to_string(),
        city: "Rouen".to_string(),
        postal_code: "76000".to_string(),
        latitude: 49.4432,
        longitude: 1.0999,
        phone: "02 35 71 23 45".to_string(),
        on_duty: true,
        schedule: WeeklySchedule::new()
            .with_weekdays(weekday)
            .with_day(DayKey::Saturday, vec![TimeWindow::from_hm(9, 0, 19, 0)])
            .with_day(DayKey::Sunday, vec![TimeWindow::from_hm(10, 0, 13, 0)]),
    }]
}
