use crate::core::archive::SnapshotArchive;
use crate::core::{ConfigProvider, Pipeline, PriceApiResponse, Snapshot, Storage};
use crate::domain::model::{ApiStation, CombinedRow, FuelPrice, Station, TokenResponse};
use crate::utils::error::{FuelError, Result};
use reqwest::Client;
use std::collections::HashMap;

/// NSW FuelCheck 快照管道：token → 價格抓取 → 建表 → 右連接 → CSV 匯出
pub struct FuelPipeline<S: Storage, C: ConfigProvider> {
    archive: SnapshotArchive<S>,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> FuelPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            archive: SnapshotArchive::new(storage),
            config,
            client: Client::new(),
        }
    }

    /// 向 OAuth 端點換取 access token（token 每 12 小時過期）
    async fn fetch_token(&self) -> Result<String> {
        let authorization = match self.config.authorization() {
            Some(auth) => auth.to_string(),
            None => {
                return Err(FuelError::MissingConfigError {
                    field: "authorization".to_string(),
                })
            }
        };

        tracing::info!(
            "🔑 Requesting access token from {}",
            self.config.token_endpoint()
        );

        let response = self
            .client
            .get(self.config.token_endpoint())
            .query(&[("grant_type", "client_credentials")])
            .header("content-type", "application/json")
            .header("authorization", authorization)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FuelError::TokenError {
                message: format!("token endpoint returned status {}", response.status()),
            });
        }

        let token: TokenResponse =
            response.json().await.map_err(|e| FuelError::TokenError {
                message: format!("malformed token response: {}", e),
            })?;

        Ok(token.access_token)
    }

    /// 以 Bearer token 抓取最新油價與站點清單
    async fn fetch_prices(&self, access_token: &str) -> Result<PriceApiResponse> {
        let now = chrono::Local::now();

        // 構建請求
        let mut request = self
            .client
            .get(self.config.prices_endpoint())
            .query(&[("states", self.config.states())])
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", access_token))
            .header("transactionid", now.timestamp_millis().to_string())
            .header(
                "requesttimestamp",
                now.format("%d/%m/%Y %I:%M:%S %p").to_string(),
            );

        if let Some(api_key) = self.config.api_key() {
            request = request.header("apikey", api_key);
        }

        // 設定超時
        if let Some(timeout) = self.config.timeout_seconds() {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }

        tracing::debug!(
            "📡 Fetching fuel prices from {}",
            self.config.prices_endpoint()
        );

        let response = request.send().await?;
        tracing::debug!("📡 Prices response status: {}", response.status());

        if !response.status().is_success() {
            return Err(FuelError::ProcessingError {
                message: format!("prices endpoint returned status {}", response.status()),
            });
        }

        let raw: PriceApiResponse = response.json().await?;
        Ok(raw)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for FuelPipeline<S, C> {
    async fn extract(&self) -> Result<PriceApiResponse> {
        let access_token = self.fetch_token().await?;

        // 價格抓取失敗時記錄並以空資料繼續；token 或設定錯誤照常往外傳
        match self.fetch_prices(&access_token).await {
            Ok(raw) => {
                tracing::info!(
                    "📡 Fetched {} stations and {} prices",
                    raw.stations.len(),
                    raw.prices.len()
                );
                Ok(raw)
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to fetch fuel prices, continuing with no data: {}", e);
                Ok(PriceApiResponse::default())
            }
        }
    }

    async fn transform(&self, raw: PriceApiResponse) -> Result<Snapshot> {
        let stations = build_station_table(&raw.stations)?;

        let prices: Vec<FuelPrice> = raw
            .prices
            .iter()
            .map(|price| FuelPrice {
                stationcode: price.stationcode.clone(),
                fueltype: price.fueltype.clone(),
                price: price.price,
                lastupdated: price.lastupdated.clone(),
            })
            .collect();

        let combined = join_right_on_code(&stations, &prices);

        tracing::debug!(
            "🔄 Built tables: {} stations, {} prices, {} combined rows",
            stations.len(),
            prices.len(),
            combined.len()
        );

        Ok(Snapshot {
            stations,
            prices,
            combined,
        })
    }

    async fn load(&self, snapshot: Snapshot) -> Result<String> {
        let dir = self.archive.write_snapshot(&snapshot).await?;
        Ok(format!("{}/{}", self.config.data_dir(), dir))
    }
}

/// 攤平 location 並把 code 轉成整數；轉不動就是資料錯誤
fn build_station_table(stations: &[ApiStation]) -> Result<Vec<Station>> {
    let mut rows = Vec::with_capacity(stations.len());

    for station in stations {
        let code = station
            .code
            .trim()
            .parse::<i64>()
            .map_err(|_| FuelError::ProcessingError {
                message: format!("station code '{}' is not an integer", station.code),
            })?;

        rows.push(Station {
            brandid: station.brandid.clone(),
            stationid: station.stationid.clone(),
            brand: station.brand.clone(),
            code,
            name: station.name.clone(),
            address: station.address.clone(),
            latitude: station.location.latitude,
            longitude: station.location.longitude,
            state: station.state.clone(),
        });
    }

    Ok(rows)
}

/// 右連接：每筆價格恰好產生一列，找不到站點時站點欄位留空
fn join_right_on_code(stations: &[Station], prices: &[FuelPrice]) -> Vec<CombinedRow> {
    let index: HashMap<i64, &Station> = stations.iter().map(|s| (s.code, s)).collect();

    prices
        .iter()
        .map(|price| {
            let station = price
                .stationcode
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|code| index.get(&code).copied());

            CombinedRow {
                brandid: station.map(|s| s.brandid.clone()),
                stationid: station.map(|s| s.stationid.clone()),
                brand: station.map(|s| s.brand.clone()),
                code: station.map(|s| s.code),
                name: station.map(|s| s.name.clone()),
                address: station.map(|s| s.address.clone()),
                latitude: station.map(|s| s.latitude),
                longitude: station.map(|s| s.longitude),
                state: station.map(|s| s.state.clone()),
                stationcode: price.stationcode.clone(),
                fueltype: price.fueltype.clone(),
                price: price.price,
                lastupdated: price.lastupdated.clone(),
            }
        })
        .collect()
}
