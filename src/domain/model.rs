use serde::{Deserialize, Serialize};

/// NSW OAuth 端點的 token 回應
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiStation {
    pub brandid: String,
    pub stationid: String,
    pub brand: String,
    pub code: String,
    pub name: String,
    pub address: String,
    pub location: ApiLocation,
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPrice {
    pub stationcode: String,
    pub fueltype: String,
    pub price: f64,
    pub lastupdated: String,
}

/// prices 端點的原始回應（stations 與 prices 兩組清單）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceApiResponse {
    #[serde(default)]
    pub stations: Vec<ApiStation>,
    #[serde(default)]
    pub prices: Vec<ApiPrice>,
}

/// 站點表的一列，location 已攤平成 latitude/longitude，code 已轉成整數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub brandid: String,
    pub stationid: String,
    pub brand: String,
    pub code: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelPrice {
    pub stationcode: String,
    pub fueltype: String,
    pub price: f64,
    pub lastupdated: String,
}

/// 右連接後的合併列；價格找不到對應站點時站點欄位留空
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRow {
    pub brandid: Option<String>,
    pub stationid: Option<String>,
    pub brand: Option<String>,
    pub code: Option<i64>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub state: Option<String>,
    pub stationcode: String,
    pub fueltype: String,
    pub price: f64,
    pub lastupdated: String,
}

/// 單次執行產出的三張表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub stations: Vec<Station>,
    pub prices: Vec<FuelPrice>,
    pub combined: Vec<CombinedRow>,
}
