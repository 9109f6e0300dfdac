use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).context("invalid server URL")?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).context("failed to build API URL")
    }

    async fn send_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let response = req.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("API error ({}): {}", status, body);
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn create_product(&self, req: CreateProductRequest) -> Result<ProductResponse> {
        let url = self.url("/v1/admin/products")?;
        self.send_json(self.http.post(url).json(&req)).await
    }

    pub async fn recompute_rating(&self, product_id: i64) -> Result<ProductRatingResponse> {
        let url = self.url(&format!("/v1/admin/products/{product_id}/rating"))?;
        self.send_json(self.http.post(url)).await
    }

    pub async fn list_reviews(&self, status: Option<&str>) -> Result<Vec<ReviewResponse>> {
        let mut url = self.url("/v1/admin/reviews")?;
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status);
        }
        self.send_json(self.http.get(url)).await
    }

    pub async fn set_review_status(
        &self,
        review_id: i64,
        status: &str,
    ) -> Result<ReviewOutcomeResponse> {
        let url = self.url(&format!("/v1/admin/reviews/{review_id}/status"))?;
        let req = UpdateReviewStatusRequest {
            status: status.to_string(),
        };
        self.send_json(self.http.put(url).json(&req)).await
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = self.url("/v1/health")?;
        self.send_json(self.http.get(url)).await
    }
}

#[derive(Debug, Serialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateReviewStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub rating: f64,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRatingResponse {
    pub product_id: i64,
    pub product_rating: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub review_id: i64,
    pub product_id: i64,
    pub rating: i64,
    pub comment: String,
    pub user_name: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcomeResponse {
    pub review: ReviewResponse,
    pub product_rating: f64,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
