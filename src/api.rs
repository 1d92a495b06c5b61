//! Client for the risk service's `/validate` endpoint.

use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::model::{AssessmentPayload, GraphPayload};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidateRequest<'a> {
	#[serde(rename = "BASE_URL")]
	pub base_url: &'a str,
	pub wallet: &'a str,
}

#[derive(Clone, Debug)]
pub struct RiskClient {
	http: reqwest::Client,
	config: ApiConfig,
}

impl RiskClient {
	pub fn new(config: ApiConfig) -> Self {
		Self {
			http: reqwest::Client::new(),
			config,
		}
	}

	pub async fn fetch_graph(&self, wallet: &str) -> Result<GraphPayload, FetchError> {
		let body = self.validate(wallet).await?;
		Ok(GraphPayload::from_json(&body)?)
	}

	pub async fn fetch_assessment(&self, wallet: &str) -> Result<AssessmentPayload, FetchError> {
		let body = self.validate(wallet).await?;
		Ok(AssessmentPayload::from_json(&body)?)
	}

	async fn validate(&self, wallet: &str) -> Result<String, FetchError> {
		let url = self.config.validate_url();
		log::debug!("POST {url} for {wallet}");
		let response = self
			.http
			.post(&url)
			.json(&ValidateRequest {
				base_url: &self.config.base_url,
				wallet,
			})
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(FetchError::Status {
				status: status.as_u16(),
				reason: status.canonical_reason().unwrap_or_default().to_string(),
			});
		}
		Ok(response.text().await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn request_body_uses_upper_case_base_url() {
		let body = serde_json::to_value(ValidateRequest {
			base_url: "https://app.example",
			wallet: "0xA",
		})
		.unwrap();
		assert_eq!(
			body,
			serde_json::json!({ "BASE_URL": "https://app.example", "wallet": "0xA" })
		);
	}

	#[test]
	fn status_error_message() {
		let err = FetchError::Status {
			status: 502,
			reason: "Bad Gateway".into(),
		};
		assert_eq!(err.to_string(), "API error: 502 Bad Gateway");
	}
}
