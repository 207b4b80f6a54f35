//! HTTP implementation of [`CharacterStatsClient`].

use std::time::Duration;

use async_trait::async_trait;
use duel_core::{CharacterId, ItemId};
use serde::de::DeserializeOwned;

use super::types::TransferItemRequest;
use super::{CharacterSnapshot, CharacterStatsClient, UpstreamError};
use crate::auth::AuthToken;

/// Character service client over its JSON API.
///
/// Every request carries the caller's bearer credential and is bounded by the
/// configured timeout. Nothing is retried.
pub struct HttpCharacterClient {
    /// Service root, without trailing slash
    base_url: String,

    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpCharacterClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn character_url(&self, id: &CharacterId) -> String {
        format!("{}/character/{}", self.base_url, id)
    }

    fn gift_url(&self) -> String {
        format!("{}/items/gift", self.base_url)
    }
}

#[async_trait]
impl CharacterStatsClient for HttpCharacterClient {
    async fn fetch_character(
        &self,
        id: &CharacterId,
        token: &AuthToken,
    ) -> Result<CharacterSnapshot, UpstreamError> {
        let url = self.character_url(id);
        tracing::debug!(target: "duel::character", %url, "fetching character");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token.as_str())
            .send()
            .await?;

        read_json(response).await
    }

    async fn transfer_item(
        &self,
        from: &CharacterId,
        to: &CharacterId,
        item: &ItemId,
        token: &AuthToken,
    ) -> Result<(), UpstreamError> {
        let url = self.gift_url();
        tracing::debug!(target: "duel::character", %url, %from, %to, %item, "transferring item");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token.as_str())
            .json(&TransferItemRequest {
                from_character_id: from,
                to_character_id: to,
                item_id: item,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::from_response(status.as_u16(), &body));
        }
        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, UpstreamError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(UpstreamError::from_response(status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_service_urls() {
        let client =
            HttpCharacterClient::new("http://characters:3000/api/", Duration::from_secs(1))
                .unwrap();

        assert_eq!(client.base_url(), "http://characters:3000/api");
        assert_eq!(
            client.character_url(&CharacterId::new("c-9")),
            "http://characters:3000/api/character/c-9"
        );
        assert_eq!(client.gift_url(), "http://characters:3000/api/items/gift");
    }
}
