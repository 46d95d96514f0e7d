//! PostgREST data service.
//!
//! Talks to a hosted `facts` table (Supabase-style): filters and ordering
//! go in the query string, writes ask for the stored row back with
//! `Prefer: return=representation`.

use async_trait::async_trait;
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};
use crate::traits::FactService;
use crate::types::{Fact, FactId, NewFact, VoteKind};

const DEFAULT_TABLE: &str = "facts";

/// Upper bound on rows returned by one select.
const SELECT_LIMIT: u32 = 1000;

pub struct RestFactService {
    client: reqwest::Client,
    base_url: String,
    table: String,
    api_key: SecretString,
}

impl RestFactService {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            table: DEFAULT_TABLE.to_string(),
            api_key,
        }
    }

    /// Use a table other than `facts`.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_url.clone(),
            SecretString::from(config.api_key.expose_secret().to_string()),
        )
        .with_table(config.table.clone())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        let key = self.api_key.expose_secret();
        req.header("apikey", key).bearer_auth(key)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ServiceResult<T> {
        let resp = self.authorized(req).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Query parameters for a select, in PostgREST syntax.
fn select_params(category: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("order", format!("{}.desc", VoteKind::Interesting.column())),
        ("limit", SELECT_LIMIT.to_string()),
    ];
    if let Some(category) = category {
        params.push(("category", format!("eq.{}", category)));
    }
    params
}

#[async_trait]
impl FactService for RestFactService {
    async fn select(&self, category: Option<&str>) -> ServiceResult<Vec<Fact>> {
        let req = self.client.get(self.endpoint()).query(&select_params(category));
        let facts: Vec<Fact> = self.send(req).await?;

        tracing::debug!(category = ?category, count = facts.len(), "Selected facts");
        Ok(facts)
    }

    async fn insert(&self, fact: &NewFact) -> ServiceResult<Fact> {
        let req = self
            .client
            .post(self.endpoint())
            .header("Prefer", "return=representation")
            .json(fact);

        let rows: Vec<Fact> = self.send(req).await?;
        rows.into_iter()
            .next()
            .ok_or(ServiceError::EmptyResponse { operation: "insert" })
    }

    async fn update_votes(&self, id: FactId, kind: VoteKind, value: u32) -> ServiceResult<Fact> {
        let mut body = serde_json::Map::new();
        body.insert(kind.column().to_string(), value.into());
        let req = self
            .client
            .patch(self.endpoint())
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&body);

        let rows: Vec<Fact> = self.send(req).await?;
        rows.into_iter().next().ok_or(ServiceError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_table() {
        let service = RestFactService::new("https://db.example.co/", SecretString::from("key".to_string()));
        assert_eq!(service.endpoint(), "https://db.example.co/rest/v1/facts");

        let service = service.with_table("facts_staging");
        assert_eq!(service.endpoint(), "https://db.example.co/rest/v1/facts_staging");
    }

    #[test]
    fn test_select_params_for_all_facts() {
        let params = select_params(None);
        assert_eq!(
            params,
            vec![
                ("select", "*".to_string()),
                ("order", "votesInteresting.desc".to_string()),
                ("limit", "1000".to_string()),
            ]
        );
    }

    #[test]
    fn test_select_params_for_category() {
        let params = select_params(Some("science"));
        assert!(params.contains(&("category", "eq.science".to_string())));
    }
}
