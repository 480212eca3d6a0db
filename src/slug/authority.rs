use async_trait::async_trait;
use serde::Deserialize;

/// Errors from the remote uniqueness authority
#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authority returned status {0}")]
    Status(u16),
    #[error("malformed authority response: {0}")]
    Malformed(String),
}

/// Remote authority answering "is this slug unique within this site?"
///
/// Treated as fallible and possibly slow; the validator imposes no retry
/// policy on it and fails closed when it errors.
#[async_trait]
pub trait SlugAuthority: Send + Sync {
    async fn is_unique(&self, slug: &str, site_id: &str) -> Result<bool, AuthorityError>;
}

#[derive(Debug, Deserialize)]
struct UniquenessResponse {
    #[serde(rename = "isUnique")]
    is_unique: bool,
}

/// HTTP client for the platform's uniqueness-check endpoint
pub struct HttpSlugAuthority {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSlugAuthority {
    /// `endpoint` is the full URL of the check route, e.g.
    /// `https://app.example.com/api/slug/check`
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl SlugAuthority for HttpSlugAuthority {
    async fn is_unique(&self, slug: &str, site_id: &str) -> Result<bool, AuthorityError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("slug", slug), ("siteId", site_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthorityError::Status(status.as_u16()));
        }

        let body: UniquenessResponse = response
            .json()
            .await
            .map_err(|e| AuthorityError::Malformed(e.to_string()))?;

        Ok(body.is_unique)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniqueness_response_parsing() {
        let body: UniquenessResponse = serde_json::from_str(r#"{"isUnique": true}"#).unwrap();
        assert!(body.is_unique);

        let err = serde_json::from_str::<UniquenessResponse>(r#"{"unique": true}"#);
        assert!(err.is_err());
    }
}
