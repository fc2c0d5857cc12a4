//! AWS SigV4 request signing for managed search domains.

use aws_config::BehaviorVersion;
use aws_types::region::Region;
use opensearch::auth::Credentials;
use tracing::info;

use crate::errors::SearchIndexError;

/// Region and service name requests are signed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSigning {
    /// AWS region of the search domain, e.g. `eu-west-1`.
    pub region: String,
    /// Signing service name: `es` for managed domains, `aoss` for serverless.
    pub service: String,
}

impl RequestSigning {
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
        }
    }

    /// Resolve signing credentials through the default AWS provider chain
    /// (environment, profile, web identity or an assumed role).
    pub(crate) async fn credentials(&self) -> Result<Credentials, SearchIndexError> {
        let region = Region::new(self.region.clone());
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region.clone())
            .load()
            .await;

        let provider = sdk_config.credentials_provider().ok_or_else(|| {
            SearchIndexError::connection("no AWS credentials provider available for request signing")
        })?;

        info!(region = %self.region, service = %self.service, "Resolved request signing credentials");

        Ok(Credentials::AwsSigV4(provider, region))
    }
}
