use http::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::error::MceError;
use crate::executor::{NormalizedResult, RequestExecutor};
use crate::soap::envelope::build_envelope;
use crate::soap::response::parse_response;
use crate::soap::spec::SoapRequestSpec;

impl RequestExecutor {
    /// Execute a SOAP call. Never fails: any error (token, unsupported
    /// action, network) renders as text.
    pub async fn execute_soap(&self, spec: &SoapRequestSpec) -> NormalizedResult {
        match self.try_soap(spec).await {
            Ok(result) => result,
            Err(err) => {
                warn!(%err, action = spec.action.as_str(), "soap call failed");
                NormalizedResult::from_error(&err)
            }
        }
    }

    async fn try_soap(&self, spec: &SoapRequestSpec) -> Result<NormalizedResult, MceError> {
        let token = self.tokens.get_token(spec.business_unit_id.as_deref()).await?;
        // The addressing header names the subdomain endpoint; the POST goes
        // to the instance URL the token reported.
        let to_endpoint = self.settings.soap_endpoint()?;
        let envelope = build_envelope(spec, &to_endpoint, &token.access_token)?;
        let url = format!("{}/Service.asmx", token.soap_base_url.trim_end_matches('/'));

        debug!(
            action = spec.action.as_str(),
            object_type = %spec.object_type,
            %url,
            "sending soap request"
        );
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/xml; charset=UTF-8")
            .header("SOAPAction", spec.action.as_str())
            .body(envelope)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(parse_response(status, &body))
    }
}
