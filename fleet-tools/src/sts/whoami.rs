use std::sync::Arc;

use crate::prelude::*;

use super::StsApi;

#[derive(Debug, Serialize)]
struct WhoAmIOutput {
    #[serde(rename = "Account", skip_serializing_if = "Option::is_none")]
    account: Option<String>,
    #[serde(rename = "Arn", skip_serializing_if = "Option::is_none")]
    arn: Option<String>,
    #[serde(rename = "UserId", skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(rename = "Region")]
    region: String,
}

/// Reports the account, principal and region the server is operating as.
pub struct WhoAmITool {
    client: Arc<dyn StsApi>,
    region: String,
}

impl WhoAmITool {
    pub fn new(client: Arc<dyn StsApi>, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }
}

impl Tool for WhoAmITool {
    type Input = NoInput;

    fn name(&self) -> &str {
        "aws_whoami"
    }

    fn description(&self) -> &str {
        "Get current AWS caller identity: account ID, user/role ARN, and region"
    }

    async fn execute(&self, _input: Self::Input) -> Result<ToolResult, ToolError> {
        let identity = self.client.get_caller_identity().await?;

        Ok(ToolResult::json(WhoAmIOutput {
            account: identity.account,
            arn: identity.arn,
            user_id: identity.user_id,
            region: self.region.clone(),
        })?)
    }
}
