use std::sync::Arc;

use crate::prelude::*;

use super::Ec2Api;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InstanceAction {
    Start,
    Stop,
    Reboot,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManageInstanceInput {
    /// The EC2 instance ID (e.g. i-0abc123def456)
    pub instance_id: String,
    /// Action to perform
    pub action: InstanceAction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateChangeOutput<'a> {
    action: &'static str,
    instance_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_state: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RebootOutput<'a> {
    action: &'static str,
    instance_id: &'a str,
    status: &'static str,
}

pub struct ManageInstanceTool {
    client: Arc<dyn Ec2Api>,
}

impl ManageInstanceTool {
    pub fn new(client: Arc<dyn Ec2Api>) -> Self {
        Self { client }
    }
}

impl Tool for ManageInstanceTool {
    type Input = ManageInstanceInput;

    fn name(&self) -> &str {
        "ec2_manage_instance"
    }

    fn description(&self) -> &str {
        "Start, stop, or reboot an EC2 instance by instance ID."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let instance_id = input.instance_id.as_str();
        let (action, change) = match input.action {
            InstanceAction::Start => ("start", self.client.start_instance(instance_id).await?),
            InstanceAction::Stop => ("stop", self.client.stop_instance(instance_id).await?),
            InstanceAction::Reboot => {
                self.client.reboot_instance(instance_id).await?;
                return Ok(ToolResult::json(RebootOutput {
                    action: "reboot",
                    instance_id,
                    status: "reboot initiated",
                })?);
            }
        };

        Ok(ToolResult::json(StateChangeOutput {
            action,
            instance_id,
            previous_state: change.previous_state,
            current_state: change.current_state,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec2::fake::FakeEc2;
    use crate::ec2::StateChange;
    use fleet_core::{Dispatcher, FailureKind, ToolRegistry};
    use serde_json::json;

    fn setup(fake: FakeEc2) -> (Dispatcher, Arc<FakeEc2>) {
        let fake = Arc::new(fake);
        let mut builder = ToolRegistry::builder();
        builder.add(ManageInstanceTool::new(fake.clone())).unwrap();
        (Dispatcher::new(builder.build()), fake)
    }

    #[tokio::test]
    async fn test_stop_reports_state_change() {
        let (dispatcher, fake) = setup(FakeEc2 {
            change: StateChange {
                previous_state: Some("running".into()),
                current_state: Some("stopping".into()),
            },
            ..Default::default()
        });

        let envelope = dispatcher
            .invoke(
                "ec2_manage_instance",
                json!({"instanceId": "i-0abc", "action": "stop"}),
            )
            .await;

        assert_eq!(
            envelope.payload().and_then(|p| p.as_json()),
            Some(&json!({
                "action": "stop",
                "instanceId": "i-0abc",
                "previousState": "running",
                "currentState": "stopping",
            }))
        );
        assert_eq!(
            *fake.actions.lock().unwrap(),
            vec![("stop".to_string(), "i-0abc".to_string())]
        );
    }

    #[tokio::test]
    async fn test_reboot_payload() {
        let (dispatcher, _) = setup(FakeEc2::default());
        let envelope = dispatcher
            .invoke(
                "ec2_manage_instance",
                json!({"instanceId": "i-0abc", "action": "reboot"}),
            )
            .await;

        assert_eq!(
            envelope.payload().and_then(|p| p.as_json()),
            Some(&json!({
                "action": "reboot",
                "instanceId": "i-0abc",
                "status": "reboot initiated",
            }))
        );
    }

    #[tokio::test]
    async fn test_unknown_action_has_no_side_effect() {
        let (dispatcher, fake) = setup(FakeEc2::default());
        let envelope = dispatcher
            .invoke(
                "ec2_manage_instance",
                json!({"instanceId": "i-0abc", "action": "terminate"}),
            )
            .await;

        assert_eq!(envelope.failure_kind(), Some(FailureKind::InvalidArguments));
        assert!(envelope.text().contains("action"));
        assert!(fake.actions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_surfaces_as_failure() {
        let (dispatcher, _) = setup(FakeEc2 {
            error: Some(ProviderError::AccessDenied(
                "You are not authorized to perform this operation.".into(),
            )),
            ..Default::default()
        });

        let envelope = dispatcher
            .invoke(
                "ec2_manage_instance",
                json!({"instanceId": "i-0abc", "action": "start"}),
            )
            .await;

        assert_eq!(envelope.failure_kind(), Some(FailureKind::AccessDenied));
        assert!(envelope.text().starts_with("Access denied: "));
    }
}
