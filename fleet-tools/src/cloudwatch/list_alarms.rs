use std::sync::Arc;

use crate::prelude::*;

use super::{AlarmSummary, CloudWatchApi, DescribeAlarmsRequest};

const DEFAULT_MAX_RECORDS: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmState {
    Ok,
    Alarm,
    InsufficientData,
}

impl AlarmState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmState::Ok => "OK",
            AlarmState::Alarm => "ALARM",
            AlarmState::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListAlarmsInput {
    /// Filter by alarm state
    #[serde(default)]
    pub state_value: Option<AlarmState>,
    /// Max alarms to return (default 50)
    #[serde(default)]
    pub max_records: Option<i32>,
}

#[derive(Debug, Serialize)]
struct ListAlarmsOutput {
    count: usize,
    alarms: Vec<AlarmSummary>,
}

pub struct ListAlarmsTool {
    client: Arc<dyn CloudWatchApi>,
}

impl ListAlarmsTool {
    pub fn new(client: Arc<dyn CloudWatchApi>) -> Self {
        Self { client }
    }
}

impl Tool for ListAlarmsTool {
    type Input = ListAlarmsInput;

    fn name(&self) -> &str {
        "cloudwatch_list_alarms"
    }

    fn description(&self) -> &str {
        "List CloudWatch alarms. Optionally filter by state (OK, ALARM, INSUFFICIENT_DATA)."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let alarms = self
            .client
            .describe_alarms(DescribeAlarmsRequest {
                state_value: input.state_value.map(|s| s.as_str().to_string()),
                max_records: input
                    .max_records
                    .filter(|n| *n > 0)
                    .unwrap_or(DEFAULT_MAX_RECORDS),
            })
            .await?;

        Ok(ToolResult::json(ListAlarmsOutput {
            count: alarms.len(),
            alarms,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloudwatch::fake::FakeCloudWatch;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_alarms_defaults() {
        let fake = Arc::new(FakeCloudWatch::default());
        let tool = ListAlarmsTool::new(fake.clone());

        let result = tool.execute(ListAlarmsInput::default()).await.unwrap();

        assert_eq!(result.as_json().unwrap(), &json!({"count": 0, "alarms": []}));
        assert_eq!(
            fake.alarm_requests.lock().unwrap()[0],
            DescribeAlarmsRequest {
                state_value: None,
                max_records: 50,
            }
        );
    }

    #[tokio::test]
    async fn test_alarm_description_is_null_when_absent() {
        let fake = Arc::new(FakeCloudWatch {
            alarms: vec![AlarmSummary {
                name: Some("high-cpu".into()),
                state: Some("ALARM".into()),
                metric: Some("CPUUtilization".into()),
                namespace: Some("AWS/EC2".into()),
                description: None,
                state_reason: Some("Threshold crossed".into()),
                updated_at: None,
            }],
            ..Default::default()
        });
        let tool = ListAlarmsTool::new(fake.clone());

        let result = tool
            .execute(ListAlarmsInput {
                state_value: Some(AlarmState::Alarm),
                max_records: Some(5),
            })
            .await
            .unwrap();

        let alarm = &result.as_json().unwrap()["alarms"][0];
        assert_eq!(alarm["Name"], "high-cpu");
        assert!(alarm["Description"].is_null());
        assert!(alarm.get("UpdatedAt").is_none());
        assert_eq!(
            fake.alarm_requests.lock().unwrap()[0].state_value.as_deref(),
            Some("ALARM")
        );
    }
}
