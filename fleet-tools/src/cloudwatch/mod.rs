//! CloudWatch alarms and metrics, and CloudWatch Logs.
//!
//! Metrics and logs are separate AWS services with separate clients, so this
//! module owns two client traits: [`CloudWatchApi`] and [`LogsApi`].

mod client;
mod get_logs;
mod get_metric;
mod list_alarms;
mod list_log_groups;

pub use client::{SdkCloudWatchClient, SdkLogsClient};
pub use get_logs::GetLogsTool;
pub use get_metric::GetMetricTool;
pub use list_alarms::ListAlarmsTool;
pub use list_log_groups::ListLogGroupsTool;

use std::sync::Arc;

use aws_config::SdkConfig;
use fleet_core::{ProviderError, RegistryError, ToolRegistryBuilder};
use serde::{Serialize, Serializer};

use crate::config::FleetConfig;
use crate::convert::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeAlarmsRequest {
    pub state_value: Option<String>,
    pub max_records: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlarmSummary {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "State", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "Metric", skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(rename = "Namespace", skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "StateReason", skip_serializing_if = "Option::is_none")]
    pub state_reason: Option<String>,
    #[serde(rename = "UpdatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

/// A single-metric, single-dimension GetMetricData query.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub id: String,
    pub namespace: String,
    pub metric_name: String,
    pub dimension_name: String,
    pub dimension_value: String,
    pub stat: String,
    pub period: i32,
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datapoint {
    pub timestamp: Timestamp,
    pub value: f64,
}

#[async_trait::async_trait]
pub trait CloudWatchApi: Send + Sync {
    async fn describe_alarms(
        &self,
        request: DescribeAlarmsRequest,
    ) -> Result<Vec<AlarmSummary>, ProviderError>;

    /// Datapoints of the query's first result, in service order.
    async fn get_metric_data(&self, query: MetricQuery) -> Result<Vec<Datapoint>, ProviderError>;
}

/// Log group retention, rendered as a day count or "never expires".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Retention(pub Option<i32>);

impl Serialize for Retention {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(days) if days > 0 => serializer.serialize_i32(days),
            _ => serializer.serialize_str("never expires"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogGroupSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_bytes: Option<i64>,
    pub retention_days: Retention,
    pub creation_time: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetLogEventsRequest {
    pub log_group_name: String,
    pub log_stream_name: String,
    pub limit: i32,
    pub start_from_head: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[async_trait::async_trait]
pub trait LogsApi: Send + Sync {
    async fn describe_log_groups(
        &self,
        prefix: Option<String>,
        limit: i32,
    ) -> Result<Vec<LogGroupSummary>, ProviderError>;

    async fn get_log_events(
        &self,
        request: GetLogEventsRequest,
    ) -> Result<Vec<LogEvent>, ProviderError>;
}

pub fn register(
    builder: &mut ToolRegistryBuilder,
    _config: &FleetConfig,
    sdk_config: &SdkConfig,
) -> Result<(), RegistryError> {
    register_with(
        builder,
        Arc::new(SdkCloudWatchClient::new(sdk_config)),
        Arc::new(SdkLogsClient::new(sdk_config)),
    )
}

pub fn register_with(
    builder: &mut ToolRegistryBuilder,
    metrics: Arc<dyn CloudWatchApi>,
    logs: Arc<dyn LogsApi>,
) -> Result<(), RegistryError> {
    builder
        .add(ListAlarmsTool::new(metrics.clone()))?
        .add(GetMetricTool::new(metrics))?
        .add(ListLogGroupsTool::new(logs.clone()))?
        .add(GetLogsTool::new(logs))?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeCloudWatch {
        pub alarms: Vec<AlarmSummary>,
        pub datapoints: Vec<Datapoint>,
        pub alarm_requests: Mutex<Vec<DescribeAlarmsRequest>>,
        pub queries: Mutex<Vec<MetricQuery>>,
    }

    #[async_trait::async_trait]
    impl CloudWatchApi for FakeCloudWatch {
        async fn describe_alarms(
            &self,
            request: DescribeAlarmsRequest,
        ) -> Result<Vec<AlarmSummary>, ProviderError> {
            self.alarm_requests.lock().unwrap().push(request);
            Ok(self.alarms.clone())
        }

        async fn get_metric_data(
            &self,
            query: MetricQuery,
        ) -> Result<Vec<Datapoint>, ProviderError> {
            self.queries.lock().unwrap().push(query);
            Ok(self.datapoints.clone())
        }
    }

    #[derive(Default)]
    pub struct FakeLogs {
        pub groups: Vec<LogGroupSummary>,
        pub events: Vec<LogEvent>,
        pub group_requests: Mutex<Vec<(Option<String>, i32)>>,
        pub event_requests: Mutex<Vec<GetLogEventsRequest>>,
    }

    #[async_trait::async_trait]
    impl LogsApi for FakeLogs {
        async fn describe_log_groups(
            &self,
            prefix: Option<String>,
            limit: i32,
        ) -> Result<Vec<LogGroupSummary>, ProviderError> {
            self.group_requests.lock().unwrap().push((prefix, limit));
            Ok(self.groups.clone())
        }

        async fn get_log_events(
            &self,
            request: GetLogEventsRequest,
        ) -> Result<Vec<LogEvent>, ProviderError> {
            self.event_requests.lock().unwrap().push(request);
            Ok(self.events.clone())
        }
    }
}
