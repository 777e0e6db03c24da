use aws_config::SdkConfig;
use aws_sdk_cloudwatch::types::{Dimension, Metric, MetricDataQuery, MetricStat, StateValue};
use fleet_core::ProviderError;

use super::{
    AlarmSummary, CloudWatchApi, Datapoint, DescribeAlarmsRequest, GetLogEventsRequest, LogEvent,
    LogGroupSummary, LogsApi, MetricQuery, Retention,
};
use crate::convert::{infallible_build, non_empty, text, timestamp, Built, IntoOption, Timestamp};
use crate::error::classify_sdk_error;

infallible_build!(Dimension, Metric, MetricStat, MetricDataQuery);

/// [`CloudWatchApi`] over the AWS SDK.
pub struct SdkCloudWatchClient {
    client: aws_sdk_cloudwatch::Client,
}

impl SdkCloudWatchClient {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudwatch::Client::new(sdk_config),
        }
    }
}

#[async_trait::async_trait]
impl CloudWatchApi for SdkCloudWatchClient {
    async fn describe_alarms(
        &self,
        request: DescribeAlarmsRequest,
    ) -> Result<Vec<AlarmSummary>, ProviderError> {
        let output = self
            .client
            .describe_alarms()
            .set_state_value(request.state_value.as_deref().map(StateValue::from))
            .max_records(request.max_records)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(output
            .metric_alarms()
            .iter()
            .map(|a| AlarmSummary {
                name: text(a.alarm_name()),
                state: a.state_value().map(|s| s.as_str().to_string()),
                metric: text(a.metric_name()),
                namespace: text(a.namespace()),
                description: non_empty(a.alarm_description()),
                state_reason: text(a.state_reason()),
                updated_at: timestamp(a.state_updated_timestamp()),
            })
            .collect())
    }

    async fn get_metric_data(&self, query: MetricQuery) -> Result<Vec<Datapoint>, ProviderError> {
        let dimension = Dimension::builder()
            .name(query.dimension_name)
            .value(query.dimension_value)
            .build()
            .built()?;
        let metric = Metric::builder()
            .namespace(query.namespace)
            .metric_name(query.metric_name)
            .dimensions(dimension)
            .build()
            .built()?;
        let stat = MetricStat::builder()
            .metric(metric)
            .period(query.period)
            .stat(query.stat)
            .build()
            .built()?;
        let data_query = MetricDataQuery::builder()
            .id(query.id)
            .metric_stat(stat)
            .build()
            .built()?;

        let output = self
            .client
            .get_metric_data()
            .metric_data_queries(data_query)
            .start_time(query.start.to_smithy())
            .end_time(query.end.to_smithy())
            .send()
            .await
            .map_err(classify_sdk_error)?;

        let Some(result) = output.metric_data_results().first() else {
            return Ok(Vec::new());
        };

        Ok(result
            .timestamps()
            .iter()
            .zip(result.values())
            .filter_map(|(ts, value)| {
                Timestamp::from_smithy(ts).map(|timestamp| Datapoint {
                    timestamp,
                    value: *value,
                })
            })
            .collect())
    }
}

/// [`LogsApi`] over the AWS SDK.
pub struct SdkLogsClient {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl SdkLogsClient {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudwatchlogs::Client::new(sdk_config),
        }
    }
}

#[async_trait::async_trait]
impl LogsApi for SdkLogsClient {
    async fn describe_log_groups(
        &self,
        prefix: Option<String>,
        limit: i32,
    ) -> Result<Vec<LogGroupSummary>, ProviderError> {
        let output = self
            .client
            .describe_log_groups()
            .set_log_group_name_prefix(prefix)
            .limit(limit)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(output
            .log_groups()
            .iter()
            .map(|g| LogGroupSummary {
                name: text(g.log_group_name()),
                stored_bytes: g.stored_bytes().into_option(),
                retention_days: Retention(g.retention_in_days().into_option()),
                creation_time: g
                    .creation_time()
                    .into_option()
                    .and_then(Timestamp::from_millis),
            })
            .collect())
    }

    async fn get_log_events(
        &self,
        request: GetLogEventsRequest,
    ) -> Result<Vec<LogEvent>, ProviderError> {
        let output = self
            .client
            .get_log_events()
            .log_group_name(request.log_group_name)
            .log_stream_name(request.log_stream_name)
            .limit(request.limit)
            .start_from_head(request.start_from_head)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(output
            .events()
            .iter()
            .map(|e| LogEvent {
                timestamp: e.timestamp().into_option().and_then(Timestamp::from_millis),
                message: text(e.message()),
            })
            .collect())
    }
}
