use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::convert::Timestamp;
use crate::prelude::*;

use super::{CloudWatchApi, Datapoint, MetricQuery};

const DEFAULT_PERIOD_SECONDS: i32 = 300;
const DEFAULT_HOURS_BACK: f64 = 1.0;
const QUERY_ID: &str = "m1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub enum Statistic {
    #[default]
    Average,
    Sum,
    Minimum,
    Maximum,
    SampleCount,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Average => "Average",
            Statistic::Sum => "Sum",
            Statistic::Minimum => "Minimum",
            Statistic::Maximum => "Maximum",
            Statistic::SampleCount => "SampleCount",
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetMetricInput {
    /// CloudWatch namespace (e.g. AWS/EC2, AWS/Lambda)
    pub namespace: String,
    /// Metric name (e.g. CPUUtilization, Invocations)
    pub metric_name: String,
    /// Dimension name (e.g. InstanceId, FunctionName)
    pub dimension_name: String,
    /// Dimension value
    pub dimension_value: String,
    /// Statistic (default Average)
    #[serde(default)]
    pub stat: Option<Statistic>,
    /// Period in seconds (default 300)
    #[serde(default)]
    pub period_seconds: Option<i32>,
    /// How many hours back to query (default 1)
    #[serde(default)]
    pub hours_back: Option<f64>,
}

#[derive(Debug, Serialize)]
struct Range {
    start: Timestamp,
    end: Timestamp,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetMetricOutput {
    namespace: String,
    metric_name: String,
    stat: &'static str,
    period: i32,
    range: Range,
    datapoints: Vec<Datapoint>,
}

/// `[now - hours_back, now]`, or `None` when the start is not representable.
fn query_window(now: DateTime<Utc>, hours_back: f64) -> Option<(Timestamp, Timestamp)> {
    // float to int casts saturate
    let window = TimeDelta::try_milliseconds((hours_back * 3_600_000.0) as i64)?;
    let start = now.checked_sub_signed(window)?;
    Some((Timestamp(start), Timestamp(now)))
}

/// Queries one metric over the last `hoursBack` hours.
pub struct GetMetricTool {
    client: Arc<dyn CloudWatchApi>,
}

impl GetMetricTool {
    pub fn new(client: Arc<dyn CloudWatchApi>) -> Self {
        Self { client }
    }
}

impl Tool for GetMetricTool {
    type Input = GetMetricInput;

    fn name(&self) -> &str {
        "cloudwatch_get_metric"
    }

    fn description(&self) -> &str {
        "Query a CloudWatch metric for a given period. Returns datapoints."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let stat = input.stat.unwrap_or_default().as_str();
        let period = input
            .period_seconds
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PERIOD_SECONDS);
        let hours_back = input
            .hours_back
            .filter(|h| *h > 0.0)
            .unwrap_or(DEFAULT_HOURS_BACK);

        let (start, end) = query_window(Utc::now(), hours_back).ok_or_else(|| {
            ToolError::invalid_argument(
                "hoursBack",
                format!("{} hours back is outside the supported time range", hours_back),
            )
        })?;

        let mut datapoints = self
            .client
            .get_metric_data(MetricQuery {
                id: QUERY_ID.to_string(),
                namespace: input.namespace.clone(),
                metric_name: input.metric_name.clone(),
                dimension_name: input.dimension_name,
                dimension_value: input.dimension_value,
                stat: stat.to_string(),
                period,
                start,
                end,
            })
            .await?;
        datapoints.sort_by_key(|d| d.timestamp);

        Ok(ToolResult::json(GetMetricOutput {
            namespace: input.namespace,
            metric_name: input.metric_name,
            stat,
            period,
            range: Range { start, end },
            datapoints,
        })?)
    }
}
