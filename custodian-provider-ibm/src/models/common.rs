use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

/// Time span in microseconds since the epoch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeUsecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_usecs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_usecs: Option<i64>,
}

/// Wall-clock time (hour and minute)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Time {
    pub hour: i64,
    pub minute: i64,
}

/// Wall-clock time with an optional time zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDay {
    pub hour: i64,
    pub minute: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}
