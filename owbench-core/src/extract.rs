use serde_json::Value;

use crate::config::InvokeMode;
use crate::record::{InvocationResult, MetricRecord};

/// Maps one raw response into a normalized metric record.
///
/// Total function: a body that does not parse as JSON yields an all-zero
/// record with `success = false`, and any field the body lacks defaults to 0.
#[must_use]
pub fn extract(result: &InvocationResult, mode: InvokeMode) -> MetricRecord {
    let Ok(body) = serde_json::from_slice::<Value>(&result.body) else {
        return MetricRecord::failed();
    };

    let init_time_ms = annotation_f64(&body, "initTime");
    let wait_time_ms = annotation_f64(&body, "waitTime");
    let duration_ms = body
        .get("duration")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
        .max(0.0);

    let success = match mode {
        InvokeMode::Blocking => body.get("success").and_then(Value::as_bool).unwrap_or(false),
        InvokeMode::Polling => body
            .pointer("/response/status")
            .and_then(Value::as_str)
            .is_some_and(|s| s.eq_ignore_ascii_case("success")),
    };

    MetricRecord {
        init_time_ms,
        wait_time_ms,
        duration_ms,
        client_elapsed_ms: result.client_elapsed.as_secs_f64() * 1000.0,
        success,
    }
}

/// Looks up a numeric value in the activation's `annotations` key/value pairs.
fn annotation_f64(body: &Value, key: &str) -> f64 {
    let Some(annotations) = body.get("annotations").and_then(Value::as_array) else {
        return 0.0;
    };

    annotations
        .iter()
        .find(|a| a.get("key").and_then(Value::as_str) == Some(key))
        .and_then(|a| a.get("value"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
        .max(0.0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use bytes::Bytes;
    use std::time::Duration;

    fn result(body: &str, elapsed_ms: u64) -> InvocationResult {
        InvocationResult {
            status: 200,
            body: Bytes::from(body.to_string()),
            client_elapsed: Duration::from_millis(elapsed_ms),
        }
    }

    #[test]
    fn unparseable_body_yields_zeroed_failed_record() {
        let record = extract(&result("not json", 42), InvokeMode::Blocking);
        assert_eq!(record, MetricRecord::failed());
    }

    #[test]
    fn blocking_mode_reads_annotations_duration_and_success() {
        let body = r#"{
            "duration": 100,
            "success": true,
            "annotations": [
                {"key": "initTime", "value": 12.5},
                {"key": "waitTime", "value": 3.0},
                {"key": "path", "value": "guest/noop"}
            ]
        }"#;

        let record = extract(&result(body, 250), InvokeMode::Blocking);
        assert_eq!(record.init_time_ms, 12.5);
        assert_eq!(record.wait_time_ms, 3.0);
        assert_eq!(record.duration_ms, 100.0);
        assert_eq!(record.client_elapsed_ms, 250.0);
        assert!(record.success);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let record = extract(&result("{}", 10), InvokeMode::Blocking);
        assert_eq!(record.init_time_ms, 0.0);
        assert_eq!(record.wait_time_ms, 0.0);
        assert_eq!(record.duration_ms, 0.0);
        assert_eq!(record.client_elapsed_ms, 10.0);
        assert!(!record.success);
    }

    #[test]
    fn polling_mode_matches_response_status_case_insensitively() {
        let ok = r#"{"response": {"status": "Success"}}"#;
        let failed = r#"{"response": {"status": "Failure"}}"#;

        assert!(extract(&result(ok, 1), InvokeMode::Polling).success);
        assert!(!extract(&result(failed, 1), InvokeMode::Polling).success);
    }

    #[test]
    fn polling_mode_ignores_top_level_success_field() {
        let body = r#"{"success": true}"#;
        assert!(!extract(&result(body, 1), InvokeMode::Polling).success);
    }

    #[test]
    fn negative_server_timings_are_clamped_to_zero() {
        let body = r#"{
            "duration": -5,
            "annotations": [{"key": "initTime", "value": -1.0}]
        }"#;

        let record = extract(&result(body, 1), InvokeMode::Blocking);
        assert_eq!(record.duration_ms, 0.0);
        assert_eq!(record.init_time_ms, 0.0);
    }

    #[test]
    fn non_numeric_annotation_values_default_to_zero() {
        let body = r#"{"annotations": [{"key": "initTime", "value": "fast"}]}"#;
        let record = extract(&result(body, 1), InvokeMode::Blocking);
        assert_eq!(record.init_time_ms, 0.0);
    }
}
