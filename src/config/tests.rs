// Copyright 2021 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
////////////////////////////////////////////////////////////////////////////////

use super::*;
use crate::util::expect_err;
use chrono::TimeZone;

#[test]
fn test_config_from_json() {
    let tests = vec![
        ("{}", SignerConfig::default()),
        (
            r#"{"tagged": true}"#,
            SignerConfig::default().with_tagged(true),
        ),
        (
            r#"{"detached_payload": true, "timestamp_precision": "seconds"}"#,
            SignerConfig::default()
                .with_detached_payload(true)
                .with_timestamp_precision(TimestampPrecision::Seconds),
        ),
        (
            r#"{"timestamp_precision": "micros", "timestamp_zone": "local"}"#,
            SignerConfig::default()
                .with_timestamp_precision(TimestampPrecision::Micros)
                .with_timestamp_zone(TimestampZone::Local),
        ),
    ];
    for (data, want) in tests {
        assert_eq!(SignerConfig::from_json(data).unwrap(), want, "for {}", data);
    }
}

#[test]
fn test_config_from_json_fail() {
    let tests = vec![
        (r#"{"tagged": "yes"}"#, "invalid type"),
        (r#"{"timestamp_precision": "nanos"}"#, "unknown variant"),
        (r#"{"compress": true}"#, "unknown field"),
        ("42", "invalid type"),
    ];
    for (data, err_msg) in tests {
        expect_err(SignerConfig::from_json(data), err_msg);
    }
}

#[test]
fn test_config_defaults() {
    let config = SignerConfig::default();
    assert!(!config.tagged);
    assert!(!config.detached_payload);
    assert_eq!(config.timestamp_precision, TimestampPrecision::Millis);
    assert_eq!(config.timestamp_zone, TimestampZone::Utc);
}

#[test]
fn test_format_timestamp() {
    let time = Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 12).unwrap()
        + chrono::Duration::microseconds(345_678);
    let tests = vec![
        (TimestampPrecision::Seconds, "2026-10-15T09:30:12+00:00"),
        (TimestampPrecision::Millis, "2026-10-15T09:30:12.345+00:00"),
        (TimestampPrecision::Micros, "2026-10-15T09:30:12.345678+00:00"),
    ];
    for (precision, want) in tests {
        let config = SignerConfig::default().with_timestamp_precision(precision);
        assert_eq!(config.format_timestamp(time), want);
    }
}

#[test]
fn test_format_timestamp_local() {
    let time = Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 12).unwrap();
    let config = SignerConfig::default().with_timestamp_zone(TimestampZone::Local);
    let got = config.format_timestamp(time);
    // Whatever the local offset is, the value denotes the same instant.
    let parsed = DateTime::parse_from_rfc3339(&got).unwrap();
    assert_eq!(parsed.with_timezone(&Utc), time);
    assert!(!got.ends_with('Z'));
}

#[test]
fn test_timestamp_now_has_offset() {
    let got = SignerConfig::default().timestamp_now();
    assert!(got.ends_with("+00:00"), "got {}", got);
    assert!(DateTime::parse_from_rfc3339(&got).is_ok());
}
