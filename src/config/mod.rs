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

//! Signer settings.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// Sub-second digits included in generated timestamps.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPrecision {
    Seconds,
    #[default]
    Millis,
    Micros,
}

impl From<TimestampPrecision> for SecondsFormat {
    fn from(precision: TimestampPrecision) -> Self {
        match precision {
            TimestampPrecision::Seconds => SecondsFormat::Secs,
            TimestampPrecision::Millis => SecondsFormat::Millis,
            TimestampPrecision::Micros => SecondsFormat::Micros,
        }
    }
}

/// Offset that generated timestamps are expressed in.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampZone {
    #[default]
    Utc,
    Local,
}

/// Settings for a [`Signer`](crate::Signer).
///
/// Every field has a default, so a partial (or empty) JSON object is a valid configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignerConfig {
    /// Wrap the emitted COSE_Sign1 in CBOR tag 18.
    pub tagged: bool,
    /// Emit `nil` in place of the payload.  The signature still covers the payload.
    pub detached_payload: bool,
    pub timestamp_precision: TimestampPrecision,
    pub timestamp_zone: TimestampZone,
}

impl SignerConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    #[must_use]
    pub fn with_tagged(mut self, tagged: bool) -> Self {
        self.tagged = tagged;
        self
    }

    #[must_use]
    pub fn with_detached_payload(mut self, detached_payload: bool) -> Self {
        self.detached_payload = detached_payload;
        self
    }

    #[must_use]
    pub fn with_timestamp_precision(mut self, precision: TimestampPrecision) -> Self {
        self.timestamp_precision = precision;
        self
    }

    #[must_use]
    pub fn with_timestamp_zone(mut self, zone: TimestampZone) -> Self {
        self.timestamp_zone = zone;
        self
    }

    /// Current time as an ISO-8601 timestamp with a numeric offset.
    pub fn timestamp_now(&self) -> String {
        self.format_timestamp(Utc::now())
    }

    /// Format `time` as an ISO-8601 timestamp with a numeric offset (`+00:00` for UTC).
    pub fn format_timestamp(&self, time: DateTime<Utc>) -> String {
        let format = self.timestamp_precision.into();
        match self.timestamp_zone {
            TimestampZone::Utc => time.to_rfc3339_opts(format, false),
            TimestampZone::Local => time.with_timezone(&Local).to_rfc3339_opts(format, false),
        }
    }
}
