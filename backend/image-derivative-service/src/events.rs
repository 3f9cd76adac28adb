//! S3 event notification payload
//!
//! Only the fields the pipeline reads are required; the rest are kept so the
//! audit log shows what was delivered.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Object {
    /// Key as delivered by S3: `+` for spaces, other bytes percent-encoded
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
}

impl S3Event {
    /// Event carrying a single `ObjectCreated:Put` record
    pub fn object_created(bucket: &str, encoded_key: &str) -> Self {
        Self {
            records: vec![S3EventRecord::object_created(bucket, encoded_key)],
        }
    }
}

impl S3EventRecord {
    pub fn object_created(bucket: &str, encoded_key: &str) -> Self {
        Self {
            event_name: Some("ObjectCreated:Put".to_string()),
            event_source: Some("aws:s3".to_string()),
            event_time: None,
            aws_region: None,
            s3: S3Entity {
                bucket: S3Bucket {
                    name: bucket.to_string(),
                    arn: None,
                },
                object: S3Object {
                    key: encoded_key.to_string(),
                    size: None,
                    e_tag: None,
                },
            },
        }
    }
}
