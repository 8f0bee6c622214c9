//! S3-compatible object storage.
//!
//! The AWS SDK is async; the upgrade runner is not. Each store owns a
//! current-thread tokio runtime and blocks on one request at a time.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use stowage_common::{Error, Result};
use tokio::runtime::Runtime;

use super::ObjectStore;
use crate::config::S3Config;

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    runtime: Runtime,
}

impl S3ObjectStore {
    /// Create a client for the configured bucket.
    ///
    /// Credentials come from the standard AWS environment (env vars, profile,
    /// instance metadata). A region embedded in a bucket ARN is used when no
    /// region is configured explicitly.
    pub fn new(config: &S3Config) -> Result<Self> {
        let (bucket, arn_region) = parse_bucket_identifier(&config.bucket);
        if bucket.trim().is_empty() {
            return Err(Error::invalid_input(format!(
                "no bucket name in {:?}",
                config.bucket
            )));
        }
        let region = config.region.clone().or(arn_region);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::storage(format!("Failed to start S3 runtime: {}", e)))?;

        let sdk_config = runtime.block_on(async {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(region) = region {
                loader = loader.region(Region::new(region));
            }
            loader.load().await
        });

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::debug!(bucket = %bucket, endpoint = ?config.endpoint, "Configured S3 client");

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket,
            runtime,
        })
    }
}

impl ObjectStore for S3ObjectStore {
    fn exists(&self, key: &str) -> Result<bool> {
        let result = self.runtime.block_on(
            self.client
                .head_object()
                .bucket(&self.bucket)
                .key(key)
                .send(),
        );

        match result {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(Error::storage(format!(
                "HEAD {} failed: {}",
                key,
                DisplayErrorContext(&e)
            ))),
        }
    }

    fn relocate(&self, from: &str, to: &str) -> Result<()> {
        self.runtime.block_on(async {
            self.client
                .copy_object()
                .bucket(&self.bucket)
                .copy_source(copy_source(&self.bucket, from))
                .key(to)
                .send()
                .await
                .map_err(|e| {
                    Error::storage(format!(
                        "copy {} -> {} failed: {}",
                        from,
                        to,
                        DisplayErrorContext(&e)
                    ))
                })?;

            self.client
                .delete_object()
                .bucket(&self.bucket)
                .key(from)
                .send()
                .await
                .map_err(|e| {
                    Error::storage(format!("delete {} failed: {}", from, DisplayErrorContext(&e)))
                })?;

            Ok::<(), Error>(())
        })
    }
}

/// Parse a bucket identifier (name or ARN) into bucket name and optional region
fn parse_bucket_identifier(identifier: &str) -> (String, Option<String>) {
    if let Some(rest) = identifier.strip_prefix("arn:aws:s3:") {
        // rest = region:account-id:resource
        let parts: Vec<&str> = rest.splitn(3, ':').collect();
        if let [region, _account, resource] = parts.as_slice() {
            let region = (!region.is_empty()).then(|| region.to_string());
            let bucket = resource
                .strip_prefix("bucket/")
                .unwrap_or(resource)
                .to_string();
            return (bucket, region);
        }
    }

    (identifier.to_string(), None)
}

/// `CopySource` header value: `{bucket}/{key}` with the key percent-encoded.
fn copy_source(bucket: &str, key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    format!("{}/{}", bucket, encoded)
}
