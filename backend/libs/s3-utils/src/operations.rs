/// S3-backed object store: source download and derivative upload
use crate::config::S3Config;
use crate::error::StorageError;
use crate::{ObjectAcl, ObjectStore, PutObject};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Arc<Client>,
}

impl S3ObjectStore {
    /// Wrap an already configured SDK client
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Build a client from the default provider chain plus overrides
    pub async fn from_config(config: &S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&shared).force_path_style(config.force_path_style);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self::new(Arc::new(Client::from_conf(builder.build())))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, container: &str, key: &str) -> Result<Bytes, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(container)
            .key(key)
            .send()
            .await
            .map_err(|err| classify_sdk_error(err, container, key))?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Body(e.to_string()))?
            .into_bytes();

        debug!(container = %container, key = %key, size = body.len(), "Downloaded object");
        Ok(body)
    }

    async fn put_object(&self, request: PutObject) -> Result<(), StorageError> {
        let content_length = i64::try_from(request.body.len())
            .map_err(|_| StorageError::Backend("object body too large".to_string()))?;

        self.client
            .put_object()
            .bucket(&request.container)
            .key(&request.key)
            .acl(canned_acl(request.acl))
            .content_type(&request.content_type)
            .content_length(content_length)
            .body(ByteStream::from(request.body))
            .send()
            .await
            .map_err(|err| classify_sdk_error(err, &request.container, &request.key))?;

        debug!(
            container = %request.container,
            key = %request.key,
            size = content_length,
            "Uploaded object"
        );
        Ok(())
    }
}

fn canned_acl(acl: ObjectAcl) -> ObjectCannedAcl {
    match acl {
        ObjectAcl::Private => ObjectCannedAcl::Private,
        ObjectAcl::PublicRead => ObjectCannedAcl::PublicRead,
    }
}

/// Map an SDK failure onto the backend-neutral error, keeping the service message
fn classify_sdk_error<E>(err: SdkError<E>, container: &str, key: &str) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let message = err
        .message()
        .map(str::to_owned)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    match err.code() {
        Some("NoSuchKey") | Some("NotFound") => StorageError::NotFound {
            container: container.to_string(),
            key: key.to_string(),
        },
        Some("AccessDenied")
        | Some("AllAccessDisabled")
        | Some("InvalidAccessKeyId")
        | Some("SignatureDoesNotMatch") => StorageError::AccessDenied {
            container: container.to_string(),
            key: key.to_string(),
            message,
        },
        _ => StorageError::Backend(message),
    }
}
