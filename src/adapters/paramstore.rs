use crate::core::runtimevar::{Decoder, Variable};
use crate::domain::model::{RawValue, WatchOptions};
use crate::domain::ports::{VariableOpener, Watcher};
use crate::utils::error::{GuestbookError, Result};
use async_trait::async_trait;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::operation::get_parameter::GetParameterError;
use aws_sdk_ssm::Client as SsmClient;

/// Polls one SSM Parameter Store parameter. SecureString values are decrypted.
#[derive(Debug, Clone)]
pub struct ParamStoreWatcher {
    client: SsmClient,
    name: String,
}

impl ParamStoreWatcher {
    fn not_found(&self) -> GuestbookError {
        GuestbookError::VariableNotFoundError {
            name: self.name.clone(),
        }
    }
}

#[async_trait]
impl Watcher for ParamStoreWatcher {
    async fn fetch(&self) -> Result<RawValue> {
        let output = self
            .client
            .get_parameter()
            .name(&self.name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                if matches!(
                    e.as_service_error(),
                    Some(GetParameterError::ParameterNotFound(_))
                ) {
                    self.not_found()
                } else {
                    GuestbookError::VariableError {
                        name: self.name.clone(),
                        message: DisplayErrorContext(&e).to_string(),
                    }
                }
            })?;

        let parameter = output.parameter().ok_or_else(|| self.not_found())?;
        let value = parameter.value().unwrap_or_default();

        Ok(RawValue::new(value.as_bytes()).with_version(parameter.version().to_string()))
    }
}

/// Parameter Store client that opens runtime variables by parameter name.
#[derive(Debug, Clone)]
pub struct ParamStoreClient {
    client: SsmClient,
}

impl ParamStoreClient {
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }
}

impl VariableOpener for ParamStoreClient {
    async fn new_variable<T>(
        &self,
        name: &str,
        decoder: Decoder<T>,
        options: WatchOptions,
    ) -> Result<Variable<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        let watcher = ParamStoreWatcher {
            client: self.client.clone(),
            name: name.to_string(),
        };
        Variable::open(name, watcher, decoder, options)
    }
}
