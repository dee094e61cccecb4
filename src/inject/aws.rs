//! Wiring for Amazon Web Services: S3 for blobs, RDS MySQL connection
//! parameters, and the message of the day from SSM Parameter Store.

use crate::core::application::Application;
use crate::core::runtimevar::{string_decoder, Variable};
use crate::domain::model::{Flags, SqlParams, WatchOptions};
use crate::domain::ports::{BucketOpener, VariableOpener};
use crate::utils::error::Result;
use std::sync::Arc;

/// Opens the bucket named by the flags. Errors come back exactly as the
/// opener reported them.
pub async fn aws_bucket<O: BucketOpener>(opener: &O, flags: &Flags) -> Result<O::Bucket> {
    opener.open_bucket(&flags.bucket).await
}

/// RDS connection parameters, copied field for field from the flags.
pub fn aws_sql_params(flags: &Flags) -> SqlParams {
    SqlParams {
        endpoint: flags.db_host.clone(),
        database: flags.db_name.clone(),
        user: flags.db_user.clone(),
        password: flags.db_password.clone(),
    }
}

/// Opens the message of the day as a string variable polled every
/// `motd_var_wait_time`.
pub async fn aws_motd_var<C: VariableOpener>(client: &C, flags: &Flags) -> Result<Variable<String>> {
    client
        .new_variable(
            &flags.motd_var,
            string_decoder,
            WatchOptions {
                wait_time: flags.motd_var_wait_time,
            },
        )
        .await
}

/// Runs the three providers in order against the given backends.
pub async fn build_application<O, C>(
    bucket_opener: &O,
    motd_client: &C,
    flags: &Flags,
) -> Result<Application>
where
    O: BucketOpener,
    C: VariableOpener,
{
    let bucket = aws_bucket(bucket_opener, flags).await?;
    let motd = aws_motd_var(motd_client, flags).await?;
    let sql_params = aws_sql_params(flags);

    Ok(Application::new(Arc::new(bucket), sql_params, motd))
}

#[cfg(feature = "aws")]
pub async fn setup_aws(flags: &Flags) -> Result<Application> {
    use crate::adapters::aws::{load_sdk_config, s3_client, ssm_client};
    use crate::adapters::paramstore::ParamStoreClient;
    use crate::adapters::s3::S3BucketOpener;

    let sdk_config = load_sdk_config(flags).await;
    let bucket_opener = S3BucketOpener::new(s3_client(&sdk_config, flags.s3_force_path_style));
    let motd_client = ParamStoreClient::new(ssm_client(&sdk_config));

    let app = build_application(&bucket_opener, &motd_client, flags).await?;
    tracing::info!(
        bucket = %flags.bucket,
        motd_var = %flags.motd_var,
        db_host = %flags.db_host,
        "Wired application for AWS"
    );
    Ok(app)
}
