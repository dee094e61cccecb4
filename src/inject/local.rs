//! Wiring for a single machine: a directory as the bucket, a file as the
//! message of the day, and a local MySQL server.

use crate::adapters::file_bucket::{FileBucket, FileBucketOpener};
use crate::adapters::filevar::FileVariableOpener;
use crate::core::application::Application;
use crate::core::runtimevar::{string_decoder, Variable};
use crate::domain::model::{Flags, SqlParams, WatchOptions};
use crate::domain::ports::{BucketOpener, VariableOpener};
use crate::utils::error::Result;
use std::sync::Arc;

const LOCAL_DB_HOST: &str = "localhost";

pub async fn local_bucket(flags: &Flags) -> Result<FileBucket> {
    FileBucketOpener.open_bucket(&flags.bucket).await
}

pub fn local_sql_params(flags: &Flags) -> SqlParams {
    let endpoint = if flags.db_host.is_empty() {
        LOCAL_DB_HOST.to_string()
    } else {
        flags.db_host.clone()
    };

    SqlParams {
        endpoint,
        database: flags.db_name.clone(),
        user: flags.db_user.clone(),
        password: flags.db_password.clone(),
    }
}

pub async fn local_motd_var(flags: &Flags) -> Result<Variable<String>> {
    FileVariableOpener
        .new_variable(
            &flags.motd_var,
            string_decoder,
            WatchOptions {
                wait_time: flags.motd_var_wait_time,
            },
        )
        .await
}

pub async fn setup_local(flags: &Flags) -> Result<Application> {
    let bucket = local_bucket(flags).await?;
    let motd = local_motd_var(flags).await?;
    let sql_params = local_sql_params(flags);

    tracing::info!(
        bucket = %flags.bucket,
        motd_var = %flags.motd_var,
        db_host = %sql_params.endpoint,
        "Wired application for local development"
    );
    Ok(Application::new(Arc::new(bucket), sql_params, motd))
}
