use crate::config::toml_config::{AwsConfig, FileConfig};
use crate::domain::model::{Flags, Target};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "guestbook")]
#[command(about = "Wires up the guestbook's blob storage, database and message of the day")]
pub struct CliArgs {
    #[arg(long, env = "GUESTBOOK_CONFIG", help = "TOML file with default settings")]
    pub config: Option<PathBuf>,

    #[arg(long = "env", value_enum, env = "GUESTBOOK_ENV", help = "Environment to wire up [default: local]")]
    pub target: Option<Target>,

    #[arg(long, env = "GUESTBOOK_BUCKET", help = "Bucket name (aws) or directory (local)")]
    pub bucket: Option<String>,

    #[arg(long, env = "GUESTBOOK_DB_HOST", help = "Database host or RDS endpoint")]
    pub db_host: Option<String>,

    #[arg(long, env = "GUESTBOOK_DB_NAME", help = "Database name [default: guestbook]")]
    pub db_name: Option<String>,

    #[arg(long, env = "GUESTBOOK_DB_USER", help = "Database user [default: guestbook]")]
    pub db_user: Option<String>,

    #[arg(long, env = "GUESTBOOK_DB_PASSWORD", hide_env_values = true, help = "Database user password")]
    pub db_password: Option<String>,

    #[arg(long, env = "GUESTBOOK_MOTD_VAR", help = "Message of the day parameter name (aws) or file (local)")]
    pub motd_var: Option<String>,

    #[arg(long, help = "Seconds between message of the day polls [default: 5]")]
    pub motd_var_wait_time: Option<f64>,

    #[arg(long, help = "Give up on startup after this many seconds [default: 30]")]
    pub setup_timeout_secs: Option<u64>,

    #[arg(long, env = "AWS_REGION", help = "AWS region override")]
    pub aws_region: Option<String>,

    #[arg(long, env = "AWS_ENDPOINT_URL", help = "AWS endpoint override, e.g. LocalStack")]
    pub aws_endpoint_url: Option<String>,

    #[arg(long, help = "Use path-style S3 addressing")]
    pub s3_force_path_style: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON")]
    pub json_logs: bool,
}

impl CliArgs {
    /// Settings given on the command line or through the environment.
    pub fn to_layer(&self) -> FileConfig {
        let aws = AwsConfig {
            region: self.aws_region.clone(),
            endpoint_url: self.aws_endpoint_url.clone(),
            s3_force_path_style: self.s3_force_path_style.then_some(true),
        };

        FileConfig {
            env: self.target,
            bucket: self.bucket.clone(),
            db_host: self.db_host.clone(),
            db_name: self.db_name.clone(),
            db_user: self.db_user.clone(),
            db_password: self.db_password.clone(),
            motd_var: self.motd_var.clone(),
            motd_var_wait_time: self.motd_var_wait_time,
            setup_timeout_secs: self.setup_timeout_secs,
            aws: Some(aws),
        }
    }

    /// Command line, then config file, then defaults.
    pub fn resolve(&self) -> Result<Flags> {
        let file = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        self.to_layer().merge(file).into_flags()
    }
}
