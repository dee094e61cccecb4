use clap::Parser;
use guestbook::utils::{logger, validation::Validate};
use guestbook::{setup_within, CliArgs, GuestbookError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting guestbook");

    let flags = match args.resolve().and_then(|flags| flags.validate().map(|_| flags)) {
        Ok(flags) => flags,
        Err(e) => exit_with(&e),
    };
    tracing::debug!("Resolved flags: {:?}", flags);

    let mut app = match setup_within(&flags, flags.setup_timeout).await {
        Ok(app) => app,
        Err(e) => exit_with(&e),
    };

    tracing::info!(
        bucket = app.bucket.name(),
        db_endpoint = %app.sql_params.endpoint,
        db_name = %app.sql_params.database,
        "✅ Application wired"
    );

    match app.motd.latest().await {
        Ok(snapshot) => println!("📣 Message of the day: {}", snapshot.value),
        Err(e) => {
            tracing::warn!("Message of the day unavailable: {}", e);
            eprintln!("⚠️  {}", e.user_friendly_message());
        }
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C, shutting down");
                break;
            }
            update = app.motd.watch() => match update {
                Ok(snapshot) => println!("📣 Message of the day: {}", snapshot.value),
                Err(GuestbookError::VariableClosedError { .. }) => break,
                Err(e) => tracing::warn!("Message of the day poll failed: {}", e),
            },
        }
    }

    app.shutdown();
    Ok(())
}

fn exit_with(e: &GuestbookError) -> ! {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
