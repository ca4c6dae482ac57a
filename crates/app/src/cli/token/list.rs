use clap::Args;
use jiff::Timestamp;
use storefront_app::{auth::PgAuthService, domain::users::records::UserUuid};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// User whose tokens should be listed
    #[arg(long)]
    user_uuid: Uuid,
}

fn or(value: Option<Timestamp>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), |value| value.to_string())
}

pub(crate) async fn run(args: ListTokensArgs) -> Result<(), String> {
    let service = PgAuthService::new(args.database.connect().await?);

    let tokens = service
        .list_api_tokens(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to list tokens: {error}"))?;

    if tokens.is_empty() {
        println!("no tokens found for user {}", args.user_uuid);
        return Ok(());
    }

    for token in tokens {
        println!("token_uuid: {}", token.uuid);
        println!("created_at: {}", token.created_at);
        println!("last_used_at: {}", or(token.last_used_at, "never"));
        println!("expires_at: {}", or(token.expires_at, "none"));
        println!("revoked_at: {}", or(token.revoked_at, "active"));
        println!();
    }

    Ok(())
}
