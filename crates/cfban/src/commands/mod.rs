//! Action dispatch: one handler per `Action`.

pub mod bans;
pub mod diagnostics;
pub mod lifecycle;

use cfban_core::Context;

use crate::cli::Action;
use crate::error::CliError;

pub async fn dispatch(action: Action, target: Option<&str>, ctx: &Context) -> Result<(), CliError> {
    match action {
        Action::Start => lifecycle::start(ctx).await,
        Action::Stop => lifecycle::stop(ctx).await,
        Action::Ban => bans::ban(ctx, target).await?,
        Action::Unban => bans::unban(ctx, target).await?,
        Action::TokenTest => diagnostics::token_test(ctx).await,
        Action::Setup => diagnostics::setup(ctx).await,
        Action::PermissionTest => diagnostics::permission_test(),
    }
    Ok(())
}
