use tracing::debug;

use cfban_core::{Context, diagnostics};

pub async fn token_test(ctx: &Context) {
    let valid = diagnostics::token_test(ctx).await;
    debug!(valid, "token-test finished");
}

pub async fn setup(ctx: &Context) {
    let complete = diagnostics::setup(ctx).await;
    debug!(complete, "setup finished");
}

pub fn permission_test() {
    diagnostics::permission_test();
}
