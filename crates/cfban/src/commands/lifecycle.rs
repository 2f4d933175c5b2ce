use tracing::debug;

use cfban_core::{Context, provision};

pub async fn start(ctx: &Context) {
    let report = provision::startup(ctx).await;
    debug!(
        list = report.list_id.is_some(),
        filter = report.filter.is_some(),
        rule = report.rule_id.is_some(),
        "start finished"
    );
}

pub async fn stop(ctx: &Context) {
    let report = provision::teardown(ctx).await;
    debug!(?report, "stop finished");
}
