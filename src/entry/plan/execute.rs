use crate::app::{RunOutcome, print_summary, run_load};
use crate::error::AppResult;

use super::types::RunPlan;

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    let RunPlan {
        mut source,
        template,
        settings,
    } = plan;

    let RunOutcome {
        mut total,
        overview,
    } = run_load(source.as_mut(), &template, &settings).await?;
    print_summary(&mut total, &overview);
    Ok(())
}
