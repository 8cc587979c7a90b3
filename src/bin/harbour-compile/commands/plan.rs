//! `harbour-compile plan` command

use anyhow::Result;

use super::prepare;
use crate::cli::PlanArgs;

pub fn execute(args: PlanArgs) -> Result<()> {
    let prepared = prepare(&args.request)?;
    let invocations = prepared.driver.plan(&prepared.spec)?;

    println!("{}", serde_json::to_string_pretty(&invocations)?);

    Ok(())
}
