//! Then steps for scan transition BDD scenarios.

use super::world::{ShopfloorWorld, run_async, step_list};
use rstest_bdd_macros::then;
use shopfloor::production::domain::ProcessStatus;

fn parse_status(raw: &str) -> Result<ProcessStatus, eyre::Report> {
    ProcessStatus::try_from(raw).map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
}

#[then(r#"step {index:u32} is "{status}""#)]
fn step_status_is(world: &ShopfloorWorld, index: u32, status: String) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let part_id = world.part()?.id();
    let pair = run_async(world.plans.list_scan_tokens(part_id))?
        .into_iter()
        .find(|pair| pair.step_index == index)
        .ok_or_else(|| eyre::eyre!("part has no step {index}"))?;
    eyre::ensure!(
        pair.status == expected,
        "expected step {index} to be {expected}, found {}",
        pair.status
    );
    Ok(())
}

#[then(r#"the part is "{status}" on step {index:u32}"#)]
fn part_status_is(world: &ShopfloorWorld, status: String, index: u32) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let view = run_async(world.progress.part_status(world.part()?.id()))?;
    eyre::ensure!(
        view.part.status() == expected,
        "expected part to be {expected}, found {}",
        view.part.status()
    );
    eyre::ensure!(
        view.part.current_step_index() == index,
        "expected part on step {index}, found {}",
        view.part.current_step_index()
    );
    Ok(())
}

#[then("the last scan succeeds")]
fn last_scan_succeeds(world: &ShopfloorWorld) -> Result<(), eyre::Report> {
    match world.last_scan_result.as_ref() {
        Some(Ok(())) => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("expected scan to succeed, got {err}")),
        None => Err(eyre::eyre!("no scan was performed")),
    }
}

#[then(r#"the last scan fails with "{kind}""#)]
fn last_scan_fails_with(world: &ShopfloorWorld, kind: String) -> Result<(), eyre::Report> {
    match world.last_scan_result.as_ref() {
        Some(Err(err)) if err.kind().as_str() == kind => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("expected {kind}, got {} ({err})", err.kind())),
        Some(Ok(())) => Err(eyre::eyre!("expected {kind}, but the scan succeeded")),
        None => Err(eyre::eyre!("no scan was performed")),
    }
}

#[then(r#"the dashboard shows "{label}" at {percent:u32} percent"#)]
fn dashboard_shows(world: &ShopfloorWorld, label: String, percent: u32) -> Result<(), eyre::Report> {
    let part_id = world.part()?.id();
    let entries = run_async(world.progress.dashboard_overview())?;
    let entry = entries
        .iter()
        .find(|entry| entry.part.id() == part_id)
        .ok_or_else(|| eyre::eyre!("part missing from dashboard"))?;
    eyre::ensure!(
        entry.step_info.current_step_name == label,
        "expected label {label}, found {}",
        entry.step_info.current_step_name
    );
    eyre::ensure!(
        (entry.step_info.progress_percent - f64::from(percent)).abs() < 1e-9,
        "expected {percent}%, found {}",
        entry.step_info.progress_percent
    );
    Ok(())
}

#[then(r#"the part has steps "{steps}""#)]
fn part_has_steps(world: &ShopfloorWorld, steps: String) -> Result<(), eyre::Report> {
    let expected = step_list(&steps);
    let view = run_async(world.progress.part_status(world.part()?.id()))?;
    let actual: Vec<String> = view
        .instances
        .iter()
        .map(|instance| instance.step_name().as_str().to_owned())
        .collect();
    eyre::ensure!(actual == expected, "expected steps {expected:?}, found {actual:?}");
    Ok(())
}

#[then(r#"part creation fails with "{kind}""#)]
fn part_creation_fails_with(world: &ShopfloorWorld, kind: String) -> Result<(), eyre::Report> {
    match world.last_part_result.as_ref() {
        Some(Err(err)) if err.kind().as_str() == kind => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("expected {kind}, got {} ({err})", err.kind())),
        Some(Ok(part)) => Err(eyre::eyre!("expected {kind}, but {} was created", part.part_number())),
        None => Err(eyre::eyre!("no part creation was attempted")),
    }
}

#[then("no parts remain")]
fn no_parts_remain(world: &ShopfloorWorld) -> Result<(), eyre::Report> {
    let parts = run_async(world.plans.list_parts())?;
    eyre::ensure!(parts.is_empty(), "expected no parts, found {}", parts.len());
    Ok(())
}
