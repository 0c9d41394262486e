//! When steps for scan transition BDD scenarios.

use super::world::{ShopfloorWorld, run_async, step_list};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use shopfloor::production::services::CreatePartRequest;

#[when("the operator scans the start token of step {index:u32}")]
fn scan_start(world: &mut ShopfloorWorld, index: u32) -> Result<(), eyre::Report> {
    let (start, _) = world.tokens_at(index)?;
    let result = run_async(world.scans.begin_step(&start, &world.operator)).map(|_| ());
    world.last_scan_result = Some(result);
    Ok(())
}

#[when("the operator scans the end token of step {index:u32}")]
fn scan_end(world: &mut ShopfloorWorld, index: u32) -> Result<(), eyre::Report> {
    let (_, end) = world.tokens_at(index)?;
    let result = run_async(world.scans.end_step(&end, &world.operator)).map(|_| ());
    world.last_scan_result = Some(result);
    Ok(())
}

#[when(r#"a part "{number}" is created with steps "{steps}""#)]
fn create_part_with_steps(
    world: &mut ShopfloorWorld,
    number: String,
    steps: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let request = CreatePartRequest::new(number, project_id).with_steps(step_list(&steps));
    let result = run_async(world.plans.create_part(request));
    if let Ok(ref part) = result {
        world.part = Some(part.clone());
    }
    world.last_part_result = Some(result);
    Ok(())
}

#[when(r#"a part "{number}" is created without steps"#)]
fn create_part_without_steps(
    world: &mut ShopfloorWorld,
    number: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let result = run_async(world.plans.create_part(CreatePartRequest::new(number, project_id)));
    world.last_part_result = Some(result);
    Ok(())
}

#[when("the manager deletes the project")]
fn delete_project(world: &mut ShopfloorWorld) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    run_async(world.catalog.delete_project(project_id, &world.manager))
        .wrap_err("delete scenario project")
}
