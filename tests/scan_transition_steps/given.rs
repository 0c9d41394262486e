//! Given steps for scan transition BDD scenarios.

use super::world::{ShopfloorWorld, run_async, step_list};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use shopfloor::production::services::CreatePartRequest;
use shopfloor::project::services::CreateProjectRequest;

#[given(r#"a project "{name}" with template "{template}""#)]
fn project_with_template(
    world: &mut ShopfloorWorld,
    name: String,
    template: String,
) -> Result<(), eyre::Report> {
    let request = CreateProjectRequest::new(name).with_steps(step_list(&template));
    let project = run_async(world.catalog.create_project(request, &world.manager))
        .wrap_err("create project for scenario")?;
    world.project = Some(project);
    Ok(())
}

#[given(r#"a part "{number}" with steps "{steps}""#)]
fn part_with_steps(
    world: &mut ShopfloorWorld,
    number: String,
    steps: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let request = CreatePartRequest::new(number, project_id).with_steps(step_list(&steps));
    let part = run_async(world.plans.create_part(request)).wrap_err("create part for scenario")?;
    world.part = Some(part);
    Ok(())
}
