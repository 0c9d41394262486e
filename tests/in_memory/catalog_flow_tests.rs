//! Project catalog flows over in-memory adapters.

use super::helpers::{Shopfloor, floor};
use eyre::{bail, ensure};
use rstest::rstest;
use shopfloor::error::ErrorKind;
use shopfloor::project::services::CreateProjectRequest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn catalog_lists_projects_in_creation_order(floor: Shopfloor) -> eyre::Result<()> {
    let first = floor.project("Pumps", &["Cut"]).await?;
    let second = floor.project("Valves", &["Cut", "Drill"]).await?;

    let listed = floor.catalog.list_projects().await?;

    let ids: Vec<_> = listed.iter().map(|project| project.id()).collect();
    ensure!(ids == [first.id(), second.id()], "oldest project first");
    ensure!(
        floor.catalog.get_project(second.id()).await? == second,
        "lookup returns the stored project"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_keeps_trimmed_description(floor: Shopfloor) -> eyre::Result<()> {
    let request = CreateProjectRequest::new("  Pumps  ")
        .with_description("  Stainless line  ")
        .with_steps(["Cut"]);

    let project = floor
        .catalog
        .create_project(request, &floor.manager)
        .await?;

    ensure!(project.name().as_str() == "Pumps", "name trimmed");
    ensure!(project.description() == "Stainless line", "description trimmed");
    ensure!(project.created_by() == floor.manager.id(), "creator recorded");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn operators_cannot_manage_the_catalog(floor: Shopfloor) -> eyre::Result<()> {
    let project = floor.project("Pumps", &["Cut"]).await?;

    let created = floor
        .catalog
        .create_project(CreateProjectRequest::new("Rogue").with_steps(["Cut"]), &floor.operator)
        .await;
    let deleted = floor
        .catalog
        .delete_project(project.id(), &floor.operator)
        .await;

    match (created, deleted) {
        (Err(create_err), Err(delete_err))
            if create_err.kind() == ErrorKind::Authorization
                && delete_err.kind() == ErrorKind::Authorization => {}
        other => bail!("expected two authorization failures, got {other:?}"),
    }
    ensure!(floor.catalog.list_projects().await?.len() == 1, "catalog unchanged");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_removes_only_its_parts(floor: Shopfloor) -> eyre::Result<()> {
    let pumps = floor.project("Pumps", &["Cut"]).await?;
    let valves = floor.project("Valves", &["Cut"]).await?;
    let doomed = floor.part(&pumps, "P-1", &["Cut", "Weld"]).await?;
    floor.part(&pumps, "P-2", &["Cut"]).await?;
    let survivor = floor.part(&valves, "V-1", &["Cut"]).await?;
    let doomed_tokens = floor.tokens(&doomed).await?;

    floor
        .catalog
        .delete_project(pumps.id(), &floor.manager)
        .await?;

    let remaining = floor.plans.list_parts().await?;
    ensure!(
        remaining.iter().map(|part| part.id()).collect::<Vec<_>>() == [survivor.id()],
        "only the other project's part remains"
    );
    for pair in &doomed_tokens {
        let result = floor
            .scans
            .begin_step(&pair.start_token, &floor.operator)
            .await;
        ensure!(
            matches!(result, Err(ref err) if err.kind() == ErrorKind::NotFound),
            "tokens of deleted parts must not resolve"
        );
    }
    match floor.catalog.get_project(pumps.id()).await {
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        other => bail!("expected NotFound, got {other:?}"),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn parts_require_an_existing_project(floor: Shopfloor) -> eyre::Result<()> {
    let project = floor.project("Pumps", &["Cut"]).await?;
    floor
        .catalog
        .delete_project(project.id(), &floor.manager)
        .await?;

    match floor.part(&project, "P-1", &["Cut"]).await {
        Err(err) => ensure!(
            err.to_string().contains(&project.id().to_string()),
            "error names the missing project, got {err}"
        ),
        Ok(part) => bail!("part {} created for a deleted project", part.part_number()),
    }
    Ok(())
}
