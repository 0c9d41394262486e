//! End-to-end work order flows over in-memory adapters.

use super::helpers::{Shopfloor, floor};
use eyre::{bail, ensure};
use rstest::rstest;
use shopfloor::error::ErrorKind;
use shopfloor::production::{
    domain::{COMPLETED_STEP_LABEL, ProcessStatus},
    services::ProductionServiceError,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tokens_follow_the_part_plan(floor: Shopfloor) -> eyre::Result<()> {
    let project = floor.project("Pump housing", &["Cut", "Weld", "Paint"]).await?;
    let part = floor.part(&project, "PH-001", &["Deburr", "Inspect"]).await?;

    let tokens = floor.tokens(&part).await?;

    let names: Vec<&str> = tokens.iter().map(|pair| pair.step_name.as_str()).collect();
    ensure!(names == ["Deburr", "Inspect"], "plan drives steps, got {names:?}");
    let indices: Vec<u32> = tokens.iter().map(|pair| pair.step_index).collect();
    ensure!(indices == [0, 1], "indices are contiguous from zero");
    ensure!(
        tokens.iter().all(|pair| pair.status == ProcessStatus::Pending),
        "new steps are pending"
    );
    ensure!(
        tokens
            .iter()
            .all(|pair| pair.start_token != pair.end_token),
        "start and end tokens differ"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn progress_tracks_each_completed_step(floor: Shopfloor) -> eyre::Result<()> {
    let project = floor.project("Pump housing", &["Cut"]).await?;
    let part = floor
        .part(&project, "PH-002", &["Cut", "Weld", "Grind", "Paint"])
        .await?;
    let tokens = floor.tokens(&part).await?;
    let mut seen = Vec::new();

    for pair in &tokens {
        floor.scans.begin_step(&pair.start_token, &floor.operator).await?;
        floor.scans.end_step(&pair.end_token, &floor.operator).await?;
        let listed = floor
            .progress
            .list_parts_with_step_info(Some(project.id()))
            .await?;
        let row = listed
            .first()
            .ok_or_else(|| eyre::eyre!("part missing from listing"))?;
        seen.push((
            row.step_info.current_step_name.clone(),
            row.step_info.progress_percent,
        ));
    }

    let labels: Vec<&str> = seen.iter().map(|(label, _)| label.as_str()).collect();
    ensure!(
        labels == ["Weld", "Grind", "Paint", COMPLETED_STEP_LABEL],
        "labels follow the pointer, got {labels:?}"
    );
    let percents: Vec<f64> = seen.iter().map(|(_, percent)| *percent).collect();
    ensure!(percents == [50.0, 75.0, 100.0, 100.0], "got {percents:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dashboard_covers_parts_of_every_project(floor: Shopfloor) -> eyre::Result<()> {
    let pumps = floor.project("Pumps", &["Cut"]).await?;
    let valves = floor.project("Valves", &["Cut"]).await?;
    let finished = floor.part(&pumps, "P-1", &["Cut"]).await?;
    let waiting = floor.part(&valves, "V-1", &["Cut", "Drill"]).await?;
    floor.run_all_steps(&finished).await?;

    let dashboard = floor.progress.dashboard_overview().await?;

    ensure!(dashboard.len() == 2, "one row per part");
    let finished_row = dashboard
        .iter()
        .find(|entry| entry.part.id() == finished.id())
        .ok_or_else(|| eyre::eyre!("finished part missing"))?;
    ensure!(finished_row.project.name().as_str() == "Pumps", "project joined");
    ensure!(finished_row.part.status() == ProcessStatus::Completed, "part completed");
    let waiting_row = dashboard
        .iter()
        .find(|entry| entry.part.id() == waiting.id())
        .ok_or_else(|| eyre::eyre!("waiting part missing"))?;
    ensure!(waiting_row.step_info.current_step_name == "Cut", "first step shown");
    ensure!(waiting_row.part.status() == ProcessStatus::Pending, "untouched part pending");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_scans_leave_state_untouched(floor: Shopfloor) -> eyre::Result<()> {
    let project = floor.project("Pumps", &["Cut"]).await?;
    let part = floor.part(&project, "P-7", &["Cut", "Drill"]).await?;
    let tokens = floor.tokens(&part).await?;
    let (first, second) = match tokens.as_slice() {
        [first, second] => (first, second),
        other => bail!("expected two steps, got {}", other.len()),
    };

    let attempts = [
        floor.scans.begin_step(&second.start_token, &floor.operator).await.err(),
        floor.scans.end_step(&first.end_token, &floor.operator).await.err(),
        floor.scans.end_step(&second.end_token, &floor.operator).await.err(),
    ];
    let kinds: Vec<Option<ErrorKind>> = attempts
        .iter()
        .map(|err| err.as_ref().map(ProductionServiceError::kind))
        .collect();
    ensure!(
        kinds
            == [
                Some(ErrorKind::OrderViolation),
                Some(ErrorKind::NotStarted),
                Some(ErrorKind::NotStarted),
            ],
        "got {kinds:?}"
    );

    let view = floor.progress.part_status(part.id()).await?;
    ensure!(view.part == part, "part untouched");
    ensure!(
        view.instances
            .iter()
            .all(|instance| instance.status() == ProcessStatus::Pending),
        "instances untouched"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_part_tokens_no_longer_resolve(floor: Shopfloor) -> eyre::Result<()> {
    let project = floor.project("Pumps", &["Cut"]).await?;
    let part = floor.part(&project, "P-9", &["Cut"]).await?;
    let tokens = floor.tokens(&part).await?;
    let pair = tokens
        .first()
        .ok_or_else(|| eyre::eyre!("missing token pair"))?;

    floor.plans.delete_part(part.id(), &floor.manager).await?;
    let result = floor.scans.begin_step(&pair.start_token, &floor.operator).await;

    match result {
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        other => bail!("expected NotFound, got {other:?}"),
    }
    ensure!(floor.plans.list_parts().await?.is_empty(), "part removed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn report_includes_every_completed_step(floor: Shopfloor) -> eyre::Result<()> {
    let project = floor.project("Pumps", &["Cut"]).await?;
    let part = floor.part(&project, "P-3", &["Cut", "Drill"]).await?;
    floor.run_all_steps(&part).await?;

    let report = floor.reports.completed_durations(&floor.manager).await?;

    ensure!(report.len() == 2, "both steps reported");
    ensure!(
        report.windows(2).all(|pair| match pair {
            [newer, older] => newer.end_time >= older.end_time,
            _ => true,
        }),
        "newest completion first"
    );
    for row in &report {
        ensure!(row.part_number == "P-3", "part joined");
        ensure!(row.operator_name == "ayse", "operator joined");
        ensure!(row.duration_minutes >= 0.0, "duration is non-negative");
    }
    Ok(())
}
