//! Scan attribution through explicit credentials and bearer sessions.

use super::helpers::{OPERATOR_PASSWORD, Shopfloor, floor};
use eyre::{bail, ensure};
use rstest::rstest;
use shopfloor::error::ErrorKind;
use shopfloor::identity::domain::{AuthMode, UserRole};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn credentials_attribute_scans_to_the_named_operator(
    floor: Shopfloor,
) -> eyre::Result<()> {
    let second = floor
        .identity
        .register("zeynep", "second-shift-1", UserRole::Operator)?;
    let project = floor.project("Pumps", &["Cut"]).await?;
    let part = floor.part(&project, "P-1", &["Cut"]).await?;
    let tokens = floor.tokens(&part).await?;
    let pair = tokens
        .first()
        .ok_or_else(|| eyre::eyre!("missing token pair"))?;

    let started = floor
        .scans
        .begin_step_as(
            &pair.start_token,
            &AuthMode::credentials("zeynep", "second-shift-1"),
            None,
        )
        .await?;
    let ended = floor
        .scans
        .end_step_as(
            &pair.end_token,
            &AuthMode::credentials("ayse", OPERATOR_PASSWORD),
            None,
        )
        .await?;

    ensure!(started.operator == "zeynep", "start attributed to zeynep");
    ensure!(ended.operator == "ayse", "end attributed to ayse");
    let view = floor.progress.part_status(part.id()).await?;
    let instance = view
        .instances
        .first()
        .ok_or_else(|| eyre::eyre!("missing instance"))?;
    ensure!(
        instance.operator_id() == Some(second.principal().id()),
        "the starting operator is recorded on the instance"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn session_bearer_identifies_the_operator(floor: Shopfloor) -> eyre::Result<()> {
    let project = floor.project("Pumps", &["Cut"]).await?;
    let part = floor.part(&project, "P-1", &["Cut"]).await?;
    let tokens = floor.tokens(&part).await?;
    let pair = tokens
        .first()
        .ok_or_else(|| eyre::eyre!("missing token pair"))?;
    let grant = floor.identity.login("ayse", OPERATOR_PASSWORD)?;

    let started = floor
        .scans
        .begin_step_as(&pair.start_token, &AuthMode::SessionPrincipal, Some(&grant.token))
        .await?;

    ensure!(started.operator == "ayse", "bearer principal acts");
    ensure!(grant.principal == floor.operator, "grant carries the principal");
    Ok(())
}

#[rstest]
#[case::wrong_password(AuthMode::credentials("ayse", "not-the-password"), None)]
#[case::unknown_user(AuthMode::credentials("nobody", OPERATOR_PASSWORD), None)]
#[case::missing_bearer(AuthMode::SessionPrincipal, None)]
#[case::forged_bearer(AuthMode::SessionPrincipal, Some("not.a.token"))]
#[tokio::test(flavor = "multi_thread")]
async fn unauthenticated_scans_are_rejected(
    floor: Shopfloor,
    #[case] mode: AuthMode,
    #[case] bearer: Option<&'static str>,
) -> eyre::Result<()> {
    let project = floor.project("Pumps", &["Cut"]).await?;
    let part = floor.part(&project, "P-1", &["Cut"]).await?;
    let tokens = floor.tokens(&part).await?;
    let pair = tokens
        .first()
        .ok_or_else(|| eyre::eyre!("missing token pair"))?;

    let result = floor
        .scans
        .begin_step_as(&pair.start_token, &mode, bearer)
        .await;

    match result {
        Err(err) if err.kind() == ErrorKind::Authentication => {}
        other => bail!("expected an authentication failure, got {other:?}"),
    }
    let after = floor.tokens(&part).await?;
    ensure!(after == tokens, "nothing written for an unauthenticated scan");
    Ok(())
}
