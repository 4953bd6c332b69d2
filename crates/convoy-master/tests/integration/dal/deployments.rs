/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::TestFixture;
use convoy_master::error::Error;
use convoy_models::models::deployments::{json_to_string_vec, DeploymentStatus};
use uuid::Uuid;

// =========================================================================
// CREATE TESTS
// =========================================================================

#[test]
fn test_create_deployment() {
    let fixture = TestFixture::new();
    let agent = fixture.create_test_agent("builder");
    let release_a = fixture.create_test_release("widget", "v1.2.0");
    let release_b = fixture.create_test_release("gadget", "v0.9.1");

    let deployment = fixture
        .dal
        .deployments()
        .create(agent.id, vec![release_a.id.clone(), release_b.id.clone()])
        .expect("Failed to create deployment");

    assert!(deployment.id.starts_with(&format!("deploy-{}", agent.name)));
    assert_eq!(deployment.status, DeploymentStatus::Pending);
    assert_eq!(deployment.agent_id, agent.id);
    assert_eq!(deployment.agent_name, agent.name);
    assert_eq!(
        json_to_string_vec(&deployment.release_ids),
        vec![release_a.id, release_b.id]
    );
    assert_eq!(
        json_to_string_vec(&deployment.release_tags),
        vec!["v1.2.0".to_string(), "v0.9.1".to_string()]
    );
    assert!(deployment.started_at.is_none());
    assert!(deployment.completed_at.is_none());
    assert!(deployment.error_message.is_none());
}

#[test]
fn test_create_deployment_unknown_agent() {
    let fixture = TestFixture::new();
    let release = fixture.create_test_release("widget", "v1.0.0");

    let result = fixture
        .dal
        .deployments()
        .create(Uuid::new_v4(), vec![release.id]);

    assert!(matches!(result, Err(Error::NotFound("agent", _))));
}

#[test]
fn test_create_deployment_unknown_release_writes_nothing() {
    let fixture = TestFixture::new();
    let agent = fixture.create_test_agent("builder");
    let release = fixture.create_test_release("widget", "v1.0.0");

    let result = fixture
        .dal
        .deployments()
        .create(agent.id, vec![release.id, "no-such-release".to_string()]);

    match result {
        Err(Error::NotFound("release", id)) => assert_eq!(id, "no-such-release"),
        other => panic!("Expected release NotFound, got {:?}", other.map(|d| d.id)),
    }

    // All-or-nothing: the valid release must not have produced a row either.
    let rows = fixture
        .dal
        .deployments()
        .list_for_agent(agent.id)
        .expect("Failed to list deployments");
    assert!(rows.is_empty());
}

#[test]
fn test_create_deployment_without_releases() {
    let fixture = TestFixture::new();
    let agent = fixture.create_test_agent("builder");

    let result = fixture.dal.deployments().create(agent.id, vec![]);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

// =========================================================================
// CLAIM TESTS
// =========================================================================

#[test]
fn test_next_pending_fifo_order() {
    let fixture = TestFixture::new();
    let agent = fixture.create_test_agent("builder");
    let release = fixture.create_test_release("widget", "v1.0.0");

    let first = fixture.create_test_deployment(&agent, vec![release.id.clone()]);
    let second = fixture.create_test_deployment(&agent, vec![release.id.clone()]);
    let third = fixture.create_test_deployment(&agent, vec![release.id.clone()]);

    for expected in [&first, &second, &third] {
        let claimed = fixture
            .dal
            .deployments()
            .next_pending(agent.id)
            .expect("Failed to claim deployment")
            .expect("Expected a pending deployment");
        assert_eq!(claimed.id, expected.id);
        assert_eq!(claimed.status, DeploymentStatus::InProgress);
        assert!(claimed.started_at.is_some());
    }

    let empty = fixture
        .dal
        .deployments()
        .next_pending(agent.id)
        .expect("Failed to poll for deployment");
    assert!(empty.is_none());
}

#[test]
fn test_next_pending_unknown_agent() {
    let fixture = TestFixture::new();

    let result = fixture.dal.deployments().next_pending(Uuid::new_v4());
    assert!(matches!(result, Err(Error::NotFound("agent", _))));
}

#[test]
fn test_next_pending_ignores_other_agents() {
    let fixture = TestFixture::new();
    let owner = fixture.create_test_agent("owner");
    let bystander = fixture.create_test_agent("bystander");
    let release = fixture.create_test_release("widget", "v1.0.0");

    fixture.create_test_deployment(&owner, vec![release.id.clone()]);

    let nothing = fixture
        .dal
        .deployments()
        .next_pending(bystander.id)
        .expect("Failed to poll for deployment");
    assert!(nothing.is_none());
}

#[test]
fn test_next_pending_concurrent_claims_exactly_once() {
    let fixture = TestFixture::new();
    let agent = fixture.create_test_agent("racer");
    let release = fixture.create_test_release("widget", "v1.0.0");
    let deployment = fixture.create_test_deployment(&agent, vec![release.id.clone()]);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let dal = fixture.dal.clone();
        let agent_id = agent.id;
        handles.push(std::thread::spawn(move || {
            dal.deployments()
                .next_pending(agent_id)
                .expect("Failed to poll for deployment")
        }));
    }

    let claims: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("Claim thread panicked"))
        .filter_map(|claim| claim)
        .collect();

    assert_eq!(claims.len(), 1, "deployment was dispatched more than once");
    assert_eq!(claims[0].id, deployment.id);
}

// =========================================================================
// COMPLETION TESTS
// =========================================================================

#[test]
fn test_complete_success_lifecycle() {
    let fixture = TestFixture::new();
    let agent = fixture.create_test_agent("builder");
    let release = fixture.create_test_release("widget", "v1.0.0");
    let deployment = fixture.create_test_deployment(&agent, vec![release.id.clone()]);

    fixture
        .dal
        .deployments()
        .next_pending(agent.id)
        .expect("Failed to claim deployment")
        .expect("Expected a pending deployment");

    let completed = fixture
        .dal
        .deployments()
        .complete(&deployment.id, DeploymentStatus::Success, None)
        .expect("Failed to complete deployment");

    assert_eq!(completed.status, DeploymentStatus::Success);
    assert!(completed.completed_at.is_some());
    assert!(completed.error_message.is_none());
}

#[test]
fn test_complete_failed_records_error() {
    let fixture = TestFixture::new();
    let agent = fixture.create_test_agent("builder");
    let release = fixture.create_test_release("widget", "v1.0.0");
    let deployment = fixture.create_test_deployment(&agent, vec![release.id.clone()]);

    let failed = fixture
        .dal
        .deployments()
        .complete(
            &deployment.id,
            DeploymentStatus::Failed,
            Some("checksum mismatch".to_string()),
        )
        .expect("Failed to complete deployment");

    assert_eq!(failed.status, DeploymentStatus::Failed);
    assert_eq!(failed.error_message, Some("checksum mismatch".to_string()));
}

#[test]
fn test_complete_rejects_non_terminal_status() {
    let fixture = TestFixture::new();
    let agent = fixture.create_test_agent("builder");
    let release = fixture.create_test_release("widget", "v1.0.0");
    let deployment = fixture.create_test_deployment(&agent, vec![release.id.clone()]);

    for status in [DeploymentStatus::Pending, DeploymentStatus::InProgress] {
        let result = fixture.dal.deployments().complete(&deployment.id, status, None);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    // The deployment is untouched.
    let current = fixture.dal.deployments().get(&deployment.id).unwrap().unwrap();
    assert_eq!(current.status, DeploymentStatus::Pending);
}

#[test]
fn test_complete_same_status_is_idempotent() {
    let fixture = TestFixture::new();
    let agent = fixture.create_test_agent("builder");
    let release = fixture.create_test_release("widget", "v1.0.0");
    let deployment = fixture.create_test_deployment(&agent, vec![release.id.clone()]);

    let first = fixture
        .dal
        .deployments()
        .complete(&deployment.id, DeploymentStatus::Success, None)
        .expect("Failed to complete deployment");

    let second = fixture
        .dal
        .deployments()
        .complete(&deployment.id, DeploymentStatus::Success, None)
        .expect("Repeated completion report should be accepted");

    assert_eq!(second.status, DeploymentStatus::Success);
    assert_eq!(second.completed_at, first.completed_at);
}

#[test]
fn test_complete_conflicting_terminal_status() {
    let fixture = TestFixture::new();
    let agent = fixture.create_test_agent("builder");
    let release = fixture.create_test_release("widget", "v1.0.0");
    let deployment = fixture.create_test_deployment(&agent, vec![release.id.clone()]);

    fixture
        .dal
        .deployments()
        .complete(&deployment.id, DeploymentStatus::Success, None)
        .expect("Failed to complete deployment");

    let result = fixture.dal.deployments().complete(
        &deployment.id,
        DeploymentStatus::Failed,
        Some("late failure report".to_string()),
    );
    assert!(matches!(result, Err(Error::Conflict(_))));

    // Terminal state is unchanged.
    let current = fixture.dal.deployments().get(&deployment.id).unwrap().unwrap();
    assert_eq!(current.status, DeploymentStatus::Success);
}

#[test]
fn test_complete_unknown_deployment() {
    let fixture = TestFixture::new();

    let result =
        fixture
            .dal
            .deployments()
            .complete("deploy-missing-0-00000000", DeploymentStatus::Success, None);
    assert!(matches!(result, Err(Error::NotFound("deployment", _))));
}

// =========================================================================
// LISTING TESTS
// =========================================================================

#[test]
fn test_list_for_agent() {
    let fixture = TestFixture::new();
    let agent = fixture.create_test_agent("builder");
    let other = fixture.create_test_agent("other");
    let release = fixture.create_test_release("widget", "v1.0.0");

    fixture.create_test_deployment(&agent, vec![release.id.clone()]);
    fixture.create_test_deployment(&agent, vec![release.id.clone()]);
    fixture.create_test_deployment(&other, vec![release.id.clone()]);

    let rows = fixture
        .dal
        .deployments()
        .list_for_agent(agent.id)
        .expect("Failed to list deployments");

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|d| d.agent_id == agent.id));
}

#[test]
fn test_history_limit_and_order() {
    let fixture = TestFixture::new();
    let agent = fixture.create_test_agent("builder");
    let release = fixture.create_test_release("widget", "v1.0.0");

    let first = fixture.create_test_deployment(&agent, vec![release.id.clone()]);
    let second = fixture.create_test_deployment(&agent, vec![release.id.clone()]);
    let third = fixture.create_test_deployment(&agent, vec![release.id.clone()]);

    // The table is shared with concurrently running tests, so assert on the
    // relative order of this test's rows rather than on absolute positions.
    let recent = fixture
        .dal
        .deployments()
        .history(1000)
        .expect("Failed to fetch history");
    let ours: Vec<&str> = recent
        .iter()
        .filter(|d| d.agent_id == agent.id)
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(
        ours,
        vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]
    );

    // The limit caps the result set.
    let capped = fixture
        .dal
        .deployments()
        .history(2)
        .expect("Failed to fetch history");
    assert_eq!(capped.len(), 2);
}
