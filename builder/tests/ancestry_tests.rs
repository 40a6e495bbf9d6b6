/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

mod common;

use async_trait::async_trait;
use bridge_core::BridgeError;
use bridge_core::SourceError;
use bridge_core::sources::RepositoryOracle;
use bridge_core::types::*;
use builder::{aggregate_patches, resolve_ancestry};
use common::*;
use mockall::mock;

mock! {
    pub Oracle {}

    #[async_trait]
    impl RepositoryOracle for Oracle {
        async fn is_landed(&self, repository: &Repository, commit: &str) -> Result<bool, SourceError>;
    }
}

#[tokio::test]
async fn test_resolve_landed_base() {
    let graph = FakeGraph::new().with_diff(1, "c1", "root").with_landed("root");

    let chain = resolve_ancestry(&graph, &graph, &git_repository(), &graph.diff(1), 256)
        .await
        .unwrap();

    assert_eq!(chain.landed, "root");
    assert_eq!(chain.diffs, vec![1]);
    assert_eq!(graph.checks(), 1);
}

#[tokio::test]
async fn test_resolve_stacked_diffs_oldest_first() {
    let graph = FakeGraph::new()
        .with_diff(1, "c1", "root")
        .with_diff(2, "c2", "c1")
        .with_diff(3, "c3", "c2")
        .with_landed("root");

    let chain = resolve_ancestry(&graph, &graph, &git_repository(), &graph.diff(3), 256)
        .await
        .unwrap();

    assert_eq!(chain.landed, "root");
    assert_eq!(chain.diffs, vec![1, 2, 3]);
    assert_eq!(chain.diffs.last(), Some(&3));
    assert_eq!(graph.diff(chain.diffs[0]).base_hash(), Some("root"));
}

#[tokio::test]
async fn test_resolve_ignores_diffs_not_headed_by_base() {
    let mut graph = FakeGraph::new()
        .with_diff(1, "c1", "root")
        .with_diff(2, "c2", "c1")
        .with_landed("root");

    // mentions c1, but c1 is not its most recent commit
    graph.diffs.push(Diff {
        id: 9,
        revision_id: Some(90),
        base_revision: Some("elsewhere".to_string()),
        local_commits: vec![
            LocalCommit {
                commit: "c9".to_string(),
                parents: vec!["c1".to_string()],
                time: 9,
            },
            LocalCommit {
                commit: "c1".to_string(),
                parents: vec!["elsewhere".to_string()],
                time: 1,
            },
        ],
    });

    let chain = resolve_ancestry(&graph, &graph, &git_repository(), &graph.diff(2), 256)
        .await
        .unwrap();

    assert_eq!(chain.diffs, vec![1, 2]);
}

#[tokio::test]
async fn test_resolve_takes_first_candidate_sharing_head() {
    // diffs 7 and 1 both end in c1, on different landed bases
    let graph = FakeGraph::new()
        .with_diff(7, "c1", "other")
        .with_diff(1, "c1", "root")
        .with_diff(2, "c2", "c1")
        .with_landed("root")
        .with_landed("other");

    let chain = resolve_ancestry(&graph, &graph, &git_repository(), &graph.diff(2), 256)
        .await
        .unwrap();

    assert_eq!(chain.landed, "other");
    assert_eq!(chain.diffs, vec![7, 2]);

    let graph = FakeGraph::new()
        .with_diff(1, "c1", "root")
        .with_diff(7, "c1", "other")
        .with_diff(2, "c2", "c1")
        .with_landed("root")
        .with_landed("other");

    let chain = resolve_ancestry(&graph, &graph, &git_repository(), &graph.diff(2), 256)
        .await
        .unwrap();

    assert_eq!(chain.landed, "root");
    assert_eq!(chain.diffs, vec![1, 2]);
}

#[tokio::test]
async fn test_resolve_without_landed_ancestor() {
    let graph = FakeGraph::new().with_diff(1, "c1", "nowhere");

    let err = resolve_ancestry(&graph, &graph, &git_repository(), &graph.diff(1), 256)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BridgeError::AncestryUnresolved { diff_id: 1, hops: 0 }
    ));
}

#[tokio::test]
async fn test_resolve_cycle_terminates() {
    let graph = FakeGraph::new()
        .with_diff(1, "a", "b")
        .with_diff(2, "b", "a");

    let err = resolve_ancestry(&graph, &graph, &git_repository(), &graph.diff(1), 256)
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::AncestryUnresolved { diff_id: 1, .. }));
    assert!(graph.checks() <= 3);
}

#[tokio::test]
async fn test_resolve_hop_cap() {
    let mut graph = FakeGraph::new();
    for id in 1..=10u64 {
        let base = if id == 1 {
            "root".to_string()
        } else {
            format!("c{}", id - 1)
        };
        graph = graph.with_diff(id, &format!("c{}", id), &base);
    }
    let graph = graph.with_landed("root");

    let err = resolve_ancestry(&graph, &graph, &git_repository(), &graph.diff(10), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::AncestryUnresolved { hops: 3, .. }));

    let chain = resolve_ancestry(&graph, &graph, &git_repository(), &graph.diff(10), 9)
        .await
        .unwrap();
    assert_eq!(chain.diffs, (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_resolve_unsupported_repository() {
    let graph = FakeGraph::new().with_diff(1, "c1", "root");
    let mut oracle = MockOracle::new();
    oracle.expect_is_landed().never();

    let repository = Repository {
        vcs: VcsKind::Other("svn".to_string()),
        ..git_repository()
    };

    let err = resolve_ancestry(&graph, &oracle, &repository, &graph.diff(1), 256)
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::UnsupportedRepository(ref vcs) if vcs == "svn"));
}

#[tokio::test]
async fn test_resolve_without_base() {
    let graph = FakeGraph::new();
    let mut oracle = MockOracle::new();
    oracle.expect_is_landed().never();

    let diff = Diff {
        id: 4,
        revision_id: Some(40),
        base_revision: None,
        local_commits: vec![],
    };

    let err = resolve_ancestry(&graph, &oracle, &git_repository(), &diff, 256)
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::MissingParent));
    assert_eq!(err.to_string(), "Unable to detect parent revision");
}

#[tokio::test]
async fn test_resolve_oracle_failure() {
    let graph = FakeGraph::new().with_diff(1, "c1", "root");
    let mut oracle = MockOracle::new();
    oracle
        .expect_is_landed()
        .times(1)
        .returning(|_, _| Err(SourceError::Transport("connection reset".to_string())));

    let err = resolve_ancestry(&graph, &oracle, &git_repository(), &graph.diff(1), 256)
        .await
        .unwrap_err();

    assert!(err.is_transient());
}

#[tokio::test]
async fn test_aggregate_patches() {
    let graph = FakeGraph::new()
        .with_diff(1, "c1", "root")
        .with_diff(2, "c2", "c1");

    assert_eq!(aggregate_patches(&graph, &[1]).await.unwrap(), "patch-1\n");
    assert_eq!(
        aggregate_patches(&graph, &[1, 2]).await.unwrap(),
        "patch-1\npatch-2\n"
    );
    assert_eq!(aggregate_patches(&graph, &[]).await.unwrap(), "");
    assert!(aggregate_patches(&graph, &[7]).await.is_err());
}
