//! Unit tests for GUID pool reconciliation

#[cfg(test)]
mod tests {
    use crate::annotation::NETWORKS_ANNOTATION;
    use crate::{Guid, GuidPool, GuidPoolError, MockPodClient, PodClientError, PodClientTrait};
    use k8s_openapi::api::core::v1::Pod;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    const START: &str = "02:00:00:00:00:00:00:00";
    const END: &str = "02:FF:FF:FF:FF:FF:FF:FF";

    /// Helper to create a test pod with the given annotations
    fn create_test_pod(name: &str, namespace: &str, annotations: &[(&str, &str)]) -> Pod {
        let annotations: BTreeMap<String, String> = annotations
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                annotations: (!annotations.is_empty()).then_some(annotations),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Helper to create a test pod carrying a networks annotation
    fn create_networks_pod(name: &str, namespace: &str, networks: &str) -> Pod {
        create_test_pod(name, namespace, &[(NETWORKS_ANNOTATION, networks)])
    }

    fn create_test_pool(client: &MockPodClient) -> GuidPool {
        let client: Arc<dyn PodClientTrait> = Arc::new(client.clone());
        GuidPool::new(START, END, Some(client)).unwrap()
    }

    #[tokio::test]
    async fn test_init_pool_with_running_pods() {
        let client = MockPodClient::with_pods(vec![
            create_networks_pod(
                "p1",
                "default",
                r#"[{"name":"test","cni-args":{"guid":"02:00:00:00:00:00:00:03"}}]"#,
            ),
            create_networks_pod(
                "p2",
                "default",
                r#"[{"name":"test","cni-args":{"guid":"02:00:00:00:00:00:00:04"}},
                    {"name":"test","cni-args":{"guid":"02:00:00:00:00:00:00:05"}}]"#,
            ),
            create_networks_pod(
                "p3",
                "foo",
                r#"[{"name":"test","namespace":"foo","cni-args":{"guid":"02:00:00:00:00:00:00:07"}}]"#,
            ),
            create_networks_pod("p4", "foo", "[{failed to parse}]"),
            create_networks_pod("p5", "foo", "not-json"),
            create_networks_pod("p6", "foo", ""),
            create_test_pod("p7", "foo", &[("foo", "foo")]),
            create_test_pod("p8", "default", &[]),
        ]);
        let pool = create_test_pool(&client);

        let reconciled = pool.init_pool().await.unwrap();

        assert_eq!(reconciled, 4);
        assert_eq!(client.list_calls(), 1);
        assert_eq!(
            pool.allocated_guids(),
            vec![
                Guid::new(0x0200_0000_0000_0003),
                Guid::new(0x0200_0000_0000_0004),
                Guid::new(0x0200_0000_0000_0005),
                Guid::new(0x0200_0000_0000_0007),
            ]
        );
    }

    #[tokio::test]
    async fn test_init_pool_then_allocate_skips_reconciled_guids() {
        let client = MockPodClient::with_pods(vec![create_networks_pod(
            "p1",
            "default",
            r#"[{"name":"test","cni-args":{"guid":"02:00:00:00:00:00:00:00"}},
                {"name":"test","cni-args":{"guid":"02:00:00:00:00:00:00:01"}}]"#,
        )]);
        let pool = create_test_pool(&client);
        pool.init_pool().await.unwrap();

        assert_eq!(pool.allocate_guid_string().unwrap(), "02:00:00:00:00:00:00:02");

        // Reconciled GUIDs are released like any other
        pool.release_guid("02:00:00:00:00:00:00:00").unwrap();
        assert!(!pool.is_allocated(Guid::new(0x0200_0000_0000_0000)));
    }

    #[tokio::test]
    async fn test_init_pool_rerun_is_idempotent() {
        let client = MockPodClient::with_pods(vec![create_networks_pod(
            "p1",
            "default",
            r#"[{"name":"test","cni-args":{"guid":"02:00:00:00:00:00:00:03"}}]"#,
        )]);
        let pool = create_test_pool(&client);

        assert_eq!(pool.init_pool().await.unwrap(), 1);
        assert_eq!(pool.init_pool().await.unwrap(), 1);
        assert_eq!(pool.allocated_guids(), vec![Guid::new(0x0200_0000_0000_0003)]);
        assert_eq!(client.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_init_pool_replaces_earlier_allocations() {
        let client = MockPodClient::with_pods(vec![create_networks_pod(
            "p1",
            "default",
            r#"[{"name":"test","cni-args":{"guid":"02:00:00:00:00:00:00:03"}}]"#,
        )]);
        let pool = create_test_pool(&client);
        assert_eq!(pool.allocate_guid_string().unwrap(), "02:00:00:00:00:00:00:00");

        pool.init_pool().await.unwrap();

        // Only the cluster's GUIDs remain; the cursor still moves past the last handout
        assert_eq!(pool.allocated_guids(), vec![Guid::new(0x0200_0000_0000_0003)]);
        assert_eq!(pool.allocate_guid_string().unwrap(), "02:00:00:00:00:00:00:01");
    }

    #[tokio::test]
    async fn test_init_pool_failure_keeps_previous_state() {
        let client = MockPodClient::with_pods(vec![create_networks_pod(
            "p1",
            "default",
            r#"[{"name":"test","cni-args":{"guid":"02:00:00:00:00:00:00:03"}}]"#,
        )]);
        let pool = create_test_pool(&client);
        pool.init_pool().await.unwrap();

        client.add_pod(create_networks_pod(
            "p2",
            "default",
            r#"[{"name":"test","cni-args":{"guid":"02:00:00:00:00:00:00:03"}}]"#,
        ));
        let err = pool.init_pool().await.unwrap_err();

        assert!(matches!(err, GuidPoolError::ConflictingAllocation(_)));
        assert_eq!(pool.allocated_guids(), vec![Guid::new(0x0200_0000_0000_0003)]);
    }

    #[tokio::test]
    async fn test_init_pool_without_pods() {
        let client = MockPodClient::new();
        let pool = create_test_pool(&client);

        assert_eq!(pool.init_pool().await.unwrap(), 0);
        assert_eq!(pool.stats().allocated, 0);
    }

    #[tokio::test]
    async fn test_init_pool_failed_to_get_pods() {
        let client = MockPodClient::new();
        client.fail_with("err");
        let pool = create_test_pool(&client);

        let err = pool.init_pool().await.unwrap_err();

        assert!(matches!(err, GuidPoolError::ReconciliationFailed(PodClientError::Api(_))));
        assert_eq!(err.to_string(), "InitPool(): failed to get pods from kubernetes: err");
    }

    #[tokio::test]
    async fn test_init_pool_without_client() {
        let pool = GuidPool::new(START, END, None).unwrap();

        let err = pool.init_pool().await.unwrap_err();
        assert!(matches!(err, GuidPoolError::ReconciliationFailed(PodClientError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_init_pool_failed_to_allocate_invalid_guid() {
        let client = MockPodClient::with_pods(vec![create_networks_pod(
            "p1",
            "default",
            r#"[{"name":"test","cni-args":{"guid":"invalid"}}]"#,
        )]);
        let pool = create_test_pool(&client);

        let err = pool.init_pool().await.unwrap_err();
        assert!(matches!(err, GuidPoolError::InvalidGuidFormat(text) if text == "invalid"));
    }

    #[tokio::test]
    async fn test_init_pool_failed_to_allocate_reserved_guid() {
        let client = MockPodClient::with_pods(vec![create_networks_pod(
            "p1",
            "default",
            r#"[{"name":"test","cni-args":{"guid":"00:00:00:00:00:00:00:00"}}]"#,
        )]);
        let pool = create_test_pool(&client);

        let err = pool.init_pool().await.unwrap_err();
        assert!(matches!(err, GuidPoolError::DisallowedGuid(_)));
    }

    #[tokio::test]
    async fn test_init_pool_failed_to_allocate_allocated_guid() {
        let client = MockPodClient::with_pods(vec![
            create_networks_pod(
                "p1",
                "default",
                r#"[{"name":"test","cni-args":{"guid":"02:00:00:00:00:00:00:00"}}]"#,
            ),
            create_networks_pod(
                "p2",
                "default",
                r#"[{"name":"test","cni-args":{"guid":"02:00:00:00:00:00:00:00"}}]"#,
            ),
        ]);
        let pool = create_test_pool(&client);

        let err = pool.init_pool().await.unwrap_err();
        assert!(matches!(err, GuidPoolError::ConflictingAllocation(guid) if guid.value() == 0x0200_0000_0000_0000));
    }

    #[tokio::test]
    async fn test_init_pool_duplicate_with_different_case() {
        // Text forms differ, numeric GUID is the same
        let client = MockPodClient::with_pods(vec![
            create_networks_pod("p1", "default", r#"[{"cni-args":{"guid":"02:00:00:00:00:00:00:AB"}}]"#),
            create_networks_pod("p2", "other", r#"[{"cni-args":{"guid":"02:00:00:00:00:00:00:ab"}}]"#),
        ]);
        let pool = create_test_pool(&client);

        let err = pool.init_pool().await.unwrap_err();
        assert!(matches!(err, GuidPoolError::ConflictingAllocation(_)));
    }

    #[tokio::test]
    async fn test_init_pool_ignores_guids_of_other_pools() {
        let client = MockPodClient::with_pods(vec![create_networks_pod(
            "p1",
            "default",
            r#"[{"name":"other","cni-args":{"guid":"03:00:00:00:00:00:00:01"}},
                {"name":"test","cni-args":{"guid":"02:00:00:00:00:00:00:01"}}]"#,
        )]);
        let pool = create_test_pool(&client);

        assert_eq!(pool.init_pool().await.unwrap(), 1);
        assert_eq!(pool.allocated_guids(), vec![Guid::new(0x0200_0000_0000_0001)]);
    }

    #[tokio::test]
    async fn test_mock_client_filters_by_namespace() {
        let client = MockPodClient::with_pods(vec![
            create_test_pod("p1", "default", &[]),
            create_test_pod("p2", "foo", &[]),
        ]);
        client.add_pod(create_test_pod("p3", "foo", &[]));

        assert_eq!(client.list_pods("").await.unwrap().len(), 3);
        assert_eq!(client.list_pods("foo").await.unwrap().len(), 2);
        assert_eq!(client.list_calls(), 2);
    }
}
