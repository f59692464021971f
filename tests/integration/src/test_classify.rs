//! Adapter error classification against a live server.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use s3probe_core::{ApiError, Identity, S3Api};

    use crate::{cleanup_bucket, create_test_bucket, probe_api, s3_client, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_missing_key_as_not_found() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "cls-head").await;
        let api = probe_api().await;

        let err = api
            .head_object(Identity::Authenticated, &bucket, "missing.txt")
            .await
            .expect_err("missing key");
        assert!(err.is_not_found(), "unexpected error: {err}");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_not_report_missing_bucket_as_not_found() {
        let api = probe_api().await;
        let bucket = test_bucket_name("cls-ghost");

        let err = api
            .get_bucket_acl(Identity::Authenticated, &bucket)
            .await
            .expect_err("missing bucket");
        assert!(matches!(err, ApiError::Other(_)), "unexpected error: {err}");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_object_with_caller_credentials() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "cls-put").await;
        let api = probe_api().await;

        api.put_object(Identity::Authenticated, &bucket, "probe.txt", Bytes::from_static(b"test"))
            .await
            .expect("put");
        api.head_object(Identity::Authenticated, &bucket, "probe.txt")
            .await
            .expect("head");
        api.delete_object(Identity::Authenticated, &bucket, "probe.txt")
            .await
            .expect("delete");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_write_back_unchanged_acl() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "cls-acl").await;
        let api = probe_api().await;

        let before = api
            .get_bucket_acl(Identity::Authenticated, &bucket)
            .await
            .expect("get acl");
        api.put_bucket_acl(Identity::Authenticated, &bucket, &before)
            .await
            .expect("put acl");
        let after = api
            .get_bucket_acl(Identity::Authenticated, &bucket)
            .await
            .expect("get acl again");
        assert_eq!(before, after);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_created_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "cls-list").await;
        let api = probe_api().await;

        let names = api
            .list_buckets(Identity::Authenticated)
            .await
            .expect("list");
        assert!(names.contains(&bucket), "should contain {bucket}");

        cleanup_bucket(&client, &bucket).await;
    }
}
