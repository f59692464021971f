//! End-to-end bucket probes.

#[cfg(test)]
mod tests {
    use s3probe_core::{BucketDriver, BucketName, BucketResult, CheckKind, Verdict};

    use crate::{
        cleanup_bucket, create_test_bucket, list_keys, probe_api, probe_config, s3_client,
        test_bucket_name,
    };

    const CALLER_CHECKS: [CheckKind; 5] = [
        CheckKind::GetAcl,
        CheckKind::PutAcl,
        CheckKind::AuthGet,
        CheckKind::AuthWrite,
        CheckKind::AuthDel,
    ];

    async fn driver() -> BucketDriver<s3probe_aws::AwsS3Api> {
        BucketDriver::new(probe_api().await, &probe_config())
    }

    fn describe(result: &BucketResult) -> String {
        result
            .iter()
            .map(|(kind, outcome)| format!("{kind}={}", outcome.verdict))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_allow_caller_checks_on_owned_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "probe-own").await;

        let result = driver()
            .await
            .probe_bucket(BucketName::parse(&bucket).expect("name"))
            .await;

        assert_eq!(result.verdicts().len(), CheckKind::COUNT);
        for kind in CALLER_CHECKS {
            assert_eq!(
                result.verdict(kind),
                Verdict::Allowed,
                "{kind} on {bucket}: {}",
                describe(&result)
            );
        }

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_leave_no_test_objects_behind() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "probe-clean").await;
        let driver = driver().await;

        for _ in 0..2 {
            driver
                .probe_bucket(BucketName::parse(&bucket).expect("name"))
                .await;
            let keys = list_keys(&client, &bucket).await;
            assert!(keys.is_empty(), "left behind: {keys:?}");
        }

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_deny_caller_checks_on_missing_bucket() {
        let bucket = test_bucket_name("probe-ghost");

        let result = driver()
            .await
            .probe_bucket(BucketName::parse(&bucket).expect("name"))
            .await;

        for kind in [
            CheckKind::GetAcl,
            CheckKind::PutAcl,
            CheckKind::AuthWrite,
            CheckKind::AuthDel,
            CheckKind::AnonDel,
        ] {
            assert_eq!(result.verdict(kind), Verdict::Denied, "{}", describe(&result));
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_buckets_in_input_order() {
        let client = s3_client();
        let first = create_test_bucket(&client, "probe-a").await;
        let second = create_test_bucket(&client, "probe-b").await;
        let ghost = test_bucket_name("probe-ghost");
        let mut seen = Vec::new();

        let reported = driver()
            .await
            .run(
                [first.as_str(), "  ", ghost.as_str(), second.as_str()],
                &mut |r: BucketResult| seen.push(r.bucket().as_str().to_owned()),
            )
            .await;

        assert_eq!(reported, 3);
        assert_eq!(seen, vec![first.clone(), ghost, second.clone()]);

        cleanup_bucket(&client, &first).await;
        cleanup_bucket(&client, &second).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_discover_and_probe_created_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "probe-disc").await;
        let driver = driver().await;

        let discovered = driver.discover().await.expect("discover");
        assert!(
            discovered.iter().any(|b| b.as_str() == bucket),
            "should discover {bucket}"
        );

        cleanup_bucket(&client, &bucket).await;
    }
}
