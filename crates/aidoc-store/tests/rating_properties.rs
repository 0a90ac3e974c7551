//! Property tests for review insertion.

use std::sync::Arc;

use aidoc_core::ProviderKind;
use aidoc_store::DataAccessService;
use aidoc_testkit::{review, MemoryStorageHandler, ProviderBuilder};
use proptest::prelude::*;

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(fut)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rating_is_mean_after_every_insert(stars in prop::collection::vec(1u8..=5, 1..20)) {
        block_on(async {
            let storage = Arc::new(MemoryStorageHandler::new());
            let service = DataAccessService::open(storage).await.unwrap();
            service
                .add_provider(ProviderBuilder::new("d1", ProviderKind::Doctor).build())
                .await
                .unwrap();

            for (i, s) in stars.iter().enumerate() {
                let id = format!("r{i}");
                let provider = service
                    .add_review("d1", review(&id, *s))
                    .await
                    .unwrap()
                    .unwrap();

                let inserted = &stars[..=i];
                let expected =
                    inserted.iter().map(|&s| f64::from(s)).sum::<f64>() / inserted.len() as f64;
                prop_assert!((provider.rating - expected).abs() < 1e-9);
                prop_assert_eq!(&provider.reviews[0].id, &id);
                prop_assert_eq!(provider.reviews.len(), i + 1);
                prop_assert!((0.0..=5.0).contains(&provider.rating));
            }
            Ok(())
        })?;
    }
}
