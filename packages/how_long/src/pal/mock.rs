#![cfg_attr(coverage_nightly, coverage(off))]

use std::time::Instant;

use mockall::mock;

use crate::pal::Platform;

mock! {
    #[derive(Debug)]
    pub Platform {
    }

    impl Platform for Platform {
        fn now(&self) -> Instant;
    }
}
