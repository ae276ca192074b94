use proptest::prelude::*;

use x470_types::{ProofTimestamp, ProtocolParams, Timestamp};

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// A deadline has passed exactly when `now` is at or after it.
    #[test]
    fn deadline_passed_matches_ordering(deadline in 0u64..1_000_000, now in 0u64..1_000_000) {
        let passed = Timestamp::new(deadline).deadline_passed(Timestamp::new(now));
        prop_assert_eq!(passed, now >= deadline);
    }

    /// Integral proof timestamps render exactly like their integer value.
    #[test]
    fn proof_timestamp_renders_integers_exactly(millis in 0u64..(1u64 << 53)) {
        let ts = ProofTimestamp::from_millis(millis);
        prop_assert_eq!(ts.to_string(), millis.to_string());
    }

    /// The combined window is the saturating sum of TTL and skew.
    #[test]
    fn timestamp_window_is_sum(ttl in 1u64..u64::MAX / 2, skew in 0u64..u64::MAX / 2) {
        let params = ProtocolParams {
            challenge_ttl_ms: ttl,
            clock_skew_ms: skew,
            ..Default::default()
        };
        prop_assert_eq!(params.timestamp_window_ms(), ttl + skew);
    }
}
