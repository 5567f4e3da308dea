use proptest::prelude::*;
use rask_logger::parser::codec::{self, COMPRESSION_THRESHOLD};
use rask_logger::{ForwardedError, NativeError, Value, ValueParser};
use serde_json::json;

proptest! {
    #[test]
    fn integers_pass_through(n in any::<i64>()) {
        prop_assert_eq!(ValueParser::new().parse(&Value::from(n)), Some(json!(n)));
    }

    #[test]
    fn booleans_pass_through(b in any::<bool>()) {
        prop_assert_eq!(ValueParser::new().parse(&Value::from(b)), Some(json!(b)));
    }

    #[test]
    fn short_strings_unchanged(s in "\\PC{0,1000}") {
        prop_assume!(s.chars().count() <= COMPRESSION_THRESHOLD);
        prop_assert_eq!(ValueParser::new().parse(&Value::from(s.as_str())), Some(json!(s)));
    }

    #[test]
    fn long_strings_round_trip(s in "\\PC{1001,3000}") {
        let parsed = ValueParser::new().parse(&Value::from(s.as_str())).unwrap();
        let encoded = parsed.as_str().unwrap();
        prop_assert_eq!(codec::inflate(encoded).unwrap(), s);
    }

    #[test]
    fn serialized_objects_round_trip(values in prop::collection::vec(any::<i32>(), 0..400)) {
        let json = json!({ "values": values });
        let serialized = serde_json::to_string(&json).unwrap();
        let parsed = ValueParser::new().parse(&Value::from(json)).unwrap();
        let parsed = parsed.as_str().unwrap();

        if serialized.chars().count() > COMPRESSION_THRESHOLD {
            prop_assert_eq!(codec::inflate(parsed).unwrap(), serialized);
        } else {
            prop_assert_eq!(parsed, serialized.as_str());
        }
    }

    #[test]
    fn forwarded_paths_join_outermost_first(segments in prop::collection::vec("[a-z_]{1,12}", 1..6)) {
        let mut error = Value::from(NativeError::error("m"));
        for segment in segments.iter().rev() {
            error = Value::from(ForwardedError::new(segment.as_str(), error));
        }
        let Value::Forwarded(forwarded) = error else {
            return Err(TestCaseError::fail("expected a forwarded error"));
        };
        prop_assert_eq!(forwarded.path(), segments.join("."));
        prop_assert_eq!(forwarded.message(), "m");
    }
}
