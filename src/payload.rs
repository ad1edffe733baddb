//! Formatting of wire payloads.
//!
//! Payloads are short ASCII lines with space-separated fields and no trailing
//! newline. Formatting is pure and side-effect free so it can be tested
//! without touching the network.

/// Formats a counter update: `c <name> <amount>`.
pub(crate) fn counter(name: &str, amount: i64) -> String {
    let mut value = itoa::Buffer::new();
    let mut line = String::with_capacity(name.len() + 23);
    line.push_str("c ");
    line.push_str(name);
    line.push(' ');
    line.push_str(value.format(amount));
    line
}

/// Formats a scaled counter update: `c <name> <amount> <scale>`.
///
/// The scale field is passed through verbatim; interpreting it is the
/// collector's job.
pub(crate) fn scaled_counter(name: &str, amount: i64, scale: i64) -> String {
    let mut value = itoa::Buffer::new();
    let mut line = counter(name, amount);
    line.push(' ');
    line.push_str(value.format(scale));
    line
}

/// Formats a gauge sample: `g <name> <value>`.
pub(crate) fn gauge(name: &str, value: i64) -> String {
    let mut formatted = itoa::Buffer::new();
    let mut line = String::with_capacity(name.len() + 23);
    line.push_str("g ");
    line.push_str(name);
    line.push(' ');
    line.push_str(formatted.format(value));
    line
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{counter, gauge, scaled_counter};

    #[test]
    fn counter_payloads() {
        // Cases are defined as: name, amount, expected output.
        let cases = [
            ("requests.total", 42, "c requests.total 42"),
            ("requests.total", 0, "c requests.total 0"),
            ("cache.evictions", -3, "c cache.evictions -3"),
            ("x", i64::MAX, "c x 9223372036854775807"),
            ("x", i64::MIN, "c x -9223372036854775808"),
        ];

        for (name, amount, expected) in cases {
            assert_eq!(counter(name, amount), expected);
        }
    }

    #[test]
    fn scaled_counter_payloads() {
        let cases = [
            ("sampled.events", 7, 100, "c sampled.events 7 100"),
            ("sampled.events", 7, 1, "c sampled.events 7 1"),
            ("sampled.events", -1, -1, "c sampled.events -1 -1"),
        ];

        for (name, amount, scale, expected) in cases {
            assert_eq!(scaled_counter(name, amount, scale), expected);
        }
    }

    #[test]
    fn gauge_payloads() {
        let cases = [
            ("latency.ms", 137, "g latency.ms 137"),
            ("queue.depth", 0, "g queue.depth 0"),
            ("temp.delta", -12, "g temp.delta -12"),
        ];

        for (name, value, expected) in cases {
            assert_eq!(gauge(name, value), expected);
        }
    }

    #[test]
    fn incr_is_counter_of_one() {
        assert_eq!(counter("some.event", 1), "c some.event 1");
    }

    proptest! {
        #[test]
        fn counter_matches_template(name in "[a-z][a-z0-9._]{0,40}", amount in any::<i64>()) {
            assert_eq!(counter(&name, amount), format!("c {name} {amount}"));
        }

        #[test]
        fn scaled_counter_matches_template(
            name in "[a-z][a-z0-9._]{0,40}",
            amount in any::<i64>(),
            scale in any::<i64>(),
        ) {
            assert_eq!(scaled_counter(&name, amount, scale), format!("c {name} {amount} {scale}"));
        }

        #[test]
        fn gauge_matches_template(name in "[a-z][a-z0-9._]{0,40}", value in any::<i64>()) {
            assert_eq!(gauge(&name, value), format!("g {name} {value}"));
        }
    }
}
