// tests/property_hostlist.rs

use std::collections::HashSet;

use proptest::prelude::*;
use voidjob::context::NodeList;

proptest! {
    #[test]
    fn range_expands_to_every_index_once(
        prefix in "[a-z]{1,6}",
        lo in 0u64..5000,
        span in 0u64..200,
        width in 1usize..6,
    ) {
        let hi = lo + span;
        let expr = format!("{prefix}[{lo:0width$}-{hi}]");
        let list = NodeList::parse(&expr).unwrap();

        prop_assert_eq!(list.len() as u64, span + 1);

        let unique: HashSet<&String> = list.hosts().iter().collect();
        prop_assert_eq!(unique.len(), list.len());

        for (i, host) in list.hosts().iter().enumerate() {
            let expected = format!("{prefix}{:0width$}", lo + i as u64);
            prop_assert_eq!(host, &expected);
        }
    }

    #[test]
    fn comma_separated_plain_hosts_are_kept_in_order(
        hosts in proptest::collection::vec("[a-z][a-z0-9-]{0,10}", 1..20),
    ) {
        let list = NodeList::parse(&hosts.join(",")).unwrap();
        prop_assert_eq!(list.hosts(), hosts.as_slice());
    }

    #[test]
    fn parsing_never_panics(input in "[a-z0-9\\[\\],-]{0,30}") {
        let _ = NodeList::parse(&input);
    }
}
