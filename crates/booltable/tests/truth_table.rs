use std::collections::HashSet;

use booltable::app::state::TruthTableState;
use booltable::app::sync::MatchMode;
use booltable::domain::model::HistoryUpdate;
use booltable::infra::location::{MemoryHistory, Navigator, options_query, read_options};
use booltable::{generate, map_rows, parse};
use proptest::prelude::*;

proptest! {
    #[test]
    fn table_is_the_full_power_set(n in 1i64..=10) {
        let table = generate(n);
        prop_assert_eq!(table.len(), 1usize << n);
        prop_assert!(table.iter().all(|row| row.len() == n as usize));

        let distinct: HashSet<&Vec<bool>> = table.iter().collect();
        prop_assert_eq!(distinct.len(), table.len());

        prop_assert!(table[0].iter().all(|value| !value));
        prop_assert!(table[table.len() - 1].iter().all(|value| *value));
    }

    #[test]
    fn rows_count_in_binary(n in 1i64..=8) {
        let width = n as usize;
        for (index, row) in generate(n).iter().enumerate() {
            let bits = format!("{index:0width$b}");
            let expected: Vec<bool> = bits.chars().map(|bit| bit == '1').collect();
            prop_assert_eq!(row, &expected);
        }
    }

    #[test]
    fn non_positive_counts_are_empty(n in i64::MIN..=0) {
        prop_assert!(generate(n).is_empty());
    }

    #[test]
    fn parsed_names_never_hold_whitespace_or_commas(raw in "[a-c ,\t]{0,24}") {
        for name in parse(&raw) {
            prop_assert!(!name.is_empty());
            prop_assert!(!name.contains(','));
            prop_assert!(!name.chars().any(char::is_whitespace));
        }
    }
}

#[test]
fn parser_examples() {
    assert!(parse("").is_empty());
    assert_eq!(parse("a,b,c"), vec!["a", "b", "c"]);
    assert_eq!(parse(" a , b ,,c,"), vec!["a", "b", "c"]);
}

#[test]
fn mapped_rows_follow_option_names() {
    let options = parse("a,b");
    let rows = map_rows(&options, &generate(options.len() as i64));
    let json = serde_json::to_string(&rows).unwrap();
    assert_eq!(
        json,
        r#"[{"a":false,"b":false},{"a":false,"b":true},{"a":true,"b":false},{"a":true,"b":true}]"#
    );
}

#[test]
fn editing_session_walks_history() {
    let mut state =
        TruthTableState::new(MemoryHistory::new(options_query("a")), MatchMode::Pattern).unwrap();

    assert_eq!(state.set_text("a,").unwrap(), HistoryUpdate::Pushed);
    assert_eq!(state.set_text("a,b").unwrap(), HistoryUpdate::Replaced);
    assert_eq!(state.set_text("c,d,e").unwrap(), HistoryUpdate::Pushed);

    let entries: Vec<String> = state
        .navigator()
        .entries()
        .iter()
        .map(|query| read_options(query))
        .collect();
    assert_eq!(entries, vec!["a", "a,b", "c,d,e"]);

    assert!(state.navigator_mut().back());
    state.poll_navigation().unwrap();
    assert_eq!(state.text(), "a,b");
    assert_eq!(state.derived().combinations(), 4);

    assert!(state.navigator_mut().back());
    state.poll_navigation().unwrap();
    assert_eq!(state.text(), "a");
    assert_eq!(
        read_options(&state.navigator().location().unwrap_or_default()),
        "a"
    );
}
