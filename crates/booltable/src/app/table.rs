//! Truth table generation.

use crate::domain::model::{BooleanRow, BooleanTable, MappedRow, OptionName};

/// Produce every boolean assignment for `count` options.
///
/// Row `i` is the binary representation of `i`, most significant bit first and zero padded to
/// `count` digits, so the first row is all `false` and the last is all `true`. A count of zero or
/// less yields no rows at all.
///
/// The table has `2^count` rows. Counts beyond roughly twenty are impractical and counts at or
/// above the pointer width cannot be allocated; callers are expected to keep option lists small.
pub fn generate(count: i64) -> BooleanTable {
    if count <= 0 {
        return Vec::new();
    }

    let width = u32::try_from(count).unwrap_or(u32::MAX);
    let rows = 1usize.checked_shl(width).unwrap_or(usize::MAX);
    (0..rows).map(|index| row_for(index, width)).collect()
}

fn row_for(index: usize, width: u32) -> BooleanRow {
    (0..width)
        .rev()
        .map(|bit| index.checked_shr(bit).is_some_and(|shifted| shifted & 1 == 1))
        .collect()
}

/// Zip each row with the option names by position.
///
/// Later duplicates of a name overwrite earlier ones within a row.
pub fn map_rows(options: &[OptionName], table: &[BooleanRow]) -> Vec<MappedRow> {
    table
        .iter()
        .map(|row| {
            options
                .iter()
                .zip(row.iter())
                .map(|(name, value)| (name.clone(), *value))
                .collect::<MappedRow>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_negative_counts_are_empty() {
        assert!(generate(0).is_empty());
        assert!(generate(-97).is_empty());
    }

    #[test]
    fn one_option() {
        assert_eq!(generate(1), vec![vec![false], vec![true]]);
    }

    #[test]
    fn two_options() {
        assert_eq!(
            generate(2),
            vec![
                vec![false, false],
                vec![false, true],
                vec![true, false],
                vec![true, true],
            ]
        );
    }

    #[test]
    fn three_options_count_in_binary() {
        assert_eq!(
            generate(3),
            vec![
                vec![false, false, false],
                vec![false, false, true],
                vec![false, true, false],
                vec![false, true, true],
                vec![true, false, false],
                vec![true, false, true],
                vec![true, true, false],
                vec![true, true, true],
            ]
        );
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate(5), generate(5));
    }

    #[test]
    fn maps_rows_by_position() {
        let options = vec!["a".to_owned(), "b".to_owned()];
        let rows = map_rows(&options, &generate(2));
        let expected: Vec<Vec<(&str, bool)>> = vec![
            vec![("a", false), ("b", false)],
            vec![("a", false), ("b", true)],
            vec![("a", true), ("b", false)],
            vec![("a", true), ("b", true)],
        ];
        let actual: Vec<Vec<(&str, bool)>> =
            rows.iter().map(|row| row.iter().collect()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn duplicate_names_collapse_to_last_column() {
        let options = vec!["a".to_owned(), "a".to_owned()];
        let rows = map_rows(&options, &generate(2));
        assert_eq!(rows.len(), 4);
        let values: Vec<Option<bool>> = rows.iter().map(|row| row.get("a")).collect();
        assert_eq!(values, vec![Some(false), Some(true), Some(false), Some(true)]);
        assert!(rows.iter().all(|row| row.len() == 1));
    }
}
