use crate::error::Error;
use std::convert::TryFrom;

/// Split a comma separated argument list into its top-level arguments.
///
/// Commas nested inside parentheses or double quotes do not separate
/// arguments, and arguments are produced exactly as written, without any
/// trimming. An empty list contains a single empty argument, and a trailing
/// comma produces a final empty argument, so joining the arguments back with
/// `,` always gives the original list.
///
/// The splitter does not check that parentheses are balanced: an unclosed
/// parenthesis swallows the rest of the list, and so does an extra closing
/// one.
///
/// # Examples
///
/// ```
/// # use reckoner::Arguments;
/// let arguments: Vec<&str> = Arguments::new("f(1,2), 3").collect();
/// assert_eq!(arguments, ["f(1,2)", " 3"]);
///
/// let arguments: Vec<&str> = Arguments::new("").collect();
/// assert_eq!(arguments, [""]);
/// ```
#[derive(Debug, Clone)]
pub struct Arguments<'a> {
    /// The part of the list which was not consumed yet, `None` once the last
    /// argument was produced
    remaining: Option<&'a str>,
}

impl<'a> Arguments<'a> {
    /// Create a new splitter for the `list` of arguments
    pub fn new(list: &'a str) -> Self {
        Self {
            remaining: Some(list),
        }
    }

    /// Check if there is at least one more argument
    pub fn has_next(&self) -> bool {
        self.remaining.is_some()
    }

    /// Get all the remaining arguments, failing with a structural error if
    /// there are not exactly `N` of them.
    ///
    /// ```
    /// # use reckoner::Arguments;
    /// let [a, b] = Arguments::new("1, (2, 3)").exactly::<2>().unwrap();
    /// assert_eq!((a, b), ("1", " (2, 3)"));
    ///
    /// let error = Arguments::new("1").exactly::<2>().unwrap_err();
    /// assert_eq!(error.to_string(), "Expected 2 arguments, found 1");
    /// ```
    pub fn exactly<const N: usize>(self) -> Result<[&'a str; N], Error> {
        let arguments: Vec<&'a str> = self.collect();
        let found = arguments.len();
        <[&'a str; N]>::try_from(arguments).map_err(|_| {
            Error::structural(format!(
                "Expected {} argument{}, found {}",
                N,
                if N == 1 { "" } else { "s" },
                found
            ))
        })
    }
}

impl<'a> Iterator for Arguments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let list = self.remaining.take()?;
        let mut depth = 0_isize;
        let mut quoted = false;
        for (index, c) in list.char_indices() {
            match c {
                '"' => quoted = !quoted,
                '(' if !quoted => depth += 1,
                ')' if !quoted => depth -= 1,
                ',' if !quoted && depth == 0 => {
                    self.remaining = Some(&list[index + 1..]);
                    return Some(&list[..index]);
                }
                _ => {}
            }
        }
        Some(list)
    }
}

impl std::iter::FusedIterator for Arguments<'_> {}

#[cfg(test)]
mod tests {
    use super::Arguments;
    use crate::error::ErrorKind;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("f(1,2),3" => vec!["f(1,2)", "3"] ; "commas inside parenthesis")]
    #[test_case("1,2,3" => vec!["1", "2", "3"] ; "flat list")]
    #[test_case("" => vec![""] ; "empty list")]
    #[test_case("1," => vec!["1", ""] ; "trailing comma")]
    #[test_case(",1" => vec!["", "1"] ; "leading comma")]
    #[test_case(" a , b " => vec![" a ", " b "] ; "whitespace is preserved")]
    #[test_case("g(h(1,2),3),4" => vec!["g(h(1,2),3)", "4"] ; "nested calls")]
    #[test_case("\"a,b\",c" => vec!["\"a,b\"", "c"] ; "commas inside quotes")]
    #[test_case("(1,2" => vec!["(1,2"] ; "unclosed parenthesis")]
    #[test_case("1),2" => vec!["1),2"] ; "extra closing parenthesis")]
    fn split(list: &str) -> Vec<&str> {
        Arguments::new(list).collect()
    }

    #[test]
    fn pull() {
        let mut arguments = Arguments::new("a,b");
        assert!(arguments.has_next());
        assert_eq!(arguments.next(), Some("a"));
        let restart = Arguments::new("a,b");
        assert!(arguments.has_next());
        assert_eq!(arguments.next(), Some("b"));
        assert!(!arguments.has_next());
        assert_eq!(arguments.next(), None);
        assert_eq!(arguments.next(), None);

        assert_eq!(restart.count(), 2);
    }

    #[test]
    fn arity() {
        assert_eq!(Arguments::new("1").exactly::<1>(), Ok(["1"]));
        assert_eq!(Arguments::new("1,2,3").exactly::<3>(), Ok(["1", "2", "3"]));

        let error = Arguments::new("1,2,3").exactly::<2>().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Structural);
        assert_eq!(error.to_string(), "Expected 2 arguments, found 3");

        let error = Arguments::new("1,2").exactly::<1>().unwrap_err();
        assert_eq!(error.to_string(), "Expected 1 argument, found 2");
    }

    proptest! {
        #[test]
        fn join_gives_back_the_list(list in "[a-z0-9(), ]{0,40}") {
            let arguments: Vec<&str> = Arguments::new(&list).collect();
            prop_assert_eq!(arguments.join(","), list.as_str());
        }

        #[test]
        fn flat_lists_split_on_every_comma(items in prop::collection::vec("[a-z0-9 ]{0,5}", 1..8)) {
            let list = items.join(",");
            let arguments: Vec<&str> = Arguments::new(&list).collect();
            prop_assert_eq!(arguments, items);
        }
    }
}
