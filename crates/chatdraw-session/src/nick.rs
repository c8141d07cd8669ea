//! Anonymous guest nicknames.

use rand::Rng;

/// Builds a guest nick: `prefix` followed by five random digits.
///
/// The relay treats any `justinfan<digits>` nick as an anonymous
/// read-only viewer. Randomizing the suffix keeps two clients on the same
/// machine from sharing a nick.
pub fn guest_nick(prefix: &str) -> String {
    let suffix: u32 = rand::rng().random_range(10_000..100_000);
    format!("{prefix}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_nick_has_prefix_and_five_digits() {
        let nick = guest_nick("justinfan");
        let digits = nick.strip_prefix("justinfan").expect("prefix kept");
        assert_eq!(digits.len(), 5);
        assert!(digits.bytes().all(|b| b.is_ascii_digit()));
    }
}
