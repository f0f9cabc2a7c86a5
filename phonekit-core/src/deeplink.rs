/// Phone number and code carried by the link in the verification SMS.
///
/// The link ends in a fragment of the form `#!verify:<phone>:<code>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyLink {
    /// The phone number the SMS was sent to.
    pub phone: String,
    /// The code in the SMS.
    pub code: String,
}

impl VerifyLink {
    /// Parses a full URL, a fragment or a fragment without its `#`.
    ///
    /// Returns `None` for anything that is not a verification link.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let fragment = input
            .split_once('#')
            .map_or(input, |(_, fragment)| fragment)
            .trim();

        let parts: Vec<&str> = fragment.split(':').collect();
        let [kind, phone, code] = parts.as_slice() else {
            return None;
        };
        if *kind != "!verify" || phone.is_empty() || code.is_empty() {
            return None;
        }

        Some(Self {
            phone: (*phone).to_string(),
            code: (*code).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("#!verify:+31612345678:ABC123")]
    #[test_case("!verify:+31612345678:ABC123")]
    #[test_case("https://example.org/sms/#!verify:+31612345678:ABC123")]
    fn test_parse(input: &str) {
        assert_eq!(
            VerifyLink::parse(input),
            Some(VerifyLink {
                phone: "+31612345678".to_string(),
                code: "ABC123".to_string(),
            })
        );
    }

    #[test_case("" ; "empty")]
    #[test_case("#" ; "bare hash")]
    #[test_case("#!verify:+31612345678" ; "missing code")]
    #[test_case("#!verify::ABC123" ; "empty phone")]
    #[test_case("#!verify:+31612345678:" ; "empty code")]
    #[test_case("#!verify:+31612345678:ABC:123" ; "too many parts")]
    #[test_case("#!confirm:+31612345678:ABC123" ; "other command")]
    #[test_case("https://example.org/sms/" ; "no fragment")]
    fn test_parse_ignores(input: &str) {
        assert_eq!(VerifyLink::parse(input), None);
    }
}
